//! # Audio Capture Module
//!
//! This module handles real-time audio capture using CPAL (Cross-Platform Audio Library).
//! It opens the default input device in the configured sample format, cuts the
//! interleaved callback data into analysis-sized frames and streams them to the
//! analysis worker.
//!
//! ## Features
//! - Automatic audio device selection
//! - 16-bit integer or 32-bit float capture
//! - Any channel count; frames stay interleaved
//! - Frames are dropped rather than queued when the worker falls behind

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SupportedStreamConfigRange;
use crossbeam_channel::Sender;
use anyhow::{Result, anyhow};
use tracing::{error, info};

use crate::analyzer::run_length;
use crate::config::{AnalyzerConfig, SampleFormat};

/// Interleaved samples of one analysis frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSamples {
    I16(Vec<i16>),
    F32(Vec<f32>),
}

impl From<Vec<i16>> for FrameSamples {
    fn from(samples: Vec<i16>) -> Self {
        FrameSamples::I16(samples)
    }
}

impl From<Vec<f32>> for FrameSamples {
    fn from(samples: Vec<f32>) -> Self {
        FrameSamples::F32(samples)
    }
}

/// One block of interleaved audio, `run_length(bits)` samples per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    pub samples: FrameSamples,
    pub channels: usize,
}

/// What the device actually agreed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: usize,
    pub sample_format: SampleFormat,
}

/// Collects callback data and emits whole frames.
///
/// The callback hands over arbitrary chunk sizes; frames are cut at exact
/// multiples of `frame_len` so channel interleaving never shifts.
pub struct FrameAccumulator<T> {
    buffer: Vec<T>,
    frame_len: usize,
}

impl<T: Copy> FrameAccumulator<T> {
    /// `frame_len` is the interleaved length of one frame (samples per
    /// channel times channel count).
    pub fn new(frame_len: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(frame_len * 2),
            frame_len: frame_len.max(1),
        }
    }

    /// Appends `data` and passes each completed frame to `emit`.
    pub fn push(&mut self, data: &[T], mut emit: impl FnMut(Vec<T>)) {
        // Append new data to our buffer.
        self.buffer.extend_from_slice(data);

        // While we have enough data for a full frame, process it.
        while self.buffer.len() >= self.frame_len {
            let frame: Vec<T> = self.buffer.drain(..self.frame_len).collect();
            emit(frame);
        }
    }
}

/// Starts audio capture from the default input device.
///
/// # Arguments
/// * `config` - Requested rate, sample format and block exponent
/// * `sender` - Channel sender for streaming frames to the analysis worker
///
/// # Returns
/// * `Ok((stream, info))` - Audio stream handle and the negotiated format
/// * `Err(e)` - No device, no matching format, or the stream failed to start
pub fn start_audio_capture(
    config: &AnalyzerConfig,
    sender: Sender<AudioFrame>,
) -> Result<(cpal::Stream, StreamInfo)> {
    let host = cpal::default_host();
    let device = host.default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    info!("[AUDIO] Using audio input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, config)
        .ok_or_else(|| anyhow!("No suitable {:?} input format found", config.sample_format))?;

    let sample_rate = cpal::SampleRate(clamp_rate(&supported_config, config.sample_rate));
    let stream_config = supported_config.with_sample_rate(sample_rate);
    let info = StreamInfo {
        sample_rate: stream_config.sample_rate().0,
        channels: stream_config.channels() as usize,
        sample_format: config.sample_format,
    };
    let stream_config: cpal::StreamConfig = stream_config.into();

    info!(
        "[AUDIO] Selected {} Hz, {} channel(s), {:?}",
        info.sample_rate, info.channels, info.sample_format
    );

    let frame_len = run_length(config.bits) * info.channels;
    let stream = match config.sample_format {
        SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, frame_len, info.channels, sender)?,
        SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, frame_len, info.channels, sender)?,
    };

    stream.play()?;

    Ok((stream, info))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    frame_len: usize,
    channels: usize,
    sender: Sender<AudioFrame>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + Send + 'static,
    FrameSamples: From<Vec<T>>,
{
    let err_fn = |err| error!("[AUDIO] An error occurred on the audio stream: {}", err);

    let mut accumulator = FrameAccumulator::<T>::new(frame_len);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            accumulator.push(data, |frame| {
                // Send the frame, ignoring errors if the channel is full.
                let _ = sender.try_send(AudioFrame {
                    samples: frame.into(),
                    channels,
                });
            });
        },
        err_fn,
        None
    )?;

    Ok(stream)
}

/// Finds the best supported audio configuration for the requested settings.
///
/// Candidates must use the requested sample format and carry the requested
/// channel; among those the closest sample rate wins, then the fewest channels.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    config: &AnalyzerConfig,
) -> Option<SupportedStreamConfigRange> {
    let wanted_format = match config.sample_format {
        SampleFormat::I16 => cpal::SampleFormat::I16,
        SampleFormat::F32 => cpal::SampleFormat::F32,
    };
    let target_rate = config.sample_rate;

    configs
        .into_iter()
        .filter(|c| c.sample_format() == wanted_format && (c.channels() as usize) > config.channel)
        .min_by_key(|c| {
            let rate_diff = (clamp_rate(c, target_rate) as i64 - target_rate as i64).abs();
            (rate_diff, c.channels())
        })
}

fn clamp_rate(range: &SupportedStreamConfigRange, target_rate: u32) -> u32 {
    target_rate.clamp(range.min_sample_rate().0, range.max_sample_rate().0)
}
