//! # Analysis Worker
//!
//! A dedicated thread that owns one [`SpectrumAnalyzer`] and turns audio
//! frames into spectrum frames. Keeping the analyzer on a single thread is
//! what lets the rest of the application stay multi-threaded without any
//! locking around the scratch buffer.
//!
//! ## Architecture
//! - **Input**: [`AudioFrame`]s from the capture callback (crossbeam channel)
//! - **Output**: [`SpectrumFrame`]s for the display (crossbeam channel)
//! - **Shutdown**: bounded(1) signal channel, joined on [`AnalysisWorker::shutdown`]

use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::analyzer::{SpectrumAnalyzer, bin_count};
use crate::audio::{AudioFrame, FrameSamples};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisResult;

/// Magnitude spectrum and intensity of one analyzed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame {
    /// One magnitude per positive-frequency bin, lowest bin first.
    pub magnitudes: Vec<u16>,
    /// `channels * mean(s²)` of the analyzed channel.
    pub intensity: f32,
    /// Block exponent the frame was analyzed with.
    pub bits: u32,
}

/// Analyzes channel `channel` of an interleaved frame.
///
/// The stride is the frame's channel count, so a stereo frame reports the
/// doubled intensity the analyzer defines for strided access.
pub fn analyze_frame(
    analyzer: &mut SpectrumAnalyzer,
    frame: &AudioFrame,
    channel: usize,
    bits: u32,
) -> AnalysisResult<SpectrumFrame> {
    let stride = frame.channels;
    let mut magnitudes = vec![0u16; bin_count(bits)];

    let intensity = match &frame.samples {
        FrameSamples::I16(samples) => {
            let channel_start = samples.get(channel..).unwrap_or(&[]);
            analyzer.analyze_i16(&mut magnitudes, channel_start, stride, bits)?
        }
        FrameSamples::F32(samples) => {
            let channel_start = samples.get(channel..).unwrap_or(&[]);
            analyzer.analyze_f32(&mut magnitudes, channel_start, stride, bits)?
        }
    };

    Ok(SpectrumFrame { magnitudes, intensity, bits })
}

/// Handle to the analysis thread.
#[derive(Debug)]
pub struct AnalysisWorker {
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    /// Spawns the worker.
    ///
    /// # Returns
    /// * The worker handle and the receiving end for analyzed frames
    pub fn spawn(
        config: &AnalyzerConfig,
        frames_rx: Receiver<AudioFrame>,
    ) -> Result<(Self, Receiver<SpectrumFrame>)> {
        config.validate()?;
        let (spectrum_tx, spectrum_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let channel = config.channel;
        let bits = config.bits;

        let thread_handle = thread::Builder::new()
            .name("spectrum-analysis".into())
            .spawn(move || run(frames_rx, spectrum_tx, shutdown_rx, channel, bits))
            .context("spawning analysis thread")?;

        Ok((
            Self {
                shutdown_tx,
                thread_handle: Some(thread_handle),
            },
            spectrum_rx,
        ))
    }

    /// Signals the thread to stop and waits for it.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let _ = self.shutdown_tx.try_send(());
        if let Some(handle) = self.thread_handle.take() {
            handle.join().map_err(|_| anyhow!("analysis thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("[WORKER] {}", e);
        }
    }
}

fn run(
    frames_rx: Receiver<AudioFrame>,
    spectrum_tx: Sender<SpectrumFrame>,
    shutdown_rx: Receiver<()>,
    channel: usize,
    bits: u32,
) {
    info!("[WORKER] Analysis thread started (bits={}, channel={})", bits, channel);
    let mut analyzer = SpectrumAnalyzer::new();

    loop {
        crossbeam_channel::select! {
            recv(frames_rx) -> msg => match msg {
                Ok(frame) => match analyze_frame(&mut analyzer, &frame, channel, bits) {
                    Ok(spectrum) => {
                        if spectrum_tx.send(spectrum).is_err() {
                            debug!("[WORKER] Spectrum receiver dropped");
                            break;
                        }
                    }
                    Err(e) => warn!("[WORKER] Skipping frame: {}", e),
                },
                Err(_) => {
                    debug!("[WORKER] Audio channel closed");
                    break;
                }
            },
            recv(shutdown_rx) -> _ => {
                debug!("[WORKER] Received shutdown signal");
                break;
            },
        }
    }

    info!("[WORKER] Analysis thread finished");
}
