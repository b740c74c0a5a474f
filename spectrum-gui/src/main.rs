//! # Spectrum - Real-Time Spectrum Analyzer GUI
//!
//! This module contains the main GUI application. It shows the fixed-point
//! magnitude spectrum of the default input device as a bar chart, plus a
//! level meter for the block intensity.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Audio Thread**: Owns the CPAL stream and cuts it into frames
//! - **Analysis Thread**: `AnalysisWorker` owning the spectrum analyzer
//! - **Communication**: Crossbeam channels for thread-safe data exchange
//! - **Updates**: 60 FPS continuous updates via subscription system

mod ui;
mod widgets;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use cpal::traits::StreamTrait;
use iced::{self, Element, Subscription, Task, Theme};
use std::thread::{self, JoinHandle};
use spectrum_core::{
    audio::{self, AudioFrame, StreamInfo},
    config::AnalyzerConfig,
    display,
    worker::AnalysisWorker,
    SpectrumFrame,
};
use tracing::{error, info, warn};
use ui::main_display::create_main_view;

/// Number of bars drawn in the spectrum panel.
const BAR_COUNT: usize = 96;

/// Settings file read at startup and written by "Save Settings".
const CONFIG_PATH: &str = "spectrum.json";

/// Main entry point for the Spectrum application.
///
/// Loads the settings, installs logging and starts the Iced application
/// with the audio pipeline running.
pub fn main() -> iced::Result {
    let (config, config_error) = match AnalyzerConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => (config, None),
        Err(e) => (AnalyzerConfig::default(), Some(e)),
    };

    let level = config.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Some(e) = config_error {
        warn!("[MAIN] Ignoring {}: {:#}", CONFIG_PATH, e);
    }

    info!("[MAIN] Starting Spectrum application...");
    let result = iced::application("Spectrum", SpectrumApp::update, SpectrumApp::view)
        .subscription(SpectrumApp::subscription)
        .theme(SpectrumApp::theme)
        .run_with(move || (SpectrumApp::new(config), Task::none()));
    info!("[MAIN] Application finished with result: {:?}", result);
    result
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    // Working tool visibility toggles
    ToggleSpectrum,           // Show/hide spectrum panel
    ToggleMeter,              // Show/hide intensity meter
    ToggleFreeze,             // Hold the current display

    SaveConfig,               // Write the current settings to CONFIG_PATH
    Exit,                     // Application exit request

    // Continuous update message
    Tick,                     // Timer tick for real-time updates
}

/// UI-specific data needed for rendering the interface.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    // Audio state
    pub audio_active: bool,
    pub status: Option<String>,
    pub stream_info: Option<StreamInfo>,
    pub bits: u32,

    // Latest display values
    pub bar_heights: Vec<f32>,
    pub intensity_db: Option<f32>,

    // UI visibility states
    pub spectrum_visible: bool,
    pub meter_visible: bool,
    pub frozen: bool,
}

/// Main application state.
struct SpectrumApp {
    config: AnalyzerConfig,
    audio_session: Option<AudioSession>,
    analysis_worker: Option<AnalysisWorker>,
    spectrum_receiver: Option<Receiver<SpectrumFrame>>,
    info_receiver: Option<Receiver<StreamInfo>>,

    // Single source of truth for all display data
    display_data: AppDisplayData,
}

/// Audio thread management structure.
///
/// The CPAL stream lives on its own thread for its whole life, so the GUI
/// never has to hold it.
struct AudioSession {
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
}

impl SpectrumApp {
    fn new(config: AnalyzerConfig) -> Self {
        let mut app = Self::idle(config);

        info!("[MAIN] Starting audio processing...");
        if let Err(e) = app.start_audio_processing() {
            error!("[MAIN] Could not start audio processing: {:#}", e);
            app.display_data.status = Some(format!("Audio unavailable: {}", e));
        }
        app
    }

    /// Application state with no audio pipeline attached.
    fn idle(config: AnalyzerConfig) -> Self {
        Self {
            display_data: AppDisplayData {
                audio_active: false,
                status: None,
                stream_info: None,
                bits: config.bits,
                bar_heights: vec![0.0; BAR_COUNT],
                intensity_db: None,
                spectrum_visible: config.show_spectrum,
                meter_visible: config.show_meter,
                frozen: false,
            },
            config,
            audio_session: None,
            analysis_worker: None,
            spectrum_receiver: None,
            info_receiver: None,
        }
    }

    /// Starts the analysis worker and the audio thread feeding it.
    fn start_audio_processing(&mut self) -> anyhow::Result<()> {
        let (frames_tx, frames_rx) = crossbeam_channel::bounded::<AudioFrame>(8);
        let (worker, spectrum_rx) = AnalysisWorker::spawn(&self.config, frames_rx)?;

        let (info_tx, info_rx) = crossbeam_channel::bounded(1);
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
        let config = self.config.clone();

        let thread_handle = thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || {
                info!("[AUDIO-THREAD] Attempting to start audio capture...");
                let (stream, stream_info) = match audio::start_audio_capture(&config, frames_tx) {
                    Ok(tuple) => tuple,
                    Err(e) => {
                        error!("[AUDIO-THREAD] Fatal Error starting audio: {:#}", e);
                        return;
                    }
                };
                let _ = info_tx.send(stream_info);

                // Block until the GUI asks us to stop.
                let _ = shutdown_rx.recv();

                info!("[AUDIO-THREAD] Stopping stream and exiting...");
                if let Err(e) = stream.pause() {
                    warn!("[AUDIO-THREAD] Error pausing stream: {}", e);
                }
                drop(stream);
            })?;

        self.audio_session = Some(AudioSession {
            shutdown_tx,
            thread_handle: Some(thread_handle),
        });
        self.analysis_worker = Some(worker);
        self.spectrum_receiver = Some(spectrum_rx);
        self.info_receiver = Some(info_rx);
        self.display_data.audio_active = true;
        Ok(())
    }

    /// Stops the audio thread first so no more frames arrive, then the worker.
    fn stop_audio_processing(&mut self) {
        if let Some(mut session) = self.audio_session.take() {
            let _ = session.shutdown_tx.send(());
            if let Some(handle) = session.thread_handle.take() {
                if handle.join().is_err() {
                    error!("[MAIN] Audio thread panicked");
                }
            }
        }
        if let Some(worker) = self.analysis_worker.take() {
            if let Err(e) = worker.shutdown() {
                error!("[MAIN] {:#}", e);
            }
        }
        self.spectrum_receiver = None;
        self.info_receiver = None;
        self.display_data.audio_active = false;
    }

    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Exit => {
                info!("[MAIN] Exit requested - starting cleanup...");
                self.stop_audio_processing();
                return iced::exit();
            }
            Message::ToggleSpectrum => {
                self.display_data.spectrum_visible = !self.display_data.spectrum_visible;
                self.config.show_spectrum = self.display_data.spectrum_visible;
            }
            Message::ToggleMeter => {
                self.display_data.meter_visible = !self.display_data.meter_visible;
                self.config.show_meter = self.display_data.meter_visible;
            }
            Message::ToggleFreeze => {
                self.display_data.frozen = !self.display_data.frozen;
                info!("[MAIN] Display frozen: {}", self.display_data.frozen);
            }
            Message::SaveConfig => match self.config.save(CONFIG_PATH) {
                Ok(()) => info!("[MAIN] Settings saved to {}", CONFIG_PATH),
                Err(e) => error!("[MAIN] Error saving settings: {:#}", e),
            },
            Message::Tick => {
                if let Some(rx) = &self.info_receiver {
                    match rx.try_recv() {
                        Ok(info) => self.display_data.stream_info = Some(info),
                        // The audio thread exited before reporting a stream.
                        Err(TryRecvError::Disconnected) if self.display_data.stream_info.is_none() => {
                            self.stop_audio_processing();
                            self.display_data.status = Some("Audio unavailable, see log".to_string());
                            return Task::none();
                        }
                        Err(_) => {}
                    }
                }

                // Drain everything that arrived since the last tick; only the newest frame is drawn.
                let latest = self
                    .spectrum_receiver
                    .as_ref()
                    .and_then(|rx| rx.try_iter().last());
                if let Some(frame) = latest {
                    self.process_spectrum_frame(frame);
                } else if !self.display_data.frozen {
                    let heights = vec![0.0; self.display_data.bar_heights.len()];
                    display::decay_into(&mut self.display_data.bar_heights, &heights, self.config.decay);
                }
            }
        }
        Task::none()
    }

    /// Applies one analyzed frame to the display state.
    fn process_spectrum_frame(&mut self, frame: SpectrumFrame) {
        if self.display_data.frozen {
            return;
        }
        let heights = display::bar_heights(&frame.magnitudes, BAR_COUNT);
        display::decay_into(&mut self.display_data.bar_heights, &heights, self.config.decay);
        self.display_data.intensity_db = Some(display::intensity_db(frame.intensity));
        self.display_data.bits = frame.bits;
    }

    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    /// Returns a timer subscription that fires every 16ms (60 FPS).
    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(std::time::Duration::from_millis(16)).map(|_| Message::Tick)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

impl Drop for SpectrumApp {
    fn drop(&mut self) {
        self.stop_audio_processing();
    }
}
