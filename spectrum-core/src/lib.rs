// spectrum-core/src/lib.rs

//! The core logic for the real-time spectrum analyzer.
//! This crate computes fixed-point magnitude spectra and block intensity
//! from PCM audio, captures input and runs the analysis thread. It is
//! completely headless and contains no GUI code.

pub mod analyzer;
pub mod audio;
pub mod config;
pub mod display;
pub mod error;
pub mod extract;
pub mod fixed;
pub mod ingest;
pub mod reference;
pub mod tables;
pub mod transform;
pub mod worker;

pub use analyzer::{SpectrumAnalyzer, bin_count, run_length};
pub use error::{AnalysisError, AnalysisResult, ErrorKind};
pub use ingest::Sample;
pub use tables::{MAX_BITS, MAX_SIZE};
pub use worker::SpectrumFrame;
