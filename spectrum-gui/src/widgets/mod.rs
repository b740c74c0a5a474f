//! # Widgets Module
//!
//! Canvas widgets for the spectrum analyzer display.

pub mod spectrum_bars;
pub mod vu_meter;
