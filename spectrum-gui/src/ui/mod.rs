//! # UI Module
//!
//! Layout for the spectrum analyzer application.

pub mod main_display;
