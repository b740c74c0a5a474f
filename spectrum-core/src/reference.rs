//! # Floating-Point Reference Spectrum
//!
//! Computes, with RustFFT in `f64`, the exact quantity the fixed-point
//! engine approximates. Used to check the engine's accuracy.

use rustfft::{FftPlanner, num_complex::Complex};

use crate::analyzer::run_length;

/// Reference magnitudes for one strided channel of 16-bit samples.
///
/// Returns `|X_k| / run * sqrt(k)` for `k` in `1..=run / 2`, where `X` is
/// the forward DFT of the `run = run_length(bits)` samples read every
/// `stride` elements, in 16-bit sample units.
///
/// # Panics
/// * If `stride` is zero or `samples` is shorter than the strided block
pub fn reference_magnitudes(samples: &[i16], stride: usize, bits: u32) -> Vec<f64> {
    assert!(stride > 0, "stride must be at least 1");
    let run = run_length(bits);
    assert!(
        samples.len() > (run - 1) * stride,
        "sample stream too short for the strided block"
    );

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .step_by(stride)
        .take(run)
        .map(|&s| Complex { re: s as f64, im: 0.0 })
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(run);
    fft.process(&mut buffer);

    buffer
        .iter()
        .enumerate()
        .skip(1)
        .take(run / 2)
        .map(|(k, c)| c.norm() / run as f64 * (k as f64).sqrt())
        .collect()
}
