//! # Sample Ingestion
//!
//! Converts one channel of an interleaved PCM block into the fixed-point
//! work buffer and measures the block's power on the way.

use rustfft::num_complex::Complex;

/// Fractional bits given to input samples in the work buffer.
pub const INPUT_FRACTION_BITS: u32 = 12;

/// Full-scale value of a 16-bit sample.
const FULL_SCALE: f32 = 32768.0;

/// A PCM sample the analyzer can ingest.
pub trait Sample: Copy {
    /// Maps the sample into `[-1.0, 1.0]`.
    fn normalize(self) -> f32;
}

impl Sample for i16 {
    #[inline]
    fn normalize(self) -> f32 {
        self as f32 / FULL_SCALE
    }
}

impl Sample for f32 {
    /// Clamps to `[-1.0, 1.0]`; NaN becomes silence.
    #[inline]
    fn normalize(self) -> f32 {
        if self.is_nan() { 0.0 } else { self.clamp(-1.0, 1.0) }
    }
}

/// Loads `work.len()` samples, read every `stride` elements, into `work`.
///
/// Returns the intensity `stride * Σ s² / work.len()` of the normalized
/// samples. The stride factor is kept on purpose: reading one channel of
/// a stereo stream reports twice the power of the same samples read mono.
///
/// The caller guarantees `stride > 0` and that `samples` holds at least
/// `(work.len() - 1) * stride + 1` elements.
pub fn ingest<S: Sample>(work: &mut [Complex<i32>], samples: &[S], stride: usize) -> f32 {
    let full = work.len();
    if full == 0 {
        return 0.0;
    }

    let mut sum_sq = 0.0f32;
    for (slot, &sample) in work.iter_mut().zip(samples.iter().step_by(stride)) {
        let norm = sample.normalize();
        sum_sq += norm * norm;
        *slot = Complex::new(((norm * FULL_SCALE) as i32) << INPUT_FRACTION_BITS, 0);
    }

    stride as f32 * sum_sq / full as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_samples_keep_their_value() {
        let mut work = vec![Complex::new(7, 7); 4];
        let intensity = ingest(&mut work, &[0i16, 10_000, -32_768, 32_767], 1);
        assert_eq!(work[0], Complex::new(0, 0));
        assert_eq!(work[1], Complex::new(10_000 << 12, 0));
        assert_eq!(work[2], Complex::new(-32_768 << 12, 0));
        assert_eq!(work[3], Complex::new(32_767 << 12, 0));
        assert!(intensity > 0.0);
    }

    #[test]
    fn float_samples_are_clamped() {
        let mut work = vec![Complex::new(0, 0); 4];
        ingest(&mut work, &[2.0f32, -3.0, 0.5, f32::NAN], 1);
        assert_eq!(work[0].re, 32_768 << 12);
        assert_eq!(work[1].re, -32_768 << 12);
        assert_eq!(work[2].re, 16_384 << 12);
        assert_eq!(work[3].re, 0);
    }

    #[test]
    fn stride_selects_one_channel_and_scales_intensity() {
        let interleaved = [16_384i16, -1, 16_384, -1, 16_384, -1, 16_384];
        let mut work = vec![Complex::new(0, 0); 4];
        let stereo = ingest(&mut work, &interleaved, 2);
        assert!(work.iter().all(|c| c.re == 16_384 << 12));

        let mono = ingest(&mut work, &[16_384i16; 4], 1);
        assert!((mono - 0.25).abs() < 1e-6);
        assert!((stereo - 2.0 * mono).abs() < 1e-6);
    }

    #[test]
    fn empty_block_has_no_intensity() {
        let mut work: Vec<Complex<i32>> = Vec::new();
        assert_eq!(ingest(&mut work, &[1i16, 2, 3], 1), 0.0);
    }
}
