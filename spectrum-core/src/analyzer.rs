//! # Spectrum Analyzer
//!
//! The analyzer context ties the pipeline together: it owns the scratch
//! buffer, borrows the shared tables, validates each request and runs
//! ingestion, the butterfly transform and extraction back to back.
//!
//! ## Usage
//! ```
//! use spectrum_core::SpectrumAnalyzer;
//!
//! let mut analyzer = SpectrumAnalyzer::new();
//! let samples = [0i16, 10_000, 0, -10_000, 0, 10_000, 0, -10_000];
//! let mut magnitudes = [0u16; 4];
//! let intensity = analyzer.analyze_i16(&mut magnitudes, &samples, 1, 3).unwrap();
//! assert_eq!(magnitudes, [0, 7071, 0, 0]);
//! assert!(intensity > 0.0);
//! ```

use rustfft::num_complex::Complex;
use tracing::trace;

use crate::error::{AnalysisError, AnalysisResult};
use crate::extract::extract;
use crate::ingest::{Sample, ingest};
use crate::tables::{MAX_BITS, MAX_SIZE, Tables};
use crate::transform::transform;

/// Number of samples analyzed for a block exponent: `min(2^bits, MAX_SIZE)`.
pub fn run_length(bits: u32) -> usize {
    if bits >= MAX_BITS { MAX_SIZE } else { 1 << bits }
}

/// Number of positive-frequency bins produced for a block exponent.
pub fn bin_count(bits: u32) -> usize {
    run_length(bits) / 2
}

/// Fixed-point magnitude spectrum analyzer.
///
/// Every analysis call takes `&mut self`, so one analyzer can only be
/// driven by one thread at a time. Separate analyzers share the read-only
/// tables and can run in parallel.
pub struct SpectrumAnalyzer {
    tables: &'static Tables,
    work: Box<[Complex<i32>]>,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    /// Creates an analyzer. The shared tables are built here if this is
    /// the first analyzer in the process, never during a call.
    pub fn new() -> Self {
        Self {
            tables: Tables::shared(),
            work: vec![Complex::new(0, 0); MAX_SIZE].into_boxed_slice(),
        }
    }

    /// Analyzes 16-bit integer samples. See [`SpectrumAnalyzer::analyze`].
    pub fn analyze_i16(
        &mut self,
        out: &mut [u16],
        samples: &[i16],
        stride: usize,
        bits: u32,
    ) -> AnalysisResult<f32> {
        self.analyze(out, samples, stride, bits)
    }

    /// Analyzes float samples, clamping them to `[-1.0, 1.0]`.
    /// See [`SpectrumAnalyzer::analyze`].
    pub fn analyze_f32(
        &mut self,
        out: &mut [u16],
        samples: &[f32],
        stride: usize,
        bits: u32,
    ) -> AnalysisResult<f32> {
        self.analyze(out, samples, stride, bits)
    }

    /// Computes the magnitude spectrum of one channel of `samples`.
    ///
    /// Reads `run_length(bits)` samples starting at `samples[0]`, every
    /// `stride` elements, and fills `out[..bin_count(bits)]` in natural
    /// frequency order (slot 0 is the lowest bin above DC). Returns the
    /// block intensity `stride * mean(s²)` of the normalized samples.
    ///
    /// # Errors
    /// Returns an [`AnalysisError`] without touching `out` when `bits`
    /// exceeds [`MAX_BITS`], `stride` is zero, `samples` is too short for
    /// the strided block or `out` cannot hold every bin.
    pub fn analyze<S: Sample>(
        &mut self,
        out: &mut [u16],
        samples: &[S],
        stride: usize,
        bits: u32,
    ) -> AnalysisResult<f32> {
        let full = validate(out.len(), samples.len(), stride, bits)?;

        let work = &mut self.work[..full];
        let intensity = ingest(work, samples, stride);
        transform(&mut self.work, self.tables.twiddles(), bits);
        extract(out, &self.work, self.tables.permutation(), bits);

        trace!(bits, stride, intensity, "analyzed block");
        Ok(intensity)
    }
}

/// Checks a request and returns its run length.
fn validate(out_len: usize, samples_len: usize, stride: usize, bits: u32) -> AnalysisResult<usize> {
    if bits > MAX_BITS {
        return Err(AnalysisError::InvalidBits { bits, max: MAX_BITS });
    }
    if stride == 0 {
        return Err(AnalysisError::InvalidStride);
    }

    let full = run_length(bits);
    // A stride too large to address the block can never be satisfied.
    let needed = (full - 1)
        .checked_mul(stride)
        .and_then(|last| last.checked_add(1))
        .unwrap_or(usize::MAX);
    if samples_len < needed {
        return Err(AnalysisError::InsufficientSamples { needed, available: samples_len });
    }

    let bins = full / 2;
    if out_len < bins {
        return Err(AnalysisError::OutputTooSmall { needed: bins, available: out_len });
    }

    Ok(full)
}
