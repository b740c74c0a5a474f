//! # Spectrum Extraction
//!
//! Reads the transformed work buffer back in natural frequency order and
//! turns each positive-frequency bin into a display magnitude.

use rustfft::num_complex::Complex;

use crate::fixed::isqrt;
use crate::ingest::INPUT_FRACTION_BITS;
use crate::tables::MAX_BITS;

/// Writes bins `1..=2^bits / 2` into `out[..2^bits / 2]`.
///
/// Each magnitude is `sqrt(|X_i|² · i)`: the squared magnitude is weighted
/// by the bin index so higher bins are not dwarfed on screen. Results above
/// `u16::MAX` saturate.
pub fn extract(out: &mut [u16], work: &[Complex<i32>], permutation: &[u16], bits: u32) {
    let bins = (1usize << bits) / 2;
    let shift = MAX_BITS - bits;

    for (i, slot) in (1..=bins).zip(out.iter_mut()) {
        let index = (permutation[i] >> shift) as usize;
        let value = work[index];
        let re = (value.re >> INPUT_FRACTION_BITS) as i64;
        let im = (value.im >> INPUT_FRACTION_BITS) as i64;
        let weighted = (re * re + im * im) as u64 * i as u64;
        *slot = isqrt(weighted).min(u16::MAX as u64) as u16;
    }
}
