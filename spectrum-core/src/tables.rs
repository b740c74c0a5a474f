//! # Transform Tables
//!
//! Twiddle factors and the bit-reversal permutation for the largest
//! supported block. Smaller blocks index into the same tables: the
//! transform strides through the twiddles and extraction shifts the
//! permutation entries down.
//!
//! The tables are built once per process and never change afterwards.
//! [`Tables::shared`] hands out the single `'static` copy; the first call
//! builds it under a thread-safe one-time cell.

use once_cell::sync::OnceCell;
use rustfft::num_complex::Complex;
use tracing::debug;

/// Exponent of the largest supported block.
pub const MAX_BITS: u32 = 11;

/// Largest supported block length (`2^MAX_BITS`).
pub const MAX_SIZE: usize = 1 << MAX_BITS;

/// Scale applied to the cosine and sine values (Q28).
pub const TWIDDLE_SCALE: f64 = (1u64 << 28) as f64;

static SHARED: OnceCell<Tables> = OnceCell::new();

/// Precomputed twiddle and permutation tables for `MAX_SIZE`.
pub struct Tables {
    twiddles: Box<[Complex<i32>]>,
    permutation: Box<[u16]>,
}

impl Tables {
    /// Builds a fresh set of tables.
    pub fn build() -> Self {
        Self {
            twiddles: build_twiddles(),
            permutation: build_permutation(),
        }
    }

    /// Returns the process-wide tables, building them on the first call.
    pub fn shared() -> &'static Tables {
        SHARED.get_or_init(|| {
            debug!("[TABLES] Building twiddle and permutation tables for N={}", MAX_SIZE);
            Tables::build()
        })
    }

    /// `MAX_SIZE / 2` twiddles, entry `k` holding `(cos, sin)(2πk / MAX_SIZE)`.
    pub fn twiddles(&self) -> &[Complex<i32>] {
        &self.twiddles
    }

    /// `MAX_SIZE` entries, entry `i` holding `i` with its `MAX_BITS` bits reversed.
    pub fn permutation(&self) -> &[u16] {
        &self.permutation
    }
}

/// Builds the half-period twiddle table from a directly computed quarter.
///
/// The second quadrant reuses the first through
/// `cos(π/2 + x) = -sin(x)` and `sin(π/2 + x) = cos(x)`.
fn build_twiddles() -> Box<[Complex<i32>]> {
    let quarter = MAX_SIZE / 4;
    let mut table = vec![Complex::new(0i32, 0i32); MAX_SIZE / 2];

    for (k, slot) in table.iter_mut().take(quarter).enumerate() {
        let theta = 2.0 * std::f64::consts::PI * k as f64 / MAX_SIZE as f64;
        *slot = Complex::new(
            (theta.cos() * TWIDDLE_SCALE) as i32,
            (theta.sin() * TWIDDLE_SCALE) as i32,
        );
    }

    for m in 0..quarter {
        let base = table[m];
        table[quarter + m] = Complex::new(-base.im, base.re);
    }

    table.into_boxed_slice()
}

/// Builds the permutation with the carry-chain "next reversed index" step.
fn build_permutation() -> Box<[u16]> {
    let mut table = vec![0u16; MAX_SIZE];
    let mut j = 0usize;

    for slot in table.iter_mut() {
        *slot = j as u16;
        let mut k = MAX_SIZE >> 1;
        while k != 0 && k <= j {
            j -= k;
            k >>= 1;
        }
        j += k;
    }

    table.into_boxed_slice()
}

/// Reverses the low `bits` bits of `index`.
pub fn reverse_bits(index: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    index.reverse_bits() >> (usize::BITS - bits)
}
