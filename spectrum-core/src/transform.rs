//! # Butterfly Transform
//!
//! In-place radix-2 transform over the first `2^bits` slots of the work
//! buffer. Input is in natural order, output is left in bit-reversed order
//! and scaled by `2^-bits`: each stage averages the top of a butterfly and
//! halves the rotated difference at the bottom, so the fixed-point values
//! never grow.

use rustfft::num_complex::Complex;

use crate::fixed::{TWIDDLE_SHIFT, mul_q};
use crate::tables::{MAX_BITS, MAX_SIZE};

/// Transforms `work[..2^bits]` in place using the shared `twiddles`.
///
/// `twiddles` is the `MAX_SIZE / 2` table; a block of `2^bits` uses every
/// `2^(MAX_BITS - bits)`-th entry at its coarsest stage. `bits` must not
/// exceed `MAX_BITS` and `work` must hold at least `2^bits` slots.
pub fn transform(work: &mut [Complex<i32>], twiddles: &[Complex<i32>], bits: u32) {
    debug_assert!(bits <= MAX_BITS);
    let full = 1usize << bits;
    let work = &mut work[..full];

    for stage in (MAX_BITS - bits)..MAX_BITS {
        let half = (MAX_SIZE / 2) >> stage;
        for j in 0..half {
            let w = twiddles[j << stage];
            for base in (0..full).step_by(2 * half) {
                let top = base + j;
                let bottom = top + half;
                let a = work[top];
                let b = work[bottom];
                work[top] = average(a, b);
                work[bottom] = rotate(a - b, w);
            }
        }
    }
}

/// `(a + b) >> 1` per component.
#[inline]
fn average(a: Complex<i32>, b: Complex<i32>) -> Complex<i32> {
    Complex::new((a.re + b.re) >> 1, (a.im + b.im) >> 1)
}

/// Complex product of the difference and a Q28 twiddle, halved.
#[inline]
fn rotate(d: Complex<i32>, w: Complex<i32>) -> Complex<i32> {
    Complex::new(
        mul_q(d.re, w.re, TWIDDLE_SHIFT) - mul_q(d.im, w.im, TWIDDLE_SHIFT),
        mul_q(d.re, w.im, TWIDDLE_SHIFT) + mul_q(d.im, w.re, TWIDDLE_SHIFT),
    )
}
