//! # Fixed-Point Primitives
//!
//! Small integer helpers shared by the transform and extraction stages.

/// Fractional bits dropped by the butterfly multiply.
///
/// Twiddles carry 28 fractional bits, so shifting by 29 also halves the
/// product. Together with the averaged top half of each butterfly this
/// scales every stage by 1/2.
pub const TWIDDLE_SHIFT: u32 = 29;

/// Multiplies two fixed-point values, keeping a 64-bit intermediate.
///
/// The product is arithmetic-shifted right by `frac_bits` and truncated
/// back to 32 bits.
#[inline]
pub fn mul_q(a: i32, b: i32, frac_bits: u32) -> i32 {
    ((a as i64 * b as i64) >> frac_bits) as i32
}

/// Floor of the square root of `value`.
///
/// Starts from the float estimate and corrects it, which is exact for the
/// whole `u64` range.
pub fn isqrt(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    let mut root = (value as f64).sqrt() as u64;
    while root.checked_mul(root).is_none_or(|sq| sq > value) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).is_some_and(|sq| sq <= value) {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_q_matches_wide_product() {
        let one = 1 << 28;
        // One in Q28, shifted by 29, halves the other operand.
        assert_eq!(mul_q(1_000_000, one, TWIDDLE_SHIFT), 500_000);
        assert_eq!(mul_q(-1_000_000, one, TWIDDLE_SHIFT), -500_000);
        // Operands whose product overflows 32 bits.
        assert_eq!(mul_q(1 << 27, 1 << 28, TWIDDLE_SHIFT), 1 << 26);
    }

    #[test]
    fn mul_q_rounds_toward_negative_infinity() {
        assert_eq!(mul_q(-1, 1, 1), -1);
        assert_eq!(mul_q(1, 1, 1), 0);
    }

    #[test]
    fn isqrt_is_floor() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(50_000_000), 7071);
        assert_eq!(isqrt(400_000_000), 20_000);
        assert_eq!(isqrt(u64::MAX), u32::MAX as u64);
        for v in 0..10_000u64 {
            let r = isqrt(v);
            assert!(r * r <= v && (r + 1) * (r + 1) > v, "isqrt({v}) = {r}");
        }
    }
}
