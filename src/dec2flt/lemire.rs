//! The Eisel-Lemire algorithm.
//!
//! It computes `w * 10^q` from a 128-bit approximation of
//! `5^q` and reports when the approximation is too coarse to
//! decide the rounding.

#![allow(clippy::indexing_slicing)]

use super::{
    table::{POWER_OF_FIVE_128, SMALLEST_POWER_OF_FIVE},
    BiasedFp,
};
use crate::float::RawFloat;

/// Computes `w * 10^q` rounded to nearest, ties to even.
///
/// Returns a biased exponent of `-1` if the result could not
/// be proven correct.
pub(super) fn compute_float<F: RawFloat>(q: i64, mut w: u64) -> BiasedFp {
    let fp_zero = BiasedFp::zero_pow2(0);
    let fp_inf = BiasedFp::zero_pow2(F::INFINITE_POWER);
    let fp_error = BiasedFp::zero_pow2(-1);

    if w == 0 || q < i64::from(F::SMALLEST_POWER_OF_TEN) {
        return fp_zero;
    } else if q > i64::from(F::LARGEST_POWER_OF_TEN) {
        return fp_inf;
    }

    let mant_bits = F::MANTISSA_EXPLICIT_BITS as i32;
    let lz = w.leading_zeros();
    w <<= lz;
    let (lo, hi) = compute_product_approx(q, w, F::MANTISSA_EXPLICIT_BITS as usize + 3);
    if lo == u64::MAX {
        // The low word may have wrapped. That only matters
        // where an exact halfway case is possible, which
        // needs `5^q` to fit in 128 bits.
        let inside_safe_exponent = (-27..=55).contains(&q);
        if !inside_safe_exponent {
            return fp_error;
        }
    }

    let upperbit = (hi >> 63) as i32;
    let mut mantissa = hi >> (upperbit + 64 - mant_bits - 3);
    let mut power2 = power(q as i32) + upperbit - lz as i32 - F::MINIMUM_EXPONENT;
    if power2 <= 0 {
        if -power2 + 1 >= 64 {
            return fp_zero;
        }
        // Subnormal.
        mantissa >>= -power2 + 1;
        mantissa += mantissa & 1;
        mantissa >>= 1;
        // Rounding up may have produced the smallest normal.
        power2 = i32::from(mantissa >= (1 << mant_bits));
        return BiasedFp {
            f: mantissa & ((1 << mant_bits) - 1),
            e: power2,
        };
    }

    // An exact halfway case: the product was exact, the bit
    // below the mantissa is set, and nothing below it is.
    // Round down to even instead of up.
    if lo <= 1
        && q >= i64::from(F::MIN_EXPONENT_ROUND_TO_EVEN)
        && q <= i64::from(F::MAX_EXPONENT_ROUND_TO_EVEN)
        && mantissa & 3 == 1
        && (mantissa << (upperbit + 64 - mant_bits - 3)) == hi
    {
        mantissa &= !1;
    }

    mantissa += mantissa & 1;
    mantissa >>= 1;
    if mantissa >= (2 << mant_bits) {
        mantissa = 1 << mant_bits;
        power2 += 1;
    }
    mantissa &= !(1 << mant_bits);
    if power2 >= F::INFINITE_POWER {
        return fp_inf;
    }
    BiasedFp {
        f: mantissa,
        e: power2,
    }
}

/// Returns `floor(log2(10^q)) + 63` for every `q` in the
/// power of five table.
///
/// 217706 approximates `log2(10) * 2^16`.
fn power(q: i32) -> i32 {
    (q.wrapping_mul(152_170 + 65536) >> 16) + 63
}

/// Returns the `(lo, hi)` words of `w * 5^q` truncated to 128
/// bits, computing the low word only when the high word
/// leaves fewer than `precision` bits undecided.
fn compute_product_approx(q: i64, w: u64, precision: usize) -> (u64, u64) {
    debug_assert!(precision <= 64);

    let mask = if precision < 64 {
        u64::MAX >> precision
    } else {
        u64::MAX
    };

    let index = (q - i64::from(SMALLEST_POWER_OF_FIVE)) as usize;
    let (hi5, lo5) = POWER_OF_FIVE_128[index];
    let (mut first_lo, mut first_hi) = full_multiplication(w, hi5);
    if first_hi & mask == mask {
        let (_, second_hi) = full_multiplication(w, lo5);
        first_lo = first_lo.wrapping_add(second_hi);
        if second_hi > first_lo {
            first_hi += 1;
        }
    }
    (first_lo, first_hi)
}

/// Returns the `(lo, hi)` words of `a * b`.
fn full_multiplication(a: u64, b: u64) -> (u64, u64) {
    let r = u128::from(a) * u128::from(b);
    (r as u64, (r >> 64) as u64)
}
