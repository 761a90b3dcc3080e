//! Exact decimal to binary conversion with big integers.
//!
//! The value `N * 10^e` is written as the ratio `N / D`. The
//! numerator is shifted so that the integer quotient holds the
//! mantissa plus one guard bit, and the remainder supplies the
//! sticky bit. Rounding is then exact.

use super::BiasedFp;
use crate::{bignum::Big, float::RawFloat};

/// Returns `(floor(num * 2^shift / den), remainder != 0)`.
fn div_shifted(num: &Big, den: &Big, shift: i32) -> (u64, bool) {
    let (q, r) = if shift >= 0 {
        let mut n = num.clone();
        n.mul_pow2(shift as usize);
        n.div_rem(den)
    } else {
        let mut d = den.clone();
        d.mul_pow2(shift.unsigned_abs() as usize);
        num.div_rem(&d)
    };
    debug_assert!(q.bit_length() <= 64);
    (q.to_u64(), !r.is_zero())
}

/// Rounds `q` with its low guard bit and the `sticky` bit
/// to nearest, ties to even, and drops the guard bit.
fn round_guard(q: u64, sticky: bool) -> u64 {
    let guard = q & 1 == 1;
    let m = q >> 1;
    if guard && (sticky || m & 1 == 1) {
        m + 1
    } else {
        m
    }
}

/// Converts `0.digits * 10^scale` to the nearest float.
///
/// `truncated` means non-zero digits were dropped after
/// `digits`, so the value is slightly greater than shown.
pub(super) fn parse_long_mantissa<F: RawFloat>(digits: &[u8], scale: i32, truncated: bool) -> BiasedFp {
    let mant_bits = F::MANTISSA_EXPLICIT_BITS as i32;
    let hidden = 1u64 << mant_bits;

    let mut num = Big::from_digits(digits);
    let mut e10 = scale - digits.len() as i32;
    if truncated {
        // Any digit strictly between the kept digits and the
        // next unit rounds the same way; no halfway point has
        // that many digits.
        num.mul_small(10).add_small(1);
        e10 -= 1;
    }
    if num.is_zero() {
        return BiasedFp::zero_pow2(0);
    }
    let den = if e10 >= 0 {
        num.mul_pow10(e10 as usize);
        Big::from_u32(1)
    } else {
        Big::pow10(e10.unsigned_abs() as usize)
    };

    // 2^(nbits - dbits - 1) < num / den < 2^(nbits - dbits + 1),
    // so the quotient has `mant_bits + 2` or `mant_bits + 3`
    // bits.
    let log2 = num.bit_length() as i32 - den.bit_length() as i32;
    let mut shift = mant_bits + 2 - log2;
    let (mut q, mut sticky) = div_shifted(&num, &den, shift);
    if q >= hidden << 2 {
        sticky |= q & 1 == 1;
        q >>= 1;
        shift -= 1;
    }
    debug_assert!(q >= hidden << 1 && q < hidden << 2);

    // The value is `q * 2^-shift` with `q` holding the guard
    // bit, so the leading bit is worth `2^(mant_bits + 1 - shift)`.
    let exp = mant_bits + 1 - shift;
    let biased = exp + F::EXPONENT_BIAS;
    if biased <= 0 {
        // Subnormal: redo the division with the fixed
        // subnormal scale plus the guard bit.
        let shift = F::EXPONENT_BIAS - 1 + mant_bits + 1;
        let (q, sticky) = div_shifted(&num, &den, shift);
        let m = round_guard(q, sticky);
        return if m >= hidden {
            BiasedFp { f: 0, e: 1 }
        } else {
            BiasedFp { f: m, e: 0 }
        };
    }

    let mut m = round_guard(q, sticky);
    let mut biased = biased;
    if m == hidden << 1 {
        m >>= 1;
        biased += 1;
    }
    if biased >= F::INFINITE_POWER {
        return BiasedFp::zero_pow2(F::INFINITE_POWER);
    }
    BiasedFp {
        f: m & (hidden - 1),
        e: biased,
    }
}
