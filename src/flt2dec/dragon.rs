//! Exact digit generation with big integers.
//!
//! This is the Steele & White / Burger & Dybvig algorithm.
//! It always succeeds, so it backs up [`grisu`][super::grisu].

#![allow(clippy::indexing_slicing)]

use core::cmp::Ordering;

use super::{round_up, Decoded, MAX_SIG_DIGITS};
use crate::bignum::Big;

/// `2 * 10^n` for `n` in `0..=9`.
const TWO_POW10: [u32; 10] = [
    2,
    20,
    200,
    2000,
    20000,
    200000,
    2000000,
    20000000,
    200000000,
    2000000000,
];

/// Computes `x /= 2 * 10^n`, truncating.
fn div_2pow10(x: &mut Big, mut n: usize) -> &mut Big {
    const LARGEST: usize = 9;
    while n > LARGEST {
        x.div_rem_small(1_000_000_000);
        n -= LARGEST;
    }
    x.div_rem_small(TWO_POW10[n]);
    x
}

/// Returns `k` with `10^(k-1) < mant * 2^exp <= 10^(k+1)`.
pub(super) fn estimate_scaling_factor(mant: u64, exp: i16) -> i16 {
    // 2^(nbits-1) < mant <= 2^nbits
    let nbits = 64 - i64::from((mant - 1).leading_zeros());
    // 1292913986 = floor(2^32 * log10(2)), so this never
    // overestimates.
    (((nbits + i64::from(exp)) * 1292913986) >> 32) as i16
}

/// Returns `x * 2^exp` scaled up by `10^-k` when `k` is
/// negative.
fn numerator(x: u64, exp: i16, k: i16) -> Big {
    let mut n = Big::from_u64(x);
    if exp > 0 {
        n.mul_pow2(exp as usize);
    }
    if k < 0 {
        n.mul_pow10(usize::from(k.unsigned_abs()));
    }
    n
}

/// Returns the common denominator that goes with
/// [`numerator`]: `2^-exp * 10^k`.
fn denominator(exp: i16, k: i16) -> Big {
    let mut scale = Big::from_u32(1);
    if exp < 0 {
        scale.mul_pow2(usize::from(exp.unsigned_abs()));
    }
    if k > 0 {
        scale.mul_pow10(k as usize);
    }
    scale
}

/// Returns `floor(x / scale)` and leaves the remainder in `x`.
///
/// `x` must be less than `10 * scale`. `scaleN` is
/// `N * scale`.
fn div_rem_upto_16(x: &mut Big, scale: &Big, scale2: &Big, scale4: &Big, scale8: &Big) -> u8 {
    let mut d = 0;
    if *x >= *scale8 {
        x.sub(scale8);
        d += 8;
    }
    if *x >= *scale4 {
        x.sub(scale4);
        d += 4;
    }
    if *x >= *scale2 {
        x.sub(scale2);
        d += 2;
    }
    if *x >= *scale {
        x.sub(scale);
        d += 1;
    }
    debug_assert!(*x < *scale);
    d
}

fn multiples(scale: &Big) -> (Big, Big, Big) {
    let mut scale2 = scale.clone();
    scale2.mul_pow2(1);
    let mut scale4 = scale.clone();
    scale4.mul_pow2(2);
    let mut scale8 = scale.clone();
    scale8.mul_pow2(3);
    (scale2, scale4, scale8)
}

/// Writes the shortest digits of `d` that round trip into
/// `buf` and returns `(len, exp)`.
pub(super) fn format_shortest(d: &Decoded, buf: &mut [u8]) -> (usize, i16) {
    assert!(d.mant > 0);
    assert!(d.minus > 0);
    assert!(d.plus > 0);
    assert!(d.mant.checked_add(d.plus).is_some());
    assert!(d.mant.checked_sub(d.minus).is_some());
    assert!(buf.len() > MAX_SIG_DIGITS);

    // `a.cmp(&b) < rounding` is `a <= b` if the boundaries
    // belong to this value and `a < b` otherwise.
    let rounding = if d.inclusive {
        Ordering::Greater
    } else {
        Ordering::Equal
    };

    let mut k = estimate_scaling_factor(d.mant + d.plus, d.exp);

    // v = mant / scale, low = (mant - minus) / scale,
    // high = (mant + plus) / scale.
    let mut mant = numerator(d.mant, d.exp, k);
    let mut minus = numerator(d.minus, d.exp, k);
    let mut plus = numerator(d.plus, d.exp, k);
    let scale = denominator(d.exp, k);

    // Fix up the underestimate so that
    // `scale < mant + plus <= 10 * scale`.
    if scale.cmp(mant.clone().add(&plus)) < rounding {
        k += 1;
    } else {
        mant.mul_small(10);
        minus.mul_small(10);
        plus.mul_small(10);
    }

    let (scale2, scale4, scale8) = multiples(&scale);

    let mut down;
    let mut up;
    let mut i = 0;
    loop {
        let digit = div_rem_upto_16(&mut mant, &scale, &scale2, &scale4, &scale8);
        debug_assert!(digit < 10);
        buf[i] = b'0' + digit;
        i += 1;

        // Stop once the digits so far, possibly with the last
        // one bumped, land inside the rounding interval.
        down = mant.cmp(&minus) < rounding;
        up = scale.cmp(mant.clone().add(&plus)) < rounding;
        if down || up {
            break;
        }

        mant.mul_small(10);
        minus.mul_small(10);
        plus.mul_small(10);
    }

    // Pick the closer candidate. An exact tie rounds up.
    if up && (!down || *mant.mul_pow2(1) >= scale) {
        if let Some(c) = round_up(&mut buf[..i]) {
            buf[i] = c;
            i += 1;
            k += 1;
        }
    }
    (i, k)
}

/// Writes `buf.len()` correctly rounded digits of `d` into
/// `buf`, stopping early at the digit for `10^limit`. Ties
/// round to even.
///
/// Returns `(len, exp)`.
pub(super) fn format_exact(d: &Decoded, buf: &mut [u8], limit: i16) -> (usize, i16) {
    assert!(d.mant > 0);
    assert!(d.minus > 0);
    assert!(d.plus > 0);
    assert!(d.mant.checked_add(d.plus).is_some());
    assert!(d.mant.checked_sub(d.minus).is_some());

    let mut k = estimate_scaling_factor(d.mant, d.exp);
    let mut mant = numerator(d.mant, d.exp, k);
    let mut scale = denominator(d.exp, k);

    // Fix up `k` the same way, except that the upper boundary
    // is half a unit of the last requested digit. Rounding
    // that half unit down keeps the big integers small.
    if *div_2pow10(&mut scale.clone(), buf.len()).add(&mant) >= scale {
        k += 1;
    } else {
        mant.mul_small(10);
    }

    // Stop at `limit` up front; rounding twice would be wrong.
    let mut len = if k < limit {
        0
    } else if ((i32::from(k) - i32::from(limit)) as usize) < buf.len() {
        (k - limit) as usize
    } else {
        buf.len()
    };

    if len > 0 {
        let (scale2, scale4, scale8) = multiples(&scale);
        for i in 0..len {
            if mant.is_zero() {
                // The rest is exact zeros and needs no rounding.
                buf[i..len].fill(b'0');
                return (len, k);
            }
            let digit = div_rem_upto_16(&mut mant, &scale, &scale2, &scale4, &scale8);
            debug_assert!(digit < 10);
            buf[i] = b'0' + digit;
            mant.mul_small(10);
        }
    }

    // `mant` is now ten times the remainder, so compare it
    // with five times the scale. Exact halves go to even.
    let order = mant.cmp(scale.mul_small(5));
    if order == Ordering::Greater
        || (order == Ordering::Equal && len > 0 && buf[len - 1] & 1 == 1)
    {
        if let Some(c) = round_up(&mut buf[..len]) {
            k += 1;
            // The carry adds a digit only when one more is
            // allowed.
            if k > limit && len < buf.len() {
                buf[len] = c;
                len += 1;
            }
        }
    }
    (len, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_scaling_factor() {
        // 10^(k-1) < v <= 10^(k+1)
        let tests: &[(u64, i16)] = &[
            (1, 0),
            (9, 0),
            (10, 0),
            (1 << 52, -52),
            (123456789, -20),
            (u64::MAX, 100),
            (1, -1074),
        ];
        for &(mant, exp) in tests {
            let k = i32::from(estimate_scaling_factor(mant, exp));
            let log = (mant as f64).log10() + f64::from(exp) * 2f64.log10();
            assert!(
                f64::from(k - 1) < log + 1e-9 && log <= f64::from(k + 1) + 1e-9,
                "estimate_scaling_factor({mant}, {exp}) = {k}, log10 = {log}"
            );
        }
    }

    #[test]
    fn test_div_2pow10() {
        let mut x = Big::pow10(30);
        div_2pow10(&mut x, 12);
        assert_eq!(x, Big::from_u64(5 * 10u64.pow(17)));

        let mut x = Big::from_u32(7);
        div_2pow10(&mut x, 0);
        assert_eq!(x, Big::from_u32(3));
    }
}
