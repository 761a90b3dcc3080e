//! Binary float to decimal digits.
//!
//! [`grisu`] handles almost every input with 64-bit
//! arithmetic. When it cannot prove its digits correct the
//! call is redone with [`dragon`], which is exact.

#![allow(clippy::indexing_slicing)]

use log::trace;

use crate::{
    buffer::DigitBuffer,
    float::{Category, RawFloat},
};

mod dragon;
mod grisu;

/// The most significant digits any `f64` needs to round
/// trip.
pub(crate) const MAX_SIG_DIGITS: usize = 17;

/// A finite, non-zero value with the half-way points to its
/// neighbours.
///
/// The value is `mant * 2^exp`. The lower boundary is
/// `(mant - minus) * 2^exp` and the upper boundary is
/// `(mant + plus) * 2^exp`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Decoded {
    pub mant: u64,
    pub minus: u64,
    pub plus: u64,
    pub exp: i16,
    /// Whether the boundaries themselves round to this value,
    /// which is true when the mantissa is even.
    pub inclusive: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum FullDecoded {
    Nan,
    Infinite,
    Zero,
    Finite(Decoded),
}

/// Splits a float into its sign and [`FullDecoded`] form.
pub(crate) fn decode<F: RawFloat>(v: F) -> (bool, FullDecoded) {
    let (mant, exp, negative) = v.integer_decode();
    let inclusive = v.mantissa_field() & 1 == 0;
    let full = match v.category() {
        Category::Nan => FullDecoded::Nan,
        Category::Infinite => FullDecoded::Infinite,
        Category::Zero => FullDecoded::Zero,
        // Neighbours are `mant - 2` and `mant + 2`.
        Category::Subnormal => FullDecoded::Finite(Decoded {
            mant,
            minus: 1,
            plus: 1,
            exp,
            inclusive,
        }),
        // The neighbour below a power of two is half as far
        // away as the one above.
        Category::Normal if v.mantissa_field() == 0 => FullDecoded::Finite(Decoded {
            mant: mant << 2,
            minus: 1,
            plus: 2,
            exp: exp - 2,
            inclusive,
        }),
        Category::Normal => FullDecoded::Finite(Decoded {
            mant: mant << 1,
            minus: 1,
            plus: 1,
            exp: exp - 1,
            inclusive,
        }),
    };
    (negative, full)
}

/// Adds one unit in the last place of the ASCII digits `d`.
///
/// Returns the digit to append if the carry ran off the
/// front, in which case `d` is now `100...0` and the caller
/// must bump the exponent.
pub(crate) fn round_up(d: &mut [u8]) -> Option<u8> {
    match d.iter().rposition(|&c| c != b'9') {
        Some(i) => {
            d[i] += 1;
            d[i + 1..].fill(b'0');
            None
        }
        None if !d.is_empty() => {
            d[0] = b'1';
            d[1..].fill(b'0');
            Some(b'0')
        }
        None => Some(b'1'),
    }
}

/// How many digits to produce.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// The fewest significant digits that convert back to the
    /// same value.
    Shortest,
    /// Exactly this many significant digits, correctly
    /// rounded.
    ///
    /// The count is clamped to the range the buffer can hold.
    Significant(usize),
    /// Every digit down to and including the `n`th digit after
    /// the decimal point, correctly rounded.
    Fractional(u32),
}

fn format_shortest(d: &Decoded, buf: &mut [u8], exact: bool) -> (usize, i16) {
    if !exact {
        if let Some(r) = grisu::format_shortest_opt(d, buf) {
            return r;
        }
        trace!("grisu could not prove shortest digits of {d:?}, using dragon");
    }
    dragon::format_shortest(d, buf)
}

fn format_exact(d: &Decoded, buf: &mut [u8], limit: i16, exact: bool) -> (usize, i16) {
    if !exact {
        if let Some(r) = grisu::format_exact_opt(d, buf, limit) {
            return r;
        }
        trace!(
            "grisu could not round {d:?} to {} digits (limit {limit}), using dragon",
            buf.len()
        );
    }
    dragon::format_exact(d, buf, limit)
}

/// Converts `v` to decimal digits.
///
/// `requested_digits` of `None` produces the shortest digits
/// that round trip; `Some(n)` produces `n` correctly rounded
/// significant digits. If `exact` is set the big integer
/// algorithm is used even where the fast one would do.
///
/// See [`format_float_mode`] for the layout of the result.
pub fn format_float<F: RawFloat>(v: F, requested_digits: Option<u32>, exact: bool) -> DigitBuffer {
    let mode = match requested_digits {
        None => Mode::Shortest,
        Some(n) => Mode::Significant(n as usize),
    };
    format_float_mode(v, mode, exact)
}

/// Converts `v` to decimal digits in the given [`Mode`].
///
/// Trailing zeros are removed. Zero, infinity, and NaN
/// produce an empty buffer that only carries the sign, so
/// callers that care must check [`RawFloat::category`]
/// first.
pub fn format_float_mode<F: RawFloat>(v: F, mode: Mode, exact: bool) -> DigitBuffer {
    let mut out = DigitBuffer::for_float::<F>();
    let (negative, full) = decode(v);
    out.set_negative(negative);
    let FullDecoded::Finite(d) = full else {
        return out;
    };

    let buf = out.spare_mut();
    let (len, exp) = match mode {
        Mode::Shortest => format_shortest(&d, &mut buf[..=MAX_SIG_DIGITS], exact),
        Mode::Significant(n) => {
            let n = n.clamp(1, buf.len());
            format_exact(&d, &mut buf[..n], i16::MIN, exact)
        }
        Mode::Fractional(n) => {
            let limit = -(n.min(i16::MAX as u32) as i16);
            format_exact(&d, buf, limit, exact)
        }
    };
    out.set_len(len);
    out.set_scale(i32::from(exp));
    out.trim_trailing_zeros();
    if out.is_empty() {
        out.set_scale(0);
    }
    out.check_consistency();
    out
}
