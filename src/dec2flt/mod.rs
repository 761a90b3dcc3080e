//! Decimal digits to binary float.
//!
//! Conversion tries, in order:
//!
//! 1. Clinger's fast path, when the mantissa and the power of
//!    ten are both exact native floats.
//! 2. The Eisel-Lemire algorithm, which settles almost
//!    everything else with one or two 64-bit products.
//! 3. An exact big integer division.

#![allow(clippy::indexing_slicing)]

use log::trace;

use crate::{buffer::DigitBuffer, float::RawFloat};

mod lemire;
mod slow;
mod table;

/// A float as its explicit mantissa and biased exponent.
///
/// A biased exponent of `-1` means the value is not known.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct BiasedFp {
    /// The explicit mantissa bits.
    pub f: u64,
    /// The biased binary exponent.
    pub e: i32,
}

impl BiasedFp {
    pub const fn zero_pow2(e: i32) -> Self {
        Self { f: 0, e }
    }
}

/// The most decimal digits that always fit in a `u64`.
const MAX_MANTISSA_DIGITS: usize = 19;

/// Converts `w * 10^q` to the nearest float.
///
/// `many_digits` means `w` is the truncated prefix of a
/// longer digit string.
fn convert<F: RawFloat>(w: u64, q: i64, many_digits: bool) -> Option<BiasedFp> {
    let fp = lemire::compute_float::<F>(q, w);
    // If rounding `w` and `w + 1` agree, so does every digit
    // string between them.
    if fp.e < 0 || (many_digits && fp != lemire::compute_float::<F>(q, w + 1)) {
        return None;
    }
    Some(fp)
}

/// Converts a parsed number to the nearest float, rounding
/// ties to even.
///
/// Values too large for `F` become infinity and values too
/// small become zero, both with the number's sign.
pub fn number_to_float<F: RawFloat>(number: &DigitBuffer) -> F {
    let negative = number.is_negative();
    let digits = number.digits();
    let scale = number.scale();

    if digits.is_empty() || scale < F::SMALLEST_POWER_OF_TEN {
        return F::zero(negative);
    }
    // The value is at least `10^(scale - 1)`.
    if scale - 1 > F::LARGEST_POWER_OF_TEN {
        return F::infinity(negative);
    }

    let (head, tail) = digits.split_at(digits.len().min(MAX_MANTISSA_DIGITS));
    let w = head
        .iter()
        .fold(0u64, |acc, &d| acc * 10 + u64::from(d - b'0'));
    let q = i64::from(scale) - head.len() as i64;
    let many_digits = number.has_nonzero_tail() || tail.iter().any(|&d| d != b'0');

    if !many_digits {
        if let Some(v) = F::try_fast_path(w, q) {
            return v.with_sign(negative);
        }
    }

    let fp = convert::<F>(w, q, many_digits).unwrap_or_else(|| {
        trace!("eisel-lemire could not round {number:?}, using big integers");
        slow::parse_long_mantissa::<F>(digits, scale, number.has_nonzero_tail())
    });
    F::from_parts(negative, fp.e, fp.f)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;
    use crate::{
        buffer::Kind,
        flt2dec::{format_float, format_float_mode, Mode},
        float::f16,
    };

    fn number(digits: &str, scale: i32, negative: bool) -> DigitBuffer {
        let mut b = DigitBuffer::new(Kind::FloatingPoint, DigitBuffer::MAX_CAPACITY);
        for d in digits.bytes() {
            assert!(b.push(d));
        }
        b.set_scale(scale);
        b.set_negative(negative);
        b
    }

    #[test]
    fn test_number_to_float() {
        let tests: &[(&str, i32, f64)] = &[
            ("", 0, 0.0),
            ("1", 1, 1.0),
            ("15", 0, 0.15),
            ("1", 24, 1e23),
            ("8", 0, 0.8),
            ("17976931348623157", 309, f64::MAX),
            ("17976931348623159", 309, f64::INFINITY),
            ("4", -323, 5e-324),
            ("2", -323, 0.0),
            ("1", 400, f64::INFINITY),
            ("1", -400, 0.0),
            ("9007199254740993", 16, 9007199254740992.0),
            ("123456789012345678901234567890", 30, 1.2345678901234568e29),
        ];
        for &(digits, scale, want) in tests {
            let got: f64 = number_to_float(&number(digits, scale, false));
            assert_eq!(got.to_bits(), want.to_bits(), "0.{digits}e{scale}");
            let got: f64 = number_to_float(&number(digits, scale, true));
            assert_eq!(got.to_bits(), (-want).to_bits(), "-0.{digits}e{scale}");
        }
    }

    #[test]
    fn test_nonzero_tail() {
        // 2^53 + 1 ties to even; a non-zero tail breaks the tie.
        let mut b = number("9007199254740993", 16, false);
        b.set_nonzero_tail(true);
        assert_eq!(number_to_float::<f64>(&b), 9007199254740994.0);
    }

    #[test]
    fn test_halfway_round_to_even() {
        // 1 + 2^-53 lies halfway between 1 and 1 + 2^-52.
        let half = "100000000000000011102230246251565404236316680908203125";
        assert_eq!(number_to_float::<f64>(&number(half, 1, false)), 1.0);
        // The next halfway point up rounds to the even side,
        // which is above.
        let half = "100000000000000033306690738754696212708950042724609375";
        assert_eq!(number_to_float::<f64>(&number(half, 1, false)), 1.0000000000000004);
    }

    macro_rules! round_trip_tests {
        ($($name:ident => $ty:ty, $bits:ty;)*) => {
            $(
                #[test]
                fn $name() {
                    let mut rng = SmallRng::seed_from_u64(0x7a11);
                    for _ in 0..20_000 {
                        let v = <$ty>::from_bits(rng.gen::<$bits>());
                        if v.is_nan() || v.is_infinite() {
                            continue;
                        }
                        for mode in [Mode::Shortest, Mode::Significant(40)] {
                            let b = format_float_mode(v, mode, false);
                            let got: $ty = number_to_float(&b);
                            assert_eq!(got.to_bits(), v.to_bits(), "{v:e} {mode:?}");
                        }
                    }
                }
            )*
        };
    }
    round_trip_tests! {
        test_round_trip_f32 => f32, u32;
        test_round_trip_f64 => f64, u64;
    }

    #[test]
    fn test_round_trip_f16_exhaustive() {
        for bits in 0..=u16::MAX {
            let v = f16::from_bits(bits);
            if !v.is_finite() {
                continue;
            }
            let b = format_float(v, None, false);
            let got: f16 = number_to_float(&b);
            assert_eq!(got, v, "{bits:#06x}");
        }
    }

    #[test]
    fn test_parse_matches_std() {
        let mut rng = SmallRng::seed_from_u64(0xb16);
        for _ in 0..20_000 {
            let len = rng.gen_range(1..30);
            let digits: String = (0..len)
                .map(|i| {
                    let lo = if i == 0 { b'1' } else { b'0' };
                    char::from(rng.gen_range(lo..=b'9'))
                })
                .collect();
            let scale = rng.gen_range(-330..310);
            let want: f64 = format!("0.{digits}e{scale}").parse().unwrap();
            let got: f64 = number_to_float(&number(&digits, scale, false));
            assert_eq!(got.to_bits(), want.to_bits(), "0.{digits}e{scale}");
            let want: f32 = format!("0.{digits}e{}", scale / 8).parse().unwrap();
            let got: f32 = number_to_float(&number(&digits, scale / 8, false));
            assert_eq!(got.to_bits(), want.to_bits(), "0.{digits}e{}", scale / 8);
        }
    }
}
