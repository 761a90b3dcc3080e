//! Per-width binary floating point parameters.

use core::fmt;

#[cfg(feature = "rand")]
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

mod private {
    pub trait Sealed {}

    impl Sealed for super::f16 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// The class of a binary floating point value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Category {
    /// Positive or negative zero.
    Zero,
    /// A non-zero value with a zero biased exponent.
    Subnormal,
    /// A finite, non-zero value with a non-zero biased exponent.
    Normal,
    /// Positive or negative infinity.
    Infinite,
    /// Not a number.
    Nan,
}

/// The constants and bit manipulation the conversion
/// algorithms need from an IEEE 754 binary float.
///
/// This trait is sealed.
pub trait RawFloat: Copy + fmt::Debug + private::Sealed {
    /// The number of explicitly stored mantissa bits.
    const MANTISSA_EXPLICIT_BITS: u32;
    /// The number of exponent bits.
    const EXPONENT_BITS: u32;

    /// Round-to-even only happens for decimal exponents in
    /// `MIN_EXPONENT_ROUND_TO_EVEN..=MAX_EXPONENT_ROUND_TO_EVEN`.
    const MIN_EXPONENT_ROUND_TO_EVEN: i32;
    /// See [`MIN_EXPONENT_ROUND_TO_EVEN`][Self::MIN_EXPONENT_ROUND_TO_EVEN].
    const MAX_EXPONENT_ROUND_TO_EVEN: i32;

    /// The smallest decimal exponent for the native fast path.
    const MIN_EXPONENT_FAST_PATH: i64;
    /// The largest decimal exponent for the native fast path.
    const MAX_EXPONENT_FAST_PATH: i64;
    /// The largest decimal exponent for the native fast path
    /// once the mantissa absorbs part of the exponent.
    const MAX_EXPONENT_DISGUISED_FAST_PATH: i64;

    /// Any `w * 10^q` with `q` below this is zero.
    const SMALLEST_POWER_OF_TEN: i32;
    /// Any non-zero `w * 10^q` with `q` above this is infinite.
    const LARGEST_POWER_OF_TEN: i32;

    /// The number of significant digits that always suffice
    /// to round trip a value.
    const MAX_ROUND_TRIP_DIGITS: usize;
    /// The digit count below which `G` stays in fixed
    /// notation.
    const DEFAULT_PRECISION: usize;
    /// The largest number of significant digits in the exact
    /// decimal expansion of any value.
    const MAX_EXACT_DIGITS: usize;

    /// The exponent bias.
    const EXPONENT_BIAS: i32 = (1 << (Self::EXPONENT_BITS - 1)) - 1;
    /// The biased exponent of subnormals, less the bias.
    const MINIMUM_EXPONENT: i32 = -Self::EXPONENT_BIAS;
    /// The biased exponent of infinity and NaN.
    const INFINITE_POWER: i32 = (1 << Self::EXPONENT_BITS) - 1;
    /// The bit index of the sign.
    const SIGN_INDEX: u32 = Self::MANTISSA_EXPLICIT_BITS + Self::EXPONENT_BITS;
    /// The largest mantissa the native fast path accepts.
    const MAX_MANTISSA_FAST_PATH: u64 = 2 << Self::MANTISSA_EXPLICIT_BITS;

    /// Returns the raw bits, zero extended.
    fn to_bits64(self) -> u64;

    /// Creates a float from the low bits of `bits`.
    fn from_bits64(bits: u64) -> Self;

    /// Computes `mantissa * 10^exponent` with native
    /// arithmetic, if the result is exact.
    fn try_fast_path(_mantissa: u64, _exponent: i64) -> Option<Self> {
        None
    }

    /// Reports whether the sign bit is set.
    fn is_sign_negative(self) -> bool {
        self.to_bits64() >> Self::SIGN_INDEX != 0
    }

    /// Returns the biased exponent field.
    fn biased_exponent(self) -> i32 {
        let mask = (1u64 << Self::EXPONENT_BITS) - 1;
        ((self.to_bits64() >> Self::MANTISSA_EXPLICIT_BITS) & mask) as i32
    }

    /// Returns the explicit mantissa field.
    fn mantissa_field(self) -> u64 {
        self.to_bits64() & ((1u64 << Self::MANTISSA_EXPLICIT_BITS) - 1)
    }

    /// Classifies the value.
    fn category(self) -> Category {
        match (self.biased_exponent(), self.mantissa_field()) {
            (0, 0) => Category::Zero,
            (0, _) => Category::Subnormal,
            (e, 0) if e == Self::INFINITE_POWER => Category::Infinite,
            (e, _) if e == Self::INFINITE_POWER => Category::Nan,
            _ => Category::Normal,
        }
    }

    /// Returns `(mantissa, exponent, negative)` such that the
    /// value is `mantissa * 2^exponent`.
    ///
    /// Subnormals keep the minimum exponent and shift the
    /// mantissa up by one so that neighbours are always two
    /// units apart.
    fn integer_decode(self) -> (u64, i16, bool) {
        let exp = self.biased_exponent();
        let field = self.mantissa_field();
        let mant = if exp == 0 {
            field << 1
        } else {
            field | (1 << Self::MANTISSA_EXPLICIT_BITS)
        };
        let e = exp - Self::EXPONENT_BIAS - Self::MANTISSA_EXPLICIT_BITS as i32;
        (mant, e as i16, self.is_sign_negative())
    }

    /// Assembles a float from its sign, biased exponent, and
    /// explicit mantissa.
    fn from_parts(negative: bool, biased_exp: i32, mantissa: u64) -> Self {
        debug_assert!(biased_exp >= 0 && biased_exp <= Self::INFINITE_POWER);
        debug_assert!(mantissa < (1 << Self::MANTISSA_EXPLICIT_BITS));
        let bits = (u64::from(negative) << Self::SIGN_INDEX)
            | ((biased_exp as u64) << Self::MANTISSA_EXPLICIT_BITS)
            | mantissa;
        Self::from_bits64(bits)
    }

    /// Returns the value with its sign bit set if `negative`
    /// is true, otherwise unchanged.
    fn with_sign(self, negative: bool) -> Self {
        Self::from_bits64(self.to_bits64() | (u64::from(negative) << Self::SIGN_INDEX))
    }

    /// Returns a signed zero.
    fn zero(negative: bool) -> Self {
        Self::from_parts(negative, 0, 0)
    }

    /// Returns a signed infinity.
    fn infinity(negative: bool) -> Self {
        Self::from_parts(negative, Self::INFINITE_POWER, 0)
    }

    /// Returns the canonical quiet NaN.
    fn nan() -> Self {
        Self::from_parts(false, Self::INFINITE_POWER, 1 << (Self::MANTISSA_EXPLICIT_BITS - 1))
    }

    /// Returns the smallest positive normal value.
    fn min_positive_normal() -> Self {
        Self::from_parts(false, 1, 0)
    }
}

/// Exact powers of ten for the native fast path.
const INT_POW10: [u64; 16] = [
    1,
    10,
    100,
    1000,
    10000,
    100000,
    1000000,
    10000000,
    100000000,
    1000000000,
    10000000000,
    100000000000,
    1000000000000,
    10000000000000,
    100000000000000,
    1000000000000000,
];

macro_rules! impl_fast_path {
    ($ty:ty, $table:expr) => {
        fn try_fast_path(mantissa: u64, exponent: i64) -> Option<Self> {
            const TABLE: &[$ty] = &$table;

            if exponent < Self::MIN_EXPONENT_FAST_PATH
                || exponent > Self::MAX_EXPONENT_DISGUISED_FAST_PATH
                || mantissa > Self::MAX_MANTISSA_FAST_PATH
            {
                return None;
            }
            // Both operands are exactly representable, so the
            // single native rounding is correct.
            let value = if exponent <= Self::MAX_EXPONENT_FAST_PATH {
                let m = mantissa as $ty;
                let p = TABLE[exponent.unsigned_abs() as usize];
                if exponent < 0 {
                    m / p
                } else {
                    m * p
                }
            } else {
                let shift = (exponent - Self::MAX_EXPONENT_FAST_PATH) as usize;
                let mantissa = mantissa.checked_mul(*INT_POW10.get(shift)?)?;
                if mantissa > Self::MAX_MANTISSA_FAST_PATH {
                    return None;
                }
                mantissa as $ty * TABLE[Self::MAX_EXPONENT_FAST_PATH as usize]
            };
            Some(value)
        }
    };
}

impl RawFloat for f32 {
    const MANTISSA_EXPLICIT_BITS: u32 = 23;
    const EXPONENT_BITS: u32 = 8;
    const MIN_EXPONENT_ROUND_TO_EVEN: i32 = -17;
    const MAX_EXPONENT_ROUND_TO_EVEN: i32 = 10;
    const MIN_EXPONENT_FAST_PATH: i64 = -10;
    const MAX_EXPONENT_FAST_PATH: i64 = 10;
    const MAX_EXPONENT_DISGUISED_FAST_PATH: i64 = 17;
    const SMALLEST_POWER_OF_TEN: i32 = -65;
    const LARGEST_POWER_OF_TEN: i32 = 38;
    const MAX_ROUND_TRIP_DIGITS: usize = 9;
    const DEFAULT_PRECISION: usize = 7;
    const MAX_EXACT_DIGITS: usize = 112;

    fn to_bits64(self) -> u64 {
        u64::from(self.to_bits())
    }

    fn from_bits64(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    impl_fast_path!(
        f32,
        [1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10]
    );
}

impl RawFloat for f64 {
    const MANTISSA_EXPLICIT_BITS: u32 = 52;
    const EXPONENT_BITS: u32 = 11;
    const MIN_EXPONENT_ROUND_TO_EVEN: i32 = -4;
    const MAX_EXPONENT_ROUND_TO_EVEN: i32 = 23;
    const MIN_EXPONENT_FAST_PATH: i64 = -22;
    const MAX_EXPONENT_FAST_PATH: i64 = 22;
    const MAX_EXPONENT_DISGUISED_FAST_PATH: i64 = 37;
    const SMALLEST_POWER_OF_TEN: i32 = -342;
    const LARGEST_POWER_OF_TEN: i32 = 308;
    const MAX_ROUND_TRIP_DIGITS: usize = 17;
    const DEFAULT_PRECISION: usize = 15;
    const MAX_EXACT_DIGITS: usize = 767;

    fn to_bits64(self) -> u64 {
        self.to_bits()
    }

    fn from_bits64(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    impl_fast_path!(
        f64,
        [
            1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
            1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
        ]
    );
}

/// An IEEE 754 binary16 value.
///
/// `f16` only stores bits: it has no arithmetic. Use
/// [`to_f32`][f16::to_f32] or [`to_f64`][f16::to_f64] to
/// compute with it.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct f16(u16);

impl f16 {
    /// Positive zero.
    pub const ZERO: Self = Self(0);
    /// One.
    pub const ONE: Self = Self(0x3c00);
    /// The largest finite value, 65504.
    pub const MAX: Self = Self(0x7bff);
    /// The smallest positive normal value, 2^-14.
    pub const MIN_POSITIVE: Self = Self(0x0400);
    /// The smallest positive subnormal value, 2^-24.
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x0001);
    /// Positive infinity.
    pub const INFINITY: Self = Self(0x7c00);
    /// Negative infinity.
    pub const NEG_INFINITY: Self = Self(0xfc00);
    /// A quiet NaN.
    pub const NAN: Self = Self(0x7e00);

    /// Creates an `f16` from its raw bits.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Reports whether the value is NaN.
    pub const fn is_nan(self) -> bool {
        self.0 & 0x7fff > 0x7c00
    }

    /// Reports whether the value is neither infinite nor NaN.
    pub const fn is_finite(self) -> bool {
        self.0 & 0x7c00 != 0x7c00
    }

    /// Reports whether the sign bit is set.
    pub const fn is_sign_negative(self) -> bool {
        self.0 & 0x8000 != 0
    }

    /// Converts the value to `f32`. The conversion is exact.
    pub fn to_f32(self) -> f32 {
        let sign = u32::from(self.0 & 0x8000) << 16;
        let exp = u32::from((self.0 >> 10) & 0x1f);
        let mant = u32::from(self.0 & 0x3ff);
        let bits = match (exp, mant) {
            (0, 0) => sign,
            (0, _) => {
                // Renormalize: the leading one moves into the
                // implicit bit.
                let shift = mant.leading_zeros() - 21;
                let mant = (mant << shift) & 0x3ff;
                let exp = 127 - 15 + 1 - shift;
                sign | (exp << 23) | (mant << 13)
            }
            (0x1f, _) => sign | 0x7f80_0000 | (mant << 13),
            _ => sign | ((exp + 127 - 15) << 23) | (mant << 13),
        };
        f32::from_bits(bits)
    }

    /// Converts the value to `f64`. The conversion is exact.
    pub fn to_f64(self) -> f64 {
        f64::from(self.to_f32())
    }
}

impl RawFloat for f16 {
    const MANTISSA_EXPLICIT_BITS: u32 = 10;
    const EXPONENT_BITS: u32 = 5;
    const MIN_EXPONENT_ROUND_TO_EVEN: i32 = -22;
    const MAX_EXPONENT_ROUND_TO_EVEN: i32 = 5;
    const MIN_EXPONENT_FAST_PATH: i64 = -4;
    const MAX_EXPONENT_FAST_PATH: i64 = 4;
    const MAX_EXPONENT_DISGUISED_FAST_PATH: i64 = 7;
    const SMALLEST_POWER_OF_TEN: i32 = -27;
    const LARGEST_POWER_OF_TEN: i32 = 4;
    const MAX_ROUND_TRIP_DIGITS: usize = 5;
    const DEFAULT_PRECISION: usize = 5;
    const MAX_EXACT_DIGITS: usize = 21;

    fn to_bits64(self) -> u64 {
        u64::from(self.0)
    }

    fn from_bits64(bits: u64) -> Self {
        Self(bits as u16)
    }
}

impl fmt::Debug for f16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_f32(), f)
    }
}

impl From<f16> for f32 {
    fn from(v: f16) -> Self {
        v.to_f32()
    }
}

impl From<f16> for f64 {
    fn from(v: f16) -> Self {
        v.to_f64()
    }
}

#[cfg(feature = "rand")]
impl Distribution<f16> for Standard {
    /// Samples uniformly over the finite bit patterns.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f16 {
        loop {
            let v = f16(rng.gen());
            if v.is_finite() {
                return v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(f64::EXPONENT_BIAS, 1023);
        assert_eq!(f64::MINIMUM_EXPONENT, -1023);
        assert_eq!(f64::INFINITE_POWER, 0x7ff);
        assert_eq!(f64::SIGN_INDEX, 63);
        assert_eq!(f32::EXPONENT_BIAS, 127);
        assert_eq!(f32::INFINITE_POWER, 0xff);
        assert_eq!(f16::EXPONENT_BIAS, 15);
        assert_eq!(f16::INFINITE_POWER, 0x1f);
        assert_eq!(f16::SIGN_INDEX, 15);
    }

    #[test]
    fn test_category() {
        assert_eq!(0.0f64.category(), Category::Zero);
        assert_eq!((-0.0f64).category(), Category::Zero);
        assert_eq!(f64::MIN_POSITIVE.category(), Category::Normal);
        assert_eq!((f64::MIN_POSITIVE / 2.0).category(), Category::Subnormal);
        assert_eq!(f64::INFINITY.category(), Category::Infinite);
        assert_eq!(f64::NAN.category(), Category::Nan);
        assert_eq!(f16::MIN_POSITIVE_SUBNORMAL.category(), Category::Subnormal);
        assert_eq!(f16::NAN.category(), Category::Nan);
        assert_eq!(f16::NEG_INFINITY.category(), Category::Infinite);
    }

    #[test]
    fn test_integer_decode() {
        assert_eq!(1.0f64.integer_decode(), (1 << 52, -52, false));
        assert_eq!((-2.0f32).integer_decode(), (1 << 23, -22, true));
        // The smallest subnormal is 2 * 2^-1075.
        assert_eq!(f64::from_bits(1).integer_decode(), (2, -1075, false));
        assert_eq!(f16::ONE.integer_decode(), (1 << 10, -10, false));
    }

    #[test]
    fn test_specials() {
        assert_eq!(f64::nan().to_bits(), f64::NAN.to_bits());
        assert_eq!(f32::infinity(true), f32::NEG_INFINITY);
        assert_eq!(f16::nan(), f16::NAN);
        assert_eq!(f16::infinity(false), f16::INFINITY);
        assert_eq!(<f64 as RawFloat>::zero(true).to_bits(), 1 << 63);
        assert_eq!(f64::min_positive_normal(), f64::MIN_POSITIVE);
    }

    #[test]
    fn test_fast_path() {
        assert_eq!(f64::try_fast_path(12345, -2), Some(123.45));
        assert_eq!(f64::try_fast_path(1, 22), Some(1e22));
        assert_eq!(f64::try_fast_path(1, 23), Some(1e23));
        assert_eq!(f64::try_fast_path(1, -23), None);
        assert_eq!(f64::try_fast_path(1 << 54, 0), None);
        assert_eq!(f32::try_fast_path(7, -1), Some(0.7));
        assert_eq!(f16::try_fast_path(1, 0), None);
    }

    #[test]
    fn test_f16_to_f32() {
        assert_eq!(f16::ONE.to_f32(), 1.0);
        assert_eq!(f16::MAX.to_f32(), 65504.0);
        assert_eq!(f16::MIN_POSITIVE.to_f32(), 2f32.powi(-14));
        assert_eq!(f16::MIN_POSITIVE_SUBNORMAL.to_f32(), 2f32.powi(-24));
        assert_eq!(f16::from_bits(0x03ff).to_f32(), 1023.0 * 2f32.powi(-24));
        assert_eq!(f16::from_bits(0x8000).to_f32().to_bits(), (-0.0f32).to_bits());
        assert!(f16::NAN.to_f32().is_nan());
        assert_eq!(f16::NEG_INFINITY.to_f64(), f64::NEG_INFINITY);
    }
}
