//! Per-width integer parameters and integer parsing.

use core::fmt;

use super::{
    buffer::{DigitBuffer, Kind},
    conv::ParseError,
    ctx::NumberStyles,
    itoa,
    util,
};

mod private {
    pub trait Sealed {}

    macro_rules! impl_sealed {
        ($($ty:ty),* $(,)?) => {
            $(impl Sealed for $ty {})*
        };
    }
    impl_sealed!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
}

/// A primitive integer type.
///
/// This trait is sealed.
pub trait Integer: Copy + fmt::Debug + private::Sealed {
    /// The width in bits.
    const BITS: u32;
    /// Whether the type is signed.
    const SIGNED: bool;
    /// The number of decimal digits in the largest magnitude.
    const MAX_DIGITS: usize;

    /// Returns the two's complement bits, zero extended.
    fn to_bits128(self) -> u128;

    /// Creates an integer from the low [`BITS`][Self::BITS]
    /// bits of `bits`.
    fn from_bits128(bits: u128) -> Self;

    /// Returns the sign and absolute value.
    fn to_magnitude(self) -> (bool, u128) {
        let bits = self.to_bits128();
        let negative = Self::SIGNED && (bits >> (Self::BITS - 1)) & 1 == 1;
        if negative {
            (true, bits.wrapping_neg() & mask(Self::BITS))
        } else {
            (false, bits)
        }
    }
}

const fn mask(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Returns the largest magnitude of `I` with the given sign.
fn max_magnitude<I: Integer>(negative: bool) -> u128 {
    match (I::SIGNED, negative) {
        (false, false) => mask(I::BITS),
        (false, true) => 0,
        (true, false) => mask(I::BITS - 1),
        (true, true) => 1 << (I::BITS - 1),
    }
}

fn from_magnitude<I: Integer>(negative: bool, magnitude: u128) -> I {
    if negative {
        I::from_bits128(magnitude.wrapping_neg())
    } else {
        I::from_bits128(magnitude)
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $signed:literal),* $(,)?) => {
        $(
            impl Integer for $ty {
                const BITS: u32 = <$ty>::BITS;
                const SIGNED: bool = $signed;
                const MAX_DIGITS: usize = util::digits_u128(<$ty>::MAX as u128);

                #[allow(clippy::cast_sign_loss)]
                fn to_bits128(self) -> u128 {
                    (self as u128) & mask(Self::BITS)
                }

                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                fn from_bits128(bits: u128) -> Self {
                    bits as Self
                }
            }
        )*
    };
}
impl_integer! {
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
    i128 => true,
    isize => true,
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
    u128 => false,
    usize => false,
}

/// Converts a parsed number to `I`.
///
/// Returns `None` if the value does not fit or has a non-zero
/// fractional part.
pub(crate) fn number_to_integer<I: Integer>(number: &DigitBuffer) -> Option<I> {
    let digits = number.digits();
    if digits.is_empty() {
        return Some(I::from_bits128(0));
    }
    let scale = usize::try_from(number.scale()).ok()?;
    if scale < digits.len() || scale > I::MAX_DIGITS || number.has_nonzero_tail() {
        return None;
    }

    let negative = number.is_negative();
    let max = max_magnitude::<I>(negative);
    let mut acc: u128 = 0;
    for i in 0..scale {
        let d = digits.get(i).map_or(0, |&d| d - b'0');
        if acc > max / 10 {
            return None;
        }
        acc = (acc * 10).checked_add(u128::from(d))?;
        if acc > max {
            return None;
        }
    }
    Some(from_magnitude(negative, acc))
}

/// Parses the hexadecimal or binary two's complement digits of
/// an `I`.
pub(crate) fn parse_radix<I: Integer>(s: &str, styles: NumberStyles) -> Result<I, ParseError> {
    let (radix, shift) = if styles.contains(NumberStyles::ALLOW_HEX_SPECIFIER) {
        (16, 4)
    } else {
        (2, 1)
    };

    let mut rest = s;
    if styles.contains(NumberStyles::ALLOW_LEADING_WHITE) {
        rest = rest.trim_start_matches(util::is_white);
    }
    let start = rest.len();
    let mut acc: u128 = 0;
    let mut overflow = false;
    rest = rest.trim_start_matches(|c: char| {
        let Some(d) = c.to_digit(radix) else {
            return false;
        };
        if acc >> (I::BITS - shift) != 0 {
            overflow = true;
        } else {
            acc = (acc << shift) | u128::from(d);
        }
        true
    });
    if rest.len() == start {
        return Err(ParseError::invalid());
    }
    if styles.contains(NumberStyles::ALLOW_TRAILING_WHITE) {
        rest = rest.trim_start_matches(util::is_white);
    }
    if !rest.chars().all(|c| c == '\0') {
        return Err(ParseError::invalid());
    }
    if overflow {
        return Err(ParseError::overflow());
    }
    Ok(I::from_bits128(acc))
}

impl DigitBuffer {
    /// Creates a buffer holding every digit of `v`.
    pub fn from_integer<I: Integer>(v: I) -> Self {
        let mut out = Self::for_integer::<I>();
        let (negative, magnitude) = v.to_magnitude();
        if magnitude != 0 {
            let mut buf = itoa::Buffer::new();
            for d in buf.format_dec(magnitude).bytes() {
                out.push(d);
            }
            out.set_scale(out.len() as i32);
            out.trim_trailing_zeros();
            out.set_negative(negative);
        }
        debug_assert_eq!(out.kind(), Kind::Integer);
        out.check_consistency();
        out
    }
}
