//! Public conversions between numbers and text.

#[cfg(feature = "alloc")]
use alloc::string::String;
use core::fmt;

use super::{
    buffer::DigitBuffer,
    ctx::{NumberFormatInfo, NumberStyles},
    dec2flt::number_to_float,
    float::RawFloat,
    integer::{self, Integer},
    itoa,
    number,
    render::{self, FloatDigits, IntegerDigits},
    util,
};

/// Parses a float from `s`.
///
/// The result is the float nearest to the decimal value of
/// `s`, with ties rounded to even. Values too large for `F`
/// become infinity and values too small become zero, so
/// parsing a float never overflows.
///
/// If `s` does not match `styles`, it may still be one of the
/// NaN or infinity symbols of `info`, compared without regard
/// to ASCII case and surrounded by any whitespace. The
/// infinity symbol may follow the positive sign and the NaN
/// symbol may follow either sign.
///
/// # Errors
///
/// Hexadecimal and binary styles are rejected with
/// [`ErrorKind::InvalidStyle`].
pub fn parse_float<F: RawFloat>(
    s: &str,
    styles: NumberStyles,
    info: &NumberFormatInfo<'_>,
) -> Result<F, ParseError> {
    styles.validate_float()?;
    let mut number = DigitBuffer::for_float::<F>();
    if number::parse_exact(s, styles, info, &mut number).is_ok() {
        return Ok(number_to_float(&number));
    }
    parse_special(s, info).ok_or_else(|| {
        if util::trim_white(s).is_empty() {
            ParseError::empty()
        } else {
            ParseError::invalid()
        }
    })
}

fn parse_special<F: RawFloat>(s: &str, info: &NumberFormatInfo<'_>) -> Option<F> {
    let s = util::trim_white(s);
    if util::equal_fold(s, info.positive_infinity_symbol) {
        return Some(F::infinity(false));
    }
    if util::equal_fold(s, info.negative_infinity_symbol) {
        return Some(F::infinity(true));
    }
    if util::equal_fold(s, info.nan_symbol) {
        return Some(F::nan());
    }
    if let Some(rest) = strip_prefix_fold(s, info.positive_sign) {
        if util::equal_fold(rest, info.positive_infinity_symbol) {
            return Some(F::infinity(false));
        }
        return util::equal_fold(rest, info.nan_symbol).then(F::nan);
    }
    let rest = strip_prefix_fold(s, info.negative_sign).or_else(|| {
        if info.allow_hyphen_during_parsing() {
            s.strip_prefix('-')
        } else {
            None
        }
    })?;
    util::equal_fold(rest, info.nan_symbol).then(F::nan)
}

fn strip_prefix_fold<'s>(s: &'s str, prefix: &str) -> Option<&'s str> {
    if prefix.is_empty() || !util::starts_with_fold(s, prefix) {
        return None;
    }
    s.get(prefix.len()..)
}

/// Parses an integer from `s`.
///
/// With [`NumberStyles::ALLOW_HEX_SPECIFIER`] or
/// [`NumberStyles::ALLOW_BINARY_SPECIFIER`] the digits are the
/// two's complement bits of the result, so `"ff"` parses as
/// `-1i8`.
///
/// # Errors
///
/// A value outside of the range of `I`, including any
/// negative value but zero for unsigned types and any value
/// with a non-zero fractional part, is an
/// [`ErrorKind::Overflow`]. Malformed input is reported
/// before overflow.
pub fn parse_integer<I: Integer>(
    s: &str,
    styles: NumberStyles,
    info: &NumberFormatInfo<'_>,
) -> Result<I, ParseError> {
    styles.validate_integer()?;
    if util::trim_white(s).is_empty() {
        return Err(ParseError::empty());
    }
    if styles.is_radix() {
        return integer::parse_radix(s, styles);
    }
    let mut number = DigitBuffer::for_integer::<I>();
    number::parse_exact(s, styles, info, &mut number)?;
    integer::number_to_integer(&number).ok_or(ParseError::overflow())
}

/// Writes `v` to `w` using a standard or custom format string.
///
/// Standard formats are a letter and an optional precision of
/// at most nine digits:
///
/// | format | result for `-1234.5` with [`NumberFormatInfo::INVARIANT`] |
/// |--------|--------|
/// | `C`    | `(¤1,234.50)` |
/// | `E`    | `-1.234500E+003` |
/// | `F`    | `-1234.50` |
/// | `G`    | `-1234.5` |
/// | `N`    | `-1,234.50` |
/// | `P`    | `-123,450.00 %` |
/// | `R`    | `-1234.5` |
///
/// An empty format is `G`. Anything else is a custom pattern
/// such as `#,##0.00;(#,##0.00);zero`.
///
/// NaN and the infinities are written as the symbols of
/// `info` regardless of the format.
///
/// # Errors
///
/// Fails if the format is a letter that is not one of the
/// standard formats, if the precision is too large, or if `w`
/// fails.
pub fn write_float<W, F>(
    w: &mut W,
    v: F,
    format: &str,
    info: &NumberFormatInfo<'_>,
) -> Result<(), RenderError>
where
    W: fmt::Write + ?Sized,
    F: RawFloat,
{
    render::render(w, &FloatDigits(v), format, info)
}

/// Writes `v` to `w` using a standard or custom format string.
///
/// In addition to the formats of [`write_float`] except `R`,
/// integers support `D` (decimal digits, the precision being
/// the minimum count), `X` and `x` (hexadecimal two's
/// complement), and `B` (binary two's complement).
///
/// # Errors
///
/// See [`write_float`].
pub fn write_integer<W, I>(
    w: &mut W,
    v: I,
    format: &str,
    info: &NumberFormatInfo<'_>,
) -> Result<(), RenderError>
where
    W: fmt::Write + ?Sized,
    I: Integer,
{
    render::render(w, &IntegerDigits::new(v), format, info)
}

/// Writes an already computed decimal number to `w`.
///
/// The digits are used as they are, so `R` is rejected and
/// `G` without a precision keeps every digit. A precision
/// shorter than the buffer rounds half to even, taking the
/// non-zero tail into account. A longer one pads with zeros.
///
/// # Errors
///
/// See [`write_float`].
pub fn write_number<W>(
    w: &mut W,
    number: &DigitBuffer,
    format: &str,
    info: &NumberFormatInfo<'_>,
) -> Result<(), RenderError>
where
    W: fmt::Write + ?Sized,
{
    render::render(w, number, format, info)
}

/// Formats `v` using a standard or custom format string.
///
/// # Errors
///
/// See [`write_float`].
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub fn float_to_string<F: RawFloat>(
    v: F,
    format: &str,
    info: &NumberFormatInfo<'_>,
) -> Result<String, RenderError> {
    let mut s = String::new();
    write_float(&mut s, v, format, info)?;
    Ok(s)
}

/// Formats `v` using a standard or custom format string.
///
/// # Errors
///
/// See [`write_integer`].
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub fn integer_to_string<I: Integer>(
    v: I,
    format: &str,
    info: &NumberFormatInfo<'_>,
) -> Result<String, RenderError> {
    let mut s = String::new();
    write_integer(&mut s, v, format, info)?;
    Ok(s)
}

/// The base of [`write_integer_radix`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Radix {
    /// Base 10 with a leading `-` for negative values.
    #[default]
    Decimal,
    /// Base 16, upper case, two's complement.
    Hex,
    /// Base 2, two's complement.
    Binary,
}

/// Writes `v` in `radix`, padded with zeros to at least
/// `min_digits` digits.
///
/// # Errors
///
/// Only fails if `w` fails.
pub fn write_integer_radix<W, I>(w: &mut W, v: I, radix: Radix, min_digits: usize) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    I: Integer,
{
    let mut buf = itoa::Buffer::new();
    let (negative, digits) = radix_digits(&mut buf, v, radix);
    if negative {
        w.write_str("-")?;
    }
    itoa::write_zeros(w, min_digits.saturating_sub(digits.len()))?;
    w.write_str(digits)
}

/// Returns the sign and digits of `v` in `radix`.
fn radix_digits<I: Integer>(buf: &mut itoa::Buffer, v: I, radix: Radix) -> (bool, &str) {
    match radix {
        Radix::Decimal => {
            let (negative, magnitude) = v.to_magnitude();
            (negative, buf.format_dec(magnitude))
        }
        Radix::Hex => (false, buf.format_hex(v.to_bits128(), true)),
        Radix::Binary => (false, buf.format_bin(v.to_bits128())),
    }
}

/// Formats `v` in `radix`, padded with zeros to at least
/// `min_digits` digits.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub fn format_integer<I: Integer>(v: I, radix: Radix, min_digits: usize) -> String {
    let mut buf = itoa::Buffer::new();
    let (negative, digits) = radix_digits(&mut buf, v, radix);
    let zeros = min_digits.saturating_sub(digits.len());
    let mut s = String::with_capacity(usize::from(negative) + zeros + digits.len());
    if negative {
        s.push('-');
    }
    s.extend(core::iter::repeat('0').take(zeros));
    s.push_str(digits);
    s
}

/// An error returned when parsing a number fails.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
}

impl ParseError {
    pub(crate) const fn empty() -> Self {
        Self {
            kind: ErrorKind::Empty,
        }
    }

    pub(crate) const fn invalid() -> Self {
        Self {
            kind: ErrorKind::Invalid,
        }
    }

    pub(crate) const fn overflow() -> Self {
        Self {
            kind: ErrorKind::Overflow,
        }
    }

    pub(crate) const fn invalid_style() -> Self {
        Self {
            kind: ErrorKind::InvalidStyle,
        }
    }

    /// Returns the cause of the error.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// The cause of a [`ParseError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The string is empty or only whitespace.
    Empty,
    /// The string is not a number in the requested style.
    Invalid,
    /// The number does not fit the target type.
    Overflow,
    /// The combination of [`NumberStyles`] is not supported
    /// for the target type.
    InvalidStyle,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "cannot parse number from empty string"),
            Self::Invalid => write!(f, "invalid number literal"),
            Self::Overflow => write!(f, "number out of range for the target type"),
            Self::InvalidStyle => write!(f, "unsupported number styles"),
        }
    }
}

/// An error returned when formatting a number fails.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RenderError {
    kind: RenderErrorKind,
}

impl RenderError {
    pub(crate) const fn bad_specifier() -> Self {
        Self {
            kind: RenderErrorKind::BadSpecifier,
        }
    }

    /// Returns the cause of the error.
    pub const fn kind(&self) -> RenderErrorKind {
        self.kind
    }
}

impl From<fmt::Error> for RenderError {
    fn from(_: fmt::Error) -> Self {
        Self {
            kind: RenderErrorKind::Write,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RenderError {}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// The cause of a [`RenderError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RenderErrorKind {
    /// The format string is not valid for the value.
    BadSpecifier,
    /// The destination returned an error.
    Write,
}

impl fmt::Display for RenderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSpecifier => write!(f, "invalid format specifier"),
            Self::Write => write!(f, "an error occurred when writing the number"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;
    use crate::float::f16;

    const INV: &NumberFormatInfo<'static> = &NumberFormatInfo::INVARIANT;

    fn float(s: &str) -> Result<f64, ErrorKind> {
        parse_float(s, NumberStyles::FLOAT | NumberStyles::ALLOW_THOUSANDS, INV)
            .map_err(|err| err.kind())
    }

    #[test]
    fn test_parse_float() {
        let tests: &[(&str, f64)] = &[
            ("0", 0.0),
            ("1", 1.0),
            ("  -1.5e3  ", -1500.0),
            ("+.5", 0.5),
            ("5.", 5.0),
            ("1,000.25", 1000.25),
            ("1e-400", 0.0),
            ("1e400", f64::INFINITY),
            ("-1e400", f64::NEG_INFINITY),
            ("1e99999999999", f64::INFINITY),
            ("0.1", 0.1),
            ("2.2250738585072011e-308", 2.225073858507201e-308),
            ("1.7976931348623157e308", f64::MAX),
            ("1\0\0", 1.0),
        ];
        for &(s, want) in tests {
            let got = float(s).unwrap_or_else(|err| panic!("{s}: {err:?}"));
            assert_eq!(got.to_bits(), want.to_bits(), "{s}");
        }
    }

    #[test]
    fn test_parse_float_negative_zero() {
        assert_eq!(float("-0").map(f64::to_bits), Ok((-0.0f64).to_bits()));
        assert_eq!(float("-0.000").map(f64::to_bits), Ok((-0.0f64).to_bits()));
    }

    #[test]
    fn test_parse_float_specials() {
        assert_eq!(float("Infinity"), Ok(f64::INFINITY));
        assert_eq!(float(" infinity "), Ok(f64::INFINITY));
        assert_eq!(float("+Infinity"), Ok(f64::INFINITY));
        assert_eq!(float("-INFINITY"), Ok(f64::NEG_INFINITY));
        assert!(float("NaN").unwrap().is_nan());
        assert!(float("-nan").unwrap().is_nan());
        assert!(float("+NaN").unwrap().is_nan());
        assert_eq!(float("+-Infinity"), Err(ErrorKind::Invalid));
        assert_eq!(float("inf"), Err(ErrorKind::Invalid));

        let info = NumberFormatInfo {
            negative_sign: "\u{2212}",
            ..NumberFormatInfo::INVARIANT
        };
        let v: f32 = parse_float("-NaN", NumberStyles::FLOAT, &info).unwrap();
        assert!(v.is_nan());
        let v: f32 = parse_float("-1", NumberStyles::FLOAT, &info).unwrap();
        assert_eq!(v, -1.0);
    }

    #[test]
    fn test_parse_float_errors() {
        assert_eq!(float(""), Err(ErrorKind::Empty));
        assert_eq!(float(" \t"), Err(ErrorKind::Empty));
        assert_eq!(float("1.2.3"), Err(ErrorKind::Invalid));
        assert_eq!(float("e5"), Err(ErrorKind::Invalid));
        assert_eq!(float("- 1"), Err(ErrorKind::Invalid));
        assert_eq!(float("1 x"), Err(ErrorKind::Invalid));
        assert_eq!(float("(1)"), Err(ErrorKind::Invalid));
        let err = parse_float::<f64>("1", NumberStyles::HEX_NUMBER, INV).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStyle);
    }

    #[test]
    fn test_parse_f16() {
        let v: f16 = parse_float("65504", NumberStyles::FLOAT, INV).unwrap();
        assert_eq!(v, f16::MAX);
        let v: f16 = parse_float("65520", NumberStyles::FLOAT, INV).unwrap();
        assert_eq!(v, f16::INFINITY);
        let v: f16 = parse_float("1", NumberStyles::FLOAT, INV).unwrap();
        assert_eq!(v, f16::ONE);
    }

    #[test]
    fn test_parse_integer_overflow_boundary() {
        let parse = |s| parse_integer::<u32>(s, NumberStyles::INTEGER, INV).map_err(|e| e.kind());
        assert_eq!(parse("4294967295"), Ok(4294967295));
        assert_eq!(parse("4294967296"), Err(ErrorKind::Overflow));
        assert_eq!(parse("99999999999999999999"), Err(ErrorKind::Overflow));
        assert_eq!(parse("-0"), Ok(0));
        assert_eq!(parse("-1"), Err(ErrorKind::Overflow));
        assert_eq!(parse("1x"), Err(ErrorKind::Invalid));
        assert_eq!(parse(""), Err(ErrorKind::Empty));
    }

    #[test]
    fn test_parse_integer_signed() {
        let parse = |s| parse_integer::<i8>(s, NumberStyles::ANY, INV).map_err(|e| e.kind());
        assert_eq!(parse("-128"), Ok(-128));
        assert_eq!(parse("127"), Ok(127));
        assert_eq!(parse("128"), Err(ErrorKind::Overflow));
        assert_eq!(parse("-129"), Err(ErrorKind::Overflow));
        assert_eq!(parse("(12)"), Ok(-12));
        assert_eq!(parse("12-"), Ok(-12));
        assert_eq!(parse("1.2e1"), Ok(12));
        assert_eq!(parse("12.00"), Ok(12));
        assert_eq!(parse("12.5"), Err(ErrorKind::Overflow));
        assert_eq!(parse("-0"), Ok(0));
        assert_eq!(parse("1e1000000000"), Err(ErrorKind::Overflow));
    }

    #[test]
    fn test_parse_integer_radix() {
        let hex = |s| parse_integer::<i16>(s, NumberStyles::HEX_NUMBER, INV).map_err(|e| e.kind());
        assert_eq!(hex(" 7fff "), Ok(i16::MAX));
        assert_eq!(hex("FFFF"), Ok(-1));
        assert_eq!(hex("0000000000ffff"), Ok(-1));
        assert_eq!(hex("10000"), Err(ErrorKind::Overflow));
        assert_eq!(hex("10000g"), Err(ErrorKind::Invalid));
        assert_eq!(hex("-1"), Err(ErrorKind::Invalid));
        let bin = parse_integer::<u8>("1010", NumberStyles::BINARY_NUMBER, INV);
        assert_eq!(bin, Ok(10));
    }

    macro_rules! round_trip_tests {
        ($($name:ident => $ty:ty, $bits:ty;)*) => {
            $(
                #[test]
                fn $name() {
                    let mut rng = SmallRng::seed_from_u64(0x7e57);
                    for _ in 0..20_000 {
                        let v = <$ty>::from_bits(rng.gen::<$bits>());
                        if v.is_nan() {
                            continue;
                        }
                        let s = float_to_string(v, "R", INV).unwrap();
                        let got: $ty = parse_float(&s, NumberStyles::FLOAT, INV).unwrap();
                        assert_eq!(got.to_bits(), v.to_bits(), "{s}");
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
    fn test_render_idempotent() {
        let mut number = DigitBuffer::from_integer(1234567u32);
        number.set_negative(true);
        for format in ["#,##0", "N2", "E3", "0.00E+0;(0)"] {
            let mut a = String::new();
            let mut b = String::new();
            write_number(&mut a, &number, format, INV).unwrap();
            write_number(&mut b, &number, format, INV).unwrap();
            assert_eq!(a, b, "{format}");
        }
        let mut s = String::new();
        write_number(&mut s, &DigitBuffer::from_integer(1234567u32), "#,##0", INV).unwrap();
        assert_eq!(s, "1,234,567");
    }

    #[test]
    fn test_write_float_specials() {
        let mut s = String::new();
        write_float(&mut s, f64::NAN, "0.00", INV).unwrap();
        write_float(&mut s, f64::NEG_INFINITY, "E", INV).unwrap();
        write_float(&mut s, f32::INFINITY, "", INV).unwrap();
        assert_eq!(s, "NaN-InfinityInfinity");
    }

    #[test]
    fn test_to_string() {
        assert_eq!(float_to_string(-0.0f64, "", INV).unwrap(), "-0");
        assert_eq!(float_to_string(0.1f32, "R", INV).unwrap(), "0.1");
        assert_eq!(integer_to_string(-42i64, "D5", INV).unwrap(), "-00042");
        assert_eq!(integer_to_string(255u8, "x4", INV).unwrap(), "00ff");
        let err = float_to_string(1.0f64, "D", INV).unwrap_err();
        assert_eq!(err.kind(), RenderErrorKind::BadSpecifier);
    }

    #[test]
    fn test_format_integer() {
        assert_eq!(format_integer(-1i8, Radix::Hex, 0), "FF");
        assert_eq!(format_integer(5u32, Radix::Binary, 8), "00000101");
        assert_eq!(format_integer(i128::MIN, Radix::Decimal, 0), i128::MIN.to_string());
        assert_eq!(format_integer(7u8, Radix::Decimal, 3), "007");
        assert_eq!(format_integer(-7i8, Radix::Decimal, 3), "-007");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParseError::overflow().to_string(),
            "number out of range for the target type"
        );
        assert_eq!(
            RenderError::from(fmt::Error).kind(),
            RenderErrorKind::Write
        );
    }
}
