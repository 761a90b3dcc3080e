//! Number to text.
//!
//! A format string is either a standard format, a letter with
//! an optional precision, or a custom pattern. Either way the
//! renderer asks the value for the digits it needs, rounds
//! them, and lays them out with the separators and symbols of
//! a [`NumberFormatInfo`].

use core::{fmt, str};

use super::{
    buffer::DigitBuffer,
    conv::RenderError,
    ctx::NumberFormatInfo,
    float::{Category, RawFloat},
    flt2dec::{format_float_mode, Mode},
    integer::Integer,
    itoa,
};

mod custom;
mod standard;

/// A value that can produce its decimal digits.
pub(crate) trait Digits {
    /// Returns the symbol that replaces every format, for NaN
    /// and the infinities.
    fn special<'a>(&self, _info: &NumberFormatInfo<'a>) -> Option<&'a str> {
        None
    }

    /// Returns the digits for `mode`.
    ///
    /// Exact values ignore `mode` and return every digit.
    fn to_digits(&self, mode: Mode) -> DigitBuffer;

    /// Reports whether `to_digits` already rounds to the
    /// requested mode, leaving only trailing zeros to trim.
    fn is_rounded(&self) -> bool {
        false
    }

    /// Returns the digit count up to which `G` without a
    /// precision stays in fixed notation, or `None` if it never
    /// switches and never rounds.
    fn general_precision(&self) -> Option<usize> {
        None
    }

    /// Returns the integer for `D`, `X`, and `B`.
    fn integer(&self) -> Option<&IntegerDigits> {
        None
    }

    /// Reports whether `R` applies.
    fn round_trips(&self) -> bool {
        false
    }
}

/// A binary float.
pub(crate) struct FloatDigits<F>(pub F);

impl<F: RawFloat> Digits for FloatDigits<F> {
    fn special<'a>(&self, info: &NumberFormatInfo<'a>) -> Option<&'a str> {
        match self.0.category() {
            Category::Nan => Some(info.nan_symbol),
            Category::Infinite if self.0.is_sign_negative() => Some(info.negative_infinity_symbol),
            Category::Infinite => Some(info.positive_infinity_symbol),
            _ => None,
        }
    }

    fn to_digits(&self, mode: Mode) -> DigitBuffer {
        format_float_mode(self.0, mode, false)
    }

    fn is_rounded(&self) -> bool {
        true
    }

    fn general_precision(&self) -> Option<usize> {
        Some(F::DEFAULT_PRECISION)
    }

    fn round_trips(&self) -> bool {
        true
    }
}

/// A binary integer.
pub(crate) struct IntegerDigits {
    negative: bool,
    magnitude: u128,
    /// Two's complement bits, zero extended.
    bits: u128,
    number: DigitBuffer,
}

impl IntegerDigits {
    pub fn new<I: Integer>(v: I) -> Self {
        let (negative, magnitude) = v.to_magnitude();
        Self {
            negative,
            magnitude,
            bits: v.to_bits128(),
            number: DigitBuffer::from_integer(v),
        }
    }
}

impl Digits for IntegerDigits {
    fn to_digits(&self, _mode: Mode) -> DigitBuffer {
        self.number.clone()
    }

    fn integer(&self) -> Option<&IntegerDigits> {
        Some(self)
    }
}

impl Digits for DigitBuffer {
    fn to_digits(&self, _mode: Mode) -> DigitBuffer {
        self.clone()
    }
}

/// A parsed format string.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Format<'f> {
    /// A format letter and its precision.
    Standard(char, Option<u32>),
    Custom(&'f str),
}

/// The largest precision is nine digits.
const MAX_PRECISION: u32 = 999_999_999;

fn parse_format(format: &str) -> Result<Format<'_>, RenderError> {
    let mut chars = format.chars();
    let c = match chars.next() {
        None | Some('\0') => return Ok(Format::Standard('G', None)),
        Some(c) => c,
    };
    if !c.is_ascii_alphabetic() {
        return Ok(Format::Custom(format));
    }
    let rest = chars.as_str();
    let n = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (digits, tail) = rest.split_at(n);
    if !tail.is_empty() && !tail.starts_with('\0') {
        return Ok(Format::Custom(format));
    }
    if digits.is_empty() {
        return Ok(Format::Standard(c, None));
    }
    let mut precision: u32 = 0;
    for d in digits.bytes() {
        if precision > MAX_PRECISION / 10 {
            return Err(RenderError::bad_specifier());
        }
        precision = precision * 10 + u32::from(d - b'0');
    }
    Ok(Format::Standard(c, Some(precision)))
}

/// Writes `value` to `w` as described by `format`.
pub(crate) fn render<W, D>(
    w: &mut W,
    value: &D,
    format: &str,
    info: &NumberFormatInfo<'_>,
) -> Result<(), RenderError>
where
    W: fmt::Write + ?Sized,
    D: Digits + ?Sized,
{
    if let Some(symbol) = value.special(info) {
        w.write_str(symbol)?;
        return Ok(());
    }
    match parse_format(format)? {
        Format::Standard(c, precision) => standard::render(w, value, c, precision, info),
        Format::Custom(pattern) => custom::render(w, value, pattern, info),
    }
}

/// Returns the `i`th digit as a character, or `'0'` past the
/// last digit.
fn digit_or_zero(number: &DigitBuffer, i: usize) -> char {
    match number.digit(i) {
        0 => '0',
        d => char::from(d),
    }
}

/// Returns `scale + n`, saturating.
fn offset(scale: i32, n: usize) -> i32 {
    scale.saturating_add(i32::try_from(n).unwrap_or(i32::MAX))
}

/// Writes `count` digits starting at digit `start`, padding
/// with zeros past the last digit.
fn write_digits<W>(w: &mut W, number: &DigitBuffer, start: usize, count: usize) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    let digits = number.digits();
    let lo = start.min(digits.len());
    let hi = start.saturating_add(count).min(digits.len());
    let have = digits.get(lo..hi).unwrap_or_default();
    w.write_str(str::from_utf8(have).map_err(|_| fmt::Error)?)?;
    itoa::write_zeros(w, count - have.len())
}

/// Reports whether a group separator goes before the last `n`
/// integer digits.
///
/// Sizes apply from the decimal point outwards and the last
/// one repeats; a size of zero ends grouping.
fn is_group_boundary(sizes: &[u8], n: u64) -> bool {
    if n == 0 {
        return false;
    }
    let mut sum: u64 = 0;
    for (i, &size) in sizes.iter().enumerate() {
        if size == 0 {
            return false;
        }
        let size = u64::from(size);
        sum += size;
        if sum >= n {
            return sum == n;
        }
        if i == sizes.len() - 1 {
            return (n - sum) % size == 0;
        }
    }
    false
}

/// Writes `e` as an exponent: `exp_char`, the sign, and at
/// least `min_digits` digits.
fn write_exponent<W>(
    w: &mut W,
    info: &NumberFormatInfo<'_>,
    e: i64,
    exp_char: char,
    min_digits: usize,
    positive_sign: bool,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    w.write_char(exp_char)?;
    if e < 0 {
        w.write_str(info.negative_sign)?;
    } else if positive_sign {
        w.write_str(info.positive_sign)?;
    }
    let mut buf = itoa::Buffer::new();
    let digits = buf.format_dec(u128::from(e.unsigned_abs()));
    itoa::write_zeros(w, min_digits.saturating_sub(digits.len()))?;
    w.write_str(digits)
}

/// Delays the negative sign until something else is written.
struct SignWriter<'w, 's, W: ?Sized> {
    w: &'w mut W,
    sign: Option<&'s str>,
}

impl<W: fmt::Write + ?Sized> SignWriter<'_, '_, W> {
    fn flush_sign(&mut self) -> fmt::Result {
        match self.sign.take() {
            Some(sign) => self.w.write_str(sign),
            None => Ok(()),
        }
    }
}

impl<W: fmt::Write + ?Sized> fmt::Write for SignWriter<'_, '_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        self.flush_sign()?;
        self.w.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        let tests: &[(&str, Format<'_>)] = &[
            ("", Format::Standard('G', None)),
            ("\0", Format::Standard('G', None)),
            ("G", Format::Standard('G', None)),
            ("e3", Format::Standard('e', Some(3))),
            ("F0", Format::Standard('F', Some(0))),
            ("N999999999", Format::Standard('N', Some(999_999_999))),
            ("X0000000000008", Format::Standard('X', Some(8))),
            ("D2\0junk", Format::Standard('D', Some(2))),
            ("0.00", Format::Custom("0.00")),
            ("E+0", Format::Custom("E+0")),
            ("G3x", Format::Custom("G3x")),
            ("#,##0", Format::Custom("#,##0")),
        ];
        for &(s, want) in tests {
            assert_eq!(parse_format(s), Ok(want), "{s:?}");
        }
        assert_eq!(
            parse_format("N1000000000"),
            Err(RenderError::bad_specifier())
        );
    }

    #[test]
    fn test_is_group_boundary() {
        let western: Vec<u64> = (0..12).filter(|&n| is_group_boundary(&[3], n)).collect();
        assert_eq!(western, [3, 6, 9]);
        let indian: Vec<u64> = (0..12).filter(|&n| is_group_boundary(&[3, 2], n)).collect();
        assert_eq!(indian, [3, 5, 7, 9, 11]);
        let once: Vec<u64> = (0..12).filter(|&n| is_group_boundary(&[3, 0], n)).collect();
        assert_eq!(once, [3]);
        assert!(!is_group_boundary(&[0], 3));
        assert!(!is_group_boundary(&[], 3));
    }

    #[test]
    fn test_write_exponent() {
        let info = NumberFormatInfo::INVARIANT;
        let mut s = String::new();
        write_exponent(&mut s, &info, 5, 'E', 3, true).unwrap();
        write_exponent(&mut s, &info, -12, 'e', 2, false).unwrap();
        write_exponent(&mut s, &info, 1234, 'E', 0, false).unwrap();
        assert_eq!(s, "E+005e-12E1234");
    }

    #[test]
    fn test_sign_writer() {
        let mut s = String::new();
        let mut w = SignWriter {
            w: &mut s,
            sign: Some("-"),
        };
        fmt::Write::write_str(&mut w, "").unwrap();
        assert_eq!(w.w.as_str(), "");
        fmt::Write::write_str(&mut w, "1").unwrap();
        fmt::Write::write_str(&mut w, "2").unwrap();
        assert_eq!(s, "-12");
    }
}
