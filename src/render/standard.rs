//! Standard formats: a letter and an optional precision.

use core::fmt;

use super::{
    digit_or_zero, is_group_boundary, offset, write_digits, write_exponent, Digits,
    IntegerDigits,
};
use crate::{
    buffer::DigitBuffer,
    conv::RenderError,
    ctx::NumberFormatInfo,
    flt2dec::Mode,
    itoa,
};

/// Negative `N` patterns.
const NEG_NUMBER: [&str; 5] = ["(#)", "-#", "- #", "#-", "# -"];

const POS_CURRENCY: [&str; 4] = ["$#", "#$", "$ #", "# $"];

const NEG_CURRENCY: [&str; 17] = [
    "($#)", "-$#", "$-#", "$#-", "(#$)", "-#$", "#-$", "#$-", "-# $", "-$ #", "# $-", "$ #-",
    "$ -#", "#- $", "($ #)", "(# $)", "$- #",
];

const POS_PERCENT: [&str; 4] = ["# %", "#%", "%#", "% #"];

const NEG_PERCENT: [&str; 12] = [
    "-# %", "-#%", "-%#", "%-#", "%#-", "#-%", "#%-", "-% #", "# %-", "% #-", "% -#", "#- %",
];

/// Returns `table[i]`, or the first pattern if `i` is out of
/// range.
fn pattern(table: &[&'static str], i: usize) -> &'static str {
    table.get(i).or(table.first()).copied().unwrap_or("#")
}

/// The separators of one number family.
#[derive(Copy, Clone, Debug)]
pub(super) struct Separators<'a> {
    pub decimal: &'a str,
    pub group: &'a str,
    pub sizes: &'a [u8],
}

impl<'a> Separators<'a> {
    fn number(info: &NumberFormatInfo<'a>) -> Self {
        Self {
            decimal: info.number_decimal_separator,
            group: info.number_group_separator,
            sizes: info.number_group_sizes,
        }
    }

    fn currency(info: &NumberFormatInfo<'a>) -> Self {
        Self {
            decimal: info.currency_decimal_separator,
            group: info.currency_group_separator,
            sizes: info.currency_group_sizes,
        }
    }

    fn percent(info: &NumberFormatInfo<'a>) -> Self {
        Self {
            decimal: info.percent_decimal_separator,
            group: info.percent_group_separator,
            sizes: info.percent_group_sizes,
        }
    }

    fn ungrouped(self) -> Self {
        Self { sizes: &[], ..self }
    }
}

pub(super) fn render<W, D>(
    w: &mut W,
    value: &D,
    c: char,
    precision: Option<u32>,
    info: &NumberFormatInfo<'_>,
) -> Result<(), RenderError>
where
    W: fmt::Write + ?Sized,
    D: Digits + ?Sized,
{
    if let Some(int) = value.integer() {
        match c {
            'D' | 'd' => return Ok(write_decimal(w, int, precision, info)?),
            'X' | 'x' => {
                let mut buf = itoa::Buffer::new();
                let digits = buf.format_hex(int.bits, c == 'X');
                return Ok(write_padded(w, digits, precision)?);
            }
            'B' | 'b' => {
                let mut buf = itoa::Buffer::new();
                let digits = buf.format_bin(int.bits);
                return Ok(write_padded(w, digits, precision)?);
            }
            'G' | 'g' if precision.unwrap_or(0) == 0 => {
                return Ok(write_decimal(w, int, None, info)?);
            }
            _ => {}
        }
    }

    let precision = precision.map(|p| p as usize);
    match c {
        'C' | 'c' => {
            let n = precision.unwrap_or(info.currency_decimal_digits as usize);
            let number = rounded(value, Mode::Fractional(fractional(n)), 0, n);
            let table: &[&str] = if number.is_negative() {
                &NEG_CURRENCY
            } else {
                &POS_CURRENCY
            };
            let p = if number.is_negative() {
                info.currency_negative_pattern
            } else {
                info.currency_positive_pattern
            };
            write_pattern(w, pattern(table, p), &number, n, Separators::currency(info), info)?;
        }
        'E' | 'e' => {
            let n = precision.unwrap_or(6).saturating_add(1);
            let mut number = value.to_digits(Mode::Significant(n));
            number.round(offset(0, n), value.is_rounded());
            write_sign(w, &number, info)?;
            write_scientific(w, &number, n, exp_char(c, 'E'), info)?;
        }
        'F' | 'f' => {
            let n = precision.unwrap_or(info.number_decimal_digits as usize);
            let number = rounded(value, Mode::Fractional(fractional(n)), 0, n);
            write_sign(w, &number, info)?;
            write_fixed(w, &number, n, Separators::number(info).ungrouped())?;
        }
        'N' | 'n' => {
            let n = precision.unwrap_or(info.number_decimal_digits as usize);
            let number = rounded(value, Mode::Fractional(fractional(n)), 0, n);
            let p = if number.is_negative() {
                pattern(&NEG_NUMBER, info.number_negative_pattern)
            } else {
                "#"
            };
            write_pattern(w, p, &number, n, Separators::number(info), info)?;
        }
        'P' | 'p' => {
            let n = precision.unwrap_or(info.percent_decimal_digits as usize);
            let mode = Mode::Fractional(fractional(n.saturating_add(2)));
            let number = rounded(value, mode, 2, n);
            let table: &[&str] = if number.is_negative() {
                &NEG_PERCENT
            } else {
                &POS_PERCENT
            };
            let p = if number.is_negative() {
                info.percent_negative_pattern
            } else {
                info.percent_positive_pattern
            };
            write_pattern(w, pattern(table, p), &number, n, Separators::percent(info), info)?;
        }
        'G' | 'g' => write_general(w, value, precision.filter(|&p| p > 0), exp_char(c, 'G'), info)?,
        'R' | 'r' if value.round_trips() => write_general(w, value, None, 'E', info)?,
        _ => return Err(RenderError::bad_specifier()),
    }
    Ok(())
}

fn exp_char(c: char, upper: char) -> char {
    if c == upper {
        'E'
    } else {
        'e'
    }
}

fn fractional(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Returns the digits of `value` for `mode`, multiplied by
/// `10^shift` and rounded to `n` digits after the decimal
/// point.
fn rounded<D: Digits + ?Sized>(value: &D, mode: Mode, shift: i32, n: usize) -> DigitBuffer {
    let mut number = value.to_digits(mode);
    if !number.is_empty() {
        number.set_scale(number.scale().saturating_add(shift));
    }
    let pos = offset(number.scale(), n);
    number.round(pos, value.is_rounded());
    number
}

fn write_sign<W>(w: &mut W, number: &DigitBuffer, info: &NumberFormatInfo<'_>) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    if number.is_negative() {
        w.write_str(info.negative_sign)?;
    }
    Ok(())
}

fn write_decimal<W>(
    w: &mut W,
    int: &IntegerDigits,
    precision: Option<u32>,
    info: &NumberFormatInfo<'_>,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    if int.negative {
        w.write_str(info.negative_sign)?;
    }
    let mut buf = itoa::Buffer::new();
    write_padded(w, buf.format_dec(int.magnitude), precision)
}

fn write_padded<W>(w: &mut W, digits: &str, precision: Option<u32>) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    let min = precision.map_or(0, |p| p as usize);
    itoa::write_zeros(w, min.saturating_sub(digits.len()))?;
    w.write_str(digits)
}

/// Writes `pattern`, replacing `#` with the number and `-`,
/// `$`, and `%` with the symbols of `info`.
fn write_pattern<W>(
    w: &mut W,
    pattern: &str,
    number: &DigitBuffer,
    decimals: usize,
    seps: Separators<'_>,
    info: &NumberFormatInfo<'_>,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    for c in pattern.chars() {
        match c {
            '#' => write_fixed(w, number, decimals, seps)?,
            '-' => w.write_str(info.negative_sign)?,
            '$' => w.write_str(info.currency_symbol)?,
            '%' => w.write_str(info.percent_symbol)?,
            c => w.write_char(c)?,
        }
    }
    Ok(())
}

/// Writes the number with `decimals` digits after the decimal
/// point, grouping the integer digits.
pub(super) fn write_fixed<W>(
    w: &mut W,
    number: &DigitBuffer,
    decimals: usize,
    seps: Separators<'_>,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    let scale = number.scale();
    let int_digits = usize::try_from(scale).unwrap_or(0);
    if int_digits == 0 {
        w.write_char('0')?;
    } else if seps.sizes.is_empty() {
        write_digits(w, number, 0, int_digits)?;
    } else {
        for i in 0..int_digits {
            w.write_char(digit_or_zero(number, i))?;
            let left = (int_digits - i - 1) as u64;
            if is_group_boundary(seps.sizes, left) {
                w.write_str(seps.group)?;
            }
        }
    }

    if decimals > 0 {
        w.write_str(seps.decimal)?;
        let zeros = if scale < 0 {
            usize::try_from(scale.unsigned_abs())
                .unwrap_or(usize::MAX)
                .min(decimals)
        } else {
            0
        };
        itoa::write_zeros(w, zeros)?;
        write_digits(w, number, int_digits, decimals - zeros)?;
    }
    Ok(())
}

/// Writes `n` significant digits with one before the decimal
/// point and a signed three digit exponent.
pub(super) fn write_scientific<W>(
    w: &mut W,
    number: &DigitBuffer,
    n: usize,
    exp_char: char,
    info: &NumberFormatInfo<'_>,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    w.write_char(digit_or_zero(number, 0))?;
    if n != 1 {
        w.write_str(info.number_decimal_separator)?;
        write_digits(w, number, 1, n - 1)?;
    }
    let e = if number.is_empty() {
        0
    } else {
        i64::from(number.scale()) - 1
    };
    write_exponent(w, info, e, exp_char, 3, true)
}

/// Writes the shorter of fixed and scientific notation.
fn write_general<W, D>(
    w: &mut W,
    value: &D,
    precision: Option<usize>,
    exp_char: char,
    info: &NumberFormatInfo<'_>,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    D: Digits + ?Sized,
{
    let (number, max_digits) = match (precision, value.general_precision()) {
        (Some(p), _) => {
            let mut number = value.to_digits(Mode::Significant(p));
            number.round(offset(0, p), value.is_rounded());
            (number, Some(p))
        }
        (None, Some(min)) => {
            let number = value.to_digits(Mode::Shortest);
            let max = number.len().max(min);
            (number, Some(max))
        }
        (None, None) => (value.to_digits(Mode::Shortest), None),
    };

    write_sign(w, &number, info)?;

    let scale = i64::from(number.scale());
    let scientific = max_digits.map_or(false, |max| {
        scale > i64::try_from(max).unwrap_or(i64::MAX) || scale < -3
    });
    let point = if scientific { 1 } else { scale };

    let int_digits = usize::try_from(point).unwrap_or(0);
    if int_digits == 0 {
        w.write_char('0')?;
    } else {
        write_digits(w, &number, 0, int_digits)?;
    }
    let leading = usize::try_from(-point).unwrap_or(0);
    if int_digits < number.len() || leading > 0 {
        w.write_str(info.number_decimal_separator)?;
        itoa::write_zeros(w, leading)?;
        write_digits(w, &number, int_digits, number.len().saturating_sub(int_digits))?;
    }
    if scientific {
        write_exponent(w, info, scale - 1, exp_char, 2, true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buffer::Kind,
        conv::{float_to_string, integer_to_string, write_number, RenderErrorKind},
        flt2dec::format_float,
    };

    const INV: &NumberFormatInfo<'static> = &NumberFormatInfo::INVARIANT;

    fn f64s(tests: &[(f64, &str, &str)]) {
        for &(v, format, want) in tests {
            let got = float_to_string(v, format, INV)
                .unwrap_or_else(|err| panic!("{v} {format:?}: {err}"));
            assert_eq!(got, want, "{v} {format:?}");
        }
    }

    #[test]
    fn test_general() {
        f64s(&[
            (0.0, "G", "0"),
            (-0.0, "G", "-0"),
            (1.0, "G", "1"),
            (0.1, "G", "0.1"),
            (1234.5, "", "1234.5"),
            (-1234.5, "G", "-1234.5"),
            (1e14, "G", "100000000000000"),
            (1e15, "G", "1E+15"),
            (1e16, "g", "1e+16"),
            (0.0001, "G", "0.0001"),
            (0.00001, "G", "1E-05"),
            (1.0 / 3.0, "G", "0.3333333333333333"),
            (123456789.0, "G3", "1.23E+08"),
            (0.000123456, "G2", "0.00012"),
            (2.5, "G1", "2"),
            (3.5, "G1", "4"),
            (f64::MAX, "G", "1.7976931348623157E+308"),
            (5e-324, "G", "5E-324"),
            (0.1, "R", "0.1"),
            (1e21, "r", "1E+21"),
        ]);
        assert_eq!(float_to_string(1e7f32, "G", INV).unwrap(), "1E+07");
        assert_eq!(float_to_string(1234567f32, "G", INV).unwrap(), "1234567");
    }

    #[test]
    fn test_fixed_and_number() {
        f64s(&[
            (1234.5678, "F", "1234.57"),
            (1234.5678, "F0", "1235"),
            (0.5, "F0", "0"),
            (1.5, "F0", "2"),
            (-0.001, "F2", "-0.00"),
            (0.001, "F5", "0.00100"),
            (0.125, "F2", "0.12"),
            (1e20, "F1", "100000000000000000000.0"),
            (1234567.891, "N", "1,234,567.89"),
            (-1234567.891, "N1", "-1,234,567.9"),
            (999.996, "N2", "1,000.00"),
            (12.0, "N0", "12"),
            (0.1, "F20", "0.10000000000000000555"),
        ]);
    }

    #[test]
    fn test_scientific() {
        f64s(&[
            (-1234.5, "E", "-1.234500E+003"),
            (1234.5, "e2", "1.23e+003"),
            (0.0, "E", "0.000000E+000"),
            (1.0, "E0", "1E+000"),
            (9.99, "E1", "1.0E+001"),
            (1e-10, "E3", "1.000E-010"),
            (1e300, "E0", "1E+300"),
        ]);
    }

    #[test]
    fn test_currency_and_percent() {
        f64s(&[
            (-1234.5, "C", "(¤1,234.50)"),
            (1234.5, "C0", "¤1,234"),
            (0.256, "P", "25.60 %"),
            (-0.256, "P0", "-26 %"),
            (-1234.5, "P", "-123,450.00 %"),
            (0.5, "p1", "50.0 %"),
        ]);
    }

    #[test]
    fn test_patterns() {
        let info = NumberFormatInfo {
            currency_symbol: "€",
            currency_positive_pattern: 3,
            currency_negative_pattern: 8,
            currency_decimal_separator: ",",
            currency_group_separator: ".",
            number_negative_pattern: 4,
            percent_positive_pattern: 1,
            percent_negative_pattern: 99,
            ..NumberFormatInfo::INVARIANT
        };
        let f = |v: f64, format| float_to_string(v, format, &info).unwrap();
        assert_eq!(f(1234.5, "C"), "1.234,50 €");
        assert_eq!(f(-1234.5, "C"), "-1.234,50 €");
        assert_eq!(f(-1.5, "N1"), "1.5 -");
        assert_eq!(f(0.5, "P0"), "50%");
        assert_eq!(f(-0.5, "P0"), "-50 %");
    }

    #[test]
    fn test_group_sizes() {
        let info = NumberFormatInfo {
            number_group_sizes: &[3, 2],
            ..NumberFormatInfo::INVARIANT
        };
        let got = float_to_string(1234567890.0, "N0", &info).unwrap();
        assert_eq!(got, "1,23,45,67,890");
        let info = NumberFormatInfo {
            number_group_sizes: &[3, 0],
            ..NumberFormatInfo::INVARIANT
        };
        let got = float_to_string(1234567890.0, "N0", &info).unwrap();
        assert_eq!(got, "1234567,890");
        let info = NumberFormatInfo {
            number_group_sizes: &[],
            ..NumberFormatInfo::INVARIANT
        };
        let got = float_to_string(1234567890.0, "N0", &info).unwrap();
        assert_eq!(got, "1234567890");
    }

    #[test]
    fn test_integers() {
        let i = |v: i64, format| integer_to_string(v, format, INV).unwrap();
        assert_eq!(i(0, ""), "0");
        assert_eq!(i(-42, "G"), "-42");
        assert_eq!(i(-42, "G0"), "-42");
        assert_eq!(i(12345, "G3"), "1.23E+04");
        assert_eq!(i(12345, "g10"), "12345");
        assert_eq!(i(-42, "D5"), "-00042");
        assert_eq!(i(42, "d"), "42");
        assert_eq!(i(-1, "X"), "FFFFFFFFFFFFFFFF");
        assert_eq!(i(255, "x4"), "00ff");
        assert_eq!(i(5, "B8"), "00000101");
        assert_eq!(i(1234567, "N"), "1,234,567.00");
        assert_eq!(i(-5, "F1"), "-5.0");
        assert_eq!(i(15, "E1"), "1.5E+001");
        assert_eq!(i(25, "E0"), "2E+001");
        assert_eq!(i(1, "P0"), "100 %");
        assert_eq!(i(1234, "C"), "¤1,234.00");
        assert_eq!(
            integer_to_string(i128::MIN, "", INV).unwrap(),
            i128::MIN.to_string()
        );
        assert_eq!(integer_to_string(-1i8, "b", INV).unwrap(), "11111111");
    }

    #[test]
    fn test_bad_specifier() {
        for format in ["R", "Q", "z3"] {
            let err = integer_to_string(1u8, format, INV).unwrap_err();
            assert_eq!(err.kind(), RenderErrorKind::BadSpecifier, "{format}");
        }
        for format in ["D", "X", "b2", "Y"] {
            let err = float_to_string(1.0f64, format, INV).unwrap_err();
            assert_eq!(err.kind(), RenderErrorKind::BadSpecifier, "{format}");
        }
    }

    #[test]
    fn test_large_precision() {
        let s = float_to_string(1.0f64, "F1000", INV).unwrap();
        assert_eq!(s.len(), 1002);
        assert!(s.starts_with("1.000"));
        let s = float_to_string(0.1f64, "E800", INV).unwrap();
        assert!(s.ends_with("E-001"));
        assert_eq!(s.len(), 2 + 800 + 5);
        let s = integer_to_string(7u8, "D100", INV).unwrap();
        assert_eq!(s.len(), 100);
    }

    #[test]
    fn test_digit_buffer() {
        let mut number = DigitBuffer::new(Kind::Decimal, 16);
        for d in b"1234500" {
            number.push(*d);
        }
        number.set_scale(30);
        number.set_negative(true);
        let s = |format| {
            let mut s = String::new();
            write_number(&mut s, &number, format, INV).unwrap();
            s
        };
        assert_eq!(s(""), "-123450000000000000000000000000");
        assert_eq!(s("G3"), "-1.23E+29");
        assert_eq!(s("E2"), "-1.23E+029");
        let err = write_number(&mut String::new(), &number, "R", INV).unwrap_err();
        assert_eq!(err.kind(), RenderErrorKind::BadSpecifier);
    }

    #[test]
    fn test_digit_buffer_rounds() {
        let s = |number: &DigitBuffer, format| {
            let mut s = String::new();
            write_number(&mut s, number, format, INV).unwrap();
            s
        };

        let shortest = format_float(1.26f64, None, false);
        assert_eq!(shortest.kind(), Kind::FloatingPoint);
        assert_eq!(s(&shortest, "F1"), "1.3");
        assert_eq!(s(&shortest, "E1"), "1.3E+000");
        assert_eq!(s(&shortest, "G2"), "1.3");
        assert_eq!(s(&shortest, "N1"), "1.3");
        assert_eq!(s(&shortest, "0.0"), "1.3");

        let mut tie = DigitBuffer::new(Kind::FloatingPoint, 20);
        for d in b"125" {
            tie.push(*d);
        }
        assert_eq!(s(&tie, "F2"), "0.12");
        assert_eq!(s(&tie, "F1"), "0.1");
        tie.set_nonzero_tail(true);
        assert_eq!(s(&tie, "F2"), "0.13");

        let int = DigitBuffer::from_integer(125u32);
        assert_eq!(s(&int, "E1"), "1.2E+002");
        assert_eq!(s(&int, "G2"), "1.2E+02");
    }
}
