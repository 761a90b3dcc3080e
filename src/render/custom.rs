//! Custom formats such as `#,##0.00;(#,##0.00);'zero'`.
//!
//! A format has up to three sections separated by `;`: one
//! for positive numbers, one for negative numbers, and one for
//! zero. A missing or empty section falls back to the first.
//!
//! | char | meaning |
//! |------|---------|
//! | `0`  | a digit, or a zero if there is none |
//! | `#`  | a digit, or nothing if there is none |
//! | `.`  | the decimal point |
//! | `,`  | group separators between `0` and `#`, otherwise divides by 1000 |
//! | `%`  | multiplies by 100 and writes the percent symbol |
//! | `‰`  | multiplies by 1000 and writes the per mille symbol |
//! | `E0`, `E+0`, `E-0` | scientific notation, once per section |
//! | `'...'`, `"..."` | literal text |
//! | `\c` | the literal `c` |
//!
//! Every other character is copied as is.

use core::{
    fmt::{self, Write},
    str::Chars,
};

use super::{is_group_boundary, write_exponent, Digits, SignWriter};
use crate::{
    buffer::{DigitBuffer, Kind},
    conv::RenderError,
    ctx::NumberFormatInfo,
    flt2dec::Mode,
};

/// The largest number of exponent digits.
const MAX_EXPONENT_DIGITS: usize = 10;

/// What a single scan over a section found.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
struct Layout {
    /// Number of `0` and `#` placeholders.
    digit_count: i64,
    /// Placeholders before the decimal point.
    decimal_pos: i64,
    /// Placeholders before the first `0`.
    first_digit: i64,
    /// Placeholders up to and including the last `0`.
    last_digit: i64,
    scientific: bool,
    thousand_seps: bool,
    /// Power of ten to multiply by.
    scale_adjust: i64,
}

fn peek(chars: &Chars<'_>) -> Option<char> {
    chars.clone().next()
}

/// Consumes quoted text and the closing quote, stopping early
/// at a NUL.
fn quoted<'f>(chars: &mut Chars<'f>, quote: char) -> &'f str {
    let rest = chars.as_str();
    let end = rest.find(|c| c == quote || c == '\0').unwrap_or(rest.len());
    let (text, after) = rest.split_at(end);
    *chars = after.strip_prefix(quote).unwrap_or(after).chars();
    text
}

/// Consumes the character after a backslash.
fn escaped(chars: &mut Chars<'_>) -> Option<char> {
    let c = peek(chars).filter(|&c| c != '\0')?;
    chars.next();
    Some(c)
}

/// Reports whether an `E` followed by `chars` is an exponent.
fn is_exponent(chars: &Chars<'_>) -> bool {
    let mut ahead = chars.clone();
    match ahead.next() {
        Some('0') => true,
        Some('+' | '-') => ahead.next() == Some('0'),
        _ => false,
    }
}

/// Consumes zeros and returns how many there were.
fn skip_zeros(chars: &mut Chars<'_>) -> usize {
    let mut n = 0;
    while peek(chars) == Some('0') {
        chars.next();
        n += 1;
    }
    n
}

/// Returns the byte offset of `section`, or zero if that
/// section is missing or empty.
fn find_section(format: &str, section: usize) -> usize {
    let mut remaining = section;
    if remaining == 0 {
        return 0;
    }
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' => {
                quoted(&mut chars, ch);
            }
            '\\' => {
                escaped(&mut chars);
            }
            ';' => {
                remaining -= 1;
                if remaining != 0 {
                    continue;
                }
                return match peek(&chars) {
                    Some(c) if c != '\0' && c != ';' => format.len() - chars.as_str().len(),
                    _ => 0,
                };
            }
            '\0' => return 0,
            _ => {}
        }
    }
    0
}

fn scan(section: &str) -> Layout {
    let mut layout = Layout {
        decimal_pos: -1,
        first_digit: i64::MAX,
        ..Layout::default()
    };
    let mut thousand_pos = -1;
    let mut thousand_count = 0;

    let mut chars = section.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\0' | ';' => break,
            '#' => layout.digit_count += 1,
            '0' => {
                if layout.first_digit == i64::MAX {
                    layout.first_digit = layout.digit_count;
                }
                layout.digit_count += 1;
                layout.last_digit = layout.digit_count;
            }
            '.' => {
                if layout.decimal_pos < 0 {
                    layout.decimal_pos = layout.digit_count;
                }
            }
            ',' => {
                if layout.digit_count > 0 && layout.decimal_pos < 0 {
                    if thousand_pos >= 0 {
                        if thousand_pos == layout.digit_count {
                            thousand_count += 1;
                            continue;
                        }
                        layout.thousand_seps = true;
                    }
                    thousand_pos = layout.digit_count;
                    thousand_count = 1;
                }
            }
            '%' => layout.scale_adjust += 2,
            '\u{2030}' => layout.scale_adjust += 3,
            '\'' | '"' => {
                quoted(&mut chars, ch);
            }
            '\\' => {
                escaped(&mut chars);
            }
            'E' | 'e' => {
                if is_exponent(&chars) {
                    chars.next();
                    skip_zeros(&mut chars);
                    layout.scientific = true;
                }
            }
            _ => {}
        }
    }

    if layout.decimal_pos < 0 {
        layout.decimal_pos = layout.digit_count;
    }
    if thousand_pos >= 0 {
        if thousand_pos == layout.decimal_pos {
            // Trailing commas divide by 1000 each.
            layout.scale_adjust -= thousand_count * 3;
        } else {
            layout.thousand_seps = true;
        }
    }
    layout
}

fn saturate(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

/// Returns the next digit, if any remain.
fn next_digit(number: &DigitBuffer, cur: &mut usize) -> Option<char> {
    match number.digit(*cur) {
        0 => None,
        d => {
            *cur += 1;
            Some(char::from(d))
        }
    }
}

fn write_group<W>(w: &mut W, info: &NumberFormatInfo<'_>, layout: &Layout, dig_pos: i64) -> fmt::Result
where
    W: Write + ?Sized,
{
    if !layout.thousand_seps || dig_pos <= 1 {
        return Ok(());
    }
    let n = u64::try_from(dig_pos - 1).unwrap_or(0);
    if is_group_boundary(info.number_group_sizes, n) {
        w.write_str(info.number_group_separator)?;
    }
    Ok(())
}

pub(super) fn render<W, D>(
    w: &mut W,
    value: &D,
    format: &str,
    info: &NumberFormatInfo<'_>,
) -> Result<(), RenderError>
where
    W: Write + ?Sized,
    D: Digits + ?Sized,
{
    let mut number = value.to_digits(Mode::Shortest);
    let wanted = if number.is_empty() {
        2
    } else if number.is_negative() {
        1
    } else {
        0
    };
    let mut section = find_section(format, wanted);

    let mut layout = loop {
        let layout = scan(format.get(section..).unwrap_or_default());
        if number.is_empty() {
            if number.kind() != Kind::FloatingPoint {
                number.set_negative(false);
            }
            number.set_scale(0);
        } else {
            let scale = i64::from(number.scale()) + layout.scale_adjust;
            number.set_scale(saturate(scale));
            let pos = if layout.scientific {
                layout.digit_count
            } else {
                scale + layout.digit_count - layout.decimal_pos
            };
            number.round(saturate(pos), false);
            if number.is_empty() {
                let zero = find_section(format, 2);
                if zero != section {
                    section = zero;
                    continue;
                }
            }
        }
        break layout;
    };

    let scale = i64::from(number.scale());
    let decimal_pos = layout.decimal_pos;
    let first_digit = if layout.first_digit < decimal_pos {
        decimal_pos - layout.first_digit
    } else {
        0
    };
    let last_digit = if layout.last_digit > decimal_pos {
        decimal_pos - layout.last_digit
    } else {
        0
    };
    // Digits left of the decimal point still to write, and how
    // many more digits the number has than the format.
    let (mut dig_pos, mut adjust) = if layout.scientific {
        (decimal_pos, 0)
    } else {
        (scale.max(decimal_pos), scale - decimal_pos)
    };

    let sign = (number.is_negative() && section == 0).then_some(info.negative_sign);
    let mut w = SignWriter { w, sign };
    if scale != 0 {
        w.flush_sign()?;
    }

    let mut cur = 0;
    let mut decimal_written = false;
    let mut chars = format.get(section..).unwrap_or_default().chars();
    while let Some(ch) = chars.next() {
        if ch == '\0' || ch == ';' {
            break;
        }
        if adjust > 0 && matches!(ch, '#' | '0' | '.') {
            while adjust > 0 {
                w.write_char(next_digit(&number, &mut cur).unwrap_or('0'))?;
                write_group(&mut w, info, &layout, dig_pos)?;
                dig_pos -= 1;
                adjust -= 1;
            }
        }

        match ch {
            '#' | '0' => {
                let d = if adjust < 0 {
                    adjust += 1;
                    (dig_pos <= first_digit).then_some('0')
                } else {
                    next_digit(&number, &mut cur).or((dig_pos > last_digit).then_some('0'))
                };
                if let Some(d) = d {
                    w.write_char(d)?;
                    write_group(&mut w, info, &layout, dig_pos)?;
                }
                dig_pos -= 1;
            }
            '.' => {
                let digits_left = decimal_pos < layout.digit_count && cur < number.len();
                if dig_pos == 0 && !decimal_written && (last_digit < 0 || digits_left) {
                    w.write_str(info.number_decimal_separator)?;
                    decimal_written = true;
                }
            }
            '\u{2030}' => w.write_str(info.per_mille_symbol)?,
            '%' => w.write_str(info.percent_symbol)?,
            ',' => {}
            '\'' | '"' => w.write_str(quoted(&mut chars, ch))?,
            '\\' => {
                if let Some(c) = escaped(&mut chars) {
                    w.write_char(c)?;
                }
            }
            'E' | 'e' if layout.scientific && is_exponent(&chars) => {
                let positive_sign = peek(&chars) == Some('+');
                let first_zero = peek(&chars) == Some('0');
                chars.next();
                let zeros = usize::from(first_zero) + skip_zeros(&mut chars);
                let e = if number.is_empty() {
                    0
                } else {
                    scale - decimal_pos
                };
                write_exponent(&mut w, info, e, ch, zeros.min(MAX_EXPONENT_DIGITS), positive_sign)?;
                layout.scientific = false;
            }
            'E' | 'e' if !layout.scientific => {
                w.write_char(ch)?;
                if let Some(sign @ ('+' | '-')) = peek(&chars) {
                    chars.next();
                    w.write_char(sign)?;
                }
                for _ in 0..skip_zeros(&mut chars) {
                    w.write_char('0')?;
                }
            }
            c => w.write_char(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conv::{float_to_string, integer_to_string, write_number};

    const INV: &NumberFormatInfo<'static> = &NumberFormatInfo::INVARIANT;

    fn f(v: f64, format: &str) -> String {
        float_to_string(v, format, INV).unwrap_or_else(|err| panic!("{v} {format:?}: {err}"))
    }

    fn i(v: i64, format: &str) -> String {
        integer_to_string(v, format, INV).unwrap_or_else(|err| panic!("{v} {format:?}: {err}"))
    }

    #[test]
    fn test_find_section() {
        assert_eq!(find_section("a;b;c", 0), 0);
        assert_eq!(find_section("a;b;c", 1), 2);
        assert_eq!(find_section("a;b;c", 2), 4);
        assert_eq!(find_section("a;b", 2), 0);
        assert_eq!(find_section("a;;c", 1), 0);
        assert_eq!(find_section("a;;c", 2), 3);
        assert_eq!(find_section("'a;b';c", 1), 6);
        assert_eq!(find_section("a\\;b;c", 1), 5);
        assert_eq!(find_section("a\0;b", 1), 0);
    }

    #[test]
    fn test_scan() {
        let layout = scan("#,##0.00");
        assert_eq!(
            layout,
            Layout {
                digit_count: 6,
                decimal_pos: 4,
                first_digit: 3,
                last_digit: 6,
                scientific: false,
                thousand_seps: true,
                scale_adjust: 0,
            }
        );
        assert_eq!(scan("0,,").scale_adjust, -6);
        assert!(!scan("0,,").thousand_seps);
        assert_eq!(scan("0.0%‰").scale_adjust, 5);
        assert!(scan("0E+0").scientific);
        assert!(!scan("0E+").scientific);
        assert!(!scan("'0E0'").scientific);
        assert_eq!(scan("0;00").digit_count, 1);
    }

    #[test]
    fn test_digits() {
        let tests: &[(f64, &str, &str)] = &[
            (1234567.0, "#,##0", "1,234,567"),
            (1234567.0, "#,#", "1,234,567"),
            (1234.5678, "0.00", "1234.57"),
            (1234.5678, "#", "1235"),
            (0.05, "0.0#", "0.05"),
            (0.5, "0.##", "0.5"),
            (12.0, "0000", "0012"),
            (12.0, "#.##", "12"),
            (0.0, "#,##0", "0"),
            (0.0, "0.00", "0.00"),
            (0.0, "#", ""),
            (-0.0, "0.00", "-0.00"),
            (-1234.5, "0.0", "-1234.5"),
            (123.0, "00.00.00", "123.0000"),
            (1e20, "0", "100000000000000000000"),
        ];
        for &(v, format, want) in tests {
            assert_eq!(f(v, format), want, "{v} {format:?}");
        }
    }

    #[test]
    fn test_sections() {
        let format = "#,##0.00;(#,##0.00);zero";
        assert_eq!(f(1234.5, format), "1,234.50");
        assert_eq!(f(-1234.5, format), "(1,234.50)");
        assert_eq!(f(0.0, format), "zero");
        assert_eq!(f(0.0001, format), "zero");
        assert_eq!(f(-0.0001, format), "zero");
        assert_eq!(f(0.001, "0.0;-0.0"), "0.0");
        assert_eq!(f(-0.001, "0.0;minus 0.0"), "-0.0");
        assert_eq!(f(-5.0, "0;;zero"), "-5");
        assert_eq!(i(-5, "0;(0)"), "(5)");
        assert_eq!(i(0, "0;(0);"), "0");
    }

    #[test]
    fn test_literals() {
        assert_eq!(f(12.0, "'#'0 \\# \"x\""), "#12 # x");
        assert_eq!(f(-12.0, "'x'0"), "-x12");
        assert_eq!(f(-5.0, "abc"), "-abc");
        assert_eq!(f(1.5, "0.0\0junk"), "1.5");
        assert_eq!(f(1.5, "0.0 'open"), "1.5 open");
        assert_eq!(f(7.0, "0\\"), "7");
    }

    #[test]
    fn test_scientific() {
        let tests: &[(f64, &str, &str)] = &[
            (1234.5, "0.00E+00", "1.23E+03"),
            (1234.5, "0.0E-0", "1.2E3"),
            (0.00012, "0.0e0", "1.2e-4"),
            (0.00012, "0.0e+0", "1.2e-4"),
            (1.0, "0E+000000000000", "1E+0000000000"),
            (0.0, "0.0E+0", "0.0E+0"),
            (123456.0, "##0.0E0", "123.5E3"),
            (5.0, "0E", "5E"),
            (5.0, "0 e+0", "5 e+0"),
            (5.0, "0 Ex", "5 Ex"),
        ];
        for &(v, format, want) in tests {
            assert_eq!(f(v, format), want, "{v} {format:?}");
        }
        assert_eq!(f(5.0, "0E0 E0"), "5E0 E0");
    }

    #[test]
    fn test_scaling() {
        assert_eq!(f(1234567.0, "#,##0,,"), "1");
        assert_eq!(f(1234567.0, "0,,.0"), "1.2");
        assert_eq!(f(0.256, "0.0%"), "25.6%");
        assert_eq!(f(0.0256, "0‰"), "26‰");
        assert_eq!(i(1234567890, "#,##0,"), "1,234,568");
    }

    #[test]
    fn test_integers() {
        assert_eq!(i(i64::MAX, "#,#"), "9,223,372,036,854,775,807");
        assert_eq!(i(i64::MIN, "0"), "-9223372036854775808");
        assert_eq!(i(42, "0000.0"), "0042.0");
        assert_eq!(i(15, "#0"), "15");
        assert_eq!(i(0, "#"), "");
    }

    #[test]
    fn test_locale() {
        let info = NumberFormatInfo {
            negative_sign: "\u{2212}",
            number_decimal_separator: ",",
            number_group_separator: "\u{a0}",
            number_group_sizes: &[3, 2],
            percent_symbol: "pct",
            ..NumberFormatInfo::INVARIANT
        };
        let s = float_to_string(-12345678.25, "#,##0.00", &info).unwrap();
        assert_eq!(s, "\u{2212}1\u{a0}23\u{a0}45\u{a0}678,25");
        let s = float_to_string(0.5, "0%", &info).unwrap();
        assert_eq!(s, "50pct");
    }

    #[test]
    fn test_digit_buffer() {
        let mut number = DigitBuffer::new(Kind::Decimal, 8);
        for d in b"12" {
            number.push(*d);
        }
        number.set_scale(-1);
        number.set_negative(true);
        let mut s = String::new();
        write_number(&mut s, &number, "0.000", INV).unwrap();
        assert_eq!(s, "-0.012");
    }
}
