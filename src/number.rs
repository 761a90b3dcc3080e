//! The numeric string tokenizer.
//!
//! It accepts the grammar
//!
//! ```text
//! [ws][$][sign][digits,]digits[.[digits]][E[sign]digits][sign][$][ws]
//! ```
//!
//! with every element gated by a [`NumberStyles`] flag, and
//! stores the significant digits in a [`DigitBuffer`].

use bitflags::bitflags;

use super::{
    buffer::{DigitBuffer, Kind},
    conv::ParseError,
    ctx::{NumberFormatInfo, NumberStyles},
    util::is_white,
};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
struct State(u8);

bitflags! {
    impl State: u8 {
        const SIGN = 0x1;
        const PARENS = 0x2;
        const DIGITS = 0x4;
        const NON_ZERO = 0x8;
        const DECIMAL = 0x10;
        const CURRENCY = 0x20;
    }
}

/// Exponents at or above this saturate.
const MAX_EXPONENT: i32 = 100_000_000;

struct Cursor<'s> {
    s: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn rest(&self) -> &'s str {
        self.s.get(self.pos..).unwrap_or_default()
    }

    /// Returns the current character or NUL at the end.
    fn ch(&self) -> char {
        self.rest().chars().next().unwrap_or('\0')
    }

    fn bump(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.pos += c.len_utf8();
        }
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }
}

/// Returns the length of `value` at the start of `s`.
///
/// A no-break space in `value` also matches a plain space,
/// since that is what people type. An empty `value` never
/// matches.
fn match_chars(s: &str, value: &str) -> Option<usize> {
    if value.is_empty() {
        return None;
    }
    let mut n = 0;
    let mut chars = s.chars();
    for v in value.chars() {
        let c = chars.next()?;
        if c != v && !(matches!(v, '\u{a0}' | '\u{202f}') && c == ' ') {
            return None;
        }
        n += c.len_utf8();
    }
    Some(n)
}

fn match_negative_sign(s: &str, info: &NumberFormatInfo<'_>) -> Option<usize> {
    match_chars(s, info.negative_sign).or_else(|| {
        (info.allow_hyphen_during_parsing() && s.starts_with('-')).then_some(1)
    })
}

/// Parses the longest prefix of `s` that is a number in
/// `styles` into `number`.
///
/// Returns the length of the prefix, or `None` if there is no
/// number.
pub(crate) fn parse_prefix(
    s: &str,
    styles: NumberStyles,
    info: &NumberFormatInfo<'_>,
    number: &mut DigitBuffer,
) -> Option<usize> {
    let parsing_currency = styles.contains(NumberStyles::ALLOW_CURRENCY_SYMBOL);
    let (dec_sep, group_sep, mut currency) = if parsing_currency {
        (
            info.currency_decimal_separator,
            info.currency_group_separator,
            Some(info.currency_symbol),
        )
    } else {
        (
            info.number_decimal_separator,
            info.number_group_separator,
            None,
        )
    };
    // Before a currency symbol has been seen, the number
    // separators are accepted as well.
    let separator = |rest: &str, sep: &str, fallback: &str, state: State| {
        match_chars(rest, sep).or_else(|| {
            if parsing_currency && !state.contains(State::CURRENCY) {
                match_chars(rest, fallback)
            } else {
                None
            }
        })
    };

    let decimal_point = |rest: &str, state: State| {
        if !styles.contains(NumberStyles::ALLOW_DECIMAL_POINT) || state.contains(State::DECIMAL) {
            return None;
        }
        separator(rest, dec_sep, info.number_decimal_separator, state)
    };
    let group_separator = |rest: &str, state: State| {
        if !styles.contains(NumberStyles::ALLOW_THOUSANDS)
            || !state.contains(State::DIGITS)
            || state.contains(State::DECIMAL)
        {
            return None;
        }
        separator(rest, group_sep, info.number_group_separator, state)
    };

    let mut state = State::empty();
    let mut cur = Cursor { s, pos: 0 };

    loop {
        let ch = cur.ch();
        // "-$ 1" is fine but "- 1" is not, unless the locale
        // writes negative numbers that way.
        let skip_white = is_white(ch)
            && styles.contains(NumberStyles::ALLOW_LEADING_WHITE)
            && (!state.contains(State::SIGN)
                || state.contains(State::CURRENCY)
                || info.number_negative_pattern == 2);
        if !skip_white {
            if styles.contains(NumberStyles::ALLOW_LEADING_SIGN) && !state.contains(State::SIGN) {
                if let Some(n) = match_chars(cur.rest(), info.positive_sign) {
                    state |= State::SIGN;
                    cur.advance(n);
                    continue;
                }
                if let Some(n) = match_negative_sign(cur.rest(), info) {
                    state |= State::SIGN;
                    number.set_negative(true);
                    cur.advance(n);
                    continue;
                }
            }
            if ch == '('
                && styles.contains(NumberStyles::ALLOW_PARENTHESES)
                && !state.contains(State::SIGN)
            {
                state |= State::SIGN | State::PARENS;
                number.set_negative(true);
            } else if let Some(n) = currency.and_then(|c| match_chars(cur.rest(), c)) {
                state |= State::CURRENCY;
                currency = None;
                cur.advance(n);
                continue;
            } else {
                break;
            }
        }
        cur.bump();
    }

    let max_digits = number.max_digits();
    let integer = number.kind() == Kind::Integer;
    let mut count = 0;
    let mut end = 0;
    let mut scale: i32 = 0;
    loop {
        let ch = cur.ch();
        if ch.is_ascii_digit() {
            state |= State::DIGITS;
            if ch != '0' || state.contains(State::NON_ZERO) {
                if count < max_digits {
                    if let Some(d) = number.spare_mut().get_mut(count) {
                        *d = ch as u8;
                    }
                    if ch != '0' || !integer {
                        end = count + 1;
                    }
                } else if ch != '0' {
                    number.set_nonzero_tail(true);
                }
                if !state.contains(State::DECIMAL) {
                    scale = scale.saturating_add(1);
                }
                count += 1;
                state |= State::NON_ZERO;
            } else if state.contains(State::DECIMAL) {
                scale = scale.saturating_sub(1);
            }
        } else if let Some(n) = decimal_point(cur.rest(), state) {
            state |= State::DECIMAL;
            cur.advance(n);
            continue;
        } else if let Some(n) = group_separator(cur.rest(), state) {
            cur.advance(n);
            continue;
        } else {
            break;
        }
        cur.bump();
    }
    number.set_len(end);

    if !state.contains(State::DIGITS) {
        return None;
    }

    if matches!(cur.ch(), 'e' | 'E') && styles.contains(NumberStyles::ALLOW_EXPONENT) {
        let mark = cur.pos;
        cur.bump();
        let mut negative = false;
        if let Some(n) = match_chars(cur.rest(), info.positive_sign) {
            cur.advance(n);
        } else if let Some(n) = match_negative_sign(cur.rest(), info) {
            cur.advance(n);
            negative = true;
        }
        if cur.ch().is_ascii_digit() {
            let mut exp: i32 = 0;
            while let Some(d) = cur.ch().to_digit(10) {
                if exp >= MAX_EXPONENT {
                    // Far out of range of every type. Skip the
                    // remaining digits and saturate.
                    exp = i32::MAX;
                    scale = 0;
                    while cur.ch().is_ascii_digit() {
                        cur.bump();
                    }
                    break;
                }
                exp = exp * 10 + d as i32;
                cur.bump();
            }
            if negative {
                exp = -exp;
            }
            scale = scale.saturating_add(exp);
        } else {
            // Not an exponent after all; the trailing checks
            // decide whether the `e` is allowed.
            cur.pos = mark;
        }
    }

    if number.kind() == Kind::FloatingPoint && !number.has_nonzero_tail() {
        // Zeros after the last non-zero digit carry no value.
        number.trim_trailing_zeros();
    }

    loop {
        let ch = cur.ch();
        if !is_white(ch) || !styles.contains(NumberStyles::ALLOW_TRAILING_WHITE) {
            if styles.contains(NumberStyles::ALLOW_TRAILING_SIGN) && !state.contains(State::SIGN) {
                if let Some(n) = match_chars(cur.rest(), info.positive_sign) {
                    state |= State::SIGN;
                    cur.advance(n);
                    continue;
                }
                if let Some(n) = match_negative_sign(cur.rest(), info) {
                    state |= State::SIGN;
                    number.set_negative(true);
                    cur.advance(n);
                    continue;
                }
            }
            if ch == ')' && state.contains(State::PARENS) {
                state.remove(State::PARENS);
            } else if let Some(n) = currency.and_then(|c| match_chars(cur.rest(), c)) {
                currency = None;
                cur.advance(n);
                continue;
            } else {
                break;
            }
        }
        cur.bump();
    }

    if state.contains(State::PARENS) {
        return None;
    }
    if !state.contains(State::NON_ZERO) {
        if number.kind() != Kind::Decimal {
            scale = 0;
        }
        if integer && !state.contains(State::DECIMAL) {
            number.set_negative(false);
        }
    }
    number.set_scale(scale);
    number.check_consistency();
    Some(cur.pos)
}

/// Parses all of `s` into `number`.
///
/// Only NULs may follow the number.
pub(crate) fn parse_exact(
    s: &str,
    styles: NumberStyles,
    info: &NumberFormatInfo<'_>,
    number: &mut DigitBuffer,
) -> Result<(), ParseError> {
    let end = parse_prefix(s, styles, info, number).ok_or(ParseError::invalid())?;
    let rest = s.get(end..).unwrap_or_default();
    if !rest.chars().all(|c| c == '\0') {
        return Err(ParseError::invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INV: &NumberFormatInfo<'static> = &NumberFormatInfo::INVARIANT;

    fn parse(s: &str, styles: NumberStyles, kind: Kind) -> Option<(String, i32, bool)> {
        let mut number = DigitBuffer::new(kind, 20);
        parse_exact(s, styles, INV, &mut number).ok()?;
        let digits = String::from_utf8(number.digits().to_vec()).unwrap();
        Some((digits, number.scale(), number.is_negative()))
    }

    fn float(s: &str) -> Option<(String, i32, bool)> {
        parse(s, NumberStyles::ANY, Kind::FloatingPoint)
    }

    #[test]
    fn test_digits_and_scale() {
        let tests: &[(&str, &str, i32, bool)] = &[
            ("0", "", 0, false),
            ("-0", "", 0, true),
            ("000123", "123", 3, false),
            ("123.4500", "12345", 3, false),
            ("0.0012", "12", -2, false),
            ("  -1,234.5  ", "12345", 4, true),
            ("1.5e3", "15", 4, false),
            ("1.5E-3", "15", -2, false),
            ("1.5e+3", "15", 4, false),
            ("(5)", "5", 1, true),
            ("5-", "5", 1, true),
            ("\u{a4}5", "5", 1, false),
            ("-\u{a4} 5", "5", 1, true),
            ("5 \u{a4}", "5", 1, false),
            (".5", "5", 0, false),
            ("5.", "5", 1, false),
        ];
        for &(s, digits, scale, negative) in tests {
            let got = float(s).unwrap_or_else(|| panic!("{s:?} did not parse"));
            assert_eq!(got, (digits.to_string(), scale, negative), "{s:?}");
        }
    }

    #[test]
    fn test_rejects() {
        let tests = [
            "", " ", "-", ".", "1.2.3", "1 2", "--1", "-+1", "(1", "1)", "- 1", "1e+", "+",
            ",1", "1-2", "x", "1e",
        ];
        for s in tests {
            assert_eq!(float(s), None, "{s:?}");
        }
        assert_eq!(parse("1e", NumberStyles::INTEGER, Kind::FloatingPoint), None);
    }

    #[test]
    fn test_styles_gate_elements() {
        let integer = NumberStyles::INTEGER;
        assert!(parse(" -12 ", integer, Kind::Integer).is_some());
        assert_eq!(parse("1.5", integer, Kind::Integer), None);
        assert_eq!(parse("1,000", integer, Kind::Integer), None);
        assert_eq!(parse("1e3", integer, Kind::Integer), None);
        assert_eq!(parse("12-", integer, Kind::Integer), None);
        assert_eq!(parse(" 1", NumberStyles::empty(), Kind::Integer), None);
        assert_eq!(parse("1 ", NumberStyles::ALLOW_LEADING_WHITE, Kind::Integer), None);
    }

    #[test]
    fn test_integer_kind() {
        let got = parse("1200", NumberStyles::INTEGER, Kind::Integer);
        assert_eq!(got, Some(("12".to_string(), 4, false)));
        let got = parse("-0", NumberStyles::INTEGER, Kind::Integer);
        assert_eq!(got, Some((String::new(), 0, false)));
    }

    #[test]
    fn test_nonzero_tail() {
        let mut number = DigitBuffer::new(Kind::FloatingPoint, 4);
        parse_exact("12340005", NumberStyles::FLOAT, INV, &mut number).unwrap();
        assert_eq!(number.digits(), b"123");
        assert_eq!(number.scale(), 8);
        assert!(number.has_nonzero_tail());

        let mut number = DigitBuffer::new(Kind::FloatingPoint, 4);
        parse_exact("1230000", NumberStyles::FLOAT, INV, &mut number).unwrap();
        assert_eq!(number.digits(), b"123");
        assert!(!number.has_nonzero_tail());
    }

    #[test]
    fn test_exponent_saturates() {
        let (_, scale, _) = float("1e99999999999").unwrap();
        assert_eq!(scale, i32::MAX);
        let (_, scale, _) = float("1e-99999999999").unwrap();
        assert_eq!(scale, -i32::MAX);
        let (_, scale, _) = float("1e99999999").unwrap();
        assert_eq!(scale, 100_000_000);
    }

    #[test]
    fn test_locale() {
        let info = NumberFormatInfo {
            number_decimal_separator: ",",
            number_group_separator: "\u{a0}",
            negative_sign: "\u{2212}",
            ..NumberFormatInfo::INVARIANT
        };
        let mut number = DigitBuffer::new(Kind::FloatingPoint, 20);
        parse_exact("-1 234,5", NumberStyles::NUMBER, &info, &mut number).unwrap();
        assert_eq!(number.digits(), b"12345");
        assert_eq!(number.scale(), 4);
        assert!(number.is_negative());

        let mut number = DigitBuffer::new(Kind::FloatingPoint, 20);
        parse_exact("\u{2212}1\u{a0}234", NumberStyles::NUMBER, &info, &mut number).unwrap();
        assert_eq!(number.digits(), b"1234");
        assert!(number.is_negative());
    }

    #[test]
    fn test_currency_separators() {
        let info = NumberFormatInfo {
            currency_symbol: "kr",
            currency_decimal_separator: ",",
            currency_group_separator: ".",
            ..NumberFormatInfo::INVARIANT
        };
        let mut number = DigitBuffer::new(Kind::FloatingPoint, 20);
        parse_exact("kr 1.234,5", NumberStyles::CURRENCY, &info, &mut number).unwrap();
        assert_eq!(number.digits(), b"12345");
        assert_eq!(number.scale(), 4);

        // Before the currency symbol the number decimal
        // separator is accepted too.
        let mut number = DigitBuffer::new(Kind::FloatingPoint, 20);
        parse_exact("1.5", NumberStyles::CURRENCY, &info, &mut number).unwrap();
        assert_eq!(number.digits(), b"15");
        assert_eq!(number.scale(), 1);
        // After it, `.` is only a group separator.
        let mut number = DigitBuffer::new(Kind::FloatingPoint, 20);
        parse_exact("kr1.5", NumberStyles::CURRENCY, &info, &mut number).unwrap();
        assert_eq!(number.digits(), b"15");
        assert_eq!(number.scale(), 2);
    }
}
