macro_rules! const_assert {
    ($($tt:tt)*) => {
        const _: () = ::core::assert!($($tt)*);
    }
}
pub(crate) use const_assert;

/// Asserts that every byte in `s` is an ASCII digit.
#[track_caller]
pub(crate) const fn debug_assert_all_digits(s: &[u8]) {
    if !cfg!(debug_assertions) {
        return;
    }
    let mut i = 0;
    while i < s.len() {
        debug_assert!(matches!(s[i], b'0'..=b'9'));
        i += 1;
    }
}

/// Reports whether `c` is whitespace the number grammar
/// accepts: space, `\t`, `\n`, `\v`, `\f`, or `\r`.
pub(crate) const fn is_white(c: char) -> bool {
    c == ' ' || matches!(c, '\t'..='\r')
}

/// Reports whether `s` starts with `prefix`, ignoring ASCII
/// case.
pub(crate) fn starts_with_fold(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()
            .iter()
            .zip(prefix.as_bytes())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

/// Reports whether `s == t`, ignoring ASCII case.
pub(crate) fn equal_fold(s: &str, t: &str) -> bool {
    s.len() == t.len() && starts_with_fold(s, t)
}

/// Trims leading and trailing whitespace and NULs.
pub(crate) fn trim_white(s: &str) -> &str {
    s.trim_matches(|c| is_white(c) || c == '\0')
}

/// Returns the number of decimal digits in `x`.
pub(crate) const fn digits_u128(mut x: u128) -> usize {
    let mut n = 1;
    while x >= 10 {
        x /= 10;
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold() {
        assert!(equal_fold("Infinity", "INFINITY"));
        assert!(equal_fold("nan", "NaN"));
        assert!(!equal_fold("nan", "nan "));
        assert!(starts_with_fold("-Infinity", "-"));
        assert!(starts_with_fold("InFiNiTy", "inf"));
        assert!(!starts_with_fold("in", "inf"));
        // Non-ASCII bytes only match exactly.
        assert!(equal_fold("∞", "∞"));
    }

    #[test]
    fn test_trim_white() {
        assert_eq!(trim_white(" \t12\r\n\0"), "12");
        assert_eq!(trim_white("\u{a0}1"), "\u{a0}1");
    }

    #[test]
    fn test_digits_u128() {
        assert_eq!(digits_u128(0), 1);
        assert_eq!(digits_u128(9), 1);
        assert_eq!(digits_u128(10), 2);
        assert_eq!(digits_u128(u64::MAX.into()), 20);
        assert_eq!(digits_u128(u128::MAX), 39);
    }
}
