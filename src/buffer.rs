//! The digit buffer: the decimal form every formatter produces
//! and every parser and renderer consumes.

#![allow(clippy::indexing_slicing)]

use core::{fmt, str};

use super::{float::RawFloat, integer::Integer, util::const_assert};

/// What kind of number a [`DigitBuffer`] holds.
///
/// The kind changes how the buffer is rounded and rendered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    /// A binary integer. Zero is never negative.
    Integer,
    /// An exact decimal. Zero is never negative and trailing
    /// zeros are significant.
    Decimal,
    /// A binary float. Negative zero keeps its sign.
    FloatingPoint,
}

// Every integer fits in a float sized buffer.
const_assert!(<u128 as Integer>::MAX_DIGITS < f64::MAX_EXACT_DIGITS);

/// A decimal number `0.d1d2...dn * 10^scale` with a sign.
///
/// Digits are ASCII and never include leading zeros. The byte
/// after the last digit is always NUL.
#[derive(Clone)]
pub struct DigitBuffer {
    digits: [u8; DigitBuffer::MAX_CAPACITY],
    capacity: usize,
    len: usize,
    scale: i32,
    negative: bool,
    has_nonzero_tail: bool,
    kind: Kind,
}

impl DigitBuffer {
    /// The largest capacity of any buffer, including the NUL.
    ///
    /// This fits the exact expansion of any `f64` plus one
    /// digit for rounding.
    pub const MAX_CAPACITY: usize = f64::MAX_EXACT_DIGITS + 2;

    /// Creates an empty buffer that holds `capacity - 1`
    /// digits.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is less than 2 or greater than
    /// [`MAX_CAPACITY`][Self::MAX_CAPACITY].
    pub fn new(kind: Kind, capacity: usize) -> Self {
        assert!(
            (2..=Self::MAX_CAPACITY).contains(&capacity),
            "invalid digit buffer capacity: {capacity}"
        );
        Self {
            digits: [0; Self::MAX_CAPACITY],
            capacity,
            len: 0,
            scale: 0,
            negative: false,
            has_nonzero_tail: false,
            kind,
        }
    }

    /// Creates a buffer sized for the exact expansion of `F`.
    pub fn for_float<F: RawFloat>() -> Self {
        Self::new(Kind::FloatingPoint, F::MAX_EXACT_DIGITS + 2)
    }

    /// Creates a buffer sized for any value of `I`.
    pub fn for_integer<I: Integer>() -> Self {
        Self::new(Kind::Integer, I::MAX_DIGITS + 1)
    }

    /// Returns the kind of number.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the valid digits.
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    /// Returns the number of valid digits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the buffer has no digits, which means
    /// the value is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the maximum number of digits.
    pub fn max_digits(&self) -> usize {
        self.capacity - 1
    }

    /// Returns the `i`th digit or NUL past the end.
    pub fn digit(&self, i: usize) -> u8 {
        if i < self.len {
            self.digits[i]
        } else {
            0
        }
    }

    /// Returns the decimal exponent.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Sets the decimal exponent.
    pub fn set_scale(&mut self, scale: i32) {
        self.scale = scale;
    }

    /// Reports whether the sign is negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Sets the sign.
    pub fn set_negative(&mut self, negative: bool) {
        self.negative = negative;
    }

    /// Reports whether digits that did not fit were dropped and
    /// at least one of them was non-zero.
    pub fn has_nonzero_tail(&self) -> bool {
        self.has_nonzero_tail
    }

    /// See [`has_nonzero_tail`][Self::has_nonzero_tail].
    pub fn set_nonzero_tail(&mut self, tail: bool) {
        self.has_nonzero_tail = tail;
    }

    /// Appends an ASCII digit.
    ///
    /// Returns false without storing the digit if the buffer
    /// is full.
    pub fn push(&mut self, digit: u8) -> bool {
        debug_assert!(digit.is_ascii_digit());
        if self.len >= self.max_digits() {
            return false;
        }
        self.digits[self.len] = digit;
        self.len += 1;
        self.digits[self.len] = 0;
        true
    }

    /// Shortens the buffer to `len` digits without rounding.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
            self.digits[len] = 0;
        }
    }

    /// Removes every digit and resets the scale.
    pub fn clear(&mut self) {
        self.truncate(0);
        self.scale = 0;
        self.has_nonzero_tail = false;
    }

    /// Returns the writable digit area.
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        let n = self.max_digits();
        &mut self.digits[..n]
    }

    /// Marks the first `len` bytes of the digit area as valid.
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.max_digits());
        crate::util::debug_assert_all_digits(&self.digits[..len]);
        self.len = len;
        self.digits[len] = 0;
    }

    /// Drops trailing zero digits.
    pub(crate) fn trim_trailing_zeros(&mut self) {
        while self.len > 0 && self.digits[self.len - 1] == b'0' {
            self.len -= 1;
        }
        self.digits[self.len] = 0;
    }

    /// Rounds the buffer to `pos` digits, half to even.
    ///
    /// If `exact` is set the digits are already correctly
    /// rounded for `pos` and are only trimmed. Trailing zeros
    /// are dropped. If nothing remains the value becomes zero,
    /// which keeps its sign only for floats.
    pub fn round(&mut self, pos: i32, exact: bool) {
        let mut i = 0;
        while (i as i32) < pos && i < self.len {
            i += 1;
        }
        if i as i32 == pos && !exact && self.should_round_up(i) {
            while i > 0 && self.digits[i - 1] == b'9' {
                i -= 1;
            }
            if i > 0 {
                self.digits[i - 1] += 1;
            } else {
                self.scale += 1;
                self.digits[0] = b'1';
                i = 1;
            }
        } else {
            while i > 0 && self.digits[i - 1] == b'0' {
                i -= 1;
            }
        }
        if i == 0 {
            if self.kind != Kind::FloatingPoint {
                self.negative = false;
            }
            self.scale = 0;
        }
        self.len = i;
        self.digits[i] = 0;
        self.has_nonzero_tail = false;
        self.check_consistency();
    }

    fn should_round_up(&self, i: usize) -> bool {
        match self.digit(i) {
            0 => false,
            b'0'..=b'4' => false,
            b'6'..=b'9' => true,
            _ => {
                // Exactly half only if nothing non-zero follows.
                let above_half = self.has_nonzero_tail
                    || self.digits[i + 1..self.len].iter().any(|&d| d != b'0');
                above_half || (i > 0 && self.digits[i - 1] & 1 == 1)
            }
        }
    }

    #[track_caller]
    pub(crate) fn check_consistency(&self) {
        debug_assert!(self.len < self.capacity);
        debug_assert_eq!(self.digits[self.len], 0);
        crate::util::debug_assert_all_digits(self.digits());
        debug_assert!(
            self.kind != Kind::FloatingPoint || self.len == 0 || self.digits[0] != b'0',
            "leading zero: {self:?}"
        );
    }
}

impl fmt::Debug for DigitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = str::from_utf8(self.digits()).map_err(|_| fmt::Error)?;
        write!(
            f,
            "{}0.{digits}e{}{} ({:?})",
            if self.negative { "-" } else { "" },
            self.scale,
            if self.has_nonzero_tail { "+" } else { "" },
            self.kind,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(kind: Kind, digits: &str, scale: i32) -> DigitBuffer {
        let mut b = DigitBuffer::new(kind, 32);
        for d in digits.bytes() {
            assert!(b.push(d));
        }
        b.set_scale(scale);
        b
    }

    #[test]
    fn test_push_and_sentinel() {
        let mut b = DigitBuffer::new(Kind::Integer, 4);
        assert!(b.is_empty());
        assert!(b.push(b'1'));
        assert!(b.push(b'2'));
        assert!(b.push(b'3'));
        assert!(!b.push(b'4'));
        assert_eq!(b.digits(), b"123");
        assert_eq!(b.digit(3), 0);
        assert_eq!(b.digit(100), 0);
        b.truncate(1);
        assert_eq!(b.digits(), b"1");
        assert_eq!(b.digit(1), 0);
    }

    #[test]
    fn test_round_half_even() {
        let tests: &[(&str, i32, &str, i32)] = &[
            ("125", 2, "12", 1),
            ("135", 2, "14", 1),
            ("1251", 2, "13", 1),
            ("124", 2, "12", 1),
            ("126", 2, "13", 1),
            ("999", 2, "1", 2),
            ("5", 0, "", 0),
            ("6", 0, "1", 2),
            ("15", 1, "2", 1),
            ("25", 1, "2", 1),
            ("1200", 4, "12", 1),
            ("123", -1, "", 0),
        ];
        for &(digits, pos, want, scale) in tests {
            let mut b = buffer(Kind::Integer, digits, 1);
            b.round(pos, false);
            assert_eq!(
                str::from_utf8(b.digits()).unwrap(),
                want,
                "round({digits}, {pos})"
            );
            assert_eq!(b.scale(), scale, "round({digits}, {pos})");
        }
    }

    #[test]
    fn test_round_tail_breaks_tie() {
        let mut b = buffer(Kind::FloatingPoint, "25", 1);
        b.set_nonzero_tail(true);
        b.round(1, false);
        assert_eq!(b.digits(), b"3");
    }

    #[test]
    fn test_round_exact_only_trims() {
        let mut b = buffer(Kind::FloatingPoint, "1990", 1);
        b.round(3, true);
        assert_eq!(b.digits(), b"199");
    }

    #[test]
    fn test_round_zero_sign() {
        let mut b = buffer(Kind::FloatingPoint, "4", 0);
        b.set_negative(true);
        b.round(0, false);
        assert!(b.is_empty());
        assert!(b.is_negative());

        let mut b = buffer(Kind::Integer, "4", 0);
        b.set_negative(true);
        b.round(0, false);
        assert!(!b.is_negative());
    }
}
