//! Parse styles and locale data.

use bitflags::bitflags;

use super::conv::ParseError;

/// Which elements a numeric string may contain.
///
/// The composite styles match the common cases:
///
/// | style | accepts |
/// |-------|---------|
/// | [`INTEGER`][Self::INTEGER] | `" -123 "` |
/// | [`NUMBER`][Self::NUMBER] | `"1,234.5-"` |
/// | [`FLOAT`][Self::FLOAT] | `"-1.5e10"` |
/// | [`CURRENCY`][Self::CURRENCY] | `"($1,234.50)"` |
/// | [`HEX_NUMBER`][Self::HEX_NUMBER] | `" ff "` |
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NumberStyles(u32);

bitflags! {
    impl NumberStyles: u32 {
        /// Leading whitespace is skipped.
        ///
        /// Whitespace is space and `\t` through `\r`.
        const ALLOW_LEADING_WHITE = 0x1;
        /// Trailing whitespace is skipped.
        const ALLOW_TRAILING_WHITE = 0x2;
        /// A positive or negative sign may precede the digits.
        const ALLOW_LEADING_SIGN = 0x4;
        /// A positive or negative sign may follow the digits.
        const ALLOW_TRAILING_SIGN = 0x8;
        /// Parentheses around the number make it negative.
        const ALLOW_PARENTHESES = 0x10;
        /// The number may have a fractional part.
        const ALLOW_DECIMAL_POINT = 0x20;
        /// Group separators may appear in the integer part.
        const ALLOW_THOUSANDS = 0x40;
        /// An `e` or `E` exponent may follow the digits.
        const ALLOW_EXPONENT = 0x80;
        /// The currency symbol may appear before or after the
        /// number. The currency separators are also accepted.
        const ALLOW_CURRENCY_SYMBOL = 0x100;
        /// The digits are hexadecimal, without a prefix.
        const ALLOW_HEX_SPECIFIER = 0x200;
        /// The digits are binary, without a prefix.
        const ALLOW_BINARY_SPECIFIER = 0x400;

        /// Whitespace and a leading sign.
        const INTEGER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_LEADING_SIGN.bits();
        /// Whitespace and hexadecimal digits.
        const HEX_NUMBER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_HEX_SPECIFIER.bits();
        /// Whitespace and binary digits.
        const BINARY_NUMBER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_BINARY_SPECIFIER.bits();
        /// [`INTEGER`][Self::INTEGER] plus a trailing sign, a
        /// decimal point, and group separators.
        const NUMBER = Self::INTEGER.bits()
            | Self::ALLOW_TRAILING_SIGN.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_THOUSANDS.bits();
        /// [`INTEGER`][Self::INTEGER] plus a decimal point and an
        /// exponent.
        const FLOAT = Self::INTEGER.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_EXPONENT.bits();
        /// [`NUMBER`][Self::NUMBER] plus parentheses and the
        /// currency symbol.
        const CURRENCY = Self::NUMBER.bits()
            | Self::ALLOW_PARENTHESES.bits()
            | Self::ALLOW_CURRENCY_SYMBOL.bits();
        /// Every style except the hexadecimal and binary ones.
        const ANY = Self::CURRENCY.bits() | Self::ALLOW_EXPONENT.bits();
    }
}

impl NumberStyles {
    const RADIX_DIGITS: Self =
        Self::ALLOW_HEX_SPECIFIER.union(Self::ALLOW_BINARY_SPECIFIER);

    /// Reports whether the styles request hexadecimal or
    /// binary digits.
    pub(crate) fn is_radix(self) -> bool {
        self.intersects(Self::RADIX_DIGITS)
    }

    /// Checks that the styles are usable for integers.
    ///
    /// Hexadecimal and binary digits are exclusive and may only
    /// be combined with whitespace.
    pub(crate) fn validate_integer(self) -> Result<(), ParseError> {
        if !Self::all().contains(self) {
            return Err(ParseError::invalid_style());
        }
        if self.is_radix() {
            let ws = Self::ALLOW_LEADING_WHITE | Self::ALLOW_TRAILING_WHITE;
            if self.contains(Self::RADIX_DIGITS) || !(ws | Self::RADIX_DIGITS).contains(self) {
                return Err(ParseError::invalid_style());
            }
        }
        Ok(())
    }

    /// Checks that the styles are usable for floats.
    pub(crate) fn validate_float(self) -> Result<(), ParseError> {
        if !Self::all().contains(self) || self.is_radix() {
            return Err(ParseError::invalid_style());
        }
        Ok(())
    }
}

impl Default for NumberStyles {
    fn default() -> Self {
        Self::INTEGER
    }
}

/// Locale data consumed by parsing and formatting.
///
/// Every field is plain data; nothing here looks up a locale.
/// Pattern indices select from the fixed pattern tables of the
/// `C`, `N`, and `P` formats, and an index that is out of range
/// behaves like `0`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NumberFormatInfo<'a> {
    /// The positive sign, usually `+`.
    pub positive_sign: &'a str,
    /// The negative sign, usually `-`.
    pub negative_sign: &'a str,
    /// The symbol for NaN.
    pub nan_symbol: &'a str,
    /// The symbol for positive infinity.
    pub positive_infinity_symbol: &'a str,
    /// The symbol for negative infinity.
    pub negative_infinity_symbol: &'a str,

    /// The decimal separator of plain numbers.
    pub number_decimal_separator: &'a str,
    /// The group separator of plain numbers.
    pub number_group_separator: &'a str,
    /// Digits per group, least significant group first. The
    /// last size repeats; a last size of zero stops grouping.
    pub number_group_sizes: &'a [u8],
    /// Default fractional digits of the `F` and `N` formats.
    pub number_decimal_digits: u32,
    /// Negative pattern of the `N` format, `0..=4`.
    pub number_negative_pattern: usize,

    /// The currency symbol.
    pub currency_symbol: &'a str,
    /// The decimal separator of currency values.
    pub currency_decimal_separator: &'a str,
    /// The group separator of currency values.
    pub currency_group_separator: &'a str,
    /// Digits per group of currency values.
    pub currency_group_sizes: &'a [u8],
    /// Default fractional digits of the `C` format.
    pub currency_decimal_digits: u32,
    /// Positive pattern of the `C` format, `0..=3`.
    pub currency_positive_pattern: usize,
    /// Negative pattern of the `C` format, `0..=16`.
    pub currency_negative_pattern: usize,

    /// The percent symbol.
    pub percent_symbol: &'a str,
    /// The per mille symbol.
    pub per_mille_symbol: &'a str,
    /// The decimal separator of percentages.
    pub percent_decimal_separator: &'a str,
    /// The group separator of percentages.
    pub percent_group_separator: &'a str,
    /// Digits per group of percentages.
    pub percent_group_sizes: &'a [u8],
    /// Default fractional digits of the `P` format.
    pub percent_decimal_digits: u32,
    /// Positive pattern of the `P` format, `0..=3`.
    pub percent_positive_pattern: usize,
    /// Negative pattern of the `P` format, `0..=11`.
    pub percent_negative_pattern: usize,
}

impl NumberFormatInfo<'static> {
    /// Culture-independent data.
    pub const INVARIANT: Self = Self {
        positive_sign: "+",
        negative_sign: "-",
        nan_symbol: "NaN",
        positive_infinity_symbol: "Infinity",
        negative_infinity_symbol: "-Infinity",
        number_decimal_separator: ".",
        number_group_separator: ",",
        number_group_sizes: &[3],
        number_decimal_digits: 2,
        number_negative_pattern: 1,
        currency_symbol: "\u{a4}",
        currency_decimal_separator: ".",
        currency_group_separator: ",",
        currency_group_sizes: &[3],
        currency_decimal_digits: 2,
        currency_positive_pattern: 0,
        currency_negative_pattern: 0,
        percent_symbol: "%",
        per_mille_symbol: "\u{2030}",
        percent_decimal_separator: ".",
        percent_group_separator: ",",
        percent_group_sizes: &[3],
        percent_decimal_digits: 2,
        percent_positive_pattern: 0,
        percent_negative_pattern: 0,
    };
}

impl Default for NumberFormatInfo<'static> {
    fn default() -> Self {
        Self::INVARIANT
    }
}

impl NumberFormatInfo<'_> {
    /// Reports whether an ASCII hyphen is accepted in place of
    /// the negative sign.
    ///
    /// This is the case when the negative sign is one of the
    /// Unicode dashes or minus signs people type as `-`.
    pub fn allow_hyphen_during_parsing(&self) -> bool {
        matches!(
            self.negative_sign,
            "\u{2012}" | "\u{207b}" | "\u{208b}" | "\u{2212}" | "\u{2796}" | "\u{fe63}" | "\u{ff0d}"
        )
    }
}
