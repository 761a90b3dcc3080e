//! A data-driven test harness.
//!
//! Case files are line oriented. Directives set the type,
//! styles, and locale for the cases that follow:
//!
//! ```text
//! -- a comment
//! type: f64
//! styles: FLOAT | ALLOW_THOUSANDS
//! locale: de
//! p001 parse "1.000,5" -> #408f440000000000
//! p002 parse x -> Invalid
//! f001 format 1234.5 N2 -> "1.234,50"
//! r001 roundtrip 0.1
//! ```
//!
//! Floats are written as decimal text or `#` and the hex of
//! their bits. Tokens with spaces are double quoted.

#![cfg(test)]

mod parse;

use std::{error, fmt};

use anyhow::{anyhow, bail, Context, Result};

pub use parse::parse;

use crate::{
    conv::{
        float_to_string,
        integer_to_string,
        parse_float,
        parse_integer,
        ErrorKind,
        ParseError,
        RenderError,
        RenderErrorKind,
    },
    ctx::{NumberFormatInfo, NumberStyles},
    float::{f16, RawFloat},
    integer::Integer,
};

/// The type a case converts to and from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Type {
    F16,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl Type {
    fn try_from_str(s: &str) -> Option<Self> {
        let ty = match s {
            "f16" => Self::F16,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            _ => return None,
        };
        Some(ty)
    }
}

/// A few real world locales.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Locale {
    Invariant,
    /// `de-DE`: `1.234,5`, trailing euro sign.
    German,
    /// `fr-FR`: narrow no-break space groups.
    French,
    /// `en-IN`: `12,34,567.8`.
    Indian,
    /// `sv-SE`: U+2212 minus sign.
    Swedish,
}

impl Locale {
    fn try_from_str(s: &str) -> Option<Self> {
        let locale = match s {
            "invariant" => Self::Invariant,
            "de" => Self::German,
            "fr" => Self::French,
            "in" => Self::Indian,
            "sv" => Self::Swedish,
            _ => return None,
        };
        Some(locale)
    }

    fn info(self) -> NumberFormatInfo<'static> {
        const INV: NumberFormatInfo<'static> = NumberFormatInfo::INVARIANT;
        match self {
            Self::Invariant => INV,
            Self::German => NumberFormatInfo {
                positive_infinity_symbol: "∞",
                negative_infinity_symbol: "-∞",
                number_decimal_separator: ",",
                number_group_separator: ".",
                currency_symbol: "€",
                currency_decimal_separator: ",",
                currency_group_separator: ".",
                currency_positive_pattern: 3,
                currency_negative_pattern: 8,
                percent_decimal_separator: ",",
                percent_group_separator: ".",
                ..INV
            },
            Self::French => NumberFormatInfo {
                positive_infinity_symbol: "∞",
                negative_infinity_symbol: "-∞",
                number_decimal_separator: ",",
                number_group_separator: "\u{202f}",
                currency_symbol: "€",
                currency_decimal_separator: ",",
                currency_group_separator: "\u{202f}",
                currency_positive_pattern: 3,
                currency_negative_pattern: 8,
                percent_decimal_separator: ",",
                percent_group_separator: "\u{202f}",
                ..INV
            },
            Self::Indian => NumberFormatInfo {
                number_group_sizes: &[3, 2],
                currency_symbol: "₹",
                currency_group_sizes: &[3, 2],
                currency_negative_pattern: 12,
                percent_group_sizes: &[3, 2],
                ..INV
            },
            Self::Swedish => NumberFormatInfo {
                negative_sign: "\u{2212}",
                positive_infinity_symbol: "∞",
                negative_infinity_symbol: "\u{2212}∞",
                number_decimal_separator: ",",
                number_group_separator: "\u{a0}",
                number_negative_pattern: 1,
                currency_symbol: "kr",
                currency_decimal_separator: ",",
                currency_group_separator: "\u{a0}",
                currency_positive_pattern: 3,
                currency_negative_pattern: 8,
                percent_decimal_separator: ",",
                percent_group_separator: "\u{a0}",
                ..INV
            },
        }
    }
}

/// A single test case.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Case<'a> {
    pub ty: Type,
    pub styles: NumberStyles,
    pub locale: Locale,
    pub id: &'a str,
    pub op: Op<'a>,
}

impl Case<'_> {
    pub fn run(&self) -> Result<(), Failure<'_>> {
        self.try_run().map_err(|err| Failure { case: self, err })
    }

    fn try_run(&self) -> Result<()> {
        match self.ty {
            Type::F16 => self.run_as::<f16>(),
            Type::F32 => self.run_as::<f32>(),
            Type::F64 => self.run_as::<f64>(),
            Type::I8 => self.run_as::<i8>(),
            Type::I16 => self.run_as::<i16>(),
            Type::I32 => self.run_as::<i32>(),
            Type::I64 => self.run_as::<i64>(),
            Type::I128 => self.run_as::<i128>(),
            Type::U8 => self.run_as::<u8>(),
            Type::U16 => self.run_as::<u16>(),
            Type::U32 => self.run_as::<u32>(),
            Type::U64 => self.run_as::<u64>(),
            Type::U128 => self.run_as::<u128>(),
        }
    }

    fn run_as<B: Backend>(&self) -> Result<()> {
        let info = self.locale.info();
        match self.op {
            Op::Parse { input, output } => {
                let got = B::parse(input, self.styles, &info);
                if let Some(kind) = parse_error_kind(output) {
                    return match got {
                        Err(err) if err.kind() == kind => Ok(()),
                        got => bail!("got {got:?}, expected {output}"),
                    };
                }
                let want = B::from_input(output)?;
                match got {
                    Ok(got) if got.same(want) => Ok(()),
                    got => bail!("got {got:?}, expected {output}"),
                }
            }
            Op::Format {
                input,
                format,
                output,
            } => {
                let v = B::from_input(input)?;
                match v.format(format, &info) {
                    Ok(got) if got == output => Ok(()),
                    Err(err) if err.kind() == RenderErrorKind::BadSpecifier => {
                        if output != "BadSpecifier" {
                            bail!("bad specifier `{format}`, expected {output:?}");
                        }
                        Ok(())
                    }
                    got => bail!("got {got:?}, expected {output:?}"),
                }
            }
            Op::RoundTrip { input } => {
                let v = B::from_input(input)?;
                let s = v
                    .format(B::ROUND_TRIP, &info)
                    .map_err(|err| anyhow!("unable to format {v:?}: {err}"))?;
                let got = B::parse(&s, B::STYLES, &info)
                    .map_err(|err| anyhow!("unable to parse `{s}`: {err}"))?;
                if !got.same(v) {
                    bail!("{v:?} formatted as `{s}` parsed as {got:?}");
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Case<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.op)
    }
}

fn parse_error_kind(s: &str) -> Option<ErrorKind> {
    let kind = match s {
        "Empty" => ErrorKind::Empty,
        "Invalid" => ErrorKind::Invalid,
        "Overflow" => ErrorKind::Overflow,
        "InvalidStyle" => ErrorKind::InvalidStyle,
        _ => return None,
    };
    Some(kind)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op<'a> {
    Parse {
        input: &'a str,
        output: &'a str,
    },
    Format {
        input: &'a str,
        format: &'a str,
        output: &'a str,
    },
    /// Formats the shortest text and parses it back.
    RoundTrip { input: &'a str },
}

impl fmt::Display for Op<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { input, output } => write!(f, "parse {input:?} -> {output}"),
            Self::Format {
                input,
                format,
                output,
            } => write!(f, "format {input} {format:?} -> {output:?}"),
            Self::RoundTrip { input } => write!(f, "roundtrip {input}"),
        }
    }
}

/// A test case failure.
pub struct Failure<'a> {
    case: &'a Case<'a>,
    err: anyhow::Error,
}

impl error::Error for Failure<'_> {}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test failure for `{}`: {:#}", self.case, self.err)
    }
}

impl fmt::Debug for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A type under test.
pub trait Backend: Copy + fmt::Debug {
    /// The format that produces text [`STYLES`][Self::STYLES]
    /// parses back to the same value.
    const ROUND_TRIP: &'static str;
    const STYLES: NumberStyles;

    fn parse(
        s: &str,
        styles: NumberStyles,
        info: &NumberFormatInfo<'_>,
    ) -> Result<Self, ParseError>;
    /// Parses an operand: decimal text or `#` and hex bits.
    fn from_input(s: &str) -> Result<Self>;
    fn format(self, format: &str, info: &NumberFormatInfo<'_>) -> Result<String, RenderError>;
    /// Reports whether the values are identical, bit for bit.
    fn same(self, other: Self) -> bool;
}

/// Decodes big endian hex into at most 128 bits.
fn bits_from_hex(s: &str, width: u32) -> Result<u128> {
    let bytes = hex::decode(s).with_context(|| format!("invalid hex: `{s}`"))?;
    if bytes.len() * 8 != width as usize {
        bail!("expected {width} bits, got {}", bytes.len() * 8);
    }
    Ok(bytes.iter().fold(0, |acc, &b| (acc << 8) | u128::from(b)))
}

macro_rules! impl_float_backend {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Backend for $ty {
                const ROUND_TRIP: &'static str = "R";
                const STYLES: NumberStyles = NumberStyles::FLOAT;

                fn parse(
                    s: &str,
                    styles: NumberStyles,
                    info: &NumberFormatInfo<'_>,
                ) -> Result<Self, ParseError> {
                    parse_float(s, styles, info)
                }

                fn from_input(s: &str) -> Result<Self> {
                    if let Some(hex) = s.strip_prefix('#') {
                        let width = <$ty as RawFloat>::SIGN_INDEX + 1;
                        let bits = bits_from_hex(hex, width)?;
                        return Ok(<$ty as RawFloat>::from_bits64(bits as u64));
                    }
                    parse_float(s, NumberStyles::FLOAT, &NumberFormatInfo::INVARIANT)
                        .map_err(|err| anyhow!("invalid operand `{s}`: {err}"))
                }

                fn format(
                    self,
                    format: &str,
                    info: &NumberFormatInfo<'_>,
                ) -> Result<String, RenderError> {
                    float_to_string(self, format, info)
                }

                fn same(self, other: Self) -> bool {
                    self.to_bits64() == other.to_bits64()
                }
            }
        )*
    };
}
impl_float_backend!(f16, f32, f64);

macro_rules! impl_integer_backend {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Backend for $ty {
                const ROUND_TRIP: &'static str = "D";
                const STYLES: NumberStyles = NumberStyles::INTEGER;

                fn parse(
                    s: &str,
                    styles: NumberStyles,
                    info: &NumberFormatInfo<'_>,
                ) -> Result<Self, ParseError> {
                    parse_integer(s, styles, info)
                }

                fn from_input(s: &str) -> Result<Self> {
                    if let Some(hex) = s.strip_prefix('#') {
                        let bits = bits_from_hex(hex, <$ty as Integer>::BITS)?;
                        return Ok(<$ty as Integer>::from_bits128(bits));
                    }
                    s.parse().with_context(|| format!("invalid operand `{s}`"))
                }

                fn format(
                    self,
                    format: &str,
                    info: &NumberFormatInfo<'_>,
                ) -> Result<String, RenderError> {
                    integer_to_string(self, format, info)
                }

                fn same(self, other: Self) -> bool {
                    self == other
                }
            }
        )*
    };
}
impl_integer_backend!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

#[test]
fn test_cases() {
    let cases = parse(include_str!("../../testdata/cases.numtest")).unwrap();
    let failures: Vec<_> = cases.iter().filter_map(|case| case.run().err()).collect();
    for failure in &failures {
        println!("{failure}");
    }
    assert!(failures.is_empty(), "{} of {} cases failed", failures.len(), cases.len());
}

#[test]
fn test_locale_sanity() {
    for locale in [
        Locale::Invariant,
        Locale::German,
        Locale::French,
        Locale::Indian,
        Locale::Swedish,
    ] {
        let info = locale.info();
        assert_ne!(info.number_decimal_separator, info.number_group_separator);
    }
}
