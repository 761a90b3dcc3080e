use anyhow::{anyhow, bail, Context, Result};

use super::{Case, Locale, Op, Type};
use crate::ctx::NumberStyles;

/// Parses test cases.
pub fn parse(s: &str) -> Result<Vec<Case<'_>>> {
    let mut ty = Type::F64;
    let mut styles = NumberStyles::FLOAT;
    let mut locale = Locale::Invariant;
    let mut cases = Vec::new();
    for (i, line) in s.lines().enumerate() {
        let mut buf = Buf { s: line };
        let line = buf
            .parse_line()
            .with_context(|| format!("#{}: unable to parse `{line}`", i + 1))?;
        match line {
            None => {}
            Some(Line::Directive(Directive::Type(v))) => ty = v,
            Some(Line::Directive(Directive::Styles(v))) => styles = v,
            Some(Line::Directive(Directive::Locale(v))) => locale = v,
            Some(Line::Test { id, op }) => cases.push(Case {
                ty,
                styles,
                locale,
                id,
                op,
            }),
        }
    }
    if cases.is_empty() {
        bail!("no test cases");
    }
    Ok(cases)
}

struct Buf<'a> {
    s: &'a str,
}

impl<'a> Buf<'a> {
    fn consume(&mut self, s: &str) -> bool {
        if let Some(s) = self.s.strip_prefix(s) {
            self.s = s;
            true
        } else {
            false
        }
    }

    fn parse_line(&mut self) -> Result<Option<Line<'a>>> {
        let Some(token) = self.parse_token()? else {
            return Ok(None);
        };
        if let Some(kw) = token.strip_suffix(':') {
            let v = self.s.trim();
            let directive = match kw {
                "type" => Directive::Type(
                    Type::try_from_str(v).with_context(|| format!("unknown type: `{v}`"))?,
                ),
                "styles" => Directive::Styles(
                    bitflags::parser::from_str(v)
                        .map_err(|err| anyhow!("invalid styles `{v}`: {err}"))?,
                ),
                "locale" => Directive::Locale(
                    Locale::try_from_str(v).with_context(|| format!("unknown locale: `{v}`"))?,
                ),
                _ => bail!("unknown directive: `{kw}`"),
            };
            return Ok(Some(Line::Directive(directive)));
        }
        let id = token;
        let op = self.parse_op()?;
        if self.parse_token()?.is_some() {
            bail!("trailing tokens: `{}`", self.s);
        }
        Ok(Some(Line::Test { id, op }))
    }

    /// Returns the next token, or `None` at the end of the
    /// line or at a comment.
    fn parse_token(&mut self) -> Result<Option<&'a str>> {
        self.s = self.s.trim_start();
        if self.s.is_empty() || self.consume("--") {
            self.s = "";
            return Ok(None);
        }
        if self.consume("\"") {
            let (token, rest) = self
                .s
                .split_once('"')
                .with_context(|| format!("unterminated quote: `{}`", self.s))?;
            self.s = rest;
            return Ok(Some(token));
        }
        let (token, rest) = self
            .s
            .split_once(char::is_whitespace)
            .unwrap_or((self.s, ""));
        self.s = rest;
        Ok(Some(token))
    }

    fn require_token(&mut self, what: &str) -> Result<&'a str> {
        self.parse_token()?
            .with_context(|| format!("expected `{what}` token"))
    }

    fn parse_op(&mut self) -> Result<Op<'a>> {
        let name = self.require_token("operation")?;

        macro_rules! op {
            ($what:literal) => {
                self.require_token(concat!("`", $what, "` operand"))?
            };
        }
        macro_rules! arrow {
            () => {
                if self.require_token("->")? != "->" {
                    bail!("expected `->`");
                }
            };
        }

        let op = match name {
            "parse" => {
                let input = op!("input");
                arrow!();
                Op::Parse {
                    input,
                    output: op!("output"),
                }
            }
            "format" => {
                let input = op!("input");
                let format = op!("format");
                arrow!();
                Op::Format {
                    input,
                    format,
                    output: op!("output"),
                }
            }
            "roundtrip" => Op::RoundTrip {
                input: op!("input"),
            },
            _ => bail!("unknown op: `{name}`"),
        };
        Ok(op)
    }
}

enum Line<'a> {
    Test { id: &'a str, op: Op<'a> },
    Directive(Directive),
}

enum Directive {
    Type(Type),
    Styles(NumberStyles),
    Locale(Locale),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let cases = parse(
            r#"
-- comment
type: i32
styles: INTEGER | ALLOW_THOUSANDS
locale: de
a1 parse "1.234" -> 1234 -- trailing comment
a2 format 5 "" -> ""
a3 roundtrip -7
"#,
        )
        .unwrap();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].ty, Type::I32);
        assert_eq!(
            cases[0].styles,
            NumberStyles::INTEGER | NumberStyles::ALLOW_THOUSANDS
        );
        assert_eq!(cases[0].locale, Locale::German);
        assert_eq!(
            cases[0].op,
            Op::Parse {
                input: "1.234",
                output: "1234"
            }
        );
        assert_eq!(
            cases[1].op,
            Op::Format {
                input: "5",
                format: "",
                output: ""
            }
        );
        assert_eq!(cases[2].op, Op::RoundTrip { input: "-7" });
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("x1 parse 1 2").is_err());
        assert!(parse("x1 frobnicate 1 -> 2").is_err());
        assert!(parse("type: f128").is_err());
        assert!(parse("styles: FLOOT").is_err());
        assert!(parse("x1 parse \"1 -> 1").is_err());
        assert!(parse("x1 parse 1 -> 1 1").is_err());
    }
}
