// Input classification - splits a line into command and parameter, and recognizes the
// literal forms a line can take (numbers, fractions, percentages, NumOps)

use crate::math;
use crate::value::{CalcError, Decimal, Result, is_plain_number, parse_plain, parse_scientific};
use std::fmt;

/// One line of user input, commas stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    /// Trimmed input with commas removed, original case
    pub raw: String,
    /// First whitespace-delimited token, lower-cased
    pub head: String,
    /// Everything after the first run of whitespace, trimmed
    pub param: String,
}

/// Split a line into head and parameter. Blank input yields `None`.
pub fn parse(line: &str) -> Option<ParsedInput> {
    let raw = line.replace(',', "").trim().to_string();
    if raw.is_empty() {
        return None;
    }
    let (head, param) = match raw.split_once(char::is_whitespace) {
        Some((head, rest)) => (head.to_lowercase(), rest.trim().to_string()),
        None => (raw.to_lowercase(), String::new()),
    };
    Some(ParsedInput { raw, head, param })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            '^' => Some(Operator::Power),
            _ => None,
        }
    }

    /// A bare operator token such as `+`.
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_char(ch),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Power => '^',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Literal forms, in the order they are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Fraction(Decimal),
    Number(Decimal),
    Percent(Decimal),
    NumOp(Decimal, Operator),
    Scientific(Decimal),
}

/// Classify the input as a literal. `Ok(None)` means it is not one of the literal forms;
/// a malformed fraction is an error.
pub fn classify_literal(input: &ParsedInput) -> Result<Option<Literal>> {
    if is_fraction(&input.raw) {
        return parse_fraction(input).map(|value| Some(Literal::Fraction(value)));
    }
    // The other literal forms are a single token
    if !input.param.is_empty() {
        return Ok(None);
    }

    let head = input.head.as_str();
    if let Some(value) = parse_plain(head) {
        return Ok(Some(Literal::Number(value)));
    }
    if let Some(number) = head.strip_suffix('%') {
        if let Some(value) = parse_plain(number) {
            return Ok(Some(Literal::Percent(value * Decimal::new(1.into(), 2))));
        }
    }
    if let Some((value, op)) = parse_numop(head) {
        return Ok(Some(Literal::NumOp(value, op)));
    }
    if let Some(value) = parse_scientific(head) {
        return Ok(Some(Literal::Scientific(value)));
    }
    Ok(None)
}

fn is_fraction(raw: &str) -> bool {
    match raw.find('/') {
        Some(_) => !raw.ends_with('/'),
        None => false,
    }
}

// "3/16" or "1 3/16" or "-1 3/16"; the integer part carries the sign of the whole value
fn parse_fraction(input: &ParsedInput) -> Result<Decimal> {
    let malformed = || CalcError::InvalidFraction(input.raw.clone());

    // A mixed number takes its sign from the written whole part, so "-0 1/2" is negative
    let (integer, fraction, negative) = if input.head.contains('/') {
        if !input.param.is_empty() {
            return Err(malformed());
        }
        (Decimal::from(0), input.head.as_str(), false)
    } else {
        if input.param.split_whitespace().count() != 1 {
            return Err(malformed());
        }
        let integer = parse_plain(&input.head).ok_or_else(malformed)?;
        (integer, input.param.as_str(), input.head.starts_with('-'))
    };

    let (numerator, denominator) = fraction.split_once('/').ok_or_else(malformed)?;
    let numerator = parse_plain(numerator).ok_or_else(malformed)?;
    let denominator = parse_plain(denominator).ok_or_else(malformed)?;
    let part = math::divide(&numerator, &denominator).map_err(|_| malformed())?;

    if negative {
        Ok(integer - part)
    } else {
        Ok(integer + part)
    }
}

// A number immediately followed by an operator: "2+", "-1.5*", "10^"
fn parse_numop(head: &str) -> Option<(Decimal, Operator)> {
    let last = head.chars().last()?;
    let op = Operator::from_char(last)?;
    let number = &head[..head.len() - last.len_utf8()];
    if number.is_empty() {
        return None;
    }
    let value = if is_plain_number(number) {
        parse_plain(number)
    } else {
        parse_scientific(number)
    }?;
    Some((value, op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn literal(line: &str) -> Result<Option<Literal>> {
        classify_literal(&parse(line).unwrap())
    }

    #[test]
    fn test_parse_splits_head_and_param() {
        let input = parse("  SWAP  2   3 ").unwrap();
        assert_eq!(input.raw, "SWAP  2   3");
        assert_eq!(input.head, "swap");
        assert_eq!(input.param, "2   3");

        let input = parse("1,234.5").unwrap();
        assert_eq!(input.head, "1234.5");
        assert_eq!(input.param, "");

        assert!(parse("   ").is_none());
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(Operator::from_token("+"), Some(Operator::Add));
        assert_eq!(Operator::from_token("^"), Some(Operator::Power));
        assert_eq!(Operator::from_token("++"), None);
        assert_eq!(Operator::from_token("x"), None);
        assert_eq!(Operator::Divide.to_string(), "/");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(literal("123").unwrap(), Some(Literal::Number(dec("123"))));
        assert_eq!(literal("-0.5").unwrap(), Some(Literal::Number(dec("-0.5"))));
        assert_eq!(
            literal("1.5e3").unwrap(),
            Some(Literal::Scientific(dec("1500")))
        );
    }

    #[test]
    fn test_percent() {
        assert_eq!(literal("12.5%").unwrap(), Some(Literal::Percent(dec("0.125"))));
        assert_eq!(literal("abc%").unwrap(), None);
    }

    #[test]
    fn test_numop() {
        assert_eq!(
            literal("2+").unwrap(),
            Some(Literal::NumOp(dec("2"), Operator::Add))
        );
        assert_eq!(
            literal("-1.5*").unwrap(),
            Some(Literal::NumOp(dec("-1.5"), Operator::Multiply))
        );
        assert_eq!(
            literal("4/").unwrap(),
            Some(Literal::NumOp(dec("4"), Operator::Divide))
        );
        assert_eq!(literal("x+").unwrap(), None);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(
            literal("1 3/16").unwrap(),
            Some(Literal::Fraction(dec("1.1875")))
        );
        assert_eq!(
            literal("3/4").unwrap(),
            Some(Literal::Fraction(dec("0.75")))
        );
        assert_eq!(
            literal("-2 1/2").unwrap(),
            Some(Literal::Fraction(dec("-2.5")))
        );
        assert_eq!(
            literal("-1/8").unwrap(),
            Some(Literal::Fraction(dec("-0.125")))
        );
        assert_eq!(
            literal("-0 1/2").unwrap(),
            Some(Literal::Fraction(dec("-0.5")))
        );
    }

    #[test]
    fn test_malformed_fractions() {
        assert!(matches!(literal("1 3/0"), Err(CalcError::InvalidFraction(_))));
        assert!(matches!(literal("a 3/16"), Err(CalcError::InvalidFraction(_))));
        assert!(matches!(literal("1 3/16 9"), Err(CalcError::InvalidFraction(_))));
        assert!(matches!(literal("3/x"), Err(CalcError::InvalidFraction(_))));
    }

    #[test]
    fn test_unknown_words() {
        assert_eq!(literal("hello").unwrap(), None);
        assert_eq!(literal("-").unwrap(), None);
        assert_eq!(literal("1 2").unwrap(), None);
    }
}
