// Decimal values and calculator errors
//
// Every number on a stack is a `BigDecimal`: an arbitrary-size `BigInt` of digits plus a
// base-10 scale. Add, subtract and multiply are exact; anything that can produce an
// infinite expansion goes through the bounded helpers in `math`.

use bigdecimal::BigDecimal;
use std::str::FromStr;
use thiserror::Error;

pub type Decimal = BigDecimal;

/// Significant digits kept by division, square root and unit conversion.
pub const DIVISION_PRECISION: u64 = 34;

pub type Result<T> = std::result::Result<T, CalcError>;

// RUST CONCEPT: One error enum for the whole engine
// Every command returns Result<_, CalcError>; the session reports the error and carries on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Stack underflow")]
    Underflow,

    #[error("This operation requires at least {needed} value(s) on the stack, found {found}")]
    InsufficientOperands { needed: usize, found: usize },

    #[error("Cannot divide by zero")]
    DivideByZero,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid fraction: '{0}'")]
    InvalidFraction(String),

    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),

    #[error("Cannot convert between '{from}' and '{to}': different unit categories")]
    IncompatibleUnits { from: String, to: String },

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("Already at oldest change")]
    NoHistory,

    #[error("Storage failure: {0}")]
    BackingStoreFailure(String),
}

impl CalcError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::BackingStoreFailure(msg.into())
    }
}

/// Parse a plain signed decimal: optional `-`, digits, at most one `.`, at least one digit.
///
/// Scientific notation is not accepted here; see [`parse_scientific`].
pub fn parse_plain(text: &str) -> Option<Decimal> {
    if !is_plain_number(text) {
        return None;
    }
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let lead = if body.starts_with('.') { "0" } else { "" };
    let tail = if body.ends_with('.') { "0" } else { "" };
    Decimal::from_str(&format!("{}{}{}{}", sign, lead, body, tail)).ok()
}

pub fn is_plain_number(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    let mut digits = 0;
    let mut dots = 0;
    for ch in body.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Parse scientific notation such as `1.5e10` or `-2E-3`.
pub fn parse_scientific(text: &str) -> Option<Decimal> {
    let split = text.find(['e', 'E'])?;
    let (mantissa, exponent) = (&text[..split], &text[split + 1..]);
    if !is_plain_number(mantissa) {
        return None;
    }
    let exp_digits = exponent
        .strip_prefix('-')
        .or_else(|| exponent.strip_prefix('+'))
        .unwrap_or(exponent);
    if exp_digits.is_empty() || !exp_digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(text).ok()
}

/// Convert an `f64` result back into a decimal, rejecting NaN and infinities.
pub fn from_f64(value: f64, context: &str) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(CalcError::invalid_argument(format!(
            "{} is undefined for this input",
            context
        )));
    }
    // f64's Display never uses exponent notation, so the text is always a plain decimal
    Decimal::from_str(&format!("{}", value))
        .map_err(|e| CalcError::invalid_argument(format!("{}: {}", context, e)))
}

pub fn to_f64(value: &Decimal) -> f64 {
    num_traits::ToPrimitive::to_f64(value).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_plain_number_detection() {
        assert!(is_plain_number("123"));
        assert!(is_plain_number("-0.5"));
        assert!(is_plain_number(".5"));
        assert!(is_plain_number("5."));
        assert!(!is_plain_number("-"));
        assert!(!is_plain_number("."));
        assert!(!is_plain_number("1.2.3"));
        assert!(!is_plain_number("1e5"));
        assert!(!is_plain_number("2+"));
    }

    #[test]
    fn test_parse_plain_accepts_bare_points() {
        assert_eq!(parse_plain(".5"), Some(dec("0.5")));
        assert_eq!(parse_plain("-.5"), Some(dec("-0.5")));
        assert_eq!(parse_plain("5."), Some(dec("5")));
        assert_eq!(parse_plain("abc"), None);
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(parse_scientific("1.5e10"), Some(dec("15000000000")));
        assert_eq!(parse_scientific("-2E-3"), Some(dec("-0.002")));
        assert_eq!(parse_scientific("1e"), None);
        assert_eq!(parse_scientific("e5"), None);
        assert_eq!(parse_scientific("1.5"), None);
    }

    #[test]
    fn test_plain_strings_never_use_exponents() {
        assert_eq!(dec("1.50").to_plain_string(), "1.50");
        assert_eq!(dec("-2E-3").to_plain_string(), "-0.002");
        assert_eq!(parse_scientific("1.5e4").unwrap().to_plain_string(), "15000");
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(from_f64(f64::NAN, "asin").is_err());
        assert!(from_f64(f64::INFINITY, "log").is_err());
        assert_eq!(from_f64(0.5, "sin").unwrap(), dec("0.5"));
    }
}
