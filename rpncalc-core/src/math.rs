// Arithmetic engine - pure functions over decimals
//
// Add, subtract and multiply are left to BigDecimal's exact operators. Division and
// square root are bounded to DIVISION_PRECISION significant digits, rounded half-up.

use crate::value::{CalcError, DIVISION_PRECISION, Decimal, Result};
use bigdecimal::{Context, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::num::NonZeroU64;

/// Largest exponent magnitude accepted by [`power`].
pub const MAX_EXPONENT: u64 = 999_999_999;

/// Most fractional digits `round` will produce.
pub const MAX_ROUND_PLACES: i64 = 1_000;

/// Largest argument accepted by [`factorial`].
pub const MAX_FACTORIAL: u64 = 10_000;

fn bounded_precision() -> NonZeroU64 {
    NonZeroU64::new(DIVISION_PRECISION).unwrap_or(NonZeroU64::MIN)
}

fn bounded_context() -> Context {
    Context::new(bounded_precision(), RoundingMode::HalfUp)
}

/// Integer part of `value`, truncated toward zero.
pub fn truncate(value: &Decimal) -> BigInt {
    value.with_scale(0).into_bigint_and_exponent().0
}

pub fn integer_part(value: &Decimal) -> Decimal {
    Decimal::new(truncate(value), 0)
}

pub fn has_fraction(value: &Decimal) -> bool {
    !value.is_integer()
}

/// Divide at [`DIVISION_PRECISION`] significant digits, half-up, without trailing zeros.
pub fn divide(a: &Decimal, b: &Decimal) -> Result<Decimal> {
    if b.is_zero() {
        return Err(CalcError::DivideByZero);
    }
    let quotient = (a / b).with_precision_round(bounded_precision(), RoundingMode::HalfUp);
    Ok(quotient.normalized())
}

/// Square root at [`DIVISION_PRECISION`] significant digits.
pub fn square_root(value: &Decimal) -> Result<Decimal> {
    value
        .sqrt_with_context(&bounded_context())
        .map(|root| root.normalized())
        .ok_or_else(|| {
            CalcError::invalid_argument("cannot take the square root of a negative number")
        })
}

/// Round half-up to `places` fractional digits, padding with zeros when needed.
pub fn round_half_up(value: &Decimal, places: i64) -> Decimal {
    value.with_scale_round(places, RoundingMode::HalfUp)
}

/// Raise `base` to an integer power. Negative exponents divide with bounded precision.
pub fn power(base: &Decimal, exponent: i64) -> Result<Decimal> {
    let magnitude = exponent.unsigned_abs();
    if magnitude > MAX_EXPONENT {
        return Err(CalcError::invalid_argument(format!(
            "exponent must be between -{} and {}",
            MAX_EXPONENT, MAX_EXPONENT
        )));
    }
    let (digits, scale) = base.as_bigint_and_exponent();
    let raised = Decimal::new(
        num_traits::pow(digits, magnitude as usize),
        scale * magnitude as i64,
    );
    if exponent >= 0 {
        Ok(raised)
    } else {
        divide(&Decimal::one(), &raised)
    }
}

/// Truncated remainder; the sign follows the dividend.
pub fn modulus(a: &Decimal, b: &Decimal) -> Result<Decimal> {
    if b.is_zero() {
        return Err(CalcError::DivideByZero);
    }
    Ok(a % b)
}

pub fn factorial(n: &BigInt) -> Result<Decimal> {
    if n.sign() != Sign::Plus {
        return Err(CalcError::invalid_argument(
            "factorial requires a positive integer",
        ));
    }
    let limit = n
        .to_u64()
        .filter(|&limit| limit <= MAX_FACTORIAL)
        .ok_or_else(|| {
            CalcError::out_of_range(format!("factorial argument must be at most {}", MAX_FACTORIAL))
        })?;
    let mut product = BigInt::one();
    for i in 2..=limit {
        product *= BigInt::from(i);
    }
    Ok(Decimal::new(product, 0))
}

/// Greatest common divisor by Euclid's algorithm. `gcd(n, 0) == n`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    if b.is_zero() {
        a.abs()
    } else {
        gcd(b, &(a % b))
    }
}

pub fn hypotenuse(a: &Decimal, b: &Decimal) -> Result<Decimal> {
    square_root(&(a * a + b * b))
}

pub fn sum(values: &[Decimal]) -> Decimal {
    values.iter().fold(Decimal::zero(), |acc, v| acc + v)
}

fn require_values(values: &[Decimal], needed: usize) -> Result<()> {
    if values.len() < needed {
        Err(CalcError::InsufficientOperands {
            needed,
            found: values.len(),
        })
    } else {
        Ok(())
    }
}

pub fn mean(values: &[Decimal]) -> Result<Decimal> {
    require_values(values, 1)?;
    divide(&sum(values), &Decimal::from(values.len() as u64))
}

/// Middle value of a sorted copy; the average of the two centre values for even counts.
pub fn median(values: &[Decimal]) -> Result<Decimal> {
    require_values(values, 1)?;
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Ok(sorted[mid].clone())
    } else {
        divide(&(&sorted[mid - 1] + &sorted[mid]), &Decimal::from(2))
    }
}

/// Population standard deviation.
pub fn standard_deviation(values: &[Decimal]) -> Result<Decimal> {
    let average = mean(values)?;
    let squares: Vec<Decimal> = values
        .iter()
        .map(|v| {
            let diff = v - &average;
            &diff * &diff
        })
        .collect();
    square_root(&mean(&squares)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regression {
    pub slope: Decimal,
    pub intercept: Decimal,
}

impl Regression {
    pub fn predict(&self, x: &Decimal) -> Decimal {
        &self.intercept + &self.slope * x
    }
}

/// Least-squares line through `(1, values[0]), (2, values[1]), ...`.
pub fn linear_regression(values: &[Decimal]) -> Result<Regression> {
    require_values(values, 2)?;
    let n = Decimal::from(values.len() as u64);
    let mut sum_x = Decimal::zero();
    let mut sum_y = Decimal::zero();
    let mut sum_xy = Decimal::zero();
    let mut sum_x2 = Decimal::zero();
    for (i, y) in values.iter().enumerate() {
        let x = Decimal::from(i as u64 + 1);
        sum_xy += &x * y;
        sum_x2 += &x * &x;
        sum_x += x;
        sum_y += y.clone();
    }
    let slope = divide(
        &(&n * &sum_xy - &sum_x * &sum_y),
        &(&n * &sum_x2 - &sum_x * &sum_x),
    )?;
    let intercept = divide(&(&sum_y - &slope * &sum_x), &n)?;
    Ok(Regression { slope, intercept })
}

// RUST CONCEPT: A small value type with its own Display
// Keeps the sign separate so "-0 3/64" can render as "-3/64"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction {
    pub negative: bool,
    pub whole: BigInt,
    pub numerator: BigInt,
    pub denominator: BigInt,
}

impl Fraction {
    pub fn has_fraction(&self) -> bool {
        !self.numerator.is_zero()
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        match (self.whole.is_zero(), self.has_fraction()) {
            (_, false) => write!(f, "{}{}", sign, self.whole),
            (true, true) => write!(f, "{}{}/{}", sign, self.numerator, self.denominator),
            (false, true) => write!(
                f,
                "{}{} {}/{}",
                sign, self.whole, self.numerator, self.denominator
            ),
        }
    }
}

/// Approximate the fractional part of `value` in units of `1/base`, reduced.
pub fn fraction(value: &Decimal, base: i64) -> Result<Fraction> {
    if base <= 0 {
        return Err(CalcError::invalid_argument(
            "fraction base must be a positive integer",
        ));
    }
    let negative = value.sign() == Sign::Minus;
    let magnitude = value.abs();
    let mut whole = truncate(&magnitude);
    let fractional = &magnitude - Decimal::new(whole.clone(), 0);

    let scaled = round_half_up(&(&fractional * Decimal::from(base)), 0);
    let mut numerator = truncate(&scaled);
    let mut denominator = BigInt::from(base);
    if numerator == denominator {
        whole += BigInt::one();
        numerator = BigInt::zero();
    }

    let mut divisor = gcd(&numerator, &denominator);
    if divisor.is_zero() {
        divisor = BigInt::one();
    }
    numerator /= &divisor;
    denominator /= &divisor;

    Ok(Fraction {
        negative,
        whole,
        numerator,
        denominator,
    })
}
