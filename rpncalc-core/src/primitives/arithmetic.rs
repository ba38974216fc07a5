// Arithmetic primitives - the five operators, NumOps, and single-value math

use crate::math;
use crate::parser::Operator;
use crate::session::Session;
use crate::value::{self, CalcError, Decimal, Result};
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::debug;

/// `a op b`, where `b` was on top. The flag is set when a fractional exponent was dropped.
pub fn apply_operator(a: &Decimal, b: &Decimal, op: Operator) -> Result<(Decimal, bool)> {
    match op {
        Operator::Add => Ok((a + b, false)),
        Operator::Subtract => Ok((a - b, false)),
        Operator::Multiply => Ok((a * b, false)),
        Operator::Divide => Ok((math::divide(a, b)?, false)),
        Operator::Power => {
            let exponent = math::truncate(b)
                .to_i64()
                .ok_or_else(|| CalcError::invalid_argument("exponent is too large"))?;
            Ok((math::power(a, exponent)?, math::has_fraction(b)))
        }
    }
}

// ( a b -- a op b )
pub fn operator_impl(session: &mut Session, op: Operator) -> Result<()> {
    session.require(2)?;
    let b = session.stack.get_line(1)?.clone();
    let a = session.stack.get_line(2)?.clone();
    let (result, truncated) = apply_operator(&a, &b, op)?;
    if truncated {
        session.warn("Only the integer part of the exponent was used");
    }
    debug!("{} {} {} = {}", a, op, b, result);

    session.stack.save_undo();
    session.stack.pop()?;
    session.stack.pop()?;
    session.stack.push(result);
    Ok(())
}

// NumOp: ( a -- a op n ), one checkpoint for the push and the operation together
pub fn numop_impl(session: &mut Session, value: Decimal, op: Operator) -> Result<()> {
    let a = session.top()?;
    let (result, truncated) = apply_operator(&a, &value, op)?;
    if truncated {
        session.warn("Only the integer part of the exponent was used");
    }
    debug!("{} {} {} = {}", a, op, value, result);
    session.replace_top(result)
}

// Shared shape for ( a b -- f(a, b) )
fn binary_impl(
    session: &mut Session,
    name: &str,
    f: impl Fn(&Decimal, &Decimal) -> Result<Decimal>,
) -> Result<()> {
    session.require(2)?;
    let b = session.stack.get_line(1)?.clone();
    let a = session.stack.get_line(2)?.clone();
    let result = f(&a, &b)?;
    debug!("{}({}, {}) = {}", name, a, b, result);

    session.stack.save_undo();
    session.stack.pop()?;
    session.stack.pop()?;
    session.stack.push(result);
    Ok(())
}

// Shared shape for ( x -- f(x) )
fn unary_impl(
    session: &mut Session,
    name: &str,
    f: impl Fn(&Decimal) -> Result<Decimal>,
) -> Result<()> {
    let x = session.top()?;
    let result = f(&x)?;
    debug!("{}({}) = {}", name, x, result);
    session.replace_top(result)
}

pub fn modulus_impl(session: &mut Session) -> Result<()> {
    binary_impl(session, "mod", math::modulus)
}

pub fn hypotenuse_impl(session: &mut Session) -> Result<()> {
    binary_impl(session, "hypot", math::hypotenuse)
}

pub fn flip_sign_impl(session: &mut Session) -> Result<()> {
    unary_impl(session, "flip", |x| Ok(-x))
}

pub fn sqrt_impl(session: &mut Session) -> Result<()> {
    unary_impl(session, "sqrt", math::square_root)
}

pub fn abs_impl(session: &mut Session) -> Result<()> {
    unary_impl(session, "abs", |x| Ok(x.abs()))
}

pub fn int_impl(session: &mut Session) -> Result<()> {
    unary_impl(session, "int", |x| Ok(math::integer_part(x)))
}

// ( x -- round(x, n) ); n defaults to 0
pub fn round_impl(session: &mut Session, param: &str) -> Result<()> {
    let places = if param.is_empty() {
        0
    } else {
        param
            .parse::<u32>()
            .map_err(|_| {
                CalcError::invalid_argument(format!(
                    "'{}' is not a valid number of decimal places",
                    param
                ))
            })?
    };
    let places = i64::from(places);
    if places > math::MAX_ROUND_PLACES {
        return Err(CalcError::out_of_range(format!(
            "round keeps at most {} decimal places",
            math::MAX_ROUND_PLACES
        )));
    }
    unary_impl(session, "round", |x| Ok(math::round_half_up(x, places)))
}

pub fn factorial_impl(session: &mut Session) -> Result<()> {
    let x = session.top()?;
    let result = math::factorial(&math::truncate(&x))?;
    if math::has_fraction(&x) {
        session.warn("Factorial uses the integer part only");
    }
    debug!("factorial({}) = {}", x, result);
    session.replace_top(result)
}

fn logarithm(x: &Decimal, name: &str, f: fn(f64) -> f64) -> Result<Decimal> {
    if x.is_zero() || x.is_negative() {
        return Err(CalcError::invalid_argument(format!(
            "{} requires a positive number",
            name
        )));
    }
    value::from_f64(f(value::to_f64(x)), name)
}

pub fn log_impl(session: &mut Session) -> Result<()> {
    unary_impl(session, "log", |x| logarithm(x, "log", f64::ln))
}

pub fn log10_impl(session: &mut Session) -> Result<()> {
    unary_impl(session, "log10", |x| logarithm(x, "log10", f64::log10))
}
