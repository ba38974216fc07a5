// Trigonometry primitives - computed in f64, degrees unless the parameter starts with 'r'

use crate::session::Session;
use crate::value::{self, CalcError, Decimal, Result};
use tracing::debug;

// f64 carries a little under 16 significant digits; keep 15 so 30 sin lands on 0.5
const TRIG_PRECISION: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

impl TrigFn {
    pub fn name(self) -> &'static str {
        match self {
            TrigFn::Sin => "sin",
            TrigFn::Cos => "cos",
            TrigFn::Tan => "tan",
            TrigFn::Asin => "asin",
            TrigFn::Acos => "acos",
            TrigFn::Atan => "atan",
        }
    }

    fn is_inverse(self) -> bool {
        matches!(self, TrigFn::Asin | TrigFn::Acos | TrigFn::Atan)
    }

    fn apply(self, x: f64) -> f64 {
        match self {
            TrigFn::Sin => x.sin(),
            TrigFn::Cos => x.cos(),
            TrigFn::Tan => x.tan(),
            TrigFn::Asin => x.asin(),
            TrigFn::Acos => x.acos(),
            TrigFn::Atan => x.atan(),
        }
    }
}

fn use_radians(param: &str) -> Result<bool> {
    match param.trim().to_lowercase().chars().next() {
        None => Ok(false),
        Some('r') => Ok(true),
        Some(_) => Err(CalcError::invalid_argument(format!(
            "'{}' is not a valid angle mode, use 'rad' or nothing for degrees",
            param
        ))),
    }
}

/// Evaluate a trig function on a decimal, converting degrees in or out as needed.
pub fn evaluate(f: TrigFn, x: &Decimal, radians: bool) -> Result<Decimal> {
    let mut input = value::to_f64(x);
    if !radians && !f.is_inverse() {
        input = input.to_radians();
    }
    let mut output = f.apply(input);
    if !radians && f.is_inverse() {
        output = output.to_degrees();
    }
    let result = value::from_f64(output, f.name())?;
    Ok(result.with_prec(TRIG_PRECISION).normalized())
}

pub fn trig_impl(session: &mut Session, f: TrigFn, param: &str) -> Result<()> {
    let radians = use_radians(param)?;
    let x = session.top()?;
    let result = evaluate(f, &x, radians)?;
    debug!(
        "{}({} {}) = {}",
        f.name(),
        x,
        if radians { "rad" } else { "deg" },
        result
    );
    session.replace_top(result)
}
