// Statistics primitives - aggregates over the whole stack
//
// addall, mean, median and sd replace the stack with their result unless the
// parameter starts with 'k' (keep), in which case the result is appended.

use crate::display;
use crate::math;
use crate::session::Session;
use crate::value::{self, CalcError, Decimal, Result};
use tracing::debug;

fn keep_requested(param: &str) -> bool {
    param.trim_start().to_lowercase().starts_with('k')
}

// Shared shape for the aggregates that collapse the stack
fn aggregate_impl(
    session: &mut Session,
    name: &str,
    param: &str,
    f: impl Fn(&[Decimal]) -> Result<Decimal>,
) -> Result<()> {
    session.require(2)?;
    let result = f(session.stack.values())?;
    debug!("{} of {} values = {}", name, session.stack.len(), result);

    session.stack.save_undo();
    if keep_requested(param) {
        session.stack.push(result);
    } else {
        session.stack.replace(vec![result]);
    }
    Ok(())
}

pub fn add_all_impl(session: &mut Session, param: &str) -> Result<()> {
    aggregate_impl(session, "sum", param, |values| Ok(math::sum(values)))
}

pub fn mean_impl(session: &mut Session, param: &str) -> Result<()> {
    aggregate_impl(session, "mean", param, math::mean)
}

pub fn median_impl(session: &mut Session, param: &str) -> Result<()> {
    aggregate_impl(session, "median", param, math::median)
}

pub fn std_dev_impl(session: &mut Session, param: &str) -> Result<()> {
    aggregate_impl(session, "standard deviation", param, math::standard_deviation)
}

fn extreme_impl(session: &mut Session, label: &str, pick_max: bool) -> Result<()> {
    session.require(1)?;
    let values = session.stack.values();
    let extreme = if pick_max {
        values.iter().max()
    } else {
        values.iter().min()
    }
    .cloned()
    .ok_or(CalcError::Underflow)?;

    session.push_checked(extreme.clone());
    session.info(&format!(
        "{} value added to stack: {}",
        label,
        display::comma(&extreme)
    ));
    Ok(())
}

pub fn min_impl(session: &mut Session) -> Result<()> {
    extreme_impl(session, "Minimum", false)
}

pub fn max_impl(session: &mut Session) -> Result<()> {
    extreme_impl(session, "Maximum", true)
}

// lr [x] [add]: x defaults to the line after the top of the stack
pub fn linear_regression_impl(session: &mut Session, param: &str) -> Result<()> {
    session.require(2)?;

    let mut x = None;
    let mut add = false;
    for token in param.split_whitespace() {
        if token.eq_ignore_ascii_case("add") {
            add = true;
        } else {
            let parsed = value::parse_plain(token).ok_or_else(|| {
                CalcError::invalid_argument(format!("'{}' is not a valid x value", token))
            })?;
            x = Some(parsed);
        }
    }
    let x = x.unwrap_or_else(|| Decimal::from(session.stack.len() as u64 + 1));

    let regression = math::linear_regression(session.stack.values())?;
    let prediction = regression.predict(&x);
    debug!(
        "regression slope {} intercept {}",
        regression.slope, regression.intercept
    );

    session.header("Linear Regression");
    session.result(&format!(
        "Slope:        {}",
        display::comma(&math::round_half_up(&regression.slope, 4))
    ));
    session.result(&format!(
        "Y-Intercept:  {}",
        display::comma(&math::round_half_up(&regression.intercept, 4))
    ));
    session.result(&format!(
        "Prediction at x = {}:  {}",
        display::comma(&x),
        display::comma(&math::round_half_up(&prediction, 4))
    ));

    if add {
        session.push_checked(prediction);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{BufferOutput, MessageKind};
    use crate::session::Settings;
    use crate::store::MemoryStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn session_with(values: &[&str]) -> Session {
        let mut session = Session::new();
        for v in values {
            session.stack.push(dec(v));
        }
        session
    }

    #[test]
    fn test_add_all_replaces_stack() {
        let mut session = session_with(&["1", "2", "3"]);
        add_all_impl(&mut session, "").unwrap();
        assert_eq!(session.stack.values(), &[dec("6")]);
        assert_eq!(session.stack.undo_len(), 1);
    }

    #[test]
    fn test_keep_appends_result() {
        let mut session = session_with(&["1", "2", "3", "4"]);
        mean_impl(&mut session, "keep").unwrap();
        assert_eq!(
            session.stack.values(),
            &[dec("1"), dec("2"), dec("3"), dec("4"), dec("2.5")]
        );
    }

    #[test]
    fn test_aggregates_need_two_values() {
        let mut session = session_with(&["5"]);
        assert_eq!(
            add_all_impl(&mut session, ""),
            Err(CalcError::InsufficientOperands { needed: 2, found: 1 })
        );
        assert_eq!(session.stack.values(), &[dec("5")]);
        assert_eq!(session.stack.undo_len(), 0);
    }

    #[test]
    fn test_median_keeps_original_order() {
        let mut session = session_with(&["5", "1", "3"]);
        median_impl(&mut session, "k").unwrap();
        assert_eq!(
            session.stack.values(),
            &[dec("5"), dec("1"), dec("3"), dec("3")]
        );
        assert_eq!(session.stack.undo_len(), 1);
    }

    #[test]
    fn test_standard_deviation() {
        let mut session = session_with(&["2", "4", "4", "4", "5", "5", "7", "9"]);
        std_dev_impl(&mut session, "").unwrap();
        assert_eq!(session.stack.values(), &[dec("2")]);
    }

    #[test]
    fn test_min_and_max_append() {
        let mut session = session_with(&["3", "1", "2"]);
        min_impl(&mut session).unwrap();
        max_impl(&mut session).unwrap();
        assert_eq!(
            session.stack.values(),
            &[dec("3"), dec("1"), dec("2"), dec("1"), dec("3")]
        );
    }

    #[test]
    fn test_linear_regression_reports_and_adds() {
        let output = BufferOutput::new();
        let log = output.log();
        let mut session =
            Session::with_parts(Box::new(MemoryStore::new()), Box::new(output), Settings::default());
        for v in ["2", "4", "6"] {
            session.stack.push(dec(v));
        }

        linear_regression_impl(&mut session, "").unwrap();
        assert_eq!(session.stack.len(), 3);
        assert!(
            log.borrow()
                .iter()
                .any(|(kind, text)| *kind == MessageKind::Result && text.ends_with(" 8.0000"))
        );

        linear_regression_impl(&mut session, "10 add").unwrap();
        assert_eq!(session.top().unwrap(), dec("20"));
        assert!(linear_regression_impl(&mut session, "ten").is_err());
    }
}
