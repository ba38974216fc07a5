// Conversion primitives - fractions, percentages and units

use crate::display;
use crate::math;
use crate::session::Session;
use crate::units;
use crate::value::{CalcError, Decimal, Result};
use tracing::debug;

pub const DEFAULT_FRACTION_BASE: i64 = 64;

// Displays only, the stack is untouched
pub fn fraction_impl(session: &mut Session, param: &str) -> Result<()> {
    let base = if param.trim().is_empty() {
        DEFAULT_FRACTION_BASE
    } else {
        param.trim().parse::<i64>().map_err(|_| {
            CalcError::invalid_argument(format!("'{}' is not a valid fraction base", param))
        })?
    };
    let x = session.top()?;
    let fraction = math::fraction(&x, base)?;
    debug!("{} in 1/{} units = {:?}", x, base, fraction);

    if !fraction.has_fraction() {
        session.info(&format!(
            "{} has no fractional component at a granularity of 1/{}",
            display::comma(&x),
            base
        ));
    } else {
        session.result(&format!(
            "{} is approximately '{}'",
            display::comma(&x),
            fraction
        ));
    }
    Ok(())
}

pub fn to_percent_impl(session: &mut Session) -> Result<()> {
    let x = session.top()?;
    session.replace_top(x * Decimal::from(100))
}

pub fn from_percent_impl(session: &mut Session) -> Result<()> {
    let x = session.top()?;
    session.replace_top(x * Decimal::new(1.into(), 2))
}

fn convert_top(session: &mut Session, from: &str, to: &str) -> Result<()> {
    let x = session.top()?;
    let result = units::convert(&x, from, to)?;
    debug!("{} {} => {} {}", x, from, result, to);
    session.replace_top(result.clone())?;
    session.info(&format!(
        "Converted {} {} to {} {}",
        display::comma(&x),
        from.to_lowercase(),
        display::comma(&result),
        to.to_lowercase()
    ));
    Ok(())
}

fn list_units(session: &mut Session) {
    session.header("Available units");
    for (category, symbols) in units::symbols_by_category() {
        session.info(&format!("{:<12} {}", category.to_string(), symbols.join(" ")));
    }
}

pub fn convert_impl(session: &mut Session, param: &str) -> Result<()> {
    let tokens: Vec<&str> = param.split_whitespace().collect();
    match tokens.as_slice() {
        [] => {
            list_units(session);
            Ok(())
        }
        [from, to] => convert_top(session, from, to),
        _ => Err(CalcError::invalid_argument(
            "convert requires a source and a target unit",
        )),
    }
}

pub fn shortcut_impl(session: &mut Session, from: &'static str, to: &'static str) -> Result<()> {
    convert_top(session, from, to)
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

    fn session_with(value: &str) -> (Session, crate::output::MessageLog) {
        let output = BufferOutput::new();
        let log = output.log();
        let mut session =
            Session::with_parts(Box::new(MemoryStore::new()), Box::new(output), Settings::default());
        session.stack.push(dec(value));
        (session, log)
    }

    #[test]
    fn test_fraction_is_displayed_only() {
        let (mut session, log) = session_with("1.1875");
        fraction_impl(&mut session, "").unwrap();
        assert_eq!(session.stack.values(), &[dec("1.1875")]);
        assert_eq!(session.stack.undo_len(), 0);
        assert!(
            log.borrow()
                .iter()
                .any(|(kind, text)| *kind == MessageKind::Result && text.contains("'1 3/16'"))
        );
    }

    #[test]
    fn test_fraction_rejects_bad_base() {
        let (mut session, _) = session_with("0.5");
        assert!(fraction_impl(&mut session, "0").is_err());
        assert!(fraction_impl(&mut session, "sixteen").is_err());
    }

    #[test]
    fn test_whole_number_has_no_fraction() {
        let (mut session, log) = session_with("3");
        fraction_impl(&mut session, "16").unwrap();
        assert!(
            log.borrow()
                .iter()
                .any(|(_, text)| text.contains("no fractional component"))
        );
    }

    #[test]
    fn test_fraction_below_granularity() {
        let (mut session, log) = session_with("1.001");
        fraction_impl(&mut session, "16").unwrap();
        let texts: Vec<String> = log.borrow().iter().map(|(_, text)| text.clone()).collect();
        assert!(texts.contains(&"1.001 has no fractional component at a granularity of 1/16".to_string()));
        assert!(!texts.iter().any(|text| text.contains("approximately")));
    }

    #[test]
    fn test_percentages() {
        let (mut session, _) = session_with("0.25");
        to_percent_impl(&mut session).unwrap();
        assert_eq!(session.top().unwrap(), dec("25"));
        from_percent_impl(&mut session).unwrap();
        assert_eq!(session.top().unwrap(), dec("0.25"));
    }

    #[test]
    fn test_convert_and_shortcuts() {
        let (mut session, _) = session_with("1");
        convert_impl(&mut session, "mi km").unwrap();
        assert_eq!(session.top().unwrap(), dec("1.609344"));

        let (mut session, _) = session_with("1");
        shortcut_impl(&mut session, "in", "mm").unwrap();
        assert_eq!(session.top().unwrap(), dec("25.4"));
    }

    #[test]
    fn test_convert_errors_leave_stack() {
        let (mut session, _) = session_with("1");
        assert!(matches!(
            convert_impl(&mut session, "mi kg"),
            Err(CalcError::IncompatibleUnits { .. })
        ));
        assert!(matches!(
            convert_impl(&mut session, "mi parsec"),
            Err(CalcError::UnknownUnit(_))
        ));
        assert!(convert_impl(&mut session, "mi").is_err());
        assert_eq!(session.stack.values(), &[dec("1")]);
        assert_eq!(session.stack.undo_len(), 0);
    }

    #[test]
    fn test_convert_without_units_lists_them() {
        let (mut session, log) = session_with("1");
        convert_impl(&mut session, "").unwrap();
        assert!(log.borrow().iter().any(|(_, text)| text.starts_with("length")));
    }
}
