// User function primitives - recording, deleting and replaying
//
// A user function is the list of raw command lines captured while recording. Running
// it feeds each line back through the dispatcher.

use crate::builtins;
use crate::evaluator;
use crate::parser::{self, Operator};
use crate::session::Session;
use crate::value::{CalcError, Result};
use tracing::debug;

/// Functions may call functions, up to this depth.
pub const MAX_REPLAY_DEPTH: usize = 16;

// A name must not shadow a command, an operator or a number
fn check_function_name(name: &str) -> Result<()> {
    if name.split_whitespace().count() != 1 {
        return Err(CalcError::invalid_argument(
            "a function name must be a single word",
        ));
    }
    let shadows = builtins::lookup(name).is_some()
        || Operator::from_token(name).is_some()
        || match parser::parse(name) {
            Some(input) => matches!(parser::classify_literal(&input), Ok(Some(_)) | Err(_)),
            None => true,
        };
    if shadows {
        return Err(CalcError::invalid_argument(format!(
            "'{}' cannot be used as a function name",
            name
        )));
    }
    Ok(())
}

// rec on | rec off [name]
pub fn record_impl(session: &mut Session, param: &str) -> Result<()> {
    let lowered = param.trim().to_lowercase();
    let (action, name) = match lowered.split_once(char::is_whitespace) {
        Some((action, name)) => (action, name.trim()),
        None => (lowered.as_str(), ""),
    };

    match action {
        "on" => {
            if session.is_recording() {
                session.warn("Recording is already on; starting over");
            }
            session.start_recording();
            session.info("Recording started");
            Ok(())
        }
        "off" => {
            if !session.is_recording() {
                return Err(CalcError::invalid_argument("recording is not on"));
            }
            if name.is_empty() {
                session.stop_recording();
                session.info("No function name given, recording discarded");
                return Ok(());
            }
            check_function_name(name)?;
            let steps = session.stop_recording().unwrap_or_default();
            if steps.is_empty() {
                session.warn("Nothing was recorded, no function saved");
                return Ok(());
            }
            session.store_mut().save_function(name, &steps)?;
            debug!("saved function '{}' with {} steps", name, steps.len());
            session.info(&format!(
                "Function '{}' saved with {} step(s)",
                name,
                steps.len()
            ));
            Ok(())
        }
        _ => Err(CalcError::invalid_argument("usage: rec on | rec off [name]")),
    }
}

// func del NAME | func delall
pub fn function_impl(session: &mut Session, param: &str) -> Result<()> {
    let lowered = param.trim().to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    match tokens.as_slice() {
        ["del", name] => {
            if session.store_mut().delete_function(name)? {
                session.info(&format!("Deleted function '{}'", name));
                Ok(())
            } else {
                Err(CalcError::invalid_argument(format!(
                    "no function named '{}'",
                    name
                )))
            }
        }
        ["delall"] => {
            let names = session.store().list_functions()?;
            for name in &names {
                session.store_mut().delete_function(name)?;
            }
            session.info(&format!("Deleted {} function(s)", names.len()));
            Ok(())
        }
        _ => Err(CalcError::invalid_argument(
            "usage: func del NAME | func delall",
        )),
    }
}

/// Run each step of a user function. A failing step is reported and the rest still run.
pub fn replay(session: &mut Session, name: &str, steps: &[String]) -> Result<()> {
    if session.replay_depth >= MAX_REPLAY_DEPTH {
        return Err(CalcError::invalid_argument(format!(
            "function '{}' is nested more than {} levels deep",
            name, MAX_REPLAY_DEPTH
        )));
    }
    debug!("running function '{}' ({} steps)", name, steps.len());

    session.replay_depth += 1;
    for step in steps {
        if let Err(e) = evaluator::execute_line(session, step) {
            session.error(&format!("{} (in '{}' at '{}')", e, name, step));
        }
    }
    session.replay_depth -= 1;
    Ok(())
}
