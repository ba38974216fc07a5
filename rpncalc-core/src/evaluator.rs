// Command dispatcher - classifies one line of input and routes it
//
// Order matters: named commands, then bare operators, then user functions, then the
// literal forms (fraction, number, percent, NumOp, scientific). Anything left over is
// an unknown command.

use crate::builtins::{self, BuiltinEntry};
use crate::parser::{self, Literal, ParsedInput};
use crate::primitives::{arithmetic, functions};
use crate::session::Session;
use crate::value::{CalcError, Result};
use tracing::debug;

/// Execute one line of input against the session.
pub fn execute_line(session: &mut Session, line: &str) -> Result<()> {
    let Some(mut input) = parser::parse(line) else {
        return Ok(());
    };

    // "mem list" is spelled "list mem" internally
    if matches!(input.head.as_str(), "mem" | "memory") && input.param.eq_ignore_ascii_case("list") {
        input = ParsedInput {
            raw: "list mem".to_string(),
            head: "list".to_string(),
            param: "mem".to_string(),
        };
    }

    let entry = builtins::lookup(&input.head);
    // Listings, help and session control stay out of both the history and recordings
    let tracked = session.replay_depth == 0 && entry.is_none_or(|e| e.builtin.is_recordable());
    if tracked {
        session.push_history(&input.raw);
    }
    let recorded = tracked && session.is_recording();
    if recorded {
        session.record_step(&input.raw);
    }

    let result = dispatch(session, &input, entry);
    if recorded && matches!(result, Err(CalcError::UnknownCommand(_))) {
        session.retract_last_step();
    }
    result
}

fn dispatch(
    session: &mut Session,
    input: &ParsedInput,
    entry: Option<&BuiltinEntry>,
) -> Result<()> {
    if let Some(entry) = entry {
        debug!("command '{}' param '{}'", entry.name(), input.param);
        return entry.builtin.run(session, &input.param);
    }

    if let Some(op) = parser::Operator::from_token(&input.head) {
        return arithmetic::operator_impl(session, op);
    }

    if let Some(steps) = session.function_steps(&input.raw) {
        return functions::replay(session, &input.raw, &steps);
    }

    match parser::classify_literal(input)? {
        Some(Literal::Fraction(value)) => {
            debug!("fraction '{}' => {}", input.raw, value);
            session.push_checked(value);
            Ok(())
        }
        Some(Literal::Number(value))
        | Some(Literal::Percent(value))
        | Some(Literal::Scientific(value)) => {
            session.push_checked(value);
            Ok(())
        }
        Some(Literal::NumOp(value, op)) => arithmetic::numop_impl(session, value, op),
        None => Err(CalcError::UnknownCommand(input.raw.clone())),
    }
}
