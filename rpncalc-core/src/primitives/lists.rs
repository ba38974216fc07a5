// Listing primitives - list stacks|mem|undo|func|cmds
//
// Listings only print; nothing here touches the stack or its history.

use crate::display;
use crate::session::Session;
use crate::value::{CalcError, Decimal, Result};

fn join_values(values: &[Decimal]) -> String {
    let formatted: Vec<String> = values.iter().map(display::comma).collect();
    format!("[{}]", formatted.join(", "))
}

fn list_stacks(session: &mut Session) -> Result<()> {
    let mut names = session.store().list_stacks()?;
    let current = session.stack.name().to_string();
    if !names.contains(&current) {
        names.push(current.clone());
        names.sort();
    }
    session.header("Saved stacks");
    for name in names {
        let marker = if name == current { "  (current)" } else { "" };
        session.info(&format!("{}{}", name, marker));
    }
    Ok(())
}

fn list_memory(session: &mut Session) {
    session.header("Memory slots");
    let lines: Vec<String> = session
        .memory
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(value) => format!("{:>2}:  {}", i, display::comma(value)),
            None => format!("{:>2}:", i),
        })
        .collect();
    for line in lines {
        session.info(&line);
    }
}

// Line 1 is the oldest checkpoint, matching the numbering `undo n` takes
fn list_undo(session: &mut Session) {
    session.header("Undo history");
    if session.stack.undo_len() == 0 {
        session.info("No undo history");
        return;
    }
    let lines: Vec<String> = (0..session.stack.undo_len())
        .filter_map(|i| {
            session
                .stack
                .undo_get(i)
                .map(|values| format!("{:>2}:  {}", i + 1, join_values(values)))
        })
        .collect();
    for line in lines {
        session.info(&line);
    }
}

fn list_functions(session: &mut Session) -> Result<()> {
    let names = session.store().list_functions()?;
    session.header("User functions");
    if names.is_empty() {
        session.info("No user functions");
    }
    for name in names {
        let steps = session.function_steps(&name).unwrap_or_default();
        session.info(&format!("{}:  {}", name, steps.join(", ")));
    }
    Ok(())
}

// Numbered from 0, oldest first
fn list_commands(session: &mut Session) {
    session.header("Command history");
    if session.history().is_empty() {
        session.info("No commands entered");
        return;
    }
    let lines: Vec<String> = session
        .history()
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>2}:  {}", i, line))
        .collect();
    for line in lines {
        session.info(&line);
    }
}

pub fn list_impl(session: &mut Session, param: &str) -> Result<()> {
    match param.trim().to_lowercase().as_str() {
        "stacks" | "stack" => list_stacks(session),
        "mem" | "memory" => {
            list_memory(session);
            Ok(())
        }
        "undo" => {
            list_undo(session);
            Ok(())
        }
        "func" | "function" | "functions" => list_functions(session),
        "cmd" | "cmds" | "command" | "commands" => {
            list_commands(session);
            Ok(())
        }
        _ => Err(CalcError::invalid_argument(
            "usage: list stacks|mem|undo|func|cmds",
        )),
    }
}
