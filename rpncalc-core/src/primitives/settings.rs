// Settings and session primitives - set, reset, debug, version, license, help, exit

use crate::builtins;
use crate::display::{Alignment, MIN_WIDTH};
use crate::session::{Session, Settings};
use crate::value::{CalcError, Result};
use std::str::FromStr;
use tracing::info;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LICENSE: &str = "\
rpncalc is free software: you can redistribute it and/or modify it under the terms
of the GNU General Public License as published by the Free Software Foundation,
either version 3 of the License, or (at your option) any later version.

It is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
PURPOSE. See <https://www.gnu.org/licenses/> for the full text.";

fn show_settings(session: &mut Session) {
    let settings = session.settings;
    session.header("Settings");
    session.info(&format!("Width:         {}", settings.width));
    session.info(&format!("Alignment:     {}", settings.alignment));
    session.info(&format!("Memory slots:  {}", settings.memory_slots));
}

fn parse_count(value: &str, what: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| CalcError::invalid_argument(format!("'{}' is not a valid {}", value, what)))
}

// set | set align l|d|r | set width N | set mem N
pub fn set_impl(session: &mut Session, param: &str) -> Result<()> {
    let lowered = param.trim().to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    match tokens.as_slice() {
        [] => show_settings(session),
        ["align" | "alignment", value] => {
            let alignment = Alignment::from_str(value)?;
            session.settings.alignment = alignment;
            session.info(&format!("Alignment set to '{}'", alignment));
        }
        ["width", value] => {
            let width = parse_count(value, "width")?;
            if width < MIN_WIDTH {
                return Err(CalcError::out_of_range(format!(
                    "width must be at least {}",
                    MIN_WIDTH
                )));
            }
            session.settings.width = width;
            session.info(&format!("Width set to {}", width));
        }
        ["mem" | "memory", value] => {
            let slots = parse_count(value, "number of memory slots")?;
            if slots < 1 {
                return Err(CalcError::out_of_range(
                    "there must be at least one memory slot",
                ));
            }
            session.resize_memory(slots);
            session.info(&format!("Memory slots set to {}", slots));
        }
        _ => {
            return Err(CalcError::invalid_argument(
                "usage: set [align l|d|r | width N | mem N]",
            ));
        }
    }
    Ok(())
}

pub fn reset_impl(session: &mut Session) -> Result<()> {
    let defaults = Settings::default();
    session.settings = defaults;
    session.resize_memory(defaults.memory_slots);
    session.info("Settings restored to their defaults");
    Ok(())
}

pub fn debug_impl(session: &mut Session) -> Result<()> {
    let enabled = !session.debug_enabled();
    session.set_debug(enabled);
    info!("debug mode {}", if enabled { "on" } else { "off" });
    session.info(&format!(
        "Debug mode {}",
        if enabled { "enabled" } else { "disabled" }
    ));
    Ok(())
}

pub fn version_impl(session: &mut Session) -> Result<()> {
    session.result(&format!("rpncalc version {}", VERSION));
    Ok(())
}

pub fn license_impl(session: &mut Session) -> Result<()> {
    session.header("License");
    for line in LICENSE.lines() {
        session.info(line);
    }
    Ok(())
}

pub fn help_impl(session: &mut Session) -> Result<()> {
    session.header("Commands");
    for entry in builtins::registry().entries() {
        session.result(&entry.names.join(", "));
        for line in entry.doc.lines() {
            session.info(&format!("    {}", line));
        }
    }
    session.header("Operators");
    session.info("    + - * / ^ apply to the top two values, e.g. 3 4 + => 7");
    session.info("    A number followed by an operator applies it to the top value, e.g. 2+");
    Ok(())
}

pub fn exit_impl(session: &mut Session) -> Result<()> {
    session.request_quit();
    Ok(())
}

pub fn clear_exit_impl(session: &mut Session) -> Result<()> {
    session.stack.save_undo();
    session.stack.clear();
    session.request_quit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferOutput;
    use crate::store::MemoryStore;
    use crate::value::Decimal;

    #[test]
    fn test_set_width_and_alignment() {
        let mut session = Session::new();
        set_impl(&mut session, "width 100").unwrap();
        set_impl(&mut session, "align d").unwrap();
        assert_eq!(session.settings.width, 100);
        assert_eq!(session.settings.alignment, Alignment::Decimal);

        assert!(matches!(
            set_impl(&mut session, "width 20"),
            Err(CalcError::OutOfRange(_))
        ));
        assert!(set_impl(&mut session, "align middle").is_err());
        assert_eq!(session.settings.width, 100);
    }

    #[test]
    fn test_set_mem_resizes_slots() {
        let mut session = Session::new();
        session.memory[0] = Some(Decimal::from(1));
        set_impl(&mut session, "mem 3").unwrap();
        assert_eq!(session.memory.len(), 3);
        assert_eq!(session.memory[0], Some(Decimal::from(1)));
        assert!(set_impl(&mut session, "mem 0").is_err());
        assert_eq!(session.memory.len(), 3);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = Session::new();
        set_impl(&mut session, "width 120").unwrap();
        set_impl(&mut session, "mem 2").unwrap();
        reset_impl(&mut session).unwrap();
        assert_eq!(session.settings, Settings::default());
        assert_eq!(session.memory.len(), Settings::default().memory_slots);
    }

    #[test]
    fn test_debug_toggles() {
        let mut session = Session::new();
        debug_impl(&mut session).unwrap();
        assert!(session.debug_enabled());
        debug_impl(&mut session).unwrap();
        assert!(!session.debug_enabled());
    }

    #[test]
    fn test_help_lists_every_command() {
        let output = BufferOutput::new();
        let log = output.log();
        let mut session =
            Session::with_parts(Box::new(MemoryStore::new()), Box::new(output), Settings::default());
        help_impl(&mut session).unwrap();
        let lines: Vec<String> = log.borrow().iter().map(|(_, t)| t.clone()).collect();
        for entry in builtins::registry().entries() {
            assert!(lines.contains(&entry.names.join(", ")));
        }
    }

    #[test]
    fn test_exit_and_clear_exit() {
        let mut session = Session::new();
        exit_impl(&mut session).unwrap();
        assert!(session.quit_requested());

        let mut session = Session::new();
        session.stack.push(Decimal::from(5));
        clear_exit_impl(&mut session).unwrap();
        assert!(session.stack.is_empty());
        assert!(session.quit_requested());
    }
}
