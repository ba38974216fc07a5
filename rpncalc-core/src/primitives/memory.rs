// Memory slot primitives - mem [slot] add|clr|clrall|copy|copyall|addall
//
// Slots are numbered from 0; slot 0 is used when none is given.

use crate::display;
use crate::session::Session;
use crate::value::{CalcError, Result};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemoryOp {
    Add,
    Clear,
    ClearAll,
    Copy,
    CopyAll,
    AddAll,
}

impl MemoryOp {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "add" => Some(MemoryOp::Add),
            "clr" | "clear" => Some(MemoryOp::Clear),
            "clrall" | "clearall" => Some(MemoryOp::ClearAll),
            "copy" | "recall" => Some(MemoryOp::Copy),
            "copyall" | "recallall" => Some(MemoryOp::CopyAll),
            "addall" => Some(MemoryOp::AddAll),
            _ => None,
        }
    }
}

fn parse_command(param: &str) -> Result<(usize, MemoryOp)> {
    let lowered = param.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    let (slot, word) = match tokens.as_slice() {
        [word] => (0, *word),
        [slot, word] => {
            let slot = slot.parse::<usize>().map_err(|_| {
                CalcError::invalid_argument(format!("'{}' is not a valid memory slot", slot))
            })?;
            (slot, *word)
        }
        _ => {
            return Err(CalcError::invalid_argument(
                "usage: mem [slot] add|clr|clrall|copy|copyall|addall",
            ));
        }
    };
    let op = MemoryOp::parse(word).ok_or_else(|| {
        CalcError::invalid_argument(format!("'{}' is not a memory command", word))
    })?;
    Ok((slot, op))
}

fn check_slot(session: &Session, slot: usize) -> Result<()> {
    if slot >= session.memory.len() {
        return Err(CalcError::out_of_range(format!(
            "memory slot must be between 0 and {}",
            session.memory.len() - 1
        )));
    }
    Ok(())
}

pub fn mem_impl(session: &mut Session, param: &str) -> Result<()> {
    let (slot, op) = parse_command(param)?;
    debug!("memory {:?} on slot {}", op, slot);

    match op {
        MemoryOp::Add => {
            check_slot(session, slot)?;
            let value = session.top()?;
            session.info(&format!(
                "Added {} to memory slot {}",
                display::comma(&value),
                slot
            ));
            session.memory[slot] = Some(value);
        }
        MemoryOp::Clear => {
            check_slot(session, slot)?;
            session.memory[slot] = None;
            session.info(&format!("Cleared memory slot {}", slot));
        }
        MemoryOp::ClearAll => {
            session.memory.iter_mut().for_each(|s| *s = None);
            session.info("Cleared all memory slots");
        }
        MemoryOp::Copy => {
            check_slot(session, slot)?;
            let value = session.memory[slot].clone().ok_or_else(|| {
                CalcError::invalid_argument(format!("memory slot {} is empty", slot))
            })?;
            session.push_checked(value);
        }
        MemoryOp::CopyAll => {
            let values: Vec<_> = session.memory.iter().rev().flatten().cloned().collect();
            if values.is_empty() {
                return Err(CalcError::invalid_argument("every memory slot is empty"));
            }
            session.stack.save_undo();
            for value in values {
                session.stack.push(value);
            }
        }
        MemoryOp::AddAll => {
            let size = session.stack.len();
            if size > session.memory.len() {
                return Err(CalcError::out_of_range(format!(
                    "{} values do not fit in {} memory slots",
                    size,
                    session.memory.len()
                )));
            }
            // The top of the stack lands in slot 0
            let values: Vec<_> = session.stack.values().iter().rev().cloned().collect();
            for (i, value) in values.into_iter().enumerate() {
                session.memory[i] = Some(value);
            }
            session.info(&format!("Copied {} value(s) into memory", size));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_add_does_not_touch_stack() {
        let mut session = Session::new();
        session.stack.push(dec("42"));
        mem_impl(&mut session, "add").unwrap();
        mem_impl(&mut session, "3 add").unwrap();
        assert_eq!(session.memory[0], Some(dec("42")));
        assert_eq!(session.memory[3], Some(dec("42")));
        assert_eq!(session.stack.values(), &[dec("42")]);
        assert_eq!(session.stack.undo_len(), 0);
        assert_eq!(session.memory_used(), 2);
    }

    #[test]
    fn test_copy_pushes_with_checkpoint() {
        let mut session = Session::new();
        session.memory[1] = Some(dec("7"));
        mem_impl(&mut session, "1 recall").unwrap();
        assert_eq!(session.stack.values(), &[dec("7")]);
        assert_eq!(session.stack.undo_len(), 1);
        assert!(mem_impl(&mut session, "2 copy").is_err());
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.memory[0] = Some(dec("1"));
        session.memory[1] = Some(dec("2"));
        mem_impl(&mut session, "clr").unwrap();
        assert_eq!(session.memory_used(), 1);
        mem_impl(&mut session, "clearall").unwrap();
        assert_eq!(session.memory_used(), 0);
    }

    #[test]
    fn test_add_all_and_copy_all() {
        let mut session = Session::new();
        for v in ["1", "2", "3"] {
            session.stack.push(dec(v));
        }
        mem_impl(&mut session, "addall").unwrap();
        assert_eq!(session.memory[0], Some(dec("3")));
        assert_eq!(session.memory[2], Some(dec("1")));

        session.stack.clear();
        mem_impl(&mut session, "copyall").unwrap();
        assert_eq!(session.stack.values(), &[dec("1"), dec("2"), dec("3")]);
        assert_eq!(session.stack.undo_len(), 1);
    }

    #[test]
    fn test_bad_slots_and_commands() {
        let mut session = Session::new();
        session.stack.push(dec("1"));
        assert!(matches!(
            mem_impl(&mut session, "10 add"),
            Err(CalcError::OutOfRange(_))
        ));
        assert!(mem_impl(&mut session, "x add").is_err());
        assert!(mem_impl(&mut session, "frobnicate").is_err());
        assert!(mem_impl(&mut session, "").is_err());
        assert!(mem_impl(&mut session, "copyall").is_err());
        assert_eq!(session.memory_used(), 0);
    }

    #[test]
    fn test_add_all_needs_enough_slots() {
        let mut session = Session::new();
        session.resize_memory(2);
        for v in ["1", "2", "3"] {
            session.stack.push(dec(v));
        }
        assert!(mem_impl(&mut session, "addall").is_err());
        assert_eq!(session.memory_used(), 0);
    }
}
