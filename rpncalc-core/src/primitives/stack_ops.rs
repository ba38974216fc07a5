// Stack manipulation primitives - undo, delete, copy, swap, rotate, sort, and moving
// whole stacks between the session, the store and stack files

use crate::session::Session;
use crate::stack::SortOrder;
use crate::value::{CalcError, Result};
use tracing::debug;

pub fn undo_impl(session: &mut Session, param: &str) -> Result<()> {
    let line = if param.is_empty() {
        None
    } else {
        Some(param.parse::<usize>().map_err(|_| {
            CalcError::invalid_argument(format!("'{}' is not a valid undo line", param))
        })?)
    };
    session.stack.undo(line)
}

pub fn clear_impl(session: &mut Session) -> Result<()> {
    session.stack.save_undo();
    session.stack.clear();
    Ok(())
}

pub fn clean_impl(session: &mut Session) -> Result<()> {
    session.clear_screen();
    Ok(())
}

// A single line ("3"), a line relative to the top ("-1" is line 2), or a range ("2-4")
fn parse_line_range(param: &str) -> Result<(usize, usize)> {
    let arg: String = param.chars().filter(|c| !c.is_whitespace()).collect();
    if arg.is_empty() {
        return Ok((1, 1));
    }
    if let Ok(n) = arg.parse::<i64>() {
        let line = if n < 0 { 1 + n.unsigned_abs() } else { n as u64 };
        return Ok((line as usize, line as usize));
    }
    let invalid = || CalcError::invalid_argument(format!("invalid line or range: '{}'", param));
    let (start, end) = arg.split_once('-').ok_or_else(invalid)?;
    let start = start.parse::<usize>().map_err(|_| invalid())?;
    let end = end.parse::<usize>().map_err(|_| invalid())?;
    Ok((start.min(end), start.max(end)))
}

pub fn delete_impl(session: &mut Session, param: &str) -> Result<()> {
    session.require(1)?;
    let (start, end) = parse_line_range(param)?;
    let size = session.stack.len();
    if start < 1 || end > size {
        return Err(CalcError::out_of_range(format!(
            "deletion range must be between 1 and {}",
            size
        )));
    }
    debug!("deleting lines {} to {}", start, end);

    session.stack.save_undo();
    let mut values = session.stack.values().to_vec();
    values.drain(size - end..=size - start);
    session.stack.replace(values);
    Ok(())
}

pub fn copy_impl(session: &mut Session, param: &str) -> Result<()> {
    session.require(1)?;
    let line = if param.is_empty() {
        1
    } else {
        let n = param.parse::<i64>().map_err(|_| {
            CalcError::invalid_argument(format!("'{}' is not a valid line number", param))
        })?;
        if n < 0 { 1 + n.unsigned_abs() as usize } else { n as usize }
    };
    let value = session.stack.get_line(line)?.clone();
    debug!("copying line {} to the top", line);
    session.push_checked(value);
    Ok(())
}

pub fn swap_impl(session: &mut Session, param: &str) -> Result<()> {
    session.require(2)?;
    let (first, second) = if param.is_empty() {
        (1, 2)
    } else {
        let lines: Vec<usize> = param
            .split_whitespace()
            .map(|token| token.parse::<usize>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| {
                CalcError::invalid_argument(format!("'{}' is not a pair of line numbers", param))
            })?;
        match lines.as_slice() {
            [a, b] => (*a, *b),
            _ => {
                return Err(CalcError::invalid_argument(
                    "swap takes two line numbers",
                ));
            }
        }
    };
    // Validate both lines before checkpointing
    session.stack.line_to_index(first)?;
    session.stack.line_to_index(second)?;

    session.stack.save_undo();
    session.stack.swap_lines(first, second)
}

// Bottom value to the top
pub fn up_impl(session: &mut Session) -> Result<()> {
    session.require(2)?;
    session.stack.save_undo();
    let bottom = session.stack.remove(0)?;
    session.stack.push(bottom);
    Ok(())
}

// Top value to the bottom
pub fn down_impl(session: &mut Session) -> Result<()> {
    session.require(2)?;
    session.stack.save_undo();
    let top = session.stack.pop()?;
    session.stack.insert(0, top)
}

pub fn reverse_impl(session: &mut Session) -> Result<()> {
    session.require(2)?;
    session.stack.save_undo();
    session.stack.reverse();
    Ok(())
}

pub fn sort_impl(session: &mut Session, param: &str) -> Result<()> {
    let order = match param.to_lowercase().chars().next() {
        Some('a') => SortOrder::Ascending,
        Some('d') => SortOrder::Descending,
        _ => {
            return Err(CalcError::invalid_argument(
                "sort requires 'a' (ascending) or 'd' (descending)",
            ));
        }
    };
    session.require(2)?;
    session.stack.save_undo();
    session.stack.sort(order);
    Ok(())
}

pub fn swap_stacks_impl(session: &mut Session) -> Result<()> {
    session.swap_stacks();
    session.info("Swapping primary and secondary stacks");
    Ok(())
}

pub fn load_impl(session: &mut Session, param: &str) -> Result<()> {
    let name = param.trim();
    if name.is_empty() {
        return Err(CalcError::invalid_argument("load requires a stack name"));
    }
    // The current pair is kept even if it cannot be saved
    if let Err(e) = session.save_state() {
        session.error(&e.to_string());
    }
    session.load_stack_pair(name)?;
    session.info(&format!("Loading stack '{}'", name));
    Ok(())
}

pub fn import_impl(session: &mut Session, param: &str) -> Result<()> {
    let path = param.trim();
    if path.is_empty() {
        return Err(CalcError::invalid_argument("import requires a file name"));
    }
    let values = session.store().import_stack(path)?;
    let count = values.len();
    session.stack.save_undo();
    session.stack.replace(values);
    session.info(&format!("Imported {} value(s) from '{}'", count, path));
    Ok(())
}

pub fn export_impl(session: &mut Session, param: &str) -> Result<()> {
    let path = param.trim();
    if path.is_empty() {
        return Err(CalcError::invalid_argument("export requires a file name"));
    }
    let values = session.stack.values().to_vec();
    session.store_mut().export_stack(path, &values)?;
    session.info(&format!("Exported {} value(s) to '{}'", values.len(), path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StackSlot, Store};
    use crate::output::BufferOutput;
    use crate::session::Settings;
    use crate::value::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn decs(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|s| dec(s)).collect()
    }

    fn session_with(values: &[&str]) -> Session {
        let mut session = Session::new();
        for v in values {
            session.stack.push(dec(v));
        }
        session
    }

    #[test]
    fn test_delete_variants() {
        let mut session = session_with(&["1", "2", "3", "4"]);
        delete_impl(&mut session, "").unwrap();
        assert_eq!(session.stack.values(), decs(&["1", "2", "3"]).as_slice());

        delete_impl(&mut session, "3").unwrap();
        assert_eq!(session.stack.values(), decs(&["2", "3"]).as_slice());

        let mut session = session_with(&["1", "2", "3", "4"]);
        delete_impl(&mut session, "3-2").unwrap();
        assert_eq!(session.stack.values(), decs(&["1", "4"]).as_slice());

        let mut session = session_with(&["1", "2", "3"]);
        delete_impl(&mut session, "-1").unwrap();
        assert_eq!(session.stack.values(), decs(&["1", "3"]).as_slice());
    }

    #[test]
    fn test_delete_out_of_range_leaves_no_checkpoint() {
        let mut session = session_with(&["1", "2"]);
        assert!(delete_impl(&mut session, "5").is_err());
        assert!(delete_impl(&mut session, "1-3").is_err());
        assert!(delete_impl(&mut session, "x").is_err());
        assert_eq!(session.stack.len(), 2);
        assert_eq!(session.stack.undo_len(), 0);
    }

    #[test]
    fn test_copy() {
        let mut session = session_with(&["1", "2", "3"]);
        copy_impl(&mut session, "").unwrap();
        copy_impl(&mut session, "4").unwrap();
        assert_eq!(session.stack.values(), decs(&["1", "2", "3", "3", "1"]).as_slice());
        assert!(copy_impl(&mut session, "9").is_err());
        assert_eq!(session.stack.undo_len(), 2);
    }

    #[test]
    fn test_swap() {
        let mut session = session_with(&["1", "2", "3"]);
        swap_impl(&mut session, "").unwrap();
        assert_eq!(session.stack.values(), decs(&["1", "3", "2"]).as_slice());
        swap_impl(&mut session, "1 3").unwrap();
        assert_eq!(session.stack.values(), decs(&["2", "3", "1"]).as_slice());
        assert!(swap_impl(&mut session, "1 4").is_err());
        assert!(swap_impl(&mut session, "1").is_err());
        assert_eq!(session.stack.undo_len(), 2);
    }

    #[test]
    fn test_rotation_and_reverse() {
        let mut session = session_with(&["1", "2", "3"]);
        up_impl(&mut session).unwrap();
        assert_eq!(session.stack.values(), decs(&["2", "3", "1"]).as_slice());
        down_impl(&mut session).unwrap();
        assert_eq!(session.stack.values(), decs(&["1", "2", "3"]).as_slice());
        reverse_impl(&mut session).unwrap();
        assert_eq!(session.stack.values(), decs(&["3", "2", "1"]).as_slice());
    }

    #[test]
    fn test_sort() {
        let mixed = [
            "1", "-2", "6.882", "9", "3", "2", "7", "6.881", "-1", "4", "3.9", "-1.01",
        ];
        let mut session = session_with(&mixed);
        sort_impl(&mut session, "ascending").unwrap();
        assert_eq!(session.stack.len(), 12);
        assert_eq!(session.stack.get(0).unwrap(), &dec("9"));
        assert_eq!(session.stack.get(2).unwrap(), &dec("6.882"));
        assert_eq!(session.stack.get(10).unwrap(), &dec("-1.01"));
        assert_eq!(session.stack.get(11).unwrap(), &dec("-2"));

        sort_impl(&mut session, "d").unwrap();
        assert_eq!(session.stack.get(0).unwrap(), &dec("-2"));
        assert_eq!(session.stack.get(5).unwrap(), &dec("3"));
        assert_eq!(session.stack.get(11).unwrap(), &dec("9"));
        assert_eq!(session.stack.undo_len(), 2);
        assert!(sort_impl(&mut session, "").is_err());
    }

    #[test]
    fn test_sort_needs_two_values() {
        let mut session = session_with(&["5"]);
        assert_eq!(
            sort_impl(&mut session, "a"),
            Err(CalcError::InsufficientOperands { needed: 2, found: 1 })
        );
        assert_eq!(session.stack.undo_len(), 0);
    }

    #[test]
    fn test_clear_can_be_undone() {
        let mut session = session_with(&["1", "2"]);
        clear_impl(&mut session).unwrap();
        assert!(session.stack.is_empty());
        undo_impl(&mut session, "").unwrap();
        assert_eq!(session.stack.len(), 2);
        assert_eq!(undo_impl(&mut session, ""), Err(CalcError::NoHistory));
    }

    #[test]
    fn test_load_saves_current_pair_first() {
        let mut store = MemoryStore::new();
        store
            .save_stack("taxes", StackSlot::Primary, &decs(&["100"]))
            .unwrap();
        let mut session = Session::with_parts(
            Box::new(store),
            Box::new(BufferOutput::new()),
            Settings::default(),
        );
        session.stack.push(dec("7"));
        session.stack.save_undo();

        load_impl(&mut session, "taxes").unwrap();
        assert_eq!(session.stack.name(), "taxes");
        assert_eq!(session.stack.values(), decs(&["100"]).as_slice());
        assert_eq!(session.stack.undo_len(), 0);

        load_impl(&mut session, "default").unwrap();
        assert_eq!(session.stack.values(), decs(&["7"]).as_slice());
        assert!(load_impl(&mut session, "").is_err());
    }

    #[test]
    fn test_import_and_export() {
        let mut session = session_with(&["1.5", "-2"]);
        export_impl(&mut session, "stack.txt").unwrap();
        clear_impl(&mut session).unwrap();
        import_impl(&mut session, "stack.txt").unwrap();
        assert_eq!(session.stack.values(), decs(&["1.5", "-2"]).as_slice());
        assert!(import_impl(&mut session, "missing.txt").is_err());
    }

    #[test]
    fn test_swap_stacks() {
        let mut session = session_with(&["1"]);
        session.secondary.push(dec("2"));
        swap_stacks_impl(&mut session).unwrap();
        assert_eq!(session.stack.values(), decs(&["2"]).as_slice());
        assert_eq!(session.secondary.values(), decs(&["1"]).as_slice());
    }
}
