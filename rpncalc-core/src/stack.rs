// Numeric stack - ordered decimals with a snapshot undo history
//
// Index 0 is the bottom of the stack. Users address values by line number, where line 1
// is the top, so `line` and `index` conversions happen here and nowhere else.

use crate::value::{CalcError, Decimal, Result};

pub const DEFAULT_STACK_NAME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericStack {
    name: String,
    values: Vec<Decimal>,
    undo: Vec<Vec<Decimal>>,
}

impl Default for NumericStack {
    fn default() -> Self {
        Self::new(DEFAULT_STACK_NAME)
    }
}

impl NumericStack {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
            undo: Vec::new(),
        }
    }

    pub fn with_values(name: &str, values: Vec<Decimal>) -> Self {
        Self {
            name: name.to_string(),
            values,
            undo: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn push(&mut self, value: Decimal) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Result<Decimal> {
        self.values.pop().ok_or(CalcError::Underflow)
    }

    pub fn peek(&self) -> Option<&Decimal> {
        self.values.last()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a 0-based index counted from the bottom.
    pub fn get(&self, index: usize) -> Result<&Decimal> {
        self.values.get(index).ok_or_else(|| {
            CalcError::out_of_range(format!(
                "index {} is outside a stack of {} item(s)",
                index,
                self.values.len()
            ))
        })
    }

    /// Convert a 1-based line number (line 1 = top) into a bottom-based index.
    pub fn line_to_index(&self, line: usize) -> Result<usize> {
        if line == 0 || line > self.values.len() {
            return Err(CalcError::out_of_range(format!(
                "line number must be between 1 and {}",
                self.values.len()
            )));
        }
        Ok(self.values.len() - line)
    }

    pub fn get_line(&self, line: usize) -> Result<&Decimal> {
        let index = self.line_to_index(line)?;
        self.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Result<Decimal> {
        if index >= self.values.len() {
            return Err(CalcError::out_of_range(format!(
                "index {} is outside a stack of {} item(s)",
                index,
                self.values.len()
            )));
        }
        Ok(self.values.remove(index))
    }

    pub fn insert(&mut self, index: usize, value: Decimal) -> Result<()> {
        if index > self.values.len() {
            return Err(CalcError::out_of_range(format!(
                "cannot insert at index {} in a stack of {} item(s)",
                index,
                self.values.len()
            )));
        }
        self.values.insert(index, value);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Bottom-to-top iteration.
    pub fn iter(&self) -> std::slice::Iter<'_, Decimal> {
        self.values.iter()
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn replace(&mut self, values: Vec<Decimal>) {
        self.values = values;
    }

    pub fn reverse(&mut self) {
        self.values.reverse();
    }

    /// Stable sort by numeric value. Ascending reads upward from the top line, so the
    /// smallest value ends on top and the largest at the bottom.
    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::Ascending => self.values.sort_by(|a, b| b.cmp(a)),
            SortOrder::Descending => self.values.sort(),
        }
    }

    pub fn swap_lines(&mut self, first: usize, second: usize) -> Result<()> {
        let a = self.line_to_index(first)?;
        let b = self.line_to_index(second)?;
        self.values.swap(a, b);
        Ok(())
    }

    // Undo history

    pub fn save_undo(&mut self) {
        self.undo.push(self.values.clone());
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn undo_get(&self, index: usize) -> Option<&[Decimal]> {
        self.undo.get(index).map(|snapshot| snapshot.as_slice())
    }

    pub fn undo_remove(&mut self, index: usize) -> Option<Vec<Decimal>> {
        if index < self.undo.len() {
            Some(self.undo.remove(index))
        } else {
            None
        }
    }

    pub fn clear_undo(&mut self) {
        self.undo.clear();
    }

    /// Restore the checkpoint at 1-based `line` (oldest = 1), discarding it and every
    /// newer checkpoint. `None` restores the newest checkpoint.
    pub fn undo(&mut self, line: Option<usize>) -> Result<()> {
        if self.undo.is_empty() {
            return Err(CalcError::NoHistory);
        }
        let line = line.unwrap_or(self.undo.len());
        if line == 0 || line > self.undo.len() {
            return Err(CalcError::out_of_range(format!(
                "undo line must be between 1 and {}",
                self.undo.len()
            )));
        }
        self.values = self.undo[line - 1].clone();
        self.undo.truncate(line - 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn stack_of(values: &[&str]) -> NumericStack {
        NumericStack::with_values("test", values.iter().map(|s| dec(s)).collect())
    }

    #[test]
    fn test_push_pop() {
        let mut stack = NumericStack::default();
        assert_eq!(stack.name(), DEFAULT_STACK_NAME);
        stack.push(dec("1"));
        stack.push(dec("2"));
        assert_eq!(stack.peek(), Some(&dec("2")));
        assert_eq!(stack.pop().unwrap(), dec("2"));
        assert_eq!(stack.pop().unwrap(), dec("1"));
        assert_eq!(stack.pop(), Err(CalcError::Underflow));
    }

    #[test]
    fn test_line_numbers_count_from_top() {
        let stack = stack_of(&["10", "20", "30"]);
        assert_eq!(stack.get_line(1).unwrap(), &dec("30"));
        assert_eq!(stack.get_line(3).unwrap(), &dec("10"));
        assert!(stack.get_line(0).is_err());
        assert!(stack.get_line(4).is_err());
    }

    #[test]
    fn test_sort_and_swap() {
        let mut stack = stack_of(&["3", "1", "2"]);
        stack.sort(SortOrder::Ascending);
        assert_eq!(stack.values(), &[dec("3"), dec("2"), dec("1")]);
        stack.sort(SortOrder::Descending);
        assert_eq!(stack.values(), &[dec("1"), dec("2"), dec("3")]);
        stack.swap_lines(1, 3).unwrap();
        assert_eq!(stack.values(), &[dec("3"), dec("2"), dec("1")]);
    }

    #[test]
    fn test_insert_and_remove_bounds() {
        let mut stack = stack_of(&["1"]);
        stack.insert(0, dec("0")).unwrap();
        stack.insert(2, dec("2")).unwrap();
        assert!(stack.insert(5, dec("9")).is_err());
        assert_eq!(stack.remove(1).unwrap(), dec("1"));
        assert!(stack.remove(7).is_err());
        assert_eq!(stack.values(), &[dec("0"), dec("2")]);
    }

    #[test]
    fn test_undo_restores_newest_checkpoint() {
        let mut stack = stack_of(&["1"]);
        stack.save_undo();
        stack.push(dec("2"));
        stack.save_undo();
        stack.push(dec("3"));

        stack.undo(None).unwrap();
        assert_eq!(stack.values(), &[dec("1"), dec("2")]);
        assert_eq!(stack.undo_len(), 1);

        stack.undo(None).unwrap();
        assert_eq!(stack.values(), &[dec("1")]);
        assert_eq!(stack.undo(None), Err(CalcError::NoHistory));
    }

    #[test]
    fn test_undo_to_specific_line() {
        let mut stack = stack_of(&[]);
        for v in ["1", "2", "3"] {
            stack.save_undo();
            stack.push(dec(v));
        }
        assert_eq!(stack.undo_len(), 3);
        assert!(stack.undo(Some(4)).is_err());
        stack.undo(Some(2)).unwrap();
        assert_eq!(stack.values(), &[dec("1")]);
        assert_eq!(stack.undo_len(), 1);
        assert_eq!(stack.undo_get(0), Some(&[][..]));
    }
}
