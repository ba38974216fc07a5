// Persistence seam - stacks, memory slots, user functions and stack files
//
// The core never touches the filesystem. The CLI supplies a file-backed Store; tests
// and embedders can use MemoryStore.

use crate::value::{CalcError, Decimal, Result, parse_plain, parse_scientific};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Each named stack is saved as a primary/secondary pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StackSlot {
    Primary,
    Secondary,
}

impl StackSlot {
    pub fn number(self) -> u8 {
        match self {
            StackSlot::Primary => 1,
            StackSlot::Secondary => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            StackSlot::Primary => StackSlot::Secondary,
            StackSlot::Secondary => StackSlot::Primary,
        }
    }
}

pub trait Store {
    /// Load a saved stack, bottom to top. A stack that was never saved is empty.
    fn load_stack(&mut self, name: &str, slot: StackSlot) -> Result<Vec<Decimal>>;
    fn save_stack(&mut self, name: &str, slot: StackSlot, values: &[Decimal]) -> Result<()>;
    fn list_stacks(&self) -> Result<Vec<String>>;

    /// Load memory slots, padded or truncated to `slots` entries.
    fn load_memory(&mut self, slots: usize) -> Result<Vec<Option<Decimal>>>;
    fn save_memory(&mut self, slots: &[Option<Decimal>]) -> Result<()>;

    fn load_function(&self, name: &str) -> Result<Option<Vec<String>>>;
    fn save_function(&mut self, name: &str, steps: &[String]) -> Result<()>;
    /// Returns false when no function had that name.
    fn delete_function(&mut self, name: &str) -> Result<bool>;
    fn list_functions(&self) -> Result<Vec<String>>;

    /// Read a stack file: one decimal per line, bottom to top.
    fn import_stack(&self, path: &str) -> Result<Vec<Decimal>>;
    fn export_stack(&mut self, path: &str, values: &[Decimal]) -> Result<()>;
}

/// Parse the text of a stack file. Blank lines are skipped.
pub fn parse_stack_file(text: &str) -> Result<Vec<Decimal>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            let line = line.trim().replace(',', "");
            parse_plain(&line)
                .or_else(|| parse_scientific(&line))
                .ok_or_else(|| {
                    CalcError::store(format!(
                        "line {} is not a number: '{}'",
                        number + 1,
                        line
                    ))
                })
        })
        .collect()
}

pub fn format_stack_file(values: &[Decimal]) -> String {
    let mut text = String::new();
    for value in values {
        text.push_str(&value.to_plain_string());
        text.push('\n');
    }
    text
}

pub fn resize_memory(mut slots: Vec<Option<Decimal>>, len: usize) -> Vec<Option<Decimal>> {
    slots.resize(len, None);
    slots
}

/// In-memory store. Files are kept as text keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stacks: HashMap<(String, StackSlot), Vec<Decimal>>,
    memory: Vec<Option<Decimal>>,
    functions: BTreeMap<String, Vec<String>>,
    files: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: &str, contents: &str) {
        self.files.insert(path.to_string(), contents.to_string());
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|s| s.as_str())
    }
}

impl Store for MemoryStore {
    fn load_stack(&mut self, name: &str, slot: StackSlot) -> Result<Vec<Decimal>> {
        Ok(self
            .stacks
            .get(&(name.to_string(), slot))
            .cloned()
            .unwrap_or_default())
    }

    fn save_stack(&mut self, name: &str, slot: StackSlot, values: &[Decimal]) -> Result<()> {
        self.stacks.insert((name.to_string(), slot), values.to_vec());
        Ok(())
    }

    fn list_stacks(&self) -> Result<Vec<String>> {
        let names: BTreeSet<&String> = self.stacks.keys().map(|(name, _)| name).collect();
        Ok(names.into_iter().cloned().collect())
    }

    fn load_memory(&mut self, slots: usize) -> Result<Vec<Option<Decimal>>> {
        Ok(resize_memory(self.memory.clone(), slots))
    }

    fn save_memory(&mut self, slots: &[Option<Decimal>]) -> Result<()> {
        self.memory = slots.to_vec();
        Ok(())
    }

    fn load_function(&self, name: &str) -> Result<Option<Vec<String>>> {
        Ok(self.functions.get(name).cloned())
    }

    fn save_function(&mut self, name: &str, steps: &[String]) -> Result<()> {
        self.functions.insert(name.to_string(), steps.to_vec());
        Ok(())
    }

    fn delete_function(&mut self, name: &str) -> Result<bool> {
        Ok(self.functions.remove(name).is_some())
    }

    fn list_functions(&self) -> Result<Vec<String>> {
        Ok(self.functions.keys().cloned().collect())
    }

    fn import_stack(&self, path: &str) -> Result<Vec<Decimal>> {
        let text = self
            .files
            .get(path)
            .ok_or_else(|| CalcError::store(format!("cannot read '{}': no such file", path)))?;
        parse_stack_file(text)
    }

    fn export_stack(&mut self, path: &str, values: &[Decimal]) -> Result<()> {
        self.files.insert(path.to_string(), format_stack_file(values));
        Ok(())
    }
}
