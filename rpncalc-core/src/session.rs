// Calculator session - owns both stacks, memory slots, recording state, settings,
// and the output and store collaborators

use crate::display::{self, Alignment, MIN_WIDTH, Status};
use crate::output::{BufferOutput, MessageKind, Output};
use crate::stack::{DEFAULT_STACK_NAME, NumericStack};
use crate::store::{MemoryStore, StackSlot, Store};
use crate::value::{CalcError, Decimal, Result};
use tracing::{debug, warn};

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_MEMORY_SLOTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub width: usize,
    pub alignment: Alignment,
    pub memory_slots: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            alignment: Alignment::Left,
            memory_slots: DEFAULT_MEMORY_SLOTS,
        }
    }
}

impl Settings {
    /// Clamp out-of-range values to the nearest allowed ones.
    pub fn normalized(self) -> Self {
        Self {
            width: self.width.max(MIN_WIDTH),
            alignment: self.alignment,
            memory_slots: self.memory_slots.max(1),
        }
    }
}

pub struct Session {
    /// The active stack
    pub stack: NumericStack,
    /// The stack swapped out by `ss`
    pub secondary: NumericStack,
    pub memory: Vec<Option<Decimal>>,
    pub settings: Settings,
    active_slot: StackSlot,
    recording: Option<Vec<String>>,
    history: Vec<String>,
    pub(crate) replay_depth: usize,
    debug: bool,
    quit_requested: bool,
    output: Box<dyn Output>,
    store: Box<dyn Store>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session backed by an in-memory store that captures its output.
    pub fn new() -> Self {
        Self::with_parts(
            Box::new(MemoryStore::new()),
            Box::new(BufferOutput::new()),
            Settings::default(),
        )
    }

    pub fn with_parts(store: Box<dyn Store>, output: Box<dyn Output>, settings: Settings) -> Self {
        let settings = settings.normalized();
        Self {
            stack: NumericStack::new(DEFAULT_STACK_NAME),
            secondary: NumericStack::new(DEFAULT_STACK_NAME),
            memory: vec![None; settings.memory_slots],
            settings,
            active_slot: StackSlot::Primary,
            recording: None,
            history: Vec::new(),
            replay_depth: 0,
            debug: false,
            quit_requested: false,
            output,
            store,
        }
    }

    pub fn set_output(&mut self, output: Box<dyn Output>) {
        self.output = output;
    }

    /// Restore the named stack pair and the memory slots from the store.
    /// Failures are reported and leave the session empty.
    pub fn restore(&mut self, stack_name: &str) {
        if let Err(e) = self.load_stack_pair(stack_name) {
            self.error(&e.to_string());
        }
        match self.store.load_memory(self.settings.memory_slots) {
            Ok(slots) => self.memory = slots,
            Err(e) => self.error(&e.to_string()),
        }
    }

    /// Save both stacks and the memory slots.
    pub fn save_state(&mut self) -> Result<()> {
        let name = self.stack.name().to_string();
        self.store
            .save_stack(&name, self.active_slot, self.stack.values())?;
        self.store
            .save_stack(&name, self.active_slot.other(), self.secondary.values())?;
        self.store.save_memory(&self.memory)?;
        debug!("saved stack '{}' and {} memory slots", name, self.memory.len());
        Ok(())
    }

    pub(crate) fn load_stack_pair(&mut self, name: &str) -> Result<()> {
        let primary = self.store.load_stack(name, StackSlot::Primary)?;
        let secondary = self.store.load_stack(name, StackSlot::Secondary)?;
        self.stack = NumericStack::with_values(name, primary);
        self.secondary = NumericStack::with_values(name, secondary);
        self.active_slot = StackSlot::Primary;
        debug!(
            "loaded stack '{}' ({} + {} values)",
            name,
            self.stack.len(),
            self.secondary.len()
        );
        Ok(())
    }

    pub fn swap_stacks(&mut self) {
        std::mem::swap(&mut self.stack, &mut self.secondary);
        self.active_slot = self.active_slot.other();
    }

    pub fn active_slot(&self) -> StackSlot {
        self.active_slot
    }

    /// Run one line of input, reporting any error through the output.
    pub fn execute(&mut self, line: &str) {
        if let Err(e) = crate::evaluator::execute_line(self, line) {
            self.error(&e.to_string());
        }
    }

    /// Fail with `InsufficientOperands` unless the stack holds at least `needed` values.
    pub fn require(&self, needed: usize) -> Result<()> {
        if self.stack.len() < needed {
            Err(CalcError::InsufficientOperands {
                needed,
                found: self.stack.len(),
            })
        } else {
            Ok(())
        }
    }

    /// The top value, cloned.
    pub fn top(&self) -> Result<Decimal> {
        self.require(1)?;
        self.stack.peek().cloned().ok_or(CalcError::Underflow)
    }

    /// Checkpoint, then replace the top value.
    pub fn replace_top(&mut self, value: Decimal) -> Result<()> {
        self.require(1)?;
        self.stack.save_undo();
        self.stack.pop()?;
        self.stack.push(value);
        Ok(())
    }

    /// Checkpoint, then push.
    pub fn push_checked(&mut self, value: Decimal) {
        self.stack.save_undo();
        self.stack.push(value);
    }

    // Output helpers

    pub fn message(&mut self, kind: MessageKind, text: &str) {
        self.output.message(kind, text);
    }

    pub fn info(&mut self, text: &str) {
        self.message(MessageKind::Info, text);
    }

    pub fn result(&mut self, text: &str) {
        self.message(MessageKind::Result, text);
    }

    pub fn warn(&mut self, text: &str) {
        self.message(MessageKind::Warning, text);
    }

    pub fn error(&mut self, text: &str) {
        self.message(MessageKind::Error, text);
    }

    pub fn header(&mut self, text: &str) {
        self.message(MessageKind::Header, text);
    }

    pub fn clear_screen(&mut self) {
        self.output.clear_screen();
    }

    // Store access

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn Store {
        self.store.as_mut()
    }

    /// Steps of a saved user function. Names are case-insensitive; store failures are
    /// logged and treated as absent.
    pub fn function_steps(&mut self, name: &str) -> Option<Vec<String>> {
        match self.store.load_function(&name.to_lowercase()) {
            Ok(steps) => steps,
            Err(e) => {
                warn!("cannot read function '{}': {}", name, e);
                None
            }
        }
    }

    // Recording

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn start_recording(&mut self) {
        self.recording = Some(Vec::new());
    }

    pub fn stop_recording(&mut self) -> Option<Vec<String>> {
        self.recording.take()
    }

    pub fn record_step(&mut self, step: &str) {
        if let Some(steps) = self.recording.as_mut() {
            steps.push(step.to_lowercase());
        }
    }

    pub fn retract_last_step(&mut self) {
        if let Some(steps) = self.recording.as_mut() {
            steps.pop();
        }
    }

    pub fn recorded_steps(&self) -> &[String] {
        self.recording.as_deref().unwrap_or(&[])
    }

    // Command history

    pub fn push_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    /// Lines entered this session, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    // Memory slots

    pub fn memory_used(&self) -> usize {
        self.memory.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn resize_memory(&mut self, slots: usize) {
        let slots = slots.max(1);
        self.memory.resize(slots, None);
        self.settings.memory_slots = slots;
    }

    // Session flags

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
        self.output.set_debug(enabled);
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // Display

    pub fn status(&self) -> Status<'_> {
        Status {
            stack_name: self.stack.name(),
            stack_number: self.active_slot.number(),
            memory_used: self.memory_used(),
            undo_len: self.stack.undo_len(),
            recording: self.is_recording(),
        }
    }

    /// Status line followed by the stack rows.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![display::status_line(&self.status(), self.settings.width)];
        lines.extend(display::render_stack(
            &self.stack,
            self.settings.alignment,
            self.settings.width,
        ));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_settings_are_clamped() {
        let settings = Settings {
            width: 10,
            alignment: Alignment::Right,
            memory_slots: 0,
        }
        .normalized();
        assert_eq!(settings.width, MIN_WIDTH);
        assert_eq!(settings.memory_slots, 1);
    }

    #[test]
    fn test_require() {
        let mut session = Session::new();
        session.stack.push(dec("1"));
        assert!(session.require(1).is_ok());
        assert_eq!(
            session.require(2),
            Err(CalcError::InsufficientOperands { needed: 2, found: 1 })
        );
    }

    #[test]
    fn test_save_and_restore_round_trip() {
        let mut session = Session::new();
        session.stack.push(dec("1"));
        session.secondary.push(dec("2"));
        session.memory[3] = Some(dec("9"));
        session.save_state().unwrap();

        session.stack.clear();
        session.secondary.clear();
        session.memory = vec![None; DEFAULT_MEMORY_SLOTS];
        session.restore(DEFAULT_STACK_NAME);

        assert_eq!(session.stack.values(), &[dec("1")]);
        assert_eq!(session.secondary.values(), &[dec("2")]);
        assert_eq!(session.memory[3], Some(dec("9")));
    }

    #[test]
    fn test_swapped_stacks_save_to_their_own_slots() {
        let mut session = Session::new();
        session.stack.push(dec("1"));
        session.secondary.push(dec("2"));
        session.swap_stacks();
        assert_eq!(session.active_slot(), StackSlot::Secondary);
        session.save_state().unwrap();

        session.restore(DEFAULT_STACK_NAME);
        assert_eq!(session.stack.values(), &[dec("1")]);
        assert_eq!(session.active_slot(), StackSlot::Primary);
    }

    #[test]
    fn test_recording_lowercases_steps() {
        let mut session = Session::new();
        session.record_step("ignored");
        session.start_recording();
        session.record_step("SQRT");
        session.record_step("oops");
        session.retract_last_step();
        assert_eq!(session.recorded_steps(), &["sqrt".to_string()]);
        assert_eq!(session.stop_recording(), Some(vec!["sqrt".to_string()]));
        assert!(!session.is_recording());
    }

    #[test]
    fn test_render_includes_status_line() {
        let mut session = Session::new();
        session.stack.push(dec("1234"));
        let lines = session.render();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[default:1]"));
        assert_eq!(lines[1], "01:  1,234");
    }
}
