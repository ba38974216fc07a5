//! Output trait for the calculator session
//!
//! Every command reports through an [`Output`] rather than writing to a terminal
//! directly, so the same session can drive a colored console, a test buffer, or
//! anything else that can show a line of text.

use std::cell::RefCell;
use std::rc::Rc;

/// What a message is, so the sink can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Informational chatter ("Clearing Memory Slot #2")
    Info,
    /// A computed answer that is shown rather than pushed (fractions, regressions)
    Result,
    Warning,
    Error,
    /// Section headings in listings and help
    Header,
}

pub trait Output {
    /// Show one message. May contain embedded newlines.
    fn message(&mut self, kind: MessageKind, text: &str);

    /// Clear the screen, if the sink has one.
    fn clear_screen(&mut self) {}

    /// Debug logging was switched on or off.
    fn set_debug(&mut self, _enabled: bool) {}
}

/// Shared log of captured messages.
pub type MessageLog = Rc<RefCell<Vec<(MessageKind, String)>>>;

/// Captures messages in memory. Clone the log with [`BufferOutput::log`] before handing
/// the output to a session to inspect what was written.
#[derive(Default)]
pub struct BufferOutput {
    log: MessageLog,
    clears: Rc<RefCell<usize>>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> MessageLog {
        self.log.clone()
    }

    pub fn clear_count(&self) -> Rc<RefCell<usize>> {
        self.clears.clone()
    }
}

impl Output for BufferOutput {
    fn message(&mut self, kind: MessageKind, text: &str) {
        self.log.borrow_mut().push((kind, text.to_string()));
    }

    fn clear_screen(&mut self) {
        *self.clears.borrow_mut() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_output_captures_messages() {
        let mut output = BufferOutput::new();
        let log = output.log();

        output.message(MessageKind::Info, "hello");
        output.message(MessageKind::Error, "oops");

        let messages = log.borrow();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], (MessageKind::Info, "hello".to_string()));
        assert_eq!(messages[1].0, MessageKind::Error);
    }

    #[test]
    fn test_buffer_output_counts_clears() {
        let mut output = BufferOutput::new();
        let clears = output.clear_count();
        output.clear_screen();
        output.clear_screen();
        assert_eq!(*clears.borrow(), 2);
    }
}
