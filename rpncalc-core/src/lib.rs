//! # rpncalc core
//!
//! Stack engine, command dispatcher and arbitrary-precision arithmetic for an
//! interactive Reverse Polish Notation calculator.
//!
//! The library owns everything but the terminal: a session holds a primary and
//! a secondary stack with unbounded undo history, memory slots, and recorded
//! user functions. Output goes through the [`Output`] trait and persistence
//! through the [`Store`] trait, so front ends supply their own.
//!
//! ## Features
//!
//! - **Exact arithmetic**: add, subtract, multiply and integer powers are exact;
//!   division and square roots carry 34 significant digits
//! - **Undo everything**: every mutating command checkpoints the stack first
//! - **Literal forms**: plain numbers, `1 3/16` fractions, `5%`, `2+` and `1e3`
//! - **User functions**: record a run of commands and replay it by name
//!
//! ## Example
//!
//! ```
//! use rpncalc_core::{Session, execute_line};
//!
//! let mut session = Session::new();
//! for line in ["1.23456", "4.56789", "+"] {
//!     execute_line(&mut session, line).unwrap();
//! }
//! assert_eq!(session.stack.len(), 1);
//! assert_eq!(session.stack.peek().unwrap().to_string(), "5.80245");
//! ```

// Public modules
pub mod value;
pub mod math;
pub mod units;
pub mod stack;
pub mod output;
pub mod store;
pub mod display;
pub mod parser;
pub mod builtins;
pub mod evaluator;
pub mod session;
pub mod primitives;

// Re-exports for convenience
pub use display::Alignment;
pub use evaluator::execute_line;
pub use output::{BufferOutput, MessageKind, Output};
pub use session::{Session, Settings};
pub use stack::NumericStack;
pub use store::{MemoryStore, StackSlot, Store};
pub use value::{CalcError, Decimal};
