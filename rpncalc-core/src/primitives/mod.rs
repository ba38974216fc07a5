// Primitives module - command handlers grouped by concern
//
// Every handler validates its inputs first, checkpoints the stack with save_undo() once,
// and only then mutates. A handler that fails leaves the stack and its history untouched.

// Stack manipulation and stack files
pub mod stack_ops;

// Arithmetic, operators and NumOps
pub mod arithmetic;

// Aggregates over the whole stack
pub mod stats;

// Trigonometry
pub mod trig;

// Fractions, percentages and units
pub mod conversions;

// Constants
pub mod constants;

// Random numbers and dice
pub mod random;

// Memory slots
pub mod memory;

// Recording and replaying user functions
pub mod functions;

// Listings
pub mod lists;

// Settings and session commands
pub mod settings;
