//! Budgeted interpreter for a seven-instruction tape machine.
//!
//! Build a [`Program`] from [`Instr`]s, then execute it with
//! [`Interpreter::run`]. Every run is bounded by an instruction budget and
//! either completes or reports a timeout.

mod error;
pub mod ir;
pub mod runnable;
pub mod source;

pub use self::error::{Error, Imbalance, Result};
pub use self::ir::{Instr, Program};
pub use self::runnable::{Config, DEFAULT_BUDGET, Interpreter, RunOutcome};
