mod interpreter;
mod tape;

pub use self::interpreter::{Interpreter, RunOutcome};

/// Instruction budget used by the command line when none is given.
pub const DEFAULT_BUDGET: u64 = 100_000_000;

/// Interpreter settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Keep the output produced so far when a run exhausts its budget.
    ///
    /// Off by default: a timed out run reports empty output.
    pub partial_output_on_timeout: bool,
}
