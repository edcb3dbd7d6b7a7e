//! Library errors

use thiserror::Error;

/// Library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Structural fault in a program's loop brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Imbalance {
    /// An `EndLoop` appeared with no open `BeginLoop` before it.
    #[error("More ] than [ (instruction {index})")]
    UnmatchedEnd { index: usize },
    /// The program ended with `unclosed` loops still open.
    #[error("More [ than ] ({unclosed} unclosed, innermost at instruction {index})")]
    UnmatchedBegin { index: usize, unclosed: usize },
}

/// Library errors
#[derive(Debug, Error)]
pub enum Error {
    /// The program's loop brackets don't pair up, so it cannot run.
    #[error("malformed program: {0}")]
    MalformedProgram(Imbalance),

    /// An instruction index past the end of the program.
    #[error("instruction index {index} out of range for program of length {len}")]
    OutOfRange { index: usize, len: usize },
}
