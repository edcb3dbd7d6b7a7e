//! Source text decoding for the command line front end.
//!
//! One character per instruction. Everything that is not one of `> < + - . [ ]`
//! is a comment, including `,` since the machine has no input instruction.

use crate::ir::{Instr, Program};

/// Decode source text into instructions, skipping comments.
#[must_use]
pub fn decode(source: &str) -> Vec<Instr> {
    source.chars().filter_map(Instr::from_symbol).collect()
}

/// Decode source text straight into a [`Program`].
///
/// The result may still have unmatched brackets; check
/// [`Program::brackets_match`] before running it.
#[must_use]
pub fn load(source: &str) -> Program {
    Program::new(decode(source))
}
