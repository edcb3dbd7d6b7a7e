use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use super::Instr;
use super::jump_table::JumpTable;
use crate::error::{Error, Imbalance, Result};

/// Immutable instruction sequence.
///
/// Clones share the same storage, so a `Program` can be handed to any number
/// of concurrent runs.
#[derive(Clone, PartialEq, Eq)]
pub struct Program {
    instrs: Arc<[Instr]>,
    /// Bracket partners, or the first structural fault found while pairing.
    jumps: std::result::Result<Arc<JumpTable>, Imbalance>,
}

impl Program {
    #[must_use]
    pub fn new(instrs: Vec<Instr>) -> Self {
        let jumps = JumpTable::build(&instrs).map(Arc::new);

        Program {
            instrs: instrs.into(),
            jumps,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    #[must_use]
    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] when `index` is past the end of the program.
    pub fn operation_at(&self, index: usize) -> Result<Instr> {
        self.instrs.get(index).copied().ok_or(Error::OutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Whether every `BeginLoop` has a matching `EndLoop` after it and vice versa.
    ///
    /// Only programs for which this holds can be executed.
    #[must_use]
    pub fn brackets_match(&self) -> bool {
        self.jumps.is_ok()
    }

    /// The first bracket fault in the program, if any.
    #[must_use]
    pub fn imbalance(&self) -> Option<Imbalance> {
        self.jumps.as_ref().err().copied()
    }

    /// Fail with [`Error::MalformedProgram`] unless the brackets match.
    ///
    /// # Errors
    ///
    /// Returns the structural fault that makes the program unrunnable.
    pub fn validate(&self) -> Result<()> {
        match &self.jumps {
            Ok(_) => Ok(()),
            Err(imbalance) => Err(Error::MalformedProgram(*imbalance)),
        }
    }

    /// Index of the `EndLoop` closing the loop opened at `begin`.
    ///
    /// Scans forward counting nesting depth, so inner loops are skipped.
    ///
    /// # Panics
    ///
    /// Panics if the brackets don't match or `begin` is not a `BeginLoop`.
    #[must_use]
    pub fn find_loop_end(&self, begin: usize) -> usize {
        self.assert_bracket(begin, Instr::BeginLoop);

        let mut depth: usize = 1;
        for (index, instr) in self.instrs.iter().enumerate().skip(begin + 1) {
            match instr {
                Instr::BeginLoop => depth += 1,
                Instr::EndLoop => depth -= 1,
                _ => {}
            }

            if depth == 0 {
                return index;
            }
        }

        panic!("no EndLoop closes the loop at instruction {begin}");
    }

    /// Index of the `BeginLoop` opening the loop closed at `end`.
    ///
    /// # Panics
    ///
    /// Panics if the brackets don't match or `end` is not an `EndLoop`.
    #[must_use]
    pub fn find_loop_start(&self, end: usize) -> usize {
        self.assert_bracket(end, Instr::EndLoop);

        let mut depth: usize = 1;
        for (index, instr) in self.instrs[..end].iter().enumerate().rev() {
            match instr {
                Instr::EndLoop => depth += 1,
                Instr::BeginLoop => depth -= 1,
                _ => {}
            }

            if depth == 0 {
                return index;
            }
        }

        panic!("no BeginLoop opens the loop at instruction {end}");
    }

    /// Matching bracket of the `BeginLoop` or `EndLoop` at `index`, from the
    /// table built at construction.
    ///
    /// Agrees with [`Program::find_loop_end`] and [`Program::find_loop_start`].
    ///
    /// # Panics
    ///
    /// Panics if the brackets don't match or `index` is not a bracket.
    #[must_use]
    pub fn jump_target(&self, index: usize) -> usize {
        let Ok(jumps) = &self.jumps else {
            panic!("jump requested on a program with unmatched brackets");
        };

        jumps
            .partner(index)
            .unwrap_or_else(|| panic!("instruction {index} is not a loop bracket"))
    }

    fn assert_bracket(&self, index: usize, expected: Instr) {
        assert!(
            self.brackets_match(),
            "loop search on a program with unmatched brackets"
        );

        let found = self.instrs.get(index);
        assert!(
            found == Some(&expected),
            "expected {expected:?} at instruction {index}, found {found:?}"
        );
    }
}

impl From<Vec<Instr>> for Program {
    fn from(instrs: Vec<Instr>) -> Self {
        Program::new(instrs)
    }
}

impl FromIterator<Instr> for Program {
    fn from_iter<I: IntoIterator<Item = Instr>>(iter: I) -> Self {
        Program::new(iter.into_iter().collect())
    }
}

impl Index<usize> for Program {
    type Output = Instr;

    fn index(&self, index: usize) -> &Instr {
        &self.instrs[index]
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Addr\tInstr\tOperands")?;

        for (pos, instr) in self.instrs.iter().enumerate() {
            match self.jumps.as_ref().ok().and_then(|j| j.partner(pos)) {
                Some(target) => writeln!(f, "0x{pos:04X}\t{instr:?}\t0x{target:04X}")?,
                None => writeln!(f, "0x{pos:04X}\t{instr:?}")?,
            }
        }

        if let Some(imbalance) = self.imbalance() {
            writeln!(f, "; {imbalance}")?;
        }

        writeln!(f)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_instr() -> impl Strategy<Value = Instr> {
        prop::sample::select(Instr::ALL.to_vec())
    }

    /// Drop stray `EndLoop`s and close whatever is left open.
    fn balance(raw: Vec<Instr>) -> Vec<Instr> {
        let mut depth = 0usize;
        let mut out = Vec::with_capacity(raw.len());

        for instr in raw {
            match instr {
                Instr::BeginLoop => depth += 1,
                Instr::EndLoop if depth == 0 => continue,
                Instr::EndLoop => depth -= 1,
                _ => {}
            }
            out.push(instr);
        }

        out.extend(std::iter::repeat_n(Instr::EndLoop, depth));
        out
    }

    /// Counter definition of bracket balance.
    fn counter_balanced(instrs: &[Instr]) -> bool {
        let mut count: i64 = 0;
        for instr in instrs {
            match instr {
                Instr::BeginLoop => count += 1,
                Instr::EndLoop => count -= 1,
                _ => {}
            }
            if count < 0 {
                return false;
            }
        }
        count == 0
    }

    proptest! {
        #[test]
        fn brackets_match_agrees_with_counter(raw in prop::collection::vec(any_instr(), 0..64)) {
            let program = Program::new(raw.clone());
            prop_assert_eq!(program.brackets_match(), counter_balanced(&raw));
            prop_assert_eq!(program.imbalance().is_none(), program.brackets_match());
        }

        #[test]
        fn balanced_programs_always_match(raw in prop::collection::vec(any_instr(), 0..128)) {
            prop_assert!(Program::new(balance(raw)).brackets_match());
        }

        #[test]
        fn finders_are_mutual_inverses(raw in prop::collection::vec(any_instr(), 0..128)) {
            let program = Program::new(balance(raw));

            for (index, instr) in program.instrs().iter().enumerate() {
                match instr {
                    Instr::BeginLoop => {
                        let end = program.find_loop_end(index);
                        prop_assert!(end > index);
                        prop_assert_eq!(program[end], Instr::EndLoop);
                        prop_assert!(counter_balanced(&program.instrs()[index + 1..end]));
                        prop_assert_eq!(program.find_loop_start(end), index);
                        prop_assert_eq!(program.jump_target(index), end);
                    }
                    Instr::EndLoop => {
                        let begin = program.find_loop_start(index);
                        prop_assert_eq!(program.find_loop_end(begin), index);
                        prop_assert_eq!(program.jump_target(index), begin);
                    }
                    _ => {}
                }
            }
        }
    }
}
