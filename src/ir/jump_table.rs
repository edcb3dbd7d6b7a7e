use super::Instr;
use crate::error::Imbalance;

/// Precomputed bracket partners for a well-formed program.
///
/// Built in one pass with a stack of pending `BeginLoop` indices. Entry `i`
/// holds the index of the bracket matching instruction `i`, or `None` when
/// instruction `i` is not a bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JumpTable {
    partners: Box<[Option<usize>]>,
}

impl JumpTable {
    pub(crate) fn build(instrs: &[Instr]) -> Result<Self, Imbalance> {
        let mut partners = vec![None; instrs.len()];
        let mut open: Vec<usize> = Vec::new();

        for (index, instr) in instrs.iter().enumerate() {
            match instr {
                Instr::BeginLoop => open.push(index),
                Instr::EndLoop => {
                    let begin = open.pop().ok_or(Imbalance::UnmatchedEnd { index })?;
                    partners[begin] = Some(index);
                    partners[index] = Some(begin);
                }
                Instr::Next | Instr::Prev | Instr::Incr | Instr::Decr | Instr::Print => {}
            }
        }

        if let Some(&index) = open.last() {
            return Err(Imbalance::UnmatchedBegin {
                index,
                unclosed: open.len(),
            });
        }

        Ok(Self {
            partners: partners.into_boxed_slice(),
        })
    }

    /// Matching bracket of the instruction at `index`, if it is a bracket.
    pub(crate) fn partner(&self, index: usize) -> Option<usize> {
        self.partners.get(index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Instr::{BeginLoop as B, EndLoop as E, Incr as I};

    #[test]
    fn pairs_nested_loops() {
        let table = JumpTable::build(&[B, I, B, E, B, I, E, E]).unwrap();

        assert_eq!(table.partner(0), Some(7));
        assert_eq!(table.partner(7), Some(0));
        assert_eq!(table.partner(2), Some(3));
        assert_eq!(table.partner(3), Some(2));
        assert_eq!(table.partner(4), Some(6));
        assert_eq!(table.partner(6), Some(4));
        assert_eq!(table.partner(1), None);
        assert_eq!(table.partner(8), None);
    }

    #[test]
    fn reports_first_unmatched_end() {
        assert_eq!(
            JumpTable::build(&[B, E, E, B]),
            Err(Imbalance::UnmatchedEnd { index: 2 })
        );
    }

    #[test]
    fn reports_innermost_unclosed_begin() {
        assert_eq!(
            JumpTable::build(&[B, B, E, B, I]),
            Err(Imbalance::UnmatchedBegin {
                index: 3,
                unclosed: 2
            })
        );
    }

    #[test]
    fn empty_program_has_no_partners() {
        let table = JumpTable::build(&[]).unwrap();
        assert_eq!(table.partner(0), None);
    }
}
