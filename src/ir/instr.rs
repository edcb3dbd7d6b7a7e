use std::fmt;

/// Tape machine instruction
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum Instr {
    /// Shift the data pointer to the right.
    Next,
    /// Shift the data pointer to the left, wrapping to the end of the tape.
    Prev,
    /// Add one to the current memory cell.
    Incr,
    /// Remove one from the current memory cell.
    Decr,
    /// Emit the current memory cell as an output byte.
    Print,
    /// If the current memory cell is 0, jump past the matching `EndLoop`.
    BeginLoop,
    /// If the current memory cell is not 0, jump back to the matching `BeginLoop`.
    EndLoop,
}

impl Instr {
    /// Every instruction, in symbol order.
    pub const ALL: [Instr; 7] = [
        Instr::Next,
        Instr::Prev,
        Instr::Incr,
        Instr::Decr,
        Instr::Print,
        Instr::BeginLoop,
        Instr::EndLoop,
    ];

    /// The source character conventionally used for this instruction.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Instr::Next => '>',
            Instr::Prev => '<',
            Instr::Incr => '+',
            Instr::Decr => '-',
            Instr::Print => '.',
            Instr::BeginLoop => '[',
            Instr::EndLoop => ']',
        }
    }

    /// Inverse of [`Instr::symbol`]. Any other character is not an instruction.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '>' => Some(Instr::Next),
            '<' => Some(Instr::Prev),
            '+' => Some(Instr::Incr),
            '-' => Some(Instr::Decr),
            '.' => Some(Instr::Print),
            '[' => Some(Instr::BeginLoop),
            ']' => Some(Instr::EndLoop),
            _ => None,
        }
    }
}

/// Display Instr similar to assembly.
impl fmt::Debug for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Next => write!(f, "NEXT"),
            Instr::Prev => write!(f, "PREV"),
            Instr::Incr => write!(f, "INC"),
            Instr::Decr => write!(f, "DEC"),
            Instr::Print => write!(f, "PRINT"),
            Instr::BeginLoop => write!(f, "BEGIN"),
            Instr::EndLoop => write!(f, "END"),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_map_back_to_their_instruction() {
        for instr in Instr::ALL {
            assert_eq!(Instr::from_symbol(instr.symbol()), Some(instr));
        }
    }

    #[test]
    fn input_and_comment_characters_are_not_instructions() {
        for c in [',', ' ', '\n', 'a', '#'] {
            assert_eq!(Instr::from_symbol(c), None);
        }
    }
}
