use tracing::trace;

/// Capacity reserved up front so short programs never reallocate.
const INITIAL_TAPE_CAPACITY: usize = 0x4000;

/// Growable memory of byte cells.
///
/// Always holds at least one cell. Grows one cell at a time to the right and
/// wraps to its current end on the left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tape {
    cells: Vec<u8>,
}

impl Tape {
    pub(crate) fn new() -> Self {
        let mut cells = Vec::with_capacity(INITIAL_TAPE_CAPACITY);
        cells.push(0);

        Tape { cells }
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn get(&self, index: usize) -> u8 {
        self.cells[index]
    }

    pub(crate) fn set(&mut self, index: usize, value: u8) {
        self.cells[index] = value;
    }

    /// Bring a pointer back onto the tape after a move.
    ///
    /// A negative pointer wraps around the current length, so one step left of
    /// cell 0 lands on the last cell. A pointer at or past the end grows the
    /// tape by exactly one zero cell and lands on that new cell; pointer moves
    /// are single steps, so in practice it was already one past the end.
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn normalize(&mut self, pointer: isize) -> isize {
        // A Vec never holds more than isize::MAX bytes.
        let len = self.cells.len() as isize;

        if pointer < 0 {
            return pointer.rem_euclid(len);
        }

        if pointer >= len {
            self.cells.push(0);
            trace!(len = self.cells.len(), "tape grew");
            return len;
        }

        pointer
    }
}
