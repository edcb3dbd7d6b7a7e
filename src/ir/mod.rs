mod instr;
mod jump_table;
mod program;

pub use self::instr::Instr;
pub use self::program::Program;
