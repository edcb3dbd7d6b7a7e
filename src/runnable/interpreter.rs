use tracing::{debug, instrument, warn};

use super::Config;
use super::tape::Tape;
use crate::error::Result;
use crate::ir::{Instr, Program};

/// Result of a run that was allowed to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program counter ran off the end of the program.
    Completed { output: Vec<u8>, steps: u64 },
    /// The instruction budget ran out first. `output` is empty unless
    /// [`Config::partial_output_on_timeout`] is set.
    TimedOut { output: Vec<u8>, steps: u64 },
}

impl RunOutcome {
    #[must_use]
    pub fn output(&self) -> &[u8] {
        match self {
            RunOutcome::Completed { output, .. } | RunOutcome::TimedOut { output, .. } => output,
        }
    }

    #[must_use]
    pub fn into_output(self) -> Vec<u8> {
        match self {
            RunOutcome::Completed { output, .. } | RunOutcome::TimedOut { output, .. } => output,
        }
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        matches!(self, RunOutcome::TimedOut { .. })
    }

    /// Number of instructions executed.
    #[must_use]
    pub fn steps(&self) -> u64 {
        match self {
            RunOutcome::Completed { steps, .. } | RunOutcome::TimedOut { steps, .. } => *steps,
        }
    }
}

/// Tape machine interpreter.
///
/// Holds no run state, so one interpreter can serve any number of runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter {
    config: Config,
}

impl Interpreter {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run `program` on a fresh tape, executing at most `budget + 1`
    /// instructions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedProgram`] without executing anything
    /// when the program's brackets don't match.
    #[instrument(skip_all, fields(instrs = program.len(), budget = budget))]
    pub fn run(&self, program: &Program, budget: u64) -> Result<RunOutcome> {
        if let Err(error) = program.validate() {
            debug!(%error, "refusing to run");
            return Err(error);
        }

        let mut machine = Machine::new(program);

        while !machine.halted() {
            if machine.steps > budget {
                let output = if self.config.partial_output_on_timeout {
                    machine.output
                } else {
                    Vec::new()
                };

                warn!(
                    steps = machine.steps,
                    partial = self.config.partial_output_on_timeout,
                    "instruction budget exhausted"
                );
                return Ok(RunOutcome::TimedOut {
                    output,
                    steps: machine.steps,
                });
            }

            machine.step();
        }

        debug!(
            steps = machine.steps,
            output_len = machine.output.len(),
            tape_len = machine.tape.len(),
            "program completed"
        );
        Ok(RunOutcome::Completed {
            output: machine.output,
            steps: machine.steps,
        })
    }
}

/// State of a single run.
struct Machine<'a> {
    program: &'a Program,
    tape: Tape,
    output: Vec<u8>,
    /// Program counter
    pc: usize,
    /// Data pointer, before wrapping
    dp: isize,
    /// Instructions executed so far
    steps: u64,
}

impl<'a> Machine<'a> {
    fn new(program: &'a Program) -> Self {
        Machine {
            program,
            tape: Tape::new(),
            output: Vec::new(),
            pc: 0,
            dp: 0,
            steps: 0,
        }
    }

    fn halted(&self) -> bool {
        self.pc >= self.program.len()
    }

    #[allow(clippy::cast_sign_loss)]
    fn cell(&self) -> usize {
        // normalize() keeps dp within the tape between steps.
        self.dp as usize
    }

    /// Execute the instruction at the program counter.
    fn step(&mut self) {
        let current = self.tape.get(self.cell());

        match self.program[self.pc] {
            Instr::Next => {
                self.dp += 1;
            }
            Instr::Prev => {
                self.dp -= 1;
            }
            Instr::Incr => {
                self.tape.set(self.cell(), current.wrapping_add(1));
            }
            Instr::Decr => {
                self.tape.set(self.cell(), current.wrapping_sub(1));
            }
            Instr::Print => {
                self.output.push(current);
            }
            Instr::BeginLoop => {
                if current == 0 {
                    self.pc = self.program.jump_target(self.pc);
                }
            }
            Instr::EndLoop => {
                if current != 0 {
                    self.pc = self.program.jump_target(self.pc);
                }
            }
        }

        self.dp = self.tape.normalize(self.dp);
        self.pc += 1;
        self.steps += 1;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn balanced_program() -> impl Strategy<Value = Program> {
        prop::collection::vec(prop::sample::select(Instr::ALL.to_vec()), 0..96).prop_map(|raw| {
            let mut depth = 0usize;
            let mut instrs: Vec<Instr> = raw
                .into_iter()
                .filter(|instr| match instr {
                    Instr::BeginLoop => {
                        depth += 1;
                        true
                    }
                    Instr::EndLoop if depth == 0 => false,
                    Instr::EndLoop => {
                        depth -= 1;
                        true
                    }
                    _ => true,
                })
                .collect();
            instrs.extend(std::iter::repeat_n(Instr::EndLoop, depth));
            Program::new(instrs)
        })
    }

    proptest! {
        #[test]
        fn random_programs_respect_budget(program in balanced_program(), budget in 0u64..2000) {
            let outcome = Interpreter::default().run(&program, budget).unwrap();
            prop_assert!(outcome.steps() <= budget + 1);
            if outcome.timed_out() {
                prop_assert!(outcome.output().is_empty());
            }
        }

        #[test]
        fn partial_output_is_a_prefix(program in balanced_program(), budget in 0u64..500) {
            let partial = Interpreter::new(Config { partial_output_on_timeout: true })
                .run(&program, budget)
                .unwrap();
            let full = Interpreter::new(Config { partial_output_on_timeout: true })
                .run(&program, 20_000)
                .unwrap();

            prop_assert!(full.output().starts_with(partial.output()) || full.timed_out());
        }
    }
}
