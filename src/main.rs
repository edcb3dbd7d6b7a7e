use anyhow::{Context, Result};
use docopt::Docopt;
use serde_derive::Deserialize;
use std::fs::File;
use std::io::{self, Read, Write, stdin};
use std::process::exit;
use tracing_subscriber::EnvFilter;

use tapevm::runnable::{Config, DEFAULT_BUDGET, Interpreter, RunOutcome};
use tapevm::{Program, source};

const USAGE: &str = "
Tapevm

Usage:
  tapevm [--budget=<steps>] [--partial] <program>
  tapevm --dump <program>
  tapevm (-h | --help)

Options:
  -h --help          Show this screen.
  --dump             Display the decoded instruction listing.
  --budget=<steps>   Maximum number of instructions to execute [default: 100000000].
  --partial          Print the output produced so far when the budget runs out.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_program: String,
    flag_dump: bool,
    flag_budget: Option<u64>,
    flag_partial: bool,
}

/// Exit status for a run that hit its instruction budget.
const EXIT_TIMED_OUT: i32 = 2;

fn main() {
    init_logging();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let program = read_program(&args.arg_program)
        .map(|text| source::load(&text))
        .unwrap_or_else(|e| {
            eprintln!("Error occurred while loading program: {e:#}");
            exit(1)
        });

    if args.flag_dump {
        println!("{program:?}");
        return;
    }

    let config = Config {
        partial_output_on_timeout: args.flag_partial,
    };
    let budget = args.flag_budget.unwrap_or(DEFAULT_BUDGET);

    match execute(&program, config, budget) {
        Ok(RunOutcome::Completed { .. }) => {}
        Ok(RunOutcome::TimedOut { .. }) => {
            eprintln!("Program exceeded its budget of {budget} instructions");
            exit(EXIT_TIMED_OUT);
        }
        Err(e) => {
            eprintln!("Error occurred while running program: {e:#}");
            exit(1);
        }
    }
}

/// Install a stderr subscriber so stdout carries only program output.
///
/// `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Run the program and write whatever output it reports to stdout.
fn execute(program: &Program, config: Config, budget: u64) -> Result<RunOutcome> {
    let outcome = Interpreter::new(config).run(program, budget)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(outcome.output())
        .context("Failed to write program output")?;
    stdout.flush().context("Failed to flush program output")?;

    Ok(outcome)
}

/// Read a program's source code.
///
/// When path is "-" this will read from stdin. Only the instruction symbols
/// matter, so comments need not be valid UTF-8.
fn read_program(path: &str) -> Result<String> {
    let mut buffer = Vec::new();
    let mut source: Box<dyn Read> = if path == "-" {
        Box::new(stdin())
    } else {
        Box::new(File::open(path).with_context(|| format!("Could not open file {path}"))?)
    };

    source
        .read_to_end(&mut buffer)
        .context("Could not read file")?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
