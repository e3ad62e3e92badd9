mod calculator;
mod cli;
mod error;
mod input;
mod logging;
mod reducer;
mod stats;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use calculator::Calculator;
use error::ScalcError;
use tracing::debug;

const PROGRAM_NAME: &str = "scalc";

fn run(command: &str, args: &[&str]) -> Result<()> {
    let mut config = cli::parse(command, args)?;
    logging::init(config.verbose);
    debug!(?config, "starting");

    let input = config.input.take();
    let calculator = Calculator::new(config);
    let stdout = io::stdout();

    match input {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("unable to open {}", path.display()))?;
            calculator
                .run(BufReader::new(file), stdout.lock())
                .with_context(|| format!("while reading {}", path.display()))?;
        }
        None => {
            let stdin = io::stdin();
            calculator.run(stdin.lock(), stdout.lock())?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or(PROGRAM_NAME)
        .to_owned();
    let args: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    match run(&command, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ScalcError>() {
                Some(ScalcError::Help(usage)) => println!("{}", usage.trim_end()),
                Some(ScalcError::Usage(message)) => {
                    eprintln!("{}", message.trim_end());
                    eprintln!("Try '{} -h' for more information.", command);
                }
                _ => eprintln!("{}: {:#}", command, err),
            }
            ExitCode::FAILURE
        }
    }
}
