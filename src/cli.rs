use std::path::PathBuf;

use argh::FromArgs;

use crate::error::ScalcError;
use crate::reducer::{Operation, Seed};

#[derive(FromArgs, Debug)]
/// Simple stream calculator. Reads numbers from FILE, or standard input when
/// FILE is absent or `-`, and prints their sum unless another operation is
/// selected. The last operation flag given wins.
struct Args {
    /// compute sum (default)
    #[argh(switch, short = 's')]
    sum: bool,

    /// compute product
    #[argh(switch, short = 'p')]
    product: bool,

    /// compute minimum
    #[argh(switch, short = 'i')]
    min: bool,

    /// compute maximum
    #[argh(switch, short = 'x')]
    max: bool,

    /// compute arithmetic mean
    #[argh(switch, short = 'a')]
    mean: bool,

    /// compute population standard deviation
    #[argh(switch, short = 't')]
    stddev: bool,

    /// number of digits after decimal point, at most 65535 (default: 0)
    #[argh(option, short = 'd', default = "0")]
    digits: u16,

    /// start minimum and maximum from the first number instead of 0
    #[argh(switch, short = 'f')]
    seed_first: bool,

    /// log debug information to standard error
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// input file
    #[argh(positional)]
    file: Option<PathBuf>,
}

/// Validated settings for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub operation: Operation,
    pub precision: u16,
    pub seed: Seed,
    /// `None` reads standard input.
    pub input: Option<PathBuf>,
    pub verbose: bool,
}

fn operation_flag(arg: &str) -> Option<Operation> {
    match arg {
        "-s" | "--sum" => Some(Operation::Sum),
        "-p" | "--product" => Some(Operation::Product),
        "-i" | "--min" => Some(Operation::Min),
        "-x" | "--max" => Some(Operation::Max),
        "-a" | "--mean" => Some(Operation::Mean),
        "-t" | "--stddev" => Some(Operation::StdDev),
        _ => None,
    }
}

/// Usage text as printed for `-h`.
pub fn usage(command: &str) -> String {
    match Args::from_args(&[command], &["--help"]) {
        Ok(_) => String::new(),
        Err(early_exit) => early_exit.output,
    }
}

/// Rewrites getopt-style short options into one flag per argument, so
/// `-ad2` reaches argh as `-a -d 2`. A bare `-` is dropped; the returned
/// flag records that one was given.
fn split_short_options(args: &[&str]) -> (Vec<String>, bool) {
    let mut split = Vec::with_capacity(args.len());
    let mut dash = false;
    let mut expects_value = false;
    let mut options_ended = false;

    for arg in args {
        if expects_value {
            expects_value = false;
            split.push((*arg).to_owned());
            continue;
        }
        if options_ended {
            if *arg == "-" {
                dash = true;
            } else {
                split.push((*arg).to_owned());
            }
            continue;
        }
        if *arg == "--" {
            options_ended = true;
            split.push((*arg).to_owned());
            continue;
        }
        if *arg == "-" {
            dash = true;
            continue;
        }
        if arg.starts_with("--") || !arg.starts_with('-') {
            split.push((*arg).to_owned());
            continue;
        }

        let flags = &arg[1..];
        for (i, flag) in flags.char_indices() {
            split.push(format!("-{}", flag));
            if flag == 'd' {
                let value = &flags[i + flag.len_utf8()..];
                if value.is_empty() {
                    expects_value = true;
                } else {
                    split.push(value.to_owned());
                }
                break;
            }
        }
    }
    (split, dash)
}

/// Parses the arguments following the program name.
pub fn parse(command: &str, args: &[&str]) -> Result<Config, ScalcError> {
    let (split, dash) = split_short_options(args);
    let args: Vec<&str> = split.iter().map(String::as_str).collect();

    // option values sit right after their flag and are never flags themselves
    let mut flags = Vec::new();
    let mut iter = args.iter().take_while(|arg| **arg != "--");
    while let Some(arg) = iter.next() {
        if *arg == "-d" || *arg == "--digits" {
            iter.next();
        } else {
            flags.push(*arg);
        }
    }

    if flags.iter().any(|arg| *arg == "-h" || *arg == "--help") {
        return Err(ScalcError::Help(usage(command)));
    }

    let parsed = Args::from_args(&[command], &args).map_err(|early_exit| match early_exit.status {
        Ok(()) => ScalcError::Help(early_exit.output),
        Err(()) => ScalcError::Usage(early_exit.output),
    })?;

    // argh only records which switches were present, order comes from argv
    let operation = flags
        .iter()
        .filter_map(|arg| operation_flag(arg))
        .last()
        .unwrap_or_default();

    Ok(Config {
        operation,
        precision: parsed.digits,
        seed: if parsed.seed_first {
            Seed::FirstValue
        } else {
            Seed::Zero
        },
        input: if dash { None } else { parsed.file },
        verbose: parsed.verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        parse("scalc", args).unwrap()
    }

    #[test]
    fn defaults() {
        assert_eq!(config(&[]), Config::default());
        assert_eq!(config(&[]).operation, Operation::Sum);
        assert_eq!(config(&[]).precision, 0);
    }

    #[test]
    fn selects_each_operation() {
        assert_eq!(config(&["-s"]).operation, Operation::Sum);
        assert_eq!(config(&["-p"]).operation, Operation::Product);
        assert_eq!(config(&["-i"]).operation, Operation::Min);
        assert_eq!(config(&["-x"]).operation, Operation::Max);
        assert_eq!(config(&["-a"]).operation, Operation::Mean);
        assert_eq!(config(&["-t"]).operation, Operation::StdDev);
        assert_eq!(config(&["--stddev"]).operation, Operation::StdDev);
    }

    #[test]
    fn last_operation_wins() {
        assert_eq!(config(&["-p", "-a"]).operation, Operation::Mean);
        assert_eq!(config(&["-a", "-d", "2", "-p"]).operation, Operation::Product);
        assert_eq!(config(&["-t", "--sum"]).operation, Operation::Sum);
    }

    #[test]
    fn digits_and_file() {
        let config = config(&["-a", "-d", "3", "numbers.txt"]);
        assert_eq!(config.precision, 3);
        assert_eq!(config.input, Some(PathBuf::from("numbers.txt")));
    }

    #[test]
    fn dash_means_stdin() {
        assert_eq!(config(&["-"]).input, None);
        assert_eq!(config(&["--", "-"]).input, None);
        let mean = config(&["-a", "-", "-d", "1"]);
        assert_eq!(mean.input, None);
        assert_eq!(mean.operation, Operation::Mean);
        assert_eq!(mean.precision, 1);
    }

    #[test]
    fn grouped_short_flags() {
        let mean = config(&["-ad", "2"]);
        assert_eq!(mean.operation, Operation::Mean);
        assert_eq!(mean.precision, 2);

        let std_dev = config(&["-tfd3"]);
        assert_eq!(std_dev.operation, Operation::StdDev);
        assert_eq!(std_dev.seed, Seed::FirstValue);
        assert_eq!(std_dev.precision, 3);

        assert_eq!(config(&["-ap"]).operation, Operation::Product);
        assert_eq!(config(&["-d2"]).precision, 2);
    }

    #[test]
    fn grouped_help() {
        assert!(matches!(parse("scalc", &["-ah"]), Err(ScalcError::Help(_))));
    }

    #[test]
    fn digits_out_of_range_rejected() {
        assert_eq!(config(&["-d", "65535"]).precision, 65535);
        assert!(matches!(parse("scalc", &["-d", "65536"]), Err(ScalcError::Usage(_))));
        assert!(matches!(parse("scalc", &["-d", "70000"]), Err(ScalcError::Usage(_))));
    }

    #[test]
    fn seed_and_verbose() {
        let config = config(&["-i", "-f", "-v"]);
        assert_eq!(config.seed, Seed::FirstValue);
        assert!(config.verbose);
    }

    #[test]
    fn negative_digits_rejected() {
        assert!(matches!(parse("scalc", &["-d", "-1"]), Err(ScalcError::Usage(_))));
        assert!(matches!(parse("scalc", &["-d", "two"]), Err(ScalcError::Usage(_))));
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(matches!(parse("scalc", &["-z"]), Err(ScalcError::Usage(_))));
    }

    #[test]
    fn help_requested() {
        match parse("scalc", &["-a", "-h"]) {
            Err(ScalcError::Help(text)) => {
                assert!(text.contains("--mean"));
                assert!(text.contains("--digits"));
            }
            other => panic!("expected help, got {:?}", other),
        }
    }
}
