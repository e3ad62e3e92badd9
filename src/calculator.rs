use std::io::{BufRead, Write};

use tracing::{debug, trace};

use crate::cli::Config;
use crate::error::ScalcError;
use crate::input::Tokens;
use crate::reducer::Reducer;

#[derive(Debug)]
pub struct Calculator {
    config: Config,
}

impl Calculator {
    pub fn new(config: Config) -> Calculator {
        Calculator { config }
    }

    /// Reduces every number in `reader` and writes the formatted result to
    /// `writer`. Nothing is written unless the whole input was valid.
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<(), ScalcError> {
        let result = self.reduce(reader)?;
        writeln!(writer, "{}", format_result(result, self.config.precision))?;
        writer.flush()?;
        Ok(())
    }

    pub fn reduce<R: BufRead>(&self, reader: R) -> Result<f64, ScalcError> {
        let reducer = Reducer::new(self.config.operation, self.config.seed);
        let reducer = Tokens::new(reader).try_fold(reducer, |reducer, x| {
            let x = x?;
            trace!(value = x, "fold");
            Ok::<_, ScalcError>(reducer.fold(x))
        })?;

        debug!(
            operation = %reducer.operation(),
            count = reducer.count(),
            result = reducer.current(),
            "input exhausted"
        );
        reducer.finalize()
    }
}

/// Fixed-point rendering with exactly `precision` fractional digits.
///
/// Non-finite values are spelled the way C's `printf` spells them
/// (`inf`, `-inf`, `nan`, `-nan`) and carry no fractional digits.
pub fn format_result(value: f64, precision: u16) -> String {
    if value.is_finite() {
        return format!("{:.*}", usize::from(precision), value);
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    let name = if value.is_nan() { "nan" } else { "inf" };
    format!("{}{}", sign, name)
}
