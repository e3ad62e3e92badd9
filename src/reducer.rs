use std::fmt;

use crate::error::ScalcError;
use crate::stats::Moments;

/// The aggregate a run reduces its input to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    Sum,
    Product,
    Min,
    Max,
    Mean,
    StdDev,
}

impl Operation {
    /// Value reported when no input has been folded in.
    pub fn initial(self) -> f64 {
        match self {
            Operation::Product => 1.,
            _ => 0.,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Sum => "sum",
            Operation::Product => "product",
            Operation::Min => "minimum",
            Operation::Max => "maximum",
            Operation::Mean => "mean",
            Operation::StdDev => "standard deviation",
        };
        f.write_str(name)
    }
}

/// Where `Min` and `Max` start folding from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seed {
    /// Fold from 0, so `Min` never exceeds 0 and `Max` never drops below it.
    #[default]
    Zero,
    /// Fold from the first value seen.
    FirstValue,
}

/// Fold state for one operation.
///
/// `result` always holds the aggregate of the values seen so far, so it can
/// be read after any prefix of the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reducer {
    operation: Operation,
    seed: Seed,
    result: f64,
    moments: Moments,
}

impl Reducer {
    pub fn new(operation: Operation, seed: Seed) -> Reducer {
        Reducer {
            operation,
            seed,
            result: operation.initial(),
            moments: Moments::new(),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn count(&self) -> u64 {
        self.moments.count()
    }

    pub fn update(&mut self, x: f64) {
        let first = self.moments.count() == 0;
        self.moments.add(x);

        self.result = match self.operation {
            Operation::Sum => self.result + x,
            Operation::Product => self.result * x,
            Operation::Min | Operation::Max if first && self.seed == Seed::FirstValue => x,
            // NaN compares false, so both take x when either side is NaN.
            Operation::Min => {
                if self.result < x {
                    self.result
                } else {
                    x
                }
            }
            Operation::Max => {
                if self.result > x {
                    self.result
                } else {
                    x
                }
            }
            Operation::Mean => self.moments.mean().unwrap_or(self.result),
            Operation::StdDev => self.moments.std_dev().unwrap_or(self.result),
        };
    }

    /// Consuming form of [`Reducer::update`].
    pub fn fold(mut self, x: f64) -> Reducer {
        self.update(x);
        self
    }

    pub fn current(&self) -> f64 {
        self.result
    }

    /// Result once the stream has ended.
    ///
    /// Operations without an identity element fail on an empty stream
    /// instead of reporting a made-up value.
    pub fn finalize(&self) -> Result<f64, ScalcError> {
        if self.moments.count() == 0 && !self.has_identity() {
            return Err(ScalcError::EmptyInput(self.operation));
        }
        Ok(self.result)
    }

    fn has_identity(&self) -> bool {
        match self.operation {
            Operation::Sum | Operation::Product => true,
            Operation::Min | Operation::Max => self.seed == Seed::Zero,
            Operation::Mean | Operation::StdDev => false,
        }
    }
}

impl Extend<f64> for Reducer {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.update(x);
        }
    }
}
