use std::io;

use thiserror::Error;

use crate::reducer::Operation;

/// Everything that makes a run end without a result line.
#[derive(Error, Debug)]
pub enum ScalcError {
    /// Usage text requested with `-h`.
    #[error("{0}")]
    Help(String),

    #[error("{0}")]
    Usage(String),

    #[error("invalid number '{token}' on line {line}")]
    Parse { token: String, line: usize },

    #[error("cannot compute the {0} of an empty input")]
    EmptyInput(Operation),

    #[error(transparent)]
    Io(#[from] io::Error),
}
