use std::io;

use thiserror::Error;
use tinted_template::{ExecError, ParseError};

/// Errors returned while compiling or running a style.
#[derive(Debug, Error)]
pub enum Error {
    /// The style text could not be parsed.
    #[error(transparent)]
    Compile(#[from] ParseError),

    /// A directive or template action failed while running.
    #[error(transparent)]
    Execution(#[from] ExecError),

    /// The data passed to a style could not be converted to template values.
    #[error("failed to serialize style data: {0}")]
    Data(#[source] serde_json::Error),

    /// Compile options could not be loaded.
    #[error("invalid style options: {0}")]
    Options(#[source] serde_yaml::Error),

    #[error("failed to write styled output: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error came from compiling the style text.
    pub fn is_compile(&self) -> bool {
        matches!(self, Error::Compile(_))
    }

    /// Whether the error came from running a compiled style.
    pub fn is_execution(&self) -> bool {
        matches!(self, Error::Execution(_))
    }
}
