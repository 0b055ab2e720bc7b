//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = SimhashError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug)]
pub enum SimhashError {
    /// Contains [`InputError`].
    Input(InputError),
}

impl fmt::Display for SimhashError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input(e) => e.fmt(f),
        }
    }
}

impl Error for SimhashError {}

impl SimhashError {
    pub(crate) fn input<S: Into<String>>(msg: S) -> Self {
        Self::Input(InputError { msg: msg.into() })
    }
}

/// Error used when the input argument is invalid.
#[derive(Debug)]
pub struct InputError {
    msg: String,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InputError: {}", self.msg)
    }
}
