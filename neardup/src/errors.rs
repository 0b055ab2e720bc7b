//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = NearDupError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug)]
pub enum NearDupError {
    /// Contains [`InputError`].
    Input(InputError),
    /// Contains [`simhash::SimhashError`].
    Simhash(simhash::SimhashError),
}

impl fmt::Display for NearDupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input(e) => e.fmt(f),
            Self::Simhash(e) => e.fmt(f),
        }
    }
}

impl Error for NearDupError {}

impl From<simhash::SimhashError> for NearDupError {
    fn from(e: simhash::SimhashError) -> Self {
        Self::Simhash(e)
    }
}

impl NearDupError {
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
