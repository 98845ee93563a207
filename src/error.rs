use std::fmt;

use crate::config::ConfigurationError;
use crate::dispatcher::DispatchError;

/// Crate-level error for consumers that drive a whole simulation run
#[derive(Debug)]
pub enum HandoffError {
    ConfigurationError(String),
    DispatchError(String),
}

impl fmt::Display for HandoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandoffError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            HandoffError::DispatchError(msg) => write!(f, "Dispatch error: {msg}"),
        }
    }
}

impl std::error::Error for HandoffError {}

impl From<ConfigurationError> for HandoffError {
    fn from(err: ConfigurationError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

impl From<DispatchError> for HandoffError {
    fn from(err: DispatchError) -> Self {
        Self::DispatchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandoffError>;
