//! Error types for CodeDarpan core.

use std::{error::Error, fmt, io};

/// Message shown to the user whenever an analysis request fails.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze repository";

/// Error type for CodeDarpan core operations.
#[derive(Debug)]
pub enum CodeDarpanError {
    /// The analysis request failed (network, status or body).
    Analysis,
    /// The certificate could not be rasterized or encoded.
    Export(String),
    /// An underlying I/O error.
    Io(io::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for CodeDarpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis => write!(f, "{ANALYSIS_FAILED_MESSAGE}"),
            Self::Export(message) => write!(f, "export error: {message}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CodeDarpanError {}

impl From<io::Error> for CodeDarpanError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Convenience result type for CodeDarpan core.
pub type Result<T> = std::result::Result<T, CodeDarpanError>;
