//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Rejected input (missing file part, bad extension, bad filename)
    Validation(String),
    /// Filesystem failure while handling an upload or download
    Io(String),
    /// External tool failure (tesseract invocation)
    External(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::Io(msg) => write!(f, "File error: {}", msg),
            AppError::External(msg) => write!(f, "External tool error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Internal(format!("CSV write error: {}", e))
    }
}
