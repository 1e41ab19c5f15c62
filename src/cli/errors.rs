use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config file not found: {path:?}")]
    ConfigNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Rendr(#[from] rendr::Error),
}

impl AppError {
    /// Lines printed after the diagnostic.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            AppError::Rendr(e) => e.remediation(),
            _ => Vec::new(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Rendr(e) => e.exit_code(),
            _ => 1,
        }
    }
}
