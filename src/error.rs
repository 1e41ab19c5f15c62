//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Usage errors abort argument resolution with exit code 1; `JobRejected` is the
//! recoverable failure of a single composer submission.
use thiserror::Error;

use crate::config::{BINARY_NAME, DEPLOY_SUBCOMMAND, SERVICES_COMMAND};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No serve URL passed.")]
    MissingServeUrl { subcommand: String },

    #[error("Both a Cloud Run URL and a Service Name was provided. Specify only one.")]
    ConflictingServiceFlags,

    #[error("Invalid privacy setting: {value}. Must be one of: {allowed}")]
    InvalidPrivacy { value: String, allowed: String },

    #[error("No compatible services found in region {region}. Please create a service first:")]
    NoCompatibleServices { region: String },

    #[error("Invalid serve URL: {url}. Must be an absolute http(s) URL")]
    InvalidServeUrl { url: String },

    #[error("Invalid region: {region}. Must be one of: {allowed}")]
    InvalidRegion { region: String, allowed: String },

    #[error("No compositions found at {serve_url}")]
    NoCompositions { serve_url: String },

    #[error("Invalid selection: {input}")]
    InvalidSelection { input: String },

    #[error("Composition '{id}' does not exist")]
    UnknownComposition { id: String },

    #[error("Service '{service_name}' not found in region {region}")]
    ServiceNotFound { service_name: String, region: String },

    #[error("Found {count} buckets with prefix {prefix} in region {region}, expected at most one")]
    AmbiguousBucket {
        count: usize,
        prefix: String,
        region: String,
    },

    #[error("Render job rejected: {0}")]
    JobRejected(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }

    /// Errors caused by how the command was invoked rather than by a collaborator.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::MissingServeUrl { .. }
                | Error::ConflictingServiceFlags
                | Error::InvalidPrivacy { .. }
                | Error::NoCompatibleServices { .. }
                | Error::InvalidServeUrl { .. }
                | Error::InvalidRegion { .. }
        )
    }

    /// Follow-up lines printed after the diagnostic.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            Error::MissingServeUrl { subcommand } => vec![
                "Pass an additional argument specifying a URL where your project is hosted."
                    .to_string(),
                String::new(),
                format!("{BINARY_NAME} {subcommand} <serve-url> <composition-id> [output-location]"),
            ],
            Error::NoCompatibleServices { .. } => vec![
                String::new(),
                format!("  {BINARY_NAME} {SERVICES_COMMAND} {DEPLOY_SUBCOMMAND}"),
            ],
            _ => Vec::new(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}
