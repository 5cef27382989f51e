//! Error types for tree lookups.

use thiserror::Error;

/// Errors from a single directory lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Request for directory '{directory}' failed: {reason}")]
    Transport { directory: String, reason: String },

    #[error("Git server returned {status} for directory '{directory}': {body}")]
    Status {
        directory: String,
        status: u16,
        body: String,
    },

    #[error("Invalid frontend url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl LookupError {
    /// Build a transport error from a reqwest failure.
    pub(crate) fn transport(directory: &str, e: reqwest::Error) -> Self {
        LookupError::Transport {
            directory: directory.to_string(),
            reason: e.to_string(),
        }
    }
}
