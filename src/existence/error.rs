//! Error types for cache warming.

use thiserror::Error;

use crate::gitserver::LookupError;

/// Errors from [`PathExistenceChecker::warm_cache`](super::PathExistenceChecker::warm_cache).
///
/// A failed warm-up leaves the cache partially populated; existence
/// answers for the upload should not be trusted afterwards.
#[derive(Error, Debug)]
pub enum ExistenceError {
    #[error("Failed to list directory '{directory}'")]
    Lookup {
        directory: String,
        #[source]
        source: LookupError,
    },
}

pub type ExistenceResult<T> = Result<T, ExistenceError>;
