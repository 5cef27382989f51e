//! Batched existence checks for the document paths of code intelligence
//! uploads.
//!
//! See [`existence::PathExistenceChecker`] for the entry point.

pub mod cli;
pub mod config;
pub mod existence;
pub mod gitserver;
pub mod logging;
pub mod paths;
pub mod trace;

pub use config::Settings;
pub use existence::{ExistenceError, PathExistenceChecker, WarmStats};
pub use gitserver::{DirectoryLookup, GitserverClient, LookupError};
