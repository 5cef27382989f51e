//! Tree lookups against the repository's git server.
//!
//! The existence checker only needs one capability from the outside world:
//! listing the immediate children of a directory at a commit. That
//! capability is the [`DirectoryLookup`] trait so tests can substitute an
//! in-memory tree for the HTTP client.
//!
//! # Architecture
//!
//! ```text
//! PathExistenceChecker
//!   - Arc<dyn DirectoryLookup>
//!         |
//!    +----------------+
//!    |                |
//! GitserverClient  (test doubles)
//!   POST {frontend}/.internal/git/{repo}/exec
//!   git ls-tree --name-only <commit> -- <dir>/
//! ```

mod client;
mod error;

pub use client::{GitserverClient, ls_tree_args, parse_ls_tree_output};
pub use error::LookupError;

use std::collections::HashSet;

use async_trait::async_trait;

/// Lists the contents of a directory at a given commit.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Return the immediate children (files and subdirectories) of `dirname`.
    ///
    /// `dirname` is repository-relative; `""` is the repository top level.
    /// Missing and empty directories both yield an empty set.
    async fn directory_children(
        &self,
        repository_id: i64,
        commit: &str,
        dirname: &str,
    ) -> Result<HashSet<String>, LookupError>;
}
