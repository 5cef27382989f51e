//! Existence checks for the document paths of an uploaded index.
//!
//! An index references far more paths than can be checked one by one, and
//! listing a whole monorepo recursively is too expensive. Instead the
//! directories the paths live in are arranged in a trie and checked one
//! level per round, skipping everything below a directory that turned out
//! not to exist.
//!
//! # Architecture
//!
//! ```text
//! PathExistenceChecker::warm_cache(paths)
//!   - TrieNode::build(root, paths)
//!   - Batcher::anchored(trie, root)
//!         |
//!   next_batch(confirmed) -> [dir, dir, ...]
//!         |
//!   DirectoryLookup::directory_children (concurrent within a round)
//!         |
//!   directory cache -> should_include_path(path)
//! ```

mod batch;
mod checker;
mod error;
mod trie;

pub use batch::Batcher;
pub use checker::{DEFAULT_MAX_CONCURRENT_LOOKUPS, PathExistenceChecker, WarmStats};
pub use error::{ExistenceError, ExistenceResult};
pub use trie::{TrieNode, candidate_directories};
