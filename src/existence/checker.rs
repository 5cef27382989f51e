//! Decides which document paths of an upload belong in the generated dump.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use super::batch::Batcher;
use super::error::{ExistenceError, ExistenceResult};
use super::trie::TrieNode;
use crate::config::Settings;
use crate::gitserver::{DirectoryLookup, GitserverClient, LookupError};
use crate::paths::{dirname_without_dot, escapes_root, file_name, join};
use crate::trace::{TraceContext, log_and_trace};

/// Lookups issued at once within a single round.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Work done by one [`PathExistenceChecker::warm_cache`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmStats {
    /// Rounds that sent at least one lookup.
    pub rounds: usize,
    /// Directory lookups sent to the git server.
    pub lookups: usize,
}

/// Determines whether a document path within an upload should be visible in
/// the generated dump.
///
/// Documents outside the root are pruned (they are never queried through this
/// dump), and so are references to paths that do not exist in the git tree at
/// the commit. Directory listings are cached so the git server is neither
/// asked for the whole tree at once nor once per unique path.
///
/// Without a lookup the checker is a pass-through: every path is assumed to
/// exist. Integration tests convert uploads this way.
pub struct PathExistenceChecker {
    repository_id: i64,
    commit: String,
    root: String,
    lookup: Option<Arc<dyn DirectoryLookup>>,
    ctx: TraceContext,
    max_concurrent_lookups: usize,
    /// Directory -> names of its immediate children.
    directory_contents: HashMap<String, HashSet<String>>,
}

impl PathExistenceChecker {
    /// Create a pass-through checker for a repository, commit and dump root.
    pub fn new(repository_id: i64, commit: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            repository_id,
            commit: commit.into(),
            root: root.into(),
            lookup: None,
            ctx: TraceContext::default(),
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            directory_contents: HashMap::new(),
        }
    }

    /// Create a checker from settings.
    ///
    /// Talks to the git server when `gitserver.frontend_url` is set and is a
    /// pass-through otherwise.
    pub fn from_settings(
        settings: &Settings,
        repository_id: i64,
        commit: impl Into<String>,
        root: impl Into<String>,
    ) -> Result<Self, LookupError> {
        let gitserver = &settings.gitserver;
        let checker = Self::new(repository_id, commit, root)
            .with_max_concurrent_lookups(gitserver.max_concurrent_lookups);

        match gitserver.frontend_url.as_deref() {
            Some(url) if !url.is_empty() => {
                let client = GitserverClient::new(url, gitserver.request_timeout())?;
                Ok(checker.with_lookup(Arc::new(client)))
            }
            _ => Ok(checker),
        }
    }

    /// Check existence through `lookup` instead of assuming it.
    pub fn with_lookup(mut self, lookup: Arc<dyn DirectoryLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_trace_context(mut self, ctx: TraceContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Bound the lookups in flight during a round (minimum 1).
    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    pub fn repository_id(&self) -> i64 {
        self.repository_id
    }

    pub fn commit(&self) -> &str {
        &self.commit
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// True when no lookup is configured and every path is assumed to exist.
    pub fn is_pass_through(&self) -> bool {
        self.lookup.is_none()
    }

    /// Directories whose listing is cached.
    pub fn cached_directories(&self) -> impl Iterator<Item = &str> {
        self.directory_contents.keys().map(String::as_str)
    }

    /// Determines if the given document path should be included in the dump.
    ///
    /// With a lookup configured the path must have been seen in its parent
    /// directory's listing during [`warm_cache`](Self::warm_cache). When
    /// `require_within_root` is set the path must also not escape the root.
    pub fn should_include_path(&self, document_path: &str, require_within_root: bool) -> bool {
        if self.lookup.is_some() {
            let path = join(&self.root, document_path);
            let known = self
                .directory_contents
                .get(&dirname_without_dot(&path))
                .is_some_and(|children| children.contains(file_name(&path)));
            if !known {
                return false;
            }
        }

        !require_within_root || !escapes_root(&join("", document_path))
    }

    /// [`should_include_path`](Self::should_include_path) requiring the path to
    /// be within the root.
    pub fn should_include(&self, document_path: &str) -> bool {
        self.should_include_path(document_path, true)
    }

    /// Warm the directory cache for a set of root-relative document paths.
    ///
    /// Directories are listed one trie level per round; a round only starts
    /// once every lookup of the previous one has finished, and directories
    /// below one with no children are never listed. Does nothing without a
    /// lookup.
    ///
    /// The first failed lookup aborts the call. Listings fetched before the
    /// failure stay cached and are not fetched again by a later call.
    pub async fn warm_cache<S: AsRef<str>>(&mut self, document_paths: &[S]) -> ExistenceResult<WarmStats> {
        let Some(lookup) = self.lookup.clone() else {
            return Ok(WarmStats::default());
        };

        let ctx = self.ctx.clone();
        log_and_trace(
            &ctx,
            "Warming git directory cache",
            self.warm_with(lookup, document_paths),
        )
        .await
    }

    async fn warm_with<S: AsRef<str>>(
        &mut self,
        lookup: Arc<dyn DirectoryLookup>,
        document_paths: &[S],
    ) -> ExistenceResult<WarmStats> {
        let anchor = root_directory(&self.root);

        // The root and the repository top level are never batched, but
        // documents sitting directly in them still need their listings.
        let parents: HashSet<String> = document_paths
            .iter()
            .map(|path| dirname_without_dot(&join(&self.root, path.as_ref())))
            .collect();
        let mut pending = Vec::new();
        for dir in [anchor.clone(), String::new()] {
            if !escapes_root(&dir)
                && !pending.contains(&dir)
                && !self.directory_contents.contains_key(&dir)
                && parents.contains(&dir)
            {
                pending.push(dir);
            }
        }

        let trie = TrieNode::build(&self.root, document_paths);
        crate::debug_event!(
            "checker",
            "trie",
            "{} directories, depth {}",
            trie.directories().len(),
            trie.depth()
        );

        let mut batcher = Batcher::anchored(trie, &anchor);
        let mut confirmed = HashSet::new();
        let mut stats = WarmStats::default();

        loop {
            let mut directories = std::mem::take(&mut pending);
            if let Some(batch) = batcher.next_batch(&confirmed) {
                directories.extend(batch);
            }
            if directories.is_empty() {
                break;
            }

            crate::debug_event!("checker", "round", "{} directories", directories.len());
            confirmed = self.check_directories(&lookup, directories, &mut stats).await?;
        }

        tracing::debug!(
            rounds = stats.rounds,
            lookups = stats.lookups,
            trie_levels = batcher.rounds(),
            "Performed {} batch requests and {} total requests to gitserver",
            stats.rounds,
            stats.lookups
        );

        Ok(stats)
    }

    /// List one round of directories, returning those that have children.
    async fn check_directories(
        &mut self,
        lookup: &Arc<dyn DirectoryLookup>,
        directories: Vec<String>,
        stats: &mut WarmStats,
    ) -> ExistenceResult<HashSet<String>> {
        let mut confirmed = HashSet::new();
        let mut missing = Vec::new();

        for dirname in directories {
            match self.directory_contents.get(&dirname) {
                Some(children) if !children.is_empty() => {
                    confirmed.insert(dirname);
                }
                Some(_) => {}
                None => missing.push(dirname),
            }
        }

        if !missing.is_empty() {
            stats.rounds += 1;
            stats.lookups += missing.len();
        }

        let repository_id = self.repository_id;
        let commit = self.commit.as_str();
        let results = stream::iter(missing)
            .map(|dirname| {
                let lookup = Arc::clone(lookup);
                async move {
                    let children = lookup.directory_children(repository_id, commit, &dirname).await;
                    (dirname, children)
                }
            })
            .buffered(self.max_concurrent_lookups);
        tokio::pin!(results);

        while let Some((dirname, children)) = results.next().await {
            let children = children.map_err(|source| ExistenceError::Lookup {
                directory: dirname.clone(),
                source,
            })?;

            let names: HashSet<String> = children.iter().filter_map(|c| child_name(c)).collect();
            if !names.is_empty() {
                confirmed.insert(dirname.clone());
            }
            self.directory_contents.insert(dirname, names);
        }

        Ok(confirmed)
    }
}

/// Cache key of the configured root: normalized, no trailing slash, `""` for
/// the repository top level.
fn root_directory(root: &str) -> String {
    let dir = join(root, "");
    let dir = dir.trim_end_matches('/');
    if dir == "." { String::new() } else { dir.to_string() }
}

/// Bare name of a listed child; `git ls-tree` reports full paths.
fn child_name(child: &str) -> Option<String> {
    let name = file_name(child);
    (!name.is_empty() && name != ".").then(|| name.to_string())
}
