//! Prefix tree of the directories an upload references.

use std::collections::{BTreeSet, VecDeque};

use crate::paths::{dirname_without_dot, escapes_root, join};

/// One path segment in the directory trie.
///
/// The root node has an empty segment. Children are unique by segment and
/// kept in insertion order, which is sorted order when built through
/// [`TrieNode::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub segment: String,
    pub children: Vec<TrieNode>,
}

impl TrieNode {
    /// Create a leaf node.
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            children: Vec::new(),
        }
    }

    /// Build the trie of directories that must be checked for an upload.
    ///
    /// Every document path is joined onto `root`; the parent directories of
    /// the results are deduplicated, sorted and inserted segment by segment.
    /// Directories escaping the root and the top-level directory itself are
    /// left out.
    pub fn build<S: AsRef<str>>(root: &str, document_paths: &[S]) -> Self {
        let mut trie = TrieNode::default();
        for dir in candidate_directories(root, document_paths) {
            trie.insert(&dir);
        }
        trie
    }

    /// Insert a `/`-separated directory, reusing existing children.
    pub fn insert(&mut self, dir: &str) {
        let mut node = self;
        for segment in dir.split('/') {
            let idx = match node.children.iter().position(|c| c.segment == segment) {
                Some(idx) => idx,
                None => {
                    node.children.push(TrieNode::new(segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels below this node.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Full paths of every node below this one, level by level.
    pub fn directories(&self) -> Vec<String> {
        let mut dirs = Vec::new();
        let mut queue: VecDeque<(String, &TrieNode)> = self
            .children
            .iter()
            .map(|child| (child.segment.clone(), child))
            .collect();

        while let Some((path, node)) = queue.pop_front() {
            for child in &node.children {
                queue.push_back((format!("{path}/{}", child.segment), child));
            }
            dirs.push(path);
        }

        dirs
    }
}

/// Distinct, sorted parent directories of `root`-joined document paths.
///
/// Directories starting with `..` lie outside the repository and are
/// dropped, as is `""` (the top level needs no existence check).
pub fn candidate_directories<S: AsRef<str>>(root: &str, document_paths: &[S]) -> Vec<String> {
    let dirs: BTreeSet<String> = document_paths
        .iter()
        .map(|path| dirname_without_dot(&join(root, path.as_ref())))
        .filter(|dir| !dir.is_empty() && !escapes_root(dir))
        .collect();

    dirs.into_iter().collect()
}
