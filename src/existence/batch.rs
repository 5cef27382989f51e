//! Breadth-first batching over the directory trie.
//!
//! The batcher hands out one trie level at a time and is resumed with the
//! subset of that level confirmed to exist. Unconfirmed directories are
//! dropped together with their subtrees, so the number of rounds is bounded
//! by the trie depth and each round only asks about directories whose
//! parent is known to exist.
//!
//! ```text
//! round 1: [a, c]          confirmed {a}
//! round 2: [a/b, a/d]      confirmed {a/b}
//! round 3: [a/b/e]         confirmed {}
//! done
//! ```

use std::collections::HashSet;

use super::trie::TrieNode;

/// A directory about to be checked, with the subtree below it.
#[derive(Debug)]
struct FrontierEntry {
    path: String,
    node: TrieNode,
}

impl FrontierEntry {
    fn children_of(parent: String, node: TrieNode) -> impl Iterator<Item = FrontierEntry> {
        node.children.into_iter().map(move |child| FrontierEntry {
            path: if parent.is_empty() {
                child.segment.clone()
            } else {
                format!("{parent}/{}", child.segment)
            },
            node: child,
        })
    }

    fn into_children(self) -> impl Iterator<Item = FrontierEntry> {
        FrontierEntry::children_of(self.path, self.node)
    }

    /// Whether this directory is `anchor` or one of its ancestors.
    fn is_on_path_to(&self, anchor: &str) -> bool {
        anchor
            .strip_prefix(self.path.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Resumable level-by-level traversal of a [`TrieNode`].
///
/// Drive it with [`Batcher::next_batch`]: the first call yields the initial
/// frontier, every later call takes the directories of the previous batch
/// that exist and yields the next level below them. `None` means the
/// traversal is finished.
#[derive(Debug)]
pub struct Batcher {
    frontier: Vec<FrontierEntry>,
    started: bool,
    rounds: usize,
}

impl Batcher {
    /// Start at the direct children of the trie root.
    pub fn new(root: TrieNode) -> Self {
        Self {
            frontier: FrontierEntry::children_of(String::new(), root).collect(),
            started: false,
            rounds: 0,
        }
    }

    /// Start below `anchor`, which is assumed to exist.
    ///
    /// Trie nodes on the path to `anchor` (the anchor and its ancestors) are
    /// expanded in place instead of being yielded. With an empty anchor this
    /// is the same as [`Batcher::new`].
    pub fn anchored(root: TrieNode, anchor: &str) -> Self {
        let mut batcher = Self::new(root);
        if anchor.is_empty() {
            return batcher;
        }

        while let Some(pos) = batcher.frontier.iter().position(|e| e.is_on_path_to(anchor)) {
            let entry = batcher.frontier.remove(pos);
            let children: Vec<FrontierEntry> = entry.into_children().collect();
            batcher.frontier.splice(pos..pos, children);
        }

        batcher
    }

    /// Produce the next batch of directories to check.
    ///
    /// `confirmed` holds the directories of the previous batch that exist;
    /// it is ignored on the first call.
    pub fn next_batch(&mut self, confirmed: &HashSet<String>) -> Option<Vec<String>> {
        if self.started {
            let frontier = std::mem::take(&mut self.frontier);
            self.frontier = frontier
                .into_iter()
                .filter(|entry| confirmed.contains(&entry.path))
                .flat_map(FrontierEntry::into_children)
                .collect();
        }
        self.started = true;

        if self.frontier.is_empty() {
            return None;
        }

        self.rounds += 1;
        Some(self.frontier.iter().map(|entry| entry.path.clone()).collect())
    }

    /// Number of batches yielded so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_batcher<S: AsRef<str>>(root: &str, document_paths: &[S]) -> Batcher {
        Batcher::new(TrieNode::build(root, document_paths))
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Run a batcher to completion, confirming only directories in `existing`.
    fn drain(batcher: &mut Batcher, existing: &HashSet<String>) -> Vec<Vec<String>> {
        let mut batches = Vec::new();
        let mut confirmed = HashSet::new();
        while let Some(batch) = batcher.next_batch(&confirmed) {
            confirmed = batch.iter().filter(|d| existing.contains(*d)).cloned().collect();
            batches.push(batch);
        }
        batches
    }

    #[test]
    fn test_all_directories_exist() {
        let mut batcher = create_batcher("", &["a/b/x.ts", "a/c/y.ts", "d/z.ts"]);
        let batches = drain(&mut batcher, &set(&["a", "a/b", "a/c", "d"]));
        assert_eq!(
            batches,
            vec![vec!["a".to_string(), "d".to_string()], vec!["a/b".to_string(), "a/c".to_string()]]
        );
    }

    #[test]
    fn test_missing_directory_prunes_subtree() {
        let mut batcher = create_batcher("", &["a/b/c/x.ts", "d/e/y.ts"]);
        let batches = drain(&mut batcher, &set(&["a", "a/b", "a/b/c"]));

        assert_eq!(batches.len(), 3);
        let queried: Vec<String> = batches.into_iter().flatten().collect();
        assert!(queried.contains(&"d".to_string()));
        assert!(!queried.iter().any(|d| d.starts_with("d/")));
    }

    #[test]
    fn test_round_count_is_trie_depth() {
        let paths: Vec<String> = (0..1000).map(|i| format!("a/b/file_{i}.ts")).collect();
        let mut batcher = create_batcher("", &paths);
        let batches = drain(&mut batcher, &set(&["a", "a/b"]));
        assert_eq!(batches, vec![vec!["a".to_string()], vec!["a/b".to_string()]]);
        assert_eq!(batcher.rounds(), 2);
    }

    #[test]
    fn test_empty_trie_yields_nothing() {
        let mut batcher = create_batcher("", &["README.md"]);
        assert_eq!(batcher.next_batch(&HashSet::new()), None);
        assert_eq!(batcher.next_batch(&set(&["README.md"])), None);
        assert_eq!(batcher.rounds(), 0);
    }

    #[test]
    fn test_nothing_confirmed_stops_after_first_round() {
        let mut batcher = create_batcher("", &["a/b/x.ts"]);
        assert_eq!(batcher.next_batch(&HashSet::new()), Some(vec!["a".to_string()]));
        assert_eq!(batcher.next_batch(&HashSet::new()), None);
        // Stays finished
        assert_eq!(batcher.next_batch(&set(&["a"])), None);
    }

    #[test]
    fn test_first_call_ignores_confirmed() {
        let mut batcher = create_batcher("", &["a/x.ts"]);
        assert_eq!(batcher.next_batch(&set(&["zzz"])), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_anchored_skips_root_chain() {
        let trie = TrieNode::build("src", &["a/x.ts", "a/b/y.ts", "../outside.ts"]);
        let mut batcher = Batcher::anchored(trie, "src");
        let batches = drain(&mut batcher, &set(&["src/a", "src/a/b"]));
        assert_eq!(
            batches,
            vec![vec!["src/a".to_string()], vec!["src/a/b".to_string()]]
        );
    }

    #[test]
    fn test_anchored_keeps_siblings_outside_root() {
        let trie = TrieNode::build("web/app", &["x/a.ts", "../../lib/b.ts"]);
        let mut batcher = Batcher::anchored(trie, "web/app");
        assert_eq!(
            batcher.next_batch(&HashSet::new()),
            Some(vec!["lib".to_string(), "web/app/x".to_string()])
        );
    }

    #[test]
    fn test_anchored_does_not_match_prefix_siblings() {
        let trie = TrieNode::build("", &["src/a.ts", "srcgen/b.ts"]);
        let mut batcher = Batcher::anchored(trie, "src");
        // src is expanded (no subdirectories), srcgen is a sibling, not an ancestor
        assert_eq!(
            batcher.next_batch(&HashSet::new()),
            Some(vec!["srcgen".to_string()])
        );
    }
}
