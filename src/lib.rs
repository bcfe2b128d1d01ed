//! # scapegoat-rs
//!
//! An ordered set kept approximately balanced by a scapegoat tree: instead of
//! rotating on every update, an insertion that lands too deep rebuilds one
//! ancestor subtree (the scapegoat) into a perfectly balanced shape, and a
//! tree that has shrunk too far below its high-water mark is rebuilt whole.
//!
//! Nodes carry subtree sizes, which gives `O(log n)` order-statistics
//! queries. On top of the set operations the tree offers merge, split,
//! content equality and a linear undo/redo history.
//!
//! Based on "Scapegoat Trees" (SODA 1993, Galperin and Rivest).
//!
//! ## Example
//!
//! ```rust
//! use scapegoat_rs::ScapegoatTree;
//!
//! let mut tree: ScapegoatTree<i64> = ScapegoatTree::with_alpha(0.66).unwrap();
//! tree.insert_batch([5, 3, 8, 1, 4, 7, 9]);
//!
//! assert_eq!(tree.inorder(), vec![1, 3, 4, 5, 7, 8, 9]);
//! assert_eq!(tree.kth_smallest(3), Ok(&4));
//! assert_eq!(tree.successor(&5), Ok(&7));
//! assert_eq!(tree.sum_in_range(&3, &8), Ok(27));
//!
//! tree.remove(&5);
//! assert!(tree.undo());
//! assert!(tree.contains(&5));
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::{debug, trace};

mod config;
mod error;
mod history;
mod node;
mod query;
mod setops;
mod traverse;

pub use config::{TreeConfig, DEFAULT_ALPHA};
pub use error::{Result, TreeError};
pub use history::Entry;
pub use node::NodeRef;
pub use traverse::{BalanceReport, Iter};

use history::History;
use node::{Link, Node};

/// Outcome of one recursive insertion step, reported to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Climb {
    /// The key was already present; nothing changed.
    Duplicate,
    /// Inserted, and no rebuild is pending.
    Settled,
    /// Inserted too deep; still looking for a scapegoat.
    Unbalanced,
}

/// Parameters fixed for the duration of a single insertion.
struct InsertPolicy {
    alpha: f64,
    /// Deepest depth (root = 0) a new leaf may land at without a rebuild.
    depth_limit: f64,
}

/// An ordered set of unique keys balanced by partial rebuilding.
///
/// Only the depth bound `log(max_len) / log(1/alpha)` is restored after each
/// update. Per-node weight balance (`size(child) <= alpha * size(node)`) is
/// not maintained between rebuilds: inserting `1, 2, 3` with alpha 0.66
/// leaves a three-node chain, because no leaf has landed deep enough to
/// trigger a rebuild yet.
///
/// Single-threaded: every operation runs to completion. Wrap the tree in a
/// lock for shared mutation.
#[derive(Clone)]
pub struct ScapegoatTree<K> {
    root: Link<K>,
    len: usize,
    /// High-water mark of `len` since the whole tree was last rebuilt.
    max_len: usize,
    config: TreeConfig,
    history: History<K>,
}

impl<K> ScapegoatTree<K> {
    pub fn new() -> Self {
        Self::from_parts(None, 0, TreeConfig::default())
    }

    pub(crate) fn from_parts(root: Link<K>, len: usize, config: TreeConfig) -> Self {
        debug_assert_eq!(node::size(&root), len);
        Self {
            root,
            len,
            max_len: len,
            history: History::new(config.history_limit),
            config,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    #[inline]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Levels on the longest root-to-leaf path; `0` when empty.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Handle to the root node for read-only inspection.
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.as_deref().map(NodeRef::new)
    }

    /// Changes the balance factor for future rebuild decisions. The current
    /// shape is left alone; out-of-range values are rejected.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
        config::check_alpha(alpha)?;
        debug!(old = self.config.alpha, new = alpha, "alpha changed");
        self.config.alpha = alpha;
        Ok(())
    }

    /// Removes every key and discards the undo/redo history.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.max_len = 0;
        self.history.clear();
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undoable entries, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Entry<K>> {
        self.history.entries()
    }

    fn rebuild_all(&mut self) {
        debug!(
            len = self.len,
            max_len = self.max_len,
            alpha = self.config.alpha,
            "rebuilding whole tree"
        );
        self.root = node::rebuild(self.root.take());
        self.max_len = self.len;
    }
}

impl<K: Ord> ScapegoatTree<K> {
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(None, 0, config))
    }

    pub fn with_alpha(alpha: f64) -> Result<Self> {
        Self::with_config(TreeConfig::default().with_alpha(alpha))
    }

    pub fn contains(&self, key: &K) -> bool {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Inserts without touching the history.
    fn insert_key(&mut self, key: K) -> bool {
        let alpha = self.config.alpha;
        let grown = self.max_len.max(self.len + 1);
        let policy = InsertPolicy {
            alpha,
            depth_limit: (grown as f64).ln() / (1.0 / alpha).ln(),
        };

        let (root, climb) = Self::insert_node(self.root.take(), key, 0, &policy);
        self.root = root;
        if climb == Climb::Duplicate {
            return false;
        }

        self.len += 1;
        self.max_len = self.max_len.max(self.len);
        if climb == Climb::Unbalanced {
            // Only reachable through float rounding or a tightened alpha.
            self.rebuild_all();
        }
        debug_assert_eq!(node::size(&self.root), self.len);
        true
    }

    fn insert_node(link: Link<K>, key: K, depth: usize, policy: &InsertPolicy) -> (Link<K>, Climb) {
        let Some(mut node) = link else {
            let climb = if depth as f64 > policy.depth_limit {
                Climb::Unbalanced
            } else {
                Climb::Settled
            };
            return (Some(Node::leaf(key)), climb);
        };

        let (climb, child_size) = match key.cmp(&node.value) {
            Ordering::Equal => return (Some(node), Climb::Duplicate),
            Ordering::Less => {
                let (child, climb) = Self::insert_node(node.left.take(), key, depth + 1, policy);
                node.left = child;
                (climb, node::size(&node.left))
            }
            Ordering::Greater => {
                let (child, climb) = Self::insert_node(node.right.take(), key, depth + 1, policy);
                node.right = child;
                (climb, node::size(&node.right))
            }
        };

        match climb {
            Climb::Duplicate => (Some(node), Climb::Duplicate),
            Climb::Settled => {
                node.size += 1;
                (Some(node), Climb::Settled)
            }
            Climb::Unbalanced => {
                node.size += 1;
                if child_size as f64 > policy.alpha * node.size as f64 {
                    debug!(size = node.size, depth, "rebuilding scapegoat subtree");
                    (node::rebuild(Some(node)), Climb::Settled)
                } else {
                    (Some(node), Climb::Unbalanced)
                }
            }
        }
    }

    /// Removes without touching the history. Returns the stored key.
    fn remove_key(&mut self, key: &K) -> Option<K> {
        let (root, removed) = Self::remove_node(self.root.take(), key);
        self.root = root;
        let removed = removed?;

        self.len -= 1;
        if self.len as f64 <= self.config.alpha * self.max_len as f64 {
            self.rebuild_all();
        }
        debug_assert_eq!(node::size(&self.root), self.len);
        Some(removed)
    }

    fn remove_node(link: Link<K>, key: &K) -> (Link<K>, Option<K>) {
        let Some(mut node) = link else {
            return (None, None);
        };

        match key.cmp(&node.value) {
            Ordering::Less => {
                let (left, removed) = Self::remove_node(node.left.take(), key);
                node.left = left;
                if removed.is_some() {
                    node.size -= 1;
                }
                (Some(node), removed)
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove_node(node.right.take(), key);
                node.right = right;
                if removed.is_some() {
                    node.size -= 1;
                }
                (Some(node), removed)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => (None, Some(node.value)),
                (Some(child), None) | (None, Some(child)) => (Some(child), Some(node.value)),
                (Some(left), Some(right)) => {
                    let (rest, successor) = Self::pop_min(right);
                    let removed = std::mem::replace(&mut node.value, successor);
                    node.left = Some(left);
                    node.right = rest;
                    node.recalc();
                    (Some(node), Some(removed))
                }
            },
        }
    }

    fn pop_min(mut node: Box<Node<K>>) -> (Link<K>, K) {
        match node.left.take() {
            None => (node.right.take(), node.value),
            Some(left) => {
                let (rest, min) = Self::pop_min(left);
                node.left = rest;
                node.size -= 1;
                (Some(node), min)
            }
        }
    }
}

impl<K: Ord + Clone> ScapegoatTree<K> {
    /// Adds `key`. Returns `false`, changing nothing, if it is already present.
    pub fn insert(&mut self, key: K) -> bool {
        let inserted = self.insert_key(key.clone());
        if inserted {
            self.history.record(Entry::Insert(key));
        }
        inserted
    }

    /// Deletes `key`. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.remove_key(key) {
            Some(removed) => {
                self.history.record(Entry::Remove(removed));
                true
            }
            None => false,
        }
    }

    /// Inserts each key in order; duplicates are skipped without stopping the
    /// batch. Every applied key is its own undo entry. Returns how many were
    /// inserted.
    pub fn insert_batch<I: IntoIterator<Item = K>>(&mut self, keys: I) -> usize {
        keys.into_iter()
            .map(|k| self.insert(k))
            .filter(|&inserted| inserted)
            .count()
    }

    /// Removes each key in order; absent keys are skipped. Returns how many
    /// were removed.
    pub fn remove_batch<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        keys.into_iter()
            .map(|k| self.remove(k.borrow()))
            .filter(|&removed| removed)
            .count()
    }

    /// Reverts the most recent mutation. Returns `false` if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        trace!(len = self.len, "undo");
        let applied = match &entry {
            Entry::Insert(key) => self.remove_key(key).is_some(),
            Entry::Remove(key) => self.insert_key(key.clone()),
        };
        debug_assert!(applied, "history out of sync with tree contents");
        self.history.push_redo(entry);
        true
    }

    /// Re-applies the most recently undone mutation. Returns `false` if there
    /// was none.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        trace!(len = self.len, "redo");
        let applied = match &entry {
            Entry::Insert(key) => self.insert_key(key.clone()),
            Entry::Remove(key) => self.remove_key(key).is_some(),
        };
        debug_assert!(applied, "history out of sync with tree contents");
        self.history.push_undo(entry);
        true
    }
}

impl<K> Default for ScapegoatTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for ScapegoatTree<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord + Clone> Extend<K> for ScapegoatTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.insert_batch(iter);
    }
}


#[cfg(test)]
mod proptests;
