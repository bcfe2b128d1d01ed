//! Merge, split and content equality.
//!
//! Merge and split drain their inputs into sorted vectors and bulk-build
//! perfectly balanced results, so both are `O(n + m)` and leave every
//! result with a fresh history.

use std::cmp::Ordering;

use tracing::trace;

use crate::config::TreeConfig;
use crate::node;
use crate::ScapegoatTree;

impl<K> ScapegoatTree<K> {
    /// Consumes the tree, returning its keys in ascending order.
    pub fn into_sorted_vec(self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len);
        node::drain_into(self.root, &mut keys);
        keys
    }

    /// Builds a perfectly balanced tree from strictly ascending keys.
    fn from_sorted(keys: Vec<K>, config: TreeConfig) -> Self {
        let len = keys.len();
        let root = node::build_balanced(&mut keys.into_iter(), len);
        Self::from_parts(root, len, config)
    }
}

impl<K: Ord> ScapegoatTree<K> {
    /// Union of both trees. Keys present in both appear once. The result
    /// takes `self`'s configuration and starts with an empty history.
    pub fn merge(self, other: Self) -> Self {
        let config = self.config;
        trace!(left = self.len, right = other.len, "merging trees");
        let merged = union_sorted(self.into_sorted_vec(), other.into_sorted_vec());
        Self::from_sorted(merged, config)
    }

    /// Partitions into keys `< pivot` and keys `> pivot`. A key equal to
    /// `pivot` is dropped. Both halves keep this tree's configuration.
    pub fn split(self, pivot: &K) -> (Self, Self) {
        let config = self.config;
        let mut lower = self.into_sorted_vec();
        let cut = lower.partition_point(|k| k < pivot);
        let mut upper = lower.split_off(cut);
        if upper.first() == Some(pivot) {
            upper.remove(0);
        }
        trace!(lower = lower.len(), upper = upper.len(), "split tree");
        (
            Self::from_sorted(lower, config),
            Self::from_sorted(upper, config),
        )
    }
}

/// Two-way merge of ascending vectors, keeping one copy of shared keys.
fn union_sorted<K: Ord>(a: Vec<K>, b: Vec<K>) -> Vec<K> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter().peekable();
    let mut b = b.into_iter().peekable();
    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match order {
            Ordering::Less => out.extend(a.next()),
            Ordering::Greater => out.extend(b.next()),
            Ordering::Equal => {
                b.next();
                out.extend(a.next());
            }
        }
    }
    out
}

/// Content equality: same keys, regardless of shape or history.
impl<K: PartialEq> PartialEq for ScapegoatTree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for ScapegoatTree<K> {}

impl<K: Ord> FromIterator<K> for ScapegoatTree<K> {
    /// Bulk-builds a balanced tree; duplicates collapse and no history is
    /// recorded.
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut keys: Vec<K> = iter.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        Self::from_sorted(keys, TreeConfig::default())
    }
}
