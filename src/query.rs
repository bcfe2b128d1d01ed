//! Order-statistics and range queries driven by subtree sizes.

use std::cmp::Ordering;

use num_traits::{CheckedAdd, Zero};

use crate::error::{Result, TreeError};
use crate::node::{self, Link};
use crate::ScapegoatTree;

impl<K: Ord> ScapegoatTree<K> {
    pub fn min(&self) -> Result<&K> {
        let mut node = self.root.as_deref().ok_or(TreeError::EmptyTree)?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Ok(&node.value)
    }

    pub fn max(&self) -> Result<&K> {
        let mut node = self.root.as_deref().ok_or(TreeError::EmptyTree)?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Ok(&node.value)
    }

    /// The `k`-th smallest key, 1-indexed.
    pub fn kth_smallest(&self, k: usize) -> Result<&K> {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        let out_of_range = TreeError::RankOutOfRange {
            rank: k,
            len: self.len,
        };
        if k == 0 || k > self.len {
            return Err(out_of_range);
        }

        let mut rank = k;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            let left = node::size(&node.left);
            cur = match rank.cmp(&(left + 1)) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Equal => return Ok(&node.value),
                Ordering::Greater => {
                    rank -= left + 1;
                    node.right.as_deref()
                }
            };
        }
        debug_assert!(false, "subtree sizes disagree with tree length");
        Err(out_of_range)
    }

    /// 1-indexed position of `key` in ascending order.
    pub fn rank(&self, key: &K) -> Result<usize> {
        let mut before = 0;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Equal => return Ok(before + node::size(&node.left) + 1),
                Ordering::Greater => {
                    before += node::size(&node.left) + 1;
                    node.right.as_deref()
                }
            };
        }
        Err(TreeError::KeyNotFound)
    }

    /// Smallest key strictly greater than `key`. `key` need not be present.
    pub fn successor(&self, key: &K) -> Result<&K> {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        let mut best = None;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            if *key < node.value {
                best = Some(&node.value);
                cur = node.left.as_deref();
            } else {
                cur = node.right.as_deref();
            }
        }
        best.ok_or(TreeError::NoSuccessor)
    }

    /// Largest key strictly smaller than `key`. `key` need not be present.
    pub fn predecessor(&self, key: &K) -> Result<&K> {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        let mut best = None;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            if *key > node.value {
                best = Some(&node.value);
                cur = node.right.as_deref();
            } else {
                cur = node.left.as_deref();
            }
        }
        best.ok_or(TreeError::NoPredecessor)
    }

    /// Keys in `[low, high]`, ascending. Empty when `low > high`.
    pub fn values_in_range(&self, low: &K, high: &K) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::new();
        for_each_in_range(&self.root, low, high, &mut |k| out.push(k.clone()));
        out
    }

    /// Sum of the keys in `[low, high]`; zero when none qualify.
    ///
    /// Keys are added in ascending order and the running total is checked,
    /// so a total that leaves `K`'s range at any step is
    /// [`TreeError::SumOverflow`] rather than a panic or a wrapped value.
    pub fn sum_in_range(&self, low: &K, high: &K) -> Result<K>
    where
        K: Copy + Zero + CheckedAdd,
    {
        let mut sum = Some(K::zero());
        for_each_in_range(&self.root, low, high, &mut |k| {
            sum = sum.and_then(|s| s.checked_add(k));
        });
        sum.ok_or(TreeError::SumOverflow)
    }
}

/// In-order walk that skips subtrees lying entirely outside `[low, high]`.
fn for_each_in_range<'a, K: Ord>(link: &'a Link<K>, low: &K, high: &K, f: &mut impl FnMut(&'a K)) {
    let Some(node) = link else {
        return;
    };
    if node.value > *low {
        for_each_in_range(&node.left, low, high, f);
    }
    if *low <= node.value && node.value <= *high {
        f(&node.value);
    }
    if node.value < *high {
        for_each_in_range(&node.right, low, high, f);
    }
}
