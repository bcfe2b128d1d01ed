//! Traversal orders, the borrowing iterator and the balance diagnostic.

use std::collections::VecDeque;
use std::fmt;

use crate::node::{self, Link, Node};
use crate::ScapegoatTree;

impl<K> ScapegoatTree<K> {
    /// Ascending iterator over the keys.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root, self.len)
    }

    pub fn inorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn preorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node<K>> = Vec::new();
        stack.extend(self.root.as_deref());
        while let Some(node) = stack.pop() {
            out.push(node.value.clone());
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        out
    }

    pub fn postorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        fn walk<K: Clone>(link: &Link<K>, out: &mut Vec<K>) {
            if let Some(node) = link {
                walk(&node.left, out);
                walk(&node.right, out);
                out.push(node.value.clone());
            }
        }

        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    /// Keys grouped by depth, root level first, each level left to right.
    pub fn levelorder(&self) -> Vec<Vec<K>>
    where
        K: Clone,
    {
        let mut levels = Vec::new();
        let mut queue: VecDeque<&Node<K>> = self.root.as_deref().into_iter().collect();
        while !queue.is_empty() {
            let width = queue.len();
            let mut level = Vec::with_capacity(width);
            for _ in 0..width {
                let Some(node) = queue.pop_front() else {
                    break;
                };
                level.push(node.value.clone());
                queue.extend(node.left.as_deref());
                queue.extend(node.right.as_deref());
            }
            levels.push(level);
        }
        levels
    }

    pub fn balance_report(&self) -> BalanceReport {
        let alpha = self.config.alpha;
        let height = node::height(&self.root);
        let bound = if self.len == 0 {
            0.0
        } else {
            (self.len as f64).ln() / (1.0 / alpha).ln()
        };
        BalanceReport {
            len: self.len,
            height,
            bound,
            alpha,
            balanced: height <= 1 || (height - 1) as f64 <= bound,
        }
    }
}

/// Snapshot of the tree's height against the scapegoat bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceReport {
    pub len: usize,
    /// Levels on the longest root-to-leaf path.
    pub height: usize,
    /// `log(len) / log(1 / alpha)`: the deepest depth a balanced tree allows.
    pub bound: f64,
    pub alpha: f64,
    /// Whether the deepest node (depth `height - 1`) lies within `bound`.
    pub balanced: bool,
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            return write!(f, "Tree is empty, trivially balanced.");
        }
        writeln!(f, "Node count: {}", self.len)?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "Height bound: {:.2} (alpha {:.2})", self.bound, self.alpha)?;
        writeln!(f)?;
        if self.balanced {
            write!(f, "Tree is balanced: height within bound.")
        } else {
            write!(f, "Tree is NOT balanced: a scapegoat rebuild is due.")
        }
    }
}

/// In-order iterator driven by an explicit stack of pending ancestors.
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: &'a Link<K>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut cur: Option<&'a Node<K>>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a ScapegoatTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
