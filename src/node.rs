//! Owned tree nodes and the read-only handle handed out for rendering.

pub(crate) type Link<K> = Option<Box<Node<K>>>;

#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) value: K,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
    /// Number of nodes in the subtree rooted here, including this one.
    pub(crate) size: usize,
}

impl<K> Node<K> {
    #[inline]
    pub(crate) fn leaf(value: K) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
            size: 1,
        })
    }

    #[inline]
    pub(crate) fn recalc(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
    }
}

#[inline]
pub(crate) fn size<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

/// Levels on the longest root-to-leaf path. An empty link has height 0.
pub(crate) fn height<K>(link: &Link<K>) -> usize {
    match link {
        None => 0,
        Some(node) => 1 + height(&node.left).max(height(&node.right)),
    }
}

/// Moves every key out of `link` in ascending order, freeing the nodes.
pub(crate) fn drain_into<K>(link: Link<K>, out: &mut Vec<K>) {
    let Some(node) = link else {
        return;
    };
    let Node {
        value, left, right, ..
    } = *node;
    drain_into(left, out);
    out.push(value);
    drain_into(right, out);
}

/// Builds a perfectly balanced subtree from the next `len` keys of `keys`,
/// which must be ascending. Left and right sizes differ by at most one.
pub(crate) fn build_balanced<K>(keys: &mut impl Iterator<Item = K>, len: usize) -> Link<K> {
    if len == 0 {
        return None;
    }
    let left_len = (len - 1) / 2;
    let left = build_balanced(keys, left_len);
    let value = keys.next()?;
    let right = build_balanced(keys, len - left_len - 1);
    Some(Box::new(Node {
        value,
        left,
        right,
        size: len,
    }))
}

/// Replaces the subtree with a perfectly balanced one holding the same keys.
pub(crate) fn rebuild<K>(link: Link<K>) -> Link<K> {
    let len = size(&link);
    let mut keys = Vec::with_capacity(len);
    drain_into(link, &mut keys);
    debug_assert_eq!(keys.len(), len, "subtree size out of sync with its nodes");
    build_balanced(&mut keys.into_iter(), len)
}

/// Read-only view of a node. Borrowing the tree keeps the node alive; the
/// handle cannot outlive the next mutation.
pub struct NodeRef<'a, K> {
    node: &'a Node<K>,
}

impl<'a, K> NodeRef<'a, K> {
    #[inline]
    pub(crate) fn new(node: &'a Node<K>) -> Self {
        Self { node }
    }

    #[inline]
    pub fn value(&self) -> &'a K {
        &self.node.value
    }

    #[inline]
    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.node.left.as_deref().map(NodeRef::new)
    }

    #[inline]
    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.node.right.as_deref().map(NodeRef::new)
    }

    /// Number of keys in the subtree rooted at this node.
    #[inline]
    pub fn size(&self) -> usize {
        self.node.size
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K: std::fmt::Debug> std::fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", &self.node.value)
            .field("size", &self.node.size)
            .finish()
    }
}
