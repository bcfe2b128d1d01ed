//! Linear undo/redo log of completed mutations.

use std::collections::VecDeque;

/// One completed mutation. Keys are enough to reverse either kind since the
/// tree holds a set and its shape is not part of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<K> {
    Insert(K),
    Remove(K),
}

impl<K> Entry<K> {
    pub fn key(&self) -> &K {
        match self {
            Entry::Insert(k) | Entry::Remove(k) => k,
        }
    }
}

#[derive(Clone)]
pub(crate) struct History<K> {
    undo: VecDeque<Entry<K>>,
    redo: Vec<Entry<K>>,
    limit: Option<usize>,
}

impl<K> History<K> {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Records a fresh mutation. Anything previously undone is no longer
    /// reachable.
    pub(crate) fn record(&mut self, entry: Entry<K>) {
        self.redo.clear();
        self.push_undo(entry);
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Entry<K>> {
        self.undo.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Entry<K>> {
        self.redo.pop()
    }

    pub(crate) fn push_redo(&mut self, entry: Entry<K>) {
        self.redo.push(entry);
    }

    /// Pushes without touching the redo stack; used when replaying a redo.
    pub(crate) fn push_undo(&mut self, entry: Entry<K>) {
        if self.limit == Some(0) {
            return;
        }
        self.undo.push_back(entry);
        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                self.undo.pop_front();
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    #[inline]
    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[inline]
    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry<K>> {
        self.undo.iter()
    }
}
