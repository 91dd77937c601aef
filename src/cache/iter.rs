//! Cache Iterators
//!
//! Lazy traversals from the most recently touched entry toward the oldest,
//! ending at the first stale entry.

use std::iter::FusedIterator;

use crate::cache::clock::Clock;
use crate::cache::lru::{EntryId, RecencyList};

// == Entries ==
/// Iterator over `(&K, &V)` pairs, newest first.
///
/// The clock is read at every step. Iteration stops at the first stale
/// entry rather than skipping it, so only the fresh prefix is visible.
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    clock: &'a dyn Clock,
    cursor: Option<EntryId>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(list: &'a RecencyList<K, V>, clock: &'a dyn Clock) -> Self {
        Self {
            list,
            clock,
            cursor: list.newest(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.get(self.cursor?)?;
        if entry.is_expired(self.clock.now()) {
            self.cursor = None;
            return None;
        }
        self.cursor = entry.prev;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Some(_) => (0, Some(self.list.len())),
            None => (0, Some(0)),
        }
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// == Keys ==
/// Iterator over keys, newest first.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

// == Values ==
/// Iterator over values, newest first.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}
