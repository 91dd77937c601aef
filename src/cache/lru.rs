//! LRU List Module
//!
//! Implements the recency list used for LRU eviction and iteration order.
//!
//! Entries live in an arena (`Vec` of slots plus a free list) and are linked
//! by slot index, so the list and the key index never share ownership of a
//! node. Every splice is O(1).

use crate::cache::entry::Entry;

// == Entry Id ==
/// Arena slot of a linked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryId(usize);

// == Recency List ==
/// Doubly-linked list of entries ordered by last touch.
///
/// - `oldest` = least recently used (eviction candidate)
/// - `newest` = most recently used
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    /// Vacant slots available for reuse
    free: Vec<usize>,
    oldest: Option<EntryId>,
    newest: Option<EntryId>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list.
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            oldest: None,
            newest: None,
            len: 0,
        }
    }

    // == Accessors ==
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn oldest(&self) -> Option<EntryId> {
        self.oldest
    }

    pub(crate) fn newest(&self) -> Option<EntryId> {
        self.newest
    }

    pub(crate) fn get(&self, id: EntryId) -> Option<&Entry<K, V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    // == Push Newest ==
    /// Stores a new entry at the newest end and returns its id.
    pub(crate) fn push_newest(&mut self, key: K, value: V, expires_at: u64) -> EntryId {
        let entry = Entry::new(key, value, expires_at);
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                EntryId(slot)
            }
            None => {
                self.slots.push(Some(entry));
                EntryId(self.slots.len() - 1)
            }
        };
        self.link_newest(id);
        self.len += 1;
        id
    }

    // == Bump ==
    /// Moves an entry to the newest end.
    pub(crate) fn bump(&mut self, id: EntryId) {
        if self.newest == Some(id) || self.get(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_newest(id);
    }

    // == Remove ==
    /// Detaches an entry and frees its slot.
    ///
    /// The returned entry has no links left into the list.
    pub(crate) fn remove(&mut self, id: EntryId) -> Option<Entry<K, V>> {
        self.get(id)?;
        self.unlink(id);
        let entry = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(entry)
    }

    // == Clear ==
    /// Drops every entry at once.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.oldest = None;
        self.newest = None;
        self.len = 0;
    }

    // == Iterate ==
    /// Walks entries from oldest to newest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        let mut cursor = self.oldest;
        std::iter::from_fn(move || {
            let entry = self.get(cursor?)?;
            cursor = entry.next;
            Some(entry)
        })
    }

    // == Internal Linking ==
    fn unlink(&mut self, id: EntryId) {
        let (prev, next) = match self.get_mut(id) {
            Some(entry) => (entry.prev.take(), entry.next.take()),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(entry) = self.get_mut(prev_id) {
                    entry.next = next;
                }
            }
            None => self.oldest = next,
        }

        match next {
            Some(next_id) => {
                if let Some(entry) = self.get_mut(next_id) {
                    entry.prev = prev;
                }
            }
            None => self.newest = prev,
        }
    }

    fn link_newest(&mut self, id: EntryId) {
        let prev = self.newest;
        if let Some(entry) = self.get_mut(id) {
            entry.prev = prev;
            entry.next = None;
        }

        match prev {
            Some(prev_id) => {
                if let Some(entry) = self.get_mut(prev_id) {
                    entry.next = Some(id);
                }
            }
            None => self.oldest = Some(id),
        }

        self.newest = Some(id);
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<&'static str, u32>) -> Vec<&'static str> {
        list.iter().map(|e| e.key).collect()
    }

    /// Checks `a.next.prev == a` along the whole list and the end handles.
    fn assert_links(list: &RecencyList<&'static str, u32>) {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = list.oldest();
        while let Some(id) = cursor {
            let entry = list.get(id).unwrap();
            assert_eq!(entry.prev, prev);
            prev = Some(id);
            cursor = entry.next;
            count += 1;
        }
        assert_eq!(list.newest(), prev);
        assert_eq!(count, list.len());
    }

    fn filled(names: &[&'static str]) -> (RecencyList<&'static str, u32>, Vec<EntryId>) {
        let mut list = RecencyList::new();
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| list.push_newest(*name, i as u32, 0))
            .collect();
        (list, ids)
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<&str, u32> = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.oldest().is_none());
        assert!(list.newest().is_none());
    }

    #[test]
    fn test_push_orders_oldest_to_newest() {
        let (list, ids) = filled(&["a", "b", "c"]);

        assert_eq!(keys(&list), vec!["a", "b", "c"]);
        assert_eq!(list.oldest(), Some(ids[0]));
        assert_eq!(list.newest(), Some(ids[2]));
        assert_links(&list);
    }

    #[test]
    fn test_bump_oldest() {
        let (mut list, ids) = filled(&["a", "b", "c"]);

        list.bump(ids[0]);

        assert_eq!(keys(&list), vec!["b", "c", "a"]);
        assert_links(&list);
    }

    #[test]
    fn test_bump_middle() {
        let (mut list, ids) = filled(&["a", "b", "c"]);

        list.bump(ids[1]);

        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_links(&list);
    }

    #[test]
    fn test_bump_newest_is_noop() {
        let (mut list, ids) = filled(&["a", "b", "c"]);

        list.bump(ids[2]);

        assert_eq!(keys(&list), vec!["a", "b", "c"]);
        assert_links(&list);
    }

    #[test]
    fn test_remove_endpoints_and_middle() {
        let (mut list, ids) = filled(&["a", "b", "c", "d"]);

        let removed = list.remove(ids[1]).unwrap();
        assert_eq!(removed.key, "b");
        assert!(removed.prev.is_none() && removed.next.is_none());
        assert_eq!(keys(&list), vec!["a", "c", "d"]);
        assert_links(&list);

        list.remove(ids[0]);
        assert_eq!(keys(&list), vec!["c", "d"]);
        assert_links(&list);

        list.remove(ids[3]);
        assert_eq!(keys(&list), vec!["c"]);
        assert_links(&list);

        list.remove(ids[2]);
        assert!(list.is_empty());
        assert_links(&list);
    }

    #[test]
    fn test_remove_twice_returns_none() {
        let (mut list, ids) = filled(&["a", "b"]);

        assert!(list.remove(ids[0]).is_some());
        assert!(list.remove(ids[0]).is_none());
        assert_eq!(list.len(), 1);
        assert_links(&list);
    }

    #[test]
    fn test_slots_are_reused() {
        let (mut list, ids) = filled(&["a", "b"]);

        list.remove(ids[0]);
        let id = list.push_newest("c", 9, 0);

        assert_eq!(id, ids[0]);
        assert_eq!(keys(&list), vec!["b", "c"]);
        assert_links(&list);
    }

    #[test]
    fn test_clear() {
        let (mut list, _) = filled(&["a", "b", "c"]);

        list.clear();

        assert!(list.is_empty());
        assert!(keys(&list).is_empty());
        assert_links(&list);
    }

    #[test]
    fn test_order_after_multiple_bumps() {
        let (mut list, ids) = filled(&["a", "b", "c"]);

        list.bump(ids[0]);
        list.bump(ids[2]);
        list.bump(ids[1]);

        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_links(&list);
    }
}
