use std::cmp::Reverse;
use std::fmt::Debug;

use derive_new::new;
use serde::Serialize;
use tracing::trace;

use crate::{Block, TokenTransfer, Transaction, TransferKey, PENDING_TIMESTAMP};

/// An entry of a live list.
pub trait FeedItem {
    /// Identity used to drop duplicates.
    type Key: PartialEq + Debug;

    /// Identity of this entry
    fn key(&self) -> Self::Key;

    /// Unix seconds, or [`PENDING_TIMESTAMP`]
    fn timestamp(&self) -> i64;
}

impl FeedItem for Block {
    type Key = u64;

    fn key(&self) -> u64 {
        self.number
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl FeedItem for Transaction {
    type Key = String;

    fn key(&self) -> String {
        self.hash.clone()
    }

    fn timestamp(&self) -> i64 {
        Transaction::timestamp(self)
    }
}

impl FeedItem for TokenTransfer {
    type Key = TransferKey;

    fn key(&self) -> TransferKey {
        TokenTransfer::key(self)
    }

    fn timestamp(&self) -> i64 {
        TokenTransfer::timestamp(self)
    }
}

/// Pending entries have no time yet but are the most recent by definition.
fn recency(timestamp: i64) -> i64 {
    if timestamp == PENDING_TIMESTAMP {
        i64::MAX
    } else {
        timestamp
    }
}

/// Bounded list kept newest first.
///
/// Merging a delta replaces entries that share a key with an incoming one,
/// re-sorts by timestamp and drops the oldest entries past `capacity`. Entries
/// with equal timestamps keep arrival order, incoming before existing.
#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct RecencyBuffer<T> {
    capacity: usize,
    #[new(default)]
    entries: Vec<T>,
}

impl<T: FeedItem> RecencyBuffer<T> {
    /// Buffer holding the initial list, already bounded and ordered.
    pub fn with_entries(capacity: usize, entries: impl IntoIterator<Item = T>) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.merge(entries);
        buffer
    }

    /// Merge a delta. Within the delta, a later entry wins over an earlier
    /// one with the same key.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = T>) {
        let mut fresh: Vec<T> = Vec::new();
        for item in incoming {
            let key = item.key();
            fresh.retain(|existing| existing.key() != key);
            fresh.push(item);
        }

        let before = self.entries.len();
        self.entries
            .retain(|existing| !fresh.iter().any(|item| item.key() == existing.key()));
        trace!(
            incoming = fresh.len(),
            replaced = before - self.entries.len(),
            "Merging feed delta"
        );

        fresh.append(&mut self.entries);
        fresh.sort_by_key(|item| Reverse(recency(item.timestamp())));
        fresh.truncate(self.capacity);
        self.entries = fresh;
    }

    /// Insert or replace a single entry.
    pub fn push(&mut self, item: T) {
        self.merge(std::iter::once(item))
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Maximum number of entries kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the entries, newest first
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, i64);

    impl FeedItem for Item {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.0
        }

        fn timestamp(&self) -> i64 {
            self.1
        }
    }

    fn keys(buffer: &RecencyBuffer<Item>) -> Vec<&'static str> {
        buffer.entries().iter().map(|item| item.0).collect()
    }

    #[test]
    fn keeps_newest_first_and_bounded() {
        let mut buffer = RecencyBuffer::with_entries(3, [Item("a", 10), Item("b", 20)]);
        assert_eq!(keys(&buffer), ["b", "a"]);

        buffer.merge([Item("c", 30), Item("d", 5)]);
        assert_eq!(keys(&buffer), ["c", "b", "a"]);
        assert_eq!(buffer.len(), buffer.capacity());
    }

    #[test]
    fn duplicates_are_replaced() {
        let mut buffer = RecencyBuffer::with_entries(5, [Item("a", 10), Item("b", 20)]);
        buffer.merge([Item("a", 30), Item("a", 40)]);
        assert_eq!(buffer.entries(), &[Item("a", 40), Item("b", 20)]);
    }

    #[test]
    fn pending_entries_sort_first() {
        let mut buffer = RecencyBuffer::with_entries(5, [Item("a", 10)]);
        buffer.push(Item("p", PENDING_TIMESTAMP));
        buffer.push(Item("b", 20));
        assert_eq!(keys(&buffer), ["p", "b", "a"]);
    }

    #[test]
    fn ties_put_incoming_first() {
        let mut buffer = RecencyBuffer::with_entries(5, [Item("a", 10)]);
        buffer.push(Item("b", 10));
        assert_eq!(keys(&buffer), ["b", "a"]);
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let buffer = RecencyBuffer::with_entries(0, [Item("a", 10)]);
        assert!(buffer.is_empty());
    }
}
