//! Lazy entry enumeration: the only structural access this crate needs
//! from a concurrent map.
//!
//! A sharded map guards each partition with its own lock. Its native
//! aggregates (`len`, `is_empty`, key and value listings) may take every
//! partition lock to produce one consistent answer. Enumeration instead
//! walks the partitions in turn and only holds the lock of the partition
//! currently being visited.

/// Borrowed view of one entry yielded by [`LazyEntries::lazy_entries`].
///
/// Implementations usually hold a partition read guard for as long as the
/// entry is alive, so callers should not keep entries around longer than
/// needed.
pub trait EntryRef<K, V> {
    fn key(&self) -> &K;
    fn value(&self) -> &V;
}

/// A concurrent map that can enumerate its current entries one partition
/// at a time.
///
/// Contract for implementors:
/// - At most one partition lock is held by the iterator at any instant.
/// - Concurrent inserts and removes never make the iterator panic or yield
///   a torn entry; they are either observed or not.
/// - The iterator performs no writes on the map.
pub trait LazyEntries {
    type Key;
    type Value;

    /// Entry handle yielded during enumeration.
    type Entry<'a>: EntryRef<Self::Key, Self::Value>
    where
        Self: 'a;

    /// Lazy iterator over the entries present while it advances.
    type Iter<'a>: Iterator<Item = Self::Entry<'a>>
    where
        Self: 'a;

    fn lazy_entries(&self) -> Self::Iter<'_>;
}

#[cfg(feature = "dashmap")]
mod dashmap_impl {
    use super::{EntryRef, LazyEntries};
    use core::hash::{BuildHasher, Hash};
    use dashmap::iter::Iter;
    use dashmap::mapref::multiple::RefMulti;
    use dashmap::DashMap;

    impl<'a, K, V, S> EntryRef<K, V> for RefMulti<'a, K, V, S>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        #[inline]
        fn key(&self) -> &K {
            RefMulti::key(self)
        }

        #[inline]
        fn value(&self) -> &V {
            RefMulti::value(self)
        }
    }

    // DashMap::iter read-locks one shard at a time and releases it before
    // moving to the next one.
    impl<K, V, S> LazyEntries for DashMap<K, V, S>
    where
        K: Eq + Hash,
        S: BuildHasher + Clone,
    {
        type Key = K;
        type Value = V;
        type Entry<'a>
            = RefMulti<'a, K, V, S>
        where
            Self: 'a;
        type Iter<'a>
            = Iter<'a, K, V, S, DashMap<K, V, S>>
        where
            Self: 'a;

        #[inline]
        fn lazy_entries(&self) -> Self::Iter<'_> {
            self.iter()
        }
    }
}
