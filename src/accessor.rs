//! NonBlocking: selector-resolving accessor over a borrowed concurrent map.

use crate::entries::{EntryRef, LazyEntries};
use crate::selector::{Dispatch, MalformedSelectorError, Selector, SelectorKind};
use tracing::{debug, trace};

/// Value produced by [`NonBlocking::resolve`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolved<K, V, T> {
    Count(usize),
    IsEmpty(bool),
    Keys(Vec<K>),
    Values(Vec<V>),
    Other(T),
}

impl<K, V, T> Resolved<K, V, T> {
    pub fn kind(&self) -> SelectorKind {
        match self {
            Resolved::Count(_) => SelectorKind::Count,
            Resolved::IsEmpty(_) => SelectorKind::IsEmpty,
            Resolved::Keys(_) => SelectorKind::Keys,
            Resolved::Values(_) => SelectorKind::Values,
            Resolved::Other(_) => SelectorKind::Other,
        }
    }

    pub fn into_count(self) -> Option<usize> {
        match self {
            Resolved::Count(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_is_empty(self) -> Option<bool> {
        match self {
            Resolved::IsEmpty(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_keys(self) -> Option<Vec<K>> {
        match self {
            Resolved::Keys(ks) => Some(ks),
            _ => None,
        }
    }

    pub fn into_values(self) -> Option<Vec<V>> {
        match self {
            Resolved::Values(vs) => Some(vs),
            _ => None,
        }
    }

    pub fn into_other(self) -> Option<T> {
        match self {
            Resolved::Other(t) => Some(t),
            _ => None,
        }
    }
}

/// Weakly consistent reads over a borrowed map.
///
/// Count, emptiness, keys and values are computed with a single pass of
/// [`LazyEntries::lazy_entries`] instead of the map's own aggregates, so at
/// most one partition lock is held at a time. Under concurrent writes the
/// result reflects some interleaving of those writes during the pass, not
/// one consistent instant; `count()` and a concurrent `keys().len()` may
/// disagree.
///
/// Holds no state besides the borrow; copies are free and calls from many
/// threads need no coordination.
#[derive(Debug)]
pub struct NonBlocking<'m, M: ?Sized> {
    map: &'m M,
}

impl<'m, M: ?Sized> Clone for NonBlocking<'m, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'m, M: ?Sized> Copy for NonBlocking<'m, M> {}

impl<'m, M> NonBlocking<'m, M>
where
    M: LazyEntries + ?Sized,
{
    pub fn new(map: &'m M) -> Self {
        Self { map }
    }

    /// Number of entries seen by one lazy pass.
    pub fn count(&self) -> usize {
        self.map.lazy_entries().count()
    }

    /// True if a lazy pass finds no entry. Stops at the first entry found.
    pub fn is_empty(&self) -> bool {
        self.map.lazy_entries().next().is_none()
    }

    /// Keys seen by one lazy pass, in enumeration order.
    pub fn keys(&self) -> Vec<M::Key>
    where
        M::Key: Clone,
    {
        self.map.lazy_entries().map(|e| e.key().clone()).collect()
    }

    /// Values seen by one lazy pass, in enumeration order.
    pub fn values(&self) -> Vec<M::Value>
    where
        M::Value: Clone,
    {
        self.map.lazy_entries().map(|e| e.value().clone()).collect()
    }

    /// Evaluate `f` directly against the map. No lock avoidance: whatever
    /// `f` calls behaves exactly as it would without this wrapper.
    pub fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&M) -> T,
    {
        f(self.map)
    }

    /// Validate `selector`, then dispatch it.
    ///
    /// The selector is checked before the map is touched; a malformed
    /// member expression fails without any access to the map. Every other
    /// outcome is a value, whatever the map's state or concurrent activity.
    pub fn resolve<T>(
        &self,
        selector: Selector<'_, M, T>,
    ) -> Result<Resolved<M::Key, M::Value, T>, MalformedSelectorError>
    where
        M::Key: Clone,
        M::Value: Clone,
    {
        let dispatch = match selector.dispatch() {
            Ok(d) => d,
            Err(e) => {
                debug!(selector = %e.selector, "rejected malformed selector");
                return Err(e);
            }
        };
        let kind = dispatch.kind();
        trace!(%kind, enumerated = kind.is_enumerated(), "resolving selector");
        let resolved = match dispatch {
            Dispatch::Count => Resolved::Count(self.count()),
            Dispatch::IsEmpty => Resolved::IsEmpty(self.is_empty()),
            Dispatch::Keys => Resolved::Keys(self.keys()),
            Dispatch::Values => Resolved::Values(self.values()),
            Dispatch::Other(member) => Resolved::Other(member.read(self.map)),
        };
        Ok(resolved)
    }
}

/// Entry point for [`NonBlocking`] on any [`LazyEntries`] map.
pub trait NonBlockingExt: LazyEntries {
    fn non_blocking(&self) -> NonBlocking<'_, Self> {
        NonBlocking::new(self)
    }
}

impl<M: LazyEntries + ?Sized> NonBlockingExt for M {}

/// Free-function form of [`NonBlocking::resolve`].
pub fn resolve<M, T>(
    map: &M,
    selector: Selector<'_, M, T>,
) -> Result<Resolved<M::Key, M::Value, T>, MalformedSelectorError>
where
    M: LazyEntries + ?Sized,
    M::Key: Clone,
    M::Value: Clone,
{
    NonBlocking::new(map).resolve(selector)
}
