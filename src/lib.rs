//! nonblocking-view: weakly consistent, lock-light reads of aggregate
//! properties (count, emptiness, keys, values) of a sharded concurrent
//! map, plus a pass-through for arbitrary read-only accessors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: answer "how many entries", "is it empty", "which keys" and
//!   "which values" without the map's native aggregates, which may take
//!   every partition lock to return one consistent snapshot.
//! - Layers:
//!   - LazyEntries: the seam to the concurrent map. The map enumerates its
//!     entries lazily, holding only the lock of the partition currently
//!     being visited. Implemented for `dashmap::DashMap` behind the
//!     `dashmap` feature (on by default).
//!   - Selector: a closed description of what to read: `Count`,
//!     `IsEmpty`, `Keys`, `Values`, or a named `Member` with a read-only
//!     accessor. Validation is a pure structural check of the member
//!     expression text and never touches a map.
//!   - NonBlocking: a `Copy` wrapper around `&M` that resolves a selector.
//!     The four recognized names are served by one lazy pass; any other
//!     member name calls the accessor directly.
//!
//! Dispatch
//! - By the literal, case-sensitive member name: `Count`, `IsEmpty`,
//!   `Keys`, `Values`; anything else is `Other`. No aliasing.
//! - A `Member` whose name is recognized is served by enumeration; its
//!   accessor is never called.
//! - Accepted member expression shapes: `Name`, `m.Name`, `m => m.Name`.
//!   Calls (`m => m.Count()`), chains (`m => m.Keys.Count`), operators and
//!   indexing fail with `MalformedSelectorError`, the only error.
//!
//! Consistency
//! - Results reflect some interleaving of concurrent inserts and removes
//!   that happened during the pass, not the state at call start or end.
//!   `count()` and a concurrently computed `keys().len()` may differ.
//! - Concurrent mutation never produces an error or a panic; an empty or
//!   changing map is a valid input.
//!
//! Notes and non-goals
//! - No writes, no snapshot isolation, no cancellation: a pass always
//!   runs to completion. Bound it from the outside if needed.
//! - Stateless and reentrant; calls from many threads against the same
//!   map need no coordination.
//! - The map's own partitioning, locking and resizing are out of scope.
//!
//! ```
//! # #[cfg(feature = "dashmap")]
//! # {
//! use dashmap::DashMap;
//! use nonblocking_view::{NonBlockingExt, Resolved, Selector};
//!
//! let m = DashMap::new();
//! m.insert(1, 1);
//! let view = m.non_blocking();
//! assert_eq!(view.count(), 1);
//! assert_eq!(view.resolve(Selector::keys()), Ok(Resolved::Keys(vec![1])));
//! assert!(view
//!     .resolve(Selector::member("m => m.Count()", |m: &DashMap<i32, i32>| m.len()))
//!     .is_err());
//! # }
//! ```

mod accessor;
pub mod entries;
mod selector;
mod selector_proptest;

// Public surface
pub use accessor::{resolve, NonBlocking, NonBlockingExt, Resolved};
pub use entries::{EntryRef, LazyEntries};
pub use selector::{MalformedSelectorError, Member, NoMember, Selector, SelectorKind};
