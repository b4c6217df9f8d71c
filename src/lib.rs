//! Persistent integer-keyed map based on an msb-first bitwise trie.
//!
//! [`IntMap`] maps `u32` keys to values. Every mutating operation returns a
//! **new** map handle and never touches the nodes reachable from previously
//! returned handles, so taking a snapshot of the map is just keeping a
//! handle, and restoring one is just substituting it back — both O(1). This
//! makes the type a natural fit for backtracking searches that need
//! per-state associative data (the canonical example being a heap-slot to
//! object mapping in a state-space exploration engine).
//!
//! Keys are consumed msb-first in 5-bit digits, so the trie has the same
//! depth along every path and **consecutive keys land in the same terminal
//! node**. A run of edits against one terminal range only clones that node;
//! the path copy up to the root is deferred until an edit addresses a
//! different range (see [`IntMap::set`]).
//!
//! # Key properties
//!
//! - **Persistent handles**: mutation returns a new map, old handles keep
//!   their contents
//! - **O(1) snapshot / restore**: a snapshot is a retained handle
//! - **Staging leaf cache**: consecutive-key edit runs skip the per-edit
//!   root path copy
//! - **COW structural sharing**: unchanged subtrees are shared between
//!   handles and reclaimed by reference counting
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # Example
//!
//! ```
//! use msbtrie::IntMap;
//!
//! let m0: IntMap<&str> = IntMap::new();
//! let m1 = m0.set(42, "fortytwo");
//! let m2 = m1.remove(42);
//!
//! assert_eq!(m1.get(42), Some(&"fortytwo"));
//! assert_eq!(m2.get(42), None);
//! assert!(m0.is_empty()); // earlier handles are untouched
//! ```
//!
//! # References
//!
//! - Bagwell, 2001 — "Ideal Hash Trees" (bitmap-compressed trie nodes)

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod iter;

mod map;
mod node;
mod ops;

#[cfg(test)]
mod tests;

pub use map::IntMap;
