//! Lookup — a digit-wise walk from the root to the terminal level.

use crate::node::{self, Elem, NodeRef};

/// Looks up `key` in the subtree rooted at `node`, entered at `level`.
///
/// Absence of a child at any level short-circuits to `None`.
pub(crate) fn get_in_subtree<V>(mut node: &NodeRef<V>, mut level: u8, key: u32) -> Option<&V> {
    while level > 0 {
        node = node.get(node::digit(key, level))?.as_child();
        level -= 1;
    }
    node.get(node::digit(key, 0)).map(Elem::as_value)
}
