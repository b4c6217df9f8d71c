//! Removal — COW path-copy with cascading collapse of emptied nodes.

use std::rc::Rc;

use crate::node::{self, Elem, NodeRef};

/// Outcome of a recursive remove.
pub(crate) enum RemoveOutcome<V> {
    /// Key was not present — the source handle is reused as-is.
    NotFound,
    /// Key was removed.
    Removed {
        /// New root of the copied subtree, or `None` if it emptied out.
        node: Option<NodeRef<V>>,
        /// The surviving terminal node, or `None` if it collapsed.
        ///
        /// Becomes the fresh staging node (already linked into `node`).
        leaf: Option<NodeRef<V>>,
    },
}

/// Removes `key` from the subtree rooted at `node`, entered at `level`.
///
/// With `drop_leaf` set the walk discards the whole terminal node instead
/// of a single value — used when an in-flight staging node empties out and
/// its stale target has to be unlinked.
pub(crate) fn remove_in_subtree<V: Clone>(
    node: &NodeRef<V>,
    level: u8,
    key: u32,
    drop_leaf: bool,
) -> RemoveOutcome<V> {
    if level == 0 {
        if drop_leaf {
            return RemoveOutcome::Removed {
                node: None,
                leaf: None,
            };
        }
        let d = node::digit(key, 0);
        if node.get(d).is_none() {
            return RemoveOutcome::NotFound;
        }
        let leaf = node.with_removed(d).map(Rc::new);
        return RemoveOutcome::Removed {
            node: leaf.clone(),
            leaf,
        };
    }

    let d = node::digit(key, level);
    let Some(elem) = node.get(d) else {
        return RemoveOutcome::NotFound;
    };
    match remove_in_subtree(elem.as_child(), level - 1, key, drop_leaf) {
        RemoveOutcome::NotFound => RemoveOutcome::NotFound,
        RemoveOutcome::Removed {
            node: Some(child),
            leaf,
        } => RemoveOutcome::Removed {
            node: Some(Rc::new(node.with_replaced(d, Elem::Child(child)))),
            leaf,
        },
        RemoveOutcome::Removed { node: None, leaf } => RemoveOutcome::Removed {
            node: node.with_removed(d).map(Rc::new),
            leaf,
        },
    }
}
