//! Insertion — COW path-copy that also reports the linked terminal node.

use std::rc::Rc;

use crate::node::{self, Elem, Node, NodeRef};

/// Outcome of a recursive set.
pub(crate) struct SetOutcome<V> {
    /// New root of the copied subtree.
    pub node: NodeRef<V>,
    /// The terminal node now holding the key, as linked into `node`.
    ///
    /// The caller caches this as the fresh staging node; since it is
    /// already linked, staging and target start out as the same instance.
    pub leaf: NodeRef<V>,
    /// `true` if the key was previously absent.
    pub added: bool,
}

/// Path-copies the subtree rooted at `node` (entered at `level`) so that
/// `key` maps to `value`.
///
/// `None` means the slot for this subtree was vacant; a fresh sparse-1
/// chain down to the terminal level is built in that case. Every node on
/// the key's path is copied, everything off the path stays shared.
pub(crate) fn set_in_subtree<V: Clone>(
    node: Option<&NodeRef<V>>,
    level: u8,
    key: u32,
    value: V,
) -> SetOutcome<V> {
    let d = node::digit(key, level);

    if level == 0 {
        let (leaf, added) = match node {
            Some(n) => {
                if n.get(d).is_some() {
                    (n.with_replaced(d, Elem::Value(value)), false)
                } else {
                    (n.with_added(d, Elem::Value(value)), true)
                }
            }
            None => (
                Node::One {
                    idx: d,
                    elem: Elem::Value(value),
                },
                true,
            ),
        };
        let leaf = Rc::new(leaf);
        return SetOutcome {
            node: Rc::clone(&leaf),
            leaf,
            added,
        };
    }

    match node {
        Some(n) => match n.get(d) {
            Some(elem) => {
                let out = set_in_subtree(Some(elem.as_child()), level - 1, key, value);
                SetOutcome {
                    node: Rc::new(n.with_replaced(d, Elem::Child(out.node))),
                    leaf: out.leaf,
                    added: out.added,
                }
            }
            None => {
                let out = set_in_subtree(None, level - 1, key, value);
                SetOutcome {
                    node: Rc::new(n.with_added(d, Elem::Child(out.node))),
                    leaf: out.leaf,
                    added: true,
                }
            }
        },
        None => {
            let out = set_in_subtree(None, level - 1, key, value);
            SetOutcome {
                node: Rc::new(Node::One {
                    idx: d,
                    elem: Elem::Child(out.node),
                }),
                leaf: out.leaf,
                added: true,
            }
        }
    }
}
