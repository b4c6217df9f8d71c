//! Bulk removal — bottom-up rebuild of every level under a value predicate.

use std::rc::Rc;

use crate::node::{Elem, Node, NodeRef, Retained};

/// Removes every value satisfying `drop` from the subtree rooted at `node`.
///
/// Returns the surviving subtree, `None` if nothing survived, or the input
/// node itself (same instance, still shared) if nothing changed. The
/// predicate can drop zero, one, many, or all values of a node in one call;
/// each level's shape is re-derived from its survivor count.
pub(crate) fn remove_all_in_subtree<V: Clone, F: FnMut(&V) -> bool>(
    node: &NodeRef<V>,
    level: u8,
    drop: &mut F,
) -> Option<NodeRef<V>> {
    if level == 0 {
        return match node.retained(|e| drop(e.as_value())) {
            Retained::Unchanged => Some(Rc::clone(node)),
            Retained::Shrunk(n) => Some(Rc::new(n)),
            Retained::Emptied => None,
        };
    }

    let len = node.len();
    let mut survivors: Vec<(u8, NodeRef<V>)> = Vec::with_capacity(len);
    let mut changed = false;
    for n in 0..len {
        let child = node.elem_at(n).as_child();
        match remove_all_in_subtree(child, level - 1, drop) {
            Some(c) => {
                changed |= !Rc::ptr_eq(&c, child);
                survivors.push((node.level_index(n), c));
            }
            None => changed = true,
        }
    }

    if survivors.is_empty() {
        None
    } else if changed {
        Some(Rc::new(rebuild_interior(survivors)))
    } else {
        Some(Rc::clone(node))
    }
}

/// Builds an interior node from surviving `(digit, child)` pairs, already
/// in ascending digit order.
fn rebuild_interior<V>(mut survivors: Vec<(u8, NodeRef<V>)>) -> Node<Elem<V>> {
    if survivors.len() == 1 {
        let (idx, child) = survivors.pop().unwrap_or_else(|| unreachable!());
        return Node::One {
            idx,
            elem: Elem::Child(child),
        };
    }
    let mut bitmap = 0_u32;
    let mut elems = Vec::with_capacity(survivors.len());
    for (idx, child) in survivors {
        bitmap |= 1 << idx;
        elems.push(Elem::Child(child));
    }
    if elems.len() == 32 {
        let elems: Box<[Elem<V>; 32]> = match elems.into_boxed_slice().try_into() {
            Ok(a) => a,
            Err(_) => unreachable!(),
        };
        Node::Full { elems }
    } else {
        Node::Bitmap {
            bitmap,
            elems: elems.into_boxed_slice(),
        }
    }
}

/// Counts the stored values below `node`.
///
/// Used to recompute a handle's size after bulk removal.
pub(crate) fn count_values<V>(node: &NodeRef<V>, level: u8) -> usize {
    if level == 0 {
        node.len()
    } else {
        (0..node.len())
            .map(|n| count_values(node.elem_at(n).as_child(), level - 1))
            .sum()
    }
}
