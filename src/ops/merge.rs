//! Staging merge — re-links an in-flight terminal node into the trie.
//!
//! While a run of edits stays inside one terminal range, only the staging
//! node is cloned per edit; the trie keeps linking its pre-run version (the
//! target node). On a staging miss the current staging node has to be
//! written back to the slot the target occupies, copying exactly the nodes
//! between that slot and the first ancestor the current operation has
//! already copied.

use std::rc::Rc;

use crate::node::{self, Elem, NodeRef};

/// Replaces the terminal node on the digit path of `mask` with `leaf`.
///
/// Walks `mask`'s digits from `level` down to the terminal slot.
/// [`Rc::make_mut`] does the ownership bookkeeping: a node created by the
/// in-progress operation is singly owned and gets patched in place (the
/// merge costs no allocation past the divergence point), while a node still
/// shared with a published handle is cloned first. Called with a shared
/// root, this degenerates to a plain path copy — the variant used before
/// bulk removal and depth growth.
pub(crate) fn relink_staging<V: Clone>(
    slot: &mut NodeRef<V>,
    level: u8,
    mask: u32,
    leaf: &NodeRef<V>,
) {
    if level == 0 {
        // the trie consists of nothing but the terminal node
        *slot = Rc::clone(leaf);
        return;
    }
    let d = node::digit(mask, level);
    let n = Rc::make_mut(slot);
    if level == 1 {
        // parent of the terminal slot — patch it without reallocating
        n.set_in_place(d, Elem::Child(Rc::clone(leaf)));
    } else {
        match n.get_mut(d) {
            Some(Elem::Child(child)) => relink_staging(child, level - 1, mask, leaf),
            _ => unreachable!("staging path missing from the trie"),
        }
    }
}
