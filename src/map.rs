//! The persistent map handle and its operations.

use std::fmt;
use std::ops;
use std::rc::Rc;

use crate::iter::Iter;
use crate::node::{self, Elem, Node, NodeRef};
use crate::ops::bulk::{count_values, remove_all_in_subtree};
use crate::ops::get::get_in_subtree;
use crate::ops::merge::relink_staging;
use crate::ops::remove::{RemoveOutcome, remove_in_subtree};
use crate::ops::set::set_in_subtree;

/// Cached terminal node not yet linked into the shared trie.
///
/// `node` holds the up-to-date contents of the terminal range identified by
/// `mask` (`key | 0x1F`); `target` is the version of that terminal node the
/// trie still links. The two start out as the same instance whenever a
/// fresh terminal is linked; edits that hit the cached range then clone
/// only `node`, leaving `target` stale until a miss forces the merge.
pub(crate) struct Staging<V> {
    mask: u32,
    node: NodeRef<V>,
    target: NodeRef<V>,
}

impl<V> Clone for Staging<V> {
    fn clone(&self) -> Self {
        Self {
            mask: self.mask,
            node: Rc::clone(&self.node),
            target: Rc::clone(&self.target),
        }
    }
}

/// Persistent map from `u32` keys to values.
///
/// A handle is an immutable value: [`set`](Self::set),
/// [`remove`](Self::remove) and
/// [`remove_all_satisfying`](Self::remove_all_satisfying) return new
/// handles and never mutate nodes reachable from existing ones. Cloning a
/// handle is O(1) and shares all structure.
///
/// Keys are split msb-first into 5-bit digits; the trie has uniform depth,
/// storing values only at the terminal level, so consecutive keys share a
/// terminal node and runs of consecutive edits are serviced by a cached
/// copy of that node alone (the staging leaf).
///
/// Write operations require `V: Clone`; intended value types are cheap to
/// clone (reference-like handles such as `Rc<T>`, or small ids).
pub struct IntMap<V> {
    size: usize,
    /// Level of the topmost node; minimal for the keys currently present.
    root_level: u8,
    root: Option<NodeRef<V>>,
    staging: Option<Staging<V>>,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<V> IntMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            size: 0,
            root_level: 0,
            root: None,
            staging: None,
        }
    }

    /// Returns the number of stored key/value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// A lookup inside the cached terminal range is O(1); otherwise the
    /// trie is walked one digit per level.
    #[must_use]
    pub fn get(&self, key: u32) -> Option<&V> {
        if let Some(st) = &self.staging
            && st.mask == node::leaf_mask(key)
        {
            return st.node.get(node::digit(key, 0)).map(Elem::as_value);
        }
        let root = self.root.as_ref()?;
        if node::start_level(key) > self.root_level {
            return None;
        }
        get_in_subtree(root, self.root_level, key)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: u32) -> bool {
        self.get(key).is_some()
    }

    /// Calls `visitor` once per stored value.
    ///
    /// Traversal is depth-first in storage order, which for this trie is
    /// ascending key order. An unmerged staging node is visited in place of
    /// its stale target — the cache is never observable.
    pub fn process(&self, mut visitor: impl FnMut(&V)) {
        if let Some(root) = &self.root {
            visit_values(root, self.root_level, self.pending_staging(), &mut visitor);
        }
    }

    /// Returns an iterator over the stored values, in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(
            self.root.as_ref(),
            self.root_level,
            self.size,
            self.pending_staging().map(|st| (&st.target, &st.node)),
        )
    }

    /// The staging cache, if it holds edits the trie does not yet link.
    fn pending_staging(&self) -> Option<&Staging<V>> {
        self.staging
            .as_ref()
            .filter(|st| !Rc::ptr_eq(&st.node, &st.target))
    }
}

impl<V: Clone> IntMap<V> {
    /// Returns a snapshot of the current values, in ascending key order.
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        let mut out = Vec::with_capacity(self.size);
        self.process(|v| out.push(v.clone()));
        out
    }
}

// ---------------------------------------------------------------------------
// Write operations — V: Clone
// ---------------------------------------------------------------------------

impl<V: Clone> IntMap<V> {
    /// Returns a new map in which `key` maps to `value`.
    ///
    /// Overwriting an existing key keeps the size and still produces a new
    /// handle. When the key falls into the cached terminal range only that
    /// node is cloned; otherwise the path from the root is copied and any
    /// pending staging edits are merged into the copy first, so no write is
    /// ever lost.
    #[must_use]
    pub fn set(&self, key: u32, value: V) -> Self {
        let mask = node::leaf_mask(key);

        if let Some(st) = &self.staging
            && st.mask == mask
        {
            // staging hit — the dominant case for consecutive keys
            let d = node::digit(key, 0);
            let (leaf, added) = if st.node.get(d).is_some() {
                (st.node.with_replaced(d, Elem::Value(value)), false)
            } else {
                (st.node.with_added(d, Elem::Value(value)), true)
            };
            return Self {
                size: self.size + usize::from(added),
                root_level: self.root_level,
                root: self.root.clone(),
                staging: Some(Staging {
                    mask,
                    node: Rc::new(leaf),
                    target: Rc::clone(&st.target),
                }),
            };
        }

        if node::start_level(key) > self.root_level {
            self.set_above_root(key, value)
        } else {
            self.set_in_root(key, value)
        }
    }

    /// [`set`](Self::set) with an optional value: `None` removes the key.
    ///
    /// Mirrors hosts that model "no value" as a nullable slot — storing the
    /// absent-equivalent value is removal by definition.
    #[must_use]
    pub fn set_or_remove(&self, key: u32, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self.remove(key),
        }
    }

    /// Returns a new map without `key`.
    ///
    /// Removing an absent key returns an unchanged handle. Removing the
    /// last value of a node collapses it, cascading up the path; a root
    /// reduced to a single digit-0 chain shrinks the trie depth.
    #[must_use]
    pub fn remove(&self, key: u32) -> Self {
        let mask = node::leaf_mask(key);

        if let Some(st) = &self.staging
            && st.mask == mask
        {
            let d = node::digit(key, 0);
            if st.node.get(d).is_none() {
                return self.clone();
            }
            return match st.node.with_removed(d) {
                Some(leaf) => Self {
                    size: self.size - 1,
                    root_level: self.root_level,
                    root: self.root.clone(),
                    staging: Some(Staging {
                        mask,
                        node: Rc::new(leaf),
                        target: Rc::clone(&st.target),
                    }),
                },
                // staging node emptied out — unlink its stale target
                None => self.remove_in_root(mask, true),
            };
        }

        self.remove_in_root(key, false)
    }

    /// Returns a new map without every value satisfying `pred`.
    ///
    /// Rebuilds the trie bottom-up in a single pass; subtrees the predicate
    /// leaves untouched stay shared with the source handle. The result
    /// starts with a cold staging cache.
    #[must_use]
    pub fn remove_all_satisfying(&self, mut pred: impl FnMut(&V) -> bool) -> Self {
        let Some(root) = &self.root else {
            return self.clone();
        };

        // bulk removal must see a consistent trie
        let mut root = Rc::clone(root);
        if let Some(st) = self.pending_staging() {
            relink_staging(&mut root, self.root_level, st.mask, &st.node);
        }

        match remove_all_in_subtree(&root, self.root_level, &mut pred) {
            None => Self::new(),
            Some(n) => {
                let (root, root_level) = reduce_depth(n, self.root_level);
                let size = count_values(&root, root_level);
                Self {
                    size,
                    root_level,
                    root: Some(root),
                    staging: None,
                }
            }
        }
    }

    /// Set for a key that fits the current trie depth.
    fn set_in_root(&self, key: u32, value: V) -> Self {
        let out = set_in_subtree(self.root.as_ref(), self.root_level, key, value);
        let mut root = out.node;
        if let Some(st) = self.pending_staging() {
            relink_staging(&mut root, self.root_level, st.mask, &st.node);
        }
        Self {
            size: self.size + usize::from(out.added),
            root_level: self.root_level,
            root: Some(root),
            staging: Some(Staging {
                mask: node::leaf_mask(key),
                node: Rc::clone(&out.leaf),
                target: out.leaf,
            }),
        }
    }

    /// Set for a key whose highest digit exceeds the current trie depth.
    ///
    /// The existing trie (with any pending staging merged in) becomes a
    /// subtree at digit 0 of deeper wrapper nodes; the new key gets a fresh
    /// sparse-1 chain, and both meet in the new root.
    fn set_above_root(&self, key: u32, value: V) -> Self {
        let new_level = node::start_level(key);

        let old = self.root.as_ref().map(|root| {
            let mut old = Rc::clone(root);
            if let Some(st) = self.pending_staging() {
                relink_staging(&mut old, self.root_level, st.mask, &st.node);
            }
            // wrap until its depth matches the new root level
            for _ in (self.root_level + 1)..new_level {
                old = Rc::new(Node::One {
                    idx: 0,
                    elem: Elem::Child(old),
                });
            }
            old
        });

        // fresh chain of sparse-1 nodes for the new key, terminal first
        let leaf = Rc::new(Node::One {
            idx: node::digit(key, 0),
            elem: Elem::Value(value),
        });
        let mut chain = Rc::clone(&leaf);
        for level in 1..new_level {
            chain = Rc::new(Node::One {
                idx: node::digit(key, level),
                elem: Elem::Child(chain),
            });
        }

        let top = node::digit(key, new_level);
        let root = match old {
            Some(old) => Rc::new(
                Node::One {
                    idx: 0,
                    elem: Elem::Child(old),
                }
                .with_added(top, Elem::Child(chain)),
            ),
            None => Rc::new(Node::One {
                idx: top,
                elem: Elem::Child(chain),
            }),
        };

        Self {
            size: self.size + 1,
            root_level: new_level,
            root: Some(root),
            staging: Some(Staging {
                mask: node::leaf_mask(key),
                node: Rc::clone(&leaf),
                target: leaf,
            }),
        }
    }

    /// Remove via trie walk. `drop_leaf` discards the whole terminal node
    /// on the path (the emptied-staging case, where `key` is the mask).
    fn remove_in_root(&self, key: u32, drop_leaf: bool) -> Self {
        let Some(root) = &self.root else {
            return self.clone();
        };
        if node::start_level(key) > self.root_level {
            // key cannot be present; a truncated walk would alias another key
            return self.clone();
        }

        match remove_in_subtree(root, self.root_level, key, drop_leaf) {
            RemoveOutcome::NotFound => self.clone(),
            RemoveOutcome::Removed { node: None, .. } => Self::new(),
            RemoveOutcome::Removed {
                node: Some(n),
                leaf,
            } => {
                let (mut root, root_level) = reduce_depth(n, self.root_level);
                if !drop_leaf
                    && let Some(st) = self.pending_staging()
                {
                    relink_staging(&mut root, root_level, st.mask, &st.node);
                }
                Self {
                    size: self.size - 1,
                    root_level,
                    root: Some(root),
                    staging: leaf.map(|leaf| Staging {
                        mask: node::leaf_mask(key),
                        node: Rc::clone(&leaf),
                        target: leaf,
                    }),
                }
            }
        }
    }
}

/// Collapses sole-zero-child roots, shrinking the trie depth to the
/// minimal level for the remaining keys.
fn reduce_depth<V>(mut root: NodeRef<V>, mut level: u8) -> (NodeRef<V>, u8) {
    while level > 0 && root.is_sole_zero() {
        level -= 1;
        let child = Rc::clone(root.elem_at(0).as_child());
        root = child;
    }
    (root, level)
}

/// Depth-first value traversal, substituting an unmerged staging node for
/// its stale target at the terminal level.
fn visit_values<V, F: FnMut(&V)>(
    node: &NodeRef<V>,
    level: u8,
    staged: Option<&Staging<V>>,
    f: &mut F,
) {
    if level == 0 {
        let node = match staged {
            Some(st) if Rc::ptr_eq(node, &st.target) => &st.node,
            _ => node,
        };
        for n in 0..node.len() {
            f(node.elem_at(n).as_value());
        }
    } else {
        for n in 0..node.len() {
            visit_values(node.elem_at(n).as_child(), level - 1, staged, f);
        }
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

// Manual impls where a derive would demand V: Clone/Debug for no reason —
// a handle clone copies a few words and bumps reference counts.

impl<V> Clone for IntMap<V> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            root_level: self.root_level,
            root: self.root.clone(),
            staging: self.staging.clone(),
        }
    }
}

impl<V> Default for IntMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for IntMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntMap")
            .field("len", &self.size)
            .field("root_level", &self.root_level)
            .finish_non_exhaustive()
    }
}

impl<V: Clone> Extend<(u32, V)> for IntMap<V> {
    fn extend<I: IntoIterator<Item = (u32, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            let next = self.set(k, v);
            *self = next;
        }
    }
}

impl<V: Clone> FromIterator<(u32, V)> for IntMap<V> {
    fn from_iter<I: IntoIterator<Item = (u32, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V> ops::Index<u32> for IntMap<V> {
    type Output = V;

    fn index(&self, key: u32) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, V> IntoIterator for &'a IntMap<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Test introspection
// ---------------------------------------------------------------------------

#[cfg(test)]
impl<V> IntMap<V> {
    /// Current trie depth (level of the root node).
    pub(crate) const fn root_level(&self) -> u8 {
        self.root_level
    }

    /// `true` while the staging cache holds edits the trie does not link.
    pub(crate) fn has_pending_staging(&self) -> bool {
        self.pending_staging().is_some()
    }

    /// `true` if both handles link the same root node instance.
    pub(crate) fn shares_root_with(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
