use crate::IntMap;

/// A run of consecutive keys edits only the staging node; the shared trie
/// above it is untouched until a miss.
#[test]
fn consecutive_run_keeps_root() {
    let m1 = IntMap::new().set(0, 0);
    let m2 = m1.set(1, 1);
    let m3 = m2.set(2, 2);

    assert!(m2.shares_root_with(&m1));
    assert!(m3.shares_root_with(&m1));
    assert!(m3.has_pending_staging());

    assert_eq!(m3.len(), 3);
    for i in 0_u32..3 {
        assert_eq!(m3.get(i), Some(&i));
    }
    assert_eq!(m1.get(1), None);
    assert_eq!(m2.get(2), None);
}

/// The cache is an allocation optimization, never an observable state
/// change: interleaved edits produce the same results as a naive map.
#[test]
fn interleaved_sets_match_naive_results() {
    let keys = [0_u32, 31, 1, 30, 2];
    let vals = ["A", "B", "C", "D", "E"];

    let mut m = IntMap::new();
    for (&k, v) in keys.iter().zip(vals) {
        m = m.set(k, v);
    }
    assert_eq!(m.len(), 5);
    for (&k, v) in keys.iter().zip(vals) {
        assert_eq!(m.get(k), Some(&v));
    }

    // same sequence bouncing between two distant terminal ranges
    let mut m = IntMap::new();
    for (n, (&k, v)) in keys.iter().zip(vals).enumerate() {
        let k = if n % 2 == 0 { k } else { k + 1024 };
        m = m.set(k, v);
    }
    assert_eq!(m.len(), 5);
    assert_eq!(m.get(0), Some(&"A"));
    assert_eq!(m.get(31 + 1024), Some(&"B"));
    assert_eq!(m.get(1), Some(&"C"));
    assert_eq!(m.get(30 + 1024), Some(&"D"));
    assert_eq!(m.get(2), Some(&"E"));
}

/// Every miss merges the previous run; nothing is lost across many merges.
#[test]
fn alternating_ranges_force_merges() {
    let mut m = IntMap::new();
    for i in 0_u32..50 {
        m = m.set(2 * i, i); // miss into the low range
        m = m.set(2 * i + 1, i + 1); // hit — leaves a pending edit
        m = m.set(1000 + i, i); // miss into the high range merges it
    }
    assert_eq!(m.len(), 150);
    for i in 0_u32..50 {
        assert_eq!(m.get(2 * i), Some(&i));
        assert_eq!(m.get(2 * i + 1), Some(&(i + 1)));
        assert_eq!(m.get(1000 + i), Some(&i));
    }
}

/// Unmerged staging edits are visible through every read surface.
#[test]
fn pending_edits_visible_before_merge() {
    let mut m = IntMap::new();
    for i in 0_u32..4 {
        m = m.set(i, i);
    }
    assert!(m.has_pending_staging());

    assert_eq!(m.values(), vec![0, 1, 2, 3]);
    assert_eq!(m.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    let mut seen = Vec::new();
    m.process(|v| seen.push(*v));
    assert_eq!(seen, vec![0, 1, 2, 3]);
}

/// A pending overwrite survives the merge triggered by a distant key.
#[test]
fn merge_preserves_pending_overwrite() {
    let m = IntMap::new().set(0, "x").set(0, "y").set(100, "z");
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(0), Some(&"y"));
    assert_eq!(m.get(100), Some(&"z"));
}

/// Depth growth merges the pending staging node before wrapping the old
/// root.
#[test]
fn merge_across_depth_growth() {
    let m = IntMap::new().set(5, "a").set(6, "b").set(1 << 31, "c");
    assert_eq!(m.root_level(), 6);
    assert_eq!(m.len(), 3);
    assert_eq!(m.get(5), Some(&"a"));
    assert_eq!(m.get(6), Some(&"b"));
    assert_eq!(m.get(1 << 31), Some(&"c"));
}

/// Removing the last staged value unlinks the whole terminal node.
#[test]
fn emptied_staging_unlinks_terminal() {
    let m = IntMap::new().set(64, 64).set(0, 0).set(1, 1);
    let m2 = m.remove(1).remove(0);

    assert_eq!(m2.len(), 1);
    assert_eq!(m2.get(0), None);
    assert_eq!(m2.get(1), None);
    assert_eq!(m2.get(64), Some(&64));
    assert_eq!(m2.values(), vec![64]);

    // the source still sees the staged values
    assert_eq!(m.len(), 3);
    assert_eq!(m.get(0), Some(&0));
    assert_eq!(m.get(1), Some(&1));
}

/// A staging-hit removal of an absent key changes nothing.
#[test]
fn staging_hit_remove_missing() {
    let m = IntMap::new().set(0, 0).set(1, 1);
    let m2 = m.remove(7); // same terminal range, vacant digit
    assert_eq!(m2.len(), 2);
    assert_eq!(m2.get(0), Some(&0));
    assert_eq!(m2.get(1), Some(&1));
}

/// A miss removal merges the pending run even when it collapses the trie
/// back down to the staging terminal.
#[test]
fn remove_miss_merges_pending_run() {
    let m = IntMap::new().set(64, 64).set(0, 0).set(1, 1);
    let m2 = m.remove(64);

    assert_eq!(m2.len(), 2);
    assert_eq!(m2.get(64), None);
    assert_eq!(m2.get(0), Some(&0));
    assert_eq!(m2.get(1), Some(&1));
    assert_eq!(m2.root_level(), 0);
}

/// A full terminal node (all 32 digits) promotes inside the cache and
/// demotes back out.
#[test]
fn full_terminal_roundtrip() {
    let mut m = IntMap::new();
    for i in 0_u32..32 {
        m = m.set(i, i);
    }
    assert_eq!(m.len(), 32);
    for i in 0_u32..32 {
        assert_eq!(m.get(i), Some(&i));
    }
    let m2 = m.remove(17);
    assert_eq!(m2.len(), 31);
    assert_eq!(m2.get(17), None);
    assert_eq!(m2.get(16), Some(&16));
    assert_eq!(m2.get(18), Some(&18));
}
