use crate::IntMap;

/// Keys 5 and 37 collide on their terminal digit but have different
/// level-1 parents.
#[test]
fn level_one_digit_collision() {
    let m = IntMap::new().set(5, "a").set(37, "b");
    assert_eq!(m.len(), 2);
    assert_eq!(m.root_level(), 1);
    assert_eq!(m.get(5), Some(&"a"));
    assert_eq!(m.get(37), Some(&"b"));

    let m2 = m.remove(5);
    assert_eq!(m2.len(), 1);
    assert_eq!(m2.get(5), None);
    assert_eq!(m2.get(37), Some(&"b"));
}

/// Growing to the maximum root level must not corrupt existing entries.
#[test]
fn zero_then_top_bit() {
    let m = IntMap::new().set(0, "zero").set(1 << 31, "top");
    assert_eq!(m.root_level(), 6);
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(0), Some(&"zero"));
    assert_eq!(m.get(1 << 31), Some(&"top"));
}

/// Removing the deep key shrinks the trie back to the minimal depth.
#[test]
fn depth_reduction_on_remove() {
    let m = IntMap::new().set(0, "zero").set(1 << 31, "top");
    let m2 = m.remove(1 << 31);
    assert_eq!(m2.root_level(), 0);
    assert_eq!(m2.len(), 1);
    assert_eq!(m2.get(0), Some(&"zero"));
    assert_eq!(m2.get(1 << 31), None);
}

/// A single wide key builds a sparse-1 chain of the right depth.
#[test]
fn single_wide_key() {
    let k = 32 * 32 * 32 * 32 + 1;
    let m = IntMap::new().set(k, k);
    assert_eq!(m.root_level(), 4);
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(k), Some(&k));
    assert_eq!(m.get(0), None);
    assert_eq!(m.get(1), None);
}

/// Growth by more than one level at a time wraps the old root repeatedly.
#[test]
fn multi_level_growth() {
    let mut m = IntMap::new();
    let keys = [0_u32, 40, 33_000, 1 << 29];
    for &k in &keys {
        m = m.set(k, k);
    }
    assert_eq!(m.root_level(), 5);
    assert_eq!(m.len(), 4);
    for &k in &keys {
        assert_eq!(m.get(k), Some(&k));
    }
}

/// Mixed small and large keys across several trie shapes at once.
#[test]
fn multi_add() {
    let data = [0_u32, 1, 32, 4, 10, 666, 669, 36, 37];
    let mut m = IntMap::new();
    for &k in &data {
        m = m.set(k, k);
    }
    assert_eq!(m.len(), data.len());

    let mut expected = data.to_vec();
    expected.sort_unstable();
    assert_eq!(m.values(), expected);
}

#[test]
fn max_key() {
    let m = IntMap::new().set(u32::MAX, "max").set(0, "min");
    assert_eq!(m.get(u32::MAX), Some(&"max"));
    assert_eq!(m.get(0), Some(&"min"));
    assert_eq!(m.get(u32::MAX - 1), None);
}
