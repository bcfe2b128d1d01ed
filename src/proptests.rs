use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

fn validate_tree(t: &ScapegoatTree<i64>) {
    fn walk(link: &Link<i64>, lo: Option<i64>, hi: Option<i64>, depth: usize, deepest: &mut usize) -> usize {
        let Some(node) = link else {
            return 0;
        };
        if let Some(lo) = lo {
            assert!(node.value > lo, "BST order broken at {}", node.value);
        }
        if let Some(hi) = hi {
            assert!(node.value < hi, "BST order broken at {}", node.value);
        }
        *deepest = (*deepest).max(depth);
        let left = walk(&node.left, lo, Some(node.value), depth + 1, deepest);
        let right = walk(&node.right, Some(node.value), hi, depth + 1, deepest);
        assert_eq!(
            node.size,
            1 + left + right,
            "stored subtree size must match children at {}",
            node.value
        );
        node.size
    }

    let mut deepest = 0usize;
    let reachable = walk(&t.root, None, None, 0, &mut deepest);
    assert_eq!(reachable, t.len, "reachable node count must match len");
    assert!(t.max_len >= t.len, "high-water mark below len");

    if t.len > 0 {
        let base = (1.0 / t.alpha()).ln();
        let loose = (t.max_len as f64).ln() / base;
        assert!(
            deepest as f64 <= loose + 1e-9,
            "depth {deepest} exceeds log(max_len) bound {loose}"
        );
        let tight = ((t.len + 1) as f64).ln() / base;
        assert!(
            t.height() as f64 <= tight.ceil() + 2.0,
            "height {} exceeds log(len) bound {tight}",
            t.height()
        );
    }
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "0i64..256")] i64),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0i64..256")] i64),
    InsertBatch(#[proptest(strategy = "prop::collection::vec(0i64..256, 0..8)")] Vec<i64>),
    RemoveBatch(#[proptest(strategy = "prop::collection::vec(0i64..256, 0..8)")] Vec<i64>),
    #[proptest(weight = 2)]
    Undo,
    Redo,
}

fn alpha_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.51), Just(0.6), Just(2.0 / 3.0), Just(0.75), Just(0.9)]
}

fn keys_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-500i64..500, 0..200)
}

/// Replays the tree's own history against a plain set to model undo/redo.
struct Model {
    set: BTreeSet<i64>,
    undo: Vec<Entry<i64>>,
    redo: Vec<Entry<i64>>,
}

impl Model {
    fn apply(&mut self, entry: &Entry<i64>, forward: bool) {
        match (entry, forward) {
            (Entry::Insert(k), true) | (Entry::Remove(k), false) => assert!(self.set.insert(*k)),
            (Entry::Remove(k), true) | (Entry::Insert(k), false) => assert!(self.set.remove(k)),
        }
    }

    fn insert(&mut self, k: i64) -> bool {
        let inserted = self.set.insert(k);
        if inserted {
            self.undo.push(Entry::Insert(k));
            self.redo.clear();
        }
        inserted
    }

    fn remove(&mut self, k: i64) -> bool {
        let removed = self.set.remove(&k);
        if removed {
            self.undo.push(Entry::Remove(k));
            self.redo.clear();
        }
        removed
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(alpha in alpha_strategy(), ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t = ScapegoatTree::with_alpha(alpha).unwrap();
        let mut m = Model { set: BTreeSet::new(), undo: Vec::new(), redo: Vec::new() };

        for op in ops {
            match op {
                Op::Insert(k) => prop_assert_eq!(t.insert(k), m.insert(k)),
                Op::Remove(k) => prop_assert_eq!(t.remove(&k), m.remove(k)),
                Op::InsertBatch(keys) => {
                    let expected = keys.iter().filter(|&&k| m.insert(k)).count();
                    prop_assert_eq!(t.insert_batch(keys), expected);
                }
                Op::RemoveBatch(keys) => {
                    let expected = keys.iter().filter(|&&k| m.remove(k)).count();
                    prop_assert_eq!(t.remove_batch(&keys), expected);
                }
                Op::Undo => {
                    let entry = m.undo.pop();
                    prop_assert_eq!(t.undo(), entry.is_some());
                    if let Some(entry) = entry {
                        m.apply(&entry, false);
                        m.redo.push(entry);
                    }
                }
                Op::Redo => {
                    let entry = m.redo.pop();
                    prop_assert_eq!(t.redo(), entry.is_some());
                    if let Some(entry) = entry {
                        m.apply(&entry, true);
                        m.undo.push(entry);
                    }
                }
            }

            prop_assert_eq!(t.len(), m.set.len());
            validate_tree(&t);
        }

        let got = t.inorder();
        let expected: Vec<i64> = m.set.iter().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_order_statistics(keys in keys_strategy(), lo in -600i64..600, span in 0i64..400) {
        let t: ScapegoatTree<i64> = {
            let mut t = ScapegoatTree::new();
            t.insert_batch(keys.iter().copied());
            t
        };
        let sorted: Vec<i64> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(t.inorder(), sorted.clone());

        for (i, k) in sorted.iter().enumerate() {
            prop_assert_eq!(t.kth_smallest(i + 1), Ok(k));
            prop_assert_eq!(t.rank(k), Ok(i + 1));
        }

        let hi = lo + span;
        let in_range: Vec<i64> = sorted.iter().copied().filter(|k| lo <= *k && *k <= hi).collect();
        prop_assert_eq!(t.sum_in_range(&lo, &hi), Ok(in_range.iter().sum::<i64>()));
        prop_assert_eq!(t.values_in_range(&lo, &hi), in_range);

        let next = sorted.iter().find(|&&k| k > lo);
        match next {
            Some(k) => prop_assert_eq!(t.successor(&lo), Ok(k)),
            None if sorted.is_empty() => prop_assert_eq!(t.successor(&lo), Err(TreeError::EmptyTree)),
            None => prop_assert_eq!(t.successor(&lo), Err(TreeError::NoSuccessor)),
        }
    }

    #[test]
    fn prop_merge_is_union(a in keys_strategy(), b in keys_strategy()) {
        let ta: ScapegoatTree<i64> = a.iter().copied().collect();
        let tb: ScapegoatTree<i64> = b.iter().copied().collect();
        let merged = ta.merge(tb);
        validate_tree(&merged);

        let expected: BTreeSet<i64> = a.iter().chain(b.iter()).copied().collect();
        prop_assert_eq!(merged.inorder(), expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_split_partitions(keys in keys_strategy(), pivot in -600i64..600) {
        let mut t = ScapegoatTree::new();
        t.insert_batch(keys.iter().copied());
        let had_pivot = t.contains(&pivot);
        let original = t.inorder();

        let (lo, hi) = t.split(&pivot);
        validate_tree(&lo);
        validate_tree(&hi);
        prop_assert!(lo.iter().all(|&k| k < pivot));
        prop_assert!(hi.iter().all(|&k| k > pivot));

        let mut rejoined = lo.inorder();
        if had_pivot {
            rejoined.push(pivot);
        }
        rejoined.extend(hi.inorder());
        prop_assert_eq!(rejoined, original);
    }

    #[test]
    fn prop_equality_ignores_insertion_order(keys in keys_strategy(), seed in any::<u64>()) {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let mut shuffled = keys.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut a = ScapegoatTree::new();
        a.insert_batch(keys);
        let mut b = ScapegoatTree::with_alpha(0.55).unwrap();
        b.insert_batch(shuffled);

        prop_assert_eq!(&a, &a);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&b, &a);
    }

    #[test]
    fn prop_insert_then_remove_restores(keys in keys_strategy(), extra in -600i64..600) {
        let mut t = ScapegoatTree::new();
        t.insert_batch(keys);
        prop_assume!(!t.contains(&extra));
        let before = t.inorder();

        prop_assert!(t.insert(extra));
        prop_assert!(t.remove(&extra));
        prop_assert_eq!(t.inorder(), before.clone());

        prop_assert!(t.undo());
        prop_assert!(t.contains(&extra));
        prop_assert!(t.undo());
        prop_assert_eq!(t.inorder(), before);
        validate_tree(&t);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<i64> = vec![1, 2, 3, 4, 5, 6, 7];
    let reference: ScapegoatTree<i64> = keys.iter().copied().collect();

    for_each_permutation(&keys, |perm| {
        let mut t = ScapegoatTree::new();
        for k in perm {
            assert!(t.insert(k));
            validate_tree(&t);
        }
        assert_eq!(t, reference);
        assert_eq!(t.inorder(), keys);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<i64> = vec![1, 2, 3, 4, 5, 6, 7];

    // Insert in a fixed order, then remove in all permutations.
    let mut base = ScapegoatTree::new();
    base.insert_batch(keys.iter().copied());

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        let mut m: BTreeSet<i64> = keys.iter().copied().collect();

        for k in perm {
            assert_eq!(t.remove(&k), m.remove(&k));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }
        assert_eq!(t.len(), 0);
        assert!(t.root.is_none());

        // Undoing the removals restores the full set; the inserts below them
        // unwind it again.
        for _ in 0..keys.len() {
            assert!(t.undo());
        }
        assert_eq!(t.inorder(), keys);
        validate_tree(&t);
        while t.undo() {}
        assert!(t.is_empty());
        while t.redo() {}
        assert!(t.is_empty());
    });
}
