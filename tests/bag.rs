// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

use itertools::Itertools;
use rand::prelude::*;
use rand::rngs::StdRng;

use pbfs::collections::{Bag, Pennant, BAG_SIZE, BLK_SIZE};

fn bag_of(values: std::ops::Range<usize>) -> Bag<usize> {
    let mut bag = Bag::new();
    for value in values {
        bag.insert(value);
    }
    bag
}

fn elements(bag: &Bag<usize>) -> Vec<usize> {
    bag.iter().copied().sorted().collect()
}

/// Checks every structural invariant a bag must uphold after any public
/// operation, walking the spine through `peek_split`.
fn assert_invariants(bag: &Bag<usize>) {
    assert!(
        bag.filling().len() < BLK_SIZE,
        "filling block over capacity: {}",
        bag.filling().len()
    );
    assert!(bag.fill() <= BAG_SIZE, "spine over capacity: {}", bag.fill());

    let mut total = bag.filling().len();
    let mut pos = bag.fill().checked_sub(1);
    while let Some(i) = pos {
        let (pennant, below) = bag.peek_split(i);
        if i == bag.fill() - 1 {
            assert!(pennant.is_some(), "top spine entry must be populated");
        }
        if let Some(pennant) = pennant {
            assert_eq!(pennant.rank(), i, "pennant of wrong rank at position {i}");
            assert_eq!(pennant.iter().count(), BLK_SIZE << i);
            assert_eq!(pennant.len(), BLK_SIZE << i);
            total += pennant.len();
        }
        pos = below;
    }

    assert_eq!(bag.num_elements(), total);
    assert_eq!(bag.iter().count(), total);
    assert_eq!(bag.is_empty(), total == 0);
}

#[test]
fn empty_bag() {
    let mut bag: Bag<usize> = Bag::new();
    assert!(bag.is_empty());
    assert_eq!(bag.num_elements(), 0);
    assert_eq!(bag.fill(), 0);
    assert!(bag.first().is_none());
    assert!(bag.split().is_none());
    assert_invariants(&bag);
}

#[test]
fn single_block_insertion() {
    let bag = bag_of(0..BLK_SIZE);
    assert_eq!(bag.filling().len(), 0);
    assert_eq!(bag.fill(), 1);
    assert!(bag.first().is_some());
    assert_eq!(bag.num_elements(), BLK_SIZE);
    assert_eq!(elements(&bag), (0..BLK_SIZE).collect::<Vec<_>>());
    assert_invariants(&bag);
}

#[test]
fn binomial_carry() {
    let bag = bag_of(0..3 * BLK_SIZE);
    assert_eq!(bag.fill(), 2);
    assert_eq!(bag.peek_split(0).0.map(Pennant::rank), Some(0));
    assert_eq!(bag.peek_split(1).0.map(Pennant::rank), Some(1));
    assert_eq!(bag.num_elements(), 3 * BLK_SIZE);
    assert_invariants(&bag);
}

#[test]
fn partial_insertions_stay_in_filling() {
    let bag = bag_of(0..BLK_SIZE - 1);
    assert_eq!(bag.fill(), 0);
    assert_eq!(bag.filling().len(), BLK_SIZE - 1);
    assert_eq!(bag.num_elements(), BLK_SIZE - 1);
    assert_invariants(&bag);
}

#[test]
fn merge_with_carry_in_filling() {
    let half = BLK_SIZE / 2 + 1;
    let mut a = bag_of(0..half);
    let b = bag_of(half..2 * half);
    a.merge(b);

    assert_eq!(a.fill(), 1);
    assert_eq!(a.peek_split(0).0.map(Pennant::rank), Some(0));
    assert_eq!(a.filling().len(), 2);
    assert_eq!(a.num_elements(), BLK_SIZE + 2);
    assert_eq!(elements(&a), (0..2 * half).collect::<Vec<_>>());
    assert_invariants(&a);
}

#[test]
fn merge_fillings_that_fit_one_block() {
    let mut a = bag_of(0..10);
    let b = bag_of(10..30);
    a.merge(b);
    assert_eq!(a.fill(), 0);
    assert_eq!(a.filling().len(), 30);
    assert_eq!(elements(&a), (0..30).collect::<Vec<_>>());
    assert_invariants(&a);
}

#[test]
fn merge_identity() {
    let mut a = bag_of(0..3 * BLK_SIZE + 17);
    let expected = elements(&a);

    a.merge(Bag::new());
    assert_eq!(elements(&a), expected);
    assert_invariants(&a);

    let mut empty = Bag::new();
    empty.merge(a);
    assert_eq!(elements(&empty), expected);
    assert_invariants(&empty);
}

#[test]
fn merge_commutes_on_multisets() {
    for (left, right) in [
        (0, 0),
        (1, BLK_SIZE),
        (2 * BLK_SIZE + 3, 5 * BLK_SIZE + BLK_SIZE / 2),
        (7 * BLK_SIZE - 1, BLK_SIZE + 1),
    ] {
        let mut ab = bag_of(0..left);
        ab.merge(bag_of(left..left + right));
        let mut ba = bag_of(left..left + right);
        ba.merge(bag_of(0..left));

        assert_eq!(elements(&ab), elements(&ba));
        assert_eq!(elements(&ab), (0..left + right).collect::<Vec<_>>());
        assert_invariants(&ab);
        assert_invariants(&ba);
    }
}

#[test]
fn merge_associates_on_multisets() {
    let sizes = [2 * BLK_SIZE + 3, BLK_SIZE / 2 + 1, 4 * BLK_SIZE + 99];
    let bounds = [0, sizes[0], sizes[0] + sizes[1], sizes.iter().sum()];
    let part = |i: usize| bag_of(bounds[i]..bounds[i + 1]);

    // (a + b) + c
    let mut left = part(0);
    left.merge(part(1));
    left.merge(part(2));

    // a + (b + c)
    let mut tail = part(1);
    tail.merge(part(2));
    let mut right = part(0);
    right.merge(tail);

    assert_eq!(elements(&left), elements(&right));
    assert_eq!(elements(&left), (0..bounds[3]).collect::<Vec<_>>());
    assert_invariants(&left);
    assert_invariants(&right);
}

#[test]
fn inserting_equals_merging_singletons() {
    let count = BLK_SIZE + 123;
    let reference = bag_of(0..count);

    let mut rng = StdRng::seed_from_u64(0x0bA6);
    let mut order: Vec<usize> = (0..count).collect();
    order.shuffle(&mut rng);

    let mut merged = Bag::new();
    for value in order {
        let mut singleton = Bag::new();
        singleton.insert(value);
        merged.merge(singleton);
    }

    assert_eq!(elements(&merged), elements(&reference));
    assert_invariants(&merged);
}

#[test]
fn pennant_round_trip() {
    let mut bag = bag_of(0..2 * BLK_SIZE);
    let mut pennant = bag.split().expect("bag holds one rank-1 pennant");
    assert_eq!(pennant.rank(), 1);

    let other = pennant.split();
    assert_eq!(pennant.rank(), 0);
    assert_eq!(other.rank(), 0);

    pennant.combine(other);
    assert_eq!(pennant.rank(), 1);
    assert_eq!(
        pennant.iter().copied().sorted().collect::<Vec<_>>(),
        (0..2 * BLK_SIZE).collect::<Vec<_>>()
    );
}

#[test]
fn split_drains_every_pennant() {
    // 11 blocks = binary 1011, plus a partial filling.
    let count = 11 * BLK_SIZE + 77;
    let mut bag = bag_of(0..count);
    assert_invariants(&bag);

    let mut drained: Vec<usize> = Vec::new();
    let mut ranks: Vec<usize> = Vec::new();
    while let Some(pennant) = bag.split() {
        ranks.push(pennant.rank());
        drained.extend(pennant.iter().copied());
        assert_invariants(&bag);
    }

    assert_eq!(ranks, vec![3, 1, 0], "pennants pop from the top down");
    assert_eq!(bag.fill(), 0);
    assert_eq!(bag.filling().len(), 77);

    drained.extend(bag.filling().iter().copied());
    drained.sort();
    assert_eq!(drained, (0..count).collect::<Vec<_>>());
}

#[test]
fn clear_empties_the_bag() {
    let mut bag = bag_of(0..4 * BLK_SIZE + 2);
    bag.clear();
    assert!(bag.is_empty());
    assert_eq!(bag.num_elements(), 0);
    assert_invariants(&bag);

    // The bag is reusable after a clear.
    bag.insert(42);
    assert_eq!(elements(&bag), vec![42]);
    assert_invariants(&bag);
}

#[test]
fn random_op_mix_upholds_invariants() {
    let mut rng = StdRng::seed_from_u64(0xF0571);
    let mut bag = Bag::new();
    let mut expected: Vec<usize> = Vec::new();
    let mut next_value = 0;

    for _ in 0..40 {
        if rng.gen_bool(0.7) {
            let count = rng.gen_range(1..3 * BLK_SIZE);
            for _ in 0..count {
                bag.insert(next_value);
                expected.push(next_value);
                next_value += 1;
            }
        } else {
            let count = rng.gen_range(1..2 * BLK_SIZE);
            let mut other = Bag::new();
            for _ in 0..count {
                other.insert(next_value);
                expected.push(next_value);
                next_value += 1;
            }
            bag.merge(other);
        }
        assert_invariants(&bag);
    }

    expected.sort();
    assert_eq!(elements(&bag), expected);
}
