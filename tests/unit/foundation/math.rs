use super::*;

#[test]
fn same_seed_same_sequence() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn unit_interval_and_index_bounds() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.next_f64_01();
        assert!((0.0..1.0).contains(&v));
        assert!(rng.index(3) < 3);
    }
    assert_eq!(rng.index(1), 0);
}

#[test]
fn shuffle_is_a_permutation() {
    let mut rng = Rng64::new(99);
    let mut items = vec![1, 2, 3, 4, 5, 6];
    rng.shuffle(&mut items);
    let mut sorted = items.clone();
    sorted.sort();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn approx_eq_tolerance() {
    assert!(approx_eq(1.0, 1.0 + 1e-9, PERCENT_EPSILON));
    assert!(!approx_eq(1.0, 1.1, PERCENT_EPSILON));
}
