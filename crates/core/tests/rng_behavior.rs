use pontoon_core::GameRng;

#[test]
fn equal_seeds_produce_identical_streams() {
    let mut a = GameRng::from_seed(2024);
    let mut b = GameRng::from_seed(2024);
    for _ in 0..1000 {
        assert_eq!(a.int_in(0, 1_000_000), b.int_in(0, 1_000_000));
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = GameRng::from_seed(1);
    let mut b = GameRng::from_seed(2);
    let same = (0..64).filter(|_| a.int_in(0, 255) == b.int_in(0, 255)).count();
    assert!(same < 16);
}

#[test]
fn degenerate_and_inverted_ranges() {
    let mut rng = GameRng::from_seed(5);
    assert_eq!(rng.int_in(9, 9), 9);
    for _ in 0..1000 {
        let v = rng.int_in(20, -3);
        assert!((-3..=20).contains(&v));
    }
}

#[test]
fn int_in_is_free_of_modulo_bias() {
    let mut rng = GameRng::from_seed(42);
    const SAMPLES: u64 = 1_000_000;
    let mut buckets = [0u64; 7];
    for _ in 0..SAMPLES {
        buckets[rng.int_in(0, 6) as usize] += 1;
    }

    let expected = SAMPLES as f64 / 7.0;
    let chi_square: f64 = buckets
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // 6 degrees of freedom; 22.46 is the 0.001 critical value.
    assert!(chi_square < 22.46, "chi-square {chi_square} too high: {buckets:?}");
}

#[test]
fn float_in_stays_in_range() {
    let mut rng = GameRng::from_seed(8);
    for _ in 0..10_000 {
        let v = rng.float_in(-2.5, 7.5);
        assert!((-2.5..=7.5).contains(&v));
    }
}

#[test]
fn chance_extremes_are_exact() {
    let mut rng = GameRng::from_seed(13);
    for _ in 0..100 {
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
    }
}

#[test]
fn shuffle_is_a_permutation() {
    let mut rng = GameRng::from_seed(77);
    let mut items: Vec<u32> = (0..52).collect();
    rng.shuffle(&mut items);
    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..52).collect::<Vec<_>>());
    assert_ne!(items, (0..52).collect::<Vec<_>>());
}

#[test]
fn seed_accessor_reports_the_construction_seed() {
    let rng = GameRng::from_seed(9001);
    assert_eq!(rng.seed(), 9001);
}
