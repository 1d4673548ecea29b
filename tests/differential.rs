#![cfg(not(feature = "strict-offload"))]
//! The device path and the host fallback must agree on every input.
//!
//! The same data is fed once as a `Vec` (offloaded) and once as a `VecDeque`
//! (rejected, so it runs on the host).

use proptest::prelude::*;
use std::collections::VecDeque;
use stdpar::*;

fn with_tiles(tile_size: usize) -> ParUnseq {
    ParUnseq::with_config(Config {
        tile_size,
        diagnostics: DiagnosticsMode::Off,
        ..Config::default()
    })
}

fn deque(v: &[u8]) -> VecDeque<u8> {
    v.iter().copied().collect()
}

proptest! {
    #[test]
    fn search_family_agrees(
        tile in 1usize..9,
        hay in prop::collection::vec(0u8..4, 0..64),
        pat in prop::collection::vec(0u8..4, 0..4),
    ) {
        let policy = with_tiles(tile);
        let (dh, dp) = (deque(&hay), deque(&pat));
        prop_assert_eq!(search(&policy, &hay, &pat), search(&policy, &dh, &dp));
        prop_assert_eq!(find_end(&policy, &hay, &pat), find_end(&policy, &dh, &dp));
        prop_assert_eq!(find_first_of(&policy, &hay, &pat), find_first_of(&policy, &dh, &dp));
        prop_assert_eq!(adjacent_find(&policy, &hay), adjacent_find(&policy, &dh));
        prop_assert_eq!(policy.device().ledger().live_allocations, 0);
    }

    #[test]
    fn search_n_agrees(
        tile in 1usize..9,
        hay in prop::collection::vec(0u8..3, 0..64),
        count in 0usize..6,
        value in 0u8..3,
    ) {
        let policy = with_tiles(tile);
        let dh = deque(&hay);
        prop_assert_eq!(search_n(&policy, &hay, count, &value), search_n(&policy, &dh, count, &value));
    }

    #[test]
    fn predicates_agree(
        tile in 1usize..9,
        hay in prop::collection::vec(any::<u8>(), 0..96),
        cut in any::<u8>(),
    ) {
        let policy = with_tiles(tile);
        let dh = deque(&hay);
        let above = |x: &u8| *x > cut;
        prop_assert_eq!(find_if(&policy, &hay, above), find_if(&policy, &dh, above));
        prop_assert_eq!(find_if_not(&policy, &hay, above), find_if_not(&policy, &dh, above));
        prop_assert_eq!(count_if(&policy, &hay, above), count_if(&policy, &dh, above));
        prop_assert_eq!(all_of(&policy, &hay, above), all_of(&policy, &dh, above));
        prop_assert_eq!(any_of(&policy, &hay, above), any_of(&policy, &dh, above));
        prop_assert_eq!(none_of(&policy, &hay, above), none_of(&policy, &dh, above));
        prop_assert_eq!(find(&policy, &hay, &cut), find(&policy, &dh, &cut));
        prop_assert_eq!(count(&policy, &hay, &cut), count(&policy, &dh, &cut));
    }

    #[test]
    fn comparisons_agree(
        tile in 1usize..9,
        a in prop::collection::vec(0u8..3, 0..40),
        b in prop::collection::vec(0u8..3, 0..40),
    ) {
        let policy = with_tiles(tile);
        let (da, db) = (deque(&a), deque(&b));
        prop_assert_eq!(mismatch(&policy, &a, &b), mismatch(&policy, &da, &db));
        prop_assert_eq!(equal(&policy, &a, &b), equal(&policy, &da, &db));
        prop_assert_eq!(equal_ranges(&policy, &a, &b), equal_ranges(&policy, &da, &db));
        prop_assert_eq!(equal_ranges(&policy, &a, &b), a == b);
    }

    #[test]
    fn search_matches_naive_scan(
        hay in prop::collection::vec(0u8..3, 0..48),
        pat in prop::collection::vec(0u8..3, 1..4),
    ) {
        let policy = ParUnseq::new();
        let expected = hay.windows(pat.len()).position(|w| w == &pat[..]).unwrap_or(hay.len());
        prop_assert_eq!(search(&policy, &hay, &pat), expected);
    }

    #[test]
    fn ordered_predicates_agree(
        tile in 1usize..9,
        hay in prop::collection::vec(0u8..4, 0..64),
        pat in prop::collection::vec(0u8..4, 0..4),
        value in 0u8..4,
        count in 0usize..4,
    ) {
        // `a < b` is not symmetric, so a swapped argument order shows up
        let less = |a: &u8, b: &u8| a < b;
        let policy = with_tiles(tile);
        let (dh, dp) = (deque(&hay), deque(&pat));
        prop_assert_eq!(search_by(&policy, &hay, &pat, less), search_by(&policy, &dh, &dp, less));
        prop_assert_eq!(find_end_by(&policy, &hay, &pat, less), find_end_by(&policy, &dh, &dp, less));
        prop_assert_eq!(find_first_of_by(&policy, &hay, &pat, less), find_first_of_by(&policy, &dh, &dp, less));
        prop_assert_eq!(adjacent_find_by(&policy, &hay, less), adjacent_find_by(&policy, &dh, less));
        prop_assert_eq!(
            search_n_by(&policy, &hay, count, &value, less),
            search_n_by(&policy, &dh, count, &value, less)
        );
        prop_assert_eq!(mismatch_by(&policy, &hay, &pat, less), mismatch_by(&policy, &dh, &dp, less));
        prop_assert_eq!(equal_by(&policy, &pat, &hay, less), equal_by(&policy, &dp, &dh, less));
        prop_assert_eq!(equal_ranges_by(&policy, &hay, &pat, less), equal_ranges_by(&policy, &dh, &dp, less));

        let expected = if pat.is_empty() {
            0
        } else {
            hay.windows(pat.len())
                .position(|w| w.iter().zip(&pat).all(|(a, b)| a < b))
                .unwrap_or(hay.len())
        };
        prop_assert_eq!(search_by(&policy, &hay, &pat, less), expected);
        let ascent = hay.windows(2).position(|w| w[0] < w[1]).unwrap_or(hay.len());
        prop_assert_eq!(adjacent_find_by(&policy, &hay, less), ascent);
        prop_assert_eq!(policy.device().ledger().live_allocations, 0);
    }
}

#[test]
fn equal_allows_longer_second_range() {
    let policy = ParUnseq::new();
    let short = vec![1, 2, 3];
    let long = vec![1, 2, 3, 4];
    assert!(equal(&policy, &short, &long));
    assert!(!equal(&policy, &long, &short));
    assert!(!equal_ranges(&policy, &short, &long));
    assert!(equal_by(&policy, &short, &[2, 4, 6], |a: &i32, b: &i32| a * 2 == *b));
    assert!(equal_ranges_by(&policy, &[1, 2], &[-1, -2], |a: &i32, b: &i32| *a == -b));
    assert_eq!(mismatch_by(&policy, &[1, 2, 3], &[1, 2, 4], |a: &i32, b: &i32| a == b), (2, 2));
}
