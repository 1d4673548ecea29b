#![cfg(not(feature = "strict-offload"))]
use std::collections::{LinkedList, VecDeque};
use stdpar::{
    adjacent_find, adjacent_find_by, find_end, find_first_of, mismatch, search, search_by, search_n, search_n_by,
    ParUnseq,
};

#[test]
fn empty_pattern_conventions() {
    let policy = ParUnseq::new();
    let empty: [i32; 0] = [];
    let data = vec![5, 6, 7];

    assert_eq!(search(&policy, &data, &empty), 0);
    assert_eq!(search(&policy, &empty, &empty), 0);
    assert_eq!(find_first_of(&policy, &data, &empty), 3);
    assert_eq!(find_end(&policy, &data, &empty), 3);

    let deque: VecDeque<i32> = data.iter().copied().collect();
    assert_eq!(search(&policy, &deque, &empty), 0);
    assert_eq!(find_first_of(&policy, &deque, &empty), 3);
    assert_eq!(find_end(&policy, &deque, &empty), 3);

    // resolved before the device is touched
    assert_eq!(policy.device().ledger().total_allocations, 0);
}

#[test]
fn adjacent_find_cases() {
    let policy = ParUnseq::new();
    assert_eq!(adjacent_find(&policy, &[1, 1, 2, 3]), 0);
    assert_eq!(adjacent_find(&policy, &[1, 2, 3, 4]), 4);
    assert_eq!(adjacent_find(&policy, &Vec::<i32>::new()), 0);
    assert_eq!(adjacent_find(&policy, &[9]), 1);
    assert_eq!(adjacent_find_by(&policy, &[1, 2, 4, 3], |a: &i32, b: &i32| a > b), 2);

    let list: LinkedList<i32> = [1, 2, 2, 3].into_iter().collect();
    assert_eq!(adjacent_find(&policy, &list), 1);
}

#[test]
fn mismatch_cases() {
    let policy = ParUnseq::new();
    let a = vec![1, 2, 3];
    assert_eq!(mismatch(&policy, &a, &a), (3, 3));
    assert_eq!(mismatch(&policy, &[1, 2, 3], &[1, 9, 3]), (1, 1));
    assert_eq!(mismatch(&policy, &[1, 2, 3], &[1, 2]), (2, 2));
    assert_eq!(mismatch(&policy, &[1, 2], &[1, 2, 3, 4]), (2, 2));
}

#[test]
fn search_n_cases() {
    let policy = ParUnseq::new();
    assert_eq!(search_n(&policy, &[1, 1, 1, 2], 3, &1), 0);
    assert_eq!(search_n(&policy, &[1, 1, 2], 3, &1), 3);
    assert_eq!(search_n(&policy, &[2, 1, 1, 1], 3, &1), 1);
    assert_eq!(search_n(&policy, &[2, 2], 0, &1), 0);
    assert_eq!(search_n_by(&policy, &[5, 1, 7, 8, 9], 2, &6, |x: &i32, v: &i32| x > v), 2);
}

#[test]
fn search_finds_first_and_find_end_last() {
    let policy = ParUnseq::new();
    let data = b"abcabcab".to_vec();
    assert_eq!(search(&policy, &data, b"cab"), 2);
    assert_eq!(find_end(&policy, &data, b"cab"), 5);
    assert_eq!(search(&policy, &data, b"abcd"), 8);
    assert_eq!(search(&policy, b"ab", b"abc"), 2);
    assert_eq!(find_end(&policy, b"ab", b"abc"), 2);
    assert_eq!(find_first_of(&policy, &data, b"xyc"), 2);
    assert_eq!(find_first_of(&policy, &data, b"xyz"), 8);
}

#[test]
fn search_by_compares_mixed_types() {
    let policy = ParUnseq::new();
    let words = vec!["one", "two", "three", "four"];
    let lens = [3usize, 5];
    assert_eq!(search_by(&policy, &words, &lens, |w: &&str, n: &usize| w.len() == *n), 1);
}
