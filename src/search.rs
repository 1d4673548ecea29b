//! Subsequence searches: `search`, `search_n`, `find_end`, `find_first_of`,
//! `adjacent_find`.
//!
//! Each `_by` function is a router. Its `if const` picks one path per
//! instantiation; the plain variants compare with `==` and inherit the
//! routing of the `_by` form, since the equality closure is always
//! offloadable.

use crate::capability::{is_offloadable_callable, offloadable_pair, Sequence};
use crate::device::Primitives;
use crate::policy::ParUnseq;
use crate::{fallback, offload};

/// Position of the first occurrence of `pattern` in `input`.
///
/// An empty pattern matches at `0`; a miss returns `input.len()`.
pub fn search<D, S1, S2>(policy: &ParUnseq<D>, input: S1, pattern: S2) -> usize
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    S1::Item: PartialEq<S2::Item>,
{
    search_by(policy, input, pattern, |a: &S1::Item, b: &S2::Item| a == b)
}

pub fn search_by<D, S1, S2, P>(policy: &ParUnseq<D>, input: S1, pattern: S2, pred: P) -> usize
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    const NAME: &str = "search";
    if const { offloadable_pair::<S1, S2>() && is_offloadable_callable::<P>() } {
        if let (Some(items), Some(pat)) = (input.as_contiguous(), pattern.as_contiguous()) {
            return policy.settle(NAME, items.len(), offload::search(policy, items, pat, &pred));
        }
    }
    policy.reject_pair::<S1, S2, P>(NAME, &input, &pattern);
    fallback::search(&input.host_view(), &pattern.host_view(), &pred)
}

/// Position of the first run of `count` items equal to `value`.
///
/// A zero count matches at `0` without touching the device.
pub fn search_n<D, S, V>(policy: &ParUnseq<D>, input: S, count: usize, value: &V) -> usize
where
    D: Primitives,
    S: Sequence,
    V: Sync,
    S::Item: PartialEq<V>,
{
    search_n_by(policy, input, count, value, |a: &S::Item, b: &V| a == b)
}

pub fn search_n_by<D, S, V, P>(policy: &ParUnseq<D>, input: S, count: usize, value: &V, pred: P) -> usize
where
    D: Primitives,
    S: Sequence,
    V: Sync,
    P: Fn(&S::Item, &V) -> bool + Sync,
{
    const NAME: &str = "search_n";
    if const { S::OFFLOADABLE && is_offloadable_callable::<P>() } {
        if let Some(items) = input.as_contiguous() {
            return policy.settle(NAME, items.len(), offload::search_n(policy, items, count, value, &pred));
        }
    }
    policy.reject::<S, P>(NAME, &input);
    fallback::search_n(&input.host_view(), count, value, &pred)
}

/// Position of the last occurrence of `pattern`; `input.len()` when absent
/// or when the pattern is empty.
pub fn find_end<D, S1, S2>(policy: &ParUnseq<D>, input: S1, pattern: S2) -> usize
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    S1::Item: PartialEq<S2::Item>,
{
    find_end_by(policy, input, pattern, |a: &S1::Item, b: &S2::Item| a == b)
}

pub fn find_end_by<D, S1, S2, P>(policy: &ParUnseq<D>, input: S1, pattern: S2, pred: P) -> usize
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    const NAME: &str = "find_end";
    if const { offloadable_pair::<S1, S2>() && is_offloadable_callable::<P>() } {
        if let (Some(items), Some(pat)) = (input.as_contiguous(), pattern.as_contiguous()) {
            return policy.settle(NAME, items.len(), offload::find_end(policy, items, pat, &pred));
        }
    }
    policy.reject_pair::<S1, S2, P>(NAME, &input, &pattern);
    fallback::find_end(&input.host_view(), &pattern.host_view(), &pred)
}

/// Position of the first item equal to any item of `candidates`.
pub fn find_first_of<D, S1, S2>(policy: &ParUnseq<D>, input: S1, candidates: S2) -> usize
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    S1::Item: PartialEq<S2::Item>,
{
    find_first_of_by(policy, input, candidates, |a: &S1::Item, b: &S2::Item| a == b)
}

pub fn find_first_of_by<D, S1, S2, P>(policy: &ParUnseq<D>, input: S1, candidates: S2, pred: P) -> usize
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    const NAME: &str = "find_first_of";
    if const { offloadable_pair::<S1, S2>() && is_offloadable_callable::<P>() } {
        if let (Some(items), Some(cands)) = (input.as_contiguous(), candidates.as_contiguous()) {
            return policy.settle(NAME, items.len(), offload::find_first_of(policy, items, cands, &pred));
        }
    }
    policy.reject_pair::<S1, S2, P>(NAME, &input, &candidates);
    fallback::find_first_of(&input.host_view(), &candidates.host_view(), &pred)
}

/// Position of the first item equal to its successor.
pub fn adjacent_find<D, S>(policy: &ParUnseq<D>, input: S) -> usize
where
    D: Primitives,
    S: Sequence,
    S::Item: PartialEq,
{
    adjacent_find_by(policy, input, |a: &S::Item, b: &S::Item| a == b)
}

pub fn adjacent_find_by<D, S, P>(policy: &ParUnseq<D>, input: S, pred: P) -> usize
where
    D: Primitives,
    S: Sequence,
    P: Fn(&S::Item, &S::Item) -> bool + Sync,
{
    const NAME: &str = "adjacent_find";
    if const { S::OFFLOADABLE && is_offloadable_callable::<P>() } {
        if let Some(items) = input.as_contiguous() {
            return policy.settle(NAME, items.len(), offload::adjacent_find(policy, items, &pred));
        }
    }
    policy.reject::<S, P>(NAME, &input);
    fallback::adjacent_find(&input.host_view(), &pred)
}
