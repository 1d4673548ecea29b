//! Element-wise comparison of two sequences.

use crate::capability::{is_offloadable_callable, offloadable_pair, Sequence};
use crate::device::Primitives;
use crate::policy::ParUnseq;
use crate::{fallback, offload};

/// First index at which `first` and `second` differ, as a position in each.
///
/// Only the first `k = min(first.len(), second.len())` items are compared;
/// when they all match the result is `(k, k)`.
pub fn mismatch<D, S1, S2>(policy: &ParUnseq<D>, first: S1, second: S2) -> (usize, usize)
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    S1::Item: PartialEq<S2::Item>,
{
    mismatch_by(policy, first, second, |a: &S1::Item, b: &S2::Item| a == b)
}

pub fn mismatch_by<D, S1, S2, P>(policy: &ParUnseq<D>, first: S1, second: S2, pred: P) -> (usize, usize)
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    mismatch_as::<P, _, _, _, _>(policy, "mismatch", &first, &second, &pred)
}

fn mismatch_as<F, D, S1, S2, P>(
    policy: &ParUnseq<D>,
    algorithm: &'static str,
    first: &S1,
    second: &S2,
    pred: &P,
) -> (usize, usize)
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    if const { offloadable_pair::<S1, S2>() && is_offloadable_callable::<F>() } {
        if let (Some(a), Some(b)) = (first.as_contiguous(), second.as_contiguous()) {
            let k = a.len().min(b.len());
            return policy.settle(algorithm, (k, k), offload::mismatch(policy, a, b, pred));
        }
    }
    policy.reject_pair::<S1, S2, F>(algorithm, first, second);
    fallback::mismatch(&first.host_view(), &second.host_view(), pred)
}

/// True when `second` starts with the items of `first`.
///
/// `second` may be longer; use [`equal_ranges`] to also require equal
/// lengths.
pub fn equal<D, S1, S2>(policy: &ParUnseq<D>, first: S1, second: S2) -> bool
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    S1::Item: PartialEq<S2::Item>,
{
    equal_by(policy, first, second, |a: &S1::Item, b: &S2::Item| a == b)
}

pub fn equal_by<D, S1, S2, P>(policy: &ParUnseq<D>, first: S1, second: S2, pred: P) -> bool
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    prefix_matches::<P, _, _, _, _>(policy, "equal", &first, &second, &pred)
}

pub fn equal_ranges<D, S1, S2>(policy: &ParUnseq<D>, first: S1, second: S2) -> bool
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    S1::Item: PartialEq<S2::Item>,
{
    equal_ranges_by(policy, first, second, |a: &S1::Item, b: &S2::Item| a == b)
}

pub fn equal_ranges_by<D, S1, S2, P>(policy: &ParUnseq<D>, first: S1, second: S2, pred: P) -> bool
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    first.len() == second.len() && prefix_matches::<P, _, _, _, _>(policy, "equal_ranges", &first, &second, &pred)
}

fn prefix_matches<F, D, S1, S2, P>(
    policy: &ParUnseq<D>,
    algorithm: &'static str,
    first: &S1,
    second: &S2,
    pred: &P,
) -> bool
where
    D: Primitives,
    S1: Sequence,
    S2: Sequence,
    P: Fn(&S1::Item, &S2::Item) -> bool + Sync,
{
    let n = first.len();
    if second.len() < n {
        return false;
    }
    mismatch_as::<F, _, _, _, _>(policy, algorithm, first, second, pred).0 == n
}
