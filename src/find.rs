//! Single-sequence queries: `find*`, `count*` and the `*_of` family.
//!
//! The `*_of` and `find_if_not` algorithms run a derived test on the device.
//! The capability verdict is still taken on the caller's callable: the
//! derived test only borrows it.

use crate::capability::{is_offloadable_callable, Sequence};
use crate::device::Primitives;
use crate::policy::ParUnseq;
use crate::{fallback, offload};

/// Route a unary position query whose verdict comes from the callable `F`.
fn position<F, D, S, Q>(policy: &ParUnseq<D>, algorithm: &'static str, input: &S, test: &Q) -> usize
where
    D: Primitives,
    S: Sequence,
    Q: Fn(&S::Item) -> bool + Sync,
{
    if const { S::OFFLOADABLE && is_offloadable_callable::<F>() } {
        if let Some(items) = input.as_contiguous() {
            return policy.settle(algorithm, items.len(), offload::find_if(policy, items, test));
        }
    }
    policy.reject::<S, F>(algorithm, input);
    fallback::find_if(&input.host_view(), test)
}

fn tally<F, D, S, Q>(policy: &ParUnseq<D>, algorithm: &'static str, input: &S, test: &Q) -> usize
where
    D: Primitives,
    S: Sequence,
    Q: Fn(&S::Item) -> bool + Sync,
{
    if const { S::OFFLOADABLE && is_offloadable_callable::<F>() } {
        if let Some(items) = input.as_contiguous() {
            return policy.settle(algorithm, 0, offload::count_if(policy, items, test));
        }
    }
    policy.reject::<S, F>(algorithm, input);
    fallback::count_if(&input.host_view(), test)
}

/// Position of the first item satisfying `pred`, or `input.len()`.
pub fn find_if<D, S, P>(policy: &ParUnseq<D>, input: S, pred: P) -> usize
where
    D: Primitives,
    S: Sequence,
    P: Fn(&S::Item) -> bool + Sync,
{
    position::<P, _, _, _>(policy, "find_if", &input, &pred)
}

pub fn find_if_not<D, S, P>(policy: &ParUnseq<D>, input: S, pred: P) -> usize
where
    D: Primitives,
    S: Sequence,
    P: Fn(&S::Item) -> bool + Sync,
{
    position::<P, _, _, _>(policy, "find_if_not", &input, &|x: &S::Item| !pred(x))
}

pub fn find<D, S, V>(policy: &ParUnseq<D>, input: S, value: &V) -> usize
where
    D: Primitives,
    S: Sequence,
    V: Sync,
    S::Item: PartialEq<V>,
{
    let eq = |x: &S::Item| x == value;
    position::<(), _, _, _>(policy, "find", &input, &eq)
}

/// True when every item satisfies `pred`; vacuously true when empty.
pub fn all_of<D, S, P>(policy: &ParUnseq<D>, input: S, pred: P) -> bool
where
    D: Primitives,
    S: Sequence,
    P: Fn(&S::Item) -> bool + Sync,
{
    let n = input.len();
    position::<P, _, _, _>(policy, "all_of", &input, &|x: &S::Item| !pred(x)) == n
}

pub fn any_of<D, S, P>(policy: &ParUnseq<D>, input: S, pred: P) -> bool
where
    D: Primitives,
    S: Sequence,
    P: Fn(&S::Item) -> bool + Sync,
{
    let n = input.len();
    position::<P, _, _, _>(policy, "any_of", &input, &pred) != n
}

pub fn none_of<D, S, P>(policy: &ParUnseq<D>, input: S, pred: P) -> bool
where
    D: Primitives,
    S: Sequence,
    P: Fn(&S::Item) -> bool + Sync,
{
    let n = input.len();
    position::<P, _, _, _>(policy, "none_of", &input, &pred) == n
}

/// Number of items satisfying `pred`. A failed device run counts as `0`.
pub fn count_if<D, S, P>(policy: &ParUnseq<D>, input: S, pred: P) -> usize
where
    D: Primitives,
    S: Sequence,
    P: Fn(&S::Item) -> bool + Sync,
{
    tally::<P, _, _, _>(policy, "count_if", &input, &pred)
}

pub fn count<D, S, V>(policy: &ParUnseq<D>, input: S, value: &V) -> usize
where
    D: Primitives,
    S: Sequence,
    V: Sync,
    S::Item: PartialEq<V>,
{
    let eq = |x: &S::Item| x == value;
    tally::<(), _, _, _>(policy, "count", &input, &eq)
}
