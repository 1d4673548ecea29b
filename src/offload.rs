//! Device-level entry points.
//!
//! These drive the primitives directly through the two-phase adapter and
//! report backend failures as [`OffloadError`]. The algorithm functions at the
//! crate root call into here and fold errors into their "not found" sentinel;
//! callers that must tell a miss from a failed device can use these instead.
//!
//! Conventions that do not need the device (empty patterns, zero counts) are
//! resolved before any allocation happens.

use crate::device::Primitives;
use crate::policy::ParUnseq;
use crate::OffloadError;

fn position(word: u64) -> usize {
    word as usize
}

/// First offset at which `pattern` occurs in `input`; `0` for an empty
/// pattern, `input.len()` if absent.
pub fn search<D, T, U, P>(policy: &ParUnseq<D>, input: &[T], pattern: &[U], pred: &P) -> Result<usize, OffloadError>
where
    D: Primitives,
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    if pattern.is_empty() {
        return Ok(0);
    }
    let device = policy.device();
    policy
        .execution()
        .run(|launch| device.search(launch, input, pattern, pred))
        .map(position)
}

/// First offset starting `count` consecutive items matching `value`; `0` for
/// a zero count.
pub fn search_n<D, T, V, P>(
    policy: &ParUnseq<D>,
    input: &[T],
    count: usize,
    value: &V,
    pred: &P,
) -> Result<usize, OffloadError>
where
    D: Primitives,
    T: Sync,
    V: Sync,
    P: Fn(&T, &V) -> bool + Sync,
{
    if count == 0 {
        return Ok(0);
    }
    let device = policy.device();
    policy
        .execution()
        .run(|launch| device.search_n(launch, input, count, value, pred))
        .map(position)
}

/// Last offset at which `pattern` occurs; `input.len()` for an empty pattern.
pub fn find_end<D, T, U, P>(policy: &ParUnseq<D>, input: &[T], pattern: &[U], pred: &P) -> Result<usize, OffloadError>
where
    D: Primitives,
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    if pattern.is_empty() {
        return Ok(input.len());
    }
    let device = policy.device();
    policy
        .execution()
        .run(|launch| device.find_end(launch, input, pattern, pred))
        .map(position)
}

/// First offset whose item matches any item of `pattern`; `input.len()` for
/// an empty pattern.
pub fn find_first_of<D, T, U, P>(
    policy: &ParUnseq<D>,
    input: &[T],
    pattern: &[U],
    pred: &P,
) -> Result<usize, OffloadError>
where
    D: Primitives,
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    if pattern.is_empty() {
        return Ok(input.len());
    }
    let device = policy.device();
    policy
        .execution()
        .run(|launch| device.find_first_of(launch, input, pattern, pred))
        .map(position)
}

pub fn adjacent_find<D, T, P>(policy: &ParUnseq<D>, input: &[T], pred: &P) -> Result<usize, OffloadError>
where
    D: Primitives,
    T: Sync,
    P: Fn(&T, &T) -> bool + Sync,
{
    if input.is_empty() {
        return Ok(0);
    }
    let device = policy.device();
    policy
        .execution()
        .run(|launch| device.adjacent_find(launch, input, pred))
        .map(position)
}

pub fn find_if<D, T, P>(policy: &ParUnseq<D>, input: &[T], pred: &P) -> Result<usize, OffloadError>
where
    D: Primitives,
    T: Sync,
    P: Fn(&T) -> bool + Sync,
{
    let device = policy.device();
    policy
        .execution()
        .run(|launch| device.find_if(launch, input, pred))
        .map(position)
}

pub fn count_if<D, T, P>(policy: &ParUnseq<D>, input: &[T], pred: &P) -> Result<usize, OffloadError>
where
    D: Primitives,
    T: Sync,
    P: Fn(&T) -> bool + Sync,
{
    let device = policy.device();
    policy
        .execution()
        .run(|launch| device.count_if(launch, input, pred))
        .map(position)
}

/// First index where the two inputs disagree, within the shorter length.
pub fn mismatch<D, T, U, P>(
    policy: &ParUnseq<D>,
    first: &[T],
    second: &[U],
    pred: &P,
) -> Result<(usize, usize), OffloadError>
where
    D: Primitives,
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    let device = policy.device();
    let at = policy
        .execution()
        .run(|launch| device.mismatch(launch, first, second, pred))
        .map(position)?;
    Ok((at, at))
}
