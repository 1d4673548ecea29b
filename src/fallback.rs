//! Host fallback: the same algorithms on the rayon pool.
//!
//! Used whenever the capability verdict rules out the device. Results match
//! the offloaded path for every input, including the empty-pattern
//! conventions.

use rayon::prelude::*;

use crate::capability::HostView;

pub fn search<T, U, P>(input: &HostView<'_, T>, pattern: &HostView<'_, U>, pred: &P) -> usize
where
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    let (n, m) = (input.len(), pattern.len());
    if m == 0 {
        return 0;
    }
    if m > n {
        return n;
    }
    (0..n - m + 1)
        .into_par_iter()
        .position_first(|i| (0..m).all(|j| pred(input.get(i + j), pattern.get(j))))
        .unwrap_or(n)
}

pub fn search_n<T, V, P>(input: &HostView<'_, T>, count: usize, value: &V, pred: &P) -> usize
where
    T: Sync,
    V: Sync,
    P: Fn(&T, &V) -> bool + Sync,
{
    let n = input.len();
    if count == 0 {
        return 0;
    }
    if count > n {
        return n;
    }
    (0..n - count + 1)
        .into_par_iter()
        .position_first(|i| (i..i + count).all(|k| pred(input.get(k), value)))
        .unwrap_or(n)
}

pub fn find_end<T, U, P>(input: &HostView<'_, T>, pattern: &HostView<'_, U>, pred: &P) -> usize
where
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    let (n, m) = (input.len(), pattern.len());
    if m == 0 || m > n {
        return n;
    }
    (0..n - m + 1)
        .into_par_iter()
        .position_last(|i| (0..m).all(|j| pred(input.get(i + j), pattern.get(j))))
        .unwrap_or(n)
}

pub fn find_first_of<T, U, P>(input: &HostView<'_, T>, pattern: &HostView<'_, U>, pred: &P) -> usize
where
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    let n = input.len();
    if pattern.is_empty() {
        return n;
    }
    (0..n)
        .into_par_iter()
        .position_first(|i| (0..pattern.len()).any(|j| pred(input.get(i), pattern.get(j))))
        .unwrap_or(n)
}

pub fn adjacent_find<T, P>(input: &HostView<'_, T>, pred: &P) -> usize
where
    T: Sync,
    P: Fn(&T, &T) -> bool + Sync,
{
    let n = input.len();
    (0..n.saturating_sub(1))
        .into_par_iter()
        .position_first(|i| pred(input.get(i), input.get(i + 1)))
        .unwrap_or(n)
}

pub fn find_if<T, P>(input: &HostView<'_, T>, pred: &P) -> usize
where
    T: Sync,
    P: Fn(&T) -> bool + Sync,
{
    let n = input.len();
    (0..n)
        .into_par_iter()
        .position_first(|i| pred(input.get(i)))
        .unwrap_or(n)
}

pub fn count_if<T, P>(input: &HostView<'_, T>, pred: &P) -> usize
where
    T: Sync,
    P: Fn(&T) -> bool + Sync,
{
    (0..input.len())
        .into_par_iter()
        .filter(|&i| pred(input.get(i)))
        .count()
}

pub fn mismatch<T, U, P>(first: &HostView<'_, T>, second: &HostView<'_, U>, pred: &P) -> (usize, usize)
where
    T: Sync,
    U: Sync,
    P: Fn(&T, &U) -> bool + Sync,
{
    let k = first.len().min(second.len());
    let at = (0..k)
        .into_par_iter()
        .position_first(|i| !pred(first.get(i), second.get(i)))
        .unwrap_or(k);
    (at, at)
}
