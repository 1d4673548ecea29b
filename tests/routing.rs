#![cfg(not(feature = "strict-offload"))]
use std::collections::{BTreeSet, LinkedList, VecDeque};
use stdpar::{
    count, find_if, is_offloadable_callable, is_offloadable_sequence, offloadable_pair, route_with, search,
    mismatch, Config, DiagnosticsMode, Forward, HostView, IteratorCategory, ParUnseq, Rejection, Route, Sequence,
};

#[test]
fn verdicts_follow_iterator_category() {
    assert!(is_offloadable_sequence::<&Vec<u8>>());
    assert!(is_offloadable_sequence::<&[u8]>());
    assert!(is_offloadable_sequence::<&[u8; 4]>());
    assert!(!is_offloadable_sequence::<&VecDeque<u8>>());
    assert!(!is_offloadable_sequence::<&LinkedList<u8>>());
    assert!(!is_offloadable_sequence::<&BTreeSet<u8>>());
    assert!(!is_offloadable_sequence::<Forward<'_, std::slice::Iter<'_, u8>>>());
    assert!(!offloadable_pair::<&Vec<u8>, &VecDeque<u8>>());
    assert_eq!(<&VecDeque<u8> as Sequence>::CATEGORY, IteratorCategory::RandomAccess);
    assert_eq!(<&LinkedList<u8> as Sequence>::CATEGORY, IteratorCategory::Bidirectional);
}

#[test]
fn callable_verdict_dominates() {
    assert_eq!(route_with::<&Vec<u8>, fn(&u8) -> bool>(), Route::Offload);
    assert_eq!(route_with::<&Vec<u8>, Box<dyn Fn(&u8) -> bool>>(), Route::Fallback);
    assert_eq!(route_with::<&VecDeque<u8>, fn(&u8) -> bool>(), Route::Fallback);
    assert!(!is_offloadable_callable::<[u8; 8192]>());
}

#[test]
fn contiguous_input_is_offloaded() {
    let policy = ParUnseq::new();
    let data = vec![3u8, 1, 4, 1, 5];
    assert_eq!(find_if(&policy, &data, |x: &u8| *x > 3), 2);
    assert_eq!(policy.device().ledger().launches, 1);
    assert_eq!(policy.diagnostics().iterator_rejections(), 0);
    assert_eq!(policy.diagnostics().callable_rejections(), 0);
}

#[test]
fn empty_contiguous_input_still_offloads() {
    let policy = ParUnseq::new();
    let data: Vec<u8> = Vec::new();
    assert_eq!(find_if(&policy, &data, |x: &u8| *x > 3), 0);
    assert_eq!(count(&policy, &data, &1u8), 0);
    assert_eq!(policy.device().ledger().launches, 2);
}

#[test]
fn non_contiguous_inputs_fall_back() {
    let policy = ParUnseq::with_config(Config {
        diagnostics: DiagnosticsMode::Off,
        ..Config::default()
    });
    let deque: VecDeque<u8> = [1, 2, 3, 4].into_iter().collect();
    let list: LinkedList<u8> = [1, 2, 3, 4].into_iter().collect();
    let set: BTreeSet<u8> = [1, 2, 3, 4].into_iter().collect();
    let raw = [1u8, 2, 3, 4];

    assert_eq!(search(&policy, &deque, &[3u8, 4]), 2);
    match policy.diagnostics().last_rejection() {
        Some(("search", Rejection::IteratorCategory { category, .. })) => {
            assert_eq!(category, IteratorCategory::RandomAccess)
        }
        other => panic!("unexpected rejection {other:?}"),
    }
    assert_eq!(search(&policy, &list, &[2u8]), 1);
    assert_eq!(find_if(&policy, &set, |x: &u8| *x == 4), 3);
    assert_eq!(find_if(&policy, Forward::new(raw.iter().rev()), |x: &u8| *x == 1), 3);

    assert_eq!(policy.diagnostics().iterator_rejections(), 4);
    assert_eq!(policy.device().ledger().launches, 0);
}

#[test]
fn heap_owning_callable_falls_back() {
    let policy = ParUnseq::new();
    let data = vec![5u8, 6, 7, 8];
    let wanted = vec![7u8, 8];
    let pos = find_if(&policy, &data, move |x: &u8| wanted.contains(x));
    assert_eq!(pos, 2);
    assert_eq!(policy.device().ledger().launches, 0);
    assert_eq!(policy.diagnostics().callable_rejections(), 1);
    assert!(matches!(
        policy.diagnostics().last_rejection(),
        Some(("find_if", Rejection::CallableType { .. }))
    ));

    // a borrowing closure is fine
    let wanted = [7u8, 8];
    let pos = find_if(&policy, &data, |x: &u8| wanted.contains(x));
    assert_eq!(pos, 2);
    assert_eq!(policy.device().ledger().launches, 1);
}

#[test]
fn reset_clears_counters() {
    let policy = ParUnseq::new();
    let deque: VecDeque<u8> = VecDeque::from(vec![1, 2]);
    count(&policy, &deque, &1u8);
    assert_eq!(policy.diagnostics().iterator_rejections(), 1);
    policy.diagnostics().reset();
    assert_eq!(policy.diagnostics().iterator_rejections(), 0);
    assert!(policy.diagnostics().last_rejection().is_none());
}

/// Claims contiguous storage but never hands it out.
struct Withheld<'a>(&'a [u8]);

impl<'a> Sequence for Withheld<'a> {
    type Item = u8;

    const CATEGORY: IteratorCategory = IteratorCategory::Contiguous;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_contiguous(&self) -> Option<&[u8]> {
        None
    }

    fn host_view(&self) -> HostView<'_, u8> {
        HostView::Gathered(self.0.iter().collect())
    }
}

#[test]
fn withheld_storage_is_recorded() {
    let policy = ParUnseq::new();
    let data = [4u8, 5, 6, 5];
    assert!(is_offloadable_sequence::<Withheld<'_>>());

    assert_eq!(find_if(&policy, Withheld(&data), |x: &u8| *x == 6), 2);
    assert_eq!(policy.diagnostics().iterator_rejections(), 1);
    assert!(matches!(
        policy.diagnostics().last_rejection(),
        Some(("find_if", Rejection::MissingStorage { .. }))
    ));

    assert_eq!(search(&policy, &data, Withheld(&[5u8, 6])), 1);
    assert_eq!(mismatch(&policy, Withheld(&data), Withheld(&[4u8, 9])), (1, 1));
    // one record per sequence that withheld its storage
    assert_eq!(policy.diagnostics().iterator_rejections(), 4);
    assert_eq!(policy.diagnostics().callable_rejections(), 0);
    assert_eq!(policy.device().ledger().launches, 0);
}
