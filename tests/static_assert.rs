use stdpar::unittest::{assert_static, assert_static_on, expect_device_static_assert, expect_static_assert};
use stdpar::{find_if, offload, OffloadError, ParUnseq, StaticAssertFailure, UnitTestFailure};

#[test]
fn kernel_assertion_surfaces_as_device_assertion() {
    let policy = ParUnseq::new();
    let data: Vec<i64> = (0..50).collect();
    let line = line!() + 2;
    let err = offload::find_if(&policy, &data, &|x: &i64| {
        assert_static(*x < 40, file!(), line);
        false
    })
    .unwrap_err();
    match err {
        OffloadError::DeviceAssertion(StaticAssertFailure { file, line: at }) => {
            assert_eq!(file, file!());
            assert_eq!(at, line);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(policy.device().ledger().live_allocations, 0);
}

#[test]
fn kernel_assertion_collapses_to_sentinel_on_the_router() {
    let policy = ParUnseq::new();
    let data: Vec<i64> = (0..50).collect();
    let pos = find_if(&policy, &data, |x: &i64| {
        assert_static(*x != 10, file!(), line!());
        *x == 20
    });
    assert_eq!(pos, data.len());
}

#[test]
fn device_harness_reports_slot_assertions() {
    let hit = expect_device_static_assert(file!(), line!(), |slot| {
        for i in 0..4 {
            assert_static_on(slot, i < 3, "kernel.rs", 12);
        }
    })
    .unwrap();
    assert_eq!(hit, StaticAssertFailure { file: "kernel.rs", line: 12 });

    let missed = expect_device_static_assert("probe.rs", 7, |slot| assert_static_on(slot, true, "kernel.rs", 1));
    assert_eq!(missed, Err(UnitTestFailure::NotTriggered { file: "probe.rs", line: 7 }));
}

#[test]
fn host_harness_passes_other_panics_through() {
    let outcome = std::panic::catch_unwind(|| {
        let _ = expect_static_assert(file!(), line!(), || panic!("not an assertion"));
    });
    assert!(outcome.is_err());
}

#[test]
fn assert_static_assert_macro() {
    stdpar::assert_static_assert!(assert_static(false, file!(), line!()));
}

#[cfg(all(feature = "strict-offload", feature = "runtime-static-assert"))]
mod strict {
    use std::collections::VecDeque;
    use stdpar::{find, search, ParUnseq};

    #[test]
    fn rejected_sequence_trips_the_hook() {
        let policy = ParUnseq::new();
        let deque: VecDeque<u8> = VecDeque::from(vec![1, 2, 3]);
        stdpar::assert_static_assert!(find(&policy, &deque, &2u8));
    }

    #[test]
    fn owning_callable_trips_the_hook() {
        let policy = ParUnseq::new();
        let data = vec![1u8, 2, 3];
        let owned = vec![2u8];
        stdpar::assert_static_assert!(stdpar::find_if(&policy, &data, move |x: &u8| owned.contains(x)));
    }

    #[test]
    fn accepted_types_do_not_trip() {
        let policy = ParUnseq::new();
        let data = vec![1u8, 2, 3];
        assert_eq!(search(&policy, &data, &[2u8, 3]), 1);
    }
}
