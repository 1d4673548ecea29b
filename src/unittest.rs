//! Static-assertion test harness.
//!
//! Capability checks are compile-time assertions, which a test cannot
//! observe directly. With the `runtime-static-assert` feature,
//! [`stdpar_static_assert!`](crate::stdpar_static_assert) is evaluated at run
//! time instead: on the host a failed assertion unwinds with a
//! [`StaticAssertFailure`] payload, in device code it is written into the
//! invocation's [`StatusSlot`]. The `expect_*` helpers and
//! [`assert_static_assert!`](crate::assert_static_assert) turn either signal
//! into a test verdict.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::status::StatusSlot;

/// Location of a static assertion that did not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAssertFailure {
    pub file: &'static str,
    pub line: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnitTestFailure {
    #[error("[{file}:{line}] did not trigger a static assertion")]
    NotTriggered { file: &'static str, line: u32 },
}

/// Host-side assertion: unwinds with a [`StaticAssertFailure`] payload.
pub fn assert_static(condition: bool, file: &'static str, line: u32) {
    if !condition {
        panic::panic_any(StaticAssertFailure { file, line });
    }
}

/// Device-side assertion: records the failure in `slot` and keeps running.
pub fn assert_static_on(slot: &StatusSlot, condition: bool, file: &'static str, line: u32) {
    if !condition {
        slot.raise_assertion(StaticAssertFailure { file, line });
    }
}

/// Run `f` and require that it trips a host-side static assertion.
///
/// Panics that are not static assertions are resumed unchanged.
pub fn expect_static_assert<F>(file: &'static str, line: u32, f: F) -> Result<StaticAssertFailure, UnitTestFailure>
where
    F: FnOnce(),
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => Err(UnitTestFailure::NotTriggered { file, line }),
        Err(payload) => match payload.downcast::<StaticAssertFailure>() {
            Ok(failure) => Ok(*failure),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Run `f` with a fresh status slot and require that either the host side
/// unwinds with a static assertion or the slot records one.
pub fn expect_device_static_assert<F>(
    file: &'static str,
    line: u32,
    f: F,
) -> Result<StaticAssertFailure, UnitTestFailure>
where
    F: FnOnce(&StatusSlot),
{
    let slot = StatusSlot::new();
    match expect_static_assert(file, line, || f(&slot)) {
        Ok(failure) => Ok(failure),
        Err(not_triggered) => slot.assertion().ok_or(not_triggered),
    }
}

/// Compile-time assertion, checked at run time under `runtime-static-assert`.
#[cfg(feature = "runtime-static-assert")]
#[macro_export]
macro_rules! stdpar_static_assert {
    ($cond:expr $(,)?) => {
        $crate::unittest::assert_static($cond, file!(), line!())
    };
}

/// Compile-time assertion, checked at run time under `runtime-static-assert`.
#[cfg(not(feature = "runtime-static-assert"))]
#[macro_export]
macro_rules! stdpar_static_assert {
    ($cond:expr $(,)?) => {
        const { assert!($cond) }
    };
}

/// Panic unless evaluating the expression trips a static assertion.
#[macro_export]
macro_rules! assert_static_assert {
    ($e:expr $(,)?) => {
        if let Err(failure) = $crate::unittest::expect_static_assert(file!(), line!(), || {
            let _ = $e;
        }) {
            panic!("{}", failure);
        }
    };
}
