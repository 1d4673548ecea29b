use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::Mutex;

use crate::error::{Status, ERROR_ASSERT, SUCCESS};
use crate::unittest::StaticAssertFailure;

/// Out-of-band status cell for one device invocation.
///
/// Kernels cannot unwind back into the host, so they record faults here.
/// The cell is owned by the call frame that launched the work and is only
/// read after that frame has synchronized with the device. The first fault
/// wins; later ones are dropped.
#[derive(Debug, Default)]
pub struct StatusSlot {
    code: AtomicI32,
    assertion: Mutex<Option<StaticAssertFailure>>,
}

impl StatusSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a kernel fault. Returns false if a fault was already recorded.
    pub fn raise(&self, code: Status) -> bool {
        debug_assert_ne!(code, SUCCESS);
        self.code
            .compare_exchange(SUCCESS, code, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Record a static assertion that fired in device code.
    pub fn raise_assertion(&self, failure: StaticAssertFailure) {
        if self.raise(ERROR_ASSERT) {
            *self.assertion.lock() = Some(failure);
        }
    }

    pub fn code(&self) -> Status {
        self.code.load(Ordering::Acquire)
    }

    pub fn is_clear(&self) -> bool {
        self.code() == SUCCESS
    }

    pub fn assertion(&self) -> Option<StaticAssertFailure> {
        *self.assertion.lock()
    }
}
