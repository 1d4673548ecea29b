//! Hooks fired when a call is routed to the host fallback because its types
//! were rejected.
//!
//! With the `strict-offload` feature each hook carries a `const` assertion on
//! the rejected verdict, so a fallback that would hide a performance cliff
//! becomes a compile error at the monomorphization that selected it. Without
//! it the rejection is counted on the policy and logged.

use std::any::type_name;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::capability::{IteratorCategory, Sequence};
use crate::config::DiagnosticsMode;

/// Why a call did not take the offload path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    IteratorCategory {
        type_name: &'static str,
        category: IteratorCategory,
    },
    CallableType {
        type_name: &'static str,
    },
    /// The sequence type was accepted but handed out no contiguous storage.
    MissingStorage {
        type_name: &'static str,
    },
}

/// Rejection counters and the reporting mode, owned by a policy.
#[derive(Debug)]
pub struct Diagnostics {
    mode: DiagnosticsMode,
    iterator_rejections: AtomicUsize,
    callable_rejections: AtomicUsize,
    last: Mutex<Option<(&'static str, Rejection)>>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticsMode::Warn)
    }
}

impl Diagnostics {
    pub fn new(mode: DiagnosticsMode) -> Self {
        Self {
            mode,
            iterator_rejections: AtomicUsize::new(0),
            callable_rejections: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn mode(&self) -> DiagnosticsMode {
        self.mode
    }

    pub fn record(&self, algorithm: &'static str, rejection: Rejection) {
        match rejection {
            Rejection::IteratorCategory { .. } | Rejection::MissingStorage { .. } => {
                self.iterator_rejections.fetch_add(1, Ordering::Relaxed)
            }
            Rejection::CallableType { .. } => self.callable_rejections.fetch_add(1, Ordering::Relaxed),
        };
        *self.last.lock() = Some((algorithm, rejection));

        let level = match self.mode {
            DiagnosticsMode::Off => return,
            DiagnosticsMode::Debug => log::Level::Debug,
            DiagnosticsMode::Warn => log::Level::Warn,
        };
        match rejection {
            Rejection::IteratorCategory { type_name, category } => log::log!(
                level,
                "{algorithm}: {category} sequence {type_name} cannot be offloaded, running on host"
            ),
            Rejection::CallableType { type_name } => log::log!(
                level,
                "{algorithm}: callable {type_name} cannot be offloaded, running on host"
            ),
            Rejection::MissingStorage { type_name } => log::log!(
                level,
                "{algorithm}: {type_name} claims contiguous storage but returned none, running on host"
            ),
        }
    }

    pub fn iterator_rejections(&self) -> usize {
        self.iterator_rejections.load(Ordering::Relaxed)
    }

    pub fn callable_rejections(&self) -> usize {
        self.callable_rejections.load(Ordering::Relaxed)
    }

    /// Most recent rejection and the algorithm that hit it.
    pub fn last_rejection(&self) -> Option<(&'static str, Rejection)> {
        *self.last.lock()
    }

    pub fn reset(&self) {
        self.iterator_rejections.store(0, Ordering::Relaxed);
        self.callable_rejections.store(0, Ordering::Relaxed);
        *self.last.lock() = None;
    }
}

/// Marker for a sequence type whose category cannot be offloaded.
pub fn unsupported_iterator_category<S: Sequence>(diagnostics: &Diagnostics, algorithm: &'static str) {
    #[cfg(feature = "strict-offload")]
    crate::stdpar_static_assert!(S::OFFLOADABLE);

    diagnostics.record(
        algorithm,
        Rejection::IteratorCategory {
            type_name: type_name::<S>(),
            category: S::CATEGORY,
        },
    );
}

/// Marker for a callable type that cannot be replicated onto the device.
pub fn unsupported_callable_type<F>(diagnostics: &Diagnostics, algorithm: &'static str) {
    #[cfg(feature = "strict-offload")]
    crate::stdpar_static_assert!(crate::capability::is_offloadable_callable::<F>());

    diagnostics.record(
        algorithm,
        Rejection::CallableType {
            type_name: type_name::<F>(),
        },
    );
}
