//! Parallel STL-style algorithms that run on an accelerator when the types
//! allow it and on the host otherwise.
//!
//! Every algorithm takes a [`ParUnseq`] policy first. Whether a call is
//! offloaded is decided from the types alone: the sequence must be
//! contiguous ([`Sequence::OFFLOADABLE`]) and the callable must be safe to
//! replicate onto the device ([`is_offloadable_callable`]). Offloaded calls
//! run a two-phase device primitive through [`DeviceExecution`]; everything
//! else runs the rayon fallback and is reported through [`Diagnostics`].
//!
//! ```
//! use stdpar::{search, ParUnseq};
//!
//! let policy = ParUnseq::new();
//! let haystack = vec![1, 2, 3, 4, 5];
//! assert_eq!(search(&policy, &haystack, &[3, 4]), 2);
//! assert_eq!(search(&policy, &haystack, &[9]), haystack.len());
//! ```

pub mod adapter;
pub mod capability;
pub mod compare;
pub mod config;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod fallback;
pub mod find;
pub mod host_device;
pub mod integer_math;
pub mod offload;
pub mod policy;
pub mod search;
pub mod status;
pub mod unittest;

pub use adapter::{DeviceAlloc, DeviceExecution};
pub use capability::{
    is_offloadable_callable, is_offloadable_sequence, offloadable_pair, route_with, Forward, HostView,
    IteratorCategory, Route, Sequence, MAX_KERNEL_ARG_BYTES,
};
pub use compare::{equal, equal_by, equal_ranges, equal_ranges_by, mismatch, mismatch_by};
pub use config::{Config, DiagnosticsMode};
pub use device::{Device, Launch, Primitives};
pub use diagnostics::{Diagnostics, Rejection};
pub use error::{OffloadError, Status};
pub use find::{all_of, any_of, count, count_if, find, find_if, find_if_not, none_of};
pub use host_device::{HostBuffer, HostDevice, Ledger, Phase};
pub use policy::ParUnseq;
pub use search::{
    adjacent_find, adjacent_find_by, find_end, find_end_by, find_first_of, find_first_of_by, search, search_by,
    search_n, search_n_by,
};
pub use status::StatusSlot;
pub use unittest::{StaticAssertFailure, UnitTestFailure};
