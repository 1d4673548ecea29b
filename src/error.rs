use thiserror::Error;

use crate::unittest::StaticAssertFailure;

/// Status code returned by device primitives and runtime calls.
///
/// Zero means success. The dispatch layer never interprets specific nonzero
/// codes beyond "failed"; the named constants exist for the bundled device
/// and for tests.
pub type Status = i32;

/// Success.
pub const SUCCESS: Status = 0;
/// A primitive rejected its arguments.
pub const ERROR_INVALID_VALUE: Status = 1;
/// The device could not satisfy an allocation.
pub const ERROR_OUT_OF_MEMORY: Status = 2;
/// A kernel faulted while running.
pub const ERROR_LAUNCH_FAILURE: Status = 719;
/// A device-side static assertion fired.
pub const ERROR_ASSERT: Status = 710;
/// The device stopped responding to synchronization.
pub const ERROR_NOT_READY: Status = 600;

#[derive(Error, Debug)]
pub enum OffloadError {
    /// The temporary-storage size query failed.
    #[error("size query failed with status {0}")]
    SizeQuery(Status),

    /// Device allocation failed.
    #[error("device allocation of {bytes} bytes failed with status {status}")]
    Allocation { bytes: usize, status: Status },

    /// The primitive failed when launched with real storage.
    #[error("primitive launch failed with status {0}")]
    Launch(Status),

    /// Waiting for the device failed.
    #[error("device synchronization failed with status {0}")]
    Synchronize(Status),

    /// A kernel reported a fault through the invocation's status slot.
    #[error("kernel fault with status {0}")]
    DeviceFault(Status),

    /// A device-side static assertion fired during the launch.
    #[error("device static assertion at {}:{}", .0.file, .0.line)]
    DeviceAssertion(StaticAssertFailure),

    /// Copying the result back to the host failed.
    #[error("result copy-back failed with status {0}")]
    CopyBack(Status),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OffloadError {
    /// The raw device status behind this error, if it came from the device.
    pub fn status(&self) -> Option<Status> {
        match self {
            OffloadError::SizeQuery(s)
            | OffloadError::Launch(s)
            | OffloadError::Synchronize(s)
            | OffloadError::DeviceFault(s)
            | OffloadError::CopyBack(s) => Some(*s),
            OffloadError::Allocation { status, .. } => Some(*status),
            OffloadError::DeviceAssertion(_) => Some(ERROR_ASSERT),
            _ => None,
        }
    }
}
