//! Two-phase invocation of device primitives.
//!
//! Every offloaded call that drives a primitive directly goes through
//! [`DeviceExecution::run`]: size query, allocate, launch, synchronize,
//! copy back, release. Buffers are held by [`DeviceAlloc`] guards, so the
//! release step runs on every exit path, early returns included.

use std::mem::size_of;

use bytemuck::Pod;

use crate::device::{Device, Launch};
use crate::error::{OffloadError, Status, SUCCESS};
use crate::integer_math::{is_power_of_2, round_i};
use crate::status::StatusSlot;

/// A device allocation owned by the current call frame.
pub struct DeviceAlloc<'d, D: Device> {
    device: &'d D,
    buffer: Option<D::Buffer>,
    bytes: usize,
}

impl<'d, D: Device> DeviceAlloc<'d, D> {
    pub fn new(device: &'d D, bytes: usize) -> Result<Self, OffloadError> {
        let buffer = device
            .allocate(bytes)
            .map_err(|status| OffloadError::Allocation { bytes, status })?;
        Ok(Self {
            device,
            buffer: Some(buffer),
            bytes,
        })
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn buffer(&self) -> &D::Buffer {
        self.buffer.as_ref().expect("buffer is only taken in drop")
    }

    pub fn buffer_mut(&mut self) -> &mut D::Buffer {
        self.buffer.as_mut().expect("buffer is only taken in drop")
    }
}

impl<D: Device> Drop for DeviceAlloc<'_, D> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.device.release(buffer);
        }
    }
}

/// Drives one primitive invocation on `device`.
pub struct DeviceExecution<'d, D: Device> {
    device: &'d D,
    granularity: usize,
}

impl<'d, D: Device> DeviceExecution<'d, D> {
    /// Temporary storage is rounded up to a multiple of `granularity`. Any
    /// other value than a power of two makes every `run` fail with
    /// [`OffloadError::Config`].
    pub fn new(device: &'d D, granularity: usize) -> Self {
        Self { device, granularity }
    }

    pub fn device(&self) -> &'d D {
        self.device
    }

    /// Run `primitive` through the full two-phase protocol and return the
    /// scalar it leaves in the output buffer.
    ///
    /// `primitive` is called twice: once as a size query and once with real
    /// storage. Nothing is allocated if the size query fails.
    ///
    /// The scratch allocation is the reported size rounded up to the
    /// granularity, so it can be larger than what the primitive asked for.
    pub fn run<R, F>(&self, mut primitive: F) -> Result<R, OffloadError>
    where
        R: Pod,
        F: FnMut(Launch<'_, D::Buffer>) -> Status,
    {
        if self.granularity == 0 || !is_power_of_2(self.granularity) {
            return Err(OffloadError::Config(format!(
                "allocation granularity must be a power of two, got {}",
                self.granularity
            )));
        }
        let status = StatusSlot::new();

        let mut temp_bytes = 0usize;
        let code = primitive(Launch::size_query(&mut temp_bytes, &status));
        if code != SUCCESS {
            return Err(OffloadError::SizeQuery(code));
        }

        let mut temp = DeviceAlloc::new(self.device, round_i(temp_bytes, self.granularity))?;
        let mut output = DeviceAlloc::new(self.device, size_of::<R>())?;

        let code = primitive(Launch {
            temp: Some(temp.buffer_mut()),
            temp_bytes: &mut temp_bytes,
            output: Some(output.buffer_mut()),
            status: &status,
        });
        if code != SUCCESS {
            return Err(OffloadError::Launch(code));
        }

        let code = self.device.synchronize();
        if code != SUCCESS {
            return Err(OffloadError::Synchronize(code));
        }
        if let Some(failure) = status.assertion() {
            return Err(OffloadError::DeviceAssertion(failure));
        }
        if !status.is_clear() {
            return Err(OffloadError::DeviceFault(status.code()));
        }

        let mut host = vec![0u8; size_of::<R>()];
        let code = self.device.copy_to_host(output.buffer(), &mut host);
        if code != SUCCESS {
            return Err(OffloadError::CopyBack(code));
        }
        log::trace!(
            "{}: invocation finished with {} scratch bytes",
            self.device.name(),
            temp.bytes()
        );
        Ok(bytemuck::pod_read_unaligned(&host))
    }
}
