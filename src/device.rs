//! Contract between the dispatch layer and an accelerator backend.

use crate::error::Status;
use crate::status::StatusSlot;

/// Device memory, transfers and synchronization.
pub trait Device: Sync {
    /// An owned device allocation.
    type Buffer: Send;

    fn name(&self) -> &str;

    fn allocate(&self, bytes: usize) -> Result<Self::Buffer, Status>;

    fn release(&self, buffer: Self::Buffer);

    /// Block until all work issued so far has completed.
    fn synchronize(&self) -> Status;

    /// Copy the first `dst.len()` bytes of `src` into host memory.
    fn copy_to_host(&self, src: &Self::Buffer, dst: &mut [u8]) -> Status;
}

/// Storage handed to one phase of a two-phase primitive.
///
/// With `temp == None` the call is a size query: the primitive writes the
/// scratch bytes it needs into `temp_bytes` and does no work. Otherwise it
/// runs against `temp` and leaves its result, one native-endian `u64`, at the
/// start of `output`. Kernel faults go to `status`.
pub struct Launch<'a, B> {
    pub temp: Option<&'a mut B>,
    pub temp_bytes: &'a mut usize,
    pub output: Option<&'a mut B>,
    pub status: &'a StatusSlot,
}

impl<'a, B> Launch<'a, B> {
    pub fn size_query(temp_bytes: &'a mut usize, status: &'a StatusSlot) -> Self {
        Self {
            temp: None,
            temp_bytes,
            output: None,
            status,
        }
    }

    pub fn is_size_query(&self) -> bool {
        self.temp.is_none()
    }
}

/// Search-family primitives with the two-phase calling convention.
///
/// Inputs live in memory the device can address directly. Positions are
/// offsets into the first input; "not found" is reported as that input's
/// length (the shorter length for `mismatch`).
pub trait Primitives: Device {
    fn search<T, U, P>(&self, launch: Launch<'_, Self::Buffer>, input: &[T], pattern: &[U], pred: &P) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync;

    fn search_n<T, V, P>(
        &self,
        launch: Launch<'_, Self::Buffer>,
        input: &[T],
        count: usize,
        value: &V,
        pred: &P,
    ) -> Status
    where
        T: Sync,
        V: Sync,
        P: Fn(&T, &V) -> bool + Sync;

    fn find_end<T, U, P>(&self, launch: Launch<'_, Self::Buffer>, input: &[T], pattern: &[U], pred: &P) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync;

    fn find_first_of<T, U, P>(
        &self,
        launch: Launch<'_, Self::Buffer>,
        input: &[T],
        pattern: &[U],
        pred: &P,
    ) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync;

    fn adjacent_find<T, P>(&self, launch: Launch<'_, Self::Buffer>, input: &[T], pred: &P) -> Status
    where
        T: Sync,
        P: Fn(&T, &T) -> bool + Sync;

    fn find_if<T, P>(&self, launch: Launch<'_, Self::Buffer>, input: &[T], pred: &P) -> Status
    where
        T: Sync,
        P: Fn(&T) -> bool + Sync;

    /// Writes the number of matching items instead of a position.
    fn count_if<T, P>(&self, launch: Launch<'_, Self::Buffer>, input: &[T], pred: &P) -> Status
    where
        T: Sync,
        P: Fn(&T) -> bool + Sync;

    fn mismatch<T, U, P>(&self, launch: Launch<'_, Self::Buffer>, first: &[T], second: &[U], pred: &P) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync;
}
