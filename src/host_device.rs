//! Host-simulated accelerator.
//!
//! `HostDevice` honours the whole backend contract: buffers come from a
//! tracked allocator, primitives follow the two-phase calling convention,
//! kernels run tile by tile on the rayon pool and cannot unwind into the
//! caller, and results only leave the device through `copy_to_host`. Faults
//! can be injected per phase so the adapter's cleanup paths are testable.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::Config;
use crate::device::{Device, Launch, Primitives};
use crate::error::{Status, ERROR_INVALID_VALUE, ERROR_LAUNCH_FAILURE, ERROR_NOT_READY, ERROR_OUT_OF_MEMORY, SUCCESS};
use crate::integer_math::divide_ri;
use crate::status::StatusSlot;
use crate::unittest::StaticAssertFailure;

const WORD: usize = std::mem::size_of::<u64>();
const NO_HIT: u64 = u64::MAX;

/// A device allocation, backed by word-aligned host memory.
#[derive(Debug)]
pub struct HostBuffer {
    id: u64,
    bytes: usize,
    words: Vec<u64>,
}

impl HostBuffer {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }
}

/// Points in an invocation where a fault can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    SizeQuery,
    Allocate,
    Launch,
    /// The kernel starts but records a fault in its status slot.
    Kernel,
    Synchronize,
    CopyBack,
}

#[derive(Debug, Default)]
struct FaultPlan {
    phases: HashSet<Phase>,
    allocations_left: Option<usize>,
}

/// Allocation and launch bookkeeping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ledger {
    pub live_allocations: usize,
    pub live_bytes: usize,
    pub peak_bytes: usize,
    pub total_allocations: usize,
    pub launches: usize,
    pub synchronizations: usize,
}

#[derive(Clone, Copy)]
enum Pick {
    First,
    Last,
}

pub struct HostDevice {
    config: Config,
    next_id: AtomicU64,
    ledger: Mutex<Ledger>,
    faults: Mutex<FaultPlan>,
}

impl Default for HostDevice {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl HostDevice {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
            ledger: Mutex::new(Ledger::default()),
            faults: Mutex::new(FaultPlan::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> Ledger {
        *self.ledger.lock()
    }

    /// Make every call at `phase` fail until cleared.
    pub fn inject(&self, phase: Phase) {
        self.faults.lock().phases.insert(phase);
    }

    /// Let `n` more allocations succeed, then fail all further ones.
    pub fn fail_allocation_after(&self, n: usize) {
        self.faults.lock().allocations_left = Some(n);
    }

    pub fn clear_faults(&self) {
        *self.faults.lock() = FaultPlan::default();
    }

    fn fails(&self, phase: Phase) -> bool {
        self.faults.lock().phases.contains(&phase)
    }

    fn allocation_fails(&self) -> bool {
        let mut faults = self.faults.lock();
        if faults.phases.contains(&Phase::Allocate) {
            return true;
        }
        match faults.allocations_left.as_mut() {
            Some(0) => true,
            Some(left) => {
                *left -= 1;
                false
            }
            None => false,
        }
    }

    /// Common prologue: answer size queries, validate the tiling and the
    /// storage on launches.
    ///
    /// Returns the per-tile scratch words, the output buffer and the status
    /// slot when the kernel should run.
    fn begin<'l>(
        &self,
        launch: Launch<'l, HostBuffer>,
        work: usize,
    ) -> Result<Option<(&'l mut [u64], &'l mut HostBuffer, &'l StatusSlot)>, Status> {
        let Launch {
            temp,
            temp_bytes,
            output,
            status,
        } = launch;
        if self.config.tile_size == 0 {
            log::debug!("host device: refusing launch with a zero tile size");
            return Err(ERROR_INVALID_VALUE);
        }
        let tiles = divide_ri(work, self.config.tile_size);
        let needed = tiles * WORD;

        let Some(temp) = temp else {
            if self.fails(Phase::SizeQuery) {
                return Err(ERROR_INVALID_VALUE);
            }
            *temp_bytes = needed;
            return Ok(None);
        };

        if self.fails(Phase::Launch) {
            return Err(ERROR_LAUNCH_FAILURE);
        }
        let output = output.ok_or(ERROR_INVALID_VALUE)?;
        if temp.bytes < needed || output.bytes < WORD {
            return Err(ERROR_INVALID_VALUE);
        }
        self.ledger.lock().launches += 1;
        if self.fails(Phase::Kernel) {
            status.raise(ERROR_LAUNCH_FAILURE);
        }
        Ok(Some((&mut temp.words[..tiles], output, status)))
    }

    /// Kernel over `work` candidate positions: each tile records its first
    /// (or last) hit, then the tile results are reduced.
    fn position_kernel<F>(
        &self,
        launch: Launch<'_, HostBuffer>,
        work: usize,
        not_found: usize,
        pick: Pick,
        test: F,
    ) -> Status
    where
        F: Fn(usize) -> bool + Sync,
    {
        let (partials, output, status) = match self.begin(launch, work) {
            Ok(Some(run)) => run,
            Ok(None) => return SUCCESS,
            Err(code) => return code,
        };
        let tile = self.config.tile_size;

        partials.par_iter_mut().enumerate().for_each(|(t, partial)| {
            let lo = t * tile;
            let hi = (lo + tile).min(work);
            let hit = guarded(status, || match pick {
                Pick::First => (lo..hi).find(|&i| test(i)),
                Pick::Last => (lo..hi).rev().find(|&i| test(i)),
            });
            *partial = hit.flatten().map_or(NO_HIT, |i| i as u64);
        });

        let hits = partials.iter().copied().filter(|&w| w != NO_HIT);
        let best = match pick {
            Pick::First => hits.min(),
            Pick::Last => hits.max(),
        };
        output.words[0] = best.unwrap_or(not_found as u64);
        SUCCESS
    }

    fn count_kernel<F>(&self, launch: Launch<'_, HostBuffer>, work: usize, test: F) -> Status
    where
        F: Fn(usize) -> bool + Sync,
    {
        let (partials, output, status) = match self.begin(launch, work) {
            Ok(Some(run)) => run,
            Ok(None) => return SUCCESS,
            Err(code) => return code,
        };
        let tile = self.config.tile_size;

        partials.par_iter_mut().enumerate().for_each(|(t, partial)| {
            let lo = t * tile;
            let hi = (lo + tile).min(work);
            let n = guarded(status, || (lo..hi).filter(|&i| test(i)).count());
            *partial = n.unwrap_or(0) as u64;
        });

        output.words[0] = partials.iter().sum();
        SUCCESS
    }
}

/// Run one tile. A panic cannot cross back into the host, so it becomes a
/// fault in the invocation's status slot.
fn guarded<R>(status: &StatusSlot, body: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(r) => Some(r),
        Err(payload) => {
            match payload.downcast_ref::<StaticAssertFailure>() {
                Some(failure) => status.raise_assertion(*failure),
                None => {
                    status.raise(ERROR_LAUNCH_FAILURE);
                }
            }
            None
        }
    }
}

/// Number of window start positions for a pattern of `m` items in `n`.
fn windows(n: usize, m: usize) -> usize {
    if m > n {
        0
    } else {
        n - m + 1
    }
}

impl Device for HostDevice {
    type Buffer = HostBuffer;

    fn name(&self) -> &str {
        "host"
    }

    fn allocate(&self, bytes: usize) -> Result<HostBuffer, Status> {
        if self.allocation_fails() {
            log::debug!("host device: refusing allocation of {bytes} bytes");
            return Err(ERROR_OUT_OF_MEMORY);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let buffer = HostBuffer {
            id,
            bytes,
            words: vec![0; divide_ri(bytes, WORD)],
        };
        let mut ledger = self.ledger.lock();
        ledger.live_allocations += 1;
        ledger.live_bytes += bytes;
        ledger.peak_bytes = ledger.peak_bytes.max(ledger.live_bytes);
        ledger.total_allocations += 1;
        Ok(buffer)
    }

    fn release(&self, buffer: HostBuffer) {
        log::trace!("host device: releasing buffer {} ({} bytes)", buffer.id, buffer.bytes);
        let mut ledger = self.ledger.lock();
        ledger.live_allocations -= 1;
        ledger.live_bytes -= buffer.bytes;
    }

    fn synchronize(&self) -> Status {
        self.ledger.lock().synchronizations += 1;
        if self.fails(Phase::Synchronize) {
            ERROR_NOT_READY
        } else {
            SUCCESS
        }
    }

    fn copy_to_host(&self, src: &HostBuffer, dst: &mut [u8]) -> Status {
        if self.fails(Phase::CopyBack) || dst.len() > src.bytes {
            return ERROR_INVALID_VALUE;
        }
        let bytes: &[u8] = bytemuck::cast_slice(&src.words);
        dst.copy_from_slice(&bytes[..dst.len()]);
        SUCCESS
    }
}

impl Primitives for HostDevice {
    fn search<T, U, P>(&self, launch: Launch<'_, HostBuffer>, input: &[T], pattern: &[U], pred: &P) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync,
    {
        let m = pattern.len();
        self.position_kernel(launch, windows(input.len(), m), input.len(), Pick::First, |i| {
            (0..m).all(|j| pred(&input[i + j], &pattern[j]))
        })
    }

    fn search_n<T, V, P>(&self, launch: Launch<'_, HostBuffer>, input: &[T], count: usize, value: &V, pred: &P) -> Status
    where
        T: Sync,
        V: Sync,
        P: Fn(&T, &V) -> bool + Sync,
    {
        self.position_kernel(launch, windows(input.len(), count), input.len(), Pick::First, |i| {
            input[i..i + count].iter().all(|x| pred(x, value))
        })
    }

    fn find_end<T, U, P>(&self, launch: Launch<'_, HostBuffer>, input: &[T], pattern: &[U], pred: &P) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync,
    {
        let m = pattern.len();
        self.position_kernel(launch, windows(input.len(), m), input.len(), Pick::Last, |i| {
            (0..m).all(|j| pred(&input[i + j], &pattern[j]))
        })
    }

    fn find_first_of<T, U, P>(&self, launch: Launch<'_, HostBuffer>, input: &[T], pattern: &[U], pred: &P) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync,
    {
        self.position_kernel(launch, input.len(), input.len(), Pick::First, |i| {
            pattern.iter().any(|p| pred(&input[i], p))
        })
    }

    fn adjacent_find<T, P>(&self, launch: Launch<'_, HostBuffer>, input: &[T], pred: &P) -> Status
    where
        T: Sync,
        P: Fn(&T, &T) -> bool + Sync,
    {
        let work = input.len().saturating_sub(1);
        self.position_kernel(launch, work, input.len(), Pick::First, |i| pred(&input[i], &input[i + 1]))
    }

    fn find_if<T, P>(&self, launch: Launch<'_, HostBuffer>, input: &[T], pred: &P) -> Status
    where
        T: Sync,
        P: Fn(&T) -> bool + Sync,
    {
        self.position_kernel(launch, input.len(), input.len(), Pick::First, |i| pred(&input[i]))
    }

    fn count_if<T, P>(&self, launch: Launch<'_, HostBuffer>, input: &[T], pred: &P) -> Status
    where
        T: Sync,
        P: Fn(&T) -> bool + Sync,
    {
        self.count_kernel(launch, input.len(), |i| pred(&input[i]))
    }

    fn mismatch<T, U, P>(&self, launch: Launch<'_, HostBuffer>, first: &[T], second: &[U], pred: &P) -> Status
    where
        T: Sync,
        U: Sync,
        P: Fn(&T, &U) -> bool + Sync,
    {
        let k = first.len().min(second.len());
        self.position_kernel(launch, k, k, Pick::First, |i| !pred(&first[i], &second[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusSlot;

    fn run(device: &HostDevice, f: impl Fn(Launch<'_, HostBuffer>) -> Status) -> u64 {
        let status = StatusSlot::new();
        let mut bytes = 0;
        assert_eq!(f(Launch::size_query(&mut bytes, &status)), SUCCESS);
        let mut temp = device.allocate(bytes).unwrap();
        let mut out = device.allocate(WORD).unwrap();
        let launch = Launch {
            temp: Some(&mut temp),
            temp_bytes: &mut bytes,
            output: Some(&mut out),
            status: &status,
        };
        assert_eq!(f(launch), SUCCESS);
        assert_eq!(device.synchronize(), SUCCESS);
        let mut host = [0u8; WORD];
        assert_eq!(device.copy_to_host(&out, &mut host), SUCCESS);
        device.release(temp);
        device.release(out);
        u64::from_ne_bytes(host)
    }

    #[test]
    fn hits_across_tile_boundaries() {
        let device = HostDevice::new(Config {
            tile_size: 4,
            ..Config::default()
        });
        let input: Vec<u32> = (0..37).collect();
        let pattern = [29u32, 30, 31];
        let pos = run(&device, |l| device.search(l, &input, &pattern, &|a: &u32, b: &u32| a == b));
        assert_eq!(pos, 29);
        let count = run(&device, |l| device.count_if(l, &input, &|x: &u32| x % 2 == 0));
        assert_eq!(count, 19);
        assert_eq!(device.ledger().live_allocations, 0);
    }

    #[test]
    fn size_query_reports_one_word_per_tile() {
        let device = HostDevice::new(Config {
            tile_size: 10,
            ..Config::default()
        });
        let input = [0u8; 25];
        let status = StatusSlot::new();
        let mut bytes = 0;
        let code = device.find_if(Launch::size_query(&mut bytes, &status), &input, &|x: &u8| *x == 1);
        assert_eq!(code, SUCCESS);
        assert_eq!(bytes, 3 * WORD);
    }
}
