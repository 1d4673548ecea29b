use crate::adapter::DeviceExecution;
use crate::capability::{is_offloadable_callable, offloadable_pair, Sequence};
use crate::config::Config;
use crate::device::Device;
use crate::diagnostics::{unsupported_callable_type, unsupported_iterator_category, Diagnostics, Rejection};
use crate::host_device::HostDevice;
use crate::OffloadError;

/// The parallel-unsequenced execution policy.
///
/// Carries the device offloaded calls run on, the configuration and the
/// rejection counters of the diagnostic hooks. Every algorithm entry point
/// takes a policy as its first argument.
pub struct ParUnseq<D: Device = HostDevice> {
    device: D,
    config: Config,
    diagnostics: Diagnostics,
}

impl ParUnseq<HostDevice> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Does not validate `config`. An invalid tiling or granularity makes
    /// every offload fail, so routed calls return their sentinels.
    pub fn with_config(config: Config) -> Self {
        Self::on(HostDevice::new(config.clone()), config)
    }

    pub fn try_with_config(config: Config) -> Result<Self, OffloadError> {
        Ok(Self::with_config(config.validate()?))
    }

    /// Policy configured from `STDPAR_*` environment variables.
    pub fn from_env() -> Result<Self, OffloadError> {
        Ok(Self::with_config(Config::from_env()?))
    }
}

impl Default for ParUnseq<HostDevice> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device> ParUnseq<D> {
    pub fn on(device: D, config: Config) -> Self {
        let diagnostics = Diagnostics::new(config.diagnostics);
        Self {
            device,
            config,
            diagnostics,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn execution(&self) -> DeviceExecution<'_, D> {
        DeviceExecution::new(&self.device, self.config.alloc_granularity)
    }

    /// Turn a device result into the algorithm's answer; failures become
    /// `sentinel`, the same value a genuine "not found" produces.
    pub(crate) fn settle<R>(&self, algorithm: &'static str, sentinel: R, result: Result<R, OffloadError>) -> R {
        match result {
            Ok(value) => value,
            Err(err) => {
                log::warn!("{algorithm}: device path failed on {}: {err}", self.device.name());
                sentinel
            }
        }
    }

    /// Fire the hooks for whichever of `S` and `F` was rejected.
    ///
    /// When both were accepted the call only gets here because `input`
    /// returned no contiguous storage, which is recorded instead.
    pub(crate) fn reject<S: Sequence, F>(&self, algorithm: &'static str, input: &S) {
        if S::OFFLOADABLE && is_offloadable_callable::<F>() {
            self.missing_storage(algorithm, input);
            return;
        }
        self.fire::<S, F>(algorithm);
    }

    pub(crate) fn reject_pair<S1: Sequence, S2: Sequence, F>(&self, algorithm: &'static str, first: &S1, second: &S2) {
        if offloadable_pair::<S1, S2>() && is_offloadable_callable::<F>() {
            self.missing_storage(algorithm, first);
            self.missing_storage(algorithm, second);
            return;
        }
        if !S2::OFFLOADABLE {
            unsupported_iterator_category::<S2>(&self.diagnostics, algorithm);
        }
        self.fire::<S1, F>(algorithm);
    }

    fn fire<S: Sequence, F>(&self, algorithm: &'static str) {
        if !S::OFFLOADABLE {
            unsupported_iterator_category::<S>(&self.diagnostics, algorithm);
        }
        if !is_offloadable_callable::<F>() {
            unsupported_callable_type::<F>(&self.diagnostics, algorithm);
        }
    }

    fn missing_storage<S: Sequence>(&self, algorithm: &'static str, input: &S) {
        if input.as_contiguous().is_none() {
            self.diagnostics.record(
                algorithm,
                Rejection::MissingStorage {
                    type_name: std::any::type_name::<S>(),
                },
            );
        }
    }
}
