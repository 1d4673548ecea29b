use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::OffloadError;

/// How capability rejections are reported at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsMode {
    /// Count rejections only.
    Off,
    /// Count and log at `debug`.
    Debug,
    /// Count and log at `warn`.
    Warn,
}

impl std::str::FromStr for DiagnosticsMode {
    type Err = OffloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(DiagnosticsMode::Off),
            "debug" => Ok(DiagnosticsMode::Debug),
            "warn" | "1" => Ok(DiagnosticsMode::Warn),
            other => Err(OffloadError::Config(format!("unknown diagnostics mode {other:?}"))),
        }
    }
}

/// Runtime configuration for the bundled device and the dispatch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of elements each kernel work group scans.
    pub tile_size: usize,
    /// Device allocations are rounded up to a multiple of this many bytes.
    pub alloc_granularity: usize,
    /// Reporting of fallbacks caused by rejected types.
    pub diagnostics: DiagnosticsMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_size: 1024,
            alloc_granularity: 256,
            diagnostics: DiagnosticsMode::Warn,
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, OffloadError> {
        let cfg: Config = serde_json::from_str(text)?;
        cfg.validate()
    }

    /// Load a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OffloadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Defaults overridden by `STDPAR_TILE_SIZE`, `STDPAR_ALLOC_GRANULARITY`
    /// and `STDPAR_DIAGNOSTICS`.
    pub fn from_env() -> Result<Self, OffloadError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, OffloadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STDPAR_TILE_SIZE") {
            self.tile_size = parse_usize("STDPAR_TILE_SIZE", &v)?;
        }
        if let Some(v) = lookup("STDPAR_ALLOC_GRANULARITY") {
            self.alloc_granularity = parse_usize("STDPAR_ALLOC_GRANULARITY", &v)?;
        }
        if let Some(v) = lookup("STDPAR_DIAGNOSTICS") {
            self.diagnostics = v.parse()?;
        }
        self.validate()
    }

    /// Reject a zero tile size and a granularity that is not a power of two.
    /// The loaders call this; hand-built configs should too.
    pub fn validate(self) -> Result<Self, OffloadError> {
        if self.tile_size == 0 {
            return Err(OffloadError::Config("tile_size must be non-zero".into()));
        }
        if self.alloc_granularity == 0 || !crate::integer_math::is_power_of_2(self.alloc_granularity) {
            return Err(OffloadError::Config(format!(
                "alloc_granularity must be a power of two, got {}",
                self.alloc_granularity
            )));
        }
        Ok(self)
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, OffloadError> {
    value
        .trim()
        .parse()
        .map_err(|_| OffloadError::Config(format!("{key}: expected an integer, got {value:?}")))
}
