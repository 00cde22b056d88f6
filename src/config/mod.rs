//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `LUMEN_*` environment
//! variables; command-line flags take precedence over both.

mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::backend::ScoreDevice;
use crate::constants::DEFAULT_BATCH_SIZE;

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND: &str = "laion-vit-l-14";

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LUMEN_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one weights subdirectory per backend variant.
    pub model_dir: PathBuf,

    /// Registry name of the scoring backend. Default: `laion-vit-l-14`.
    pub backend: String,

    /// Images per batch. Default: `16`.
    pub batch_size: usize,

    /// Device override; `None` probes metal, then cuda, then cpu.
    pub device: Option<ScoreDevice>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            backend: DEFAULT_BACKEND.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            device: None,
        }
    }
}

/// Default weights location: the user cache directory, or `./models`
/// when no cache directory is known.
fn default_model_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("lumen-score"))
        .unwrap_or_else(|| PathBuf::from("./models"))
}

impl Config {
    pub const ENV_MODEL_DIR: &'static str = "LUMEN_MODEL_DIR";
    pub const ENV_BACKEND: &'static str = "LUMEN_BACKEND";
    pub const ENV_BATCH_SIZE: &'static str = "LUMEN_BATCH_SIZE";
    pub const ENV_DEVICE: &'static str = "LUMEN_DEVICE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_dir = Self::parse_path_from_env(Self::ENV_MODEL_DIR, defaults.model_dir);
        let backend = Self::parse_string_from_env(Self::ENV_BACKEND, defaults.backend);
        let batch_size = Self::parse_batch_size_from_env(defaults.batch_size)?;
        let device = Self::parse_device_from_env()?;

        Ok(Self {
            model_dir,
            backend,
            batch_size,
            device,
        })
    }

    /// Validates basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize {
                value: self.batch_size.to_string(),
            });
        }

        if self.model_dir.exists() && !self.model_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }

    fn parse_batch_size_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_BATCH_SIZE) {
            Ok(value) => {
                let batch_size: usize =
                    value
                        .parse()
                        .map_err(|e| ConfigError::BatchSizeParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if batch_size == 0 {
                    return Err(ConfigError::InvalidBatchSize { value });
                }

                Ok(batch_size)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_device_from_env() -> Result<Option<ScoreDevice>, ConfigError> {
        match env::var(Self::ENV_DEVICE) {
            Ok(value) => parse_device(&value),
            Err(_) => Ok(None),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}

/// Parses a user-supplied device string.
///
/// Accepts `auto`, `cpu`, `cuda[:n]`, and `metal[:n]`; `auto` and the
/// empty string mean "probe at startup".
pub fn parse_device(value: &str) -> Result<Option<ScoreDevice>, ConfigError> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "" | "auto" => Ok(None),
        "cpu" => Ok(Some(ScoreDevice::Cpu)),
        other => parse_indexed_device(other)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidDevice {
                value: value.to_string(),
            }),
    }
}

/// Parses `cuda`, `cuda:1`, `metal`, `metal:0`.
fn parse_indexed_device(value: &str) -> Option<ScoreDevice> {
    let (kind, ordinal) = match value.split_once(':') {
        Some((kind, ordinal)) => (kind, ordinal.parse().ok()?),
        None => (value, 0),
    };

    match kind {
        "cuda" => Some(ScoreDevice::Cuda(ordinal)),
        "metal" => Some(ScoreDevice::Metal(ordinal)),
        _ => None,
    }
}
