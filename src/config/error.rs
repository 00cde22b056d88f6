//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Batch size must be at least 1.
    #[error("invalid batch size '{value}': must be at least 1")]
    InvalidBatchSize { value: String },

    /// Batch size string could not be parsed as a number.
    #[error("failed to parse batch size '{value}': {source}")]
    BatchSizeParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Device string is not `auto`, `cpu`, `cuda[:n]`, or `metal[:n]`.
    #[error("invalid device '{value}': expected auto, cpu, cuda[:n] or metal[:n]")]
    InvalidDevice { value: String },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
