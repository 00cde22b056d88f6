use thiserror::Error;

use crate::scanner::ScanError;

/// Failures a scoring run can surface to the caller.
///
/// Per-image and per-batch backend problems never appear here; they are
/// absorbed into sentinel scores.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected at construction; batches cannot be empty.
    #[error("invalid batch size {got}: must be at least 1")]
    InvalidBatchSize { got: usize },

    #[error(transparent)]
    Scan(#[from] ScanError),
}
