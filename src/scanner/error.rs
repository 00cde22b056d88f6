use std::path::PathBuf;
use thiserror::Error;

/// Scan-boundary failures.
///
/// These are the only errors a scan surfaces; problems with individual
/// entries inside the walk are logged and skipped.
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// The scan root exists but is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
