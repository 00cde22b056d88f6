use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure kinds a backend can report.
///
/// The engine branches on these tags to decide between degrading,
/// retrying on the CPU, and recording the failure sentinel. Translating
/// opaque library errors into kinds happens in this module and nowhere
/// else.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The device ran out of memory or similar capacity.
    #[error("resource exhaustion: {reason}")]
    ResourceExhausted { reason: String },

    /// A device-level runtime failure that is not capacity-related.
    #[error("device error: {reason}")]
    Device { reason: String },

    /// The file is not a decodable image.
    #[error("unsupported image format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("image not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Expected weight files are missing from the model directory.
    #[error("model weights not found at {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("invalid backend configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The registry has no backend under the requested name.
    #[error("unknown backend '{name}', available: {available}")]
    UnknownBackend { name: String, available: String },

    /// Anything else that went wrong while scoring `path`.
    #[error("inference failed for {path}: {reason}")]
    Inference { path: PathBuf, reason: String },
}

impl BackendError {
    /// Returns `true` for capacity failures that warrant a CPU retry.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, BackendError::ResourceExhausted { .. })
    }

    /// Classifies an I/O failure observed while reading `path`.
    pub(crate) fn from_io(err: &std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => BackendError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => BackendError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => BackendError::Inference {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }

    /// Classifies an image decode failure for `path`.
    pub(crate) fn from_image(err: image::ImageError, path: &Path) -> Self {
        match err {
            image::ImageError::IoError(io) => Self::from_io(&io, path),
            image::ImageError::Unsupported(_) | image::ImageError::Decoding(_) => {
                BackendError::UnsupportedFormat {
                    path: path.to_path_buf(),
                }
            }
            other => BackendError::Inference {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    /// Classifies an opaque candle error raised while scoring `path`.
    ///
    /// Candle does not expose structured kinds for accelerator failures,
    /// so the capacity/device distinction is made here, once, from the
    /// error text.
    pub(crate) fn from_candle(err: &candle_core::Error, path: &Path) -> Self {
        let reason = err.to_string();
        let lower = reason.to_lowercase();
        if lower.contains("out of memory") || lower.contains("oom") {
            BackendError::ResourceExhausted { reason }
        } else if lower.contains("cuda")
            || lower.contains("metal")
            || lower.contains("driver")
            || lower.contains("device")
        {
            BackendError::Device { reason }
        } else {
            BackendError::Inference {
                path: path.to_path_buf(),
                reason,
            }
        }
    }
}
