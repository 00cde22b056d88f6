//! Scoring backend capability.
//!
//! A backend turns an image file into a raw aesthetic score. `predict`
//! is mandatory; `batch_predict` has a provided default that decomposes
//! into sequential `predict` calls, so simple backends stay simple while
//! model-backed ones override it with one stacked forward pass.
//!
//! Devices are passed explicitly with every call. The engine, not the
//! backend, decides where an attempt runs, and there is no shared device
//! state to save or restore around a fallback.

pub mod clip;
pub mod device;
mod error;
pub mod registry;
pub mod stub;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::BackendError;

use std::fmt;
use std::path::{Path, PathBuf};

/// A compute device a backend can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreDevice {
    Cpu,
    Cuda(usize),
    Metal(usize),
}

impl ScoreDevice {
    pub fn is_cpu(self) -> bool {
        matches!(self, ScoreDevice::Cpu)
    }
}

impl fmt::Display for ScoreDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreDevice::Cpu => write!(f, "cpu"),
            ScoreDevice::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
            ScoreDevice::Metal(ordinal) => write!(f, "metal:{ordinal}"),
        }
    }
}

/// Capability consumed by the scoring engine.
///
/// `predict` and `batch_predict` return RAW scores; normalization onto
/// the user-facing scale is the engine's job.
pub trait AestheticBackend {
    /// Short registry name, used in logs.
    fn name(&self) -> &str;

    /// The device this backend prefers to run on.
    fn device(&self) -> ScoreDevice;

    /// Scores a single image on `device`, returning the raw value.
    fn predict(&self, image: &Path, device: ScoreDevice) -> Result<f32, BackendError>;

    /// Scores a batch of images, preserving input order.
    ///
    /// The default decomposes into sequential `predict` calls and fails
    /// on the first per-item error; backends with native batching
    /// override it.
    fn batch_predict(
        &self,
        images: &[PathBuf],
        device: ScoreDevice,
    ) -> Result<Vec<f32>, BackendError> {
        images.iter().map(|image| self.predict(image, device)).collect()
    }
}
