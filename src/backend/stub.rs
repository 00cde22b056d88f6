//! Deterministic stub backend (no model files required).

use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::Path;

use tracing::debug;

use super::{AestheticBackend, BackendError, ScoreDevice};

/// Raw-score span produced by the stub; chosen so normalized values
/// cover most of the user-facing scale.
const RAW_SPAN: f32 = 9.0;
const RAW_OFFSET: f32 = -4.0;

/// Hash-seeded backend producing stable pseudo-scores.
///
/// Useful for smoke runs and pipeline tests where real weights are
/// unavailable; the same path always maps to the same score.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

impl StubBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AestheticBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    fn device(&self) -> ScoreDevice {
        ScoreDevice::Cpu
    }

    fn predict(&self, image: &Path, _device: ScoreDevice) -> Result<f32, BackendError> {
        let mut hasher = DefaultHasher::new();
        image.hash(&mut hasher);
        let seed = hasher.finish();

        let state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let unit = (state >> 32) as f32 / u32::MAX as f32;
        let raw = unit * RAW_SPAN + RAW_OFFSET;

        debug!(image = %image.display(), raw, "stub prediction");
        Ok(raw)
    }
}
