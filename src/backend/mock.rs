//! Scriptable backend for engine and pipeline tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{AestheticBackend, BackendError, ScoreDevice};

/// How the mock answers `batch_predict`.
#[derive(Debug, Clone)]
pub enum BatchBehavior {
    /// Defer to the provided default (sequential `predict`).
    Passthrough,
    /// Score natively, one raw value per input, without touching
    /// `predict`.
    Native,
    /// Fail every batch call with resource exhaustion.
    AlwaysExhausted,
    /// Fail every batch call with a device error.
    AlwaysDeviceError,
    /// Return one score too few, regardless of input length.
    ShortResponse,
}

/// One observed `predict` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub image: PathBuf,
    pub device: ScoreDevice,
}

#[derive(Debug)]
struct MockState {
    batch_behavior: BatchBehavior,
    predict_errors: VecDeque<BackendError>,
    predict_calls: Vec<RecordedCall>,
    batch_calls: Vec<(usize, ScoreDevice)>,
}

/// Backend with scriptable failures and full call recording.
///
/// Clones share state, so a test can keep one handle for assertions
/// after the engine consumed its own copy.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    device: ScoreDevice,
    score_fn: Arc<dyn Fn(&Path) -> f32 + Send + Sync>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockBackend")
            .field("device", &self.device)
            .field("batch_behavior", &state.batch_behavior)
            .field("predict_calls", &state.predict_calls.len())
            .field("batch_calls", &state.batch_calls.len())
            .finish()
    }
}

impl MockBackend {
    /// A CPU-preferring mock returning `raw_score` for every image.
    pub fn new(raw_score: f32) -> Self {
        Self::with_score_fn(ScoreDevice::Cpu, move |_| raw_score)
    }

    /// A mock preferring `device` and returning `raw_score` everywhere.
    pub fn on_device(device: ScoreDevice, raw_score: f32) -> Self {
        Self::with_score_fn(device, move |_| raw_score)
    }

    /// A mock whose raw score is derived from the image path.
    pub fn with_score_fn(
        device: ScoreDevice,
        score: impl Fn(&Path) -> f32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                batch_behavior: BatchBehavior::Passthrough,
                predict_errors: VecDeque::new(),
                predict_calls: Vec::new(),
                batch_calls: Vec::new(),
            })),
            device,
            score_fn: Arc::new(score),
        }
    }

    pub fn set_batch_behavior(&self, behavior: BatchBehavior) {
        self.state.lock().batch_behavior = behavior;
    }

    /// Queues an error for an upcoming `predict` call. Queued errors are
    /// consumed in order before the score function is consulted.
    pub fn queue_predict_error(&self, error: BackendError) {
        self.state.lock().predict_errors.push_back(error);
    }

    pub fn predict_calls(&self) -> Vec<RecordedCall> {
        self.state.lock().predict_calls.clone()
    }

    pub fn batch_calls(&self) -> Vec<(usize, ScoreDevice)> {
        self.state.lock().batch_calls.clone()
    }
}

impl AestheticBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn device(&self) -> ScoreDevice {
        self.device
    }

    fn predict(&self, image: &Path, device: ScoreDevice) -> Result<f32, BackendError> {
        let mut state = self.state.lock();
        state.predict_calls.push(RecordedCall {
            image: image.to_path_buf(),
            device,
        });
        if let Some(error) = state.predict_errors.pop_front() {
            return Err(error);
        }
        drop(state);
        Ok((self.score_fn)(image))
    }

    fn batch_predict(
        &self,
        images: &[PathBuf],
        device: ScoreDevice,
    ) -> Result<Vec<f32>, BackendError> {
        let behavior = {
            let mut state = self.state.lock();
            state.batch_calls.push((images.len(), device));
            state.batch_behavior.clone()
        };

        match behavior {
            BatchBehavior::Passthrough => images
                .iter()
                .map(|image| self.predict(image, device))
                .collect(),
            BatchBehavior::Native => {
                Ok(images.iter().map(|image| (self.score_fn)(image)).collect())
            }
            BatchBehavior::AlwaysExhausted => Err(BackendError::ResourceExhausted {
                reason: "mock exhaustion".to_string(),
            }),
            BatchBehavior::AlwaysDeviceError => Err(BackendError::Device {
                reason: "mock device failure".to_string(),
            }),
            BatchBehavior::ShortResponse => {
                let mut scores: Vec<f32> =
                    images.iter().map(|image| (self.score_fn)(image)).collect();
                scores.pop();
                Ok(scores)
            }
        }
    }
}
