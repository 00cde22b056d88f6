//! Batch scoring engine.
//!
//! Turns a file list plus a backend into a full result list, degrading
//! under resource pressure instead of failing: batch errors decompose
//! into per-item scoring, capacity errors get one retry on the CPU, and
//! a bad image yields the failure sentinel rather than aborting the run.

mod error;


pub use error::EngineError;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::backend::{AestheticBackend, ScoreDevice};
use crate::constants::SCORE_FAILED;
use crate::scanner::{self, discover_images};
use crate::score::{ScoredImage, normalize_raw_score};

/// Cooperative cancellation handle, checked between batches.
///
/// Clones share one flag, so a caller can keep a handle and cancel a
/// run from another thread. A cancelled run returns the results
/// accumulated so far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress callback: `(processed, total)`, invoked once per batch.
pub type ProgressFn<'a> = dyn FnMut(usize, usize) + 'a;

/// Per-item retry states. A capacity failure on a non-CPU device earns
/// one retry on the CPU; every other failure goes straight to
/// `Exhausted`.
enum Attempt {
    Primary,
    Fallback,
    Exhausted,
}

/// Drives a backend over batches of images.
pub struct ScoreEngine {
    backend: Box<dyn AestheticBackend>,
    primary: ScoreDevice,
    batch_size: usize,
    cancel: CancelToken,
}

impl std::fmt::Debug for ScoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreEngine")
            .field("backend", &self.backend.name())
            .field("device", &self.primary)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl ScoreEngine {
    /// Creates an engine over `backend`.
    ///
    /// A `batch_size` of zero is rejected here so it can never surface
    /// mid-run.
    pub fn new(backend: Box<dyn AestheticBackend>, batch_size: usize) -> Result<Self, EngineError> {
        if batch_size == 0 {
            return Err(EngineError::InvalidBatchSize { got: batch_size });
        }

        let primary = backend.device();
        Ok(Self {
            backend,
            primary,
            batch_size,
            cancel: CancelToken::new(),
        })
    }

    /// Handle for cancelling this engine's runs.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The device scoring attempts start on; unchanged by fallback.
    pub fn device(&self) -> ScoreDevice {
        self.primary
    }

    /// Scans `root` and scores every discovered image.
    ///
    /// Only scan-boundary problems (missing root, root not a directory)
    /// surface as errors; everything past discovery degrades per
    /// [`ScoreEngine::score_files`].
    pub fn score_directory(
        &self,
        root: &Path,
        recursive: bool,
        progress: &mut ProgressFn<'_>,
    ) -> Result<Vec<ScoredImage>, EngineError> {
        let files = discover_images(root, recursive)?;
        Ok(self.score_files(&files, progress))
    }

    /// Scores `files` in order, one result per input.
    ///
    /// Never fails: backend errors degrade to per-item scoring and,
    /// ultimately, to the sentinel score. The result list is shorter
    /// than the input only when the run is cancelled part-way through.
    pub fn score_files(&self, files: &[PathBuf], progress: &mut ProgressFn<'_>) -> Vec<ScoredImage> {
        if files.is_empty() {
            return Vec::new();
        }

        let total = files.len();
        let mut results: Vec<ScoredImage> = Vec::with_capacity(total);

        info!(
            total,
            batch_size = self.batch_size,
            backend = self.backend.name(),
            device = %self.primary,
            "scoring run started"
        );

        for batch in files.chunks(self.batch_size) {
            if self.cancel.is_cancelled() {
                info!(
                    processed = results.len(),
                    total, "run cancelled, returning partial results"
                );
                return results;
            }

            match self.backend.batch_predict(batch, self.primary) {
                Ok(raw_scores) if raw_scores.len() == batch.len() => {
                    for (path, raw) in batch.iter().zip(raw_scores) {
                        results.push(ScoredImage::new(path.clone(), finish_raw(path, raw)));
                    }
                }
                Ok(raw_scores) => {
                    warn!(
                        expected = batch.len(),
                        got = raw_scores.len(),
                        "backend returned a mismatched batch, rescoring items individually"
                    );
                    self.score_batch_individually(batch, &mut results);
                }
                Err(error) if error.is_resource_exhausted() => {
                    warn!(
                        error = %error,
                        batch = batch.len(),
                        "batch exhausted device resources, degrading to per-item scoring"
                    );
                    self.score_batch_individually(batch, &mut results);
                }
                Err(error) => {
                    warn!(
                        error = %error,
                        batch = batch.len(),
                        "batch scoring failed, degrading to per-item scoring"
                    );
                    self.score_batch_individually(batch, &mut results);
                }
            }

            progress(results.len(), total);
        }

        debug!(
            scored = results.len(),
            failures = results.iter().filter(|r| r.is_failure()).count(),
            "scoring run complete"
        );
        results
    }

    fn score_batch_individually(&self, batch: &[PathBuf], results: &mut Vec<ScoredImage>) {
        for path in batch {
            results.push(ScoredImage::new(path.clone(), self.score_image(path)));
        }
    }

    /// Scores one image, absorbing every failure into the sentinel.
    ///
    /// A capacity failure on a non-CPU device is retried once on the
    /// CPU; the engine's primary device selection is left untouched.
    pub fn score_image(&self, path: &Path) -> f32 {
        if !path.exists() {
            warn!(image = %path.display(), "image disappeared before scoring");
            return SCORE_FAILED;
        }
        if !scanner::has_supported_extension(path) {
            warn!(image = %path.display(), "unsupported image extension");
            return SCORE_FAILED;
        }

        let mut attempt = Attempt::Primary;
        loop {
            attempt = match attempt {
                Attempt::Primary => match self.backend.predict(path, self.primary) {
                    Ok(raw) => return finish_raw(path, raw),
                    Err(error) if error.is_resource_exhausted() && !self.primary.is_cpu() => {
                        warn!(
                            image = %path.display(),
                            error = %error,
                            "device out of resources, retrying on cpu"
                        );
                        Attempt::Fallback
                    }
                    Err(error) => {
                        warn!(image = %path.display(), error = %error, "prediction failed");
                        Attempt::Exhausted
                    }
                },
                Attempt::Fallback => match self.backend.predict(path, ScoreDevice::Cpu) {
                    Ok(raw) => return finish_raw(path, raw),
                    Err(error) => {
                        warn!(image = %path.display(), error = %error, "cpu fallback failed");
                        Attempt::Exhausted
                    }
                },
                Attempt::Exhausted => return SCORE_FAILED,
            };
        }
    }
}

/// Normalizes a raw backend score. Non-finite raw values are failures,
/// not candidates for clamping.
fn finish_raw(path: &Path, raw: f32) -> f32 {
    if raw.is_finite() {
        normalize_raw_score(raw)
    } else {
        warn!(image = %path.display(), raw, "backend produced a non-finite score");
        SCORE_FAILED
    }
}
