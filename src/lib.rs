//! Aesthetic image scoring over directory trees.
//!
//! The pipeline walks a directory, batches the discovered images, and
//! drives a scoring backend, degrading gracefully when the device runs
//! out of resources:
//!
//! - [`scanner`] enumerates candidate images deterministically.
//! - [`backend`] defines the scoring capability, the device model, and
//!   the bundled implementations (CLIP, stub).
//! - [`engine`] batches, degrades, reports progress, and never loses
//!   completed work.
//! - [`score`] maps raw model output onto the 1-10 user scale.
//! - [`report`] persists CSV results and summarizes runs.
//! - [`config`] reads `LUMEN_*` environment overrides.
//!
//! Every successful score lies in `[1.0, 10.0]`; the sentinel `0.0`
//! marks an image that could not be scored. A run always completes with
//! one result per discovered image; per-item failures degrade to the
//! sentinel instead of aborting the scan.
//!
//! Mock support is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod backend;
pub mod config;
pub mod constants;
pub mod engine;
pub mod report;
pub mod scanner;
pub mod score;

pub use backend::clip::{ClipBackend, ClipScorer, ClipVariant};
pub use backend::device::select_device;
#[cfg(any(test, feature = "mock"))]
pub use backend::mock::{BatchBehavior, MockBackend, RecordedCall};
pub use backend::registry::{BackendConfig, available_backends, create_backend};
pub use backend::stub::StubBackend;
pub use backend::{AestheticBackend, BackendError, ScoreDevice};

pub use config::{Config, ConfigError, DEFAULT_BACKEND, parse_device};
pub use constants::{
    DEFAULT_BATCH_SIZE, SCORE_CEILING, SCORE_FAILED, SCORE_FLOOR, SCORE_SHIFT,
    SUPPORTED_EXTENSIONS,
};
pub use engine::{CancelToken, EngineError, ProgressFn, ScoreEngine};
pub use report::{ReportError, Summary, TOP_COUNT, write_csv};
pub use scanner::{ScanError, discover_images, has_supported_extension};
pub use score::{ScoredImage, normalize_raw_score};
