//! Score normalization and result types.

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{SCORE_CEILING, SCORE_FAILED, SCORE_FLOOR, SCORE_SHIFT};

/// Maps a raw model output onto the user-facing scale.
///
/// Raw scores come out of the aesthetic head centred near zero. Shifting
/// by [`SCORE_SHIFT`] and clamping to [`SCORE_FLOOR`]..=[`SCORE_CEILING`]
/// keeps results comparable across model variants. The clamp floor
/// guarantees a successful prediction can never collide with
/// [`SCORE_FAILED`].
pub fn normalize_raw_score(raw: f32) -> f32 {
    (raw + SCORE_SHIFT).clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// A scored image, as surfaced to callers and reports.
///
/// `score` is either a normalized value in `[1.0, 10.0]` or exactly
/// [`SCORE_FAILED`] when the image could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredImage {
    pub path: PathBuf,
    pub score: f32,
}

impl ScoredImage {
    pub fn new(path: impl Into<PathBuf>, score: f32) -> Self {
        Self {
            path: path.into(),
            score,
        }
    }

    /// Returns `true` if this entry carries the failure sentinel.
    pub fn is_failure(&self) -> bool {
        self.score == SCORE_FAILED
    }
}

impl fmt::Display for ScoredImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_failure() {
            write!(f, "{}: unscored", self.path.display())
        } else {
            write!(f, "{}: {:.2}", self.path.display(), self.score)
        }
    }
}
