//! Cross-cutting, shared constants.
//!
//! The score scale is a compatibility contract: results written by one
//! version must read the same in the next, so the shift and clamp bounds
//! below never change independently.

/// Lowest value the normalizer can produce for a successful prediction.
pub const SCORE_FLOOR: f32 = 1.0;

/// Highest value the normalizer can produce.
pub const SCORE_CEILING: f32 = 10.0;

/// Additive shift applied to raw model output before clamping.
pub const SCORE_SHIFT: f32 = 5.0;

/// Sentinel marking an image that could not be scored.
///
/// Sits below [`SCORE_FLOOR`], so it is unambiguous in result sets.
pub const SCORE_FAILED: f32 = 0.0;

/// Images per batch when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// File extensions treated as images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "webp"];
