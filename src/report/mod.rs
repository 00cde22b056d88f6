//! Result persistence and run summaries.

mod error;


pub use error::ReportError;

use std::cmp::Ordering;
use std::path::Path;

use tracing::info;

use crate::score::ScoredImage;

/// Entries kept in [`Summary::top`].
pub const TOP_COUNT: usize = 5;

/// Writes `results` as CSV with a `path,score` header.
///
/// Scores are rendered with two decimals; the sentinel appears as
/// `0.00`.
pub fn write_csv(results: &[ScoredImage], output: &Path) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(output)?;

    writer.write_record(["path", "score"])?;
    for result in results {
        writer.write_record([
            result.path.display().to_string(),
            format!("{:.2}", result.score),
        ])?;
    }
    writer.flush()?;

    info!(output = %output.display(), rows = results.len(), "results written");
    Ok(())
}

/// Aggregates of a finished run, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    /// Entries carrying the failure sentinel.
    pub failures: usize,
    /// Mean over every entry, sentinels included.
    pub average: f32,
    /// Highest-scoring entries, best first, at most [`TOP_COUNT`].
    pub top: Vec<ScoredImage>,
}

impl Summary {
    pub fn from_results(results: &[ScoredImage]) -> Self {
        let total = results.len();
        let failures = results.iter().filter(|r| r.is_failure()).count();
        let average = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| r.score).sum::<f32>() / total as f32
        };

        let mut top: Vec<ScoredImage> = results.to_vec();
        top.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        top.truncate(TOP_COUNT);

        Self {
            total,
            failures,
            average,
            top,
        }
    }
}
