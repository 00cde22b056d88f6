use thiserror::Error;

/// Failures while persisting results.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write results: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
