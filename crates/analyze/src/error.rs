use thiserror::Error;

pub type Result<T> = std::result::Result<T, RunFailure>;

/// A semantically failed build or test run.
///
/// Carries the full formatted diagnostic text, including any infrastructure
/// warning and scheme suggestion. Never downgraded to a warning by this
/// layer; callers decide presentation.
#[derive(Error, Debug)]
#[error("{report}")]
pub struct RunFailure {
    pub report: String,
}

impl RunFailure {
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
        }
    }
}
