//! Error types crossing the engine's collaborator seams.

use std::time::Duration;

use crate::types::DbId;

/// A rule-store or event-log operation failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("alert {0} no longer exists")]
    NotFound(DbId),

    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Wrap any backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

/// Publishing a breach to live subscribers failed.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("notification transport error: {0}")]
    Transport(String),
}

/// The only failure an `evaluate` call reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("rule lookup failed for metric '{metric_name}': {source}")]
    Lookup {
        metric_name: String,
        #[source]
        source: StoreError,
    },
}
