//! Error handling module
//!
//! Provides the unified error type shared by every engine component.

use thiserror::Error;
use uuid::Uuid;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// The submitted snapshot has an invalid shape. Nothing is persisted.
    #[error("Malformed snapshot: {0}")]
    MalformedInput(String),

    /// A dataset id was referenced that the registry has never seen.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(Uuid),

    /// A second profiling attempt arrived for a dataset while one was in
    /// flight and the conflict policy is `Reject`.
    #[error("Ingestion already in flight for dataset: {0}")]
    ConcurrentIngestionConflict(Uuid),

    /// Detection threshold configuration is invalid. Raised at startup;
    /// the comparator is never constructed.
    #[error("Invalid threshold configuration: {0}")]
    ThresholdConfig(String),
}

impl EngineError {
    /// Stable machine-readable code for the calling collaborator.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::MalformedInput(_) => "MALFORMED_INPUT",
            EngineError::UnknownDataset(_) => "UNKNOWN_DATASET",
            EngineError::ConcurrentIngestionConflict(_) => "CONCURRENT_INGESTION",
            EngineError::ThresholdConfig(_) => "THRESHOLD_CONFIG",
        }
    }
}

/// Result type alias used across the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Helper function to create a malformed-input error
pub fn malformed_input(msg: impl Into<String>) -> EngineError {
    EngineError::MalformedInput(msg.into())
}

/// Helper function to create a threshold-config error
pub fn threshold_config_error(msg: impl Into<String>) -> EngineError {
    EngineError::ThresholdConfig(msg.into())
}
