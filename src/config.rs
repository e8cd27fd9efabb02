//! Engine configuration module
//!
//! Handles loading and validating configuration from environment variables.
//! Detection thresholds are loaded once at startup and stay immutable for
//! the lifetime of the engine.

use crate::error::{threshold_config_error, EngineResult};
use serde::{Deserialize, Serialize};

/// What to do when a second ingestion arrives for a dataset whose
/// profiling+comparison pipeline is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Wait for the in-flight ingestion, then run
    Queue,
    /// Fail fast with `ConcurrentIngestionConflict`
    Reject,
}

/// Detection thresholds, one named field per rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Percentage-point increase in null_percentage that raises null_spike
    pub null_spike_delta: f64,
    /// Relative cardinality change that raises cardinality_anomaly
    /// (growth beyond this factor, or shrink below its reciprocal)
    pub cardinality_factor: f64,
    /// Normalized mean/std shift that raises distribution_drift
    pub drift_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            null_spike_delta: 10.0,
            cardinality_factor: 2.0,
            drift_threshold: 0.1,
        }
    }
}

impl DetectorConfig {
    /// Validate threshold values. Invalid configuration is fatal; the
    /// comparator refuses to start with it.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.null_spike_delta.is_finite() || self.null_spike_delta <= 0.0 {
            return Err(threshold_config_error(format!(
                "null_spike_delta must be finite and positive, got {}",
                self.null_spike_delta
            )));
        }
        if !self.cardinality_factor.is_finite() || self.cardinality_factor <= 1.0 {
            return Err(threshold_config_error(format!(
                "cardinality_factor must be finite and greater than 1, got {}",
                self.cardinality_factor
            )));
        }
        if !self.drift_threshold.is_finite() || self.drift_threshold <= 0.0 {
            return Err(threshold_config_error(format!(
                "drift_threshold must be finite and positive, got {}",
                self.drift_threshold
            )));
        }
        Ok(())
    }
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    pub on_conflict: ConflictPolicy,
    /// Number of rows kept in a profile's sample preview
    pub sample_rows: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            on_conflict: ConflictPolicy::Queue,
            sample_rows: 20,
        }
    }
}

/// Complete engine settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub detector: DetectorConfig,
    pub ingestion: IngestionConfig,
}

impl Settings {
    /// Load settings from environment variables, falling back to defaults.
    /// Threshold values are validated before the settings are returned.
    pub fn load() -> EngineResult<Self> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let defaults = DetectorConfig::default();
        let detector = DetectorConfig {
            null_spike_delta: env_parse("NULL_SPIKE_DELTA", defaults.null_spike_delta),
            cardinality_factor: env_parse("CARDINALITY_FACTOR", defaults.cardinality_factor),
            drift_threshold: env_parse("DRIFT_THRESHOLD", defaults.drift_threshold),
        };
        detector.validate()?;

        let ingestion = IngestionConfig {
            on_conflict: match std::env::var("INGESTION_ON_CONFLICT").as_deref() {
                Ok("reject") => ConflictPolicy::Reject,
                _ => ConflictPolicy::Queue,
            },
            sample_rows: env_parse("PROFILE_SAMPLE_ROWS", IngestionConfig::default().sample_rows),
        };

        Ok(Self {
            detector,
            ingestion,
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
