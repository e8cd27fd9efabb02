//! Drift Comparator
//!
//! The comparison engine that detects quality regressions between two
//! consecutive profiles of the same dataset. State-machine-free: a pure
//! function of (previous, current), run once per new profile.

use crate::config::DetectorConfig;
use crate::drift::detectors::CategoricalDetector;
use crate::error::EngineResult;
use crate::models::issue::{IssueDraft, IssueType, Severity};
use crate::models::profile::Profile;
use serde_json::json;
use std::collections::BTreeSet;

/// Guards divisions when a baseline statistic is zero.
const EPSILON: f64 = 1e-9;

/// The comparator that evaluates every detection rule against a pair of
/// profiles. Rules are independent; multiple may fire per run.
pub struct DriftComparator {
    config: DetectorConfig,
    detectors: Vec<Box<dyn CategoricalDetector>>,
}

impl DriftComparator {
    /// Create a comparator with validated thresholds. Invalid configuration
    /// is fatal here; no comparator is constructed.
    pub fn new(config: DetectorConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detectors: Vec::new(),
        })
    }

    /// Register a pluggable detector for category-level rules
    /// (semantic_drift, label_flip) that need more than the compact
    /// profile statistics.
    pub fn with_detector(mut self, detector: Box<dyn CategoricalDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Compare the previous and current profile of one dataset.
    pub fn compare(&self, previous: &Profile, current: &Profile) -> Vec<IssueDraft> {
        let mut drafts = Vec::new();

        drafts.extend(self.check_schema_change(previous, current));
        drafts.extend(self.check_null_spike(previous, current));
        drafts.extend(self.check_cardinality_anomaly(previous, current));
        drafts.extend(self.check_distribution_drift(previous, current));

        for detector in &self.detectors {
            drafts.extend(detector.detect(previous, current));
        }

        drafts
    }

    /// Rule: column set differs or a column's dtype changed.
    fn check_schema_change(&self, previous: &Profile, current: &Profile) -> Vec<IssueDraft> {
        let mut drafts = Vec::new();

        let before: BTreeSet<&str> = previous.column_names().collect();
        let after: BTreeSet<&str> = current.column_names().collect();

        for column in after.difference(&before) {
            let dtype = current.columns_metadata[*column].dtype;
            drafts.push(IssueDraft {
                issue_type: IssueType::SchemaChange,
                severity: Severity::Low,
                column_name: Some((*column).to_string()),
                description: format!("Column {} added (dtype: {})", column, dtype),
                evidence: Some(json!({
                    "change": "column_added",
                    "column": column,
                    "dtype": dtype,
                })),
            });
        }

        for column in before.difference(&after) {
            let dtype = previous.columns_metadata[*column].dtype;
            drafts.push(IssueDraft {
                issue_type: IssueType::SchemaChange,
                severity: Severity::High,
                column_name: Some((*column).to_string()),
                description: format!("Column {} removed (was dtype: {})", column, dtype),
                evidence: Some(json!({
                    "change": "column_removed",
                    "column": column,
                    "dtype": dtype,
                })),
            });
        }

        for column in before.intersection(&after) {
            let before_dtype = previous.columns_metadata[*column].dtype;
            let after_dtype = current.columns_metadata[*column].dtype;
            if before_dtype != after_dtype {
                drafts.push(IssueDraft {
                    issue_type: IssueType::SchemaChange,
                    severity: Severity::High,
                    column_name: Some((*column).to_string()),
                    description: format!(
                        "Column {} dtype changed: {} -> {}",
                        column, before_dtype, after_dtype
                    ),
                    evidence: Some(json!({
                        "change": "dtype_changed",
                        "column": column,
                        "before": before_dtype,
                        "after": after_dtype,
                    })),
                });
            }
        }

        drafts
    }

    /// Rule: null_percentage rises by more than the configured delta
    /// (percentage points).
    fn check_null_spike(&self, previous: &Profile, current: &Profile) -> Vec<IssueDraft> {
        let mut drafts = Vec::new();
        let threshold = self.config.null_spike_delta;

        for (column, after) in &current.columns_metadata {
            let Some(before) = previous.columns_metadata.get(column) else {
                continue;
            };

            let delta = after.null_percentage - before.null_percentage;
            if delta > threshold {
                drafts.push(IssueDraft {
                    issue_type: IssueType::NullSpike,
                    severity: grade_severity(delta, threshold),
                    column_name: Some(column.clone()),
                    description: format!(
                        "Null percentage of {} rose from {:.2}% to {:.2}%",
                        column, before.null_percentage, after.null_percentage
                    ),
                    evidence: Some(json!({
                        "column": column,
                        "before_null_pct": before.null_percentage,
                        "after_null_pct": after.null_percentage,
                        "delta": delta,
                        "threshold": threshold,
                    })),
                });
            }
        }

        drafts
    }

    /// Rule: cardinality grows or shrinks beyond the configured relative
    /// factor for a column present in both profiles.
    fn check_cardinality_anomaly(&self, previous: &Profile, current: &Profile) -> Vec<IssueDraft> {
        let mut drafts = Vec::new();
        let threshold = self.config.cardinality_factor;

        for (column, after) in &current.columns_metadata {
            let Some(before) = previous.columns_metadata.get(column) else {
                continue;
            };

            // Zero cardinalities (all-null columns) are clamped so the
            // ratio stays finite and deterministic.
            let before_card = before.cardinality.max(1) as f64;
            let after_card = after.cardinality.max(1) as f64;
            let ratio = after_card / before_card;
            let factor = ratio.max(1.0 / ratio);

            if factor > threshold {
                drafts.push(IssueDraft {
                    issue_type: IssueType::CardinalityAnomaly,
                    severity: grade_severity(factor, threshold),
                    column_name: Some(column.clone()),
                    description: format!(
                        "Cardinality of {} changed from {} to {} ({:.2}x)",
                        column, before.cardinality, after.cardinality, ratio
                    ),
                    evidence: Some(json!({
                        "column": column,
                        "before_cardinality": before.cardinality,
                        "after_cardinality": after.cardinality,
                        "factor": factor,
                        "threshold": threshold,
                    })),
                });
            }
        }

        drafts
    }

    /// Rule: normalized mean/std shift for a numeric column exceeds the
    /// configured threshold.
    fn check_distribution_drift(&self, previous: &Profile, current: &Profile) -> Vec<IssueDraft> {
        let mut drafts = Vec::new();
        let threshold = self.config.drift_threshold;

        for (column, after) in &current.statistics {
            let Some(before) = previous.statistics.get(column) else {
                continue;
            };

            let mean_shift = (after.mean - before.mean).abs() / before.mean.abs().max(EPSILON);
            let std_shift = (after.std - before.std).abs() / before.std.abs().max(EPSILON);
            let magnitude = mean_shift.max(std_shift);

            if magnitude > threshold {
                drafts.push(IssueDraft {
                    issue_type: IssueType::DistributionDrift,
                    severity: grade_severity(magnitude, threshold),
                    column_name: Some(column.clone()),
                    description: format!(
                        "Distribution of {} shifted (mean {:.4} -> {:.4}, std {:.4} -> {:.4})",
                        column, before.mean, after.mean, before.std, after.std
                    ),
                    evidence: Some(json!({
                        "column": column,
                        "before": before,
                        "after": after,
                        "mean_shift": mean_shift,
                        "std_shift": std_shift,
                        "threshold": threshold,
                    })),
                });
            }
        }

        drafts
    }
}

/// Deterministic severity from the magnitude of deviation relative to the
/// rule's threshold: low below 1.5x, medium below 3x, high below 6x,
/// critical beyond.
pub fn grade_severity(magnitude: f64, threshold: f64) -> Severity {
    let ratio = magnitude / threshold;
    if ratio < 1.5 {
        Severity::Low
    } else if ratio < 3.0 {
        Severity::Medium
    } else if ratio < 6.0 {
        Severity::High
    } else {
        Severity::Critical
    }
}
