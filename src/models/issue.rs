//! Issue record
//!
//! A detected quality or schema regression between two profiles of the
//! same dataset. Issues are immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed enumeration of detectable regressions. Unknown values fail
/// deserialization rather than being silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    SchemaChange,
    DistributionDrift,
    SemanticDrift,
    NullSpike,
    CardinalityAnomaly,
    LabelFlip,
}

/// Severity levels, totally ordered from `Low` to `Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub issue_type: IssueType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    pub description: String,
    /// Raw before/after values sufficient to reproduce the detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<serde_json::Value>,
    pub detected_at: DateTime<Utc>,
}

/// An issue as produced by the comparator, before the ingestion pipeline
/// stamps identity and timestamps onto it. Keeps the comparator a pure
/// function of the two profiles.
#[derive(Debug, Clone)]
pub struct IssueDraft {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub column_name: Option<String>,
    pub description: String,
    pub evidence: Option<serde_json::Value>,
}

impl IssueDraft {
    /// Materialize the draft against a dataset.
    pub fn into_issue(self, dataset_id: Uuid, detected_at: DateTime<Utc>) -> Issue {
        Issue {
            id: Uuid::new_v4(),
            dataset_id,
            issue_type: self.issue_type,
            severity: self.severity,
            column_name: self.column_name,
            description: self.description,
            evidence: self.evidence,
            detected_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_is_totally_ordered() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_unknown_issue_type_rejected() {
        let parsed: Result<IssueType, _> = serde_json::from_str("\"data_gremlin\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_issue_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&IssueType::NullSpike).unwrap(),
            "\"null_spike\""
        );
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
    }
}
