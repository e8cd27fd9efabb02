//! Pluggable category-level detectors
//!
//! semantic_drift and label_flip need categorical frequency tables that the
//! compact profile statistics cannot carry. The comparator therefore
//! consults registered detectors instead of hard-coding an algorithm; the
//! engine ships the seam, embedders ship the detector.

use crate::models::issue::IssueDraft;
use crate::models::profile::Profile;

/// A detector for column-value-category-level comparisons.
///
/// Implementations receive both profiles and return fully graded drafts.
/// Whatever distributional detail a detector can reconstruct belongs in
/// each draft's evidence payload.
pub trait CategoricalDetector: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn detect(&self, previous: &Profile, current: &Profile) -> Vec<IssueDraft>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::drift::comparator::DriftComparator;
    use crate::models::issue::{IssueType, Severity};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    struct LabelFlipStub;

    impl CategoricalDetector for LabelFlipStub {
        fn name(&self) -> &str {
            "label-flip-stub"
        }

        fn detect(&self, _previous: &Profile, _current: &Profile) -> Vec<IssueDraft> {
            vec![IssueDraft {
                issue_type: IssueType::LabelFlip,
                severity: Severity::Critical,
                column_name: Some("label".into()),
                description: "Majority class flipped between snapshots".into(),
                evidence: Some(serde_json::json!({
                    "before_majority": "ham",
                    "after_majority": "spam",
                })),
            }]
        }
    }

    fn empty_profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            dataset_id: Uuid::new_v4(),
            version: 0,
            created_at: Utc::now(),
            columns_metadata: BTreeMap::new(),
            statistics: BTreeMap::new(),
            sample_rows: vec![],
            fingerprint: String::new(),
        }
    }

    #[test]
    fn test_registered_detector_contributes_drafts() {
        let comparator = DriftComparator::new(DetectorConfig::default())
            .unwrap()
            .with_detector(Box::new(LabelFlipStub));

        let drafts = comparator.compare(&empty_profile(), &empty_profile());
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].issue_type, IssueType::LabelFlip);
        assert_eq!(drafts[0].severity, Severity::Critical);
    }
}
