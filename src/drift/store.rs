//! Issue Store
//!
//! Append-only per-dataset issue log. Issues are immutable once saved.

use crate::models::issue::Issue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct IssueStore {
    /// Dataset id -> issues in detection order
    issues: Arc<RwLock<HashMap<Uuid, Vec<Issue>>>>,
}

impl IssueStore {
    pub fn new() -> Self {
        Self {
            issues: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Append a batch of issues detected in one comparison run.
    pub async fn save_batch(&self, batch: Vec<Issue>) {
        if batch.is_empty() {
            return;
        }
        let mut issues = self.issues.write().await;
        for issue in batch {
            issues.entry(issue.dataset_id).or_default().push(issue);
        }
    }

    /// Issues for one dataset, most recent first.
    pub async fn for_dataset(&self, dataset_id: Uuid) -> Vec<Issue> {
        let issues = self.issues.read().await;
        issues
            .get(&dataset_id)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// All issues across datasets, most recent first.
    pub async fn all(&self) -> Vec<Issue> {
        let issues = self.issues.read().await;
        let mut all: Vec<Issue> = issues.values().flatten().cloned().collect();
        all.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
        all
    }
}

impl Default for IssueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::issue::{IssueType, Severity};
    use chrono::{Duration, Utc};

    fn issue(dataset_id: Uuid, minutes_ago: i64) -> Issue {
        Issue {
            id: Uuid::new_v4(),
            dataset_id,
            issue_type: IssueType::NullSpike,
            severity: Severity::Medium,
            column_name: Some("age".into()),
            description: "test".into(),
            evidence: None,
            detected_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_for_dataset_is_reverse_chronological() {
        let store = IssueStore::new();
        let dataset_id = Uuid::new_v4();
        store
            .save_batch(vec![issue(dataset_id, 10), issue(dataset_id, 5)])
            .await;

        let listed = store.for_dataset(dataset_id).await;
        assert_eq!(listed.len(), 2);
        assert!(listed[0].detected_at > listed[1].detected_at);
    }

    #[tokio::test]
    async fn test_all_spans_datasets() {
        let store = IssueStore::new();
        store.save_batch(vec![issue(Uuid::new_v4(), 1)]).await;
        store.save_batch(vec![issue(Uuid::new_v4(), 2)]).await;

        let all = store.all().await;
        assert_eq!(all.len(), 2);
        assert!(all[0].detected_at >= all[1].detected_at);
    }

    #[tokio::test]
    async fn test_unknown_dataset_is_empty_not_error() {
        let store = IssueStore::new();
        assert!(store.for_dataset(Uuid::new_v4()).await.is_empty());
    }
}
