//! Dataset Registry
//!
//! Keyed store of dataset records. A dataset record only changes when a
//! new snapshot is registered for it: row/column counts and `updated_at`
//! move, everything else stays as first registered.

use crate::error::{EngineError, EngineResult};
use crate::models::dataset::Dataset;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct DatasetRegistry {
    datasets: Arc<RwLock<HashMap<Uuid, Dataset>>>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self {
            datasets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create the dataset on first snapshot, update counts on later ones.
    pub async fn register_snapshot(
        &self,
        id: Uuid,
        name: &str,
        row_count: u64,
        column_count: u64,
    ) -> Dataset {
        let mut datasets = self.datasets.write().await;
        match datasets.get_mut(&id) {
            Some(existing) => {
                existing.row_count = row_count;
                existing.column_count = column_count;
                existing.updated_at = Utc::now();
                existing.clone()
            }
            None => {
                let dataset = Dataset::new(id, name, row_count, column_count);
                datasets.insert(id, dataset.clone());
                tracing::info!(dataset_id = %id, name = %name, "registered dataset");
                dataset
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> EngineResult<Dataset> {
        let datasets = self.datasets.read().await;
        datasets
            .get(&id)
            .cloned()
            .ok_or(EngineError::UnknownDataset(id))
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        let datasets = self.datasets.read().await;
        datasets.contains_key(&id)
    }

    /// All datasets, oldest first.
    pub async fn list(&self) -> Vec<Dataset> {
        let datasets = self.datasets.read().await;
        let mut all: Vec<Dataset> = datasets.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        all
    }
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reregistration_updates_counts_only() {
        let registry = DatasetRegistry::new();
        let id = Uuid::new_v4();

        let first = registry.register_snapshot(id, "orders", 100, 3).await;
        let second = registry.register_snapshot(id, "ignored-rename", 150, 4).await;

        assert_eq!(second.name, "orders");
        assert_eq!(second.row_count, 150);
        assert_eq!(second.column_count, 4);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_get_unknown_dataset_fails() {
        let registry = DatasetRegistry::new();
        let err = registry.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_DATASET");
    }
}
