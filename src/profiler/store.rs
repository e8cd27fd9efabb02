//! Profile Store
//!
//! Append-only per-dataset profile log. "Latest" is an index to the most
//! recent entry, never mutable global state.

use crate::models::profile::Profile;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct ProfileStore {
    /// Dataset id -> profiles in creation order
    profiles: Arc<RwLock<HashMap<Uuid, Vec<Profile>>>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Append a profile, assigning the next version number for its dataset.
    pub async fn save(&self, mut profile: Profile) -> Profile {
        let mut profiles = self.profiles.write().await;
        let log = profiles.entry(profile.dataset_id).or_default();
        profile.version = log.len() as u64 + 1;
        log.push(profile.clone());

        tracing::info!(
            dataset_id = %profile.dataset_id,
            version = profile.version,
            "saved profile"
        );
        profile
    }

    /// Most recent profile for a dataset.
    pub async fn latest(&self, dataset_id: Uuid) -> Option<Profile> {
        let profiles = self.profiles.read().await;
        profiles.get(&dataset_id)?.last().cloned()
    }

    /// All profiles for a dataset, most recent first.
    pub async fn list(&self, dataset_id: Uuid) -> Vec<Profile> {
        let profiles = self.profiles.read().await;
        profiles
            .get(&dataset_id)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn count(&self, dataset_id: Uuid) -> usize {
        let profiles = self.profiles.read().await;
        profiles.get(&dataset_id).map(Vec::len).unwrap_or(0)
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn profile_for(dataset_id: Uuid) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            dataset_id,
            version: 0,
            created_at: Utc::now(),
            columns_metadata: BTreeMap::new(),
            statistics: BTreeMap::new(),
            sample_rows: vec![],
            fingerprint: String::new(),
        }
    }

    #[test]
    fn test_save_assigns_increasing_versions() {
        tokio_test::block_on(async {
            let store = ProfileStore::new();
            let dataset_id = Uuid::new_v4();

            let first = store.save(profile_for(dataset_id)).await;
            let second = store.save(profile_for(dataset_id)).await;

            assert_eq!(first.version, 1);
            assert_eq!(second.version, 2);
            assert_eq!(store.latest(dataset_id).await.unwrap().version, 2);
        });
    }

    #[test]
    fn test_list_is_reverse_chronological() {
        tokio_test::block_on(async {
            let store = ProfileStore::new();
            let dataset_id = Uuid::new_v4();
            store.save(profile_for(dataset_id)).await;
            store.save(profile_for(dataset_id)).await;
            store.save(profile_for(dataset_id)).await;

            let versions: Vec<u64> = store
                .list(dataset_id)
                .await
                .iter()
                .map(|p| p.version)
                .collect();
            assert_eq!(versions, vec![3, 2, 1]);
        });
    }

    #[test]
    fn test_unknown_dataset_has_no_profiles() {
        tokio_test::block_on(async {
            let store = ProfileStore::new();
            assert!(store.latest(Uuid::new_v4()).await.is_none());
            assert!(store.list(Uuid::new_v4()).await.is_empty());
        });
    }
}
