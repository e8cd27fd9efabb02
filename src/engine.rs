//! Audit Engine
//!
//! Wires the profiler, drift comparator, lineage tracker, and stores into
//! the boundary contracts the external collaborators call: snapshot
//! ingestion, lineage recording, and the read-side query API.

use crate::config::{ConflictPolicy, Settings};
use crate::drift::{CategoricalDetector, DriftComparator, IssueStore};
use crate::error::{EngineError, EngineResult};
use crate::lineage::{Direction, LineageStore, LineageTrace, LineageWalker};
use crate::models::dataset::Dataset;
use crate::models::issue::Issue;
use crate::models::lineage::LineageEdge;
use crate::models::profile::Profile;
use crate::models::snapshot::TabularSnapshot;
use crate::profiler::{ProfileStore, Profiler};
use crate::registry::DatasetRegistry;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

/// One-hop lineage around a dataset, as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LineageView {
    pub dataset_id: Uuid,
    pub upstream: Vec<LineageEdge>,
    pub downstream: Vec<LineageEdge>,
}

/// The combined per-dataset view: record, latest profile, issue history,
/// and one-hop lineage. Missing optional data renders as absent/empty,
/// never as an error.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetView {
    pub dataset: Dataset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_profile: Option<Profile>,
    /// All severities, most recent first
    pub issues: Vec<Issue>,
    pub lineage: LineageView,
}

/// The engine behind the audit service. All handlers share one instance.
pub struct AuditEngine {
    on_conflict: ConflictPolicy,
    profiler: Profiler,
    comparator: DriftComparator,
    datasets: DatasetRegistry,
    profiles: ProfileStore,
    issues: IssueStore,
    lineage: LineageStore,
    /// Per-dataset ingestion locks: at most one profiling+comparison
    /// pipeline in flight per dataset id
    ingestions: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl AuditEngine {
    /// Build an engine from validated settings. Invalid thresholds fail
    /// here, before anything can be ingested.
    pub fn new(settings: Settings) -> EngineResult<Self> {
        let comparator = DriftComparator::new(settings.detector.clone())?;
        Ok(Self {
            on_conflict: settings.ingestion.on_conflict,
            profiler: Profiler::new(settings.ingestion.sample_rows),
            comparator,
            datasets: DatasetRegistry::new(),
            profiles: ProfileStore::new(),
            issues: IssueStore::new(),
            lineage: LineageStore::new(),
            ingestions: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Register a pluggable category-level detector (semantic_drift,
    /// label_flip). Construction-time only; the comparator is immutable
    /// during a run.
    pub fn with_detector(mut self, detector: Box<dyn CategoricalDetector>) -> Self {
        self.comparator = self.comparator.with_detector(detector);
        self
    }

    // ==================== Ingestion ====================

    /// Ingest one dataset snapshot: profile it, persist the profile, and
    /// compare against the previous profile of the same dataset.
    ///
    /// The whole pipeline holds the dataset's ingestion lock so the
    /// comparator always observes profiles in creation order.
    pub async fn submit_snapshot(
        &self,
        dataset_id: Uuid,
        name: &str,
        data: TabularSnapshot,
    ) -> EngineResult<Profile> {
        // Reject malformed input before touching any state.
        data.validate()?;

        let _guard = self.ingestion_guard(dataset_id).await?;

        let previous = self.profiles.latest(dataset_id).await;
        let profile = self.profiler.profile(dataset_id, &data)?;

        self.datasets
            .register_snapshot(
                dataset_id,
                name,
                data.row_count() as u64,
                data.column_count() as u64,
            )
            .await;
        let profile = self.profiles.save(profile).await;

        // Nothing to compare against on the very first profile.
        if let Some(previous) = previous {
            let detected_at = Utc::now();
            let issues: Vec<Issue> = self
                .comparator
                .compare(&previous, &profile)
                .into_iter()
                .map(|draft| draft.into_issue(dataset_id, detected_at))
                .collect();

            if !issues.is_empty() {
                warn!(
                    dataset_id = %dataset_id,
                    count = issues.len(),
                    "quality issues detected"
                );
            }
            self.issues.save_batch(issues).await;
        }

        info!(
            dataset_id = %dataset_id,
            version = profile.version,
            "snapshot ingested"
        );
        Ok(profile)
    }

    async fn ingestion_guard(&self, dataset_id: Uuid) -> EngineResult<OwnedMutexGuard<()>> {
        let lock = {
            let mut ingestions = self.ingestions.lock().await;
            ingestions
                .entry(dataset_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        match self.on_conflict {
            ConflictPolicy::Queue => Ok(lock.lock_owned().await),
            ConflictPolicy::Reject => lock
                .try_lock_owned()
                .map_err(|_| EngineError::ConcurrentIngestionConflict(dataset_id)),
        }
    }

    // ==================== Lineage recording ====================

    /// Record that `job_name` read `source_id` and wrote `target_id`.
    /// Both endpoints must already be registered datasets.
    pub async fn record_lineage(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        job_name: &str,
        job_type: &str,
    ) -> EngineResult<LineageEdge> {
        self.require_dataset(source_id).await?;
        self.require_dataset(target_id).await?;

        let edge = LineageEdge::new(source_id, target_id, job_name, job_type);
        Ok(self.lineage.record(edge).await)
    }

    /// Append a corrected edge naming the record it supersedes. The old
    /// edge stays in the log untouched; the reference is advisory.
    pub async fn record_lineage_correction(
        &self,
        supersedes: Uuid,
        source_id: Uuid,
        target_id: Uuid,
        job_name: &str,
        job_type: &str,
    ) -> EngineResult<LineageEdge> {
        self.require_dataset(source_id).await?;
        self.require_dataset(target_id).await?;

        let edge =
            LineageEdge::new(source_id, target_id, job_name, job_type).superseding(supersedes);
        Ok(self.lineage.record(edge).await)
    }

    // ==================== Query API ====================

    pub async fn list_datasets(&self) -> Vec<Dataset> {
        self.datasets.list().await
    }

    pub async fn get_dataset(&self, dataset_id: Uuid) -> EngineResult<Dataset> {
        self.datasets.get(dataset_id).await
    }

    /// The aggregated per-dataset view. Fails only for an unknown dataset
    /// id; absent profile and empty issue/lineage lists are normal.
    pub async fn get_dataset_view(&self, dataset_id: Uuid) -> EngineResult<DatasetView> {
        let dataset = self.datasets.get(dataset_id).await?;
        let latest_profile = self.profiles.latest(dataset_id).await;
        let issues = self.issues.for_dataset(dataset_id).await;
        let lineage = LineageView {
            dataset_id,
            upstream: self.lineage.upstream(dataset_id).await,
            downstream: self.lineage.downstream(dataset_id).await,
        };

        Ok(DatasetView {
            dataset,
            latest_profile,
            issues,
            lineage,
        })
    }

    /// Issues for one dataset, or across all datasets when no filter is
    /// given. Most recent first.
    pub async fn list_issues(&self, dataset_id: Option<Uuid>) -> EngineResult<Vec<Issue>> {
        match dataset_id {
            Some(id) => {
                self.require_dataset(id).await?;
                Ok(self.issues.for_dataset(id).await)
            }
            None => Ok(self.issues.all().await),
        }
    }

    /// All profiles for a dataset, most recent first.
    pub async fn list_profiles(&self, dataset_id: Uuid) -> EngineResult<Vec<Profile>> {
        self.require_dataset(dataset_id).await?;
        Ok(self.profiles.list(dataset_id).await)
    }

    /// Latest profile, `None` when no snapshot has been profiled yet.
    pub async fn latest_profile(&self, dataset_id: Uuid) -> EngineResult<Option<Profile>> {
        self.require_dataset(dataset_id).await?;
        Ok(self.profiles.latest(dataset_id).await)
    }

    /// One-hop lineage around a dataset.
    pub async fn get_lineage(&self, dataset_id: Uuid) -> EngineResult<LineageView> {
        self.require_dataset(dataset_id).await?;
        Ok(LineageView {
            dataset_id,
            upstream: self.lineage.upstream(dataset_id).await,
            downstream: self.lineage.downstream(dataset_id).await,
        })
    }

    /// Full multi-hop lineage path from a dataset, breadth-first with
    /// cycle detection.
    pub async fn trace_lineage(
        &self,
        dataset_id: Uuid,
        direction: Direction,
    ) -> EngineResult<LineageTrace> {
        self.require_dataset(dataset_id).await?;
        let edges = self.lineage.all().await;
        Ok(LineageWalker::trace(&edges, dataset_id, direction))
    }

    async fn require_dataset(&self, dataset_id: Uuid) -> EngineResult<()> {
        if self.datasets.contains(dataset_id).await {
            Ok(())
        } else {
            Err(EngineError::UnknownDataset(dataset_id))
        }
    }
}
