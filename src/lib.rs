//! Lineage Auditor Engine
//!
//! Audits tabular datasets for quality regressions and tracks their
//! provenance across a pipeline of producing/consuming jobs:
//!
//! - **Profiler**: per-column metadata and statistics for each snapshot
//! - **Drift Comparator**: diffs consecutive profiles and raises issues
//! - **Lineage Tracker**: directed dataset-to-job-to-dataset graph
//! - **Audit Engine**: ingestion pipeline plus the read-side query API
//!
//! The engine is the backend behind an upload/storage collaborator and a
//! presentation layer; HTTP, file storage, and auth live with those
//! collaborators, not here.
//!
//! ```no_run
//! use lineage_auditor::{AuditEngine, Settings, TabularSnapshot, Value};
//! use uuid::Uuid;
//!
//! # async fn run() -> lineage_auditor::EngineResult<()> {
//! let engine = AuditEngine::new(Settings::load()?)?;
//!
//! let snapshot = TabularSnapshot::new(
//!     vec!["age".into(), "name".into()],
//!     vec![vec![Value::Int(34), Value::Text("ada".into())]],
//! );
//! let profile = engine.submit_snapshot(Uuid::new_v4(), "people", snapshot).await?;
//! println!("profiled v{}", profile.version);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod drift;
pub mod engine;
pub mod error;
pub mod lineage;
pub mod models;
pub mod profiler;
pub mod registry;

pub use config::{ConflictPolicy, DetectorConfig, IngestionConfig, Settings};
pub use drift::{CategoricalDetector, DriftComparator};
pub use engine::{AuditEngine, DatasetView, LineageView};
pub use error::{EngineError, EngineResult};
pub use lineage::{Direction, LineageTrace};
pub use models::{
    Dataset, Dtype, Issue, IssueDraft, IssueType, LineageEdge, Profile, Severity,
    TabularSnapshot, Value,
};
pub use profiler::Profiler;
