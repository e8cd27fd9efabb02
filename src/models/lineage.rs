//! Lineage edge record
//!
//! A directed record that a job consumed the source dataset and produced
//! the target dataset. Edges are append-only; corrections are expressed as
//! new edges carrying a `supersedes` reference, never as mutation or
//! deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageEdge {
    pub id: Uuid,
    /// Dataset the job read from (non-owning reference)
    pub source_id: Uuid,
    /// Dataset the job wrote (non-owning reference)
    pub target_id: Uuid,
    pub job_name: String,
    /// "join", "aggregate", "filter", "transform", etc.
    pub job_type: String,
    /// Confidence score in [0, 1]
    pub confidence: f64,
    /// Edge this record corrects, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl LineageEdge {
    pub fn new(
        source_id: Uuid,
        target_id: Uuid,
        job_name: impl Into<String>,
        job_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            target_id,
            job_name: job_name.into(),
            job_type: job_type.into(),
            confidence: 1.0,
            supersedes: None,
            created_at: Utc::now(),
        }
    }

    pub fn superseding(mut self, superseded_edge: Uuid) -> Self {
        self.supersedes = Some(superseded_edge);
        self
    }
}
