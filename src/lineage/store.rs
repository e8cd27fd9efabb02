//! Lineage Store
//!
//! Global append-only log of lineage edges, queryable by endpoint id.
//! Edges are never mutated or deleted; corrections append new edges that
//! name the record they supersede.

use crate::models::lineage::LineageEdge;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct LineageStore {
    edges: Arc<RwLock<Vec<LineageEdge>>>,
}

impl LineageStore {
    pub fn new() -> Self {
        Self {
            edges: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append an edge to the log.
    pub async fn record(&self, edge: LineageEdge) -> LineageEdge {
        let mut edges = self.edges.write().await;
        edges.push(edge.clone());

        tracing::info!(
            source_id = %edge.source_id,
            target_id = %edge.target_id,
            job_name = %edge.job_name,
            "recorded lineage edge"
        );
        edge
    }

    /// One-hop upstream view: every edge whose target is this dataset.
    pub async fn upstream(&self, dataset_id: Uuid) -> Vec<LineageEdge> {
        let edges = self.edges.read().await;
        edges
            .iter()
            .filter(|e| e.target_id == dataset_id)
            .cloned()
            .collect()
    }

    /// One-hop downstream view: every edge whose source is this dataset.
    pub async fn downstream(&self, dataset_id: Uuid) -> Vec<LineageEdge> {
        let edges = self.edges.read().await;
        edges
            .iter()
            .filter(|e| e.source_id == dataset_id)
            .cloned()
            .collect()
    }

    /// Point-in-time copy of the whole log, for traversal.
    pub async fn all(&self) -> Vec<LineageEdge> {
        let edges = self.edges.read().await;
        edges.clone()
    }

    pub async fn get(&self, edge_id: Uuid) -> Option<LineageEdge> {
        let edges = self.edges.read().await;
        edges.iter().find(|e| e.id == edge_id).cloned()
    }
}

impl Default for LineageStore {
    fn default() -> Self {
        Self::new()
    }
}
