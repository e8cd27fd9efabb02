//! Profile record
//!
//! A structured summary (metadata + statistics + sample) of one dataset
//! snapshot. Profiles are created once per ingestion and never mutated;
//! "latest" is the most recently created entry for a dataset.

use crate::models::value::Dtype;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Per-column metadata present for every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub dtype: Dtype,
    pub null_count: u64,
    pub null_percentage: f64,
    /// Count of distinct non-null values
    pub cardinality: u64,
}

/// Summary statistics, present for numeric columns only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// A sample row keyed by column name, preserving original column order.
pub type SampleRow = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub dataset_id: Uuid,
    /// Monotonically increasing per dataset; assigned by the store on save
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub columns_metadata: BTreeMap<String, ColumnMetadata>,
    /// Numeric columns only; non-numeric columns have no entry
    pub statistics: BTreeMap<String, NumericSummary>,
    /// First K rows of the snapshot, untruncated
    pub sample_rows: Vec<SampleRow>,
    /// SHA-256 over column names, dtypes, and row count
    pub fingerprint: String,
}

impl Profile {
    /// Column names present in this profile.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns_metadata.keys().map(String::as_str)
    }
}
