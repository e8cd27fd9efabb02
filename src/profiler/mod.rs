//! Profiler
//!
//! Computes per-column metadata and statistics for one dataset snapshot.
//! Profiling is pure: persistence is the ingestion pipeline's job.

pub mod store;

pub use store::ProfileStore;

use crate::error::EngineResult;
use crate::models::profile::{ColumnMetadata, NumericSummary, Profile, SampleRow};
use crate::models::snapshot::TabularSnapshot;
use crate::models::value::Dtype;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use uuid::Uuid;

pub struct Profiler {
    sample_rows: usize,
}

impl Profiler {
    pub fn new(sample_rows: usize) -> Self {
        Self { sample_rows }
    }

    /// Profile a snapshot. Fails with `MalformedInput` on zero columns or
    /// ragged rows; nothing is persisted in that case.
    pub fn profile(&self, dataset_id: Uuid, snapshot: &TabularSnapshot) -> EngineResult<Profile> {
        snapshot.validate()?;

        let row_count = snapshot.row_count();
        let mut columns_metadata = BTreeMap::new();
        let mut statistics = BTreeMap::new();

        for (index, name) in snapshot.columns.iter().enumerate() {
            let dtype = Dtype::infer(snapshot.column_values(index));

            let null_count = snapshot
                .column_values(index)
                .filter(|v| v.is_null())
                .count() as u64;
            let null_percentage = if row_count == 0 {
                0.0
            } else {
                null_count as f64 / row_count as f64 * 100.0
            };

            let distinct: HashSet<String> = snapshot
                .column_values(index)
                .filter_map(|v| v.distinct_key())
                .collect();

            columns_metadata.insert(
                name.clone(),
                ColumnMetadata {
                    dtype,
                    null_count,
                    null_percentage,
                    cardinality: distinct.len() as u64,
                },
            );

            if dtype.is_numeric() {
                let values: Vec<f64> = snapshot
                    .column_values(index)
                    .filter_map(|v| v.as_numeric())
                    .filter(|v| !v.is_nan())
                    .collect();
                if let Some(summary) = summarize(&values) {
                    statistics.insert(name.clone(), summary);
                }
            }
        }

        let sample_rows = self.sample(snapshot);
        let fingerprint = fingerprint(snapshot, &columns_metadata);

        debug!(
            dataset_id = %dataset_id,
            rows = row_count,
            columns = snapshot.column_count(),
            "profiled snapshot"
        );

        Ok(Profile {
            id: Uuid::new_v4(),
            dataset_id,
            version: 0, // assigned by the store on save
            created_at: Utc::now(),
            columns_metadata,
            statistics,
            sample_rows,
            fingerprint,
        })
    }

    /// First K rows as name→value mappings, preserving original column
    /// order. Values are carried whole; truncation for display is a
    /// presentation concern.
    fn sample(&self, snapshot: &TabularSnapshot) -> Vec<SampleRow> {
        snapshot
            .rows
            .iter()
            .take(self.sample_rows)
            .map(|row| {
                let mut mapped = SampleRow::new();
                for (name, value) in snapshot.columns.iter().zip(row) {
                    mapped.insert(name.clone(), value.into());
                }
                mapped
            })
            .collect()
    }
}

/// Mean, population standard deviation, min, max, and median over non-null
/// values. `None` when the column has no usable values.
fn summarize(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    Some(NumericSummary {
        mean,
        std: variance.sqrt(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        median,
    })
}

/// Content fingerprint over column names, dtypes, and row count. Hashed in
/// sorted column order for consistency.
fn fingerprint(
    snapshot: &TabularSnapshot,
    columns_metadata: &BTreeMap<String, ColumnMetadata>,
) -> String {
    let mut hasher = Sha256::new();
    for (name, meta) in columns_metadata {
        hasher.update(format!("{}:{}", name, meta.dtype).as_bytes());
    }
    hasher.update(snapshot.row_count().to_le_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::value::Value;
    use pretty_assertions::assert_eq;

    fn snapshot_with_nulls(null_count: usize) -> TabularSnapshot {
        let rows = (0..100)
            .map(|i| {
                let age = if i < null_count {
                    Value::Null
                } else {
                    Value::Int(20 + (i as i64 % 50))
                };
                vec![age, Value::Text(format!("user-{}", i))]
            })
            .collect();
        TabularSnapshot::new(vec!["age".into(), "name".into()], rows)
    }

    #[test]
    fn test_null_percentage_and_cardinality() {
        let profiler = Profiler::new(20);
        let profile = profiler
            .profile(Uuid::new_v4(), &snapshot_with_nulls(5))
            .unwrap();

        let age = &profile.columns_metadata["age"];
        assert_eq!(age.null_count, 5);
        assert_eq!(age.null_percentage, 5.0);
        assert_eq!(age.dtype, Dtype::Int);
        assert!(age.cardinality <= 95);
    }

    #[test]
    fn test_zero_rows_has_zero_null_percentage() {
        let profiler = Profiler::new(20);
        let snapshot = TabularSnapshot::new(vec!["a".into()], vec![]);
        let profile = profiler.profile(Uuid::new_v4(), &snapshot).unwrap();

        let meta = &profile.columns_metadata["a"];
        assert_eq!(meta.null_percentage, 0.0);
        assert_eq!(meta.dtype, Dtype::Unknown);
        assert!(profile.statistics.is_empty());
    }

    #[test]
    fn test_non_numeric_columns_have_no_statistics() {
        let profiler = Profiler::new(20);
        let profile = profiler
            .profile(Uuid::new_v4(), &snapshot_with_nulls(0))
            .unwrap();

        assert!(profile.statistics.contains_key("age"));
        assert!(!profile.statistics.contains_key("name"));
    }

    #[test]
    fn test_population_std_and_median() {
        let profiler = Profiler::new(20);
        let rows = vec![
            vec![Value::Float(2.0)],
            vec![Value::Float(4.0)],
            vec![Value::Float(4.0)],
            vec![Value::Float(4.0)],
            vec![Value::Float(5.0)],
            vec![Value::Float(5.0)],
            vec![Value::Float(7.0)],
            vec![Value::Float(9.0)],
        ];
        let snapshot = TabularSnapshot::new(vec!["x".into()], rows);
        let profile = profiler.profile(Uuid::new_v4(), &snapshot).unwrap();

        let stats = &profile.statistics["x"];
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.median, 4.5);
    }

    #[test]
    fn test_sample_preserves_column_order_and_bound() {
        let profiler = Profiler::new(3);
        let profile = profiler
            .profile(Uuid::new_v4(), &snapshot_with_nulls(0))
            .unwrap();

        assert_eq!(profile.sample_rows.len(), 3);
        let keys: Vec<&String> = profile.sample_rows[0].keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    #[test]
    fn test_malformed_snapshot_fails() {
        let profiler = Profiler::new(20);
        let snapshot = TabularSnapshot::new(vec![], vec![]);
        let err = profiler.profile(Uuid::new_v4(), &snapshot).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_INPUT");
    }

    #[test]
    fn test_fingerprint_stable_for_same_shape() {
        let profiler = Profiler::new(20);
        let a = profiler
            .profile(Uuid::new_v4(), &snapshot_with_nulls(5))
            .unwrap();
        let b = profiler
            .profile(Uuid::new_v4(), &snapshot_with_nulls(7))
            .unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
    }
}
