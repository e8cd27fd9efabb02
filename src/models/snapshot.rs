//! Tabular snapshot input contract
//!
//! The shape handed to the engine by the upload/storage collaborator after
//! raw file parsing. Row-major: ordered column names plus rows of typed
//! cells.

use crate::error::{malformed_input, EngineResult};
use crate::models::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One parsed dataset snapshot awaiting profiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularSnapshot {
    /// Column names in original order
    pub columns: Vec<String>,
    /// Rows of cells; every row must match `columns` in length
    pub rows: Vec<Vec<Value>>,
}

impl TabularSnapshot {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Reject snapshots the profiler cannot interpret: zero columns,
    /// duplicate column names, or ragged rows.
    pub fn validate(&self) -> EngineResult<()> {
        if self.columns.is_empty() {
            return Err(malformed_input("snapshot has zero columns"));
        }

        let mut seen = HashSet::new();
        for name in &self.columns {
            if !seen.insert(name.as_str()) {
                return Err(malformed_input(format!("duplicate column name: {}", name)));
            }
        }

        let width = self.columns.len();
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(malformed_input(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
        }

        Ok(())
    }

    /// Cells of one column, in row order. Callers pass an index obtained
    /// from `columns`.
    pub fn column_values(&self, column_index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[column_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_columns_rejected() {
        let snapshot = TabularSnapshot::new(vec![], vec![]);
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.code(), "MALFORMED_INPUT");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let snapshot = TabularSnapshot::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Int(1), Value::Int(2)],
                vec![Value::Int(3)],
            ],
        );
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let snapshot = TabularSnapshot::new(vec!["a".into(), "a".into()], vec![]);
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_empty_rows_is_valid() {
        let snapshot = TabularSnapshot::new(vec!["a".into()], vec![]);
        assert!(snapshot.validate().is_ok());
    }
}
