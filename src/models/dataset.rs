//! Dataset record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, versioned tabular data source tracked by the system.
///
/// Row/column counts describe the most recently registered snapshot; they
/// change only when a new snapshot is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub row_count: u64,
    pub column_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(id: Uuid, name: impl Into<String>, row_count: u64, column_count: u64) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: None,
            row_count,
            column_count,
            created_at: now,
            updated_at: now,
        }
    }
}
