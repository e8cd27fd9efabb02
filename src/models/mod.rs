//! Data model
//!
//! Records shared by every engine component and the shapes they serialize
//! to for the presentation layer.

pub mod dataset;
pub mod issue;
pub mod lineage;
pub mod profile;
pub mod snapshot;
pub mod value;

// Re-export commonly used types
pub use dataset::Dataset;
pub use issue::{Issue, IssueDraft, IssueType, Severity};
pub use lineage::LineageEdge;
pub use profile::{ColumnMetadata, NumericSummary, Profile, SampleRow};
pub use snapshot::TabularSnapshot;
pub use value::{Dtype, Value};
