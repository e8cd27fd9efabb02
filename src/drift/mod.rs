//! Drift detection
//!
//! Compares consecutive profiles of a dataset and raises issues for the
//! regressions it finds.

pub mod comparator;
pub mod detectors;
pub mod store;

pub use comparator::{grade_severity, DriftComparator};
pub use detectors::CategoricalDetector;
pub use store::IssueStore;
