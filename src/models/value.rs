//! Cell values and column dtypes
//!
//! Tabular data arrives with mixed, loosely typed cells. Representing each
//! cell as a tagged variant keeps statistics computation total and
//! type-safe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value in a tabular snapshot.
///
/// Serializes as the plain JSON scalar (untagged), so sample rows keep the
/// shape the presentation layer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell. Booleans are intentionally not numeric.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Dtype of this single cell, `None` for nulls.
    pub fn dtype(&self) -> Option<Dtype> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(Dtype::Bool),
            Value::Int(_) => Some(Dtype::Int),
            Value::Float(_) => Some(Dtype::Float),
            Value::Text(_) => Some(Dtype::Text),
        }
    }

    /// Canonical key used for cardinality counting. Floats are keyed by
    /// their bit pattern so distinctness stays exact.
    pub fn distinct_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(format!("b:{}", b)),
            Value::Int(i) => Some(format!("i:{}", i)),
            Value::Float(f) => Some(format!("f:{:x}", f.to_bits())),
            Value::Text(s) => Some(format!("t:{}", s)),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Text(s) => serde_json::Value::from(s.clone()),
        }
    }
}

/// Column dtype, inferred from the non-null cells of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Int,
    Float,
    Text,
    Bool,
    /// Column had no non-null cells to infer from
    Unknown,
}

impl Dtype {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Dtype::Int | Dtype::Float)
    }

    /// Combine the dtypes of two cells from the same column.
    /// An int/float mixture widens to float; any other mixture degrades
    /// to text.
    pub fn combine(self, other: Dtype) -> Dtype {
        match (self, other) {
            (a, b) if a == b => a,
            (Dtype::Int, Dtype::Float) | (Dtype::Float, Dtype::Int) => Dtype::Float,
            (Dtype::Unknown, d) | (d, Dtype::Unknown) => d,
            _ => Dtype::Text,
        }
    }

    /// Infer a column dtype from its cells.
    pub fn infer<'a, I: IntoIterator<Item = &'a Value>>(values: I) -> Dtype {
        values
            .into_iter()
            .filter_map(Value::dtype)
            .fold(Dtype::Unknown, Dtype::combine)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dtype::Int => "int",
            Dtype::Float => "float",
            Dtype::Text => "text",
            Dtype::Bool => "bool",
            Dtype::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}
