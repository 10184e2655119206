// ABOUTME: Shared data models for db-bootstrap
// ABOUTME: Typed column values and the seed load summary

use std::fmt;

/// A typed value pulled out of one result column
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Double(f64),
    Text(String),
}

impl Value {
    /// Short type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

/// Outcome of a seed batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    /// Affected rows for each executed fragment, in script order
    pub affected: Vec<usize>,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.affected.iter().sum()
    }

    pub fn statements(&self) -> usize {
        self.affected.len()
    }
}
