// ABOUTME: Row extraction pipeline over a forward-only result cursor
// ABOUTME: Strategy tags from configuration pick how each column becomes a typed value

use rusqlite::types::ValueRef;
use rusqlite::{Row, Rows};
use std::fmt;
use std::str::FromStr;

use super::DbError;
use crate::config::ConfigError;
use crate::models::Value;

/// How one result column is turned into a typed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    Double,
    String,
}

impl ExtractionStrategy {
    pub fn tag(&self) -> &'static str {
        match self {
            ExtractionStrategy::Int => "INT",
            ExtractionStrategy::Long => "LONG",
            ExtractionStrategy::Double => "DOUBLE",
            ExtractionStrategy::String => "STRING",
        }
    }

    /// Pull the value at 1-based `position` out of `row`
    pub fn extract(&self, row: &Row<'_>, position: usize) -> Result<Value, DbError> {
        let index = position
            .checked_sub(1)
            .ok_or_else(|| DbError::ExtractionFailed("column positions start at 1".to_string()))?;

        let raw = row.get_ref(index).map_err(|e| {
            DbError::ExtractionFailed(format!("column {} as {}: {}", position, self, e))
        })?;

        self.coerce(raw).map_err(|reason| {
            DbError::ExtractionFailed(format!("column {} as {}: {}", position, self, reason))
        })
    }

    /// Convert a raw SQLite value the way this strategy reads it
    pub fn coerce(&self, raw: ValueRef<'_>) -> Result<Value, String> {
        // Numeric reads of NULL give zero; only STRING keeps the null
        if let ValueRef::Null = raw {
            return Ok(match self {
                ExtractionStrategy::Int | ExtractionStrategy::Long => Value::Int(0),
                ExtractionStrategy::Double => Value::Double(0.0),
                ExtractionStrategy::String => Value::Null,
            });
        }

        match self {
            ExtractionStrategy::Int => {
                let v = integer(raw)?;
                i32::try_from(v)
                    .map(|v| Value::Int(v.into()))
                    .map_err(|_| format!("{} does not fit in a 32-bit integer", v))
            }
            ExtractionStrategy::Long => integer(raw).map(Value::Int),
            ExtractionStrategy::Double => match raw {
                ValueRef::Integer(v) => Ok(Value::Double(v as f64)),
                ValueRef::Real(v) => Ok(Value::Double(v)),
                ValueRef::Text(bytes) => {
                    let text = utf8(bytes)?;
                    text.trim()
                        .parse()
                        .map(Value::Double)
                        .map_err(|_| format!("'{}' is not a number", text))
                }
                _ => Err("blob values cannot be read as DOUBLE".to_string()),
            },
            ExtractionStrategy::String => match raw {
                ValueRef::Integer(v) => Ok(Value::Text(v.to_string())),
                // Debug keeps the trailing ".0" on whole numbers
                ValueRef::Real(v) => Ok(Value::Text(format!("{:?}", v))),
                ValueRef::Text(bytes) => utf8(bytes).map(|s| Value::Text(s.to_string())),
                _ => Err("blob values cannot be read as STRING".to_string()),
            },
        }
    }
}

fn integer(raw: ValueRef<'_>) -> Result<i64, String> {
    match raw {
        ValueRef::Integer(v) => Ok(v),
        ValueRef::Real(v) => truncate(v),
        ValueRef::Text(bytes) => {
            let text = utf8(bytes)?;
            text.trim()
                .parse()
                .map_err(|_| format!("'{}' is not an integer", text))
        }
        _ => Err("value cannot be read as an integer".to_string()),
    }
}

fn truncate(v: f64) -> Result<i64, String> {
    let t = v.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Ok(t as i64)
    } else {
        Err(format!("{} is out of integer range", v))
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8 text: {}", e))
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExtractionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INT" => Ok(ExtractionStrategy::Int),
            "LONG" => Ok(ExtractionStrategy::Long),
            "DOUBLE" => Ok(ExtractionStrategy::Double),
            "STRING" => Ok(ExtractionStrategy::String),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    BeforeFirst,
    HasRow,
    Exhausted,
}

/// Forward-only cursor over query results
pub struct Cursor<'stmt> {
    rows: Rows<'stmt>,
    state: CursorState,
}

impl<'stmt> Cursor<'stmt> {
    pub fn new(rows: Rows<'stmt>) -> Self {
        Self {
            rows,
            state: CursorState::BeforeFirst,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Move to the next row. Once exhausted the cursor stays exhausted.
    pub fn advance(&mut self) -> Result<Option<&Row<'stmt>>, DbError> {
        if self.state == CursorState::Exhausted {
            return Ok(None);
        }

        match self.rows.next().map_err(DbError::QueryFailed)? {
            Some(row) => {
                self.state = CursorState::HasRow;
                Ok(Some(row))
            }
            None => {
                self.state = CursorState::Exhausted;
                Ok(None)
            }
        }
    }
}

/// Assemble one row, one value per strategy in strategy order.
///
/// The strategy list must cover the result columns exactly.
pub fn extract_row(
    row: &Row<'_>,
    column_count: usize,
    strategies: &[ExtractionStrategy],
) -> Result<Vec<Value>, DbError> {
    if strategies.len() != column_count {
        return Err(DbError::ExtractionFailed(format!(
            "{} strategies configured for {} result columns",
            strategies.len(),
            column_count
        )));
    }

    strategies
        .iter()
        .enumerate()
        .map(|(i, strategy)| strategy.extract(row, i + 1))
        .collect()
}
