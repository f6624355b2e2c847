// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph store boundary.
//!
//! The graph database engine is an external collaborator. kgrep consumes it
//! through two narrow capabilities: running a query for rows, and running one
//! parameterized statement against many parameter sets. Everything else
//! (storage, transactions, the vector index primitive) lives behind this
//! trait.

use anyhow::Result;

/// A single value crossing the query boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    FloatList(Vec<f32>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// One parameter set for a batched statement.
pub type Params = Vec<(String, Value)>;

/// A result row with named columns and positional values.
///
/// The query engine does not guarantee a stable column naming scheme across
/// query text variants, so rows support both access paths.
#[derive(Debug, Clone, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Builds a row from (column, value) pairs.
    pub fn from_pairs(pairs: Vec<(&str, Value)>) -> Self {
        let (columns, values) = pairs
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .unzip();
        Self { columns, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a value by column name, falling back to positional index.
    ///
    /// This is the defensive dual-shape read used at every boundary
    /// crossing; business logic never touches row internals directly.
    pub fn read(&self, name: &str, position: usize) -> Option<&Value> {
        if let Some(idx) = self.columns.iter().position(|c| c.as_str() == name) {
            return self.values.get(idx);
        }
        self.values.get(position)
    }
}

/// Reads a string field by name with positional fallback.
pub fn read_str(row: &Row, name: &str, position: usize) -> Option<String> {
    row.read(name, position)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Reads an integer field by name with positional fallback.
pub fn read_i64(row: &Row, name: &str, position: usize) -> Option<i64> {
    row.read(name, position).and_then(Value::as_i64)
}

/// Reads a float field by name with positional fallback.
pub fn read_f64(row: &Row, name: &str, position: usize) -> Option<f64> {
    row.read(name, position).and_then(Value::as_f64)
}

/// Narrow graph-engine capability surface.
pub trait GraphStore: Send + Sync {
    /// Runs a query and returns its rows.
    fn execute_query(&self, query: &str) -> Result<Vec<Row>>;

    /// Runs one parameterized statement once per parameter set.
    ///
    /// The statement is compiled once and reused across the whole batch;
    /// statement compilation cost dominates for large graphs.
    fn execute_batch(&self, query: &str, params: &[Params]) -> Result<()>;
}

/// Renders a float vector as a typed literal for vector-index calls,
/// e.g. `CAST([0.1, 0.2] AS FLOAT[2])`.
pub fn vector_literal(vector: &[f32]) -> String {
    let parts: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("CAST([{}] AS FLOAT[{}])", parts.join(", "), vector.len())
}

/// Quotes a string for inclusion in query text.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}
