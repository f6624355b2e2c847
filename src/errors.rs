// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed errors surfaced across the pipeline and search boundaries.
//!
//! Most failures travel as `anyhow::Error` with context attached where they
//! occur. The types here exist for the cases callers are expected to
//! recognize and act on.

use thiserror::Error;

/// Search was invoked before the embedding engine was initialized.
///
/// Recoverable: run the embedding pipeline (or `initialize`) first.
#[derive(Debug, Error)]
#[error("embedding engine is not initialized; run the embedding pipeline first")]
pub struct NotInitializedError;

/// A vector query was issued before any vector index was built.
#[derive(Debug, Error)]
#[error("vector index '{index_name}' does not exist; run the embedding pipeline first")]
pub struct IndexMissingError {
    pub index_name: String,
}

/// A vector's length disagrees with the configured model dimension.
///
/// Fatal: a mismatched record must never reach the index.
#[derive(Debug, Error)]
#[error("embedding for node '{node_id}' has dimension {actual}, expected {expected}")]
pub struct DimensionMismatchError {
    pub node_id: String,
    pub expected: usize,
    pub actual: usize,
}

/// Raised by graph stores on idempotent index re-creation.
///
/// The index builder recognizes and swallows this one; stores that report
/// the condition as plain text are matched by message instead.
#[derive(Debug, Error)]
#[error("index '{index_name}' already exists")]
pub struct IndexExistsError {
    pub index_name: String,
}

/// Checks whether a store failure is the recoverable "index already exists"
/// case. The graph boundary does not guarantee a typed error, so this falls
/// back to message inspection.
pub fn is_index_exists(err: &anyhow::Error) -> bool {
    if err.downcast_ref::<IndexExistsError>().is_some() {
        return true;
    }
    err.to_string().to_lowercase().contains("already exists")
}

/// Checks whether a store failure identifies a missing vector index.
pub fn is_index_missing(err: &anyhow::Error) -> bool {
    if err.downcast_ref::<IndexMissingError>().is_some() {
        return true;
    }
    let msg = err.to_string().to_lowercase();
    msg.contains("index") && (msg.contains("does not exist") || msg.contains("not found"))
}
