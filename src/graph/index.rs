// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector index lifecycle against the graph engine's native index
//! primitive.

use anyhow::{Context, Result};

use crate::errors::is_index_exists;
use crate::graph::store::{quote, GraphStore};

/// Similarity metric for the vector index. Fixed to cosine.
pub const INDEX_METRIC: &str = "cosine";

/// Creates the nearest-neighbor index over the embedding table if it does
/// not exist yet.
///
/// Re-running the pipeline must not abort here: the engine's
/// "index already exists" failure is recovered locally with a warning.
/// Any other failure propagates.
pub fn ensure_index(
    store: &dyn GraphStore,
    table: &str,
    index_name: &str,
    vector_field: &str,
) -> Result<()> {
    let query = format!(
        "CALL CREATE_VECTOR_INDEX({table}, {index}, {field}, metric := {metric})",
        table = quote(table),
        index = quote(index_name),
        field = quote(vector_field),
        metric = quote(INDEX_METRIC),
    );

    match store.execute_query(&query) {
        Ok(_) => {
            tracing::debug!("Created vector index '{}' on {}.{}", index_name, table, vector_field);
            Ok(())
        }
        Err(err) if is_index_exists(&err) => {
            tracing::warn!("Vector index '{}' already exists; skipping creation", index_name);
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to create vector index '{index_name}'")),
    }
}
