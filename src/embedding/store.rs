// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of node-id -> vector pairs.
//!
//! Embeddings live in a dedicated lightweight table, deliberately separate
//! from the node table: writing vectors onto node records would amplify
//! copy-on-write cost through their large content fields.

use anyhow::{Context, Result};

use crate::errors::DimensionMismatchError;
use crate::graph::{GraphStore, Params, Value};

/// One node-id -> vector pair bound for the embedding table.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub node_id: String,
    pub embedding: Vec<f32>,
}

/// Writes embedding records into the embedding table.
///
/// Insertion is append-only; the writer never checks for existing records
/// with the same node id. Duplicate suppression, if needed, is the
/// caller's responsibility via a prior table clear.
pub struct EmbeddingWriter<'a> {
    store: &'a dyn GraphStore,
    table: String,
    dimension: usize,
}

impl<'a> EmbeddingWriter<'a> {
    pub fn new(store: &'a dyn GraphStore, table: &str, dimension: usize) -> Self {
        Self {
            store,
            table: table.to_string(),
            dimension,
        }
    }

    /// Persists one batch with a single parameterized statement executed
    /// once per record. Statement reuse across the batch is a performance
    /// contract, not an optimization: compilation cost dominates for large
    /// graphs.
    ///
    /// Every vector is checked against the model dimension before anything
    /// is written, so a mismatched record can never reach the index.
    pub fn write_batch(&self, records: &[EmbeddingRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        for record in records {
            if record.embedding.len() != self.dimension {
                return Err(DimensionMismatchError {
                    node_id: record.node_id.clone(),
                    expected: self.dimension,
                    actual: record.embedding.len(),
                }
                .into());
            }
        }

        let query = format!(
            "CREATE (e:{table} {{nodeId: $nodeId, embedding: $embedding}})",
            table = self.table,
        );
        let params: Vec<Params> = records
            .iter()
            .map(|record| {
                vec![
                    ("nodeId".to_string(), Value::Str(record.node_id.clone())),
                    (
                        "embedding".to_string(),
                        Value::FloatList(record.embedding.clone()),
                    ),
                ]
            })
            .collect();

        self.store
            .execute_batch(&query, &params)
            .context("Failed to write embedding batch")
    }
}
