// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query planning for semantic search over the graph's vector index.
//!
//! Both operations encode the query text, run a nearest-neighbor lookup
//! through the engine-native vector index, and join candidates back onto
//! the labeled property graph. Context search additionally expands each
//! match one hop across graph relations.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::embedding::EmbeddingEngine;
use crate::errors::{is_index_missing, DimensionMismatchError, IndexMissingError, NotInitializedError};
use crate::graph::{
    quote, read_f64, read_i64, read_str, vector_literal, GraphStore, NodeLabel, Row,
};

/// Context search uses a fixed internal distance cutoff rather than a
/// caller-supplied one.
const CONTEXT_MAX_DISTANCE: f32 = 0.5;

/// A plain semantic search hit. Lower distance = more similar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub node_id: String,
    pub name: String,
    pub label: NodeLabel,
    pub file_path: String,
    pub distance: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
}

/// One flattened (match, connected-neighbor) pair from context search.
///
/// Flattening keeps the wire shape uniform across the query boundary; a
/// match with three neighbors yields three rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSearchResult {
    pub match_id: String,
    pub match_name: String,
    pub match_label: NodeLabel,
    pub match_file_path: String,
    pub distance: f32,
    pub connected_id: String,
    pub connected_name: String,
    /// Raw label string: neighbors are not restricted to embeddable kinds.
    pub connected_label: String,
    pub relation_type: String,
}

/// Plans and executes semantic search queries.
///
/// Read-only; may run concurrently with other searches. Requires a ready
/// engine and an existing vector index.
pub struct SearchPlanner<'a> {
    store: &'a dyn GraphStore,
    engine: &'a mut dyn EmbeddingEngine,
    config: Config,
}

impl<'a> SearchPlanner<'a> {
    pub fn new(store: &'a dyn GraphStore, engine: &'a mut dyn EmbeddingEngine, config: Config) -> Self {
        Self {
            store,
            engine,
            config,
        }
    }

    /// Plain semantic search: top-`k` nearest neighbors with distances
    /// strictly below `max_distance`, sorted ascending by distance.
    ///
    /// `k` defaults to the configured `default_k` (10) and `max_distance`
    /// to the configured cutoff (0.5).
    pub fn plain_search(
        &mut self,
        query: &str,
        k: Option<usize>,
        max_distance: Option<f32>,
    ) -> Result<Vec<SearchResult>> {
        let k = k.unwrap_or_else(|| self.config.search.default_k());
        let max_distance = max_distance.unwrap_or_else(|| self.config.search.max_distance());

        let query_vector = self.encode_query(query)?;
        let text = format!(
            "CALL QUERY_VECTOR_INDEX({table}, {index}, {vector}, {k}) \
             YIELD node AS hit, distance \
             WHERE distance < {max_distance} \
             MATCH (n:{node_table}) WHERE n.id = hit.nodeId \
             RETURN n.id, n.name, n.label, n.filePath, n.startLine, n.endLine, distance \
             ORDER BY distance",
            table = quote(self.config.graph.embedding_table()),
            index = quote(self.config.graph.index_name()),
            vector = vector_literal(&query_vector),
            node_table = self.config.graph.node_table(),
        );

        let rows = self.run_vector_query(&text)?;
        let mut results: Vec<SearchResult> = rows
            .iter()
            .filter_map(parse_search_row)
            .filter(|r| r.distance < max_distance)
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }

    /// Semantic search expanded one hop through graph relations.
    ///
    /// Each match row is paired with every directly connected node (either
    /// edge direction) and the relation's type label. Expansion depth is
    /// fixed at one hop; callers needing more must query the graph+vector
    /// boundary directly.
    pub fn context_search(&mut self, query: &str, k: Option<usize>) -> Result<Vec<ContextSearchResult>> {
        let k = k.unwrap_or_else(|| self.config.search.default_k());

        let query_vector = self.encode_query(query)?;
        let text = format!(
            "CALL QUERY_VECTOR_INDEX({table}, {index}, {vector}, {k}) \
             YIELD node AS hit, distance \
             WHERE distance < {max_distance} \
             MATCH (n:{node_table}) WHERE n.id = hit.nodeId \
             MATCH (n)-[r]-(connected) \
             RETURN n.id, n.name, n.label, n.filePath, distance, \
                    connected.id, connected.name, connected.label, r.type \
             ORDER BY distance, n.id",
            table = quote(self.config.graph.embedding_table()),
            index = quote(self.config.graph.index_name()),
            vector = vector_literal(&query_vector),
            max_distance = CONTEXT_MAX_DISTANCE,
            node_table = self.config.graph.node_table(),
        );

        let rows = self.run_vector_query(&text)?;
        let mut results: Vec<ContextSearchResult> = rows
            .iter()
            .filter_map(parse_context_row)
            .filter(|r| r.distance < CONTEXT_MAX_DISTANCE)
            .collect();

        // Primary order by match distance; match id breaks ties so equal
        // distances still group reproducibly.
        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.match_id.cmp(&b.match_id))
        });
        Ok(results)
    }

    fn encode_query(&mut self, query: &str) -> Result<Vec<f32>> {
        if !self.engine.is_ready() {
            return Err(NotInitializedError.into());
        }

        let vector = self
            .engine
            .embed_text(query)
            .context("Failed to embed search query")?;

        let expected = self.config.model.dimension();
        if vector.len() != expected {
            return Err(DimensionMismatchError {
                node_id: "<query>".to_string(),
                expected,
                actual: vector.len(),
            }
            .into());
        }
        Ok(vector)
    }

    fn run_vector_query(&self, text: &str) -> Result<Vec<Row>> {
        match self.store.execute_query(text) {
            Ok(rows) => Ok(rows),
            Err(err) if is_index_missing(&err) => Err(IndexMissingError {
                index_name: self.config.graph.index_name().to_string(),
            }
            .into()),
            Err(err) => Err(err).context("Vector search query failed"),
        }
    }
}

fn parse_search_row(row: &Row) -> Option<SearchResult> {
    Some(SearchResult {
        node_id: read_str(row, "n.id", 0)?,
        name: read_str(row, "n.name", 1)?,
        label: read_str(row, "n.label", 2)?.parse().ok()?,
        file_path: read_str(row, "n.filePath", 3).unwrap_or_default(),
        start_line: read_i64(row, "n.startLine", 4).map(|l| l as u32),
        end_line: read_i64(row, "n.endLine", 5).map(|l| l as u32),
        distance: read_f64(row, "distance", 6)? as f32,
    })
}

fn parse_context_row(row: &Row) -> Option<ContextSearchResult> {
    Some(ContextSearchResult {
        match_id: read_str(row, "n.id", 0)?,
        match_name: read_str(row, "n.name", 1)?,
        match_label: read_str(row, "n.label", 2)?.parse().ok()?,
        match_file_path: read_str(row, "n.filePath", 3).unwrap_or_default(),
        distance: read_f64(row, "distance", 4)? as f32,
        connected_id: read_str(row, "connected.id", 5)?,
        connected_name: read_str(row, "connected.name", 6).unwrap_or_default(),
        connected_label: read_str(row, "connected.label", 7).unwrap_or_default(),
        relation_type: read_str(row, "r.type", 8)?,
    })
}
