// SPDX-License-Identifier: MIT OR Apache-2.0

//! kgrep - Semantic search over code knowledge graphs
//!
//! Ingests a source-code knowledge graph, embeds its semantically
//! meaningful nodes, indexes them for nearest-neighbor retrieval, and
//! serves plain and one-hop context-expanded semantic search. The graph
//! database engine and the embedding model runtime are external
//! collaborators behind the [`graph::GraphStore`] and
//! [`embedding::EmbeddingEngine`] traits.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod graph;
pub mod pipeline;
pub mod search;
