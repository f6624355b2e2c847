// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph module - the boundary to the property-graph store
//!
//! This module holds the narrow store trait the rest of kgrep depends on,
//! the defensive row-reading helpers, node selection, and the vector index
//! lifecycle.

pub mod index;
pub mod select;
pub mod store;

pub use index::{ensure_index, INDEX_METRIC};
pub use select::{EmbeddableNode, NodeLabel, NodeSelector};
pub use store::{
    quote, read_f64, read_i64, read_str, vector_literal, GraphStore, Params, Row, Value,
};
