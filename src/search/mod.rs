// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search module - semantic retrieval over the embedded knowledge graph
//!
//! Plain nearest-neighbor search, and search expanded one hop through
//! graph relations.

pub mod planner;

pub use planner::{ContextSearchResult, SearchPlanner, SearchResult};
