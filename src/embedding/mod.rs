// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - turns code nodes into vectors and persists them
//!
//! This module provides the embedding engine boundary, text synthesis for
//! embedding quality, and the append-only embedding table writer.

pub mod engine;
pub mod store;
pub mod text;

pub use engine::{DummyEngine, EmbeddingEngine, FastEmbedEngine, DEFAULT_EMBEDDING_DIM};
pub use store::{EmbeddingRecord, EmbeddingWriter};
pub use text::{synthesize, synthesize_batch, SynthesisConfig};
