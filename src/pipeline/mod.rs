// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline module - the resumable multi-phase embedding batch pipeline
//!
//! Orchestrates node selection, text synthesis, batched embedding, storage,
//! and index creation, reporting progress to a caller-supplied sink.

pub mod orchestrator;
pub mod progress;

pub use orchestrator::{EmbeddingPipeline, PipelineReport};
pub use progress::{Phase, Progress};
