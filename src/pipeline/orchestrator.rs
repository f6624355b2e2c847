// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline orchestration.
//!
//! Sequences model loading, node selection, batched embedding, and index
//! creation, and pushes a single monotonic progress stream to the caller.
//! Phases run strictly sequentially; batches within the embedding phase go
//! one at a time against the single engine handle to respect its
//! concurrency limits.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::embedding::{synthesize_batch, EmbeddingEngine, EmbeddingRecord, EmbeddingWriter, SynthesisConfig};
use crate::graph::{ensure_index, GraphStore, NodeSelector};
use crate::pipeline::progress::Progress;

/// Final counts for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub nodes_processed: usize,
    pub total_nodes: usize,
    pub total_batches: usize,
}

/// Runs the embedding pipeline against one graph store and engine.
///
/// One logical run at a time: concurrent runs against the same store must
/// be serialized by the caller. Progress callbacks execute synchronously
/// on the pipeline's own thread and must not block indefinitely.
pub struct EmbeddingPipeline<'a> {
    store: &'a dyn GraphStore,
    engine: &'a mut dyn EmbeddingEngine,
    config: Config,
}

impl<'a> EmbeddingPipeline<'a> {
    pub fn new(store: &'a dyn GraphStore, engine: &'a mut dyn EmbeddingEngine, config: Config) -> Self {
        Self {
            store,
            engine,
            config,
        }
    }

    /// Runs all phases: loading-model (0-20%), embedding (20-90%),
    /// indexing (90-100%), ready (100%).
    ///
    /// On failure the error is reported once through the progress sink as
    /// an `error` event and then returned; callers get both channels and
    /// must not rely on only one.
    pub fn run<F>(&mut self, mut on_progress: F) -> Result<PipelineReport>
    where
        F: FnMut(Progress),
    {
        match self.run_phases(&mut on_progress) {
            Ok(report) => Ok(report),
            Err(err) => {
                on_progress(Progress::error(format!("{err:#}")));
                Err(err)
            }
        }
    }

    fn run_phases<F>(&mut self, on_progress: &mut F) -> Result<PipelineReport>
    where
        F: FnMut(Progress),
    {
        self.load_model(on_progress)?;

        let selector = NodeSelector::new(
            self.store,
            self.config.graph.node_table(),
            self.config.embeddable_labels(),
        );
        let nodes = selector.select()?;
        let total_nodes = nodes.len();

        if total_nodes == 0 {
            // Nothing to embed means nothing to index; skip straight to
            // the terminal checkpoint.
            tracing::debug!("No embeddable nodes found; pipeline is a no-op");
            on_progress(Progress::ready(0, 0));
            return Ok(PipelineReport {
                nodes_processed: 0,
                total_nodes: 0,
                total_batches: 0,
            });
        }

        let batch_size = self.config.pipeline.batch_size();
        let total_batches = total_nodes.div_ceil(batch_size);
        tracing::debug!(
            "Embedding {} nodes in {} batches of up to {}",
            total_nodes,
            total_batches,
            batch_size
        );

        let synthesis = SynthesisConfig {
            max_content_chars: self.config.pipeline.max_content_chars(),
            include_file_path: self.config.pipeline.include_file_path(),
        };
        let writer = EmbeddingWriter::new(
            self.store,
            self.config.graph.embedding_table(),
            self.config.model.dimension(),
        );

        let mut nodes_processed = 0usize;
        for (batch_index, batch) in nodes.chunks(batch_size).enumerate() {
            let texts = synthesize_batch(batch, &synthesis);
            let vectors = self
                .engine
                .embed_batch(&texts)
                .with_context(|| format!("Failed to embed batch {}", batch_index + 1))?;

            let records: Vec<EmbeddingRecord> = batch
                .iter()
                .zip(vectors)
                .map(|(node, embedding)| EmbeddingRecord {
                    node_id: node.id.clone(),
                    embedding,
                })
                .collect();
            writer.write_batch(&records)?;

            nodes_processed += batch.len();
            let percent = embedding_percent(nodes_processed, total_nodes);
            on_progress(Progress::embedding(
                percent,
                nodes_processed,
                total_nodes,
                batch_index + 1,
                total_batches,
            ));
        }

        on_progress(Progress::indexing(90));
        ensure_index(
            self.store,
            self.config.graph.embedding_table(),
            self.config.graph.index_name(),
            "embedding",
        )?;

        on_progress(Progress::ready(nodes_processed, total_nodes));
        Ok(PipelineReport {
            nodes_processed,
            total_nodes,
            total_batches,
        })
    }

    fn load_model<F>(&mut self, on_progress: &mut F) -> Result<()>
    where
        F: FnMut(Progress),
    {
        self.engine
            .initialize(&mut |download_percent| {
                // Rescale the engine's own 0-100 download progress into the
                // pipeline's 0-20% band.
                let percent = (f64::from(download_percent) * 0.2).round() as u8;
                on_progress(Progress::loading_model(percent, download_percent));
            })
            .context("Failed to load embedding model")?;

        on_progress(Progress::loading_model(20, 100));
        Ok(())
    }
}

/// Progress formula for the embedding phase: 20% + proportional share of
/// the 20-90 band. The last batch may be smaller than `batch_size`; that
/// changes only the batch's node count, never this formula.
fn embedding_percent(nodes_processed: usize, total_nodes: usize) -> u8 {
    (20.0 + (nodes_processed as f64 / total_nodes as f64) * 70.0).round() as u8
}
