// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding engine interface and implementations.
//!
//! The model runtime is an external collaborator; this module provides a
//! fastembed-backed engine plus a dummy engine for tests and fallback.

use anyhow::{Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::errors::NotInitializedError;

/// Default embedding dimension for sentence-transformers/all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Trait for embedding engines.
///
/// `initialize` must be called before any embed operation; calling it when
/// already ready is a no-op that reports ready immediately. Embed calls on
/// an uninitialized engine fail with [`NotInitializedError`] rather than
/// returning zero vectors.
pub trait EmbeddingEngine: Send {
    /// Returns the model identifier.
    fn model_id(&self) -> &str;

    /// Returns the fixed output dimension.
    fn dimension(&self) -> usize;

    /// Whether the engine is initialized and ready to embed.
    fn is_ready(&self) -> bool;

    /// Loads the model, reporting download/initialization progress as a
    /// 0-100 percentage to the callback.
    fn initialize(&mut self, on_progress: &mut dyn FnMut(u8)) -> Result<()>;

    /// Generates embeddings for the given texts, preserving input order.
    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generates an embedding for a single text.
    fn embed_text(&mut self, text: &str) -> Result<Vec<f32>> {
        let mut result = self.embed_batch(&[text.to_string()])?;
        result
            .pop()
            .ok_or_else(|| anyhow::anyhow!("No embedding returned"))
    }
}

/// FastEmbed engine using sentence-transformers/all-MiniLM-L6-v2.
pub struct FastEmbedEngine {
    embedder: Option<TextEmbedding>,
    model_id: String,
    dimension: usize,
    batch_size: usize,
}

impl FastEmbedEngine {
    pub fn new() -> Self {
        Self {
            embedder: None,
            model_id: EmbeddingModel::AllMiniLML6V2.to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            batch_size: 256,
        }
    }

    /// Overrides the internal batch size handed to fastembed.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl Default for FastEmbedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingEngine for FastEmbedEngine {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn is_ready(&self) -> bool {
        self.embedder.is_some()
    }

    fn initialize(&mut self, on_progress: &mut dyn FnMut(u8)) -> Result<()> {
        if self.embedder.is_some() {
            on_progress(100);
            return Ok(());
        }

        // fastembed exposes no fractional download callback; report the
        // endpoints around the blocking model load.
        on_progress(0);
        let init = InitOptions::new(EmbeddingModel::AllMiniLML6V2);
        let embedder =
            TextEmbedding::try_new(init).context("Failed to initialize fastembed model")?;
        self.embedder = Some(embedder);
        on_progress(100);
        Ok(())
    }

    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let embedder = self
            .embedder
            .as_mut()
            .ok_or(NotInitializedError)?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = embedder
            .embed(texts, Some(self.batch_size))
            .context("fastembed embedding failed")?;
        Ok(embeddings)
    }
}

/// Dummy engine that returns zero vectors (for testing/fallback).
pub struct DummyEngine {
    model: String,
    dimension: usize,
    ready: bool,
}

impl DummyEngine {
    /// Creates a new dummy engine with specified dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            model: "dummy".to_string(),
            dimension,
            ready: false,
        }
    }
}

impl EmbeddingEngine for DummyEngine {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn initialize(&mut self, on_progress: &mut dyn FnMut(u8)) -> Result<()> {
        if !self.ready {
            on_progress(0);
            self.ready = true;
        }
        on_progress(100);
        Ok(())
    }

    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if !self.ready {
            return Err(NotInitializedError.into());
        }
        Ok(texts.iter().map(|_| vec![0.0; self.dimension]).collect())
    }
}
