// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress events pushed to the pipeline caller.

use serde::Serialize;

/// Pipeline phase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    LoadingModel,
    Embedding,
    Indexing,
    Ready,
    Error,
}

/// A transient progress snapshot for one pipeline invocation.
///
/// `percent` is 0-100 and non-decreasing across phases within a run (the
/// error event excepted). Phase-specific fields are `None` outside their
/// phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub phase: Phase,
    pub percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_download_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_batch: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_batches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Progress {
    fn bare(phase: Phase, percent: u8) -> Self {
        Self {
            phase,
            percent,
            model_download_percent: None,
            nodes_processed: None,
            total_nodes: None,
            current_batch: None,
            total_batches: None,
            error: None,
        }
    }

    pub fn loading_model(percent: u8, download_percent: u8) -> Self {
        Self {
            model_download_percent: Some(download_percent),
            ..Self::bare(Phase::LoadingModel, percent)
        }
    }

    pub fn embedding(
        percent: u8,
        nodes_processed: usize,
        total_nodes: usize,
        current_batch: usize,
        total_batches: usize,
    ) -> Self {
        Self {
            nodes_processed: Some(nodes_processed),
            total_nodes: Some(total_nodes),
            current_batch: Some(current_batch),
            total_batches: Some(total_batches),
            ..Self::bare(Phase::Embedding, percent)
        }
    }

    pub fn indexing(percent: u8) -> Self {
        Self::bare(Phase::Indexing, percent)
    }

    pub fn ready(nodes_processed: usize, total_nodes: usize) -> Self {
        Self {
            nodes_processed: Some(nodes_processed),
            total_nodes: Some(total_nodes),
            ..Self::bare(Phase::Ready, 100)
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::bare(Phase::Error, 0)
        }
    }
}
