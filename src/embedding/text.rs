// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text synthesis for embedding generation.
//!
//! Converts a raw code node into a normalized text string optimized for
//! embedding quality. Synthesis is deterministic: the same node and config
//! always produce byte-identical text, which both embedding quality and
//! test reproducibility depend on.

use std::borrow::Cow;

use crate::graph::EmbeddableNode;

/// Configuration limits for text synthesis.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Maximum content characters per node.
    pub max_content_chars: usize,
    /// Whether the file path line is included.
    pub include_file_path: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 2000,
            include_file_path: true,
        }
    }
}

/// Produces the embedding text for a single node.
///
/// Shape: a header line with label and name, an optional file path line
/// with the line range, then a bounded slice of the content. Empty content
/// falls back to header/path only.
pub fn synthesize(node: &EmbeddableNode, config: &SynthesisConfig) -> String {
    let mut text = format!("{} {}", node.label, node.name);

    if config.include_file_path && !node.file_path.is_empty() {
        text.push('\n');
        text.push_str("File: ");
        text.push_str(&node.file_path);
        if let (Some(start), Some(end)) = (node.start_line, node.end_line) {
            text.push_str(&format!(" (lines {start}-{end})"));
        }
    }

    let content = node.content.trim();
    if !content.is_empty() {
        text.push('\n');
        text.push_str(&truncate_to_chars(content, config.max_content_chars));
    }

    text
}

/// Batched form of [`synthesize`], preserving input order.
pub fn synthesize_batch(nodes: &[EmbeddableNode], config: &SynthesisConfig) -> Vec<String> {
    nodes.iter().map(|node| synthesize(node, config)).collect()
}

fn truncate_to_chars(input: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 {
        return Cow::Borrowed("");
    }

    let mut count = 0;
    for (idx, _) in input.char_indices() {
        if count == max_chars {
            return Cow::Owned(input[..idx].to_string());
        }
        count += 1;
    }

    Cow::Borrowed(input)
}
