// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for kgrep
//!
//! Loads configuration from .kgreprc.toml in current directory or ~/.config/kgrep/config.toml

use serde::Deserialize;
use std::path::PathBuf;

use crate::graph::NodeLabel;

/// Pipeline configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of nodes embedded per batch
    pub batch_size: Option<usize>,
    /// Maximum content characters included in synthesized text
    pub max_content_chars: Option<usize>,
    /// Whether synthesized text includes the file path
    pub include_file_path: Option<bool>,
}

impl PipelineConfig {
    /// Get batch size (defaults to 32)
    pub fn batch_size(&self) -> usize {
        self.batch_size.filter(|&b| b > 0).unwrap_or(32)
    }

    /// Get max content chars (defaults to 2000)
    pub fn max_content_chars(&self) -> usize {
        self.max_content_chars.unwrap_or(2000)
    }

    /// Get include file path (defaults to true)
    pub fn include_file_path(&self) -> bool {
        self.include_file_path.unwrap_or(true)
    }
}

/// Embedding model configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier
    pub name: Option<String>,
    /// Embedding vector dimension
    pub dimension: Option<usize>,
}

impl ModelConfig {
    /// Get model name (defaults to "all-MiniLM-L6-v2")
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("all-MiniLM-L6-v2")
    }

    /// Get embedding dimension (defaults to 384)
    pub fn dimension(&self) -> usize {
        self.dimension.unwrap_or(384)
    }
}

/// Graph store table and index names
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Node table name
    pub node_table: Option<String>,
    /// Embedding table name (kept separate from the node table)
    pub embedding_table: Option<String>,
    /// Vector index name
    pub index_name: Option<String>,
}

impl GraphConfig {
    /// Get node table name (defaults to "CodeNode")
    pub fn node_table(&self) -> &str {
        self.node_table.as_deref().unwrap_or("CodeNode")
    }

    /// Get embedding table name (defaults to "CodeEmbedding")
    pub fn embedding_table(&self) -> &str {
        self.embedding_table.as_deref().unwrap_or("CodeEmbedding")
    }

    /// Get vector index name (defaults to "code_embedding_index")
    pub fn index_name(&self) -> &str {
        self.index_name.as_deref().unwrap_or("code_embedding_index")
    }
}

/// Search configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default number of nearest neighbors to fetch
    pub default_k: Option<usize>,
    /// Default cosine distance cutoff (strict less-than)
    pub max_distance: Option<f32>,
}

impl SearchConfig {
    /// Get default k (defaults to 10)
    pub fn default_k(&self) -> usize {
        self.default_k.unwrap_or(10)
    }

    /// Get max distance (defaults to 0.5)
    pub fn max_distance(&self) -> f32 {
        self.max_distance.unwrap_or(0.5)
    }
}

/// Configuration loaded from .kgreprc.toml or ~/.config/kgrep/config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node labels eligible for embedding (closed allow-list)
    pub embeddable_labels: Option<Vec<NodeLabel>>,

    /// Pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Graph table/index names
    #[serde(default)]
    pub graph: GraphConfig,

    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .kgreprc.toml in current directory
    /// 2. ~/.config/kgrep/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(&PathBuf::from(".kgreprc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("kgrep").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Load configuration from a specific directory's .kgreprc.toml
    pub fn load_for_dir(dir: &std::path::Path) -> Self {
        Self::load_from_path(&dir.join(".kgreprc.toml")).unwrap_or_default()
    }

    fn load_from_path(path: &PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the embeddable label allow-list
    /// (defaults to Function, Method, Class, File)
    pub fn embeddable_labels(&self) -> Vec<NodeLabel> {
        self.embeddable_labels.clone().unwrap_or_else(|| {
            vec![
                NodeLabel::Function,
                NodeLabel::Method,
                NodeLabel::Class,
                NodeLabel::File,
            ]
        })
    }
}
