// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection of embeddable nodes from the knowledge graph.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::graph::store::{quote, read_i64, read_str, GraphStore, Row};

/// Node kinds eligible for embedding. Closed set; the allow-list in the
/// configuration selects from these, it is never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLabel {
    Function,
    Method,
    Class,
    Interface,
    File,
    Module,
}

impl NodeLabel {
    /// Canonical label string as stored in the graph.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Function => "Function",
            NodeLabel::Method => "Method",
            NodeLabel::Class => "Class",
            NodeLabel::Interface => "Interface",
            NodeLabel::File => "File",
            NodeLabel::Module => "Module",
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "function" => Ok(NodeLabel::Function),
            "method" => Ok(NodeLabel::Method),
            "class" => Ok(NodeLabel::Class),
            "interface" => Ok(NodeLabel::Interface),
            "file" => Ok(NodeLabel::File),
            "module" => Ok(NodeLabel::Module),
            other => anyhow::bail!("Unknown node label '{}'", other),
        }
    }
}

/// Read-only projection of a graph node, fetched at pipeline start.
#[derive(Debug, Clone)]
pub struct EmbeddableNode {
    /// Unique node id (primary key into the graph)
    pub id: String,
    /// Symbol or file name
    pub name: String,
    /// Node kind
    pub label: NodeLabel,
    /// Path of the defining source file
    pub file_path: String,
    /// Source snippet (may be empty)
    pub content: String,
    /// Starting line number (1-indexed)
    pub start_line: Option<u32>,
    /// Ending line number (1-indexed, inclusive)
    pub end_line: Option<u32>,
}

/// Queries the graph store for all nodes whose label qualifies them for
/// embedding.
pub struct NodeSelector<'a> {
    store: &'a dyn GraphStore,
    node_table: String,
    labels: Vec<NodeLabel>,
}

impl<'a> NodeSelector<'a> {
    pub fn new(store: &'a dyn GraphStore, node_table: &str, labels: Vec<NodeLabel>) -> Self {
        Self {
            store,
            node_table: node_table.to_string(),
            labels,
        }
    }

    /// Fetches a fresh snapshot of embeddable nodes.
    ///
    /// An empty result is a success, not an error; the pipeline treats it
    /// as a fast path.
    pub fn select(&self) -> Result<Vec<EmbeddableNode>> {
        let allow_list: Vec<String> = self.labels.iter().map(|l| quote(l.as_str())).collect();
        let query = format!(
            "MATCH (n:{table}) WHERE n.label IN [{labels}] \
             RETURN n.id, n.name, n.label, n.filePath, n.content, n.startLine, n.endLine",
            table = self.node_table,
            labels = allow_list.join(", "),
        );

        let rows = self
            .store
            .execute_query(&query)
            .context("Failed to query embeddable nodes")?;

        let mut nodes = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(node) = parse_node(row) {
                nodes.push(node);
            } else {
                tracing::warn!("Skipping malformed node row: {:?}", row);
            }
        }
        Ok(nodes)
    }
}

/// Parses one node row using the defensive named/positional read
/// convention.
pub(crate) fn parse_node(row: &Row) -> Option<EmbeddableNode> {
    let id = read_str(row, "n.id", 0)?;
    let name = read_str(row, "n.name", 1)?;
    let label = read_str(row, "n.label", 2)?.parse().ok()?;
    let file_path = read_str(row, "n.filePath", 3).unwrap_or_default();
    let content = read_str(row, "n.content", 4).unwrap_or_default();
    let start_line = read_i64(row, "n.startLine", 5).map(|l| l as u32);
    let end_line = read_i64(row, "n.endLine", 6).map(|l| l as u32);

    Some(EmbeddableNode {
        id,
        name,
        label,
        file_path,
        content,
        start_line,
        end_line,
    })
}
