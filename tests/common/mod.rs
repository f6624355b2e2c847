// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted collaborators for integration tests: an in-memory graph store
//! that answers the query shapes kgrep issues, and a deterministic
//! keyword-routed embedding engine.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use anyhow::Result;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

use kgrep::embedding::EmbeddingEngine;
use kgrep::errors::NotInitializedError;
use kgrep::graph::{GraphStore, Params, Row, Value};

static TRACING: Once = Once::new();

/// Initializes tracing once per test binary, honoring the KGREP_LOG env
/// var (e.g. KGREP_LOG=debug cargo test).
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_env("KGREP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub id: String,
    pub name: String,
    pub label: String,
    pub file_path: String,
    pub content: String,
    pub start_line: Option<i64>,
    pub end_line: Option<i64>,
}

impl FakeNode {
    pub fn function(id: &str, name: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            label: "Function".to_string(),
            file_path: format!("src/{name}.rs"),
            content: content.to_string(),
            start_line: Some(1),
            end_line: Some(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeEdge {
    pub from: String,
    pub to: String,
    pub rel_type: String,
}

#[derive(Default)]
struct Inner {
    nodes: Vec<FakeNode>,
    edges: Vec<FakeEdge>,
    embeddings: Vec<(String, Vec<f32>)>,
    index_created: bool,
    batch_statements: Vec<String>,
}

/// In-memory stand-in for the external graph engine.
///
/// Dispatches on the query text kgrep generates: node selection, batched
/// embedding inserts, index creation, and vector-index lookups computed by
/// brute-force cosine distance.
#[derive(Default)]
pub struct FakeGraphStore {
    inner: Mutex<Inner>,
}

impl FakeGraphStore {
    pub fn new(nodes: Vec<FakeNode>, edges: Vec<FakeEdge>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                nodes,
                edges,
                ..Default::default()
            }),
        }
    }

    pub fn embedding_count(&self) -> usize {
        self.inner.lock().unwrap().embeddings.len()
    }

    pub fn index_created(&self) -> bool {
        self.inner.lock().unwrap().index_created
    }

    pub fn batch_statements(&self) -> Vec<String> {
        self.inner.lock().unwrap().batch_statements.clone()
    }

    fn select_nodes(&self, query: &str) -> Vec<Row> {
        let allow: Vec<String> = query
            .split_once("IN [")
            .map(|(_, rest)| rest.split(']').next().unwrap_or(""))
            .unwrap_or("")
            .split(',')
            .map(|s| s.trim().trim_matches('\'').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let inner = self.inner.lock().unwrap();
        inner
            .nodes
            .iter()
            .filter(|n| allow.contains(&n.label))
            .map(|n| {
                Row::from_pairs(vec![
                    ("n.id", Value::Str(n.id.clone())),
                    ("n.name", Value::Str(n.name.clone())),
                    ("n.label", Value::Str(n.label.clone())),
                    ("n.filePath", Value::Str(n.file_path.clone())),
                    ("n.content", Value::Str(n.content.clone())),
                    (
                        "n.startLine",
                        n.start_line.map(Value::Int).unwrap_or(Value::Null),
                    ),
                    (
                        "n.endLine",
                        n.end_line.map(Value::Int).unwrap_or(Value::Null),
                    ),
                ])
            })
            .collect()
    }

    fn vector_query(&self, query: &str) -> Result<Vec<Row>> {
        let inner = self.inner.lock().unwrap();
        if !inner.index_created {
            anyhow::bail!("Catalog exception: index 'code_embedding_index' does not exist");
        }

        let vector = parse_vector(query)?;
        let k = parse_k(query)?;

        let mut hits: Vec<(&FakeNode, f32)> = inner
            .embeddings
            .iter()
            .filter_map(|(node_id, stored)| {
                let node = inner.nodes.iter().find(|n| &n.id == node_id)?;
                Some((node, cosine_distance(&vector, stored)))
            })
            .collect();
        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        if query.contains("-[r]-") {
            // Context shape: one positional row per (match, neighbor) pair,
            // to exercise the planner's positional fallback.
            let mut rows = Vec::new();
            for (node, distance) in &hits {
                for edge in &inner.edges {
                    let connected_id = if edge.from == node.id {
                        &edge.to
                    } else if edge.to == node.id {
                        &edge.from
                    } else {
                        continue;
                    };
                    let connected = inner.nodes.iter().find(|n| &n.id == connected_id);
                    rows.push(Row::new(
                        (0..9).map(|i| format!("c{i}")).collect(),
                        vec![
                            Value::Str(node.id.clone()),
                            Value::Str(node.name.clone()),
                            Value::Str(node.label.clone()),
                            Value::Str(node.file_path.clone()),
                            Value::Float(f64::from(*distance)),
                            Value::Str(connected_id.clone()),
                            Value::Str(connected.map(|n| n.name.clone()).unwrap_or_default()),
                            Value::Str(connected.map(|n| n.label.clone()).unwrap_or_default()),
                            Value::Str(edge.rel_type.clone()),
                        ],
                    ));
                }
            }
            Ok(rows)
        } else {
            Ok(hits
                .iter()
                .map(|(node, distance)| {
                    Row::from_pairs(vec![
                        ("n.id", Value::Str(node.id.clone())),
                        ("n.name", Value::Str(node.name.clone())),
                        ("n.label", Value::Str(node.label.clone())),
                        ("n.filePath", Value::Str(node.file_path.clone())),
                        (
                            "n.startLine",
                            node.start_line.map(Value::Int).unwrap_or(Value::Null),
                        ),
                        (
                            "n.endLine",
                            node.end_line.map(Value::Int).unwrap_or(Value::Null),
                        ),
                        ("distance", Value::Float(f64::from(*distance))),
                    ])
                })
                .collect())
        }
    }
}

impl GraphStore for FakeGraphStore {
    fn execute_query(&self, query: &str) -> Result<Vec<Row>> {
        if query.contains("CREATE_VECTOR_INDEX") {
            let mut inner = self.inner.lock().unwrap();
            if inner.index_created {
                anyhow::bail!("Binder exception: index code_embedding_index already exists");
            }
            inner.index_created = true;
            return Ok(Vec::new());
        }
        if query.contains("QUERY_VECTOR_INDEX") {
            return self.vector_query(query);
        }
        if query.starts_with("MATCH (n:") {
            return Ok(self.select_nodes(query));
        }
        anyhow::bail!("FakeGraphStore: unrecognized query: {query}");
    }

    fn execute_batch(&self, query: &str, params: &[Params]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.batch_statements.push(query.to_string());

        if !query.contains("nodeId: $nodeId") {
            anyhow::bail!("FakeGraphStore: unrecognized batch statement: {query}");
        }
        for set in params {
            let node_id = set
                .iter()
                .find(|(name, _)| name == "nodeId")
                .and_then(|(_, v)| v.as_str())
                .ok_or_else(|| anyhow::anyhow!("missing nodeId param"))?
                .to_string();
            let embedding = set
                .iter()
                .find_map(|(name, v)| match (name.as_str(), v) {
                    ("embedding", Value::FloatList(vec)) => Some(vec.clone()),
                    _ => None,
                })
                .ok_or_else(|| anyhow::anyhow!("missing embedding param"))?;
            inner.embeddings.push((node_id, embedding));
        }
        Ok(())
    }
}

fn parse_vector(query: &str) -> Result<Vec<f32>> {
    let start = query
        .find("CAST([")
        .ok_or_else(|| anyhow::anyhow!("no vector literal in query"))?
        + "CAST([".len();
    let rest = &query[start..];
    let end = rest
        .find(']')
        .ok_or_else(|| anyhow::anyhow!("unterminated vector literal"))?;
    rest[..end]
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| anyhow::anyhow!("bad vector element: {e}"))
        })
        .collect()
}

fn parse_k(query: &str) -> Result<usize> {
    let call = query
        .split("YIELD")
        .next()
        .ok_or_else(|| anyhow::anyhow!("no YIELD clause"))?;
    let call = call.trim_end();
    let call = call.strip_suffix(')').unwrap_or(call);
    call.rsplit(',')
        .next()
        .ok_or_else(|| anyhow::anyhow!("no k argument"))?
        .trim()
        .parse::<usize>()
        .map_err(|e| anyhow::anyhow!("bad k argument: {e}"))
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// Engine that routes texts to fixed vectors by substring match, in
/// registration order. Unmatched texts embed to the last axis.
pub struct KeywordEngine {
    dimension: usize,
    mappings: Vec<(String, Vec<f32>)>,
    ready: bool,
    pub batch_calls: usize,
}

impl KeywordEngine {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            mappings: Vec::new(),
            ready: false,
            batch_calls: 0,
        }
    }

    pub fn with_mapping(mut self, keyword: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dimension);
        self.mappings.push((keyword.to_string(), vector));
        self
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        for (keyword, vector) in &self.mappings {
            if text.contains(keyword.as_str()) {
                return vector.clone();
            }
        }
        let mut fallback = vec![0.0; self.dimension];
        if let Some(last) = fallback.last_mut() {
            *last = 1.0;
        }
        fallback
    }
}

impl EmbeddingEngine for KeywordEngine {
    fn model_id(&self) -> &str {
        "keyword-test"
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
            on_progress(50);
            self.ready = true;
        }
        on_progress(100);
        Ok(())
    }

    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if !self.ready {
            return Err(NotInitializedError.into());
        }
        self.batch_calls += 1;
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
