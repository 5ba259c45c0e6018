//! Question graph canonicalization and content hashing.
//!
//! A question's graph is the query template itself: named nodes (optionally
//! pinned to a curie) joined by typed edges. The content hash is computed
//! over the canonical form, so two questions with the same structure hash
//! identically no matter what order the client listed nodes and edges in, or
//! what name/notes metadata the questions carry.

use crate::error::{DbError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One node of a question graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub curie: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One edge of a question graph, referencing node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QEdge {
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Canonical (nodes, edges) representation of a question's query template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGraph {
    pub nodes: Vec<QNode>,
    pub edges: Vec<QEdge>,
}

impl QueryGraph {
    /// Convert a client-supplied graph description into canonical form.
    ///
    /// Fails with a validation error before anything is persisted when the
    /// structure is malformed: no nodes, blank or duplicate node ids, or
    /// edges referencing unknown nodes.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let mut graph: QueryGraph = serde_json::from_value(value.clone())
            .map_err(|e| DbError::InvalidGraph(e.to_string()))?;
        graph.validate()?;
        graph.canonicalize();
        Ok(graph)
    }

    /// Rehydrate a graph from the stored `nodes`/`edges` columns.
    pub fn from_stored(nodes: &str, edges: &str) -> Result<Self> {
        Ok(QueryGraph {
            nodes: serde_json::from_str(nodes)?,
            edges: serde_json::from_str(edges)?,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(DbError::InvalidGraph("graph has no nodes".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(DbError::InvalidGraph("node with empty id".to_string()));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(DbError::InvalidGraph(format!("duplicate node id {}", node.id)));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source_id, &edge.target_id] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(DbError::InvalidGraph(format!(
                        "edge references unknown node {}",
                        endpoint
                    )));
                }
            }
        }

        Ok(())
    }

    fn canonicalize(&mut self) {
        self.nodes.sort_by(|a, b| a.id.cmp(&b.id));
        self.edges.sort_by(|a, b| {
            (&a.source_id, &a.target_id, &a.kind).cmp(&(&b.source_id, &b.target_id, &b.kind))
        });
    }

    /// Content hash: SHA-256 over the canonical JSON form, hex-encoded.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        // Canonical serialization is deterministic: fields in declaration
        // order, nodes and edges already sorted.
        hasher.update(self.nodes_json().as_bytes());
        hasher.update(b"|");
        hasher.update(self.edges_json().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn nodes_json(&self) -> String {
        serde_json::to_string(&self.nodes).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn edges_json(&self) -> String {
        serde_json::to_string(&self.edges).unwrap_or_else(|_| "[]".to_string())
    }
}
