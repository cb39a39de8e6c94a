//! In-memory property graph backed by `petgraph`. Rebuilt from the
//! relational store; never the other way around (spec §1 invariant 2).
//!
//! Reference: `drift-analysis`'s `call_graph` module for the
//! stable-key-indexed `StableDiGraph` pattern, adapted here to a labeled
//! multi-entity schema instead of a single call graph.

use std::collections::HashMap;
use std::sync::Mutex;

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::model::{EdgeKind, NodeData};

/// Single-session graph store. One mutex around the whole graph — writes are
/// infrequent relative to reads and batched per dual-write call, so a finer
/// lock buys little here.
pub struct GraphStore {
    inner: Mutex<Inner>,
}

struct Inner {
    graph: StableDiGraph<NodeData, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                graph: StableDiGraph::new(),
                index: HashMap::new(),
            }),
        }
    }

    pub fn node_count(&self) -> usize {
        self.inner.lock().expect("graph mutex poisoned").graph.node_count()
    }

    /// Idempotent MERGE: same stable key updates the node's data in place
    /// rather than duplicating it.
    pub fn upsert_node(&self, data: NodeData) -> NodeIndex {
        let key = data.stable_key();
        let mut inner = self.inner.lock().expect("graph mutex poisoned");
        if let Some(&idx) = inner.index.get(&key) {
            inner.graph[idx] = data;
            idx
        } else {
            let idx = inner.graph.add_node(data);
            inner.index.insert(key, idx);
            idx
        }
    }

    pub fn node_by_key(&self, key: &str) -> Option<NodeData> {
        let inner = self.inner.lock().expect("graph mutex poisoned");
        inner.index.get(key).map(|&idx| inner.graph[idx].clone())
    }

    pub fn fetch_nodes(&self, keys: &[String]) -> Vec<NodeData> {
        let inner = self.inner.lock().expect("graph mutex poisoned");
        keys.iter()
            .filter_map(|k| inner.index.get(k).map(|&idx| inner.graph[idx].clone()))
            .collect()
    }

    /// Idempotent MERGE on `(from, to, kind)` — does not duplicate an edge
    /// that already carries the same label between the same pair.
    pub fn upsert_edge(&self, from_key: &str, to_key: &str, kind: EdgeKind) -> bool {
        let mut inner = self.inner.lock().expect("graph mutex poisoned");
        let (Some(&from), Some(&to)) = (inner.index.get(from_key), inner.index.get(to_key)) else {
            return false;
        };
        let already = inner
            .graph
            .edges_connecting(from, to)
            .any(|e| *e.weight() == kind);
        if !already {
            inner.graph.add_edge(from, to, kind);
        }
        true
    }

    /// Outgoing neighbors of `key` reachable by an edge labeled `kind`.
    pub fn neighbors_out(&self, key: &str, kind: EdgeKind) -> Vec<NodeData> {
        let inner = self.inner.lock().expect("graph mutex poisoned");
        let Some(&idx) = inner.index.get(key) else {
            return Vec::new();
        };
        inner
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| *e.weight() == kind)
            .map(|e| inner.graph[e.target()].clone())
            .collect()
    }

    /// Incoming neighbors of `key` reachable by an edge labeled `kind` —
    /// used for "who depends on me" queries (e.g. IMPORTS dependents).
    pub fn neighbors_in(&self, key: &str, kind: EdgeKind) -> Vec<NodeData> {
        let inner = self.inner.lock().expect("graph mutex poisoned");
        let Some(&idx) = inner.index.get(key) else {
            return Vec::new();
        };
        inner
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter(|e| *e.weight() == kind)
            .map(|e| inner.graph[e.source()].clone())
            .collect()
    }

    pub fn in_degree(&self, key: &str, kind: EdgeKind) -> u32 {
        self.neighbors_in(key, kind).len() as u32
    }

    /// Removes a node and every edge touching it. `petgraph`'s stable graph
    /// keeps every other node's `NodeIndex` valid across this removal, so the
    /// rest of `index` needs no rebuilding. Returns whether a node existed.
    pub fn remove_node(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().expect("graph mutex poisoned");
        let Some(idx) = inner.index.remove(key) else {
            return false;
        };
        inner.graph.remove_node(idx);
        true
    }
}
