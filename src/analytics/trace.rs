//! Transitive closure traversals over the requirements graph
//!
//! All three traversals mark visited nodes, so they terminate on the
//! cycles the verify feedback edges create. IDs without a backing node
//! (dangling endpoints, unknown seeds) still participate: the closure is
//! computed over the edge relation, not the node set.

use crate::graph::{Direction, EdgeId, GraphStore, NodeId};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::VecDeque;

/// A traced subgraph: node IDs in discovery order plus every edge walked
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trace {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Trace {
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| n == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Bidirectional transitive closure from a seed set
///
/// Follows edges in both directions until fixpoint, which yields the
/// weakly-connected component(s) the seeds sit in. Idempotent: running
/// it again on its own node set adds nothing.
pub fn trace_chain(store: &GraphStore, seeds: &[NodeId]) -> Trace {
    walk(store, seeds, Direction::Both)
}

/// Upstream closure: everything that could affect the given node
pub fn trace_impact(store: &GraphStore, node: &NodeId) -> Trace {
    walk(store, std::slice::from_ref(node), Direction::Incoming)
}

/// Downstream closure: everything the given node affects
pub fn trace_dependencies(store: &GraphStore, node: &NodeId) -> Trace {
    walk(store, std::slice::from_ref(node), Direction::Outgoing)
}

fn walk(store: &GraphStore, seeds: &[NodeId], direction: Direction) -> Trace {
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut seen_edges: FxHashSet<EdgeId> = FxHashSet::default();
    let mut trace = Trace::default();

    for seed in seeds {
        if visited.insert(seed.clone()) {
            trace.nodes.push(seed.clone());
            queue.push_back(seed.clone());
        }
    }

    while let Some(current) = queue.pop_front() {
        if matches!(direction, Direction::Incoming | Direction::Both) {
            for edge in store.incoming_edges(&current) {
                if seen_edges.insert(edge.id.clone()) {
                    trace.edges.push(edge.id.clone());
                }
                if visited.insert(edge.source.clone()) {
                    trace.nodes.push(edge.source.clone());
                    queue.push_back(edge.source.clone());
                }
            }
        }
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            for edge in store.outgoing_edges(&current) {
                if seen_edges.insert(edge.id.clone()) {
                    trace.edges.push(edge.id.clone());
                }
                if visited.insert(edge.target.clone()) {
                    trace.nodes.push(edge.target.clone());
                    queue.push_back(edge.target.clone());
                }
            }
        }
    }

    trace
}
