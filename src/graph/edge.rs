//! Edge implementation for the requirements graph
//!
//! Edges are directed and typed. Endpoints are plain node IDs and are not
//! validated against the node set; a dangling endpoint is data, not an
//! error, and every consumer must tolerate it.

use super::types::{EdgeId, NodeId, Relationship};
use serde::{Deserialize, Serialize};

/// A directed edge in the requirements graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    pub relationship: Relationship,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relationship: Relationship,
    ) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            relationship,
        }
    }

    /// Check if this edge connects two specific nodes (in either direction)
    pub fn connects(&self, node1: &NodeId, node2: &NodeId) -> bool {
        (self.source == *node1 && self.target == *node2)
            || (self.source == *node2 && self.target == *node1)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &NodeId) -> bool {
        self.source == *node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: &NodeId) -> bool {
        self.target == *node
    }

    /// Check if either endpoint is the given node
    pub fn touches(&self, node: &NodeId) -> bool {
        self.source == *node || self.target == *node
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint at all
    pub fn other_endpoint(&self, node: &NodeId) -> Option<&NodeId> {
        if self.source == *node {
            Some(&self.target)
        } else if self.target == *node {
            Some(&self.source)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
