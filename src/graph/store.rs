//! In-memory snapshot storage for the requirements graph
//!
//! The store holds exactly one snapshot of the host's node/edge arrays and
//! answers structural queries over it. It never traverses beyond one hop
//! and never mutates except through wholesale replacement.

use super::edge::Edge;
use super::node::Node;
use super::types::{Category, Direction, KpiLevel, ModelType, NodeId, Relationship};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug;

/// Conjunctive node filter; every set field must hold for a node to match.
///
/// The metric filters (`achieved`, `model_type`, `has_model`, `level`) can
/// only be satisfied by KPI nodes, so setting any of them excludes the
/// other categories.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub categories: Option<Vec<Category>>,
    pub achieved: Option<bool>,
    pub model_type: Option<ModelType>,
    pub has_model: Option<bool>,
    pub level: Option<KpiLevel>,
    pub ids: Option<Vec<NodeId>>,
}

impl NodeFilter {
    pub fn new() -> Self {
        NodeFilter::default()
    }

    pub fn categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn category(self, category: Category) -> Self {
        self.categories(vec![category])
    }

    pub fn achieved(mut self, achieved: bool) -> Self {
        self.achieved = Some(achieved);
        self
    }

    pub fn model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = Some(model_type);
        self
    }

    pub fn has_model(mut self, has_model: bool) -> Self {
        self.has_model = Some(has_model);
        self
    }

    pub fn level(mut self, level: KpiLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn ids(mut self, ids: Vec<NodeId>) -> Self {
        self.ids = Some(ids);
        self
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(categories) = &self.categories {
            if !categories.contains(&node.category()) {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&node.id) {
                return false;
            }
        }
        if let Some(want) = self.achieved {
            match node.metrics() {
                Some(m) if m.achieved == want => {}
                _ => return false,
            }
        }
        if let Some(want) = self.model_type {
            match node.metrics() {
                Some(m) if m.model_type == Some(want) => {}
                _ => return false,
            }
        }
        if let Some(want) = self.has_model {
            match node.metrics() {
                Some(m) if m.has_model() == want => {}
                _ => return false,
            }
        }
        if let Some(want) = self.level {
            if node.level() != Some(want) {
                return false;
            }
        }
        true
    }
}

/// Node counts per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryCounts {
    pub goal: usize,
    pub kpi: usize,
    pub design: usize,
    pub verify: usize,
}

/// KPI status histogram; computed over KPI nodes only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub achieved: usize,
    pub unachieved: usize,
    pub with_model: usize,
    pub without_model: usize,
}

/// Aggregate counts for a node set
///
/// Invariant: `by_status.achieved + by_status.unachieved == by_category.kpi`
/// for any input, because both sides count exactly the KPI nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total: usize,
    pub by_category: CategoryCounts,
    pub by_status: StatusCounts,
}

/// In-memory snapshot store
///
/// Uses an insertion-ordered node map so results come back in the host's
/// array order, plus adjacency lists over edge indices:
/// - nodes: NodeId -> Node (insertion-ordered)
/// - edges: flat Vec in host order
/// - outgoing/incoming: NodeId -> Vec of edge indices
/// - category_index: Category -> Vec of NodeIds
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    outgoing: FxHashMap<NodeId, Vec<usize>>,
    incoming: FxHashMap<NodeId, Vec<usize>>,
    category_index: FxHashMap<Category, Vec<NodeId>>,
}

impl GraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        GraphStore::default()
    }

    /// Create a store holding the given snapshot
    pub fn with_data(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut store = GraphStore::new();
        store.update_data(nodes, edges);
        store
    }

    /// Replace the entire snapshot and rebuild all indices
    ///
    /// This is the only mutation the store supports; the host calls it when
    /// its node/edge arrays change wholesale.
    pub fn update_data(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        self.edges = edges;
        self.outgoing.clear();
        self.incoming.clear();
        self.category_index.clear();

        for node in self.nodes.values() {
            self.category_index
                .entry(node.category())
                .or_default()
                .push(node.id.clone());
        }
        for (idx, edge) in self.edges.iter().enumerate() {
            self.outgoing.entry(edge.source.clone()).or_default().push(idx);
            self.incoming.entry(edge.target.clone()).or_default().push(idx);
        }

        debug!(
            "Rebuilt graph snapshot: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
    }

    /// Get a node by ID
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in host order
    pub fn all_nodes(&self) -> Vec<&Node> {
        self.nodes.values().collect()
    }

    /// All edges in host order
    pub fn all_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All KPI nodes in host order
    pub fn kpi_nodes(&self) -> Vec<&Node> {
        self.nodes_by_category(Category::Kpi)
    }

    /// All nodes of one category, in host order
    pub fn nodes_by_category(&self, category: Category) -> Vec<&Node> {
        self.category_index
            .get(&category)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get all outgoing edges from a node
    pub fn outgoing_edges(&self, node_id: &NodeId) -> Vec<&Edge> {
        self.outgoing
            .get(node_id)
            .map(|idxs| idxs.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// Get all incoming edges to a node
    pub fn incoming_edges(&self, node_id: &NodeId) -> Vec<&Edge> {
        self.incoming
            .get(node_id)
            .map(|idxs| idxs.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// Nodes matching every set field of the filter; empty vec when nothing
    /// matches, never an error
    pub fn query_nodes(&self, filter: &NodeFilter) -> Vec<&Node> {
        self.nodes.values().filter(|n| filter.matches(n)).collect()
    }

    /// Edges with at least one endpoint in `node_ids`, optionally restricted
    /// to one relationship type
    pub fn query_edges(
        &self,
        node_ids: &[NodeId],
        relationship: Option<Relationship>,
    ) -> Vec<&Edge> {
        let id_set: FxHashSet<&NodeId> = node_ids.iter().collect();
        self.edges
            .iter()
            .filter(|e| id_set.contains(&e.source) || id_set.contains(&e.target))
            .filter(|e| relationship.map_or(true, |r| e.relationship == r))
            .collect()
    }

    /// Aggregate counts over the whole snapshot or an explicit subset
    pub fn stats(&self, subset: Option<&[&Node]>) -> GraphStats {
        match subset {
            Some(nodes) => Self::count(nodes.iter().copied()),
            None => Self::count(self.nodes.values()),
        }
    }

    fn count<'a>(nodes: impl Iterator<Item = &'a Node>) -> GraphStats {
        let mut by_category = CategoryCounts::default();
        let mut by_status = StatusCounts::default();
        let mut total = 0;

        for node in nodes {
            total += 1;
            match node.category() {
                Category::Goal => by_category.goal += 1,
                Category::Kpi => by_category.kpi += 1,
                Category::Design => by_category.design += 1,
                Category::Verify => by_category.verify += 1,
            }
            if let Some(metrics) = node.metrics() {
                if metrics.achieved {
                    by_status.achieved += 1;
                } else {
                    by_status.unachieved += 1;
                }
                if metrics.has_model() {
                    by_status.with_model += 1;
                } else {
                    by_status.without_model += 1;
                }
            }
        }

        GraphStats {
            total,
            by_category,
            by_status,
        }
    }

    /// One-hop neighbors of a node
    ///
    /// `Incoming` returns the sources of edges pointing at the node,
    /// `Outgoing` the targets of edges leaving it, `Both` the deduplicated
    /// union. An unknown ID or a dangling endpoint yields nothing.
    pub fn connected_nodes(&self, node_id: &NodeId, direction: Direction) -> Vec<&Node> {
        let mut seen: FxHashSet<&NodeId> = FxHashSet::default();
        let mut result = Vec::new();

        if matches!(direction, Direction::Incoming | Direction::Both) {
            for edge in self.incoming_edges(node_id) {
                if seen.insert(&edge.source) {
                    if let Some(node) = self.nodes.get(&edge.source) {
                        result.push(node);
                    }
                }
            }
        }
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            for edge in self.outgoing_edges(node_id) {
                if seen.insert(&edge.target) {
                    if let Some(node) = self.nodes.get(&edge.target) {
                        result.push(node);
                    }
                }
            }
        }

        result
    }
}
