//! Pairwise KPI correlation through shared design and verification neighbors
//!
//! Quadratic over the KPI count, which stays tiny for real programs.

use crate::graph::{Category, Direction, GraphStore, Node, NodeId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Medium,
    Weak,
}

impl CorrelationStrength {
    fn from_shared(designs: usize) -> Self {
        if designs >= 2 {
            CorrelationStrength::Strong
        } else if designs >= 1 {
            CorrelationStrength::Medium
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Medium => "medium",
            CorrelationStrength::Weak => "weak",
        }
    }
}

/// Two KPIs coupled through common design parameters or verification
/// activities
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCorrelation {
    pub first: NodeId,
    pub second: NodeId,
    pub shared_designs: Vec<NodeId>,
    pub shared_verifies: Vec<NodeId>,
    pub strength: CorrelationStrength,
    pub insight: String,
}

/// All correlated KPI pairs, strongest coupling first
pub fn analyze_correlations(store: &GraphStore) -> Vec<KpiCorrelation> {
    let kpis = store.kpi_nodes();
    let mut correlations = Vec::new();

    for (i, a) in kpis.iter().enumerate() {
        for b in kpis.iter().skip(i + 1) {
            let shared_designs = shared_neighbors(store, a, b, Category::Design);
            let shared_verifies = shared_neighbors(store, a, b, Category::Verify);
            if shared_designs.is_empty() && shared_verifies.is_empty() {
                continue;
            }

            correlations.push(KpiCorrelation {
                first: a.id.clone(),
                second: b.id.clone(),
                strength: CorrelationStrength::from_shared(shared_designs.len()),
                insight: insight_for(a, b),
                shared_designs,
                shared_verifies,
            });
        }
    }

    correlations.sort_by(|left, right| right.shared_designs.len().cmp(&left.shared_designs.len()));
    correlations
}

fn shared_neighbors(
    store: &GraphStore,
    a: &Node,
    b: &Node,
    category: Category,
) -> Vec<NodeId> {
    let of_a: Vec<&NodeId> = store
        .connected_nodes(&a.id, Direction::Both)
        .into_iter()
        .filter(|n| n.category() == category)
        .map(|n| &n.id)
        .collect();

    store
        .connected_nodes(&b.id, Direction::Both)
        .into_iter()
        .filter(|n| n.category() == category)
        .filter(|n| of_a.contains(&&n.id))
        .map(|n| n.id.clone())
        .collect()
}

fn insight_for(a: &Node, b: &Node) -> String {
    let a_ok = a.metrics().map_or(false, |m| m.achieved);
    let b_ok = b.metrics().map_or(false, |m| m.achieved);

    match (a_ok, b_ok) {
        (true, true) => format!(
            "Both {} and {} are achieved; the shared parameters are balanced well",
            a.label, b.label
        ),
        (true, false) => format!(
            "{} is achieved but {} is not; tuning the shared parameters may trade one off against the other",
            a.label, b.label
        ),
        (false, true) => format!(
            "{} is achieved but {} is not; tuning the shared parameters may trade one off against the other",
            b.label, a.label
        ),
        (false, false) => format!(
            "Neither {} nor {} is achieved; their shared parameters are a common lever worth revisiting",
            a.label, b.label
        ),
    }
}
