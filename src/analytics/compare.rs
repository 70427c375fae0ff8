//! Side-by-side comparison of two KPIs

use crate::graph::{Category, Direction, GraphStore, KpiLevel, ModelType, Node, NodeId};
use serde::Serialize;

/// Everything worth diffing about one KPI
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub id: NodeId,
    pub label: String,
    pub achieved: bool,
    pub achievement_rate: f64,
    pub level: KpiLevel,
    pub model_type: Option<ModelType>,
    pub design_count: usize,
    pub verify_count: usize,
}

/// Metric-by-metric comparison of two KPIs
#[derive(Debug, Clone, Serialize)]
pub struct KpiComparison {
    pub first: KpiSummary,
    pub second: KpiSummary,

    /// One-line verdict naming the KPI with the higher achievement rate
    pub summary: String,
}

/// `None` if either ID does not resolve to a KPI node
pub fn compare_kpis(store: &GraphStore, first: &NodeId, second: &NodeId) -> Option<KpiComparison> {
    let a = summarize(store, store.node(first)?)?;
    let b = summarize(store, store.node(second)?)?;

    let summary = if a.achievement_rate > b.achievement_rate {
        format!(
            "{} leads on achievement ({:.1}% vs {:.1}%)",
            a.label, a.achievement_rate, b.achievement_rate
        )
    } else if b.achievement_rate > a.achievement_rate {
        format!(
            "{} leads on achievement ({:.1}% vs {:.1}%)",
            b.label, b.achievement_rate, a.achievement_rate
        )
    } else {
        format!("Both KPIs sit at {:.1}% achievement", a.achievement_rate)
    };

    Some(KpiComparison {
        first: a,
        second: b,
        summary,
    })
}

fn summarize(store: &GraphStore, node: &Node) -> Option<KpiSummary> {
    let metrics = node.metrics()?;
    let neighbors = store.connected_nodes(&node.id, Direction::Both);
    let design_count = neighbors
        .iter()
        .filter(|n| n.category() == Category::Design)
        .count();
    let verify_count = neighbors
        .iter()
        .filter(|n| n.category() == Category::Verify)
        .count();

    Some(KpiSummary {
        id: node.id.clone(),
        label: node.label.clone(),
        achieved: metrics.achieved,
        achievement_rate: metrics.achievement_rate,
        level: node.level()?,
        model_type: metrics.model_type,
        design_count,
        verify_count,
    })
}
