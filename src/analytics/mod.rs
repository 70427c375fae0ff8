//! Graph analytics over a requirements snapshot
//!
//! Traversal closures, KPI comparison, correlation mining, gap analysis,
//! level health and priority/risk scoring. Everything borrows the store,
//! runs synchronously and leaves the snapshot untouched.

pub mod compare;
pub mod config;
pub mod correlation;
pub mod gaps;
pub mod health;
pub mod score;
pub mod trace;

pub use compare::{compare_kpis, KpiComparison, KpiSummary};
pub use config::{GapThresholds, HealthWeights, PriorityPoints, RiskPoints, ScoringConfig};
pub use correlation::{analyze_correlations, CorrelationStrength, KpiCorrelation};
pub use gaps::{analyze_gaps, GapPriority, GapReport, GapSection};
pub use health::{analyze_level_health, HealthGrade, LevelHealth};
pub use score::{assess_risk, prioritize_nodes, NodePriority, RiskAssessment, RiskLevel};
pub use trace::{trace_chain, trace_dependencies, trace_impact, Trace};

use crate::graph::{GraphStore, Node, NodeId};
use serde::Serialize;

/// Achieved-vs-total summary over a KPI set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AchievementStats {
    pub achieved: usize,
    pub total: usize,

    /// Percentage in 0..=100; 0 for an empty set
    pub rate: f64,
}

impl AchievementStats {
    /// The rate formatted for display with one decimal, e.g. "66.7"
    pub fn rate_display(&self) -> String {
        format!("{:.1}", self.rate)
    }
}

/// Count achieved KPIs in a node set; non-KPI nodes are ignored
pub fn achievement_stats(nodes: &[&Node]) -> AchievementStats {
    let kpis: Vec<_> = nodes.iter().filter(|n| n.is_kpi()).collect();
    let total = kpis.len();
    let achieved = kpis
        .iter()
        .filter(|n| n.metrics().map_or(false, |m| m.achieved))
        .count();
    let rate = if total == 0 {
        0.0
    } else {
        achieved as f64 / total as f64 * 100.0
    };

    AchievementStats {
        achieved,
        total,
        rate,
    }
}

/// Borrowing facade bundling the store with one scoring config
///
/// Handy for callers that run several analyses back to back; each method
/// delegates to the corresponding free function.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    store: &'a GraphStore,
    config: &'a ScoringConfig,
}

impl<'a> Analytics<'a> {
    pub fn new(store: &'a GraphStore, config: &'a ScoringConfig) -> Self {
        Analytics { store, config }
    }

    pub fn trace_chain(&self, seeds: &[NodeId]) -> Trace {
        trace::trace_chain(self.store, seeds)
    }

    pub fn trace_impact(&self, node: &NodeId) -> Trace {
        trace::trace_impact(self.store, node)
    }

    pub fn trace_dependencies(&self, node: &NodeId) -> Trace {
        trace::trace_dependencies(self.store, node)
    }

    pub fn compare_kpis(&self, first: &NodeId, second: &NodeId) -> Option<KpiComparison> {
        compare::compare_kpis(self.store, first, second)
    }

    pub fn analyze_correlations(&self) -> Vec<KpiCorrelation> {
        correlation::analyze_correlations(self.store)
    }

    pub fn analyze_gaps(&self) -> GapReport {
        gaps::analyze_gaps(self.store, self.config)
    }

    pub fn analyze_level_health(&self) -> Vec<LevelHealth> {
        health::analyze_level_health(self.store, self.config)
    }

    pub fn prioritize_nodes(&self) -> Vec<NodePriority> {
        score::prioritize_nodes(self.store, self.config)
    }

    pub fn assess_risk(&self, node: &Node) -> RiskAssessment {
        score::assess_risk(self.store, node, self.config)
    }

    pub fn achievement_stats(&self, nodes: &[&Node]) -> AchievementStats {
        achievement_stats(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Dataset, KpiLevel, KpiMetrics};

    #[test]
    fn test_achievement_stats_display() {
        // 4 achieved out of 6.
        let nodes: Vec<Node> = (0..6)
            .map(|i| {
                Node::kpi(
                    format!("KPI_{}", i),
                    format!("K{}", i),
                    KpiLevel::Top,
                    KpiMetrics::new(i < 4, 80.0),
                )
            })
            .collect();
        let refs: Vec<&Node> = nodes.iter().collect();

        let stats = achievement_stats(&refs);
        assert_eq!(stats.achieved, 4);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.rate_display(), "66.7");
    }

    #[test]
    fn test_achievement_stats_empty() {
        let stats = achievement_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.rate, 0.0);
        assert_eq!(stats.rate_display(), "0.0");
    }

    #[test]
    fn test_achievement_stats_ignores_non_kpis() {
        let goal = Node::goal("G", "G");
        let kpi = Node::kpi("K", "K", KpiLevel::Top, KpiMetrics::new(true, 100.0));
        let stats = achievement_stats(&[&goal, &kpi]);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.achieved, 1);
    }

    #[test]
    fn test_facade_delegates() {
        let (nodes, edges) = Dataset::sample().into_parts();
        let store = GraphStore::with_data(nodes, edges);
        let config = ScoringConfig::default();
        let analytics = Analytics::new(&store, &config);

        let chain = analytics.trace_chain(&[NodeId::new("KPI_FoldTime")]);
        assert!(chain.node_count() > 1);
        assert_eq!(analytics.analyze_level_health().len(), 2);
        assert!(!analytics.prioritize_nodes().is_empty());
    }
}
