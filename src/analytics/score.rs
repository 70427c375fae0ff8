//! Priority ranking and per-node risk assessment

use super::config::{RiskPoints, ScoringConfig};
use super::trace::trace_dependencies;
use crate::graph::{Category, Direction, GraphStore, KpiLevel, Node, NodeId};
use serde::Serialize;

/// One entry in the attention ranking
#[derive(Debug, Clone, Serialize)]
pub struct NodePriority {
    pub id: NodeId,
    pub label: String,
    pub score: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_score(score: u32, points: &RiskPoints) -> Self {
        if score >= points.high_at {
            RiskLevel::High
        } else if score >= points.medium_at {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
        }
    }
}

/// Risk verdict for a single node
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub id: NodeId,
    pub score: u32,
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

/// Rank every KPI by how much attention it needs
///
/// Scores are additive over independent factors; nodes scoring zero are
/// fine as they are and stay out of the ranking.
pub fn prioritize_nodes(store: &GraphStore, config: &ScoringConfig) -> Vec<NodePriority> {
    let points = &config.priority;
    let mut ranking: Vec<NodePriority> = store
        .kpi_nodes()
        .into_iter()
        .filter_map(|kpi| {
            let metrics = kpi.metrics()?;
            let mut score = 0;
            let mut reasons = Vec::new();

            if !metrics.achieved {
                score += points.unachieved;
                reasons.push("Not achieved".to_string());
            }
            if !metrics.has_model() {
                score += points.no_model;
                reasons.push("No model".to_string());
            }
            if !has_verification(store, kpi) {
                score += points.no_verification;
                reasons.push("No verification activity".to_string());
            }
            if kpi.level() == Some(KpiLevel::Top) {
                score += points.top_level;
                reasons.push("Level-1 KPI".to_string());
            }

            let reach = trace_dependencies(store, &kpi.id)
                .node_count()
                .saturating_sub(1) as u32;
            let reach_points = reach.min(points.reach_cap);
            if reach_points > 0 {
                score += reach_points;
                reasons.push(format!("Affects {} downstream node(s)", reach));
            }

            if score == 0 {
                return None;
            }
            Some(NodePriority {
                id: kpi.id.clone(),
                label: kpi.label.clone(),
                score,
                reasons,
            })
        })
        .collect();

    ranking.sort_by(|a, b| b.score.cmp(&a.score));
    ranking
}

/// Score one node's risk from its metric state and connectivity
pub fn assess_risk(store: &GraphStore, node: &Node, config: &ScoringConfig) -> RiskAssessment {
    let points = &config.risk;
    let mut score = 0;
    let mut factors = Vec::new();

    if let Some(metrics) = node.metrics() {
        if !metrics.achieved {
            score += points.unachieved;
            factors.push("KPI is not achieved".to_string());
        }
        if !metrics.has_model() {
            score += points.no_model;
            factors.push("No model backs this KPI".to_string());
        }
        if !has_verification(store, node) {
            score += points.no_verification;
            factors.push("No verification activity covers it".to_string());
        }
    }

    let fan_in = store.connected_nodes(&node.id, Direction::Incoming).len();
    if fan_in > points.fan_in_over {
        score += points.high_fan_in;
        factors.push(format!("High fan-in: {} direct upstream neighbors", fan_in));
    }
    let fan_out = store.connected_nodes(&node.id, Direction::Outgoing).len();
    if fan_out > points.fan_out_over {
        score += points.high_fan_out;
        factors.push(format!("High fan-out: feeds {} direct neighbors", fan_out));
    }

    RiskAssessment {
        id: node.id.clone(),
        score,
        level: RiskLevel::from_score(score, points),
        factors,
    }
}

fn has_verification(store: &GraphStore, node: &Node) -> bool {
    store
        .connected_nodes(&node.id, Direction::Both)
        .iter()
        .any(|n| n.category() == Category::Verify)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Dataset, Edge, KpiMetrics, Relationship};

    fn sample() -> GraphStore {
        let (nodes, edges) = Dataset::sample().into_parts();
        GraphStore::with_data(nodes, edges)
    }

    #[test]
    fn test_priority_ranking_order() {
        let store = sample();
        let ranking = prioritize_nodes(&store, &ScoringConfig::default());

        let ids: Vec<&str> = ranking.iter().map(|p| p.id.as_str()).collect();
        // Unachieved + unmodeled + unverified beats everything else.
        assert_eq!(ids[0], "KPI_GearRatio");
        assert_eq!(ranking[0].score, 102);
        assert_eq!(ids[1], "KPI_Noise");
        assert_eq!(ranking[1].score, 91);
    }

    #[test]
    fn test_priority_reasons_name_each_factor() {
        let store = sample();
        let ranking = prioritize_nodes(&store, &ScoringConfig::default());
        let gear = &ranking[0];
        assert!(gear.reasons.iter().any(|r| r == "Not achieved"));
        assert!(gear.reasons.iter().any(|r| r == "No model"));
        assert!(gear.reasons.iter().any(|r| r == "No verification activity"));
    }

    #[test]
    fn test_zero_scores_are_excluded() {
        // One achieved, modeled, verified sub-KPI with no outgoing edges.
        let nodes = vec![
            crate::graph::Node::sub_kpi(
                "KPI_Done",
                "Done",
                "KPI_Parent",
                KpiMetrics::new(true, 100.0).with_model(crate::graph::ModelType::Fmu),
            ),
            crate::graph::Node::verify("V_Done", "Done check"),
        ];
        let edges = vec![Edge::new("E_v", "V_Done", "KPI_Done", Relationship::Verify)];
        let store = GraphStore::with_data(nodes, edges);

        assert!(prioritize_nodes(&store, &ScoringConfig::default()).is_empty());
    }

    #[test]
    fn test_reach_points_are_capped() {
        // A chain of 25 nodes below one unachieved KPI.
        let mut nodes = vec![crate::graph::Node::kpi(
            "KPI_Root",
            "Root",
            crate::graph::KpiLevel::Sub,
            KpiMetrics::new(true, 90.0).with_model(crate::graph::ModelType::Sysml),
        )];
        let mut edges = Vec::new();
        let mut prev = "KPI_Root".to_string();
        for i in 0..25 {
            let id = format!("G_{}", i);
            nodes.push(crate::graph::Node::goal(id.clone(), id.clone()));
            edges.push(Edge::new(
                format!("E_{}", i),
                prev.clone(),
                id.clone(),
                Relationship::Satisfy,
            ));
            prev = id;
        }
        // Verified so only reach contributes.
        nodes.push(crate::graph::Node::verify("V_R", "Check"));
        edges.push(Edge::new("E_v", "V_R", "KPI_Root", Relationship::Verify));
        let store = GraphStore::with_data(nodes, edges);

        let ranking = prioritize_nodes(&store, &ScoringConfig::default());
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].score, 20);
    }

    #[test]
    fn test_risk_levels() {
        let store = sample();
        let config = ScoringConfig::default();

        let gear = store.node(&NodeId::new("KPI_GearRatio")).unwrap();
        let risk = assess_risk(&store, gear, &config);
        assert_eq!(risk.score, 7);
        assert_eq!(risk.level, RiskLevel::High);
        assert_eq!(risk.factors.len(), 3);

        let cycle = store.node(&NodeId::new("KPI_CycleLife")).unwrap();
        let risk = assess_risk(&store, cycle, &config);
        assert_eq!(risk.score, 3);
        assert_eq!(risk.level, RiskLevel::Medium);

        let fold = store.node(&NodeId::new("KPI_FoldTime")).unwrap();
        let risk = assess_risk(&store, fold, &config);
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.factors.is_empty());
    }

    #[test]
    fn test_fan_in_factor() {
        // Seven designs implementing one KPI trips the fan-in factor.
        let mut nodes = vec![crate::graph::Node::kpi(
            "KPI_Hub",
            "Hub",
            crate::graph::KpiLevel::Top,
            KpiMetrics::new(true, 100.0).with_model(crate::graph::ModelType::Sysml),
        )];
        let mut edges = Vec::new();
        for i in 0..7 {
            let id = format!("D_{}", i);
            nodes.push(crate::graph::Node::design(id.clone(), id.clone()));
            edges.push(Edge::new(
                format!("E_{}", i),
                id,
                "KPI_Hub",
                Relationship::Implement,
            ));
        }
        nodes.push(crate::graph::Node::verify("V_H", "Check"));
        edges.push(Edge::new("E_v", "V_H", "KPI_Hub", Relationship::Verify));
        let store = GraphStore::with_data(nodes, edges);

        let hub = store.node(&NodeId::new("KPI_Hub")).unwrap();
        let risk = assess_risk(&store, hub, &ScoringConfig::default());
        assert_eq!(risk.score, 1);
        assert!(risk.factors[0].contains("fan-in"));
    }
}
