//! Coverage gap analysis: which KPIs lack models, verification, or results

use super::config::ScoringConfig;
use super::trace::trace_dependencies;
use crate::graph::{Category, Direction, GraphStore, KpiLevel, Node, NodeId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    High,
    Medium,
    Low,
}

impl GapPriority {
    fn from_rate(rate: f64, config: &ScoringConfig) -> Self {
        if rate < config.gaps.high_below {
            GapPriority::High
        } else if rate < config.gaps.medium_below {
            GapPriority::Medium
        } else {
            GapPriority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GapPriority::High => "high",
            GapPriority::Medium => "medium",
            GapPriority::Low => "low",
        }
    }
}

/// One coverage dimension: who is missing and how bad it is
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSection {
    pub missing: Vec<NodeId>,

    /// Percentage of KPIs covered on this dimension
    pub coverage_rate: f64,

    pub priority: GapPriority,
}

/// Full gap picture across model, verification and achievement coverage
#[derive(Debug, Clone, Serialize)]
pub struct GapReport {
    pub model: GapSection,
    pub verification: GapSection,
    pub achievement: GapSection,
    pub recommendations: Vec<String>,
}

impl GapReport {
    pub fn has_gaps(&self) -> bool {
        !self.model.missing.is_empty()
            || !self.verification.missing.is_empty()
            || !self.achievement.missing.is_empty()
    }
}

pub fn analyze_gaps(store: &GraphStore, config: &ScoringConfig) -> GapReport {
    let kpis = store.kpi_nodes();

    let model = section(&kpis, config, |kpi| {
        kpi.metrics().map_or(false, |m| m.has_model())
    });
    let verification = section(&kpis, config, |kpi| is_verified(store, kpi));
    let achievement = section(&kpis, config, |kpi| {
        kpi.metrics().map_or(false, |m| m.achieved)
    });

    let recommendations = recommend(store, &kpis, &model, &verification, &achievement);

    GapReport {
        model,
        verification,
        achievement,
        recommendations,
    }
}

fn section(
    kpis: &[&Node],
    config: &ScoringConfig,
    covered: impl Fn(&Node) -> bool,
) -> GapSection {
    let missing: Vec<NodeId> = kpis
        .iter()
        .filter(|k| !covered(k))
        .map(|k| k.id.clone())
        .collect();

    let coverage_rate = if kpis.is_empty() {
        100.0
    } else {
        (kpis.len() - missing.len()) as f64 / kpis.len() as f64 * 100.0
    };

    GapSection {
        missing,
        priority: GapPriority::from_rate(coverage_rate, config),
        coverage_rate,
    }
}

fn is_verified(store: &GraphStore, kpi: &Node) -> bool {
    store
        .connected_nodes(&kpi.id, Direction::Both)
        .iter()
        .any(|n| n.category() == Category::Verify)
}

fn recommend(
    store: &GraphStore,
    kpis: &[&Node],
    model: &GapSection,
    verification: &GapSection,
    achievement: &GapSection,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    // Level-1 gaps come first; they drag the whole program down.
    let top_level = |section: &GapSection| -> Vec<String> {
        section
            .missing
            .iter()
            .filter_map(|id| store.node(id))
            .filter(|n| n.level() == Some(KpiLevel::Top))
            .map(|n| n.label.clone())
            .collect()
    };

    let top_model = top_level(model);
    if !top_model.is_empty() {
        recommendations.push(format!(
            "Build models for the level-1 KPIs still without one: {}",
            top_model.join(", ")
        ));
    }
    let top_verify = top_level(verification);
    if !top_verify.is_empty() {
        recommendations.push(format!(
            "Plan verification activities for the level-1 KPIs: {}",
            top_verify.join(", ")
        ));
    }
    let top_achieve = top_level(achievement);
    if !top_achieve.is_empty() {
        recommendations.push(format!(
            "Push the unachieved level-1 KPIs over the line: {}",
            top_achieve.join(", ")
        ));
    }

    // Then the unachieved KPIs whose downstream reach is largest.
    let mut by_impact: Vec<(&Node, usize)> = kpis
        .iter()
        .filter(|k| k.metrics().map_or(false, |m| !m.achieved))
        .map(|k| {
            let reach = trace_dependencies(store, &k.id).node_count().saturating_sub(1);
            (*k, reach)
        })
        .collect();
    by_impact.sort_by(|a, b| b.1.cmp(&a.1));

    for (kpi, reach) in by_impact.into_iter().take(3) {
        recommendations.push(format!(
            "{} affects {} downstream node{}; closing it has the widest effect",
            kpi.label,
            reach,
            if reach == 1 { "" } else { "s" }
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Dataset, KpiMetrics, ModelType};

    fn sample() -> GraphStore {
        let (nodes, edges) = Dataset::sample().into_parts();
        GraphStore::with_data(nodes, edges)
    }

    #[test]
    fn test_sample_gap_sections() {
        let store = sample();
        let report = analyze_gaps(&store, &ScoringConfig::default());

        // 4 of 6 KPIs carry a model.
        assert_eq!(report.model.missing.len(), 2);
        assert!((report.model.coverage_rate - 66.7).abs() < 0.1);
        assert_eq!(report.model.priority, GapPriority::Medium);

        // Only 2 of 6 are achieved.
        assert_eq!(report.achievement.missing.len(), 4);
        assert_eq!(report.achievement.priority, GapPriority::High);
    }

    #[test]
    fn test_coverage_below_sixty_is_high_priority() {
        // 5 of 9 modeled = 55.6% coverage.
        let mut nodes = Vec::new();
        for i in 0..5 {
            nodes.push(crate::graph::Node::kpi(
                format!("KPI_M{}", i),
                format!("Modeled {}", i),
                crate::graph::KpiLevel::Top,
                KpiMetrics::new(true, 90.0).with_model(ModelType::Sysml),
            ));
        }
        for i in 0..4 {
            nodes.push(crate::graph::Node::kpi(
                format!("KPI_U{}", i),
                format!("Unmodeled {}", i),
                crate::graph::KpiLevel::Top,
                KpiMetrics::new(true, 90.0),
            ));
        }
        let store = GraphStore::with_data(nodes, vec![]);

        let report = analyze_gaps(&store, &ScoringConfig::default());
        assert!((report.model.coverage_rate - 55.6).abs() < 0.1);
        assert_eq!(report.model.priority, GapPriority::High);
    }

    #[test]
    fn test_level_one_gaps_lead_recommendations() {
        let store = sample();
        let report = analyze_gaps(&store, &ScoringConfig::default());

        // KPI_Noise is the only level-1 KPI without a model.
        assert!(report.recommendations[0].contains("Operating noise"));
        assert!(report.recommendations[0].contains("model"));
    }

    #[test]
    fn test_impact_recommendations_capped_at_three() {
        let store = sample();
        let report = analyze_gaps(&store, &ScoringConfig::default());

        let impact_lines: Vec<_> = report
            .recommendations
            .iter()
            .filter(|r| r.contains("downstream"))
            .collect();
        assert_eq!(impact_lines.len(), 3);
        // The widest-reaching unachieved KPI comes first.
        assert!(impact_lines[0].contains("Gear reduction ratio"));
    }

    #[test]
    fn test_no_kpis_means_full_coverage() {
        let store = GraphStore::with_data(vec![crate::graph::Node::goal("G", "G")], vec![]);
        let report = analyze_gaps(&store, &ScoringConfig::default());
        assert!(!report.has_gaps());
        assert_eq!(report.model.coverage_rate, 100.0);
        assert_eq!(report.model.priority, GapPriority::Low);
        assert!(report.recommendations.is_empty());
    }
}
