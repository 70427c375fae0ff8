//! Per-level health scoring for the KPI hierarchy

use super::config::ScoringConfig;
use crate::graph::{Category, Direction, GraphStore, KpiLevel, Node};
use serde::Serialize;

/// Letter grade on the usual 90/80/70/60 boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthGrade {
    A,
    B,
    C,
    D,
    F,
}

impl HealthGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            HealthGrade::A
        } else if score >= 80.0 {
            HealthGrade::B
        } else if score >= 70.0 {
            HealthGrade::C
        } else if score >= 60.0 {
            HealthGrade::D
        } else {
            HealthGrade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthGrade::A => "A",
            HealthGrade::B => "B",
            HealthGrade::C => "C",
            HealthGrade::D => "D",
            HealthGrade::F => "F",
        }
    }
}

/// Health summary for one KPI level
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelHealth {
    pub level: KpiLevel,
    pub kpi_count: usize,

    /// Percent of the level's KPIs that are achieved
    pub achievement_rate: f64,

    /// Percent backed by a model
    pub model_coverage: f64,

    /// Percent with at least one connected verification activity
    pub verification_coverage: f64,

    /// Weighted blend of the three rates, 0..=100
    pub score: f64,

    pub grade: HealthGrade,
}

/// Health per level, top level first; levels without KPIs are omitted
pub fn analyze_level_health(store: &GraphStore, config: &ScoringConfig) -> Vec<LevelHealth> {
    [KpiLevel::Top, KpiLevel::Sub]
        .into_iter()
        .filter_map(|level| {
            let kpis: Vec<&Node> = store
                .kpi_nodes()
                .into_iter()
                .filter(|k| k.level() == Some(level))
                .collect();
            if kpis.is_empty() {
                return None;
            }

            let total = kpis.len() as f64;
            let achieved = kpis
                .iter()
                .filter(|k| k.metrics().map_or(false, |m| m.achieved))
                .count() as f64;
            let modeled = kpis
                .iter()
                .filter(|k| k.metrics().map_or(false, |m| m.has_model()))
                .count() as f64;
            let verified = kpis
                .iter()
                .filter(|k| {
                    store
                        .connected_nodes(&k.id, Direction::Both)
                        .iter()
                        .any(|n| n.category() == Category::Verify)
                })
                .count() as f64;

            let achievement_rate = achieved / total * 100.0;
            let model_coverage = modeled / total * 100.0;
            let verification_coverage = verified / total * 100.0;
            let score = config.health.achievement * achievement_rate
                + config.health.model * model_coverage
                + config.health.verification * verification_coverage;

            Some(LevelHealth {
                level,
                kpi_count: kpis.len(),
                achievement_rate,
                model_coverage,
                verification_coverage,
                score,
                grade: HealthGrade::from_score(score),
            })
        })
        .collect()
}
