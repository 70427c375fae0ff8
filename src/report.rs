//! Program-level report assembly
//!
//! Bundles the analytics results into one artifact for export: Markdown
//! for humans, JSON for hosts. Rendering pulls labels from the store so
//! the report reads in domain terms, not IDs.

use crate::analytics::{
    AchievementStats, Analytics, GapReport, GapSection, KpiCorrelation, LevelHealth,
    NodePriority, ScoringConfig,
};
use crate::graph::{GraphStats, GraphStore, NodeId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Report generation errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization error
    #[error("Report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Everything one report run computed, ready to serialize
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramReport {
    pub generated_at: DateTime<Utc>,
    pub stats: GraphStats,
    pub achievement: AchievementStats,
    pub health: Vec<LevelHealth>,
    pub gaps: GapReport,
    pub priorities: Vec<NodePriority>,
    pub correlations: Vec<KpiCorrelation>,
}

/// Assembles reports over one snapshot
pub struct ReportGenerator<'a> {
    store: &'a GraphStore,
    config: &'a ScoringConfig,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(store: &'a GraphStore, config: &'a ScoringConfig) -> Self {
        ReportGenerator { store, config }
    }

    /// Run every analysis once and collect the results
    pub fn assemble(&self) -> ProgramReport {
        let analytics = Analytics::new(self.store, self.config);
        ProgramReport {
            generated_at: Utc::now(),
            stats: self.store.stats(None),
            achievement: analytics.achievement_stats(&self.store.kpi_nodes()),
            health: analytics.analyze_level_health(),
            gaps: analytics.analyze_gaps(),
            priorities: analytics.prioritize_nodes(),
            correlations: analytics.analyze_correlations(),
        }
    }

    pub fn to_json(&self) -> ReportResult<serde_json::Value> {
        Ok(serde_json::to_value(self.assemble())?)
    }

    pub fn to_markdown(&self) -> String {
        let report = self.assemble();
        let mut md = String::new();

        md.push_str("# Requirements traceability report\n\n");
        md.push_str(&format!(
            "Generated {}\n\n",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        md.push_str("## Overview\n\n");
        md.push_str(&format!(
            "- Nodes: {} ({} goals, {} KPIs, {} design parameters, {} verification activities)\n",
            report.stats.total,
            report.stats.by_category.goal,
            report.stats.by_category.kpi,
            report.stats.by_category.design,
            report.stats.by_category.verify
        ));
        md.push_str(&format!("- Edges: {}\n", self.store.edge_count()));
        md.push_str(&format!(
            "- KPI achievement: {} of {} ({}%)\n\n",
            report.achievement.achieved,
            report.achievement.total,
            report.achievement.rate_display()
        ));

        md.push_str("## Health by level\n\n");
        if report.health.is_empty() {
            md.push_str("No KPIs to grade.\n\n");
        } else {
            md.push_str("| Level | KPIs | Achievement | Models | Verification | Score | Grade |\n");
            md.push_str("|-------|------|-------------|--------|--------------|-------|-------|\n");
            for health in &report.health {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {:.1}% | {:.1}% | {:.1} | {} |\n",
                    health.level.as_number(),
                    health.kpi_count,
                    health.achievement_rate,
                    health.model_coverage,
                    health.verification_coverage,
                    health.score,
                    health.grade.as_str()
                ));
            }
            md.push('\n');
        }

        md.push_str("## Coverage gaps\n\n");
        if !report.gaps.has_gaps() {
            md.push_str("No coverage gaps.\n\n");
        } else {
            self.push_gap_line(&mut md, "Models", &report.gaps.model);
            self.push_gap_line(&mut md, "Verification", &report.gaps.verification);
            self.push_gap_line(&mut md, "Achievement", &report.gaps.achievement);
            md.push('\n');

            if !report.gaps.recommendations.is_empty() {
                md.push_str("### Recommendations\n\n");
                for (i, recommendation) in report.gaps.recommendations.iter().enumerate() {
                    md.push_str(&format!("{}. {}\n", i + 1, recommendation));
                }
                md.push('\n');
            }
        }

        md.push_str("## Priorities\n\n");
        if report.priorities.is_empty() {
            md.push_str("Nothing needs attention.\n\n");
        } else {
            for (i, entry) in report.priorities.iter().enumerate() {
                md.push_str(&format!(
                    "{}. **{}** ({}), score {}: {}\n",
                    i + 1,
                    entry.label,
                    entry.id,
                    entry.score,
                    entry.reasons.join("; ")
                ));
            }
            md.push('\n');
        }

        md.push_str("## KPI correlations\n\n");
        if report.correlations.is_empty() {
            md.push_str("No correlated KPI pairs.\n");
        } else {
            for c in &report.correlations {
                md.push_str(&format!(
                    "- **{}** and **{}**: {} ({} shared design(s), {} shared verification(s))\n",
                    self.label_of(&c.first),
                    self.label_of(&c.second),
                    c.strength.as_str(),
                    c.shared_designs.len(),
                    c.shared_verifies.len()
                ));
            }
        }

        md
    }

    fn push_gap_line(&self, md: &mut String, title: &str, section: &GapSection) {
        if section.missing.is_empty() {
            md.push_str(&format!("- {}: {:.1}% covered, no gaps\n", title, section.coverage_rate));
            return;
        }
        let missing = section
            .missing
            .iter()
            .map(|id| self.label_of(id))
            .collect::<Vec<_>>()
            .join(", ");
        md.push_str(&format!(
            "- {}: {:.1}% covered ({} priority); missing: {}\n",
            title,
            section.coverage_rate,
            section.priority.as_str(),
            missing
        ));
    }

    fn label_of(&self, id: &NodeId) -> String {
        match self.store.node(id) {
            Some(node) => node.label.clone(),
            None => id.to_string(),
        }
    }
}
