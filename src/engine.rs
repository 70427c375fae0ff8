//! The copilot engine
//!
//! One explicitly constructed object owning the whole pipeline: graph
//! snapshot, parser, scoring configuration and conversation context.
//! Hosts create as many engines as they need; nothing lives in module
//! state.

use crate::analytics::{Analytics, ScoringConfig};
use crate::context::ContextManager;
use crate::graph::{Dataset, GraphStore};
use crate::query::{QueryParser, Responder, Response};
use crate::report::ReportGenerator;
use tracing::{debug, info};

/// Query copilot over one requirements graph snapshot
pub struct Copilot {
    store: GraphStore,
    parser: QueryParser,
    config: ScoringConfig,
    context: ContextManager,
}

impl Copilot {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_config(dataset, ScoringConfig::default())
    }

    pub fn with_config(dataset: Dataset, config: ScoringConfig) -> Self {
        let (nodes, edges) = dataset.into_parts();
        Copilot {
            store: GraphStore::with_data(nodes, edges),
            parser: QueryParser::new(),
            config,
            context: ContextManager::new(),
        }
    }

    /// Swap in a fresh snapshot; the next query runs against it
    pub fn rebind(&mut self, dataset: Dataset) {
        let (nodes, edges) = dataset.into_parts();
        self.store.update_data(nodes, edges);
        info!(
            "Rebound snapshot: {} nodes, {} edges",
            self.store.node_count(),
            self.store.edge_count()
        );
    }

    /// One full round-trip: parse, resolve follow-up references, answer,
    /// remember.
    pub fn ask(&mut self, query: &str) -> Response {
        let parsed = self.parser.parse(query);
        let parsed = self.context.resolve_references(query, parsed);
        let response = Responder::new(&self.store, &self.config).generate(&parsed);
        self.context.record_query(query, &parsed, &response.nodes);

        debug!(
            "Answered {:?} with {} payload node(s)",
            parsed.intent,
            response.nodes.len()
        );
        response
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn parser(&self) -> &QueryParser {
        &self.parser
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn context(&self) -> &ContextManager {
        &self.context
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(&self.store, &self.config)
    }

    pub fn report(&self) -> ReportGenerator<'_> {
        ReportGenerator::new(&self.store, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, KpiLevel, KpiMetrics, Node, Relationship};

    #[test]
    fn test_ask_round_trip() {
        let mut copilot = Copilot::new(Dataset::sample());
        let response = copilot.ask("追溯 KPI_FoldTime 的链路");
        assert!(response.content.contains("Fold time"));
        assert_eq!(response.nodes.len(), 10);
        assert_eq!(copilot.context().history().len(), 1);
        assert_eq!(copilot.context().last_result_nodes().len(), 10);
    }

    #[test]
    fn test_follow_up_resolves_pronoun() {
        let mut copilot = Copilot::new(Dataset::sample());
        copilot.ask("追溯 KPI_FoldTime 的链路");
        let follow_up = copilot.ask("它会影响什么");
        assert!(follow_up.content.contains("Impact of changing Fold time"));
    }

    #[test]
    fn test_rebind_swaps_snapshot() {
        let mut copilot = Copilot::new(Dataset::sample());
        assert_eq!(copilot.store().node_count(), 15);

        let nodes = vec![
            Node::goal("G_Solo", "Single goal"),
            Node::kpi(
                "KPI_Solo",
                "Single KPI",
                KpiLevel::Top,
                KpiMetrics::new(true, 100.0),
            ),
        ];
        let edges = vec![Edge::new("E_1", "KPI_Solo", "G_Solo", Relationship::Satisfy)];
        copilot.rebind(Dataset::new(nodes, edges));

        assert_eq!(copilot.store().node_count(), 2);
        let response = copilot.ask("how many KPIs");
        assert!(response.content.contains("- KPI: 1"));
    }

    #[test]
    fn test_analytics_accessor() {
        let copilot = Copilot::new(Dataset::sample());
        let stats = copilot
            .analytics()
            .achievement_stats(&copilot.store().kpi_nodes());
        assert_eq!(stats.achieved, 2);
        assert_eq!(stats.total, 6);
    }

    #[test]
    fn test_report_accessor() {
        let copilot = Copilot::new(Dataset::sample());
        let md = copilot.report().to_markdown();
        assert!(md.contains("## Overview"));
    }
}
