//! Response generation
//!
//! Turns a parsed query into a displayable answer: markdown-ish text with
//! `**bold**` markers and emoji, plus the node/edge payload a host canvas
//! should light up. Stateless dispatch on intent, one handler per intent.
//! Handlers never fail; bad input degrades to a clarifying prompt or a
//! not-found message.

use crate::analytics::{Analytics, ScoringConfig};
use crate::graph::{
    Category, EdgeId, GraphStats, GraphStore, KpiLevel, ModelType, Node, NodeFilter, NodeId,
    Relationship,
};
use crate::query::parser::{EntityKind, ParsedQuery, QueryIntent};
use serde::Serialize;

/// What the host should do with the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseAction {
    /// Light up the payload nodes in place
    Highlight,
    /// Zoom the viewport onto the payload
    Focus,
    /// Animate the payload as a traced path
    Trace,
}

/// One answer: display text plus the subgraph it talks about
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub content: String,

    #[serde(default)]
    pub nodes: Vec<NodeId>,

    #[serde(default)]
    pub edges: Vec<EdgeId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ResponseAction>,
}

impl Response {
    /// Text-only answer with an empty payload
    pub fn text(content: impl Into<String>) -> Self {
        Response {
            content: content.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            action: None,
        }
    }
}

/// Stateless responder over one graph snapshot
pub struct Responder<'a> {
    store: &'a GraphStore,
    config: &'a ScoringConfig,
}

impl<'a> Responder<'a> {
    pub fn new(store: &'a GraphStore, config: &'a ScoringConfig) -> Self {
        Responder { store, config }
    }

    fn analytics(&self) -> Analytics<'a> {
        Analytics::new(self.store, self.config)
    }

    /// Dispatch on intent; always returns a usable response
    pub fn generate(&self, parsed: &ParsedQuery) -> Response {
        match parsed.intent {
            QueryIntent::QueryStats => self.respond_stats(parsed),
            QueryIntent::TraceChain => self.respond_chain(parsed),
            QueryIntent::AnalyzeImpact => self.respond_impact(parsed),
            QueryIntent::FindIssues => self.respond_issues(),
            QueryIntent::Suggest => self.respond_suggestions(),
            QueryIntent::CompareKpis => self.respond_comparison(parsed),
            QueryIntent::AnalyzeCorrelation => self.respond_correlations(parsed),
            QueryIntent::LevelHealth => self.respond_health(),
            QueryIntent::Prioritize => self.respond_priorities(),
            QueryIntent::ShowNodes => self.respond_nodes(parsed),
            QueryIntent::Unknown => self.respond_help(),
        }
    }

    fn respond_stats(&self, parsed: &ParsedQuery) -> Response {
        let ids = parsed.node_ids();
        if !ids.is_empty() {
            let (known, missing) = self.split_known(&ids);
            if known.is_empty() {
                return self.not_found(&missing);
            }
            let seeds: Vec<NodeId> = known.iter().map(|n| n.id.clone()).collect();
            let trace = self.analytics().trace_chain(&seeds);
            let resolved: Vec<&Node> = trace
                .nodes
                .iter()
                .filter_map(|id| self.store.node(id))
                .collect();
            let stats = self.store.stats(Some(&resolved));

            let mut content = format!(
                "📊 **Chain statistics for {}**\n\n{} node(s) in the chain:\n{}",
                label_list(&known),
                stats.total,
                render_stats_block(&stats)
            );
            append_missing_note(&mut content, &missing);

            return Response {
                content,
                nodes: trace.nodes,
                edges: trace.edges,
                action: Some(ResponseAction::Highlight),
            };
        }

        let (filter, filtered) = filter_from(parsed);
        if filtered {
            let matched = self.store.query_nodes(&filter);
            let stats = self.store.stats(Some(&matched));
            let seeds: Vec<NodeId> = matched.iter().map(|n| n.id.clone()).collect();
            let trace = self.analytics().trace_chain(&seeds);

            let content = format!(
                "📊 **Statistics for the current filter**\n\n{} matching node(s):\n{}",
                stats.total,
                render_stats_block(&stats)
            );
            return Response {
                content,
                nodes: trace.nodes,
                edges: trace.edges,
                action: Some(ResponseAction::Highlight),
            };
        }

        let stats = self.store.stats(None);
        let content = format!(
            "📊 **Graph statistics**\n\n{} node(s), {} edge(s):\n{}",
            stats.total,
            self.store.edge_count(),
            render_stats_block(&stats)
        );
        Response::text(content)
    }

    fn respond_chain(&self, parsed: &ParsedQuery) -> Response {
        let ids = parsed.node_ids();
        if ids.is_empty() {
            return Response::text(
                "🔍 Which node should I trace? Name an ID like **KPI_FoldTime** or a phrase like \"折叠时间\".",
            );
        }
        let (known, missing) = self.split_known(&ids);
        if known.is_empty() {
            return self.not_found(&missing);
        }

        let seeds: Vec<NodeId> = known.iter().map(|n| n.id.clone()).collect();
        let trace = self.analytics().trace_chain(&seeds);
        let mut content = format!(
            "🔗 **Traceability chain for {}**\n\n{} node(s), {} edge(s):\n\n{}",
            label_list(&known),
            trace.nodes.len(),
            trace.edges.len(),
            self.render_node_list(&trace.nodes)
        );
        append_missing_note(&mut content, &missing);

        Response {
            content,
            nodes: trace.nodes,
            edges: trace.edges,
            action: Some(ResponseAction::Trace),
        }
    }

    fn respond_impact(&self, parsed: &ParsedQuery) -> Response {
        let ids = parsed.node_ids();
        let Some(id) = ids.first() else {
            return Response::text(
                "🔍 Which node is changing? Name it (for example **D_MotorTorque**) and I will trace what it reaches.",
            );
        };
        let Some(node) = self.store.node(id) else {
            return self.not_found(std::slice::from_ref(id));
        };

        let downstream = self.analytics().trace_dependencies(id);
        let upstream = self.analytics().trace_impact(id);
        let affected: Vec<NodeId> = downstream
            .nodes
            .iter()
            .filter(|n| *n != id)
            .cloned()
            .collect();
        let feeders = upstream.nodes.len().saturating_sub(1);

        let content = if affected.is_empty() {
            format!(
                "⚠️ **Impact of changing {}**\n\nNothing downstream depends on it. Upstream, {} node(s) feed into it.",
                node.label, feeders
            )
        } else {
            format!(
                "⚠️ **Impact of changing {}**\n\nReaches {} downstream node(s):\n\n{}\nUpstream, {} node(s) feed into it.",
                node.label,
                affected.len(),
                self.render_node_list(&affected),
                feeders
            )
        };

        Response {
            content,
            nodes: downstream.nodes,
            edges: downstream.edges,
            action: Some(ResponseAction::Focus),
        }
    }

    fn respond_issues(&self) -> Response {
        let unachieved = self
            .store
            .query_nodes(&NodeFilter::new().category(Category::Kpi).achieved(false));
        if unachieved.is_empty() {
            return Response::text(
                "✅ **All KPIs achieved.** Every KPI in the current snapshot meets its target. No open issues.",
            );
        }

        let analytics = self.analytics();
        let mut assessed: Vec<(&Node, _)> = unachieved
            .iter()
            .map(|n| (*n, analytics.assess_risk(n)))
            .collect();
        assessed.sort_by(|a, b| b.1.score.cmp(&a.1.score));

        let mut content = format!("⚠️ **{} unachieved KPI(s)**\n\n", assessed.len());
        for (node, risk) in &assessed {
            let rate = node
                .metrics()
                .map(|m| m.achievement_rate)
                .unwrap_or_default();
            content.push_str(&format!(
                "- ❌ **{}** ({}): {:.1}% achieved, risk {}\n  {}\n",
                node.label,
                node.id,
                rate,
                risk.level.as_str(),
                risk.factors.join("; ")
            ));
        }

        let seeds: Vec<NodeId> = assessed.iter().map(|(n, _)| n.id.clone()).collect();
        let trace = self.analytics().trace_chain(&seeds);
        Response {
            content,
            nodes: trace.nodes,
            edges: trace.edges,
            action: Some(ResponseAction::Highlight),
        }
    }

    fn respond_suggestions(&self) -> Response {
        let gaps = self.analytics().analyze_gaps();
        if !gaps.has_gaps() {
            return Response::text(
                "✅ **Nothing to improve right now.** Model coverage, verification coverage and achievement are all complete.",
            );
        }

        let mut content = String::from("💡 **Suggestions**\n\n");
        content.push_str(&format!(
            "Coverage: models {:.1}% ({}), verification {:.1}% ({}), achievement {:.1}% ({}).\n\n",
            gaps.model.coverage_rate,
            gaps.model.priority.as_str(),
            gaps.verification.coverage_rate,
            gaps.verification.priority.as_str(),
            gaps.achievement.coverage_rate,
            gaps.achievement.priority.as_str(),
        ));
        for (i, recommendation) in gaps.recommendations.iter().enumerate() {
            content.push_str(&format!("{}. {}\n", i + 1, recommendation));
        }

        let mut seeds: Vec<NodeId> = Vec::new();
        for section in [&gaps.model, &gaps.verification, &gaps.achievement] {
            for id in &section.missing {
                if !seeds.contains(id) {
                    seeds.push(id.clone());
                }
            }
        }
        let trace = self.analytics().trace_chain(&seeds);
        Response {
            content,
            nodes: trace.nodes,
            edges: trace.edges,
            action: Some(ResponseAction::Highlight),
        }
    }

    fn respond_comparison(&self, parsed: &ParsedQuery) -> Response {
        let ids = parsed.node_ids();
        if ids.len() < 2 {
            return Response::text(
                "🔍 Give me two KPIs to compare, for example **对比 KPI_FoldTime 和 KPI_Noise**.",
            );
        }

        let Some(comparison) = self.analytics().compare_kpis(&ids[0], &ids[1]) else {
            for id in &ids[..2] {
                match self.store.node(id) {
                    None => return self.not_found(std::slice::from_ref(id)),
                    Some(node) if !node.is_kpi() => {
                        return Response::text(format!(
                            "📊 Comparison needs two KPI nodes, and **{}** is a {} node.",
                            id,
                            node.category().display_name()
                        ));
                    }
                    Some(_) => {}
                }
            }
            return Response::text("📊 Comparison needs two KPI nodes.");
        };

        let a = &comparison.first;
        let b = &comparison.second;
        let content = format!(
            "📊 **{} vs {}**\n\n- Achievement: {} {:.1}% vs {} {:.1}%\n- Level: {} vs {}\n- Model: {} vs {}\n- Connected designs: {} vs {}\n- Verification activities: {} vs {}\n\n{}",
            a.label,
            b.label,
            mark(a.achieved),
            a.achievement_rate,
            mark(b.achieved),
            b.achievement_rate,
            a.level.as_number(),
            b.level.as_number(),
            model_name(a.model_type),
            model_name(b.model_type),
            a.design_count,
            b.design_count,
            a.verify_count,
            b.verify_count,
            comparison.summary
        );

        let seeds = vec![a.id.clone(), b.id.clone()];
        let trace = self.analytics().trace_chain(&seeds);
        Response {
            content,
            nodes: trace.nodes,
            edges: trace.edges,
            action: Some(ResponseAction::Focus),
        }
    }

    fn respond_correlations(&self, parsed: &ParsedQuery) -> Response {
        let mut correlations = self.analytics().analyze_correlations();
        let ids = parsed.node_ids();
        if !ids.is_empty() {
            correlations.retain(|c| ids.iter().any(|id| c.first == *id || c.second == *id));
        }
        if correlations.is_empty() {
            return Response::text(
                "🔍 No correlated KPI pairs found. No two KPIs share a design parameter or verification activity.",
            );
        }

        let mut content = String::from("🔗 **KPI correlations**\n\n");
        let mut involved: Vec<NodeId> = Vec::new();
        for c in &correlations {
            content.push_str(&format!(
                "- **{}** and **{}**: {}, {} shared design(s), {} shared verification(s)\n  {}\n",
                self.label_of(&c.first),
                self.label_of(&c.second),
                c.strength.as_str(),
                c.shared_designs.len(),
                c.shared_verifies.len(),
                c.insight
            ));
            for id in [&c.first, &c.second]
                .into_iter()
                .chain(c.shared_designs.iter())
                .chain(c.shared_verifies.iter())
            {
                if !involved.contains(id) {
                    involved.push(id.clone());
                }
            }
        }

        let edges: Vec<EdgeId> = self
            .store
            .query_edges(&involved, None)
            .iter()
            .map(|e| e.id.clone())
            .collect();
        Response {
            content,
            nodes: involved,
            edges,
            action: Some(ResponseAction::Highlight),
        }
    }

    fn respond_health(&self) -> Response {
        let levels = self.analytics().analyze_level_health();
        if levels.is_empty() {
            return Response::text("🏥 No KPIs in the snapshot yet, so there is nothing to grade.");
        }

        let mut content = String::from("🏥 **KPI health by level**\n\n");
        for health in &levels {
            content.push_str(&format!(
                "**Level {}**: grade {} (score {:.1})\n- achievement {:.1}%\n- model coverage {:.1}%\n- verification coverage {:.1}%\n\n",
                health.level.as_number(),
                health.grade.as_str(),
                health.score,
                health.achievement_rate,
                health.model_coverage,
                health.verification_coverage
            ));
        }
        Response::text(content)
    }

    fn respond_priorities(&self) -> Response {
        let ranking = self.analytics().prioritize_nodes();
        if ranking.is_empty() {
            return Response::text(
                "✅ Nothing stands out. Every KPI scores zero on the attention scale.",
            );
        }

        let mut content = String::from("🎯 **Where to focus first**\n\n");
        for (i, entry) in ranking.iter().enumerate() {
            content.push_str(&format!(
                "{}. **{}** ({}), score {}\n   {}\n",
                i + 1,
                entry.label,
                entry.id,
                entry.score,
                entry.reasons.join("; ")
            ));
        }

        let seeds: Vec<NodeId> = ranking.iter().map(|e| e.id.clone()).collect();
        let trace = self.analytics().trace_chain(&seeds);
        Response {
            content,
            nodes: trace.nodes,
            edges: trace.edges,
            action: Some(ResponseAction::Highlight),
        }
    }

    fn respond_nodes(&self, parsed: &ParsedQuery) -> Response {
        let ids = parsed.node_ids();
        let matched: Vec<&Node> = if ids.is_empty() {
            let (filter, _) = filter_from(parsed);
            self.store.query_nodes(&filter)
        } else {
            let (known, missing) = self.split_known(&ids);
            if known.is_empty() {
                return self.not_found(&missing);
            }
            known
        };

        if matched.is_empty() {
            return Response::text("🔍 No nodes match that filter.");
        }

        let mut content = format!("📌 **{} node(s)**\n\n", matched.len());
        for category in [Category::Goal, Category::Kpi, Category::Design, Category::Verify] {
            let group: Vec<&&Node> = matched.iter().filter(|n| n.category() == category).collect();
            if group.is_empty() {
                continue;
            }
            content.push_str(&format!("**{}**\n", category.display_name()));
            for node in group {
                content.push_str(&self.render_node_line(node));
            }
            content.push('\n');
        }

        let seeds: Vec<NodeId> = matched.iter().map(|n| n.id.clone()).collect();
        let trace = self.analytics().trace_chain(&seeds);
        // An explicit relationship word narrows the edge payload to that
        // relationship around the matched nodes.
        let edges = match parsed
            .first_value(EntityKind::Relationship)
            .and_then(Relationship::parse)
        {
            Some(relationship) => self
                .store
                .query_edges(&seeds, Some(relationship))
                .iter()
                .map(|e| e.id.clone())
                .collect(),
            None => trace.edges,
        };

        Response {
            content,
            nodes: trace.nodes,
            edges,
            action: Some(ResponseAction::Highlight),
        }
    }

    fn respond_help(&self) -> Response {
        Response::text(
            "💡 **Try asking:**\n\n\
             - 统计 KPI 数量 / how many KPIs are there\n\
             - 追溯 KPI_FoldTime 的链路 / trace KPI_FoldTime\n\
             - 改 D_MotorTorque 会影响什么 / what does D_MotorTorque affect\n\
             - 有哪些未达成的指标 / show unachieved KPIs\n\
             - 对比折叠时间和噪音 / compare fold time vs noise\n\
             - 一级指标健康度 / how healthy are the level 1 KPIs\n\
             - 应该优先做什么 / what should we focus on\n\
             - 显示所有设计参数 / show all design parameters",
        )
    }

    fn split_known(&self, ids: &[NodeId]) -> (Vec<&'a Node>, Vec<NodeId>) {
        let mut known = Vec::new();
        let mut missing = Vec::new();
        for id in ids {
            match self.store.node(id) {
                Some(node) => known.push(node),
                None => missing.push(id.clone()),
            }
        }
        (known, missing)
    }

    fn not_found(&self, missing: &[NodeId]) -> Response {
        let list = missing
            .iter()
            .map(|id| format!("**{}**", id))
            .collect::<Vec<_>>()
            .join(", ");
        Response::text(format!(
            "🔍 I could not find {} in the current snapshot.",
            list
        ))
    }

    fn label_of(&self, id: &NodeId) -> String {
        match self.store.node(id) {
            Some(node) => node.label.clone(),
            None => id.to_string(),
        }
    }

    fn render_node_list(&self, ids: &[NodeId]) -> String {
        let mut out = String::new();
        for id in ids {
            match self.store.node(id) {
                Some(node) => out.push_str(&self.render_node_line(node)),
                None => out.push_str(&format!("- {} (not in snapshot)\n", id)),
            }
        }
        out
    }

    fn render_node_line(&self, node: &Node) -> String {
        match node.metrics() {
            Some(metrics) => format!(
                "- {} **{}** ({}): {:.1}%, {}\n",
                mark(metrics.achieved),
                node.label,
                node.id,
                metrics.achievement_rate,
                model_name(metrics.model_type)
            ),
            None => format!(
                "- [{}] **{}** ({})\n",
                node.category().display_name(),
                node.label,
                node.id
            ),
        }
    }
}

fn mark(achieved: bool) -> &'static str {
    if achieved {
        "✅"
    } else {
        "❌"
    }
}

fn model_name(model_type: Option<ModelType>) -> &'static str {
    match model_type {
        Some(mt) => mt.as_str(),
        None => "no model",
    }
}

fn label_list(nodes: &[&Node]) -> String {
    nodes
        .iter()
        .map(|n| n.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn append_missing_note(content: &mut String, missing: &[NodeId]) {
    if missing.is_empty() {
        return;
    }
    let list = missing
        .iter()
        .map(|id| format!("**{}**", id))
        .collect::<Vec<_>>()
        .join(", ");
    content.push_str(&format!("\nNot in the snapshot: {}\n", list));
}

fn render_stats_block(stats: &GraphStats) -> String {
    let mut out = format!(
        "- Goal: {}\n- KPI: {}\n- Design: {}\n- Verification: {}\n",
        stats.by_category.goal, stats.by_category.kpi, stats.by_category.design, stats.by_category.verify
    );
    let kpis = stats.by_status.achieved + stats.by_status.unachieved;
    if kpis > 0 {
        let rate = stats.by_status.achieved as f64 * 100.0 / kpis as f64;
        out.push_str(&format!(
            "\nKPI status: ✅ {} achieved / ❌ {} unachieved ({:.1}%)\nModels: {} with / {} without\n",
            stats.by_status.achieved,
            stats.by_status.unachieved,
            rate,
            stats.by_status.with_model,
            stats.by_status.without_model
        ));
    }
    out
}

/// Build a node filter from keyword entities; bool reports whether any
/// filter was actually set.
fn filter_from(parsed: &ParsedQuery) -> (NodeFilter, bool) {
    let mut filter = NodeFilter::new();
    let mut any = false;

    if let Some(value) = parsed.first_value(EntityKind::Category) {
        if let Some(category) = Category::parse(value) {
            filter = filter.category(category);
            any = true;
        }
    }
    if let Some(value) = parsed.first_value(EntityKind::Status) {
        filter = filter.achieved(value == "achieved");
        any = true;
    }
    if let Some(value) = parsed.first_value(EntityKind::ModelType) {
        if value == "none" {
            filter = filter.has_model(false);
        } else if let Some(model_type) = ModelType::parse(value) {
            filter = filter.model_type(model_type);
        }
        any = true;
    }
    if let Some(value) = parsed.first_value(EntityKind::Level) {
        if let Some(level) = KpiLevel::parse(value) {
            filter = filter.level(level);
            any = true;
        }
    }

    (filter, any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Dataset;
    use crate::query::parser::QueryParser;

    fn fixture() -> (GraphStore, ScoringConfig) {
        let (nodes, edges) = Dataset::sample().into_parts();
        (GraphStore::with_data(nodes, edges), ScoringConfig::default())
    }

    fn ask(store: &GraphStore, config: &ScoringConfig, query: &str) -> Response {
        let parsed = QueryParser::new().parse(query);
        Responder::new(store, config).generate(&parsed)
    }

    #[test]
    fn test_stats_whole_graph() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "统计所有节点数量");
        assert!(response.content.contains("📊"));
        assert!(response.content.contains("- KPI: 6"));
        assert!(response.content.contains("✅ 2 achieved"));
        assert!(response.content.contains("33.3%"));
    }

    #[test]
    fn test_stats_over_chain() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "统计 KPI_FoldTime 的链路");
        assert!(response.content.contains("Chain statistics"));
        // The fold-time component holds 10 of the 15 nodes.
        assert_eq!(response.nodes.len(), 10);
        assert_eq!(response.action, Some(ResponseAction::Highlight));
    }

    #[test]
    fn test_chain_via_alias() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "追溯折叠时间");
        assert!(response.content.contains("🔗"));
        assert!(response.content.contains("Fold time"));
        assert_eq!(response.nodes.len(), 10);
        assert_eq!(response.edges.len(), 12);
        assert_eq!(response.action, Some(ResponseAction::Trace));
    }

    #[test]
    fn test_chain_without_entity_asks_back() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "追溯链路");
        assert!(response.content.contains("Which node"));
        assert!(response.nodes.is_empty());
        assert!(response.action.is_none());
    }

    #[test]
    fn test_chain_unknown_id() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "trace KPI_Bogus");
        assert!(response.content.contains("could not find"));
        assert!(response.content.contains("KPI_Bogus"));
        assert!(response.nodes.is_empty());
    }

    #[test]
    fn test_impact_downstream() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "改 D_MotorTorque 会影响什么");
        assert!(response.content.contains("Impact of changing Motor torque"));
        assert!(response.content.contains("3 downstream"));
        assert_eq!(response.nodes.len(), 4);
        assert_eq!(response.action, Some(ResponseAction::Focus));
    }

    #[test]
    fn test_issues_ranked_by_risk() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "有哪些未达成的指标");
        assert!(response.content.contains("4 unachieved"));
        // Highest risk first.
        let gear = response.content.find("Gear reduction ratio").unwrap();
        let noise = response.content.find("Operating noise").unwrap();
        assert!(gear < noise);
        assert_eq!(response.action, Some(ResponseAction::Highlight));
    }

    #[test]
    fn test_issues_all_achieved() {
        let nodes = vec![
            Node::kpi(
                "KPI_Only",
                "Only KPI",
                crate::graph::KpiLevel::Top,
                crate::graph::KpiMetrics::new(true, 100.0),
            ),
        ];
        let store = GraphStore::with_data(nodes, Vec::new());
        let config = ScoringConfig::default();
        let response = ask(&store, &config, "show issues");
        assert!(response.content.contains("All KPIs achieved"));
        assert!(response.nodes.is_empty());
    }

    #[test]
    fn test_suggestions_list_recommendations() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "给点建议");
        assert!(response.content.contains("💡"));
        assert!(response.content.contains("1. "));
        assert!(response.content.contains("Operating noise"));
    }

    #[test]
    fn test_comparison() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "对比 KPI_FoldTime 和 KPI_Noise");
        assert!(response.content.contains("Fold time vs Operating noise"));
        assert!(response.content.contains("92.0% vs"));
        assert!(response.content.contains("Operating noise leads on achievement"));
        assert_eq!(response.action, Some(ResponseAction::Focus));
    }

    #[test]
    fn test_comparison_needs_two_ids() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "对比 KPI_FoldTime");
        assert!(response.content.contains("two KPIs"));
    }

    #[test]
    fn test_comparison_rejects_non_kpi() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "compare KPI_FoldTime vs D_MotorTorque");
        assert!(response.content.contains("D_MotorTorque"));
        assert!(response.content.contains("Design"));
    }

    #[test]
    fn test_correlations() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "指标之间的关联");
        assert!(response.content.contains("strong"));
        assert!(response.content.contains("Fold time"));
        assert!(response.content.contains("Motor speed"));
    }

    #[test]
    fn test_health_grades() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "指标健康度");
        assert!(response.content.contains("🏥"));
        assert!(response.content.contains("Level 1"));
        assert!(response.content.contains("Level 2"));
        assert!(response.content.contains("grade F"));
    }

    #[test]
    fn test_priorities_order() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "应该优先做什么");
        assert!(response.content.contains("🎯"));
        assert!(response.content.starts_with("🎯"));
        let first = response.content.find("Gear reduction ratio").unwrap();
        let second = response.content.find("Operating noise").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_show_nodes_filtered() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "显示已达成的指标");
        assert!(response.content.contains("2 node(s)"));
        assert!(response.content.contains("**KPI**"));
        assert!(response.content.contains("Fold time"));
        assert!(response.content.contains("Motor speed"));
        assert!(!response.content.contains("Operating noise"));
    }

    #[test]
    fn test_show_nodes_relationship_restricts_edges() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "显示验证关系");
        // Category filter picks the verification activities, relationship
        // entity narrows the edges to verify arcs around them.
        assert_eq!(response.edges.len(), 4);
    }

    #[test]
    fn test_unknown_gets_help() {
        let (store, config) = fixture();
        let response = ask(&store, &config, "下午好");
        assert!(response.content.contains("💡"));
        assert!(response.content.contains("追溯 KPI_FoldTime 的链路"));
        assert!(response.nodes.is_empty());
        assert!(response.action.is_none());
    }
}
