use reqpilot::{EntityKind, QueryIntent, QueryParser};

#[test]
fn test_parse_is_deterministic() {
    let parser = QueryParser::new();
    let queries = [
        "统计 KPI_FoldTime 的链路",
        "show unachieved KPIs",
        "对比折叠时间和噪音",
        "它会影响什么",
        "random text with no meaning",
    ];
    for query in queries {
        assert_eq!(parser.parse(query), parser.parse(query));
    }
}

#[test]
fn test_rule_order_is_stable() {
    let parser = QueryParser::new();

    // Stats outranks chain even when both keyword sets fire.
    assert_eq!(
        parser.parse("统计 KPI_FoldTime 的链路").intent,
        QueryIntent::QueryStats
    );
    // Chain outranks impact.
    assert_eq!(parser.parse("追溯影响范围").intent, QueryIntent::TraceChain);
    // Issues outranks plain display.
    assert_eq!(parser.parse("显示问题清单").intent, QueryIntent::FindIssues);
    // Compare outranks correlation.
    assert_eq!(
        parser.parse("对比两个相关指标").intent,
        QueryIntent::CompareKpis
    );
}

#[test]
fn test_intent_confidences() {
    let parser = QueryParser::new();
    let expectations: &[(&str, QueryIntent, f32)] = &[
        ("多少个节点", QueryIntent::QueryStats, 0.9),
        ("trace the chain", QueryIntent::TraceChain, 0.9),
        ("what does this affect", QueryIntent::AnalyzeImpact, 0.85),
        ("any problems", QueryIntent::FindIssues, 0.85),
        ("建议一下", QueryIntent::Suggest, 0.8),
        ("比较一下", QueryIntent::CompareKpis, 0.85),
        ("相关性分析", QueryIntent::AnalyzeCorrelation, 0.8),
        ("overall health", QueryIntent::LevelHealth, 0.8),
        ("重点在哪", QueryIntent::Prioritize, 0.8),
        ("list everything", QueryIntent::ShowNodes, 0.7),
        ("早上好", QueryIntent::Unknown, 0.5),
    ];
    for (query, intent, confidence) in expectations {
        let parsed = parser.parse(query);
        assert_eq!(parsed.intent, *intent, "query: {}", query);
        assert_eq!(parsed.confidence, *confidence, "query: {}", query);
    }
}

#[test]
fn test_entity_confidence_tiers() {
    let parser = QueryParser::new();

    let by_id = parser.parse("trace KPI_FoldTime");
    assert_eq!(by_id.entities[0].kind, EntityKind::NodeId);
    assert_eq!(by_id.entities[0].confidence, 0.95);

    let by_alias = parser.parse("追溯折叠时间");
    assert_eq!(by_alias.entities[0].kind, EntityKind::NodeId);
    assert_eq!(by_alias.entities[0].confidence, 0.9);

    let by_keyword = parser.parse("显示一级指标");
    let level = by_keyword
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Level)
        .unwrap();
    assert_eq!(level.confidence, 0.8);
}

#[test]
fn test_mixed_language_query() {
    let parser = QueryParser::new();
    let parsed = parser.parse("show 未达成的 level 1 KPIs");
    assert_eq!(parsed.intent, QueryIntent::FindIssues);
    assert_eq!(parsed.first_value(EntityKind::Status), Some("unachieved"));
    assert_eq!(parsed.first_value(EntityKind::Level), Some("1"));
    assert_eq!(parsed.first_value(EntityKind::Category), Some("kpi"));
}

#[test]
fn test_multiple_ids_kept_in_order() {
    let parser = QueryParser::new();
    let parsed = parser.parse("KPI_Noise 和 KPI_FoldTime 的关联");
    let ids = parsed.node_ids();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].as_str(), "KPI_Noise");
    assert_eq!(ids[1].as_str(), "KPI_FoldTime");
}

#[test]
fn test_unknown_still_extracts_entities() {
    let parser = QueryParser::new();
    let parsed = parser.parse("KPI_FoldTime?");
    assert_eq!(parsed.intent, QueryIntent::Unknown);
    assert_eq!(parsed.confidence, 0.5);
    assert_eq!(parsed.node_ids().len(), 1);
}
