//! Free-text query parsing
//!
//! Maps a raw query string (Chinese, English, or mixed) to a structured
//! intent plus extracted entities. Classification is an ordered rule
//! cascade: the first rule whose keyword set hits wins, and each rule
//! carries a fixed confidence. This is deliberately not a statistical
//! classifier; determinism matters more than cleverness here.
//!
//! ## Example queries
//!
//! - "统计 KPI 数量" / "how many KPIs are there"
//! - "追溯 KPI_FoldTime 的链路" / "trace KPI_FoldTime"
//! - "对比折叠时间和噪音" / "compare fold time vs noise"
//! - "有哪些未达成的指标" / "show unachieved KPIs"

use crate::graph::NodeId;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Query intent classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Counting and aggregate questions
    QueryStats,
    /// Full traceability chain around named nodes
    TraceChain,
    /// What is affected around a changed node
    AnalyzeImpact,
    /// Unachieved KPIs and their risks
    FindIssues,
    /// Improvement recommendations
    Suggest,
    /// Two KPIs side by side
    CompareKpis,
    /// KPIs coupled through shared designs
    AnalyzeCorrelation,
    /// Per-level health grades
    LevelHealth,
    /// What to work on first
    Prioritize,
    /// Plain node listing/filtering
    ShowNodes,
    /// Fallback
    Unknown,
}

/// What kind of thing an extracted entity names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    NodeId,
    Category,
    Status,
    ModelType,
    Level,
    Relationship,
}

/// One extracted entity; `value` is the canonical string form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub value: String,
    pub confidence: f32,
}

impl Entity {
    pub fn new(kind: EntityKind, value: impl Into<String>, confidence: f32) -> Self {
        Entity {
            kind,
            value: value.into(),
            confidence,
        }
    }
}

/// Parsed form of one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Original query text, trimmed
    pub raw_query: String,

    pub intent: QueryIntent,

    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Intent confidence in [0.0, 1.0]
    pub confidence: f32,
}

impl ParsedQuery {
    /// All node IDs named in the query, in extraction order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::NodeId)
            .map(|e| NodeId::new(e.value.clone()))
            .collect()
    }

    pub fn first_value(&self, kind: EntityKind) -> Option<&str> {
        self.entities
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.value.as_str())
    }

    pub fn has_entity(&self, kind: EntityKind) -> bool {
        self.entities.iter().any(|e| e.kind == kind)
    }
}

struct IntentRule {
    intent: QueryIntent,
    keywords: &'static [&'static str],
    confidence: f32,
}

/// Intent rules in priority order; earlier rules shadow later ones, so a
/// query naming both stats-words and chain-words counts as a stats query.
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: QueryIntent::QueryStats,
        keywords: &["统计", "多少", "几个", "数量", "stat", "count", "how many"],
        confidence: 0.9,
    },
    IntentRule {
        intent: QueryIntent::TraceChain,
        keywords: &["链路", "链条", "追溯", "trace", "chain"],
        confidence: 0.9,
    },
    IntentRule {
        intent: QueryIntent::AnalyzeImpact,
        keywords: &["影响", "impact", "affect"],
        confidence: 0.85,
    },
    IntentRule {
        intent: QueryIntent::FindIssues,
        keywords: &["未达成", "问题", "风险", "issue", "problem", "risk", "unachieved"],
        confidence: 0.85,
    },
    IntentRule {
        intent: QueryIntent::Suggest,
        keywords: &["建议", "改进", "优化", "suggest", "recommend", "improve"],
        confidence: 0.8,
    },
    IntentRule {
        intent: QueryIntent::CompareKpis,
        keywords: &["对比", "比较", "compare", "versus", " vs ", "vs."],
        confidence: 0.85,
    },
    IntentRule {
        intent: QueryIntent::AnalyzeCorrelation,
        keywords: &["关联", "相关", "correlat", "related"],
        confidence: 0.8,
    },
    IntentRule {
        intent: QueryIntent::LevelHealth,
        keywords: &["健康", "health", "状态如何"],
        confidence: 0.8,
    },
    IntentRule {
        intent: QueryIntent::Prioritize,
        keywords: &["优先", "重点", "priorit", "focus on"],
        confidence: 0.8,
    },
    IntentRule {
        intent: QueryIntent::ShowNodes,
        keywords: &["显示", "展示", "查看", "show", "display", "list", "view"],
        confidence: 0.7,
    },
];

const FALLBACK_CONFIDENCE: f32 = 0.5;
const NODE_ID_CONFIDENCE: f32 = 0.95;
const ALIAS_CONFIDENCE: f32 = 0.9;
const KEYWORD_CONFIDENCE: f32 = 0.8;

/// Domain phrases mapping to canonical node IDs
const ALIASES: &[(&str, &str)] = &[
    ("折叠时间", "KPI_FoldTime"),
    ("fold time", "KPI_FoldTime"),
    ("噪音", "KPI_Noise"),
    ("噪声", "KPI_Noise"),
    ("noise", "KPI_Noise"),
    ("循环寿命", "KPI_CycleLife"),
    ("cycle life", "KPI_CycleLife"),
    ("电机转速", "KPI_MotorSpeed"),
    ("motor speed", "KPI_MotorSpeed"),
    ("传动比", "KPI_GearRatio"),
    ("gear ratio", "KPI_GearRatio"),
    ("铰链磨损", "KPI_HingeWear"),
    ("hinge wear", "KPI_HingeWear"),
];

/// Free-text query parser; pure and deterministic, never fails
pub struct QueryParser {
    node_id_pattern: Regex,
}

impl QueryParser {
    pub fn new() -> Self {
        QueryParser {
            // ID grammar is an uppercase prefix with a mixed-case tail
            // (KPI_FoldTime). Scanned over the whole string because CJK
            // queries carry no whitespace around IDs.
            node_id_pattern: Regex::new(r"(KPI_|D_|V_|G_)[A-Za-z0-9_]*").unwrap(),
        }
    }

    /// Parse one query; identical input always yields identical output
    pub fn parse(&self, query: &str) -> ParsedQuery {
        let raw = query.trim();
        let normalized = raw.to_lowercase();

        let (intent, confidence) = classify_intent(&normalized);
        let entities = self.extract_entities(raw, &normalized);

        debug!(
            "Classified {:?} (confidence {:.2}) with {} entities",
            intent,
            confidence,
            entities.len()
        );

        ParsedQuery {
            raw_query: raw.to_string(),
            intent,
            entities,
            confidence,
        }
    }

    /// All extractors run; entities accumulate across kinds
    fn extract_entities(&self, raw: &str, normalized: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut seen_ids: FxHashSet<String> = FxHashSet::default();

        // IDs match case-sensitively against the raw text; the alias pass
        // then fills in nodes named by phrase rather than ID.
        for m in self.node_id_pattern.find_iter(raw) {
            if seen_ids.insert(m.as_str().to_string()) {
                entities.push(Entity::new(EntityKind::NodeId, m.as_str(), NODE_ID_CONFIDENCE));
            }
        }

        for (phrase, id) in ALIASES {
            if normalized.contains(phrase) && seen_ids.insert((*id).to_string()) {
                entities.push(Entity::new(EntityKind::NodeId, *id, ALIAS_CONFIDENCE));
            }
        }

        if let Some(status) = extract_status(normalized) {
            entities.push(Entity::new(EntityKind::Status, status, KEYWORD_CONFIDENCE));
        }
        if let Some(model_type) = extract_model_type(normalized) {
            entities.push(Entity::new(EntityKind::ModelType, model_type, KEYWORD_CONFIDENCE));
        }
        if let Some(level) = extract_level(normalized) {
            entities.push(Entity::new(EntityKind::Level, level, KEYWORD_CONFIDENCE));
        }
        if let Some(category) = extract_category(normalized) {
            entities.push(Entity::new(EntityKind::Category, category, KEYWORD_CONFIDENCE));
        }
        if let Some(relationship) = extract_relationship(normalized) {
            entities.push(Entity::new(
                EntityKind::Relationship,
                relationship,
                KEYWORD_CONFIDENCE,
            ));
        }

        entities
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_intent(normalized: &str) -> (QueryIntent, f32) {
    for rule in INTENT_RULES {
        if rule.keywords.iter().any(|kw| normalized.contains(kw)) {
            return (rule.intent, rule.confidence);
        }
    }
    (QueryIntent::Unknown, FALLBACK_CONFIDENCE)
}

// The unachieved set is checked first: "未达成" and "not achieved" contain
// the achieved keywords as substrings.
fn extract_status(normalized: &str) -> Option<&'static str> {
    const UNACHIEVED: &[&str] = &["未达成", "没达成", "not achieved", "unachieved"];
    const ACHIEVED: &[&str] = &["已达成", "达成", "achieved", "完成"];

    if UNACHIEVED.iter().any(|kw| normalized.contains(kw)) {
        Some("unachieved")
    } else if ACHIEVED.iter().any(|kw| normalized.contains(kw)) {
        Some("achieved")
    } else {
        None
    }
}

fn extract_model_type(normalized: &str) -> Option<&'static str> {
    const SETS: &[(&str, &[&str])] = &[
        ("sysml", &["sysml"]),
        ("simulink", &["simulink"]),
        ("modelica", &["modelica"]),
        ("fmu", &["fmu"]),
        ("none", &["无模型", "没有模型", "no model", "without model", "unmodeled"]),
    ];

    for (value, keywords) in SETS {
        if keywords.iter().any(|kw| normalized.contains(kw)) {
            return Some(value);
        }
    }
    None
}

fn extract_level(normalized: &str) -> Option<&'static str> {
    if normalized.contains("一级") || normalized.contains("level 1") || normalized.contains("level-1")
    {
        Some("1")
    } else if normalized.contains("二级")
        || normalized.contains("level 2")
        || normalized.contains("level-2")
    {
        Some("2")
    } else {
        None
    }
}

// Single-match on purpose: handlers expect at most one category filter, so
// a query naming two categories yields only the first branch.
fn extract_category(normalized: &str) -> Option<&'static str> {
    if normalized.contains("目标") || normalized.contains("goal") {
        Some("goal")
    } else if normalized.contains("指标") || normalized.contains("kpi") {
        Some("kpi")
    } else if normalized.contains("设计") || normalized.contains("design") {
        Some("design")
    } else if normalized.contains("验证") || normalized.contains("verif") {
        Some("verify")
    } else {
        None
    }
}

fn extract_relationship(normalized: &str) -> Option<&'static str> {
    if normalized.contains("满足") || normalized.contains("satisf") {
        Some("satisfy")
    } else if normalized.contains("实现") || normalized.contains("implement") {
        Some("implement")
    } else if normalized.contains("验证") || normalized.contains("verif") {
        Some("verify")
    } else {
        None
    }
}
