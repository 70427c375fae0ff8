//! Conversation context across queries
//!
//! Keeps a capped history of what was asked and what came back, and
//! resolves anaphoric follow-ups ("它的影响呢" / "trace them") by
//! injecting the previous result's node IDs into the parsed query.

use crate::graph::NodeId;
use crate::query::{Entity, EntityKind, ParsedQuery, QueryIntent};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

const HISTORY_CAP: usize = 50;

/// Confidence attached to node IDs carried over from the previous result
const REFERENCE_CONFIDENCE: f32 = 0.7;

/// One remembered exchange
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    pub intent: QueryIntent,
    pub result_nodes: Vec<NodeId>,
    pub asked_at: DateTime<Utc>,
}

/// Rolling conversation state
#[derive(Debug, Default)]
pub struct ContextManager {
    history: VecDeque<HistoryEntry>,
}

impl ContextManager {
    pub fn new() -> Self {
        ContextManager {
            history: VecDeque::new(),
        }
    }

    /// Inject the previous result's node IDs when the query points back at
    /// it with a pronoun and extracted no node ID of its own.
    pub fn resolve_references(&self, query: &str, mut parsed: ParsedQuery) -> ParsedQuery {
        if parsed.has_entity(EntityKind::NodeId) {
            return parsed;
        }
        if !has_anaphor(&query.to_lowercase()) {
            return parsed;
        }
        let previous = self.last_result_nodes();
        if previous.is_empty() {
            return parsed;
        }

        debug!(
            "Resolved pronoun to {} node(s) from the previous result",
            previous.len()
        );
        for id in previous {
            parsed
                .entities
                .push(Entity::new(EntityKind::NodeId, id.as_str(), REFERENCE_CONFIDENCE));
        }
        parsed
    }

    /// Append one exchange; the oldest entry falls off past the cap
    pub fn record_query(&mut self, query: &str, parsed: &ParsedQuery, result_nodes: &[NodeId]) {
        self.history.push_back(HistoryEntry {
            query: query.to_string(),
            intent: parsed.intent,
            result_nodes: result_nodes.to_vec(),
            asked_at: Utc::now(),
        });
        if self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    /// Node IDs of the most recent result, empty before the first query
    pub fn last_result_nodes(&self) -> &[NodeId] {
        self.history
            .back()
            .map(|entry| entry.result_nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Most frequent intent so far; earliest one wins a tie
    pub fn preferred_intent(&self) -> Option<QueryIntent> {
        let mut best: Option<(QueryIntent, usize)> = None;
        for entry in &self.history {
            let count = self
                .history
                .iter()
                .filter(|e| e.intent == entry.intent)
                .count();
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((entry.intent, count)),
            }
        }
        best.map(|(intent, _)| intent)
    }

    /// Up to `n` query texts, most recent first
    pub fn recent_queries(&self, n: usize) -> Vec<&str> {
        self.history
            .iter()
            .rev()
            .take(n)
            .map(|entry| entry.query.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

// CJK pronouns match as substrings; ASCII ones must match whole tokens,
// otherwise "with" and "items" would read as "it".
fn has_anaphor(normalized: &str) -> bool {
    const CJK: &[&str] = &["它们", "它", "这个", "那个"];
    const ASCII: &[&str] = &["it", "them", "that", "those"];

    if CJK.iter().any(|p| normalized.contains(p)) {
        return true;
    }
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| ASCII.contains(&token))
}
