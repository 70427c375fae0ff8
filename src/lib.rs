//! ReqPilot
//!
//! A query copilot over an in-memory requirements traceability graph.
//! The graph links program goals to KPIs, KPIs to the design parameters
//! that implement them, and verification activities back to the KPIs they
//! confirm. On top of that snapshot the crate answers free-text questions
//! (Chinese, English, or mixed) about statistics, traceability chains,
//! change impact, open issues, comparisons, correlations, health and
//! priorities, and renders program reports.
//!
//! # Architecture
//!
//! - `graph` — typed nodes/edges, snapshot store, JSON dataset boundary
//! - `query` — intent classification, entity extraction, response
//!   generation
//! - `analytics` — traversal closures, comparison, correlation, gaps,
//!   health and priority/risk scoring
//! - `context` — conversation history and pronoun resolution
//! - `report` — Markdown/JSON program reports
//! - `engine` — the `Copilot` object wiring it all together
//!
//! ## Example Usage
//!
//! ```rust
//! use reqpilot::{Copilot, Dataset};
//!
//! let mut copilot = Copilot::new(Dataset::sample());
//!
//! // Ask in Chinese or English; answers carry the subgraph to display
//! let answer = copilot.ask("追溯 KPI_FoldTime 的链路");
//! assert!(answer.content.contains("Fold time"));
//! assert!(!answer.nodes.is_empty());
//!
//! // Follow-ups can point back at the previous result
//! let follow_up = copilot.ask("它会影响什么");
//! assert!(follow_up.content.contains("Impact"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod analytics;
pub mod context;
pub mod engine;
pub mod graph;
pub mod query;
pub mod report;

// Re-export main types for convenience
pub use engine::Copilot;

pub use graph::{
    Category, Dataset, DatasetError, DatasetResult, Direction, Edge, EdgeId, GraphStats,
    GraphStore, KpiLevel, KpiMetrics, ModelType, Node, NodeFilter, NodeId, Relationship,
};

pub use query::{
    Entity, EntityKind, ParsedQuery, QueryIntent, QueryParser, Responder, Response,
    ResponseAction,
};

pub use analytics::{
    AchievementStats, Analytics, CorrelationStrength, GapPriority, GapReport, HealthGrade,
    KpiComparison, KpiCorrelation, LevelHealth, NodePriority, RiskAssessment, RiskLevel,
    ScoringConfig, Trace,
};

pub use context::{ContextManager, HistoryEntry};

pub use report::{ProgramReport, ReportError, ReportGenerator, ReportResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
