//! Requirements graph data model and snapshot store
//!
//! This module implements the four-layer traceability graph:
//! - Typed nodes (goal / kpi / design / verify) with KPI-only metrics
//! - Directed typed edges (satisfy / implement / verify), dangling allowed
//! - In-memory snapshot storage with category and adjacency indices
//! - The JSON dataset boundary toward the host

pub mod dataset;
pub mod edge;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use dataset::{Dataset, DatasetError, DatasetResult};
pub use edge::Edge;
pub use node::{KpiMetrics, Node, NodeKind};
pub use store::{CategoryCounts, GraphStats, GraphStore, NodeFilter, StatusCounts};
pub use types::{Category, Direction, EdgeId, KpiLevel, ModelType, NodeId, Relationship};
