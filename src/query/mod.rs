//! Query pipeline: free text in, displayable answer out
//!
//! Two stages, both deterministic and infallible:
//! - `parser` classifies intent and extracts entities
//! - `respond` dispatches to one handler per intent and renders the answer

pub mod parser;
pub mod respond;

// Re-export main types
pub use parser::{Entity, EntityKind, ParsedQuery, QueryIntent, QueryParser};
pub use respond::{Responder, Response, ResponseAction};
