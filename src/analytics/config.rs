//! Tunable weights and thresholds for the analytics layer
//!
//! Defaults are the calibrated production values; hosts that want a
//! stricter or looser read of the program can construct their own config
//! and pass it to the engine.

use serde::{Deserialize, Serialize};

/// Weights for the per-level health score; expected to sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    pub achievement: f64,
    pub model: f64,
    pub verification: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        HealthWeights {
            achievement: 0.5,
            model: 0.3,
            verification: 0.2,
        }
    }
}

/// Coverage-rate thresholds (percent) separating gap priorities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapThresholds {
    /// Below this rate a gap is high priority
    pub high_below: f64,

    /// Below this rate (and at or above `high_below`) a gap is medium priority
    pub medium_below: f64,
}

impl Default for GapThresholds {
    fn default() -> Self {
        GapThresholds {
            high_below: 60.0,
            medium_below: 80.0,
        }
    }
}

/// Additive points for the priority ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityPoints {
    pub unachieved: u32,
    pub no_model: u32,
    pub no_verification: u32,
    pub top_level: u32,

    /// Downstream reach contributes one point per affected node, capped here
    pub reach_cap: u32,
}

impl Default for PriorityPoints {
    fn default() -> Self {
        PriorityPoints {
            unachieved: 50,
            no_model: 30,
            no_verification: 20,
            top_level: 10,
            reach_cap: 20,
        }
    }
}

/// Additive points and cutoffs for the risk assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPoints {
    pub unachieved: u32,
    pub no_model: u32,
    pub no_verification: u32,
    pub high_fan_in: u32,
    pub high_fan_out: u32,

    /// More than this many direct upstream neighbors counts as high fan-in
    pub fan_in_over: usize,

    /// More than this many direct downstream neighbors counts as high fan-out
    pub fan_out_over: usize,

    /// Total score at or above this is high risk
    pub high_at: u32,

    /// Total score at or above this (and below `high_at`) is medium risk
    pub medium_at: u32,
}

impl Default for RiskPoints {
    fn default() -> Self {
        RiskPoints {
            unachieved: 3,
            no_model: 2,
            no_verification: 2,
            high_fan_in: 1,
            high_fan_out: 1,
            fan_in_over: 5,
            fan_out_over: 8,
            high_at: 5,
            medium_at: 3,
        }
    }
}

/// All analytics tunables in one value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub health: HealthWeights,
    pub gaps: GapThresholds,
    pub priority: PriorityPoints,
    pub risk: RiskPoints,
}
