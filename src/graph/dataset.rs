//! Wholesale node/edge payloads exchanged with the host
//!
//! The host owns the graph data and hands it over as one JSON document.
//! This module is the only place where parsing can fail; everything past
//! it works on validated `Node`/`Edge` values.

use super::edge::Edge;
use super::node::{KpiMetrics, Node};
use super::types::{KpiLevel, ModelType, Relationship};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors at the dataset boundary
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Malformed dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// One complete snapshot of the host's node and edge arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Dataset {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Dataset { nodes, edges }
    }

    /// Parse a host payload
    pub fn from_json(json: &str) -> DatasetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DatasetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    /// Demonstration program: the electric folding side mirror
    ///
    /// Two goals, six KPIs on two levels, four design parameters, three
    /// verification activities. The verify edges run back into the KPI
    /// layer, so the graph is cyclic. `KPI_Noise` sits at 95% but is
    /// still unachieved, which pins down that the achieved flag is
    /// authored, not derived.
    pub fn sample() -> Self {
        let nodes = vec![
            Node::goal("G_UserComfort", "Comfortable mirror operation")
                .with_description("Folding feels quick and quiet to the driver"),
            Node::goal("G_Durability", "Long-life folding mechanism"),
            Node::kpi(
                "KPI_FoldTime",
                "Fold time",
                KpiLevel::Top,
                KpiMetrics::new(true, 92.0).with_model(ModelType::Simulink),
            )
            .with_description("Time to fully fold the mirror head"),
            Node::kpi(
                "KPI_Noise",
                "Operating noise",
                KpiLevel::Top,
                KpiMetrics::new(false, 95.0),
            )
            .with_description("A-weighted sound pressure during folding"),
            Node::kpi(
                "KPI_CycleLife",
                "Fold cycle life",
                KpiLevel::Top,
                KpiMetrics::new(false, 55.0).with_model(ModelType::Sysml),
            ),
            Node::sub_kpi(
                "KPI_MotorSpeed",
                "Motor speed",
                "KPI_FoldTime",
                KpiMetrics::new(true, 88.0).with_model(ModelType::Modelica),
            ),
            Node::sub_kpi(
                "KPI_GearRatio",
                "Gear reduction ratio",
                "KPI_FoldTime",
                KpiMetrics::new(false, 62.0),
            ),
            Node::sub_kpi(
                "KPI_HingeWear",
                "Hinge wear rate",
                "KPI_CycleLife",
                KpiMetrics::new(false, 40.0).with_model(ModelType::Fmu),
            ),
            Node::design("D_MotorTorque", "Motor torque"),
            Node::design("D_GearTeeth", "Gear tooth count"),
            Node::design("D_HingeMaterial", "Hinge material"),
            Node::design("D_DamperRate", "Damper rate"),
            Node::verify("V_FoldBench", "Fold bench test"),
            Node::verify("V_NoiseChamber", "Noise chamber test"),
            Node::verify("V_EnduranceRig", "Endurance rig test"),
        ];

        let edges = vec![
            Edge::new("E_01", "KPI_FoldTime", "G_UserComfort", Relationship::Satisfy),
            Edge::new("E_02", "KPI_Noise", "G_UserComfort", Relationship::Satisfy),
            Edge::new("E_03", "KPI_CycleLife", "G_Durability", Relationship::Satisfy),
            Edge::new("E_04", "KPI_MotorSpeed", "KPI_FoldTime", Relationship::Satisfy),
            Edge::new("E_05", "KPI_GearRatio", "KPI_FoldTime", Relationship::Satisfy),
            Edge::new("E_06", "KPI_HingeWear", "KPI_CycleLife", Relationship::Satisfy),
            Edge::new("E_07", "D_MotorTorque", "KPI_MotorSpeed", Relationship::Implement),
            Edge::new("E_08", "D_MotorTorque", "KPI_FoldTime", Relationship::Implement),
            Edge::new("E_09", "D_GearTeeth", "KPI_GearRatio", Relationship::Implement),
            Edge::new("E_10", "D_GearTeeth", "KPI_FoldTime", Relationship::Implement),
            Edge::new("E_11", "D_GearTeeth", "KPI_MotorSpeed", Relationship::Implement),
            Edge::new("E_12", "D_HingeMaterial", "KPI_HingeWear", Relationship::Implement),
            Edge::new("E_13", "D_HingeMaterial", "KPI_CycleLife", Relationship::Implement),
            Edge::new("E_14", "D_DamperRate", "KPI_Noise", Relationship::Implement),
            Edge::new("E_15", "V_FoldBench", "KPI_FoldTime", Relationship::Verify),
            Edge::new("E_16", "V_NoiseChamber", "KPI_Noise", Relationship::Verify),
            Edge::new("E_17", "V_EnduranceRig", "KPI_CycleLife", Relationship::Verify),
            Edge::new("E_18", "V_EnduranceRig", "KPI_HingeWear", Relationship::Verify),
        ];

        Dataset::new(nodes, edges)
    }
}
