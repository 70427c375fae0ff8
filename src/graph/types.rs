//! Core type definitions for the requirements graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node (e.g., "KPI_FoldTime", "D_MotorTorque")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

/// Unique identifier for an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        EdgeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        EdgeId(s)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        EdgeId(s.to_string())
    }
}

/// Node category: the four layers of the traceability graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Goal,
    Kpi,
    Design,
    Verify,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Goal => "goal",
            Category::Kpi => "kpi",
            Category::Design => "design",
            Category::Verify => "verify",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "goal" => Some(Category::Goal),
            "kpi" => Some(Category::Kpi),
            "design" => Some(Category::Design),
            "verify" => Some(Category::Verify),
            _ => None,
        }
    }

    /// Human-readable layer name used in formatted answers
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Goal => "Goal",
            Category::Kpi => "KPI",
            Category::Design => "Design",
            Category::Verify => "Verification",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Edge relationship type
///
/// `Verify` edges run from verification activities back to KPI nodes,
/// which is what makes the graph cyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Satisfy,
    Implement,
    Verify,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Satisfy => "satisfy",
            Relationship::Implement => "implement",
            Relationship::Verify => "verify",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "satisfy" => Some(Relationship::Satisfy),
            "implement" => Some(Relationship::Implement),
            "verify" => Some(Relationship::Verify),
            _ => None,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Modeling formalism backing a KPI; absence means the KPI has no model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Sysml,
    Simulink,
    Modelica,
    Fmu,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Sysml => "sysml",
            ModelType::Simulink => "simulink",
            ModelType::Modelica => "modelica",
            ModelType::Fmu => "fmu",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sysml" => Some(ModelType::Sysml),
            "simulink" => Some(ModelType::Simulink),
            "modelica" => Some(ModelType::Modelica),
            "fmu" => Some(ModelType::Fmu),
            _ => None,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// KPI decomposition level, serialized as the host's integer form (1 or 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub enum KpiLevel {
    Top,
    Sub,
}

impl KpiLevel {
    pub fn as_number(&self) -> u8 {
        match self {
            KpiLevel::Top => 1,
            KpiLevel::Sub => 2,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1" => Some(KpiLevel::Top),
            "2" => Some(KpiLevel::Sub),
            _ => None,
        }
    }
}

impl TryFrom<u8> for KpiLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(KpiLevel::Top),
            2 => Ok(KpiLevel::Sub),
            other => Err(format!("invalid KPI level: {}", other)),
        }
    }
}

impl From<KpiLevel> for u8 {
    fn from(level: KpiLevel) -> u8 {
        level.as_number()
    }
}

impl fmt::Display for KpiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// Traversal direction for neighborhood queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Incoming,
    Outgoing,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new("KPI_FoldTime");
        assert_eq!(id.as_str(), "KPI_FoldTime");
        assert_eq!(format!("{}", id), "KPI_FoldTime");

        let id2: NodeId = "D_MotorTorque".into();
        assert_eq!(id2.as_str(), "D_MotorTorque");
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new("E_001");
        assert_eq!(id.as_str(), "E_001");
        assert_eq!(format!("{}", id), "E_001");
    }

    #[test]
    fn test_category_roundtrip() {
        assert_eq!(Category::parse("kpi"), Some(Category::Kpi));
        assert_eq!(Category::parse("widget"), None);
        assert_eq!(Category::Verify.as_str(), "verify");
        assert_eq!(Category::Kpi.display_name(), "KPI");
    }

    #[test]
    fn test_relationship_parse() {
        assert_eq!(Relationship::parse("satisfy"), Some(Relationship::Satisfy));
        assert_eq!(Relationship::parse("depends"), None);
        assert_eq!(format!("{}", Relationship::Implement), "implement");
    }

    #[test]
    fn test_model_type_parse() {
        assert_eq!(ModelType::parse("simulink"), Some(ModelType::Simulink));
        assert_eq!(ModelType::parse(""), None);
    }

    #[test]
    fn test_kpi_level_integer_form() {
        assert_eq!(KpiLevel::Top.as_number(), 1);
        assert_eq!(KpiLevel::try_from(2u8), Ok(KpiLevel::Sub));
        assert!(KpiLevel::try_from(3u8).is_err());
        assert_eq!(KpiLevel::parse("1"), Some(KpiLevel::Top));

        let json = serde_json::to_string(&KpiLevel::Sub).unwrap();
        assert_eq!(json, "2");
        let back: KpiLevel = serde_json::from_str("1").unwrap();
        assert_eq!(back, KpiLevel::Top);
    }

    #[test]
    fn test_id_ordering() {
        let a = NodeId::new("A");
        let b = NodeId::new("B");
        assert!(a < b);
    }
}
