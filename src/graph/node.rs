//! Node implementation for the requirements graph
//!
//! A node's category is a tagged union: only KPI nodes carry decomposition
//! level, parent back-reference and metrics, so the other layers cannot be
//! constructed with KPI-only data.

use super::types::{Category, KpiLevel, ModelType, NodeId};
use serde::{Deserialize, Serialize};

/// Achievement and modeling state of a KPI
///
/// `achieved` is authored independently of `achievement_rate`; a KPI at 95%
/// may still be unachieved if its owner has not signed it off. Nothing in
/// the engine derives one from the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    pub achieved: bool,

    /// Percentage in 0..=100
    pub achievement_rate: f64,

    /// Absent means the KPI has no model at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<ModelType>,

    #[serde(default)]
    pub model_covered: bool,
}

impl KpiMetrics {
    pub fn new(achieved: bool, achievement_rate: f64) -> Self {
        KpiMetrics {
            achieved,
            achievement_rate,
            model_type: None,
            model_covered: false,
        }
    }

    pub fn with_model(mut self, model_type: ModelType) -> Self {
        self.model_type = Some(model_type);
        self.model_covered = true;
        self
    }

    pub fn has_model(&self) -> bool {
        self.model_type.is_some()
    }
}

/// Category-specific payload, tagged by the host's `category` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum NodeKind {
    Goal,
    Kpi {
        level: KpiLevel,

        /// Back-reference from a sub-KPI to its level-1 KPI; lookup only,
        /// never treated as an edge
        #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
        parent: Option<NodeId>,

        metrics: KpiMetrics,
    },
    Design,
    Verify,
}

/// A node in the requirements graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Display label
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn goal(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            description: None,
            kind: NodeKind::Goal,
        }
    }

    pub fn kpi(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        level: KpiLevel,
        metrics: KpiMetrics,
    ) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            description: None,
            kind: NodeKind::Kpi {
                level,
                parent: None,
                metrics,
            },
        }
    }

    /// Level-2 KPI with a back-reference to its level-1 parent
    pub fn sub_kpi(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        parent: impl Into<NodeId>,
        metrics: KpiMetrics,
    ) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            description: None,
            kind: NodeKind::Kpi {
                level: KpiLevel::Sub,
                parent: Some(parent.into()),
                metrics,
            },
        }
    }

    pub fn design(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            description: None,
            kind: NodeKind::Design,
        }
    }

    pub fn verify(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            description: None,
            kind: NodeKind::Verify,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(&self) -> Category {
        match self.kind {
            NodeKind::Goal => Category::Goal,
            NodeKind::Kpi { .. } => Category::Kpi,
            NodeKind::Design => Category::Design,
            NodeKind::Verify => Category::Verify,
        }
    }

    pub fn is_kpi(&self) -> bool {
        matches!(self.kind, NodeKind::Kpi { .. })
    }

    /// KPI metrics; `None` for every other category
    pub fn metrics(&self) -> Option<&KpiMetrics> {
        match &self.kind {
            NodeKind::Kpi { metrics, .. } => Some(metrics),
            _ => None,
        }
    }

    pub fn level(&self) -> Option<KpiLevel> {
        match &self.kind {
            NodeKind::Kpi { level, .. } => Some(*level),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<&NodeId> {
        match &self.kind {
            NodeKind::Kpi { parent, .. } => parent.as_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_goal_node() {
        let node = Node::goal("G_UserExperience", "Smooth mirror operation");
        assert_eq!(node.id, NodeId::new("G_UserExperience"));
        assert_eq!(node.category(), Category::Goal);
        assert!(!node.is_kpi());
        assert!(node.metrics().is_none());
        assert!(node.level().is_none());
    }

    #[test]
    fn test_create_kpi_node() {
        let metrics = KpiMetrics::new(true, 92.0).with_model(ModelType::Simulink);
        let node = Node::kpi("KPI_FoldTime", "Fold time", KpiLevel::Top, metrics);

        assert_eq!(node.category(), Category::Kpi);
        assert_eq!(node.level(), Some(KpiLevel::Top));
        assert!(node.parent().is_none());

        let m = node.metrics().unwrap();
        assert!(m.achieved);
        assert!(m.has_model());
        assert_eq!(m.model_type, Some(ModelType::Simulink));
    }

    #[test]
    fn test_sub_kpi_parent_reference() {
        let node = Node::sub_kpi(
            "KPI_MotorSpeed",
            "Motor speed",
            "KPI_FoldTime",
            KpiMetrics::new(false, 70.0),
        );
        assert_eq!(node.level(), Some(KpiLevel::Sub));
        assert_eq!(node.parent(), Some(&NodeId::new("KPI_FoldTime")));
    }

    #[test]
    fn test_achieved_independent_of_rate() {
        // A 95% KPI can still be unachieved; the flag is authored, not derived.
        let metrics = KpiMetrics::new(false, 95.0);
        let node = Node::kpi("KPI_Noise", "Operating noise", KpiLevel::Top, metrics);
        assert!(!node.metrics().unwrap().achieved);
        assert_eq!(node.metrics().unwrap().achievement_rate, 95.0);
    }

    #[test]
    fn test_wire_shape() {
        let metrics = KpiMetrics::new(true, 92.0).with_model(ModelType::Simulink);
        let node = Node::kpi("KPI_FoldTime", "Fold time", KpiLevel::Top, metrics)
            .with_description("Time to fully fold the mirror");

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "KPI_FoldTime");
        assert_eq!(json["category"], "kpi");
        assert_eq!(json["level"], 1);
        assert_eq!(json["metrics"]["achievementRate"], 92.0);
        assert_eq!(json["metrics"]["modelType"], "simulink");
        assert_eq!(json["metrics"]["modelCovered"], true);

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.level(), Some(KpiLevel::Top));
    }

    #[test]
    fn test_goal_wire_shape_has_no_kpi_fields() {
        let node = Node::design("D_MotorTorque", "Motor torque");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["category"], "design");
        assert!(json.get("level").is_none());
        assert!(json.get("metrics").is_none());
    }

    #[test]
    fn test_node_equality() {
        let node1 = Node::goal("G_1", "One");
        let node2 = Node::goal("G_1", "Renamed");
        let node3 = Node::goal("G_2", "One");

        assert_eq!(node1, node2); // Same ID
        assert_ne!(node1, node3); // Different ID
    }
}
