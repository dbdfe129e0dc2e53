//! Workflow graph types.
//!
//! The workflow graph is the normalized output of the transformer and the
//! input of the layout engine. Node `type` and edge `kind` are closed
//! vocabularies the rendering layer maps onto visual components.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analyze::types::{Complexity, FlowType};

// =============================================================================
// JSON PATHS
// =============================================================================

/// One step from a JSON value into a child: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{}", k),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Location of a matched value inside the source document.
///
/// Correlation between nodes compares paths structurally; the `.`-joined
/// form is only carried in node data for the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath(pub Vec<PathSegment>);

impl JsonPath {
    pub fn root() -> Self {
        JsonPath(Vec::new())
    }

    pub fn child_key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        JsonPath(segments)
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        JsonPath(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

// =============================================================================
// WORKFLOW GRAPH
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub id: String,
    pub name: String,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    pub layout: LayoutConfig,
    pub metadata: WorkflowMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub flow_type: FlowType,
    pub complexity: Complexity,
}

impl WorkflowGraph {
    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }
}

// =============================================================================
// NODES
// =============================================================================

/// Rendering node types. `Action` is the generic action card; trade and
/// notification actions have dedicated components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Trigger,
    Action,
    TradeAction,
    Notification,
    Decision,
    Loop,
    ParallelGroup,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::Action => "action",
            NodeType::TradeAction => "tradeAction",
            NodeType::Notification => "notification",
            NodeType::Decision => "decision",
            NodeType::Loop => "loop",
            NodeType::ParallelGroup => "parallelGroup",
        }
    }

    /// Node types that take part in the sequential action chain.
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            NodeType::Action | NodeType::TradeAction | NodeType::Notification
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub data: Map<String, Value>,
    /// Which pattern produced this node. Used for edge wiring only.
    #[serde(skip)]
    pub origin: Option<NodeOrigin>,
}

impl WorkflowNode {
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Display name, when the node carries a textual one.
    pub fn name(&self) -> Option<&str> {
        self.data_str("name")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchKind {
    Then,
    Else,
    Case,
}

impl BranchKind {
    pub const ALL: [BranchKind; 3] = [BranchKind::Then, BranchKind::Else, BranchKind::Case];

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchKind::Then => "then",
            BranchKind::Else => "else",
            BranchKind::Case => "case",
        }
    }
}

/// Structured back-reference from a generated node to the pattern match
/// (and, for child nodes, the parent match) it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrigin {
    Trigger { path: JsonPath },
    Action { path: JsonPath, sequence_index: usize },
    Decision { path: JsonPath },
    Branch { conditional: JsonPath, branch: BranchKind },
    Loop { path: JsonPath },
    ParallelGroup { path: JsonPath },
    ParallelTask { group: JsonPath, index: usize },
    Fallback,
}

// =============================================================================
// EDGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Sequential,
    TriggerToAction,
    ConditionalBranch,
    ParallelStart,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Sequential => "sequential",
            EdgeKind::TriggerToAction => "trigger-to-action",
            EdgeKind::ConditionalBranch => "conditional-branch",
            EdgeKind::ParallelStart => "parallel-start",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub animated: bool,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: u32,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        EdgeStyle {
            stroke: "#a855f7".into(),
            stroke_width: 2,
        }
    }
}

// =============================================================================
// LAYOUT CONFIGURATION
// =============================================================================

/// Rank direction of the hierarchical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl Direction {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LR | Direction::RL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// `[horizontal, vertical]` separation between nodes.
    pub node: [f64; 2],
    /// Separation between ranks.
    pub rank: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub spacing: Spacing,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            direction: Direction::TB,
            spacing: Spacing {
                node: [150.0, 100.0],
                rank: 150.0,
            },
        }
    }
}
