//! Positioned output plus the backend-facing layout graph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LayoutError;
use crate::ir::types::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

// =============================================================================
// POSITIONED GRAPH (pipeline output)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub data: Map<String, Value>,
    /// Top-left corner.
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl PositionedNode {
    pub fn right(&self) -> f64 {
        self.position.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub animated: bool,
    pub style: EdgeStyle,
    /// Routing waypoints; empty means a straight edge.
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedGraph {
    pub id: String,
    pub name: String,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    pub bounds: Bounds,
    pub layout: LayoutConfig,
    pub metadata: WorkflowMetadata,
}

// =============================================================================
// LAYERED LAYOUT BACKEND INTERFACE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub id: String,
    /// Index into `LayoutGraph::nodes`.
    pub source: usize,
    pub target: usize,
    pub weight: u32,
}

/// Index-based graph handed to a layered layout backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphOptions {
    pub rank_dir: Direction,
    /// Separation between neighbouring nodes within a rank.
    pub node_sep: f64,
    /// Separation between ranks.
    pub rank_sep: f64,
    /// Separation involving edge bend points.
    pub edge_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl GraphOptions {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let values = [
            ("node_sep", self.node_sep),
            ("rank_sep", self.rank_sep),
            ("edge_sep", self.edge_sep),
            ("margin_x", self.margin_x),
            ("margin_y", self.margin_y),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidSpacing(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Backend output: node centers in `LayoutGraph::nodes` order and one
/// waypoint list per edge in `LayoutGraph::edges` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPositions {
    pub centers: Vec<Point>,
    pub edge_points: Vec<Vec<Point>>,
}

/// A layered (Sugiyama-style) graph drawing algorithm.
pub trait LayeredLayout: Send + Sync {
    fn compute_layout(
        &self,
        graph: &LayoutGraph,
        options: &GraphOptions,
    ) -> Result<LayoutPositions, LayoutError>;
}
