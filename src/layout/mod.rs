//! Layout phase: WorkflowGraph → PositionedGraph.
//!
//! Public API: `LayoutEngine::layout(graph)`. The hierarchical algorithm
//! delegates to a `LayeredLayout` backend; the simple algorithm packs nodes
//! on a grid and never fails on well-formed input.

pub mod bounds;
pub mod hierarchical;
pub mod optimize;
pub mod simple;
pub mod size;
pub mod types;

pub use bounds::calculate_bounds;
pub use hierarchical::SugiyamaLayout;
pub use optimize::optimize_for_large_graphs;
pub use simple::simple_layout;
pub use size::node_size;
pub use types::*;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LayoutError;
use crate::ir::types::{EdgeKind, WorkflowGraph, WorkflowNode};

const EDGE_SEP: f64 = 50.0;
const MARGIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Hierarchical,
    Simple,
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hierarchical" => Ok(Algorithm::Hierarchical),
            "simple" => Ok(Algorithm::Simple),
            other => Err(format!("unknown layout algorithm '{}'", other)),
        }
    }
}

pub struct LayoutEngine {
    algorithm: Algorithm,
    backend: Box<dyn LayeredLayout>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        LayoutEngine::new(Algorithm::default())
    }
}

impl LayoutEngine {
    pub fn new(algorithm: Algorithm) -> Self {
        LayoutEngine {
            algorithm,
            backend: Box::new(SugiyamaLayout::default()),
        }
    }

    pub fn hierarchical() -> Self {
        Self::new(Algorithm::Hierarchical)
    }

    pub fn simple() -> Self {
        Self::new(Algorithm::Simple)
    }

    /// Replace the layered backend used by the hierarchical algorithm.
    pub fn with_backend(mut self, backend: Box<dyn LayeredLayout>) -> Self {
        self.backend = backend;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn layout(&self, graph: &WorkflowGraph) -> Result<PositionedGraph, LayoutError> {
        let positioned = match self.algorithm {
            Algorithm::Hierarchical => self.hierarchical_layout(graph)?,
            Algorithm::Simple => self.simple_layout(graph),
        };
        debug!(
            algorithm = ?self.algorithm,
            nodes = positioned.nodes.len(),
            width = positioned.bounds.width,
            height = positioned.bounds.height,
            "layout complete"
        );
        Ok(positioned)
    }

    fn hierarchical_layout(&self, graph: &WorkflowGraph) -> Result<PositionedGraph, LayoutError> {
        let layout_graph = to_layout_graph(graph)?;
        let options = GraphOptions {
            rank_dir: graph.layout.direction,
            node_sep: graph.layout.spacing.node[0],
            rank_sep: graph.layout.spacing.rank,
            edge_sep: EDGE_SEP,
            margin_x: MARGIN,
            margin_y: MARGIN,
        };

        let result = self.backend.compute_layout(&layout_graph, &options)?;

        let mut nodes = Vec::with_capacity(graph.nodes.len());
        for (i, (node, laid)) in graph.nodes.iter().zip(&layout_graph.nodes).enumerate() {
            let center = result
                .centers
                .get(i)
                .ok_or_else(|| LayoutError::MissingPosition(node.id.clone()))?;
            let top_left = Point::new(center.x - laid.width / 2.0, center.y - laid.height / 2.0);
            nodes.push(positioned_node(node, top_left, laid.width, laid.height));
        }

        let edges = graph
            .edges
            .iter()
            .enumerate()
            .map(|(i, edge)| PositionedEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
                label: edge.label.clone(),
                animated: edge.animated,
                style: edge.style.clone(),
                points: result.edge_points.get(i).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(finish(graph, nodes, edges))
    }

    fn simple_layout(&self, graph: &WorkflowGraph) -> PositionedGraph {
        let nodes = graph
            .nodes
            .iter()
            .zip(simple_layout(graph))
            .map(|(node, (position, size))| positioned_node(node, position, size.width, size.height))
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| PositionedEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
                label: edge.label.clone(),
                animated: edge.animated,
                style: edge.style.clone(),
                points: Vec::new(),
            })
            .collect();

        finish(graph, nodes, edges)
    }
}

/// Index-based graph for the backend. Conditional branches weigh double so
/// the backend keeps them short.
fn to_layout_graph(graph: &WorkflowGraph) -> Result<LayoutGraph, LayoutError> {
    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let size = node_size(node);
            LayoutNode {
                id: node.id.clone(),
                width: size.width,
                height: size.height,
            }
        })
        .collect();

    let lookup = |edge_id: &str, node_id: &str| {
        index
            .get(node_id)
            .copied()
            .ok_or_else(|| LayoutError::UnknownEndpoint {
                edge_id: edge_id.to_string(),
                node_id: node_id.to_string(),
            })
    };

    let mut edges = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        edges.push(LayoutEdge {
            id: edge.id.clone(),
            source: lookup(&edge.id, &edge.source)?,
            target: lookup(&edge.id, &edge.target)?,
            weight: if edge.kind == EdgeKind::ConditionalBranch { 2 } else { 1 },
        });
    }

    Ok(LayoutGraph { nodes, edges })
}

fn positioned_node(node: &WorkflowNode, position: Point, width: f64, height: f64) -> PositionedNode {
    PositionedNode {
        id: node.id.clone(),
        node_type: node.node_type,
        data: node.data.clone(),
        position,
        width,
        height,
    }
}

fn finish(graph: &WorkflowGraph, nodes: Vec<PositionedNode>, edges: Vec<PositionedEdge>) -> PositionedGraph {
    PositionedGraph {
        id: graph.id.clone(),
        name: graph.name.clone(),
        bounds: calculate_bounds(&nodes),
        nodes,
        edges,
        layout: graph.layout,
        metadata: graph.metadata.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::types::{Complexity, FlowType};
    use crate::ir::types::*;
    use serde_json::Map;

    fn graph(nodes: &[(&str, NodeType)], edges: &[(&str, &str)]) -> WorkflowGraph {
        WorkflowGraph {
            id: "workflow-test".into(),
            name: "test".into(),
            nodes: nodes
                .iter()
                .map(|(id, t)| WorkflowNode {
                    id: id.to_string(),
                    node_type: *t,
                    data: Map::new(),
                    origin: None,
                })
                .collect(),
            edges: edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| WorkflowEdge {
                    id: format!("edge-{}", i + 1),
                    source: s.to_string(),
                    target: t.to_string(),
                    kind: EdgeKind::Sequential,
                    label: None,
                    animated: true,
                    style: EdgeStyle::default(),
                })
                .collect(),
            layout: LayoutConfig::default(),
            metadata: WorkflowMetadata {
                flow_type: FlowType::Simple,
                complexity: Complexity::baseline(),
            },
        }
    }

    struct Broken;

    impl LayeredLayout for Broken {
        fn compute_layout(&self, _: &LayoutGraph, _: &GraphOptions) -> Result<LayoutPositions, LayoutError> {
            Ok(LayoutPositions::default())
        }
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let g = graph(&[("a", NodeType::Trigger)], &[("a", "ghost")]);
        let err = LayoutEngine::hierarchical().layout(&g).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownEndpoint {
                edge_id: "edge-1".into(),
                node_id: "ghost".into()
            }
        );
    }

    #[test]
    fn missing_backend_position_is_an_error() {
        let g = graph(&[("a", NodeType::Trigger)], &[]);
        let err = LayoutEngine::hierarchical()
            .with_backend(Box::new(Broken))
            .layout(&g)
            .unwrap_err();
        assert_eq!(err, LayoutError::MissingPosition("a".into()));
    }

    #[test]
    fn hierarchical_keeps_node_sizes() {
        let g = graph(
            &[("t", NodeType::Trigger), ("n", NodeType::Notification)],
            &[("t", "n")],
        );
        let out = LayoutEngine::hierarchical().layout(&g).unwrap();
        assert_eq!(out.nodes[0].width, 220.0);
        assert_eq!(out.nodes[1].height, 130.0);
        assert!(out.nodes[1].position.y > out.nodes[0].position.y);
        assert_eq!(out.bounds.min_x, MARGIN);
        assert_eq!(out.bounds.min_y, MARGIN);
    }

    #[test]
    fn simple_has_no_waypoints() {
        let g = graph(&[("a", NodeType::Action), ("b", NodeType::Action)], &[("a", "b")]);
        let out = LayoutEngine::simple().layout(&g).unwrap();
        assert!(out.edges[0].points.is_empty());
        assert_eq!(out.nodes[0].position, Point::new(100.0, 100.0));
    }

    #[test]
    fn empty_graph_has_zero_bounds() {
        let g = graph(&[], &[]);
        for engine in [LayoutEngine::hierarchical(), LayoutEngine::simple()] {
            let out = engine.layout(&g).unwrap();
            assert!(out.nodes.is_empty());
            assert_eq!(out.bounds, Bounds::default());
        }
    }

    #[test]
    fn algorithm_from_str() {
        assert_eq!("simple".parse::<Algorithm>(), Ok(Algorithm::Simple));
        assert!("radial".parse::<Algorithm>().is_err());
    }
}
