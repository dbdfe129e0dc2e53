//! Workflow graph invariant validation.
//!
//! Checks id uniqueness and edge endpoint validity before a graph is handed
//! to the layout engine.

use std::collections::HashSet;

use crate::ir::types::*;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    /// The node ID where the error was found, if applicable.
    pub node_id: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "[{}] {} (at node '{}')", self.code, self.message, id),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Validate a workflow graph against all invariants. Returns all errors found.
pub fn validate_graph(graph: &WorkflowGraph) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_unique_node_ids(graph, &mut errors);
    validate_unique_edge_ids(graph, &mut errors);
    validate_edge_endpoints(graph, &mut errors);

    errors
}

// ---------------------------------------------------------------------------
// Invariant: node IDs are unique within a graph
// ---------------------------------------------------------------------------

fn validate_unique_node_ids(graph: &WorkflowGraph, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            errors.push(ValidationError {
                code: "V001",
                message: format!("Duplicate node ID '{}'", node.id),
                node_id: Some(node.id.clone()),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: edge IDs are unique within a graph
// ---------------------------------------------------------------------------

fn validate_unique_edge_ids(graph: &WorkflowGraph, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for edge in &graph.edges {
        if !seen.insert(edge.id.as_str()) {
            errors.push(ValidationError {
                code: "V002",
                message: format!("Duplicate edge ID '{}'", edge.id),
                node_id: None,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: every edge endpoint names a node in the same graph
// ---------------------------------------------------------------------------

fn validate_edge_endpoints(graph: &WorkflowGraph, errors: &mut Vec<ValidationError>) {
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    for edge in &graph.edges {
        if !ids.contains(edge.source.as_str()) {
            errors.push(ValidationError {
                code: "V003",
                message: format!(
                    "Edge '{}' references unknown source node '{}'",
                    edge.id, edge.source
                ),
                node_id: Some(edge.source.clone()),
            });
        }
        if !ids.contains(edge.target.as_str()) {
            errors.push(ValidationError {
                code: "V004",
                message: format!(
                    "Edge '{}' references unknown target node '{}'",
                    edge.id, edge.target
                ),
                node_id: Some(edge.target.clone()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::types::{Complexity, FlowType};
    use serde_json::Map;

    fn node(id: &str) -> WorkflowNode {
        WorkflowNode {
            id: id.into(),
            node_type: NodeType::Action,
            data: Map::new(),
            origin: None,
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> WorkflowEdge {
        WorkflowEdge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Sequential,
            label: None,
            animated: true,
            style: EdgeStyle::default(),
        }
    }

    fn graph(nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) -> WorkflowGraph {
        WorkflowGraph {
            id: "workflow-test".into(),
            name: "Test".into(),
            nodes,
            edges,
            layout: LayoutConfig::default(),
            metadata: WorkflowMetadata {
                flow_type: FlowType::Simple,
                complexity: Complexity::baseline(),
            },
        }
    }

    #[test]
    fn valid_graph_passes() {
        let g = graph(vec![node("a-1"), node("a-2")], vec![edge("edge-1", "a-1", "a-2")]);
        let errors = validate_graph(&g);
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn duplicate_node_id_fails() {
        let g = graph(vec![node("a-1"), node("a-1")], vec![]);
        let errors = validate_graph(&g);
        assert!(errors.iter().any(|e| e.code == "V001"));
    }

    #[test]
    fn duplicate_edge_id_fails() {
        let g = graph(
            vec![node("a-1"), node("a-2")],
            vec![edge("edge-1", "a-1", "a-2"), edge("edge-1", "a-2", "a-1")],
        );
        let errors = validate_graph(&g);
        assert!(errors.iter().any(|e| e.code == "V002"));
    }

    #[test]
    fn dangling_endpoints_fail() {
        let g = graph(vec![node("a-1")], vec![edge("edge-1", "ghost-1", "ghost-2")]);
        let errors = validate_graph(&g);
        assert!(errors.iter().any(|e| e.code == "V003"));
        assert!(errors.iter().any(|e| e.code == "V004"));
    }
}
