//! Transform phase: AnalysisResult → WorkflowGraph.
//!
//! Public API: `transform(analysis) -> WorkflowGraph`. Node and edge ids
//! are numbered by a `TransformContext` created per call, so two calls on
//! the same analysis produce identical id sequences.

pub mod action;
pub mod edges;
pub mod layout_config;
pub mod nodes;
pub mod trigger;

use tracing::debug;

use crate::analyze::types::AnalysisResult;
use crate::ir::types::*;

const DEFAULT_WORKFLOW_NAME: &str = "Generated Workflow";

/// Per-call id counters. One node counter is shared by every prefix.
#[derive(Debug, Default)]
pub struct TransformContext {
    node_counter: usize,
    edge_counter: usize,
}

impl TransformContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_node_id(&mut self, prefix: &str) -> String {
        self.node_counter += 1;
        format!("{}-{}", prefix, self.node_counter)
    }

    pub fn next_edge_id(&mut self) -> String {
        self.edge_counter += 1;
        format!("edge-{}", self.edge_counter)
    }

    /// Build an animated edge. Non-sequential edges are labelled with
    /// `label`, or their kind when no label is given.
    pub fn edge(
        &mut self,
        source: &str,
        target: &str,
        kind: EdgeKind,
        label: Option<&str>,
    ) -> WorkflowEdge {
        let label = match kind {
            EdgeKind::Sequential => None,
            _ => Some(label.unwrap_or(kind.as_str()).to_string()),
        };
        WorkflowEdge {
            id: self.next_edge_id(),
            source: source.to_string(),
            target: target.to_string(),
            kind,
            label,
            animated: true,
            style: EdgeStyle::default(),
        }
    }
}

pub fn transform(analysis: &AnalysisResult<'_>) -> WorkflowGraph {
    let mut ctx = TransformContext::new();

    let nodes = nodes::build_nodes(analysis, &mut ctx);
    let edges = edges::build_edges(analysis, &nodes, &mut ctx);
    let layout = layout_config::determine_layout_config(analysis.flow_type, &analysis.complexity);

    let name = workflow_name(analysis);
    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        direction = ?layout.direction,
        "transformed workflow '{}'",
        name
    );

    WorkflowGraph {
        id: format!("workflow-{}", slug(&name)),
        name,
        nodes,
        edges,
        layout,
        metadata: WorkflowMetadata {
            flow_type: analysis.flow_type,
            complexity: analysis.complexity,
        },
    }
}

fn workflow_name(analysis: &AnalysisResult<'_>) -> String {
    analysis
        .ast
        .value
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_WORKFLOW_NAME)
        .to_string()
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slug("BTC Alert"), "btc-alert");
        assert_eq!(slug("  ETH >= 3k!! "), "eth-3k");
        assert_eq!(slug("***"), "untitled");
    }

    #[test]
    fn sequential_edges_have_no_label() {
        let mut ctx = TransformContext::new();
        let seq = ctx.edge("a-1", "a-2", EdgeKind::Sequential, None);
        let start = ctx.edge("t-1", "a-1", EdgeKind::TriggerToAction, None);
        let branch = ctx.edge("d-1", "b-2", EdgeKind::ConditionalBranch, Some("else"));
        assert_eq!(seq.id, "edge-1");
        assert!(seq.label.is_none());
        assert_eq!(start.label.as_deref(), Some("trigger-to-action"));
        assert_eq!(branch.label.as_deref(), Some("else"));
        assert!(branch.animated);
    }
}
