//! Spacing pre-pass for large graphs. Callers opt in explicitly before
//! running the layout.

use crate::ir::types::{Spacing, WorkflowGraph};

const LARGE_GRAPH_NODES: usize = 50;
const VERY_LARGE_GRAPH_NODES: usize = 100;

const LARGE_SPACING: Spacing = Spacing {
    node: [120.0, 80.0],
    rank: 100.0,
};
const VERY_LARGE_SPACING: Spacing = Spacing {
    node: [100.0, 60.0],
    rank: 80.0,
};

/// Tighten spacing when the graph has more than 50 (or 100) nodes.
/// Returns whether the spacing was changed.
pub fn optimize_for_large_graphs(graph: &mut WorkflowGraph) -> bool {
    let count = graph.nodes.len();
    let spacing = if count > VERY_LARGE_GRAPH_NODES {
        VERY_LARGE_SPACING
    } else if count > LARGE_GRAPH_NODES {
        LARGE_SPACING
    } else {
        return false;
    };

    graph.layout.spacing = spacing;
    true
}
