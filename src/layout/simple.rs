//! Deterministic grid packing used when the hierarchical layout is not
//! available. Ignores edges; output depends only on node order, sizes and
//! the layout configuration.

use super::size::node_size;
use super::types::{Point, Size};
use crate::ir::types::WorkflowGraph;

const ORIGIN: f64 = 100.0;
const NODES_PER_LINE: usize = 5;
/// Column advance used by the vertical layout, on top of node spacing.
const COLUMN_WIDTH: f64 = 250.0;

/// Top-left position and size for every node, in node order.
pub fn simple_layout(graph: &WorkflowGraph) -> Vec<(Point, Size)> {
    let [spacing_x, spacing_y] = graph.layout.spacing.node;
    let horizontal = graph.layout.direction.is_horizontal();

    let mut x = ORIGIN;
    let mut y = ORIGIN;
    let mut row_height: f64 = 0.0;
    let mut placements = Vec::with_capacity(graph.nodes.len());

    for (index, node) in graph.nodes.iter().enumerate() {
        let size = node_size(node);
        placements.push((Point::new(x, y), size));
        let wraps = (index + 1) % NODES_PER_LINE == 0;

        if horizontal {
            x += size.width + spacing_x;
            row_height = row_height.max(size.height);
            if wraps {
                x = ORIGIN;
                y += row_height + spacing_y;
                row_height = 0.0;
            }
        } else {
            y += size.height + spacing_y;
            if wraps {
                y = ORIGIN;
                x += spacing_x + COLUMN_WIDTH;
            }
        }
    }

    placements
}
