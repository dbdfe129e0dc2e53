use super::types::{Bounds, PositionedNode};

/// Smallest box containing every node. Empty input yields an all-zero box.
pub fn calculate_bounds(nodes: &[PositionedNode]) -> Bounds {
    if nodes.is_empty() {
        return Bounds::default();
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for node in nodes {
        min_x = min_x.min(node.position.x);
        min_y = min_y.min(node.position.y);
        max_x = max_x.max(node.right());
        max_y = max_y.max(node.bottom());
    }

    Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}
