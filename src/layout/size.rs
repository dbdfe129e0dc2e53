//! Node box sizes by rendering type and name length.

use super::types::Size;
use crate::ir::types::{NodeType, WorkflowNode};

pub const DEFAULT_NODE_SIZE: Size = Size {
    width: 250.0,
    height: 100.0,
};

/// Names longer than this widen the box.
const NAME_CHARS_BEFORE_WIDENING: usize = 30;
const WIDTH_PER_EXTRA_CHAR: f64 = 3.0;
const MAX_WIDENED_WIDTH: f64 = 350.0;

pub fn base_size(node_type: NodeType) -> Size {
    let (width, height) = match node_type {
        NodeType::Trigger => (220.0, 100.0),
        NodeType::TradeAction => (240.0, 120.0),
        NodeType::Notification => (260.0, 130.0),
        NodeType::Decision => (200.0, 80.0),
        NodeType::Loop => (200.0, 90.0),
        NodeType::ParallelGroup => (280.0, 100.0),
        NodeType::Action => return DEFAULT_NODE_SIZE,
    };
    Size { width, height }
}

pub fn node_size(node: &WorkflowNode) -> Size {
    let mut size = base_size(node.node_type);

    if let Some(name) = node.name() {
        let len = name.chars().count();
        if len > NAME_CHARS_BEFORE_WIDENING {
            let widened = size.width + (len - NAME_CHARS_BEFORE_WIDENING) as f64 * WIDTH_PER_EXTRA_CHAR;
            size.width = widened.min(MAX_WIDENED_WIDTH);
        }
    }

    size
}
