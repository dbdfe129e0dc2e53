//! Complexity metrics and flow classification.

use super::types::{AstNode, Complexity, FlowType, Patterns};

const MAX_SCORE: f64 = 10.0;

pub fn calculate_complexity(ast: &AstNode<'_>) -> Complexity {
    let mut total_nodes = 0;
    let mut max_depth = 0;
    let mut branching_factor = 0;

    let mut stack = vec![ast];
    while let Some(node) = stack.pop() {
        total_nodes += 1;
        max_depth = max_depth.max(node.depth);
        branching_factor = branching_factor.max(node.children.len());
        stack.extend(node.children.iter());
    }

    let raw = total_nodes as f64 * 0.1 + max_depth as f64 * 0.5 + branching_factor as f64 * 0.3;
    let score = raw.ceil().clamp(1.0, MAX_SCORE) as u8;

    Complexity {
        total_nodes,
        max_depth,
        branching_factor,
        cyclomatic_complexity: 1,
        score,
    }
}

/// First non-empty pattern list wins: loops, conditionals, parallel, sequences.
pub fn determine_flow_type(patterns: &Patterns<'_>) -> FlowType {
    if !patterns.loops.is_empty() {
        FlowType::Iterative
    } else if !patterns.conditionals.is_empty() {
        FlowType::Conditional
    } else if !patterns.parallel.is_empty() {
        FlowType::Parallel
    } else if !patterns.sequences.is_empty() {
        FlowType::Sequential
    } else {
        FlowType::Simple
    }
}
