//! Edge construction over the finished node list.

use super::TransformContext;
use crate::analyze::types::AnalysisResult;
use crate::ir::types::*;

pub fn build_edges(
    analysis: &AnalysisResult<'_>,
    nodes: &[WorkflowNode],
    ctx: &mut TransformContext,
) -> Vec<WorkflowEdge> {
    let mut edges = Vec::new();

    connect_trigger(nodes, ctx, &mut edges);
    chain_actions(nodes, ctx, &mut edges);
    connect_conditionals(analysis, nodes, ctx, &mut edges);
    connect_parallel_groups(analysis, nodes, ctx, &mut edges);

    edges
}

/// First trigger → first action-typed node.
fn connect_trigger(nodes: &[WorkflowNode], ctx: &mut TransformContext, edges: &mut Vec<WorkflowEdge>) {
    if nodes.len() < 2 {
        return;
    }
    let trigger = nodes.iter().find(|n| n.node_type == NodeType::Trigger);
    let action = nodes.iter().find(|n| n.node_type.is_action());

    if let (Some(trigger), Some(action)) = (trigger, action) {
        edges.push(ctx.edge(&trigger.id, &action.id, EdgeKind::TriggerToAction, None));
    }
}

/// One chain through every action-typed node in node order, regardless of
/// which pattern produced them.
fn chain_actions(nodes: &[WorkflowNode], ctx: &mut TransformContext, edges: &mut Vec<WorkflowEdge>) {
    let actions: Vec<&WorkflowNode> = nodes.iter().filter(|n| n.node_type.is_action()).collect();
    for pair in actions.windows(2) {
        edges.push(ctx.edge(&pair[0].id, &pair[1].id, EdgeKind::Sequential, None));
    }
}

fn connect_conditionals(
    analysis: &AnalysisResult<'_>,
    nodes: &[WorkflowNode],
    ctx: &mut TransformContext,
    edges: &mut Vec<WorkflowEdge>,
) {
    for conditional in &analysis.patterns.conditionals {
        let decision = nodes.iter().find(|n| {
            matches!(&n.origin, Some(NodeOrigin::Decision { path }) if *path == conditional.path)
        });
        let Some(decision) = decision else { continue };

        for branch in &conditional.branches {
            let target = nodes.iter().find(|n| {
                matches!(
                    &n.origin,
                    Some(NodeOrigin::Branch { conditional: parent, branch: kind })
                        if *parent == conditional.path && *kind == branch.kind
                )
            });
            if let Some(target) = target {
                edges.push(ctx.edge(
                    &decision.id,
                    &target.id,
                    EdgeKind::ConditionalBranch,
                    Some(branch.kind.as_str()),
                ));
            }
        }
    }
}

fn connect_parallel_groups(
    analysis: &AnalysisResult<'_>,
    nodes: &[WorkflowNode],
    ctx: &mut TransformContext,
    edges: &mut Vec<WorkflowEdge>,
) {
    for parallel in &analysis.patterns.parallel {
        let group = nodes.iter().find(|n| {
            matches!(&n.origin, Some(NodeOrigin::ParallelGroup { path }) if *path == parallel.path)
        });
        let Some(group) = group else { continue };

        let tasks = nodes.iter().filter(|n| {
            matches!(&n.origin, Some(NodeOrigin::ParallelTask { group: parent, .. }) if *parent == parallel.path)
        });
        for task in tasks {
            edges.push(ctx.edge(&group.id, &task.id, EdgeKind::ParallelStart, None));
        }
    }
}
