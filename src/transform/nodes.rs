//! Node construction. Order is fixed: triggers, actions, decisions with
//! their branches, loops, parallel groups with their tasks, then the
//! raw-structure fallback when nothing matched.

use serde_json::{Map, Value};

use super::TransformContext;
use super::action::{extract_action_data, guess_action_type, node_type_for, ActionType};
use super::trigger::parse_trigger;
use crate::analyze::patterns::is_truthy;
use crate::analyze::types::*;
use crate::ir::types::*;

pub fn build_nodes(analysis: &AnalysisResult<'_>, ctx: &mut TransformContext) -> Vec<WorkflowNode> {
    let mut nodes = Vec::new();
    let patterns = &analysis.patterns;

    for trigger in &patterns.triggers {
        nodes.push(trigger_node(trigger, ctx));
    }

    for action in &patterns.actions {
        match action.value {
            Value::Array(items) if action.is_array => {
                for (index, item) in items.iter().enumerate() {
                    nodes.push(action_node(item, &action.path, index, ctx));
                }
            }
            value => nodes.push(action_node(value, &action.path, 0, ctx)),
        }
    }

    for conditional in &patterns.conditionals {
        nodes.push(decision_node(conditional, ctx));
        for branch in &conditional.branches {
            nodes.push(branch_node(branch, conditional, ctx));
        }
    }

    for lp in &patterns.loops {
        nodes.push(loop_node(lp, ctx));
    }

    for parallel in &patterns.parallel {
        nodes.push(parallel_group_node(parallel, ctx));
        if let Value::Array(tasks) = parallel.value {
            for (index, task) in tasks.iter().enumerate() {
                nodes.push(parallel_task_node(task, parallel, index, ctx));
            }
        }
    }

    if nodes.is_empty() {
        nodes.extend(nodes_from_raw_structure(&analysis.ast, ctx));
    }

    nodes
}

fn trigger_node(trigger: &TriggerMatch<'_>, ctx: &mut TransformContext) -> WorkflowNode {
    let condition = parse_trigger(trigger);

    let mut data = Map::new();
    data.insert("asset".into(), Value::from(condition.asset));
    data.insert("operator".into(), Value::from(condition.operator));
    data.insert("value".into(), condition.value);
    data.insert("type".into(), Value::from(trigger.trigger_type.as_str()));
    data.insert("originalPath".into(), path_value(&trigger.path));

    WorkflowNode {
        id: ctx.next_node_id("trigger"),
        node_type: NodeType::Trigger,
        data,
        origin: Some(NodeOrigin::Trigger {
            path: trigger.path.clone(),
        }),
    }
}

fn action_node(
    value: &Value,
    path: &JsonPath,
    sequence_index: usize,
    ctx: &mut TransformContext,
) -> WorkflowNode {
    let id = ctx.next_node_id("action");

    let (action_type, mut data) = match value {
        Value::String(text) => (
            guess_action_type(text).as_str().to_string(),
            extract_action_data(text),
        ),
        Value::Object(map) => {
            let action_type = match map.get("type").and_then(Value::as_str) {
                Some(explicit) if !explicit.is_empty() => explicit.to_string(),
                _ => guess_action_type(&value.to_string()).as_str().to_string(),
            };
            (action_type, map.clone())
        }
        _ => (ActionType::Generic.as_str().to_string(), Map::new()),
    };

    let name = ["name", "step"]
        .iter()
        .filter_map(|field| data.get(*field))
        .find(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| value.clone());

    let node_type = node_type_for(&action_type);
    data.insert("type".into(), Value::from(action_type));
    data.insert("name".into(), name);
    data.insert("sequenceIndex".into(), Value::from(sequence_index));

    WorkflowNode {
        id,
        node_type,
        data,
        origin: Some(NodeOrigin::Action {
            path: path.clone(),
            sequence_index,
        }),
    }
}

fn decision_node(conditional: &ConditionalMatch<'_>, ctx: &mut TransformContext) -> WorkflowNode {
    let branches: Vec<Value> = conditional
        .branches
        .iter()
        .map(|b| Value::from(b.kind.as_str()))
        .collect();

    let mut data = Map::new();
    data.insert("condition".into(), Value::from(conditional.key.clone()));
    data.insert("value".into(), conditional.value.clone());
    data.insert("branches".into(), Value::Array(branches));
    data.insert("conditionalId".into(), Value::from(conditional.path.to_string()));

    WorkflowNode {
        id: ctx.next_node_id("decision"),
        node_type: NodeType::Decision,
        data,
        origin: Some(NodeOrigin::Decision {
            path: conditional.path.clone(),
        }),
    }
}

fn branch_node(
    branch: &Branch<'_>,
    conditional: &ConditionalMatch<'_>,
    ctx: &mut TransformContext,
) -> WorkflowNode {
    let mut data = Map::new();
    data.insert("name".into(), Value::from(format!("{} branch", branch.kind.as_str())));
    data.insert("branchType".into(), Value::from(branch.kind.as_str()));
    data.insert("parentConditional".into(), Value::from(conditional.path.to_string()));
    data.insert("value".into(), branch.value.clone());

    WorkflowNode {
        id: ctx.next_node_id("branch"),
        node_type: NodeType::Action,
        data,
        origin: Some(NodeOrigin::Branch {
            conditional: conditional.path.clone(),
            branch: branch.kind,
        }),
    }
}

fn loop_node(lp: &LoopMatch<'_>, ctx: &mut TransformContext) -> WorkflowNode {
    let mut data = Map::new();
    data.insert("iterationType".into(), Value::from(lp.iteration_type.clone()));
    data.insert("target".into(), lp.value.clone());
    data.insert("loopId".into(), Value::from(lp.path.to_string()));

    WorkflowNode {
        id: ctx.next_node_id("loop"),
        node_type: NodeType::Loop,
        data,
        origin: Some(NodeOrigin::Loop {
            path: lp.path.clone(),
        }),
    }
}

fn parallel_group_node(parallel: &ParallelMatch<'_>, ctx: &mut TransformContext) -> WorkflowNode {
    let mut data = Map::new();
    data.insert("taskCount".into(), Value::from(parallel.task_count));
    data.insert("parallelId".into(), Value::from(parallel.path.to_string()));

    WorkflowNode {
        id: ctx.next_node_id("parallel"),
        node_type: NodeType::ParallelGroup,
        data,
        origin: Some(NodeOrigin::ParallelGroup {
            path: parallel.path.clone(),
        }),
    }
}

fn parallel_task_node(
    task: &Value,
    parallel: &ParallelMatch<'_>,
    index: usize,
    ctx: &mut TransformContext,
) -> WorkflowNode {
    let name = match task {
        Value::String(_) => task.clone(),
        Value::Object(map) => ["task", "name"]
            .iter()
            .filter_map(|field| map.get(*field))
            .find(|v| is_truthy(v))
            .cloned()
            .unwrap_or_else(|| Value::from(format!("Task {}", index + 1))),
        _ => Value::from(format!("Task {}", index + 1)),
    };

    let mut data = Map::new();
    data.insert("name".into(), name);
    data.insert("parentParallel".into(), Value::from(parallel.path.to_string()));
    data.insert("parallelIndex".into(), Value::from(index));

    WorkflowNode {
        id: ctx.next_node_id("parallelTask"),
        node_type: NodeType::Action,
        data,
        origin: Some(NodeOrigin::ParallelTask {
            group: parallel.path.clone(),
            index,
        }),
    }
}

/// One start trigger plus a generic node per top-level key other than
/// `id` and `name`.
fn nodes_from_raw_structure(ast: &AstNode<'_>, ctx: &mut TransformContext) -> Vec<WorkflowNode> {
    let mut nodes = Vec::new();

    let asset = ast
        .value
        .get("name")
        .filter(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| Value::from("Workflow"));

    let mut start = Map::new();
    start.insert("asset".into(), asset);
    start.insert("operator".into(), Value::from(""));
    start.insert("value".into(), Value::from(""));
    start.insert("type".into(), Value::from("StartTrigger"));
    nodes.push(WorkflowNode {
        id: ctx.next_node_id("start"),
        node_type: NodeType::Trigger,
        data: start,
        origin: Some(NodeOrigin::Fallback),
    });

    for child in &ast.children {
        if child.key == "id" || child.key == "name" {
            continue;
        }
        let value = match child.value {
            Value::Object(_) | Value::Array(_) => Value::from(child.value.to_string()),
            other => other.clone(),
        };

        let mut data = Map::new();
        data.insert("name".into(), Value::from(child.key.clone()));
        data.insert("value".into(), value);
        data.insert("type".into(), Value::from("DataNode"));
        nodes.push(WorkflowNode {
            id: ctx.next_node_id("data"),
            node_type: NodeType::Action,
            data,
            origin: Some(NodeOrigin::Fallback),
        });
    }

    nodes
}

fn path_value(path: &JsonPath) -> Value {
    serde_json::to_value(path).unwrap_or(Value::Null)
}
