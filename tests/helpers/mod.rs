use jsonflow::analyze::analyze;
use jsonflow::config::PipelineConfig;
use jsonflow::ir::*;
use jsonflow::layout::PositionedGraph;
use jsonflow::transform::transform;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// =============================================================================
// Pipeline shortcuts
// =============================================================================

/// Analyze + transform a JSON value with the default keyword table.
pub fn workflow(value: &Value) -> WorkflowGraph {
    transform(&analyze(value))
}

/// Full conversion with the default configuration.
pub fn convert(text: &str) -> PositionedGraph {
    jsonflow::pipeline::convert(text, &PipelineConfig::default()).unwrap()
}

pub fn edges_of_kind(graph: &WorkflowGraph, kind: EdgeKind) -> Vec<&WorkflowEdge> {
    graph.edges.iter().filter(|e| e.kind == kind).collect()
}

// =============================================================================
// Inputs
// =============================================================================

/// `{"level": {"level": ... {"leaf": true}}}` nested `depth` objects deep.
pub fn nested(depth: usize) -> Value {
    let mut value = json!({"leaf": true});
    for _ in 0..depth {
        let mut map = Map::new();
        map.insert("level".into(), value);
        value = Value::Object(map);
    }
    value
}

/// `nested(depth)` as JSON text, for tests that go through the parser.
pub fn nested_text(depth: usize) -> String {
    nested(depth).to_string()
}

/// Flat object with `width` numeric keys that match no keyword.
pub fn flat(width: usize) -> Value {
    let mut map = Map::new();
    for i in 0..width {
        map.insert(format!("field{}", i), Value::from(i));
    }
    Value::Object(map)
}

pub const BTC_ALERT: &str = r#"{
    "name": "BTC Alert",
    "trigger": {"BTC": ">=50000"},
    "actions": [{"type": "NotificationAction", "channel": "email", "to": "a@b.com"}]
}"#;

/// Graph of `count` generic action nodes chained in order.
pub fn action_chain(count: usize) -> WorkflowGraph {
    let mut steps = Vec::new();
    for i in 0..count {
        steps.push(Value::from(format!("step {}", i)));
    }
    workflow(&json!({ "steps": steps }))
}

/// Arbitrary JSON documents, biased toward keys the analyzer recognises.
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(6, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("trigger".to_string()),
                    Just("actions".to_string()),
                    Just("if".to_string()),
                    Just("then".to_string()),
                    Just("parallel".to_string()),
                    Just("forEach".to_string()),
                    "[a-z]{1,8}",
                ],
                inner,
                0..8,
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}
