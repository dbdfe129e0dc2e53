//! End-to-end conversion: text → positioned workflow graph.

#[allow(dead_code)]
mod helpers;

use jsonflow::config::PipelineConfig;
use jsonflow::error::Phase;
use jsonflow::ir::{EdgeKind, NodeType};
use jsonflow::layout::Algorithm;
use jsonflow::pipeline::{convert, convert_with_analysis};
use serde_json::json;

#[test]
fn btc_alert_converts() {
    let graph = helpers::convert(helpers::BTC_ALERT);

    assert_eq!(graph.id, "workflow-btc-alert");
    assert_eq!(graph.name, "BTC Alert");

    let triggers: Vec<_> = graph.nodes.iter().filter(|n| n.node_type == NodeType::Trigger).collect();
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].data["asset"], "BTC");
    assert_eq!(triggers[0].data["operator"], ">=");
    assert_eq!(triggers[0].data["value"], json!(50000));

    let notifications: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::Notification)
        .collect();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].data["to"], "a@b.com");

    let starts: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::TriggerToAction)
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].source, triggers[0].id);
    assert_eq!(starts[0].target, notifications[0].id);

    assert!(graph.bounds.width > 0.0);
    assert!(graph.bounds.height > 0.0);
}

#[test]
fn btc_alert_serializes_for_the_editor() {
    let graph = helpers::convert(helpers::BTC_ALERT);
    let value = serde_json::to_value(&graph).unwrap();

    assert_eq!(value["nodes"][0]["type"], "trigger");
    assert_eq!(value["nodes"][1]["type"], "notification");
    assert_eq!(value["edges"][0]["kind"], "trigger-to-action");
    insta::assert_json_snapshot!(graph.edges[0].style, @r##"
    {
      "stroke": "#a855f7",
      "strokeWidth": 2
    }
    "##);
    assert_eq!(value["metadata"]["flowType"], "simple");
    assert!(value["bounds"]["minX"].is_number());
}

#[test]
fn invalid_json_is_a_conversion_error() {
    let err = convert("{\"trigger\": ", &PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, "P001");
    assert_eq!(err.phase, Phase::Parse);
    assert!(err.user_message().starts_with("Conversion Error: Failed to parse workflow JSON"));
    assert!(err.to_string().starts_with("[Parse:P001]"));
}

#[test]
fn simple_algorithm_from_config() {
    let config = PipelineConfig::from_toml_str("[layout]\nalgorithm = \"simple\"").unwrap();
    assert_eq!(config.layout.algorithm, Algorithm::Simple);

    let graph = convert(helpers::BTC_ALERT, &config).unwrap();
    assert_eq!(graph.nodes[0].position.x, 100.0);
    assert_eq!(graph.nodes[0].position.y, 100.0);
    assert!(graph.edges.iter().all(|e| e.points.is_empty()));
}

#[test]
fn large_graph_pass_runs_when_enabled() {
    let steps: Vec<String> = (0..60).map(|i| format!("step {}", i)).collect();
    let text = json!({"steps": steps}).to_string();

    let mut config = PipelineConfig::default();
    config.layout.optimize_large_graphs = true;
    let graph = convert(&text, &config).unwrap();
    assert_eq!(graph.layout.spacing.node, [120.0, 80.0]);

    let untouched = convert(&text, &PipelineConfig::default()).unwrap();
    assert_ne!(untouched.layout.spacing.node, [120.0, 80.0]);
}

#[test]
fn analysis_comes_with_the_graph() {
    let conversion = convert_with_analysis(
        r#"{"if": "price > 100", "then": "sell BTC", "else": "hold"}"#,
        &PipelineConfig::default(),
    )
    .unwrap();
    assert_eq!(conversion.analysis.conditionals, 3);
    assert_eq!(conversion.analysis.triggers, 1);

    let decisions = conversion
        .graph
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::Decision)
        .count();
    assert_eq!(decisions, 3);
}

#[test]
fn scalar_documents_still_convert() {
    let graph = helpers::convert("42");
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].id, "start-1");
    assert_eq!(graph.name, "Generated Workflow");
}

#[test]
fn deeply_nested_text_converts() {
    let conversion =
        convert_with_analysis(&helpers::nested_text(200), &PipelineConfig::default()).unwrap();
    assert_eq!(conversion.analysis.complexity.max_depth, 201);
    assert_eq!(conversion.analysis.complexity.score, 10);
    assert!(!conversion.graph.nodes.is_empty());
}

#[test]
fn nesting_past_the_limit_is_a_parse_error() {
    let err = convert(&helpers::nested_text(600), &PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, "P001");
    assert_eq!(err.phase, Phase::Parse);
}
