//! Full conversion: parse → analyze → transform → validate → layout.

use serde_json::Value;
use tracing::{debug, warn};

use crate::analyze::{AnalysisSummary, Analyzer};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::ir::{validate_graph, WorkflowGraph};
use crate::layout::{optimize_for_large_graphs, Algorithm, LayoutEngine, PositionedGraph};
use crate::transform::transform;

/// Result of a conversion together with the analysis that produced it.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub graph: PositionedGraph,
    pub analysis: AnalysisSummary,
}

pub fn convert(json: &str, config: &PipelineConfig) -> Result<PositionedGraph, PipelineError> {
    convert_with_analysis(json, config).map(|c| c.graph)
}

pub fn convert_with_analysis(json: &str, config: &PipelineConfig) -> Result<Conversion, PipelineError> {
    let value = crate::parse::parse(json)?;
    convert_value(&value, config)
}

/// Run every stage after parsing. `value` is only read.
pub fn convert_value(value: &Value, config: &PipelineConfig) -> Result<Conversion, PipelineError> {
    let analyzer = Analyzer::with_keywords(config.keyword_table());
    let analysis = analyzer.analyze(value);
    debug!(
        flow_type = analysis.flow_type.as_str(),
        score = analysis.complexity.score,
        triggers = analysis.patterns.triggers.len(),
        actions = analysis.patterns.actions.len(),
        "analysis complete"
    );

    let mut graph = transform(&analysis);

    let violations = validate_graph(&graph);
    for violation in &violations {
        warn!(code = violation.code, "workflow graph failed validation: {}", violation.message);
    }
    if let Some(first) = violations.into_iter().next() {
        return Err(first.into());
    }

    if config.layout.optimize_large_graphs && optimize_for_large_graphs(&mut graph) {
        debug!(nodes = graph.nodes.len(), "tightened spacing for large graph");
    }

    let engine = LayoutEngine::new(config.layout.algorithm);
    let positioned = layout_with_fallback(&engine, &graph, config.layout.fallback)?;

    Ok(Conversion {
        graph: positioned,
        analysis: AnalysisSummary::from(&analysis),
    })
}

/// Lay out `graph`, retrying with the simple algorithm when `fallback` is
/// set and a non-simple engine fails.
pub fn layout_with_fallback(
    engine: &LayoutEngine,
    graph: &WorkflowGraph,
    fallback: bool,
) -> Result<PositionedGraph, PipelineError> {
    match engine.layout(graph) {
        Ok(positioned) => Ok(positioned),
        Err(e) if fallback && engine.algorithm() != Algorithm::Simple => {
            warn!("hierarchical layout failed, using simple layout: {}", e);
            Ok(LayoutEngine::simple().layout(graph)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Analysis only, without building a workflow.
pub fn analyze_text(json: &str, config: &PipelineConfig) -> Result<AnalysisSummary, PipelineError> {
    let value = crate::parse::parse(json)?;
    let analyzer = Analyzer::with_keywords(config.keyword_table());
    Ok(AnalysisSummary::from(&analyzer.analyze(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LayoutError, Phase};
    use crate::layout::{GraphOptions, LayeredLayout, LayoutGraph, LayoutPositions};

    struct Failing;

    impl LayeredLayout for Failing {
        fn compute_layout(&self, _: &LayoutGraph, _: &GraphOptions) -> Result<LayoutPositions, LayoutError> {
            Err(LayoutError::InvalidSpacing("rank_sep must be a non-negative number, got -1".into()))
        }
    }

    fn sample_graph() -> WorkflowGraph {
        let value = serde_json::json!({"trigger": "tick", "actions": ["buy BTC", "notify me"]});
        transform(&Analyzer::new().analyze(&value))
    }

    #[test]
    fn falls_back_to_simple_layout() {
        let engine = LayoutEngine::hierarchical().with_backend(Box::new(Failing));
        let positioned = layout_with_fallback(&engine, &sample_graph(), true).unwrap();
        assert_eq!(positioned.nodes.len(), 3);
        assert!(positioned.edges.iter().all(|e| e.points.is_empty()));
    }

    #[test]
    fn without_fallback_the_error_surfaces() {
        let engine = LayoutEngine::hierarchical().with_backend(Box::new(Failing));
        let err = layout_with_fallback(&engine, &sample_graph(), false).unwrap_err();
        assert_eq!(err.code, "L001");
        assert_eq!(err.phase, Phase::Layout);
    }

    #[test]
    fn conversion_reports_analysis() {
        let conversion =
            convert_with_analysis(r#"{"forEach": "portfolio"}"#, &PipelineConfig::default()).unwrap();
        assert_eq!(conversion.analysis.loops, 1);
        assert_eq!(conversion.graph.nodes.len(), 1);
    }

    #[test]
    fn config_keywords_reach_the_analyzer() {
        let config = PipelineConfig::from_toml_str("[keywords]\nloops = [\"jede\"]").unwrap();
        let summary = analyze_text(r#"{"jede": [1, 2]}"#, &config).unwrap();
        assert_eq!(summary.loops, 1);
    }
}
