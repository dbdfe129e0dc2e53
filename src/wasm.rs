//! WASM entry points for the browser editor.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analyze::AnalysisSummary;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::layout::PositionedGraph;

/// Full conversion with the default configuration.
/// Returns `{status: "success", ...graph}` or `{status: "errors", errors}`.
#[wasm_bindgen]
pub fn convert_json(json: &str) -> JsValue {
    to_js(&convert_json_inner(json))
}

fn convert_json_inner(json: &str) -> ConvertResult {
    match crate::pipeline::convert(json, &PipelineConfig::default()) {
        Ok(graph) => ConvertResult::Success(graph),
        Err(e) => ConvertResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

/// Structural analysis only.
#[wasm_bindgen]
pub fn analyze_json(json: &str) -> JsValue {
    to_js(&analyze_json_inner(json))
}

fn analyze_json_inner(json: &str) -> AnalyzeResult {
    match crate::pipeline::analyze_text(json, &PipelineConfig::default()) {
        Ok(summary) => AnalyzeResult::Success(summary),
        Err(e) => AnalyzeResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

/// Maps such as node `data` become plain JS objects rather than `Map`s.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    /// Ready-to-display text for the editor's error banner.
    user_message: String,
    node_id: Option<String>,
}

impl From<PipelineError> for ErrorDto {
    fn from(e: PipelineError) -> Self {
        ErrorDto {
            user_message: e.user_message(),
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            node_id: e.node_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
enum ConvertResult {
    #[serde(rename = "success")]
    Success(PositionedGraph),
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
enum AnalyzeResult {
    #[serde(rename = "success")]
    Success(AnalysisSummary),
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_reports_parse_errors() {
        let value = serde_json::to_value(convert_json_inner("{")).unwrap();
        assert_eq!(value["status"], "errors");
        assert_eq!(value["errors"][0]["code"], "P001");
        assert!(
            value["errors"][0]["userMessage"]
                .as_str()
                .unwrap()
                .starts_with("Conversion Error: ")
        );
    }

    #[test]
    fn convert_success_is_tagged() {
        let value = serde_json::to_value(convert_json_inner(r#"{"name": "x"}"#)).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["id"], "workflow-x");
    }

    #[test]
    fn analyze_reports_flow_type() {
        let value = serde_json::to_value(analyze_json_inner(r#"{"forEach": [1, 2]}"#)).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["flowType"], "iterative");
    }
}
