//! Analyze phase: JSON value → AST, pattern matches, complexity, flow type.
//!
//! Public API: `analyze(json) -> AnalysisResult`. The input is never
//! mutated and the result borrows from it.

pub mod ast;
pub mod complexity;
pub mod patterns;
pub mod types;

pub use patterns::{KeywordTable, PatternCategory};
pub use types::*;

use serde_json::Value;

/// Structural analyzer configured with a keyword table.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    keywords: KeywordTable,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(keywords: KeywordTable) -> Self {
        Analyzer { keywords }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn analyze<'a>(&self, json: &'a Value) -> AnalysisResult<'a> {
        let ast = ast::build_ast(json);
        let patterns = patterns::detect_patterns(json, &self.keywords);
        let complexity = complexity::calculate_complexity(&ast);
        let flow_type = complexity::determine_flow_type(&patterns);

        let metadata = AnalysisMetadata {
            node_count: ast.count_nodes(),
            max_depth: ast.max_depth(),
            has_cycles: !patterns.loops.is_empty(),
        };

        AnalysisResult {
            ast,
            patterns,
            complexity,
            flow_type,
            metadata,
        }
    }
}

/// Analyze with the default English keyword table.
pub fn analyze(json: &Value) -> AnalysisResult<'_> {
    Analyzer::new().analyze(json)
}
