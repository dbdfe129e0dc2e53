//! Analyzer output types.
//!
//! Everything here borrows from the analyzed `serde_json::Value`; an
//! `AnalysisResult` lives only as long as the document it describes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ir::types::{BranchKind, JsonPath};

// =============================================================================
// AST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Array,
    Object,
    String,
    Number,
    Boolean,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
        }
    }
}

/// One JSON value in context. Children are owned; the parent is referenced
/// by id only.
#[derive(Debug, Clone, Serialize)]
pub struct AstNode<'a> {
    pub id: String,
    /// Property name, `[index]` for array elements, `root` at the top.
    pub key: String,
    pub kind: ValueKind,
    pub value: &'a Value,
    pub parent: Option<String>,
    pub depth: usize,
    pub children: Vec<AstNode<'a>>,
}

impl AstNode<'_> {
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(AstNode::count_nodes).sum::<usize>()
    }

    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(AstNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }
}

// =============================================================================
// PATTERN MATCHES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Object value with a comparison operator in one of its string fields.
    Condition,
    /// Plain string value.
    Event,
    /// Object value without operator hints.
    Complex,
    Simple,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::Condition => "condition",
            TriggerType::Event => "event",
            TriggerType::Complex => "complex",
            TriggerType::Simple => "simple",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerMatch<'a> {
    pub path: JsonPath,
    pub key: String,
    pub value: &'a Value,
    pub trigger_type: TriggerType,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionMatch<'a> {
    pub path: JsonPath,
    pub key: String,
    pub value: &'a Value,
    pub is_array: bool,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Branch<'a> {
    pub kind: BranchKind,
    pub value: &'a Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionalMatch<'a> {
    pub path: JsonPath,
    pub key: String,
    pub value: &'a Value,
    pub branches: Vec<Branch<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoopMatch<'a> {
    pub path: JsonPath,
    pub key: String,
    pub value: &'a Value,
    /// The matched key as written in the source, e.g. `forEach`.
    pub iteration_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParallelMatch<'a> {
    pub path: JsonPath,
    pub key: String,
    pub value: &'a Value,
    pub task_count: usize,
}

/// An array whose elements all look like steps.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceMatch<'a> {
    pub path: JsonPath,
    pub items: &'a [Value],
    pub length: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Patterns<'a> {
    pub triggers: Vec<TriggerMatch<'a>>,
    pub actions: Vec<ActionMatch<'a>>,
    pub conditionals: Vec<ConditionalMatch<'a>>,
    pub loops: Vec<LoopMatch<'a>>,
    pub parallel: Vec<ParallelMatch<'a>>,
    pub sequences: Vec<SequenceMatch<'a>>,
}

// =============================================================================
// METRICS + CLASSIFICATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complexity {
    pub total_nodes: usize,
    pub max_depth: usize,
    pub branching_factor: usize,
    pub cyclomatic_complexity: usize,
    /// Composite score in `1..=10`.
    pub score: u8,
}

impl Complexity {
    /// Metrics of a single scalar document.
    pub fn baseline() -> Self {
        Complexity {
            total_nodes: 1,
            max_depth: 0,
            branching_factor: 0,
            cyclomatic_complexity: 1,
            score: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Iterative,
    Conditional,
    Parallel,
    Sequential,
    Simple,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Iterative => "iterative",
            FlowType::Conditional => "conditional",
            FlowType::Parallel => "parallel",
            FlowType::Sequential => "sequential",
            FlowType::Simple => "simple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub node_count: usize,
    pub max_depth: usize,
    /// Set when any loop pattern was found.
    pub has_cycles: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult<'a> {
    pub ast: AstNode<'a>,
    pub patterns: Patterns<'a>,
    pub complexity: Complexity,
    pub flow_type: FlowType,
    pub metadata: AnalysisMetadata,
}

/// Compact, owned view of an analysis for callers that only need the
/// classification (CLI `--analysis`, WASM `analyze_json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub flow_type: FlowType,
    pub complexity: Complexity,
    pub triggers: usize,
    pub actions: usize,
    pub conditionals: usize,
    pub loops: usize,
    pub parallel: usize,
    pub sequences: usize,
}

impl From<&AnalysisResult<'_>> for AnalysisSummary {
    fn from(analysis: &AnalysisResult<'_>) -> Self {
        let p = &analysis.patterns;
        AnalysisSummary {
            flow_type: analysis.flow_type,
            complexity: analysis.complexity,
            triggers: p.triggers.len(),
            actions: p.actions.len(),
            conditionals: p.conditionals.len(),
            loops: p.loops.len(),
            parallel: p.parallel.len(),
            sequences: p.sequences.len(),
        }
    }
}
