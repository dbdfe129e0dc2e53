//! Unified pipeline error type used across all phases.

use thiserror::Error;

use crate::ir::validate::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Config,
    Validate,
    Layout,
    Output,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Config => write!(f, "Config"),
            Phase::Validate => write!(f, "Validate"),
            Phase::Layout => write!(f, "Layout"),
            Phase::Output => write!(f, "Output"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("[{phase}:{code}] {message}{}", node_suffix(.node_id))]
pub struct PipelineError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

fn node_suffix(node_id: &Option<String>) -> String {
    match node_id {
        Some(id) => format!(" (node '{}')", id),
        None => String::new(),
    }
}

/// Failures raised by a layout backend. The engine never falls back on its
/// own; callers decide whether to retry with the simple algorithm.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    #[error("Edge '{edge_id}' references unknown node '{node_id}'")]
    UnknownEndpoint { edge_id: String, node_id: String },

    #[error("Invalid spacing: {0}")]
    InvalidSpacing(String),

    #[error("Layout produced no position for node '{0}'")]
    MissingPosition(String),

    #[error("Cycle left after edge reversal at node '{0}'")]
    CycleRemaining(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<ValidationError> for PipelineError {
    fn from(e: ValidationError) -> Self {
        PipelineError {
            code: e.code.to_string(),
            phase: Phase::Validate,
            message: e.message,
            node_id: e.node_id,
        }
    }
}

impl From<LayoutError> for PipelineError {
    fn from(e: LayoutError) -> Self {
        let node_id = match &e {
            LayoutError::UnknownEndpoint { node_id, .. } => Some(node_id.clone()),
            LayoutError::MissingPosition(id) | LayoutError::CycleRemaining(id) => Some(id.clone()),
            LayoutError::InvalidSpacing(_) => None,
        };
        PipelineError {
            code: "L001".into(),
            phase: Phase::Layout,
            message: e.to_string(),
            node_id,
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError {
            code: "C001".into(),
            phase: Phase::Config,
            message: e.to_string(),
            node_id: None,
        }
    }
}

impl PipelineError {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        PipelineError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        PipelineError {
            code: "O001".into(),
            phase: Phase::Output,
            message: message.into(),
            node_id: None,
        }
    }

    /// Message shown to the user by the editor front-end.
    pub fn user_message(&self) -> String {
        format!("Conversion Error: {}", self.message)
    }
}
