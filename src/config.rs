//! Pipeline configuration, loaded from TOML.
//!
//! ```toml
//! [layout]
//! algorithm = "simple"
//! fallback = true
//! optimize_large_graphs = false
//!
//! [keywords]
//! triggers = ["wenn"]
//! actions = ["aktion"]
//! ```
//!
//! Missing sections and keys take their defaults. Keyword overrides add to
//! the built-in English table rather than replacing it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyze::{KeywordTable, PatternCategory};
use crate::error::ConfigError;
use crate::layout::Algorithm;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: LayoutSettings,
    pub keywords: KeywordOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub algorithm: Algorithm,
    /// Retry with the simple layout when the hierarchical one fails.
    pub fallback: bool,
    pub optimize_large_graphs: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            algorithm: Algorithm::Hierarchical,
            fallback: true,
            optimize_large_graphs: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordOverrides {
    pub triggers: Vec<String>,
    pub actions: Vec<String>,
    pub conditionals: Vec<String>,
    pub loops: Vec<String>,
    pub parallel: Vec<String>,
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Built-in keyword table plus the configured extra keys.
    pub fn keyword_table(&self) -> KeywordTable {
        let mut table = KeywordTable::default();
        let extra = &self.keywords;
        table.extend(PatternCategory::Trigger, &extra.triggers);
        table.extend(PatternCategory::Action, &extra.actions);
        table.extend(PatternCategory::Conditional, &extra.conditionals);
        table.extend(PatternCategory::Loop, &extra.loops);
        table.extend(PatternCategory::Parallel, &extra.parallel);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(config.layout.fallback);
        assert!(!config.layout.optimize_large_graphs);
        assert_eq!(config.layout.algorithm, Algorithm::Hierarchical);
    }

    #[test]
    fn reads_layout_section() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [layout]
            algorithm = "simple"
            fallback = false
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.algorithm, Algorithm::Simple);
        assert!(!config.layout.fallback);
    }

    #[test]
    fn extra_keywords_extend_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [keywords]
            triggers = ["Wenn"]
            "#,
        )
        .unwrap();
        let table = config.keyword_table();
        assert!(table.matches(PatternCategory::Trigger, "wenn"));
        assert!(table.matches(PatternCategory::Trigger, "when"));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = PipelineConfig::from_toml_str("[layout]\nalgorithm = \"radial\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineConfig::from_file("/nonexistent/jsonflow.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
