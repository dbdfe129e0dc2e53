//! Keyword-driven workflow pattern detection.
//!
//! Object keys are compared case-insensitively against a `KeywordTable`.
//! A key may belong to several categories (`if` is both a trigger and a
//! conditional); each matching category records its own entry.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use super::types::*;
use crate::ir::types::{BranchKind, JsonPath};

const COMPARISON_OPERATORS: [&str; 6] = [">", "<", ">=", "<=", "==", "!="];

/// Fields that mark an array element as a step of an action sequence.
const SEQUENCE_STEP_FIELDS: [&str; 3] = ["action", "step", "task"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternCategory {
    Trigger,
    Action,
    Conditional,
    Loop,
    Parallel,
}

impl PatternCategory {
    pub const ALL: [PatternCategory; 5] = [
        PatternCategory::Trigger,
        PatternCategory::Action,
        PatternCategory::Conditional,
        PatternCategory::Loop,
        PatternCategory::Parallel,
    ];
}

/// Category → lowercase keys. Extend it to recognise more vocabularies
/// without touching the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    keywords: BTreeMap<PatternCategory, BTreeSet<String>>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let mut table = KeywordTable::empty();
        table.extend(
            PatternCategory::Trigger,
            ["trigger", "when", "if", "on", "event", "condition", "start"],
        );
        table.extend(
            PatternCategory::Action,
            ["action", "actions", "steps", "tasks", "operations", "do", "then", "execute"],
        );
        table.extend(
            PatternCategory::Conditional,
            ["if", "then", "else", "switch", "case"],
        );
        table.extend(
            PatternCategory::Loop,
            ["forEach", "for", "while", "map", "loop", "iterate"],
        );
        table.extend(
            PatternCategory::Parallel,
            ["parallel", "concurrent", "all", "race"],
        );
        table
    }
}

impl KeywordTable {
    pub fn empty() -> Self {
        KeywordTable {
            keywords: BTreeMap::new(),
        }
    }

    pub fn extend<I, S>(&mut self, category: PatternCategory, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.keywords.entry(category).or_default();
        set.extend(keys.into_iter().map(|k| k.as_ref().to_lowercase()));
    }

    pub fn matches(&self, category: PatternCategory, key: &str) -> bool {
        self.keywords
            .get(&category)
            .is_some_and(|set| set.contains(&key.to_lowercase()))
    }

    pub fn keys(&self, category: PatternCategory) -> impl Iterator<Item = &str> {
        self.keywords
            .get(&category)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

/// Walk `json` and collect every pattern match. Recurses into every value,
/// matched or not.
pub fn detect_patterns<'a>(json: &'a Value, table: &KeywordTable) -> Patterns<'a> {
    let mut detected = Patterns::default();
    traverse(json, &JsonPath::root(), table, &mut detected);
    detected
}

fn traverse<'a>(value: &'a Value, path: &JsonPath, table: &KeywordTable, detected: &mut Patterns<'a>) {
    match value {
        Value::Array(items) => {
            if items.len() > 1 && is_action_sequence(items) {
                detected.sequences.push(SequenceMatch {
                    path: path.clone(),
                    items,
                    length: items.len(),
                });
            }
            for (i, item) in items.iter().enumerate() {
                traverse(item, &path.child_index(i), table, detected);
            }
        }
        Value::Object(obj) => {
            for (key, child) in obj {
                let child_path = path.child_key(key);
                record_matches(obj, key, child, &child_path, table, detected);
                traverse(child, &child_path, table, detected);
            }
        }
        _ => {}
    }
}

fn record_matches<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    value: &'a Value,
    path: &JsonPath,
    table: &KeywordTable,
    detected: &mut Patterns<'a>,
) {
    for category in PatternCategory::ALL {
        if !table.matches(category, key) {
            continue;
        }
        match category {
            PatternCategory::Trigger => detected.triggers.push(TriggerMatch {
                path: path.clone(),
                key: key.to_string(),
                value,
                trigger_type: infer_trigger_type(value),
            }),
            PatternCategory::Action => detected.actions.push(ActionMatch {
                path: path.clone(),
                key: key.to_string(),
                value,
                is_array: value.is_array(),
                count: value.as_array().map_or(1, Vec::len),
            }),
            PatternCategory::Conditional => detected.conditionals.push(ConditionalMatch {
                path: path.clone(),
                key: key.to_string(),
                value,
                branches: extract_branches(obj),
            }),
            PatternCategory::Loop => detected.loops.push(LoopMatch {
                path: path.clone(),
                key: key.to_string(),
                value,
                iteration_type: key.to_string(),
            }),
            PatternCategory::Parallel => detected.parallel.push(ParallelMatch {
                path: path.clone(),
                key: key.to_string(),
                value,
                task_count: value.as_array().map_or(0, Vec::len),
            }),
        }
    }
}

pub fn infer_trigger_type(value: &Value) -> TriggerType {
    let has_operator = |v: &Value| {
        v.as_str()
            .is_some_and(|s| COMPARISON_OPERATORS.iter().any(|op| s.contains(op)))
    };

    match value {
        Value::String(_) => TriggerType::Event,
        Value::Object(map) if map.values().any(has_operator) => TriggerType::Condition,
        Value::Array(items) if items.iter().any(has_operator) => TriggerType::Condition,
        Value::Object(_) | Value::Array(_) => TriggerType::Complex,
        _ => TriggerType::Simple,
    }
}

/// `then`/`else`/`case` siblings of the matched conditional key.
fn extract_branches(obj: &Map<String, Value>) -> Vec<Branch<'_>> {
    BranchKind::ALL
        .into_iter()
        .filter_map(|kind| {
            obj.get(kind.as_str())
                .filter(|v| is_truthy(v))
                .map(|value| Branch { kind, value })
        })
        .collect()
}

fn is_action_sequence(items: &[Value]) -> bool {
    items.iter().all(|item| match item {
        Value::String(_) => true,
        Value::Object(map) => SEQUENCE_STEP_FIELDS
            .iter()
            .any(|field| map.get(*field).is_some_and(is_truthy)),
        _ => false,
    })
}

/// Presence test used for optional fields: null, false, 0 and "" count as absent.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
