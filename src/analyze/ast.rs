//! Tree construction over a JSON value.

use serde_json::Value;

use super::types::{AstNode, ValueKind};

/// Build the AST for `value`. Ids are `ast-N`, numbered in visit order
/// starting from 1 on every call.
pub fn build_ast(value: &Value) -> AstNode<'_> {
    let mut counter = 0;
    build_node(value, "root".to_string(), None, 0, &mut counter)
}

fn build_node<'a>(
    value: &'a Value,
    key: String,
    parent: Option<&str>,
    depth: usize,
    counter: &mut usize,
) -> AstNode<'a> {
    *counter += 1;
    let id = format!("ast-{}", counter);

    let children = match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| build_node(item, format!("[{}]", i), Some(id.as_str()), depth + 1, counter))
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| build_node(v, k.clone(), Some(id.as_str()), depth + 1, counter))
            .collect(),
        _ => Vec::new(),
    };

    AstNode {
        kind: ValueKind::of(value),
        key,
        value,
        parent: parent.map(str::to_string),
        depth,
        children,
        id,
    }
}
