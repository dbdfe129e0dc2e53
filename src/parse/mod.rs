//! Parse phase: JSON text → `serde_json::Value`.
//!
//! Object key order is preserved so pattern detection and node numbering
//! follow the order keys appear in the source. serde_json's own 128-level
//! recursion limit is replaced by `MAX_NESTING_DEPTH`, checked on the raw
//! text before deserializing.

use serde::Deserialize;
use serde_json::Value;

use crate::error::PipelineError;

/// Deepest array/object nesting accepted. Every later phase walks the
/// document recursively, so this bounds their stack use as well.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Deserialize arbitrary JSON text. Any well-formed JSON document is
/// accepted, including bare scalars, up to `MAX_NESTING_DEPTH` levels.
pub fn parse(json: &str) -> Result<Value, PipelineError> {
    let depth = nesting_depth(json);
    if depth > MAX_NESTING_DEPTH {
        return Err(PipelineError::parse(
            "P001",
            format!(
                "Failed to parse workflow JSON: nesting depth {} exceeds the limit of {}",
                depth, MAX_NESTING_DEPTH
            ),
        ));
    }

    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    Value::deserialize(&mut de)
        .and_then(|value| de.end().map(|()| value))
        .map_err(|e| PipelineError::parse("P001", format!("Failed to parse workflow JSON: {}", e)))
}

/// Maximum bracket nesting in `text`, ignoring brackets inside strings.
/// Malformed text still gets a number; the deserializer reports the error.
fn nesting_depth(text: &str) -> usize {
    let mut depth: usize = 0;
    let mut max = 0;
    let mut in_string = false;
    let mut escaped = false;

    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}
