//! Trigger value parsing: `{"BTC": ">= 50000"}` → asset, operator, value.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::analyze::types::TriggerMatch;

static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([><=!]+)\s*(.+)$").expect("valid regex"));
static NUMBER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex")
});

pub const DEFAULT_OPERATOR: &str = "==";

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerCondition {
    pub asset: String,
    pub operator: String,
    pub value: Value,
}

/// Read the first entry of an object-valued trigger as `asset operator value`.
/// Non-object triggers keep the matched key as asset and the raw value.
pub fn parse_trigger(trigger: &TriggerMatch<'_>) -> TriggerCondition {
    let mut asset = None;
    let mut operator = None;
    let mut value = None;

    if let Value::Object(map) = trigger.value {
        if let Some((field, val)) = map.iter().next() {
            asset = Some(field.to_uppercase()).filter(|a| !a.is_empty());
            match val {
                Value::String(s) => match OPERATOR_RE.captures(s.trim()) {
                    Some(caps) => {
                        operator = Some(caps[1].to_string());
                        value = Some(number_or_string(&caps[2]));
                    }
                    None => value = Some(val.clone()),
                },
                other => value = Some(other.clone()),
            }
        }
    }

    TriggerCondition {
        asset: asset.unwrap_or_else(|| trigger.key.clone()),
        operator: operator.unwrap_or_else(|| DEFAULT_OPERATOR.to_string()),
        value: value.unwrap_or_else(|| trigger.value.clone()),
    }
}

/// Text with a leading number becomes that number (integral values as
/// integers), so `"50000 USD"` reads as `50000`. Anything else stays a string.
pub fn number_or_string(text: &str) -> Value {
    let trimmed = text.trim();
    let prefix = NUMBER_PREFIX_RE
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok());
    match prefix {
        Some(n) if n.is_finite() => number_value(n),
        _ => Value::String(trimmed.to_string()),
    }
}

pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::types::TriggerType;
    use crate::ir::types::JsonPath;
    use serde_json::json;

    fn trigger_match(value: &Value) -> TriggerMatch<'_> {
        TriggerMatch {
            path: JsonPath::root().child_key("trigger"),
            key: "trigger".into(),
            value,
            trigger_type: TriggerType::Condition,
        }
    }

    #[test]
    fn operator_and_numeric_value() {
        let value = json!({"btc": ">= 50000"});
        let parsed = parse_trigger(&trigger_match(&value));
        assert_eq!(parsed.asset, "BTC");
        assert_eq!(parsed.operator, ">=");
        assert_eq!(parsed.value, json!(50000));
    }

    #[test]
    fn fractional_and_textual_values() {
        let value = json!({"ETH": "< 0.5"});
        assert_eq!(parse_trigger(&trigger_match(&value)).value, json!(0.5));

        let value = json!({"status": "!= offline"});
        let parsed = parse_trigger(&trigger_match(&value));
        assert_eq!(parsed.operator, "!=");
        assert_eq!(parsed.value, json!("offline"));
    }

    #[test]
    fn leading_number_is_the_threshold() {
        let value = json!({"BTC": "> 50000 USD"});
        let parsed = parse_trigger(&trigger_match(&value));
        assert_eq!(parsed.operator, ">");
        assert_eq!(parsed.value, json!(50000));

        let value = json!({"ETH": ">= 1.5k"});
        assert_eq!(parse_trigger(&trigger_match(&value)).value, json!(1.5));

        assert_eq!(number_or_string("2e3 units"), json!(2000));
        assert_eq!(number_or_string("-.25"), json!(-0.25));
        assert_eq!(number_or_string("USD 50000"), json!("USD 50000"));
    }

    #[test]
    fn no_operator_defaults_to_equality() {
        let value = json!({"SOL": 150});
        let parsed = parse_trigger(&trigger_match(&value));
        assert_eq!(parsed.operator, "==");
        assert_eq!(parsed.value, json!(150));

        let value = json!({"SOL": "moon"});
        assert_eq!(parse_trigger(&trigger_match(&value)).value, json!("moon"));
    }

    #[test]
    fn scalar_trigger_keeps_key_and_raw_value() {
        let value = json!("price_drop");
        let parsed = parse_trigger(&trigger_match(&value));
        assert_eq!(parsed.asset, "trigger");
        assert_eq!(parsed.operator, "==");
        assert_eq!(parsed.value, json!("price_drop"));
    }
}
