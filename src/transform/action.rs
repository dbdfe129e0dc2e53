//! Action classification and free-text field extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::ir::types::NodeType;

static LEVERAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)x").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid regex"));

const TRADE_WORDS: [&str; 5] = ["trade", "buy", "sell", "long", "short"];
const NOTIFY_WORDS: [&str; 5] = ["notify", "alert", "email", "message", "send"];
const WEBHOOK_WORDS: [&str; 3] = ["webhook", "api", "http"];

/// Recognised tickers, checked in this order; the last hit wins.
const KNOWN_ASSETS: [&str; 7] = ["BTC", "ETH", "SOL", "USDT", "BNB", "XRP", "ADA"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Trade,
    Notification,
    Webhook,
    Generic,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Trade => "TradeAction",
            ActionType::Notification => "NotificationAction",
            ActionType::Webhook => "WebhookAction",
            ActionType::Generic => "GenericAction",
        }
    }
}

pub fn guess_action_type(content: &str) -> ActionType {
    let lower = content.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has_any(&TRADE_WORDS) {
        ActionType::Trade
    } else if has_any(&NOTIFY_WORDS) {
        ActionType::Notification
    } else if has_any(&WEBHOOK_WORDS) {
        ActionType::Webhook
    } else {
        ActionType::Generic
    }
}

/// Rendering type for an action type name. Only trade and notification
/// actions have dedicated components.
pub fn node_type_for(action_type: &str) -> NodeType {
    if action_type == ActionType::Trade.as_str() {
        NodeType::TradeAction
    } else if action_type == ActionType::Notification.as_str() {
        NodeType::Notification
    } else {
        NodeType::Action
    }
}

/// Pull side, asset, leverage and an email recipient out of a free-text action.
pub fn extract_action_data(text: &str) -> Map<String, Value> {
    let mut data = Map::new();
    let lower = text.to_lowercase();
    let upper = text.to_uppercase();

    if lower.contains("long") || lower.contains("buy") {
        data.insert("side".into(), Value::from("long"));
    }
    if lower.contains("short") || lower.contains("sell") {
        data.insert("side".into(), Value::from("short"));
    }

    if let Some(asset) = KNOWN_ASSETS.iter().rev().find(|a| upper.contains(*a)) {
        data.insert("asset".into(), Value::from(*asset));
    }

    if let Some(leverage) = LEVERAGE_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<u64>().ok())
    {
        data.insert("leverage".into(), Value::from(leverage));
    }

    if let Some(email) = EMAIL_RE.find(text) {
        data.insert("to".into(), Value::from(email.as_str()));
        data.insert("channel".into(), Value::from("email"));
    }

    data
}
