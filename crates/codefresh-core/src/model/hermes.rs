use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// hermes trigger event (cron, registry, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl TriggerEvent {
    /// build a codefresh cron event.
    pub fn cron(expression: &str, message: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert("expression".to_string(), expression.to_string());
        values.insert("message".to_string(), message.to_string());
        Self {
            event_type: "cron".to_string(),
            kind: "codefresh".to_string(),
            secret: Some("!generate".to_string()),
            values,
            description: None,
            uri: None,
        }
    }
}

/// link between a hermes event and a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HermesTrigger {
    pub event: String,
    pub pipeline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<serde_json::Value>,
}
