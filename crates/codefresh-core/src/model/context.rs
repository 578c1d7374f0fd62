use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// context metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextMetadata {
    pub name: String,
}

/// context payload; `data` shape depends on `type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    #[serde(rename = "type")]
    pub context_type: String,
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

/// shared configuration or secret context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub metadata: ContextMetadata,
    pub spec: ContextSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Context {
    pub const CONFIG: &'static str = "config";
    pub const SECRET: &'static str = "secret";
    pub const YAML: &'static str = "yaml";
    pub const SECRET_YAML: &'static str = "secret-yaml";

    /// true for context types whose data is a yaml document.
    pub fn is_yaml(&self) -> bool {
        matches!(self.spec.context_type.as_str(), Self::YAML | Self::SECRET_YAML)
    }
}
