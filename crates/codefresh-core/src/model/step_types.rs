use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// step type metadata; only the name and version are interpreted locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepTypesMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// custom pipeline step type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepTypes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub metadata: StepTypesMetadata,
    #[serde(default)]
    pub spec: BTreeMap<String, Value>,
}
