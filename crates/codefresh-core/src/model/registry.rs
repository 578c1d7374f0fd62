use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// docker registry integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub behind_firewall: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_registry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_prefix: Option<String>,
    /// provider-specific fields (region, access keys, keyfile, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
