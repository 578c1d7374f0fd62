use serde::{Deserialize, Serialize};

/// abac permission rule for classic resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub team: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_resource: Option<String>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
