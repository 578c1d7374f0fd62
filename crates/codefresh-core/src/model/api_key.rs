use serde::{Deserialize, Serialize};

/// api key metadata. the token itself is only returned on creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// body for `POST /auth/key` and `PATCH /auth/key/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl ApiKey {
    /// key id embedded in an issued token (`<id>.<secret>`).
    pub fn id_from_token(token: &str) -> Option<&str> {
        token.split_once('.').map(|(id, _)| id).filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_token_takes_prefix() {
        assert_eq!(ApiKey::id_from_token("abc123.secretpart"), Some("abc123"));
        assert_eq!(ApiKey::id_from_token("nodot"), None);
        assert_eq!(ApiKey::id_from_token(".secret"), None);
    }
}
