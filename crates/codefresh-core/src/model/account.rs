use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// collaborator quota for an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collaborators {
    #[serde(default)]
    pub limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<i64>,
}

/// build log retention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRetention {
    #[serde(default)]
    pub weeks: i64,
}

/// account limits. key issuance requires collaborators to be configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Collaborators>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_retention: Option<DataRetention>,
}

/// build concurrency settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default)]
    pub parallel: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<i64>,
}

/// codefresh account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    #[serde(
        default,
        deserialize_with = "crate::features::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub features: BTreeMap<String, bool>,
}

impl Account {
    /// true when the account carries a collaborator limit.
    pub fn has_collaborators(&self) -> bool {
        self.limits
            .as_ref()
            .and_then(|limits| limits.collaborators.as_ref())
            .is_some()
    }
}

/// account entry as listed on the current user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentAccountRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// response of `GET /user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_account_name: Option<String>,
    #[serde(default)]
    pub account: Vec<CurrentAccountRef>,
}

/// the active account of the calling identity, with its users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub users: Vec<crate::model::TeamUser>,
}

impl CurrentUser {
    /// pick the active account entry, if the user has one.
    pub fn active_account(&self) -> Option<&CurrentAccountRef> {
        let active = self.active_account_name.as_deref()?;
        self.account.iter().find(|account| account.name == active)
    }
}
