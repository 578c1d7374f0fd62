use serde::{Deserialize, Serialize};

/// team reference on a service user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceUserTeam {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// machine identity owned by an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUser {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "userName")]
    pub name: String,
    #[serde(default)]
    pub teams: Vec<ServiceUserTeam>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl ServiceUser {
    pub fn team_ids(&self) -> Vec<String> {
        self.teams.iter().map(|team| team.id.clone()).collect()
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == "Admin")
    }
}

/// create/update body for service users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUserRequest {
    #[serde(rename = "userName")]
    pub name: String,
    #[serde(default)]
    pub team_ids: Vec<String>,
    #[serde(default)]
    pub assign_admin_role: bool,
}
