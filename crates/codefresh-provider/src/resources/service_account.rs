//! `codefresh_service_account`: service users with team assignments.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::{ServiceUser, ServiceUserRequest};

pub struct ServiceAccountResource;

fn to_request(data: &ResourceData) -> Result<ServiceUserRequest> {
    Ok(ServiceUserRequest {
        name: data.str("name")?.to_string(),
        team_ids: data.str_list("assigned_teams")?,
        assign_admin_role: data.get_bool("assign_admin_role").unwrap_or(false),
    })
}

pub(crate) fn map_service_user(data: &mut ResourceData, user: &ServiceUser) -> Result<()> {
    data.set("name", &user.name)?;
    data.set_string_set("assigned_teams", user.team_ids())?;
    data.set("assign_admin_role", user.is_admin())
}

#[async_trait]
impl Resource for ServiceAccountResource {
    fn name(&self) -> &'static str {
        "codefresh_service_account"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_service_user(&to_request(data)?).await?;
        let id = created
            .id
            .ok_or_else(|| anyhow!("created service account has no id"))?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(user) = found(data, client.get_service_user_by_id(&id).await)? {
            map_service_user(data, &user)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        client.update_service_user(&id, &to_request(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_service_user(data.require_id()?).await?;
        Ok(())
    }
}
