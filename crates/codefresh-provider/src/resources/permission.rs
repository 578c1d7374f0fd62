//! `codefresh_permission`: team permission rules on classic resources.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::Permission;

pub struct PermissionResource;

fn to_permission(data: &ResourceData) -> Result<Permission> {
    Ok(Permission {
        id: data.id.clone(),
        team: data.str("team")?.to_string(),
        resource: data.str("resource")?.to_string(),
        related_resource: data.get_str("related_resource").map(str::to_string),
        action: data.str("action")?.to_string(),
        account: None,
        tags: data.str_list("tags")?,
    })
}

#[async_trait]
impl Resource for PermissionResource {
    fn name(&self) -> &'static str {
        "codefresh_permission"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_permission(&to_permission(data)?).await?;
        let id = created
            .id
            .ok_or_else(|| anyhow!("created permission has no id"))?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(permission) = found(data, client.get_permission_by_id(&id).await)? {
            data.set("team", &permission.team)?;
            data.set("resource", &permission.resource)?;
            data.set_opt("related_resource", permission.related_resource.as_deref())?;
            data.set("action", &permission.action)?;
            data.set_string_set("tags", permission.tags)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_permission(&to_permission(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_permission(data.require_id()?).await?;
        Ok(())
    }
}
