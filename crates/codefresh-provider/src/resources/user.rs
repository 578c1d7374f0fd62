//! `codefresh_user`: users with account membership and roles.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::{NewUser, Personal, User};

pub struct UserResource;

fn to_new_user(data: &ResourceData) -> Result<NewUser> {
    Ok(NewUser {
        user_name: data.str("user_name")?.to_string(),
        email: data.str("email")?.to_string(),
        roles: data.str_list("roles")?,
        account: data.str_list("accounts")?,
        personal: data.decode_attr::<Personal>("personal")?,
    })
}

pub(crate) fn map_user(data: &mut ResourceData, user: &User) -> Result<()> {
    data.set("user_name", &user.user_name)?;
    data.set("email", &user.email)?;
    data.set_string_set("accounts", user.account_ids())?;
    data.set_string_set("roles", user.roles.clone())?;
    data.set_opt("status", user.status.as_deref())?;
    if data.get("personal").is_some() {
        data.set_opt("personal", user.personal.as_ref())?;
    }
    Ok(())
}

#[async_trait]
impl Resource for UserResource {
    fn name(&self) -> &'static str {
        "codefresh_user"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_user(&to_new_user(data)?).await?;
        let id = created.id.ok_or_else(|| anyhow!("created user has no id"))?;
        data.set_id(id.clone());
        if data.get_bool("activate").unwrap_or(false) {
            client.activate_user(&id).await?;
        }
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(user) = found(data, client.get_user_by_id(&id).await)? {
            map_user(data, &user)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        client.update_user(&id, &to_new_user(data)?).await?;
        let pending = data.prior.get("status").and_then(|value| value.as_str()) == Some("pending");
        if pending && data.get_bool("activate").unwrap_or(false) {
            client.activate_user(&id).await?;
        }
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_user(data.require_id()?).await?;
        Ok(())
    }
}
