//! `codefresh_account_admins`: the full admin set of one account.

use crate::types::{found, Resource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;

pub struct AccountAdminsResource;

#[async_trait]
impl Resource for AccountAdminsResource {
    fn name(&self) -> &'static str {
        "codefresh_account_admins"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let account_id = data.str("account_id")?.to_string();
        client
            .update_account_admins(&account_id, &data.str_list("users")?)
            .await?;
        data.set_id(account_id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let account_id = data.require_id()?.to_string();
        if let Some(admins) = found(data, client.get_account_admins(&account_id).await)? {
            data.set("account_id", &account_id)?;
            data.set_string_set("users", admins)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let account_id = data.require_id()?.to_string();
        client
            .update_account_admins(&account_id, &data.str_list("users")?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_account_admins(data.require_id()?, &[]).await?;
        Ok(())
    }
}
