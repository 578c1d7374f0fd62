//! `codefresh_account` data source: lookup by `_id` or `name`.

use crate::types::{DataSource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;

pub struct AccountData;

#[async_trait]
impl DataSource for AccountData {
    fn name(&self) -> &'static str {
        "codefresh_account"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let account = match (data.get_str("_id"), data.get_str("name")) {
            (Some(id), _) => client.get_account_by_id(id).await?,
            (None, Some(name)) => client
                .find_account_by_name(name)
                .await?
                .ok_or_else(|| anyhow!("account {name} not found"))?,
            (None, None) => return Err(anyhow!("set either `_id` or `name`")),
        };
        let id = account
            .id
            .clone()
            .ok_or_else(|| anyhow!("account {} has no id", account.name))?;
        data.set("_id", &id)?;
        data.set("name", &account.name)?;
        data.set("admins", &account.admins)?;
        data.set_id(id);
        Ok(())
    }
}
