//! `codefresh_current_account` data source: the caller's active account.

use crate::types::{DataSource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;
use serde_json::json;

pub struct CurrentAccountData;

#[async_trait]
impl DataSource for CurrentAccountData {
    fn name(&self) -> &'static str {
        "codefresh_current_account"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let account = client.get_current_account().await?;
        let users: Vec<_> = account
            .users
            .iter()
            .map(|user| json!({ "id": user.id, "name": user.user_name, "email": user.email }))
            .collect();
        data.set("_id", &account.id)?;
        data.set("name", &account.name)?;
        data.set("users", users)?;
        data.set_id(account.id);
        Ok(())
    }
}
