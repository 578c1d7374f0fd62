//! `codefresh_users` data source: every user on the platform.

use crate::types::{DataSource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;
use serde_json::json;

pub struct UsersData;

#[async_trait]
impl DataSource for UsersData {
    fn name(&self) -> &'static str {
        "codefresh_users"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let users: Vec<_> = client
            .get_all_users()
            .await?
            .into_iter()
            .map(|user| {
                json!({
                    "user_id": user.id,
                    "user_name": user.user_name,
                    "email": user.email,
                    "status": user.status,
                    "roles": user.roles,
                    "accounts": user.account_ids(),
                })
            })
            .collect();
        data.set("users", users)?;
        data.set_id("users");
        Ok(())
    }
}
