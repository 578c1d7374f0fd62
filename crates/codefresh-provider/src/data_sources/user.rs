//! `codefresh_user` data source: lookup by email.

use crate::resources::user::map_user;
use crate::types::{DataSource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;

pub struct UserData;

#[async_trait]
impl DataSource for UserData {
    fn name(&self) -> &'static str {
        "codefresh_user"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let email = data.str("email")?.to_string();
        let user = client
            .get_all_users()
            .await?
            .into_iter()
            .find(|user| user.email == email)
            .ok_or_else(|| anyhow!("user {email} not found"))?;
        let id = user
            .id
            .clone()
            .ok_or_else(|| anyhow!("user {email} has no id"))?;
        map_user(data, &user)?;
        data.set("user_id", &id)?;
        data.set_id(id);
        Ok(())
    }
}
