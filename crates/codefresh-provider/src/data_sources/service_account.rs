//! `codefresh_service_account` data source: lookup by name.

use crate::resources::service_account::map_service_user;
use crate::types::{DataSource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;

pub struct ServiceAccountData;

#[async_trait]
impl DataSource for ServiceAccountData {
    fn name(&self) -> &'static str {
        "codefresh_service_account"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.str("name")?.to_string();
        let user = client
            .find_service_user_by_name(&name)
            .await?
            .ok_or_else(|| anyhow!("service account {name} not found"))?;
        let id = user
            .id
            .clone()
            .ok_or_else(|| anyhow!("service account {name} has no id"))?;
        map_service_user(data, &user)?;
        data.set_id(id);
        Ok(())
    }
}
