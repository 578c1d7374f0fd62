//! `codefresh_registry` data source: lookup by name.

use crate::resources::registry::map_registry;
use crate::types::{DataSource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;

pub struct RegistryData;

#[async_trait]
impl DataSource for RegistryData {
    fn name(&self) -> &'static str {
        "codefresh_registry"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.str("name")?.to_string();
        let registry = client
            .find_registry_by_name(&name)
            .await?
            .ok_or_else(|| anyhow!("registry {name} not found"))?;
        let id = registry
            .id
            .clone()
            .ok_or_else(|| anyhow!("registry {name} has no id"))?;
        map_registry(data, &registry)?;
        data.set_id(id);
        Ok(())
    }
}
