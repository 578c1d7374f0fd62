//! `codefresh_step_types` data source.

use crate::resources::step_types::map_step_types;
use crate::types::{DataSource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;

pub struct StepTypesData;

#[async_trait]
impl DataSource for StepTypesData {
    fn name(&self) -> &'static str {
        "codefresh_step_types"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.str("name")?.to_string();
        let step_types = client.get_step_types(&name).await?;
        map_step_types(data, &step_types)?;
        data.set_id(name);
        Ok(())
    }
}
