//! `codefresh_project` data source: lookup by name.

use crate::resources::project::map_project;
use crate::types::{DataSource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;

pub struct ProjectData;

#[async_trait]
impl DataSource for ProjectData {
    fn name(&self) -> &'static str {
        "codefresh_project"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.str("name")?.to_string();
        let project = client.get_project_by_name(&name).await?;
        let id = project
            .id
            .clone()
            .ok_or_else(|| anyhow!("project {name} has no id"))?;
        map_project(data, &project)?;
        data.set_id(id);
        Ok(())
    }
}
