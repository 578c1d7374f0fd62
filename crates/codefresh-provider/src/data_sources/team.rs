//! `codefresh_team` data source: lookup by name.

use crate::resources::team::map_team;
use crate::types::{DataSource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;

pub struct TeamData;

#[async_trait]
impl DataSource for TeamData {
    fn name(&self) -> &'static str {
        "codefresh_team"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.str("name")?.to_string();
        let team = client
            .find_team_by_name(&name)
            .await?
            .ok_or_else(|| anyhow!("team {name} not found"))?;
        let id = team
            .id
            .clone()
            .ok_or_else(|| anyhow!("team {name} has no id"))?;
        map_team(data, &team)?;
        data.set_id(id);
        Ok(())
    }
}
