//! `codefresh_team`: teams and their membership.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::Team;

pub struct TeamResource;

/// fields the team api only accepts at creation.
const REPLACE_ON: &[&str] = &["type", "account_id", "tags"];

pub(crate) fn map_team(data: &mut ResourceData, team: &Team) -> Result<()> {
    data.set("name", &team.name)?;
    data.set_opt("type", team.team_type.as_deref())?;
    data.set_opt("account_id", team.account.as_deref())?;
    data.set_string_set("tags", team.tags.clone())?;
    data.set_string_set("users", team.user_ids())
}

#[async_trait]
impl Resource for TeamResource {
    fn name(&self) -> &'static str {
        "codefresh_team"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let team = Team {
            name: data.str("name")?.to_string(),
            team_type: data.get_str("type").map(str::to_string),
            account: data.get_str("account_id").map(str::to_string),
            tags: data.str_list("tags")?,
            ..Default::default()
        };
        let created = client.create_team(&team).await?;
        let id = created.id.ok_or_else(|| anyhow!("created team has no id"))?;
        data.set_id(id.clone());
        if data.get("users").is_some() {
            client.update_team_users(&id, &data.str_list("users")?).await?;
        }
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(team) = found(data, client.get_team_by_id(&id).await)? {
            map_team(data, &team)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(field) = data.first_changed(REPLACE_ON) {
            tracing::info!(team_id = %id, field, "team field changed; replacing team");
            client.delete_team(&id).await?;
            data.clear_id();
            return self.create(client, data).await;
        }
        let name = data.str("name")?.to_string();
        let previous = data.prior.get("name").and_then(|value| value.as_str());
        if previous != Some(name.as_str()) {
            client.rename_team(&id, &name).await?;
        }
        client.update_team_users(&id, &data.str_list("users")?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_team(data.require_id()?).await?;
        Ok(())
    }
}
