//! `codefresh_abac_rules`: gitops abac rules over the graphql api.

use crate::types::{Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::{AbacAttribute, GitopsAbacRule};

pub struct AbacRulesResource;

fn to_rule(data: &ResourceData) -> Result<GitopsAbacRule> {
    Ok(GitopsAbacRule {
        id: data.id.clone(),
        account_id: None,
        entity_type: data.str("entity_type")?.to_string(),
        teams: data.str_list("teams")?,
        tags: data.str_list("tags")?,
        actions: data.str_list("actions")?,
        attributes: data
            .decode_attr::<Vec<AbacAttribute>>("attributes")?
            .unwrap_or_default(),
    })
}

#[async_trait]
impl Resource for AbacRulesResource {
    fn name(&self) -> &'static str {
        "codefresh_abac_rules"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_abac_rule(&to_rule(data)?).await?;
        let id = created
            .id
            .ok_or_else(|| anyhow!("created abac rule has no id"))?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(rule) = client.get_abac_rule_by_id(&id).await? else {
            tracing::warn!(id = %id, "abac rule not found remotely");
            data.clear_id();
            return Ok(());
        };
        data.set("entity_type", &rule.entity_type)?;
        data.set_string_set("teams", rule.teams)?;
        data.set_string_set("tags", rule.tags)?;
        data.set_string_set("actions", rule.actions)?;
        data.set("attributes", &rule.attributes)
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_abac_rule(&to_rule(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_abac_rule(data.require_id()?).await?;
        Ok(())
    }
}
