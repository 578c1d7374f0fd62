//! `codefresh_step_types`: custom step types defined by a yaml document.

use crate::types::{found, Resource, ResourceData};
use anyhow::{Context, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::StepTypes;
use codefresh_core::yaml_equivalent;

pub struct StepTypesResource;

fn to_step_types(data: &ResourceData) -> Result<StepTypes> {
    let mut step_types: StepTypes = serde_yaml::from_str(data.str("yaml")?)
        .context("step type yaml does not describe a step type")?;
    step_types.metadata.name = data.str("name")?.to_string();
    Ok(step_types)
}

pub(crate) fn map_step_types(data: &mut ResourceData, step_types: &StepTypes) -> Result<()> {
    data.set("name", &step_types.metadata.name)?;
    data.set_opt("version", step_types.metadata.version.as_deref())?;
    let remote = serde_yaml::to_string(step_types)?;
    let keep = data
        .get_str("yaml")
        .is_some_and(|configured| yaml_equivalent(configured, &remote));
    if !keep {
        data.set("yaml", remote)?;
    }
    Ok(())
}

#[async_trait]
impl Resource for StepTypesResource {
    fn name(&self) -> &'static str {
        "codefresh_step_types"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_step_types(&to_step_types(data)?).await?;
        data.set_id(created.metadata.name);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.require_id()?.to_string();
        if let Some(step_types) = found(data, client.get_step_types(&name).await)? {
            map_step_types(data, &step_types)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_step_types(&to_step_types(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_step_types(data.require_id()?).await?;
        Ok(())
    }
}
