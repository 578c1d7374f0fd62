//! `codefresh_project`: pipeline projects with tags and variables.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::{Project, ProjectVariable};
use std::collections::BTreeMap;

pub struct ProjectResource;

fn to_project(data: &ResourceData) -> Result<Project> {
    let variables = data
        .decode_attr::<BTreeMap<String, String>>("variables")?
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| ProjectVariable { key, value })
        .collect();
    Ok(Project {
        id: data.id.clone(),
        project_name: data.str("name")?.to_string(),
        tags: data.str_list("tags")?,
        variables,
    })
}

pub(crate) fn map_project(data: &mut ResourceData, project: &Project) -> Result<()> {
    data.set("name", &project.project_name)?;
    data.set_string_set("tags", project.tags.clone())?;
    let variables: BTreeMap<&str, &str> = project
        .variables
        .iter()
        .map(|variable| (variable.key.as_str(), variable.value.as_str()))
        .collect();
    data.set("variables", variables)
}

#[async_trait]
impl Resource for ProjectResource {
    fn name(&self) -> &'static str {
        "codefresh_project"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_project(&to_project(data)?).await?;
        let id = created
            .id
            .ok_or_else(|| anyhow!("created project has no id"))?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(project) = found(data, client.get_project_by_id(&id).await)? {
            map_project(data, &project)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_project(&to_project(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_project(data.require_id()?).await?;
        Ok(())
    }
}
