//! `codefresh_registry`: docker registry integrations.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::Registry;
use serde_json::Value;
use std::collections::BTreeMap;

pub struct RegistryResource;

fn to_registry(data: &ResourceData) -> Result<Registry> {
    Ok(Registry {
        id: data.id.clone(),
        name: data.str("name")?.to_string(),
        kind: data.str("kind")?.to_string(),
        domain: data.get_str("domain").map(str::to_string),
        username: data.get_str("username").map(str::to_string),
        password: data.get_str("password").map(str::to_string),
        primary: data.get_bool("primary").unwrap_or(false),
        default: data.get_bool("default").unwrap_or(false),
        behind_firewall: data.get_bool("behind_firewall").unwrap_or(false),
        fallback_registry: data.get_str("fallback_registry").map(str::to_string),
        repository_prefix: data.get_str("repository_prefix").map(str::to_string),
        extra: data
            .decode_attr::<BTreeMap<String, Value>>("settings")?
            .unwrap_or_default(),
    })
}

/// write observed fields. the api never returns credentials, so those keep
/// their configured values.
pub(crate) fn map_registry(data: &mut ResourceData, registry: &Registry) -> Result<()> {
    data.set("name", &registry.name)?;
    data.set("kind", &registry.kind)?;
    data.set_opt("domain", registry.domain.as_deref())?;
    data.set_opt("username", registry.username.as_deref())?;
    data.set("primary", registry.primary)?;
    data.set("default", registry.default)?;
    data.set("behind_firewall", registry.behind_firewall)?;
    data.set_opt("fallback_registry", registry.fallback_registry.as_deref())?;
    data.set_opt("repository_prefix", registry.repository_prefix.as_deref())
}

#[async_trait]
impl Resource for RegistryResource {
    fn name(&self) -> &'static str {
        "codefresh_registry"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_registry(&to_registry(data)?).await?;
        let id = created
            .id
            .ok_or_else(|| anyhow!("created registry has no id"))?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(registry) = found(data, client.get_registry(&id).await)? {
            map_registry(data, &registry)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_registry(&to_registry(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_registry(data.require_id()?).await?;
        Ok(())
    }
}
