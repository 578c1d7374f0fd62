//! `codefresh_context`: config, secret and yaml contexts.
//!
//! `config`/`secret` contexts take a flat `data` map. `yaml`/`secret-yaml`
//! contexts take the document text in `yaml`; a remote document that only
//! differs in formatting or key order keeps the configured text.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::{Context, ContextMetadata, ContextSpec};
use codefresh_core::yaml_equivalent;
use serde_json::Value;
use std::collections::BTreeMap;

pub struct ContextResource;

fn context_type(data: &ResourceData) -> &str {
    data.get_str("type").unwrap_or(Context::CONFIG)
}

pub(crate) fn to_context(data: &ResourceData) -> Result<Context> {
    let context_type = context_type(data).to_string();
    let payload = match context_type.as_str() {
        Context::CONFIG | Context::SECRET => data
            .decode_attr::<BTreeMap<String, Value>>("data")?
            .unwrap_or_default(),
        Context::YAML | Context::SECRET_YAML => {
            let raw = data.str("yaml")?;
            serde_yaml::from_str::<BTreeMap<String, Value>>(raw)
                .context("context yaml must be a mapping")?
        }
        other => return Err(anyhow!("unsupported context type `{other}`")),
    };
    Ok(Context {
        metadata: ContextMetadata {
            name: data.str("name")?.to_string(),
        },
        spec: ContextSpec {
            context_type,
            data: payload,
        },
        version: None,
    })
}

pub(crate) fn map_context(data: &mut ResourceData, context: &Context) -> Result<()> {
    data.set("name", &context.metadata.name)?;
    data.set("type", &context.spec.context_type)?;
    if context.is_yaml() {
        let remote = serde_yaml::to_string(&context.spec.data)?;
        let keep = data
            .get_str("yaml")
            .is_some_and(|configured| yaml_equivalent(configured, &remote));
        if !keep {
            data.set("yaml", remote)?;
        }
        data.attrs.remove("data");
    } else {
        data.set("data", &context.spec.data)?;
        data.attrs.remove("yaml");
    }
    Ok(())
}

#[async_trait]
impl Resource for ContextResource {
    fn name(&self) -> &'static str {
        "codefresh_context"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_context(&to_context(data)?).await?;
        data.set_id(created.metadata.name);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.require_id()?.to_string();
        if let Some(context) = found(data, client.get_context(&name).await)? {
            map_context(data, &context)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let context = to_context(data)?;
        // renames address the context by its previous name
        let current = data.require_id()?.to_string();
        if current != context.metadata.name {
            client.delete_context(&current).await?;
            let created = client.create_context(&context).await?;
            data.set_id(created.metadata.name);
        } else {
            client.update_context(&context).await?;
        }
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_context(data.require_id()?).await?;
        Ok(())
    }
}
