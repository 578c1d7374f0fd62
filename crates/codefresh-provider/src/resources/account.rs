//! `codefresh_account`: account name, limits and feature flags.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::{Account, Build, Collaborators, DataRetention, Limits};
use std::collections::BTreeMap;

pub struct AccountResource;

fn to_account(data: &ResourceData) -> Result<Account> {
    let limits = match (
        data.get_i64("collaborators_limit"),
        data.get_i64("data_retention_weeks"),
    ) {
        (None, None) => None,
        (collaborators, weeks) => Some(Limits {
            collaborators: collaborators.map(|limit| Collaborators { limit, used: None }),
            data_retention: weeks.map(|weeks| DataRetention { weeks }),
        }),
    };
    let build = data.get_i64("parallel_builds").map(|parallel| Build {
        parallel,
        ..Default::default()
    });
    Ok(Account {
        id: data.id.clone(),
        name: data.str("name")?.to_string(),
        admins: Vec::new(),
        limits,
        build,
        features: data
            .decode_attr::<BTreeMap<String, bool>>("features")?
            .unwrap_or_default(),
    })
}

fn map_account(data: &mut ResourceData, account: &Account) -> Result<()> {
    data.set("name", &account.name)?;
    let limits = account.limits.as_ref();
    data.set_opt(
        "collaborators_limit",
        limits
            .and_then(|limits| limits.collaborators.as_ref())
            .map(|collaborators| collaborators.limit),
    )?;
    data.set_opt(
        "data_retention_weeks",
        limits
            .and_then(|limits| limits.data_retention.as_ref())
            .map(|retention| retention.weeks),
    )?;
    data.set_opt(
        "parallel_builds",
        account.build.as_ref().map(|build| build.parallel),
    )?;
    // only the configured flags are tracked; the api reports every flag
    let configured = data
        .decode_attr::<BTreeMap<String, bool>>("features")?
        .unwrap_or_default();
    if !configured.is_empty() {
        let observed: BTreeMap<String, bool> = configured
            .keys()
            .map(|key| (key.clone(), account.features.get(key).copied().unwrap_or(false)))
            .collect();
        data.set("features", observed)?;
    }
    Ok(())
}

#[async_trait]
impl Resource for AccountResource {
    fn name(&self) -> &'static str {
        "codefresh_account"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_account(&to_account(data)?).await?;
        let id = created
            .id
            .clone()
            .ok_or_else(|| anyhow!("created account has no id"))?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(account) = found(data, client.get_account_by_id(&id).await)? {
            map_account(data, &account)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_account(&to_account(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_account(data.require_id()?).await?;
        Ok(())
    }
}
