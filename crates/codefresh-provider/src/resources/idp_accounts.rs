//! `codefresh_idp_accounts`: add-only association of accounts with an idp.
//!
//! the api cannot disassociate an account, so dropping an account from the
//! configuration (or deleting the resource) only raises a warning. moving
//! the resource to another idp re-keys it and leaves the old idp untouched.

use crate::types::{Resource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;

pub struct IdpAccountsResource;

async fn associate(client: &Client, data: &mut ResourceData) -> Result<()> {
    let idp_id = data.str("idp_id")?.to_string();
    let desired = data.str_list("account_ids")?;
    client.add_accounts_to_idp(&idp_id, &desired).await?;
    Ok(())
}

#[async_trait]
impl Resource for IdpAccountsResource {
    fn name(&self) -> &'static str {
        "codefresh_idp_accounts"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        associate(client, data).await?;
        let idp_id = data.str("idp_id")?.to_string();
        data.set_id(idp_id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let idp_id = data.require_id()?.to_string();
        let Some(idp) = client.get_idp_by_id(&idp_id).await? else {
            tracing::warn!(idp_id = %idp_id, "idp not found remotely");
            data.clear_id();
            return Ok(());
        };
        data.set("idp_id", &idp_id)?;
        // associations made outside this resource are not tracked
        let configured = data.str_list("account_ids")?;
        let tracked: Vec<String> = if configured.is_empty() {
            idp.accounts.clone()
        } else {
            configured
                .into_iter()
                .filter(|account| idp.accounts.contains(account))
                .collect()
        };
        data.set_string_set("account_ids", tracked)?;
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let idp_id = data.str("idp_id")?.to_string();
        let desired = data.str_list("account_ids")?;
        let previous_idp = data.require_id()?.to_string();
        if previous_idp != idp_id {
            data.warn(format!(
                "idp {previous_idp} keeps its account associations; remove them manually"
            ));
            data.set_id(idp_id.clone());
        } else {
            let dropped: Vec<String> = data
                .prior_str_list("account_ids")
                .into_iter()
                .filter(|account| !desired.contains(account))
                .collect();
            for account_id in dropped {
                data.warn(format!(
                    "account {account_id} cannot be removed from idp {idp_id}; remove it manually"
                ));
            }
        }
        associate(client, data).await?;
        self.read(client, data).await
    }

    async fn delete(&self, _client: &Client, data: &mut ResourceData) -> Result<()> {
        let idp_id = data.require_id()?.to_string();
        data.warn(format!(
            "idp {idp_id} keeps its account associations; remove them manually"
        ));
        Ok(())
    }
}
