//! `codefresh_api_key`: account-scoped keys issued through the provisioning flow.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::{provision_api_key, Client, ProvisionRequest};
use codefresh_core::model::ApiKeyRequest;

pub struct ApiKeyResource;

/// a key stays bound to the account and user it was issued for.
const REPLACE_ON: &[&str] = &["account_id", "user_id"];

fn key_request(data: &ResourceData) -> Result<ApiKeyRequest> {
    Ok(ApiKeyRequest {
        name: data.str("name")?.to_string(),
        scopes: data.str_list("scopes")?,
    })
}

/// the key manages itself: reads and writes authenticate with its own token.
fn key_client(client: &Client, data: &ResourceData) -> Result<Client> {
    match data.get_str("token") {
        Some(token) => Ok(client.with_token(token)?),
        None => Ok(client.clone()),
    }
}

#[async_trait]
impl Resource for ApiKeyResource {
    fn name(&self) -> &'static str {
        "codefresh_api_key"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let request = ProvisionRequest {
            account_id: data.get_str("account_id").map(str::to_string),
            user_id: data.get_str("user_id").map(str::to_string),
            key: key_request(data)?,
        };
        let issued = provision_api_key(client, &request).await?;
        let key_id = issued
            .key_id
            .clone()
            .ok_or_else(|| anyhow!("issued token carries no key id"))?;
        data.set_id(key_id);
        data.set("token", &issued.token)?;
        if request.user_id.is_none() {
            data.set_opt("provisioned_user_id", issued.user_id.as_deref())?;
        }
        Ok(())
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let session = key_client(client, data)?;
        if let Some(key) = found(data, session.get_api_key(&id).await)? {
            data.set("name", &key.name)?;
            data.set_string_set("scopes", key.scopes)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(field) = data.first_changed(REPLACE_ON) {
            tracing::info!(key_id = %id, field, "api key binding changed; issuing a new key");
            key_client(client, data)?.delete_api_key(&id).await?;
            data.clear_id();
            data.attrs.remove("token");
            data.attrs.remove("provisioned_user_id");
            return self.create(client, data).await;
        }
        key_client(client, data)?
            .update_api_key(&id, &key_request(data)?)
            .await?;
        Ok(())
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        key_client(client, data)?.delete_api_key(&id).await?;
        Ok(())
    }
}
