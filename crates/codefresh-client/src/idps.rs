//! identity provider endpoints and add-only account association.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::{Idp, IdpAccountRequest};
use reqwest::Method;

impl Client {
    /// every idp visible to an administrator.
    pub async fn get_idps(&self) -> Result<Vec<Idp>, ApiError> {
        self.get("/admin/idp").await
    }

    /// idps enabled for the caller's account.
    pub async fn get_account_idps(&self) -> Result<Vec<Idp>, ApiError> {
        self.get("/idp/account").await
    }

    /// there is no by-id endpoint; scan the admin list.
    pub async fn get_idp_by_id(&self, id: &str) -> Result<Option<Idp>, ApiError> {
        Ok(self
            .get_idps()
            .await?
            .into_iter()
            .find(|idp| idp.id.as_deref() == Some(id)))
    }

    pub async fn create_idp(&self, idp: &Idp) -> Result<Idp, ApiError> {
        self.request_json(Method::POST, "/admin/idp", Some(serde_json::to_value(idp)?))
            .await
    }

    pub async fn update_idp(&self, idp: &Idp) -> Result<Idp, ApiError> {
        if idp.id.is_none() {
            return Err(ApiError::precondition("idp id is required for update"));
        }
        self.request_json(Method::PUT, "/admin/idp", Some(serde_json::to_value(idp)?))
            .await
    }

    pub async fn delete_idp(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/admin/idp/{}", segment(id)), None)
            .await
    }

    pub async fn add_account_to_idp(&self, idp_id: &str, account_id: &str) -> Result<(), ApiError> {
        let request = IdpAccountRequest {
            account_id: account_id.to_string(),
            idp_id: idp_id.to_string(),
        };
        self.request_unit(
            Method::POST,
            "/admin/idp/addAccount",
            Some(serde_json::to_value(&request)?),
        )
        .await
    }

    /// associate every desired account not already on the idp.
    ///
    /// associations cannot be removed through the api, so accounts present on
    /// the idp but missing from `desired` are left alone. returns the ids that
    /// were added.
    pub async fn add_accounts_to_idp(
        &self,
        idp_id: &str,
        desired: &[String],
    ) -> Result<Vec<String>, ApiError> {
        let idp = self
            .get_idp_by_id(idp_id)
            .await?
            .ok_or_else(|| ApiError::precondition(format!("idp {idp_id} not found")))?;
        let mut added = Vec::new();
        for account_id in desired {
            if idp.accounts.contains(account_id) || added.contains(account_id) {
                continue;
            }
            self.add_account_to_idp(idp_id, account_id).await?;
            tracing::info!(idp_id, account_id = %account_id, "associated account with idp");
            added.push(account_id.clone());
        }
        Ok(added)
    }
}
