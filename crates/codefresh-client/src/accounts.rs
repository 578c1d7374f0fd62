//! account endpoints and admin reconciliation.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::{Account, CurrentAccount, CurrentUser, TeamUser};
use codefresh_core::reconcile::diff;
use reqwest::Method;

impl Client {
    pub async fn create_account(&self, account: &Account) -> Result<Account, ApiError> {
        self.request_json(
            Method::POST,
            "/admin/accounts",
            Some(serde_json::to_value(account)?),
        )
        .await
    }

    pub async fn get_account_by_id(&self, id: &str) -> Result<Account, ApiError> {
        self.get(&format!("/admin/accounts/{}", segment(id))).await
    }

    pub async fn get_all_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get("/admin/accounts").await
    }

    /// scan every account for an exact name match.
    pub async fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, ApiError> {
        Ok(self
            .get_all_accounts()
            .await?
            .into_iter()
            .find(|account| account.name == name))
    }

    pub async fn update_account(&self, account: &Account) -> Result<Account, ApiError> {
        let id = account
            .id
            .as_deref()
            .ok_or_else(|| ApiError::precondition("account id is required for update"))?;
        self.request_json(
            Method::PUT,
            &format!("/admin/accounts/{}/update", segment(id)),
            Some(serde_json::to_value(account)?),
        )
        .await
    }

    pub async fn delete_account(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/admin/accounts/{}", segment(id)), None)
            .await
    }

    pub async fn set_user_as_account_admin(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<(), ApiError> {
        self.request_unit(
            Method::POST,
            &format!("/accounts/{}/{}/admin", segment(account_id), segment(user_id)),
            None,
        )
        .await
    }

    pub async fn delete_user_as_account_admin(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<(), ApiError> {
        self.request_unit(
            Method::DELETE,
            &format!("/accounts/{}/{}/admin", segment(account_id), segment(user_id)),
            None,
        )
        .await
    }

    pub async fn get_account_admins(&self, account_id: &str) -> Result<Vec<String>, ApiError> {
        Ok(self.get_account_by_id(account_id).await?.admins)
    }

    /// converge the admin list of an account onto `desired`.
    ///
    /// existing admins are re-fetched first. removals run before additions and
    /// the first failing call aborts the pass; completed calls are not undone.
    pub async fn update_account_admins(
        &self,
        account_id: &str,
        desired: &[String],
    ) -> Result<(), ApiError> {
        let existing = self.get_account_admins(account_id).await?;
        let changes = diff(desired, &existing);
        for user_id in &changes.to_remove {
            self.delete_user_as_account_admin(account_id, user_id)
                .await?;
            tracing::info!(account_id, user_id = %user_id, "removed account admin");
        }
        for user_id in &changes.to_add {
            self.set_user_as_account_admin(account_id, user_id).await?;
            tracing::info!(account_id, user_id = %user_id, "added account admin");
        }
        Ok(())
    }

    /// account of the calling identity, with its users.
    pub async fn get_current_account(&self) -> Result<CurrentAccount, ApiError> {
        let user: CurrentUser = self.get("/user").await?;
        let active = user.active_account().ok_or_else(|| {
            ApiError::precondition(format!(
                "user {} has no active account",
                if user.user_name.is_empty() {
                    user.id.as_str()
                } else {
                    user.user_name.as_str()
                }
            ))
        })?;
        let users = self.get_account_users(&active.id).await?;
        Ok(CurrentAccount {
            id: active.id.clone(),
            name: active.name.clone(),
            users: users
                .into_iter()
                .filter_map(|user| {
                    Some(TeamUser {
                        id: user.id?,
                        user_name: user.user_name,
                        email: user.email,
                    })
                })
                .collect(),
        })
    }
}
