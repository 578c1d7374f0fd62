//! user endpoints and paginated listing.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::{NewUser, User};
use reqwest::Method;
use serde::Deserialize;

/// fixed page size for `GET /admin/user`.
pub const USER_PAGE_SIZE: usize = 100;

#[derive(Debug, Default, Deserialize)]
struct UserPageResponse {
    #[serde(default)]
    docs: Vec<User>,
}

impl Client {
    /// fetch every user, one page at a time.
    ///
    /// paging stops only on the first page with no documents; a short page or
    /// a reported `total` does not end the loop.
    pub async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        let mut users = Vec::new();
        let mut page = 1usize;
        loop {
            let path = format!("/admin/user?limit={USER_PAGE_SIZE}&page={page}");
            let response: UserPageResponse = self.get(&path).await?;
            if response.docs.is_empty() {
                break;
            }
            users.extend(response.docs);
            page += 1;
        }
        tracing::debug!(count = users.len(), pages = page, "listed users");
        Ok(users)
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<User, ApiError> {
        self.get(&format!("/admin/user/id/{}", segment(id))).await
    }

    /// scan all users for an exact user name match.
    pub async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .get_all_users()
            .await?
            .into_iter()
            .find(|user| user.user_name == user_name))
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.request_json(Method::POST, "/admin/user", Some(serde_json::to_value(user)?))
            .await
    }

    pub async fn update_user(&self, id: &str, user: &NewUser) -> Result<User, ApiError> {
        self.request_json(
            Method::PUT,
            &format!("/admin/user/{}", segment(id)),
            Some(serde_json::to_value(user)?),
        )
        .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/admin/user/{}", segment(id)), None)
            .await
    }

    /// invite a new user into an account.
    pub async fn add_new_user_to_account(
        &self,
        account_id: &str,
        user: &NewUser,
    ) -> Result<User, ApiError> {
        self.request_json(
            Method::POST,
            &format!("/accounts/{}/adduser", segment(account_id)),
            Some(serde_json::json!({
                "userName": user.user_name,
                "userEmail": user.email,
            })),
        )
        .await
    }

    /// move a pending user to active.
    pub async fn activate_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.request_json(
            Method::POST,
            &format!("/admin/user/{}/activate", segment(user_id)),
            None,
        )
        .await
    }

    pub async fn get_account_users(&self, account_id: &str) -> Result<Vec<User>, ApiError> {
        self.get(&format!("/accounts/{}/users", segment(account_id)))
            .await
    }

    pub async fn delete_user_from_account(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<(), ApiError> {
        self.request_unit(
            Method::DELETE,
            &format!("/accounts/{}/{}", segment(account_id), segment(user_id)),
            None,
        )
        .await
    }
}
