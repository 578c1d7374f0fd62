//! abac permission endpoints.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::Permission;
use reqwest::Method;

impl Client {
    pub async fn get_permission_list(&self) -> Result<Vec<Permission>, ApiError> {
        self.get("/abac").await
    }

    pub async fn get_permission_by_id(&self, id: &str) -> Result<Permission, ApiError> {
        self.get(&format!("/abac/{}", segment(id))).await
    }

    pub async fn create_permission(&self, permission: &Permission) -> Result<Permission, ApiError> {
        self.request_json(
            Method::POST,
            "/abac",
            Some(serde_json::to_value(permission)?),
        )
        .await
    }

    pub async fn update_permission(&self, permission: &Permission) -> Result<Permission, ApiError> {
        let id = permission
            .id
            .as_deref()
            .ok_or_else(|| ApiError::precondition("permission id is required for update"))?;
        self.request_json(
            Method::PUT,
            &format!("/abac/{}", segment(id)),
            Some(serde_json::to_value(permission)?),
        )
        .await
    }

    pub async fn delete_permission(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/abac/{}", segment(id)), None)
            .await
    }
}
