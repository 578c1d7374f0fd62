//! registry endpoints.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::Registry;
use reqwest::Method;

impl Client {
    pub async fn list_registries(&self) -> Result<Vec<Registry>, ApiError> {
        self.get("/registries").await
    }

    pub async fn get_registry(&self, id: &str) -> Result<Registry, ApiError> {
        self.get(&format!("/registries/{}", segment(id))).await
    }

    /// scan the registry list for an exact name match.
    pub async fn find_registry_by_name(&self, name: &str) -> Result<Option<Registry>, ApiError> {
        Ok(self
            .list_registries()
            .await?
            .into_iter()
            .find(|registry| registry.name == name))
    }

    pub async fn create_registry(&self, registry: &Registry) -> Result<Registry, ApiError> {
        self.request_json(
            Method::POST,
            "/registries",
            Some(serde_json::to_value(registry)?),
        )
        .await
    }

    pub async fn update_registry(&self, registry: &Registry) -> Result<Registry, ApiError> {
        let id = registry
            .id
            .as_deref()
            .ok_or_else(|| ApiError::precondition("registry id is required for update"))?;
        self.request_json(
            Method::PUT,
            &format!("/registries/{}", segment(id)),
            Some(serde_json::to_value(registry)?),
        )
        .await
    }

    pub async fn delete_registry(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/registries/{}", segment(id)), None)
            .await
    }
}
