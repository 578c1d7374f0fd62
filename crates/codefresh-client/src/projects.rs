//! project endpoints.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::Project;
use reqwest::Method;

impl Client {
    pub async fn get_project_by_id(&self, id: &str) -> Result<Project, ApiError> {
        self.get(&format!("/projects/{}", segment(id))).await
    }

    pub async fn get_project_by_name(&self, name: &str) -> Result<Project, ApiError> {
        self.get(&format!("/projects/name/{}", segment(name))).await
    }

    pub async fn create_project(&self, project: &Project) -> Result<Project, ApiError> {
        self.request_json(
            Method::POST,
            "/projects",
            Some(serde_json::to_value(project)?),
        )
        .await
    }

    pub async fn update_project(&self, project: &Project) -> Result<(), ApiError> {
        let id = project
            .id
            .as_deref()
            .ok_or_else(|| ApiError::precondition("project id is required for update"))?;
        self.request_unit(
            Method::PATCH,
            &format!("/projects/{}", segment(id)),
            Some(serde_json::to_value(project)?),
        )
        .await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/projects/{}", segment(id)), None)
            .await
    }
}
