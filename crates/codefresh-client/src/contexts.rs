//! context endpoints.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::Context;
use reqwest::Method;

impl Client {
    /// fetch a context with secrets decrypted.
    pub async fn get_context(&self, name: &str) -> Result<Context, ApiError> {
        self.get(&format!("/contexts/{}?decrypt=true", segment(name)))
            .await
    }

    pub async fn create_context(&self, context: &Context) -> Result<Context, ApiError> {
        self.request_json(
            Method::POST,
            "/contexts",
            Some(serde_json::to_value(context)?),
        )
        .await
    }

    pub async fn update_context(&self, context: &Context) -> Result<Context, ApiError> {
        if context.metadata.name.is_empty() {
            return Err(ApiError::precondition("context name is required for update"));
        }
        self.request_json(
            Method::PUT,
            &format!("/contexts/{}", segment(&context.metadata.name)),
            Some(serde_json::to_value(context)?),
        )
        .await
    }

    pub async fn delete_context(&self, name: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/contexts/{}", segment(name)), None)
            .await
    }
}
