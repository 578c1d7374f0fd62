//! step type endpoints.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::StepTypes;
use reqwest::Method;

impl Client {
    pub async fn get_step_types(&self, name: &str) -> Result<StepTypes, ApiError> {
        self.get(&format!("/step-types/{}", segment(name))).await
    }

    pub async fn create_step_types(&self, step_types: &StepTypes) -> Result<StepTypes, ApiError> {
        self.request_json(
            Method::POST,
            "/step-types",
            Some(serde_json::to_value(step_types)?),
        )
        .await
    }

    pub async fn update_step_types(&self, step_types: &StepTypes) -> Result<StepTypes, ApiError> {
        self.request_json(
            Method::PUT,
            &format!("/step-types/{}", segment(&step_types.metadata.name)),
            Some(serde_json::to_value(step_types)?),
        )
        .await
    }

    pub async fn delete_step_types(&self, name: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/step-types/{}", segment(name)), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn step_type_names_are_path_encoded() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/step-types/acme%2Fslack-notify");
            then.status(200).json_body(json!({
                "version": "1.0",
                "kind": "step-type",
                "metadata": { "name": "acme/slack-notify", "version": "0.0.1" },
                "spec": { "steps": {} }
            }));
        });

        let client = client_for(&server);
        let step = client.get_step_types("acme/slack-notify").await.unwrap();
        mock.assert();
        assert_eq!(step.metadata.version.as_deref(), Some("0.0.1"));
    }
}
