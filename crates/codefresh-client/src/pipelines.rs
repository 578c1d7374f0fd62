//! pipeline endpoints.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::Pipeline;
use reqwest::Method;

impl Client {
    /// fetch a pipeline by id or full `project/name`.
    pub async fn get_pipeline(&self, name: &str) -> Result<Pipeline, ApiError> {
        self.get(&format!("/pipelines/{}", segment(name))).await
    }

    pub async fn create_pipeline(&self, pipeline: &Pipeline) -> Result<Pipeline, ApiError> {
        self.request_json(
            Method::POST,
            "/pipelines",
            Some(serde_json::to_value(pipeline)?),
        )
        .await
    }

    pub async fn update_pipeline(&self, pipeline: &Pipeline) -> Result<Pipeline, ApiError> {
        if pipeline.metadata.id.is_none() && pipeline.metadata.name.is_empty() {
            return Err(ApiError::precondition(
                "pipeline id or name is required for update",
            ));
        }
        self.request_json(
            Method::PUT,
            &format!("/pipelines/{}", segment(pipeline.key())),
            Some(serde_json::to_value(pipeline)?),
        )
        .await
    }

    pub async fn delete_pipeline(&self, name: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/pipelines/{}", segment(name)), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_pipeline_by_project_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/pipelines/proj%2Fbuild");
            then.status(200).json_body(json!({
                "metadata": { "id": "p1", "name": "proj/build", "labels": { "tags": ["x"] } },
                "spec": { "concurrency": 2, "steps": { "clone": { "type": "git-clone" } } }
            }));
        });

        let client = client_for(&server);
        let pipeline = client.get_pipeline("proj/build").await.unwrap();
        mock.assert();
        assert_eq!(pipeline.key(), "p1");
        assert_eq!(pipeline.spec.concurrency, Some(2));
        assert_eq!(pipeline.metadata.labels.tags, vec!["x"]);
    }
}
