//! service user endpoints.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::{ServiceUser, ServiceUserRequest};
use reqwest::Method;

impl Client {
    pub async fn get_service_user_list(&self) -> Result<Vec<ServiceUser>, ApiError> {
        self.get("/service-users").await
    }

    pub async fn get_service_user_by_id(&self, id: &str) -> Result<ServiceUser, ApiError> {
        self.get(&format!("/service-users/{}", segment(id))).await
    }

    /// scan the service user list for an exact name match.
    pub async fn find_service_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ServiceUser>, ApiError> {
        Ok(self
            .get_service_user_list()
            .await?
            .into_iter()
            .find(|user| user.name == name))
    }

    pub async fn create_service_user(
        &self,
        request: &ServiceUserRequest,
    ) -> Result<ServiceUser, ApiError> {
        self.request_json(
            Method::POST,
            "/service-users",
            Some(serde_json::to_value(request)?),
        )
        .await
    }

    pub async fn update_service_user(
        &self,
        id: &str,
        request: &ServiceUserRequest,
    ) -> Result<ServiceUser, ApiError> {
        self.request_json(
            Method::PATCH,
            &format!("/service-users/{}", segment(id)),
            Some(serde_json::to_value(request)?),
        )
        .await
    }

    pub async fn delete_service_user(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/service-users/{}", segment(id)), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn find_by_name_vs_get_by_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/service-users");
            then.status(200).json_body(json!([
                { "_id": "s1", "userName": "ci-bot", "teams": [ { "_id": "t1", "name": "devs" } ], "roles": ["Admin"] }
            ]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/service-users/ghost");
            then.status(404).body("not found");
        });

        let client = client_for(&server);
        let found = client.find_service_user_by_name("ci-bot").await.unwrap().unwrap();
        assert_eq!(found.team_ids(), vec!["t1"]);
        assert!(found.is_admin());
        assert!(client.find_service_user_by_name("cd-bot").await.unwrap().is_none());

        let err = client.get_service_user_by_id("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
