//! api key endpoints and the impersonation token exchange.

use crate::client::{segment, status_error, Client, ACCESS_TOKEN_COOKIE};
use crate::error::ApiError;
use codefresh_core::model::{ApiKey, ApiKeyRequest};
use reqwest::{Method, Response, StatusCode};

impl Client {
    pub async fn get_api_key(&self, id: &str) -> Result<ApiKey, ApiError> {
        self.get(&format!("/auth/key/{}", segment(id))).await
    }

    pub async fn get_api_keys_list(&self) -> Result<Vec<ApiKey>, ApiError> {
        self.get("/auth/keys").await
    }

    /// issue a key under this client's identity and return the raw token.
    pub async fn create_api_key(&self, request: &ApiKeyRequest) -> Result<String, ApiError> {
        let raw = self
            .request_text(Method::POST, "/auth/key", Some(serde_json::to_value(request)?))
            .await?;
        Ok(serde_json::from_str::<String>(&raw).unwrap_or_else(|_| raw.trim().to_string()))
    }

    pub async fn update_api_key(&self, id: &str, request: &ApiKeyRequest) -> Result<(), ApiError> {
        self.request_unit(
            Method::PATCH,
            &format!("/auth/key/{}", segment(id)),
            Some(serde_json::to_value(request)?),
        )
        .await
    }

    pub async fn delete_api_key(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/auth/key/{}", segment(id)), None)
            .await
    }

    /// exchange the operator's credentials for an access token acting as `user_id`.
    ///
    /// only a 200 is accepted; the token arrives in the `cf-access-token` cookie.
    pub async fn get_access_token(&self, user_id: &str) -> Result<String, ApiError> {
        let path = format!("/admin/user/loginAsUser?userId={}", segment(user_id));
        let response = self.send(Method::GET, &path, None).await?;
        if response.status() != StatusCode::OK {
            let status = response.status();
            return Err(status_error(Method::GET, &path, status, response).await);
        }
        access_token_cookie(&response)
            .ok_or_else(|| ApiError::precondition(format!("no access token returned for user {user_id}")))
    }

    /// switch the active account of an impersonated session.
    ///
    /// returns the refreshed token when the api issues one, otherwise the
    /// token that was passed in.
    pub async fn change_account(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<String, ApiError> {
        let session = self.impersonating(access_token)?;
        let response = session
            .send(
                Method::POST,
                &format!("/user/changeaccount/{}", segment(account_id)),
                None,
            )
            .await?;
        Ok(access_token_cookie(&response).unwrap_or_else(|| access_token.to_string()))
    }
}

fn access_token_cookie(response: &Response) -> Option<String> {
    response
        .cookies()
        .find(|cookie| cookie.name() == ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client_for;
    use codefresh_core::model::ApiKeyRequest;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn access_token_from_cookie() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/admin/user/loginAsUser")
                .query_param("userId", "u1");
            then.status(200)
                .header("set-cookie", "cf-access-token=session-1; Path=/");
        });

        let client = client_for(&server);
        assert_eq!(client.get_access_token("u1").await.unwrap(), "session-1");
    }

    #[tokio::test]
    async fn access_token_requires_ok() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/admin/user/loginAsUser");
            then.status(201)
                .header("set-cookie", "cf-access-token=session-1; Path=/");
        });

        let client = client_for(&server);
        let err = client.get_access_token("u1").await.unwrap_err();
        assert_eq!(err.status(), Some(201));
    }

    #[tokio::test]
    async fn change_account_refreshes_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/user/changeaccount/acc1")
                .header("x-access-token", "session-1");
            then.status(200)
                .header("set-cookie", "cf-access-token=session-2; Path=/");
        });

        let client = client_for(&server);
        let token = client.change_account("session-1", "acc1").await.unwrap();
        mock.assert();
        assert_eq!(token, "session-2");
    }

    #[tokio::test]
    async fn create_key_returns_raw_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/auth/key")
                .json_body(serde_json::json!({ "name": "ci", "scopes": ["pipeline"] }));
            then.status(201).body("key1.secret");
        });

        let client = client_for(&server);
        let token = client
            .create_api_key(&ApiKeyRequest {
                name: "ci".to_string(),
                scopes: vec!["pipeline".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(token, "key1.secret");
    }
}
