//! authenticated http plumbing shared by every endpoint module.

use crate::config::ClientConfig;
use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub(crate) const ACCESS_TOKEN_HEADER: &str = "x-access-token";
pub(crate) const ACCESS_TOKEN_COOKIE: &str = "cf-access-token";

/// codefresh api client.
///
/// the credential is fixed for the lifetime of a value. acting as another
/// identity means deriving a new client with [`Client::with_token`], so
/// concurrent flows never share a mutable token.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    api_url: String,
    graphql_url: String,
    token_header: HeaderName,
    token: HeaderValue,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    #[serde(default)]
    message: String,
}

impl Client {
    /// build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        let token_header = HeaderName::from_bytes(config.token_header.as_bytes())
            .map_err(|err| ApiError::Config(format!("token header: {err}")))?;
        let token = sensitive_value(&config.token)?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url,
            token_header,
            token,
        })
    }

    /// derive a client that authenticates with `token` using the same header.
    pub fn with_token(&self, token: &str) -> Result<Self, ApiError> {
        Ok(Self {
            token: sensitive_value(token)?,
            ..self.clone()
        })
    }

    /// derive a client that authenticates with `token` under another header.
    pub fn with_token_header(&self, header: &str, token: &str) -> Result<Self, ApiError> {
        let token_header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|err| ApiError::Config(format!("token header: {err}")))?;
        Ok(Self {
            token_header,
            token: sensitive_value(token)?,
            ..self.clone()
        })
    }

    /// derive a client acting under an impersonated access token.
    pub fn impersonating(&self, access_token: &str) -> Result<Self, ApiError> {
        self.with_token_header(ACCESS_TOKEN_HEADER, access_token)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(self.token_header.clone(), self.token.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers
    }

    /// send a request and return the raw response when the status is 200/201.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!(method = %method, path, "codefresh request");
        let mut request = self
            .http
            .request(method.clone(), &url)
            .headers(self.headers());
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(&body)?);
        }
        let response = request.send().await?;
        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(response),
            status => Err(status_error(method, path, status, response).await),
        }
    }

    /// send and decode a json body. an empty body decodes as `null`.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, path, body).await?.text().await?;
        decode_body(&text)
    }

    /// send and return the body text untouched.
    pub(crate) async fn request_text(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<String, ApiError> {
        Ok(self.send(method, path, body).await?.text().await?)
    }

    /// send and discard the response body.
    pub(crate) async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        self.send(method, path, body).await?;
        Ok(())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(Method::GET, path, None).await
    }

    /// post a graphql document and decode its `data` field.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ApiError> {
        tracing::debug!(url = %self.graphql_url, "codefresh graphql request");
        let payload = serde_json::to_vec(&GraphQlRequest {
            query,
            variables: &variables,
        })?;
        let response = self
            .http
            .post(&self.graphql_url)
            .headers(self.headers())
            .body(payload)
            .send()
            .await?;
        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(status_error(Method::POST, &self.graphql_url, status, response).await);
        }
        let text = response.text().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_str(&text)?;
        if !envelope.errors.is_empty() {
            return Err(ApiError::GraphQl {
                messages: envelope.errors.into_iter().map(|e| e.message).collect(),
            });
        }
        envelope.data.ok_or_else(|| ApiError::GraphQl {
            messages: vec!["response carried no data".to_string()],
        })
    }
}

fn sensitive_value(token: &str) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(token)
        .map_err(|err| ApiError::Config(format!("token value: {err}")))?;
    value.set_sensitive(true);
    Ok(value)
}

pub(crate) async fn status_error(
    method: Method,
    path: &str,
    status: StatusCode,
    response: Response,
) -> ApiError {
    let body = response.text().await.unwrap_or_default();
    ApiError::Status {
        method: method.to_string(),
        path: path.to_string(),
        status: status.as_u16(),
        body,
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    if text.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(text)?)
}

/// percent-encode one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use httpmock::MockServer;

    pub(crate) fn client_for(server: &MockServer) -> Client {
        Client::new(
            ClientConfig::new(server.base_url(), "test-token")
                .with_graphql_url(server.url("/graphql")),
        )
        .unwrap()
    }
}
