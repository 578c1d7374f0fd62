//! client configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://g.codefresh.io/api";
pub const DEFAULT_GRAPHQL_URL: &str = "https://g.codefresh.io/2.0/api/graphql";
pub const DEFAULT_TOKEN_HEADER: &str = "Authorization";

/// connection settings for one codefresh installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// rest base url.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// graphql endpoint.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
    /// api key or access token.
    #[serde(default)]
    pub token: String,
    /// header that carries the token.
    #[serde(default = "default_token_header")]
    pub token_header: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_graphql_url() -> String {
    DEFAULT_GRAPHQL_URL.to_string()
}

fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            graphql_url: default_graphql_url(),
            token: token.into(),
            token_header: default_token_header(),
        }
    }

    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = url.into();
        self
    }

    pub fn with_token_header(mut self, header: impl Into<String>) -> Self {
        self.token_header = header.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_api_url(), String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_takes_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{ "token": "abc" }"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
        assert_eq!(config.token_header, DEFAULT_TOKEN_HEADER);
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("http://localhost/api", "t")
            .with_graphql_url("http://localhost/graphql")
            .with_token_header("x-access-token");
        assert_eq!(config.graphql_url, "http://localhost/graphql");
        assert_eq!(config.token_header, "x-access-token");
    }
}
