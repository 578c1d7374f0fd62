//! rest + graphql client for the codefresh api.

mod abac;
mod accounts;
mod api_keys;
mod client;
mod config;
mod contexts;
mod error;
mod hermes;
mod idps;
mod permissions;
mod pipelines;
mod projects;
mod provision;
mod registries;
mod service_users;
mod step_types;
mod teams;
mod users;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL, DEFAULT_TOKEN_HEADER};
pub use error::ApiError;
pub use provision::{
    provision_api_key, ApiKeyBackend, ProvisionError, ProvisionRequest, ProvisionStep,
    disposable_user_name, ProvisionedKey, DISPOSABLE_USER_PREFIX,
};
pub use users::USER_PAGE_SIZE;
