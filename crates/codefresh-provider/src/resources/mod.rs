//! managed resource adapters, one module per resource type.

pub mod abac_rules;
pub mod account;
pub mod account_admins;
pub mod api_key;
pub mod context;
pub mod idp_accounts;
pub mod permission;
pub mod pipeline;
pub mod pipeline_cron_trigger;
pub mod project;
pub mod registry;
pub mod service_account;
pub mod step_types;
pub mod team;
pub mod user;
