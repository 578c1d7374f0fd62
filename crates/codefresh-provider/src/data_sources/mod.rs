//! read-only data source adapters.

pub mod account;
pub mod account_idp;
pub mod context;
pub mod current_account;
pub mod idps;
pub mod project;
pub mod registry;
pub mod service_account;
pub mod step_types;
pub mod team;
pub mod user;
pub mod users;
