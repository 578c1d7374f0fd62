//! wire representations of codefresh entities.

mod abac;
mod account;
mod api_key;
mod context;
mod hermes;
mod idp;
mod permission;
mod pipeline;
mod project;
mod registry;
mod service_user;
mod step_types;
mod team;
mod user;

pub use abac::{AbacAttribute, GitopsAbacRule};
pub use account::{
    Account, Build, Collaborators, CurrentAccount, CurrentAccountRef, CurrentUser, DataRetention,
    Limits,
};
pub use api_key::{ApiKey, ApiKeyRequest};
pub use context::{Context, ContextMetadata, ContextSpec};
pub use hermes::{HermesTrigger, TriggerEvent};
pub use idp::{Idp, IdpAccountRequest};
pub use permission::Permission;
pub use pipeline::{Pipeline, PipelineLabels, PipelineMetadata, PipelineSpec, Trigger, Variable};
pub use project::{Project, ProjectVariable};
pub use registry::Registry;
pub use service_user::{ServiceUser, ServiceUserRequest, ServiceUserTeam};
pub use step_types::{StepTypes, StepTypesMetadata};
pub use team::{Team, TeamUser};
pub use user::{Login, NewUser, Personal, User, UserPage};
