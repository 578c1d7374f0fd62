//! provider registry: every resource and data source by type name.

use crate::data_sources;
use crate::resources;
use crate::types::{DataSource, Resource};
use codefresh_client::Client;
use std::collections::BTreeMap;

fn all_resources() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(resources::account::AccountResource),
        Box::new(resources::account_admins::AccountAdminsResource),
        Box::new(resources::api_key::ApiKeyResource),
        Box::new(resources::context::ContextResource),
        Box::new(resources::idp_accounts::IdpAccountsResource),
        Box::new(resources::permission::PermissionResource),
        Box::new(resources::pipeline::PipelineResource),
        Box::new(resources::pipeline_cron_trigger::CronTriggerResource),
        Box::new(resources::project::ProjectResource),
        Box::new(resources::registry::RegistryResource),
        Box::new(resources::step_types::StepTypesResource),
        Box::new(resources::team::TeamResource),
        Box::new(resources::user::UserResource),
        Box::new(resources::service_account::ServiceAccountResource),
        Box::new(resources::abac_rules::AbacRulesResource),
    ]
}

fn all_data_sources() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(data_sources::account::AccountData),
        Box::new(data_sources::current_account::CurrentAccountData),
        Box::new(data_sources::context::ContextData),
        Box::new(data_sources::idps::IdpsData),
        Box::new(data_sources::project::ProjectData),
        Box::new(data_sources::registry::RegistryData),
        Box::new(data_sources::service_account::ServiceAccountData),
        Box::new(data_sources::step_types::StepTypesData),
        Box::new(data_sources::team::TeamData),
        Box::new(data_sources::user::UserData),
        Box::new(data_sources::users::UsersData),
        Box::new(data_sources::account_idp::AccountIdpData),
    ]
}

pub(crate) fn is_resource_type(name: &str) -> bool {
    all_resources().iter().any(|resource| resource.name() == name)
}

pub(crate) fn is_data_source_type(name: &str) -> bool {
    all_data_sources().iter().any(|source| source.name() == name)
}

/// configured provider: the shared client plus every adapter.
pub struct Provider {
    client: Client,
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSource>>,
}

impl Provider {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            resources: all_resources()
                .into_iter()
                .map(|resource| (resource.name(), resource))
                .collect(),
            data_sources: all_data_sources()
                .into_iter()
                .map(|source| (source.name(), source))
                .collect(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn resource(&self, name: &str) -> Option<&dyn Resource> {
        self.resources.get(name).map(|resource| resource.as_ref())
    }

    pub fn data_source(&self, name: &str) -> Option<&dyn DataSource> {
        self.data_sources.get(name).map(|source| source.as_ref())
    }

    pub fn resource_names(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn data_source_names(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codefresh_client::ClientConfig;

    #[test]
    fn registers_every_type_once() {
        let provider = Provider::new(Client::new(ClientConfig::new("http://localhost", "t")).unwrap());
        assert_eq!(provider.resource_names().len(), all_resources().len());
        assert_eq!(provider.data_source_names().len(), all_data_sources().len());
        assert!(provider.resource("codefresh_idp_accounts").is_some());
        assert!(provider.data_source("codefresh_current_account").is_some());
        assert!(provider.resource("codefresh_current_account").is_none());
        assert!(is_resource_type("codefresh_team"));
        assert!(!is_data_source_type("codefresh_pipeline"));
    }
}
