//! api key provisioning through a disposable, impersonated user.
//!
//! the api has no endpoint that issues an account-scoped key to a machine
//! caller directly. the flow below creates (or reuses) a user in the target
//! account, impersonates it, and issues the key under that session. steps run
//! strictly in order; the first failure aborts and nothing already created is
//! rolled back, so the error carries the steps that did complete.

use crate::client::Client;
use crate::error::ApiError;
use async_trait::async_trait;
use codefresh_core::model::{Account, ApiKey, ApiKeyRequest, NewUser, User};
use std::fmt;
use thiserror::Error;

/// username prefix for users created by the flow.
pub const DISPOSABLE_USER_PREFIX: &str = "tfuser";

const DISPOSABLE_EMAIL_DOMAIN: &str = "codefresh.io";

/// one named step of the provisioning flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    GetAccount,
    CreateUser,
    ActivateUser,
    SetAdmin,
    Impersonate,
    ChangeAccount,
    IssueKey,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvisionStep::GetAccount => "get-account",
            ProvisionStep::CreateUser => "create-user",
            ProvisionStep::ActivateUser => "activate-user",
            ProvisionStep::SetAdmin => "set-admin",
            ProvisionStep::Impersonate => "impersonate",
            ProvisionStep::ChangeAccount => "change-account",
            ProvisionStep::IssueKey => "issue-key",
        };
        f.write_str(name)
    }
}

/// provisioning failed at `step`.
#[derive(Debug, Error)]
#[error("api key provisioning failed at {step}: {source}")]
pub struct ProvisionError {
    pub step: ProvisionStep,
    /// steps that finished before the failure.
    pub completed: Vec<ProvisionStep>,
    /// user created by an earlier step, left in place.
    pub user_id: Option<String>,
    #[source]
    pub source: ApiError,
}

/// input to [`provision_api_key`].
#[derive(Debug, Clone, Default)]
pub struct ProvisionRequest {
    /// target account; `None` issues the key under the configured identity.
    pub account_id: Option<String>,
    /// reuse this user instead of creating a disposable one.
    pub user_id: Option<String>,
    pub key: ApiKeyRequest,
}

/// result of a successful flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedKey {
    pub token: String,
    pub key_id: Option<String>,
    pub user_id: Option<String>,
    pub completed: Vec<ProvisionStep>,
}

/// calls the flow depends on.
#[async_trait]
pub trait ApiKeyBackend: Send + Sync {
    async fn get_account(&self, account_id: &str) -> Result<Account, ApiError>;
    async fn create_user(&self, account_id: &str, user: &NewUser) -> Result<User, ApiError>;
    async fn activate_user(&self, user_id: &str) -> Result<(), ApiError>;
    async fn set_account_admin(&self, account_id: &str, user_id: &str) -> Result<(), ApiError>;
    async fn get_access_token(&self, user_id: &str) -> Result<String, ApiError>;
    async fn change_account(&self, access_token: &str, account_id: &str)
        -> Result<String, ApiError>;
    /// issue a key, impersonated when `access_token` is set.
    async fn issue_key(
        &self,
        access_token: Option<&str>,
        request: &ApiKeyRequest,
    ) -> Result<String, ApiError>;
}

#[async_trait]
impl ApiKeyBackend for Client {
    async fn get_account(&self, account_id: &str) -> Result<Account, ApiError> {
        self.get_account_by_id(account_id).await
    }

    async fn create_user(&self, account_id: &str, user: &NewUser) -> Result<User, ApiError> {
        self.add_new_user_to_account(account_id, user).await
    }

    async fn activate_user(&self, user_id: &str) -> Result<(), ApiError> {
        Client::activate_user(self, user_id).await.map(|_| ())
    }

    async fn set_account_admin(&self, account_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.set_user_as_account_admin(account_id, user_id).await
    }

    async fn get_access_token(&self, user_id: &str) -> Result<String, ApiError> {
        Client::get_access_token(self, user_id).await
    }

    async fn change_account(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<String, ApiError> {
        Client::change_account(self, access_token, account_id).await
    }

    async fn issue_key(
        &self,
        access_token: Option<&str>,
        request: &ApiKeyRequest,
    ) -> Result<String, ApiError> {
        match access_token {
            Some(token) => self.impersonating(token)?.create_api_key(request).await,
            None => self.create_api_key(request).await,
        }
    }
}

/// random disposable username: prefix plus ten lowercase hex chars.
pub fn disposable_user_name() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{DISPOSABLE_USER_PREFIX}{}", &suffix[..10])
}

struct Trace {
    completed: Vec<ProvisionStep>,
    user_id: Option<String>,
}

impl Trace {
    fn fail(&self, step: ProvisionStep, source: ApiError) -> ProvisionError {
        ProvisionError {
            step,
            completed: self.completed.clone(),
            user_id: self.user_id.clone(),
            source,
        }
    }

    fn done(&mut self, step: ProvisionStep) {
        self.completed.push(step);
    }
}

/// run the provisioning flow against `backend`.
pub async fn provision_api_key<B: ApiKeyBackend + ?Sized>(
    backend: &B,
    request: &ProvisionRequest,
) -> Result<ProvisionedKey, ProvisionError> {
    let mut trace = Trace {
        completed: Vec::new(),
        user_id: request.user_id.clone(),
    };

    let Some(account_id) = request.account_id.as_deref() else {
        let token = backend
            .issue_key(None, &request.key)
            .await
            .map_err(|err| trace.fail(ProvisionStep::IssueKey, err))?;
        trace.done(ProvisionStep::IssueKey);
        tracing::info!(step = %ProvisionStep::IssueKey, "issued api key under configured identity");
        return Ok(finish(token, trace));
    };

    let user_id = match request.user_id.clone() {
        Some(user_id) => user_id,
        None => create_disposable_user(backend, account_id, &mut trace).await?,
    };

    let mut token = backend
        .get_access_token(&user_id)
        .await
        .map_err(|err| trace.fail(ProvisionStep::Impersonate, err))?;
    trace.done(ProvisionStep::Impersonate);
    tracing::info!(step = %ProvisionStep::Impersonate, user_id = %user_id, "impersonated user");

    token = backend
        .change_account(&token, account_id)
        .await
        .map_err(|err| trace.fail(ProvisionStep::ChangeAccount, err))?;
    trace.done(ProvisionStep::ChangeAccount);
    tracing::info!(step = %ProvisionStep::ChangeAccount, account_id, "switched impersonated account");

    let issued = backend
        .issue_key(Some(&token), &request.key)
        .await
        .map_err(|err| trace.fail(ProvisionStep::IssueKey, err))?;
    trace.done(ProvisionStep::IssueKey);
    tracing::info!(step = %ProvisionStep::IssueKey, user_id = %user_id, account_id, "issued api key");

    Ok(finish(issued, trace))
}

async fn create_disposable_user<B: ApiKeyBackend + ?Sized>(
    backend: &B,
    account_id: &str,
    trace: &mut Trace,
) -> Result<String, ProvisionError> {
    let account = backend
        .get_account(account_id)
        .await
        .map_err(|err| trace.fail(ProvisionStep::GetAccount, err))?;
    if !account.has_collaborators() {
        return Err(trace.fail(
            ProvisionStep::GetAccount,
            ApiError::precondition(format!(
                "account {account_id} has no collaborator limits configured"
            )),
        ));
    }
    trace.done(ProvisionStep::GetAccount);
    tracing::info!(step = %ProvisionStep::GetAccount, account_id, "verified target account");

    let user_name = disposable_user_name();
    let new_user = NewUser {
        email: format!("{user_name}@{DISPOSABLE_EMAIL_DOMAIN}"),
        user_name,
        roles: Vec::new(),
        account: vec![account_id.to_string()],
        personal: None,
    };
    let user = backend
        .create_user(account_id, &new_user)
        .await
        .map_err(|err| trace.fail(ProvisionStep::CreateUser, err))?;
    let user_id = user.id.ok_or_else(|| {
        trace.fail(
            ProvisionStep::CreateUser,
            ApiError::precondition("created user has no id"),
        )
    })?;
    trace.user_id = Some(user_id.clone());
    trace.done(ProvisionStep::CreateUser);
    tracing::info!(
        step = %ProvisionStep::CreateUser,
        account_id,
        user_id = %user_id,
        user_name = %new_user.user_name,
        "created disposable user"
    );

    backend
        .activate_user(&user_id)
        .await
        .map_err(|err| trace.fail(ProvisionStep::ActivateUser, err))?;
    trace.done(ProvisionStep::ActivateUser);
    tracing::info!(step = %ProvisionStep::ActivateUser, user_id = %user_id, "activated user");

    backend
        .set_account_admin(account_id, &user_id)
        .await
        .map_err(|err| trace.fail(ProvisionStep::SetAdmin, err))?;
    trace.done(ProvisionStep::SetAdmin);
    tracing::info!(step = %ProvisionStep::SetAdmin, account_id, user_id = %user_id, "granted account admin");

    Ok(user_id)
}

fn finish(token: String, trace: Trace) -> ProvisionedKey {
    ProvisionedKey {
        key_id: ApiKey::id_from_token(&token).map(str::to_string),
        token,
        user_id: trace.user_id,
        completed: trace.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codefresh_core::model::{Collaborators, Limits};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<ProvisionStep>>,
        fail_at: Option<ProvisionStep>,
        no_limits: bool,
    }

    impl Recorder {
        fn failing_at(step: ProvisionStep) -> Self {
            Self {
                fail_at: Some(step),
                ..Default::default()
            }
        }

        fn hit(&self, step: ProvisionStep) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(step);
            if self.fail_at == Some(step) {
                return Err(ApiError::Status {
                    method: "POST".to_string(),
                    path: "/mock".to_string(),
                    status: 500,
                    body: step.to_string(),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<ProvisionStep> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiKeyBackend for Recorder {
        async fn get_account(&self, account_id: &str) -> Result<Account, ApiError> {
            self.hit(ProvisionStep::GetAccount)?;
            let limits = (!self.no_limits).then(|| Limits {
                collaborators: Some(Collaborators::default()),
                ..Default::default()
            });
            Ok(Account {
                id: Some(account_id.to_string()),
                limits,
                ..Default::default()
            })
        }

        async fn create_user(&self, _account_id: &str, user: &NewUser) -> Result<User, ApiError> {
            self.hit(ProvisionStep::CreateUser)?;
            assert!(user.user_name.starts_with(DISPOSABLE_USER_PREFIX));
            assert_eq!(user.email, format!("{}@codefresh.io", user.user_name));
            Ok(User {
                id: Some("u-new".to_string()),
                user_name: user.user_name.clone(),
                ..Default::default()
            })
        }

        async fn activate_user(&self, user_id: &str) -> Result<(), ApiError> {
            assert_eq!(user_id, "u-new");
            self.hit(ProvisionStep::ActivateUser)
        }

        async fn set_account_admin(&self, _account_id: &str, _user_id: &str) -> Result<(), ApiError> {
            self.hit(ProvisionStep::SetAdmin)
        }

        async fn get_access_token(&self, _user_id: &str) -> Result<String, ApiError> {
            self.hit(ProvisionStep::Impersonate)?;
            Ok("session-1".to_string())
        }

        async fn change_account(
            &self,
            access_token: &str,
            _account_id: &str,
        ) -> Result<String, ApiError> {
            assert_eq!(access_token, "session-1");
            self.hit(ProvisionStep::ChangeAccount)?;
            Ok("session-2".to_string())
        }

        async fn issue_key(
            &self,
            access_token: Option<&str>,
            _request: &ApiKeyRequest,
        ) -> Result<String, ApiError> {
            self.hit(ProvisionStep::IssueKey)?;
            Ok(match access_token {
                Some(token) => format!("key-{token}.secret"),
                None => "key-direct.secret".to_string(),
            })
        }
    }

    fn request(account_id: Option<&str>, user_id: Option<&str>) -> ProvisionRequest {
        ProvisionRequest {
            account_id: account_id.map(str::to_string),
            user_id: user_id.map(str::to_string),
            key: ApiKeyRequest {
                name: "ci".to_string(),
                scopes: vec!["pipeline".to_string()],
            },
        }
    }

    const FULL_FLOW: [ProvisionStep; 7] = [
        ProvisionStep::GetAccount,
        ProvisionStep::CreateUser,
        ProvisionStep::ActivateUser,
        ProvisionStep::SetAdmin,
        ProvisionStep::Impersonate,
        ProvisionStep::ChangeAccount,
        ProvisionStep::IssueKey,
    ];

    #[tokio::test]
    async fn runs_every_step_in_order() {
        let backend = Recorder::default();
        let key = provision_api_key(&backend, &request(Some("acc1"), None))
            .await
            .unwrap();

        assert_eq!(backend.calls(), FULL_FLOW.to_vec());
        assert_eq!(key.completed, FULL_FLOW.to_vec());
        assert_eq!(key.token, "key-session-2.secret");
        assert_eq!(key.key_id.as_deref(), Some("key-session-2"));
        assert_eq!(key.user_id.as_deref(), Some("u-new"));
    }

    #[tokio::test]
    async fn aborts_on_first_failure_at_every_step() {
        for (index, step) in FULL_FLOW.iter().enumerate() {
            let backend = Recorder::failing_at(*step);
            let err = provision_api_key(&backend, &request(Some("acc1"), None))
                .await
                .unwrap_err();

            assert_eq!(err.step, *step);
            assert_eq!(err.completed, FULL_FLOW[..index].to_vec());
            assert_eq!(backend.calls(), FULL_FLOW[..=index].to_vec());
            assert_eq!(err.source.status(), Some(500));
        }
    }

    #[tokio::test]
    async fn failure_after_user_creation_reports_orphan() {
        let backend = Recorder::failing_at(ProvisionStep::SetAdmin);
        let err = provision_api_key(&backend, &request(Some("acc1"), None))
            .await
            .unwrap_err();
        assert_eq!(err.user_id.as_deref(), Some("u-new"));
    }

    #[tokio::test]
    async fn existing_user_skips_creation() {
        let backend = Recorder::default();
        let key = provision_api_key(&backend, &request(Some("acc1"), Some("u-old")))
            .await
            .unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                ProvisionStep::Impersonate,
                ProvisionStep::ChangeAccount,
                ProvisionStep::IssueKey
            ]
        );
        assert_eq!(key.user_id.as_deref(), Some("u-old"));
    }

    #[tokio::test]
    async fn no_account_issues_directly() {
        let backend = Recorder::default();
        let key = provision_api_key(&backend, &request(None, None))
            .await
            .unwrap();

        assert_eq!(backend.calls(), vec![ProvisionStep::IssueKey]);
        assert_eq!(key.token, "key-direct.secret");
        assert_eq!(key.user_id, None);
    }

    #[tokio::test]
    async fn missing_limits_stops_before_side_effects() {
        let backend = Recorder {
            no_limits: true,
            ..Default::default()
        };
        let err = provision_api_key(&backend, &request(Some("acc1"), None))
            .await
            .unwrap_err();

        assert_eq!(err.step, ProvisionStep::GetAccount);
        assert!(matches!(err.source, ApiError::Precondition(_)));
        assert_eq!(backend.calls(), vec![ProvisionStep::GetAccount]);
    }

    #[test]
    fn disposable_names_are_prefixed_hex() {
        let name = disposable_user_name();
        let suffix = name.strip_prefix(DISPOSABLE_USER_PREFIX).unwrap();
        assert_eq!(suffix.len(), 10);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
