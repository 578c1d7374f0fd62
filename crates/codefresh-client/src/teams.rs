//! team endpoints and membership reconciliation.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::model::Team;
use codefresh_core::reconcile::diff;
use reqwest::Method;
use serde_json::json;

impl Client {
    pub async fn get_team_list(&self) -> Result<Vec<Team>, ApiError> {
        self.get("/team").await
    }

    pub async fn get_team_by_id(&self, id: &str) -> Result<Team, ApiError> {
        self.get(&format!("/team/{}", segment(id))).await
    }

    /// scan the team list for an exact, case-sensitive name match.
    pub async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>, ApiError> {
        Ok(self
            .get_team_list()
            .await?
            .into_iter()
            .find(|team| team.name == name))
    }

    pub async fn create_team(&self, team: &Team) -> Result<Team, ApiError> {
        self.request_json(
            Method::POST,
            "/team",
            Some(json!({
                "name": team.name,
                "type": team.team_type,
                "account": team.account,
                "tags": team.tags,
            })),
        )
        .await
    }

    pub async fn rename_team(&self, id: &str, name: &str) -> Result<(), ApiError> {
        self.request_unit(
            Method::PUT,
            &format!("/team/{}/renameTeam", segment(id)),
            Some(json!({ "name": name })),
        )
        .await
    }

    pub async fn add_user_to_team(&self, team_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.request_unit(
            Method::PUT,
            &format!(
                "/team/{}/{}/assignUserToTeam",
                segment(team_id),
                segment(user_id)
            ),
            None,
        )
        .await
    }

    pub async fn delete_user_from_team(
        &self,
        team_id: &str,
        user_id: &str,
    ) -> Result<(), ApiError> {
        self.request_unit(
            Method::PUT,
            &format!(
                "/team/{}/deleteUserFromTeam/{}",
                segment(team_id),
                segment(user_id)
            ),
            None,
        )
        .await
    }

    /// converge team membership onto `desired`, removals first.
    pub async fn update_team_users(&self, team_id: &str, desired: &[String]) -> Result<(), ApiError> {
        let existing = self.get_team_by_id(team_id).await?.user_ids();
        let changes = diff(desired, &existing);
        for user_id in &changes.to_remove {
            self.delete_user_from_team(team_id, user_id).await?;
            tracing::info!(team_id, user_id = %user_id, "removed team member");
        }
        for user_id in &changes.to_add {
            self.add_user_to_team(team_id, user_id).await?;
            tracing::info!(team_id, user_id = %user_id, "added team member");
        }
        Ok(())
    }

    pub async fn delete_team(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, &format!("/team/{}", segment(id)), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn find_by_name_returns_none_when_absent() {
        let server = MockServer::start();
        let list = server.mock(|when, then| {
            when.method(GET).path("/team");
            then.status(200).json_body(json!([
                { "_id": "t1", "name": "devs", "users": [] },
                { "_id": "t2", "name": "ops", "users": [] }
            ]));
        });

        let client = client_for(&server);
        assert!(client.find_team_by_name("Devs").await.unwrap().is_none());
        let team = client.find_team_by_name("ops").await.unwrap().unwrap();
        assert_eq!(team.id.as_deref(), Some("t2"));
        list.assert_hits(2);
    }

    #[tokio::test]
    async fn get_by_missing_id_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/team/nope");
            then.status(404).body("team not found");
        });

        let client = client_for(&server);
        let err = client.get_team_by_id("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn membership_reconciliation() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/team/t1");
            then.status(200).json_body(json!({
                "_id": "t1",
                "name": "devs",
                "users": [ { "id": "u2" }, { "id": "u3" } ]
            }));
        });
        let remove = server.mock(|when, then| {
            when.method(PUT).path("/team/t1/deleteUserFromTeam/u3");
            then.status(200);
        });
        let add = server.mock(|when, then| {
            when.method(PUT).path("/team/t1/u1/assignUserToTeam");
            then.status(200);
        });

        let client = client_for(&server);
        client
            .update_team_users("t1", &["u1".to_string(), "u2".to_string()])
            .await
            .unwrap();
        remove.assert();
        add.assert();
    }

    fn team_with_users(users: &[&str]) -> serde_json::Value {
        let users: Vec<_> = users.iter().map(|id| json!({ "id": id })).collect();
        json!({ "_id": "t1", "name": "devs", "users": users })
    }

    #[tokio::test]
    async fn failed_removal_aborts_before_additions() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/team/t1");
            then.status(200).json_body(team_with_users(&["u3"]));
        });
        let remove = server.mock(|when, then| {
            when.method(PUT).path("/team/t1/deleteUserFromTeam/u3");
            then.status(500).body("nope");
        });
        let add = server.mock(|when, then| {
            when.method(PUT).path("/team/t1/u1/assignUserToTeam");
            then.status(200);
        });

        let client = client_for(&server);
        let result = client.update_team_users("t1", &["u1".to_string()]).await;

        assert!(result.is_err());
        remove.assert_hits(1);
        add.assert_hits(0);
    }

    #[tokio::test]
    async fn failed_addition_runs_after_removals() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/team/t1");
            then.status(200).json_body(team_with_users(&["u3"]));
        });
        let remove = server.mock(|when, then| {
            when.method(PUT).path("/team/t1/deleteUserFromTeam/u3");
            then.status(200);
        });
        let add = server.mock(|when, then| {
            when.method(PUT).path("/team/t1/u1/assignUserToTeam");
            then.status(500).body("nope");
        });

        let client = client_for(&server);
        let result = client.update_team_users("t1", &["u1".to_string()]).await;

        assert!(result.is_err());
        remove.assert_hits(1);
        add.assert_hits(1);
    }

    #[tokio::test]
    async fn create_team_posts_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/team")
                .json_body_partial(r#"{ "name": "devs", "tags": ["a"] }"#);
            then.status(201)
                .json_body(json!({ "_id": "t9", "name": "devs", "tags": ["a"] }));
        });

        let client = client_for(&server);
        let created = client
            .create_team(&codefresh_core::model::Team {
                name: "devs".to_string(),
                tags: vec!["a".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(created.id.as_deref(), Some("t9"));
    }
}
