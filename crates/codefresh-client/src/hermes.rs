//! hermes trigger events. event ids in paths are double-encoded.

use crate::client::{segment, Client};
use crate::error::ApiError;
use codefresh_core::encoding::double_encode;
use codefresh_core::model::{HermesTrigger, TriggerEvent};
use reqwest::Method;

impl Client {
    /// register an event and return its id.
    pub async fn create_hermes_event(&self, event: &TriggerEvent) -> Result<String, ApiError> {
        let raw = self
            .request_text(
                Method::POST,
                "/hermes/events",
                Some(serde_json::to_value(event)?),
            )
            .await?;
        Ok(parse_event_id(&raw))
    }

    pub async fn get_trigger_event(&self, event: &str) -> Result<TriggerEvent, ApiError> {
        self.get(&format!("/hermes/events/{}", double_encode(event)))
            .await
    }

    pub async fn delete_hermes_event(&self, event: &str) -> Result<(), ApiError> {
        self.request_unit(
            Method::DELETE,
            &format!("/hermes/events/{}", double_encode(event)),
            None,
        )
        .await
    }

    pub async fn get_hermes_triggers_for_pipeline(
        &self,
        pipeline_id: &str,
    ) -> Result<Vec<HermesTrigger>, ApiError> {
        self.get(&format!("/hermes/triggers/pipeline/{}", segment(pipeline_id)))
            .await
    }

    pub async fn create_hermes_trigger(
        &self,
        event: &str,
        pipeline_id: &str,
    ) -> Result<(), ApiError> {
        self.request_unit(
            Method::POST,
            &trigger_path(event, pipeline_id),
            None,
        )
        .await
    }

    pub async fn delete_hermes_trigger(
        &self,
        event: &str,
        pipeline_id: &str,
    ) -> Result<(), ApiError> {
        self.request_unit(
            Method::DELETE,
            &trigger_path(event, pipeline_id),
            None,
        )
        .await
    }
}

fn trigger_path(event: &str, pipeline_id: &str) -> String {
    format!(
        "/hermes/triggers/event/{}/{}",
        double_encode(event),
        segment(pipeline_id)
    )
}

/// the events endpoint answers with either a json string or bare text.
fn parse_event_id(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn event_id_accepts_json_or_text() {
        assert_eq!(parse_event_id("\"cron:codefresh:x\""), "cron:codefresh:x");
        assert_eq!(parse_event_id("cron:codefresh:x\n"), "cron:codefresh:x");
    }

    #[tokio::test]
    async fn trigger_path_is_double_encoded() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(
                "/hermes/triggers/event/cron%253Acodefresh%253A0%2520*%2520*%2520*%2520*%253Amsg/p1",
            );
            then.status(201);
        });

        let client = client_for(&server);
        client
            .create_hermes_trigger("cron:codefresh:0 * * * *:msg", "p1")
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn create_event_returns_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/hermes/events")
                .json_body_partial(r#"{ "type": "cron", "kind": "codefresh" }"#);
            then.status(201).body("\"cron:codefresh:0 * * * *:msg:abc\"");
        });

        let client = client_for(&server);
        let id = client
            .create_hermes_event(&TriggerEvent::cron("0 * * * *", "msg"))
            .await
            .unwrap();
        assert_eq!(id, "cron:codefresh:0 * * * *:msg:abc");
    }

    #[tokio::test]
    async fn triggers_for_pipeline() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/hermes/triggers/pipeline/p1");
            then.status(200)
                .json_body(json!([ { "event": "cron:codefresh:x", "pipeline": "p1" } ]));
        });

        let client = client_for(&server);
        let triggers = client.get_hermes_triggers_for_pipeline("p1").await.unwrap();
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].event, "cron:codefresh:x");
    }
}
