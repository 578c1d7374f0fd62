//! `codefresh_pipeline_cron_trigger`: a hermes cron event bound to a pipeline.
//!
//! the id is the event string returned by hermes. every attribute change
//! replaces the event and its trigger.

use crate::types::{found, Resource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::TriggerEvent;

pub struct CronTriggerResource;

async fn attach(client: &Client, data: &mut ResourceData) -> Result<()> {
    let pipeline_id = data.str("pipeline_id")?.to_string();
    let event = TriggerEvent::cron(data.str("expression")?, data.get_str("message").unwrap_or(""));
    let event_id = client.create_hermes_event(&event).await?;
    tracing::info!(event = %event_id, pipeline_id = %pipeline_id, "created cron event");
    client.create_hermes_trigger(&event_id, &pipeline_id).await?;
    data.set_id(event_id);
    Ok(())
}

async fn detach(client: &Client, event_id: &str, pipeline_id: &str) -> Result<()> {
    client.delete_hermes_trigger(event_id, pipeline_id).await?;
    client.delete_hermes_event(event_id).await?;
    Ok(())
}

#[async_trait]
impl Resource for CronTriggerResource {
    fn name(&self) -> &'static str {
        "codefresh_pipeline_cron_trigger"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        attach(client, data).await?;
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let event_id = data.require_id()?.to_string();
        let pipeline_id = data.str("pipeline_id")?.to_string();
        let Some(triggers) = found(data, client.get_hermes_triggers_for_pipeline(&pipeline_id).await)?
        else {
            return Ok(());
        };
        if !triggers.iter().any(|trigger| trigger.event == event_id) {
            tracing::warn!(event = %event_id, pipeline_id = %pipeline_id, "cron trigger not found remotely");
            data.clear_id();
            return Ok(());
        }
        if let Some(event) = found(data, client.get_trigger_event(&event_id).await)? {
            data.set_opt("expression", event.values.get("expression"))?;
            data.set_opt("message", event.values.get("message"))?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let event_id = data.require_id()?.to_string();
        let previous_pipeline = data
            .prior
            .get("pipeline_id")
            .and_then(|value| value.as_str())
            .map(str::to_string);
        let pipeline_id = match previous_pipeline {
            Some(pipeline_id) => pipeline_id,
            None => data.str("pipeline_id")?.to_string(),
        };
        detach(client, &event_id, &pipeline_id).await?;
        attach(client, data).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let event_id = data.require_id()?.to_string();
        let pipeline_id = data.str("pipeline_id")?.to_string();
        detach(client, &event_id, &pipeline_id).await
    }
}
