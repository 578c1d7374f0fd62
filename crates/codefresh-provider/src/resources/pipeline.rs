//! `codefresh_pipeline`: pipelines defined inline or by an original yaml.
//!
//! when `original_yaml_string` is set, steps, stages and mode come from that
//! document. a remote yaml that is semantically equal keeps the configured
//! text.

use crate::types::{found, Resource, ResourceData};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::{
    Pipeline, PipelineLabels, PipelineMetadata, PipelineSpec, Trigger, Variable,
};
use codefresh_core::yaml_equivalent;
use serde_json::Value;
use std::collections::BTreeMap;

pub struct PipelineResource;

fn variables(data: &ResourceData, key: &str) -> Result<Vec<Variable>> {
    Ok(data
        .decode_attr::<BTreeMap<String, String>>(key)?
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| Variable {
            key,
            value,
            encrypted: None,
        })
        .collect())
}

/// pull steps, stages and mode out of a pipeline yaml document.
fn apply_original_yaml(spec: &mut PipelineSpec, raw: &str) -> Result<()> {
    let document: Value =
        serde_yaml::from_str(raw).context("original_yaml_string is not valid yaml")?;
    let Value::Object(document) = document else {
        return Err(anyhow!("original_yaml_string must be a mapping"));
    };
    spec.steps = document.get("steps").cloned();
    spec.stages = document.get("stages").cloned();
    spec.mode = document
        .get("mode")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(())
}

pub(crate) fn to_pipeline(data: &ResourceData) -> Result<Pipeline> {
    let mut spec = PipelineSpec {
        triggers: data
            .decode_attr::<Vec<Trigger>>("triggers")?
            .unwrap_or_default(),
        contexts: data.str_list("contexts")?,
        variables: variables(data, "variables")?,
        concurrency: data.get_i64("concurrency"),
        branch_concurrency: data.get_i64("branch_concurrency"),
        trigger_concurrency: data.get_i64("trigger_concurrency"),
        priority: data.get_i64("priority"),
        spec_template: data.get("spec_template").cloned(),
        ..Default::default()
    };
    let original = data.get_str("original_yaml_string").map(str::to_string);
    if let Some(raw) = &original {
        apply_original_yaml(&mut spec, raw)?;
    }
    Ok(Pipeline {
        metadata: PipelineMetadata {
            id: data.id.clone(),
            name: data.str("name")?.to_string(),
            project_id: data.get_str("project_id").map(str::to_string),
            labels: PipelineLabels {
                tags: data.str_list("tags")?,
            },
            original_yaml_string: original,
            is_public: data.get_bool("is_public").unwrap_or(false),
            ..Default::default()
        },
        spec,
        version: None,
    })
}

pub(crate) fn map_pipeline(data: &mut ResourceData, pipeline: &Pipeline) -> Result<()> {
    let metadata = &pipeline.metadata;
    let spec = &pipeline.spec;
    data.set("name", &metadata.name)?;
    data.set_opt("project_id", metadata.project_id.as_deref())?;
    data.set_string_set("tags", metadata.labels.tags.clone())?;
    data.set("is_public", metadata.is_public)?;
    data.set_opt("revision", metadata.revision)?;
    data.set_opt("concurrency", spec.concurrency)?;
    data.set_opt("branch_concurrency", spec.branch_concurrency)?;
    data.set_opt("trigger_concurrency", spec.trigger_concurrency)?;
    data.set_opt("priority", spec.priority)?;
    data.set_string_set("contexts", spec.contexts.clone())?;
    // encrypted values come back masked; keep what was configured
    let configured = data
        .decode_attr::<BTreeMap<String, String>>("variables")?
        .unwrap_or_default();
    let observed: BTreeMap<String, String> = spec
        .variables
        .iter()
        .map(|variable| {
            let value = match (variable.encrypted, configured.get(&variable.key)) {
                (Some(true), Some(value)) => value.clone(),
                _ => variable.value.clone(),
            };
            (variable.key.clone(), value)
        })
        .collect();
    data.set("variables", observed)?;
    if data.get("triggers").is_some() || !spec.triggers.is_empty() {
        data.set("triggers", &spec.triggers)?;
    }
    match &metadata.original_yaml_string {
        Some(remote) => {
            let keep = data
                .get_str("original_yaml_string")
                .is_some_and(|configured| yaml_equivalent(configured, remote));
            if !keep {
                data.set("original_yaml_string", remote)?;
            }
        }
        None => {
            data.attrs.remove("original_yaml_string");
        }
    }
    Ok(())
}

#[async_trait]
impl Resource for PipelineResource {
    fn name(&self) -> &'static str {
        "codefresh_pipeline"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let created = client.create_pipeline(&to_pipeline(data)?).await?;
        let id = created
            .metadata
            .id
            .ok_or_else(|| anyhow!("created pipeline has no id"))?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        if let Some(pipeline) = found(data, client.get_pipeline(&id).await)? {
            map_pipeline(data, &pipeline)?;
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.update_pipeline(&to_pipeline(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        client.delete_pipeline(data.require_id()?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(attrs: Value) -> ResourceData {
        ResourceData::new(serde_json::from_value(attrs).unwrap())
    }

    #[test]
    fn original_yaml_fills_steps_and_mode() {
        let pipeline = to_pipeline(&data(json!({
            "name": "proj/build",
            "original_yaml_string": "version: '1.0'\nmode: parallel\nsteps:\n  clone:\n    type: git-clone\n",
        })))
        .unwrap();
        assert_eq!(pipeline.spec.mode.as_deref(), Some("parallel"));
        assert_eq!(
            pipeline.spec.steps,
            Some(json!({ "clone": { "type": "git-clone" } }))
        );
    }

    #[test]
    fn reformatted_remote_yaml_is_suppressed() {
        let configured = "steps:\n  a:   {image: alpine}\nversion: '1.0'\n";
        let mut state = data(json!({ "name": "p", "original_yaml_string": configured }));
        let remote = Pipeline {
            metadata: PipelineMetadata {
                id: Some("p1".to_string()),
                name: "p".to_string(),
                original_yaml_string: Some(
                    "version: '1.0'\nsteps:\n  a:\n    image: alpine\n".to_string(),
                ),
                ..Default::default()
            },
            ..Default::default()
        };
        map_pipeline(&mut state, &remote).unwrap();
        assert_eq!(state.get_str("original_yaml_string"), Some(configured));
    }

    #[test]
    fn encrypted_variables_keep_configured_value() {
        let mut state = data(json!({ "name": "p", "variables": { "TOKEN": "s3cret" } }));
        let remote = Pipeline {
            metadata: PipelineMetadata {
                name: "p".to_string(),
                ..Default::default()
            },
            spec: PipelineSpec {
                variables: vec![Variable {
                    key: "TOKEN".to_string(),
                    value: "*****".to_string(),
                    encrypted: Some(true),
                }],
                ..Default::default()
            },
            version: None,
        };
        map_pipeline(&mut state, &remote).unwrap();
        assert_eq!(state.attrs["variables"], json!({ "TOKEN": "s3cret" }));
    }
}
