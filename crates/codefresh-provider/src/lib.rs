//! provider orchestration: load, validate, refresh, plan, apply.

mod data_sources;
mod loader;
mod planner;
mod registry;
mod resources;
mod state;
mod types;


use anyhow::{anyhow, Context, Result};
use codefresh_core::{Address, JsonMap, Manifest};
use serde_json::Value;
use std::collections::BTreeMap;

pub use loader::{load_manifest, validate};
pub use planner::{destroy_plan, plan, sort_ops_for_apply};
pub use registry::Provider;
pub use state::{StateData, StateEntry, StateStore};
pub use types::{
    found, AppliedOp, ApplyReport, DataSource, FieldChange, Op, Plan, Resource, ResourceData,
};

/// re-read every stored object and drop the ones that vanished remotely.
///
/// returns the addresses that were dropped.
pub async fn refresh(provider: &Provider, state: &mut StateStore) -> Result<Vec<Address>> {
    let mut vanished = Vec::new();
    let entries: Vec<_> = state
        .entries()
        .iter()
        .map(|(address, entry)| (address.clone(), entry.clone()))
        .collect();
    for (address, entry) in entries {
        let Some(resource) = provider.resource(&address.type_name) else {
            tracing::warn!(%address, "state entry has an unknown type; skipping refresh");
            continue;
        };
        let mut data = ResourceData::with_id(entry.id, entry.attrs);
        resource
            .read(provider.client(), &mut data)
            .await
            .with_context(|| format!("refresh {address}"))?;
        match data.id {
            Some(id) => state.set(address, id, data.attrs),
            None => {
                tracing::warn!(%address, "object vanished remotely; dropping from state");
                state.remove(&address);
                vanished.push(address);
            }
        }
    }
    Ok(vanished)
}

/// validate the manifest, optionally refresh state, and produce a plan.
pub async fn build_plan(
    provider: &Provider,
    manifest: &Manifest,
    state: &mut StateStore,
    allow_delete: bool,
    refresh_state: bool,
) -> Result<Plan> {
    validate(manifest)?;
    if refresh_state {
        refresh(provider, state).await?;
    }
    Ok(plan(&manifest.resources, state, allow_delete))
}

/// apply a plan op by op, saving state after each one.
///
/// the first failure stops the run; ops applied before it stay recorded.
pub async fn apply_plan(
    provider: &Provider,
    plan: &Plan,
    state: &mut StateStore,
    allow_delete: bool,
) -> Result<ApplyReport> {
    if !allow_delete && plan.ops.iter().any(|op| matches!(op, Op::Delete { .. })) {
        return Err(anyhow!(
            "plan contains delete operations; re-run with --allow-delete"
        ));
    }

    let mut report = ApplyReport::default();
    for op in sort_ops_for_apply(&plan.ops) {
        let result = apply_op(provider, &op, state).await;
        state.save()?;
        let applied = result.with_context(|| format!("apply {}", op.address()))?;
        tracing::info!(address = %applied.address, id = ?applied.id, "applied operation");
        report.applied.push(applied);
    }
    Ok(report)
}

async fn apply_op(provider: &Provider, op: &Op, state: &mut StateStore) -> Result<AppliedOp> {
    let address = op.address().clone();
    let resource = provider
        .resource(&address.type_name)
        .ok_or_else(|| anyhow!("unknown resource type {}", address.type_name))?;
    let client = provider.client();

    match op {
        Op::Create { desired, .. } => {
            let mut data = ResourceData::new(desired.clone());
            let result = resource.create(client, &mut data).await;
            // keep partially created objects addressable
            if let Some(id) = &data.id {
                state.set(address.clone(), id.clone(), data.attrs.clone());
            }
            result?;
            let id = data
                .id
                .ok_or_else(|| anyhow!("create returned no id"))?;
            Ok(AppliedOp {
                address,
                id: Some(id),
                warnings: data.warnings,
            })
        }
        Op::Update { id, desired, .. } => {
            let prior = state
                .get(&address)
                .map(|entry| entry.attrs.clone())
                .unwrap_or_default();
            let mut attrs = prior.clone();
            attrs.extend(desired.clone());
            let mut data = ResourceData {
                id: Some(id.clone()),
                attrs,
                prior,
                warnings: Vec::new(),
            };
            resource.update(client, &mut data).await?;
            match &data.id {
                Some(id) => state.set(address.clone(), id.clone(), data.attrs),
                None => {
                    state.remove(&address);
                }
            }
            Ok(AppliedOp {
                address,
                id: data.id,
                warnings: data.warnings,
            })
        }
        Op::Delete { id, .. } => {
            let attrs = state
                .get(&address)
                .map(|entry| entry.attrs.clone())
                .unwrap_or_default();
            let mut data = ResourceData::with_id(id.clone(), attrs);
            resource.delete(client, &mut data).await?;
            state.remove(&address);
            Ok(AppliedOp {
                address,
                id: None,
                warnings: data.warnings,
            })
        }
    }
}

/// read every data block and return its attrs (plus `id`) by address.
pub async fn read_data(provider: &Provider, manifest: &Manifest) -> Result<BTreeMap<Address, JsonMap>> {
    let mut results = BTreeMap::new();
    for block in &manifest.data {
        let address = block.address();
        let source = provider
            .data_source(&block.type_name)
            .ok_or_else(|| anyhow!("unknown data source type {}", block.type_name))?;
        let mut data = ResourceData::new(block.attrs.clone());
        source
            .read(provider.client(), &mut data)
            .await
            .with_context(|| format!("read {address}"))?;
        let mut attrs = data.attrs;
        if let Some(id) = data.id {
            attrs.insert("id".to_string(), Value::String(id));
        }
        results.insert(address, attrs);
    }
    Ok(results)
}

/// adopt an existing remote object into state under `address`.
pub async fn import_resource(
    provider: &Provider,
    state: &mut StateStore,
    address: &Address,
    id: &str,
) -> Result<()> {
    if state.get(address).is_some() {
        return Err(anyhow!("{address} is already managed"));
    }
    let resource = provider
        .resource(&address.type_name)
        .ok_or_else(|| anyhow!("unknown resource type {}", address.type_name))?;
    let data = resource
        .import(provider.client(), id)
        .await
        .with_context(|| format!("import {address}"))?;
    let id = data.id.ok_or_else(|| anyhow!("import of {address} returned no id"))?;
    state.set(address.clone(), id, data.attrs);
    Ok(())
}
