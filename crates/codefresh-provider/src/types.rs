//! core provider types shared by resources, data sources and the planner.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use codefresh_client::{ApiError, Client};
use codefresh_core::{Address, JsonMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// working copy of one resource or data source instance.
///
/// `attrs` holds the configured values going in and the observed values
/// coming out. a read that leaves `id` empty means the object is gone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    pub id: Option<String>,
    pub attrs: JsonMap,
    /// attrs recorded by the last successful operation, set on update.
    pub prior: JsonMap,
    /// configuration-level warnings raised while handling this instance.
    pub warnings: Vec<String>,
}

impl ResourceData {
    pub fn new(attrs: JsonMap) -> Self {
        Self {
            attrs,
            ..Default::default()
        }
    }

    pub fn with_id(id: impl Into<String>, attrs: JsonMap) -> Self {
        Self {
            id: Some(id.into()),
            attrs,
            ..Default::default()
        }
    }

    /// id of an existing object; missing ids are a local error.
    pub fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| anyhow!("resource has no id"))
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// mark the object as vanished remotely.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key).filter(|value| !value.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// required string attribute.
    pub fn str(&self, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| anyhow!("missing required attribute `{key}`"))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// string list attribute; absent means empty.
    pub fn str_list(&self, key: &str) -> Result<Vec<String>> {
        self.decode_attr::<Vec<String>>(key)
            .map(Option::unwrap_or_default)
    }

    /// decode one attribute into a typed value.
    pub fn decode_attr<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .with_context(|| format!("attribute `{key}` has the wrong shape"))
            })
            .transpose()
    }

    /// string list from the prior attrs.
    pub fn prior_str_list(&self, key: &str) -> Vec<String> {
        self.prior
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    /// true when the working value of `key` differs from the prior one.
    pub fn changed(&self, key: &str) -> bool {
        self.get(key) != self.prior.get(key).filter(|value| !value.is_null())
    }

    /// first of `keys` whose value differs from the prior attrs.
    pub fn first_changed<'a>(&self, keys: &[&'a str]) -> Option<&'a str> {
        keys.iter().copied().find(|key| self.changed(key))
    }

    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("encode attribute `{key}`"))?;
        self.attrs.insert(key.to_string(), value);
        Ok(())
    }

    /// set only when a value is present; otherwise drop the key.
    pub fn set_opt(&mut self, key: &str, value: Option<impl Serialize>) -> Result<()> {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.attrs.remove(key);
                Ok(())
            }
        }
    }

    /// store an unordered string set, keeping the configured order when the
    /// members are unchanged.
    pub fn set_string_set(&mut self, key: &str, mut observed: Vec<String>) -> Result<()> {
        let configured = self.str_list(key).unwrap_or_default();
        let same = configured.iter().collect::<BTreeSet<_>>()
            == observed.iter().collect::<BTreeSet<_>>();
        if same && configured.len() == observed.len() {
            return self.set(key, configured);
        }
        observed.sort();
        self.set(key, observed)
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// map a read result, clearing the id when the api reports 404.
pub fn found<T>(data: &mut ResourceData, result: Result<T, ApiError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => {
            tracing::warn!(id = ?data.id, "object not found remotely");
            data.clear_id();
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// managed resource adapter.
#[async_trait]
pub trait Resource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<()>;
    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()>;
    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<()>;
    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<()>;

    /// adopt an existing remote object by id.
    async fn import(&self, client: &Client, id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::with_id(id, JsonMap::new());
        self.read(client, &mut data).await?;
        if data.id.is_none() {
            return Err(anyhow!("{} {id} does not exist", self.name()));
        }
        Ok(data)
    }
}

/// read-only lookup adapter.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()>;
}

/// field-level change for an update op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// attribute name.
    pub field: String,
    /// value from stored state.
    pub from: Value,
    /// configured value.
    pub to: Value,
}

/// plan operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// create a new remote object.
    Create { address: Address, desired: JsonMap },
    /// update an existing remote object.
    Update {
        address: Address,
        id: String,
        desired: JsonMap,
        changes: Vec<FieldChange>,
    },
    /// delete a remote object no longer in the manifest.
    Delete { address: Address, id: String },
}

impl Op {
    pub fn address(&self) -> &Address {
        match self {
            Op::Create { address, .. } | Op::Update { address, .. } | Op::Delete { address, .. } => {
                address
            }
        }
    }
}

/// full plan document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// ordered list of operations.
    pub ops: Vec<Op>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// result for a single applied operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedOp {
    pub address: Address,
    /// remote id after the op; `None` once deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// aggregated apply report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applied: Vec<AppliedOp>,
}
