//! local address -> remote object state store.

use anyhow::{Context, Result};
use codefresh_core::{Address, JsonMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// stored view of one managed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub id: String,
    #[serde(default)]
    pub attrs: JsonMap,
}

/// on-disk state schema.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateData {
    #[serde(default)]
    pub resources: BTreeMap<Address, StateEntry>,
}

/// json file of managed objects keyed by address.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    data: StateData,
}

impl StateStore {
    /// open the store at `path`; a missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("parse state: {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => StateData::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("read state: {}", path.display()))
            }
        };
        Ok(Self { path, data })
    }

    /// write to a sibling temp file, then rename it over the old state.
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("create state dir: {}", dir.display()))?;
        let staged = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(&self.data)?;
        fs::write(&staged, body).with_context(|| format!("write state: {}", staged.display()))?;
        fs::rename(&staged, &self.path)
            .with_context(|| format!("replace state: {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, address: &Address) -> Option<&StateEntry> {
        self.data.resources.get(address)
    }

    pub fn set(&mut self, address: Address, id: impl Into<String>, attrs: JsonMap) {
        self.data.resources.insert(
            address,
            StateEntry {
                id: id.into(),
                attrs,
            },
        );
    }

    pub fn remove(&mut self, address: &Address) -> Option<StateEntry> {
        self.data.resources.remove(address)
    }

    /// all entries ordered by address.
    pub fn entries(&self) -> &BTreeMap<Address, StateEntry> {
        &self.data.resources
    }

    pub fn is_empty(&self) -> bool {
        self.data.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = StateStore::load(dir.path().join("state.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn save_creates_parent_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".codefresh").join("state.json");
        let mut store = StateStore::load(&path).unwrap();
        let address = Address::new("codefresh_team", "devs");
        let mut attrs = JsonMap::new();
        attrs.insert("name".to_string(), json!("developers"));
        store.set(address.clone(), "t1", attrs);
        store.save().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"codefresh_team.devs\""));

        let reloaded = StateStore::load(&path).unwrap();
        let entry = reloaded.get(&address).unwrap();
        assert_eq!(entry.id, "t1");
        assert_eq!(entry.attrs["name"], json!("developers"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_state_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = StateStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("parse state"));
    }
}
