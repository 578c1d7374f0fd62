//! manifest loading with include support.

use crate::registry;
use anyhow::{anyhow, Context, Result};
use codefresh_core::{validate_manifest, Block, Manifest};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// raw on-disk representation for a manifest file.
#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    provider: Option<Value>,
    #[serde(default)]
    resources: Vec<Block>,
    #[serde(default)]
    data: Vec<Block>,
}

/// load a manifest (yaml or json), merge its includes and validate it.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest> {
    let mut visited = BTreeSet::new();
    let mut manifest = Manifest::default();
    load_recursive(path.as_ref(), &mut visited, &mut manifest)?;
    validate(&manifest)?;
    Ok(manifest)
}

/// validate block addresses and types against the registry.
pub fn validate(manifest: &Manifest) -> Result<()> {
    let report = validate_manifest(
        manifest,
        registry::is_resource_type,
        registry::is_data_source_type,
    );
    if report.is_ok() {
        return Ok(());
    }
    let mut message = String::from("validation failed:\n");
    for error in &report.errors {
        message.push_str(&format!("- {error}\n"));
    }
    Err(anyhow!(message))
}

/// recursive loader with cycle-safe include handling.
fn load_recursive(path: &Path, visited: &mut BTreeSet<PathBuf>, manifest: &mut Manifest) -> Result<()> {
    let canonical =
        fs::canonicalize(path).with_context(|| format!("load manifest: {}", path.display()))?;
    if !visited.insert(canonical.clone()) {
        return Ok(());
    }

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("read manifest: {}", canonical.display()))?;
    let file: ManifestFile = if canonical.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::from_str(&content)
            .with_context(|| format!("parse json: {}", canonical.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("parse yaml: {}", canonical.display()))?
    };

    let base = canonical
        .parent()
        .ok_or_else(|| anyhow!("missing parent dir for {}", canonical.display()))?;

    for entry in &file.include {
        load_recursive(&base.join(entry), visited, manifest)?;
    }

    // the including file's provider block overrides its includes
    if file.provider.is_some() {
        manifest.provider = file.provider;
    }
    manifest.resources.extend(file.resources);
    manifest.data.extend(file.data);
    Ok(())
}
