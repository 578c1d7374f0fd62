//! manifest validation.

use crate::manifest::{Address, Block, Manifest};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use thiserror::Error;

/// validation errors emitted for a manifest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate address: {0}")]
    DuplicateAddress(Address),
    #[error("missing type on block {0:?}")]
    MissingType(String),
    #[error("invalid name {name:?} on {type_name}")]
    InvalidName { type_name: String, name: String },
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error("unknown data source type: {0}")]
    UnknownDataSourceType(String),
}

/// aggregated validation report.
#[derive(Debug, Default, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// return true when no errors are present.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// return true when errors are present.
    pub fn is_err(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("static regex"))
}

/// validate block names, address uniqueness and registered types.
///
/// `is_resource` and `is_data_source` answer whether a type name is known.
pub fn validate_manifest(
    manifest: &Manifest,
    is_resource: impl Fn(&str) -> bool,
    is_data_source: impl Fn(&str) -> bool,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut seen = BTreeSet::new();
    for block in &manifest.resources {
        validate_block(block, &mut seen, &mut report);
        if !block.type_name.is_empty() && !is_resource(&block.type_name) {
            report
                .errors
                .push(ValidationError::UnknownResourceType(block.type_name.clone()));
        }
    }

    let mut seen = BTreeSet::new();
    for block in &manifest.data {
        validate_block(block, &mut seen, &mut report);
        if !block.type_name.is_empty() && !is_data_source(&block.type_name) {
            report
                .errors
                .push(ValidationError::UnknownDataSourceType(block.type_name.clone()));
        }
    }

    report
}

fn validate_block(block: &Block, seen: &mut BTreeSet<Address>, report: &mut ValidationReport) {
    if block.type_name.is_empty() {
        report
            .errors
            .push(ValidationError::MissingType(block.name.clone()));
        return;
    }
    if !name_pattern().is_match(&block.name) {
        report.errors.push(ValidationError::InvalidName {
            type_name: block.type_name.clone(),
            name: block.name.clone(),
        });
    }
    let address = block.address();
    if !seen.insert(address.clone()) {
        report.errors.push(ValidationError::DuplicateAddress(address));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::JsonMap;

    fn block(type_name: &str, name: &str) -> Block {
        Block {
            type_name: type_name.to_string(),
            name: name.to_string(),
            attrs: JsonMap::new(),
        }
    }

    fn known(name: &str) -> bool {
        name.starts_with("codefresh_")
    }

    #[test]
    fn valid_manifest_passes() {
        let manifest = Manifest {
            provider: None,
            resources: vec![block("codefresh_team", "devs"), block("codefresh_team", "ops")],
            data: vec![block("codefresh_team", "devs")],
        };
        assert!(validate_manifest(&manifest, known, known).is_ok());
    }

    #[test]
    fn duplicate_address_is_reported() {
        let manifest = Manifest {
            provider: None,
            resources: vec![block("codefresh_team", "devs"), block("codefresh_team", "devs")],
            data: vec![],
        };
        let report = validate_manifest(&manifest, known, known);
        assert_eq!(
            report.errors,
            vec![ValidationError::DuplicateAddress(Address::new(
                "codefresh_team",
                "devs"
            ))]
        );
    }

    #[test]
    fn invalid_name_and_unknown_type() {
        let manifest = Manifest {
            provider: None,
            resources: vec![block("codefresh_team", "9lives"), block("aws_s3", "bucket")],
            data: vec![block("", "x")],
        };
        let report = validate_manifest(&manifest, known, known);
        assert!(report.is_err());
        assert!(report.errors.contains(&ValidationError::InvalidName {
            type_name: "codefresh_team".to_string(),
            name: "9lives".to_string(),
        }));
        assert!(report
            .errors
            .contains(&ValidationError::UnknownResourceType("aws_s3".to_string())));
        assert!(report
            .errors
            .contains(&ValidationError::MissingType("x".to_string())));
    }
}
