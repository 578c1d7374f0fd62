//! declarative manifest types: resources and data sources by address.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// attribute map for a resource block or its stored state.
pub type JsonMap = BTreeMap<String, Value>;

/// `type.name` address of a block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    /// resource or data source type, e.g. `codefresh_team`.
    pub type_name: String,
    /// local name from the manifest.
    pub name: String,
}

impl Address {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.name)
    }
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.split_once('.') {
            Some((type_name, name)) if !type_name.is_empty() && !name.is_empty() => {
                Ok(Address::new(type_name, name))
            }
            _ => Err(format!("invalid address: {value}")),
        }
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

/// one resource or data source block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// registered type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// local name, unique per type.
    pub name: String,
    /// configured attributes.
    #[serde(default)]
    pub attrs: JsonMap,
}

impl Block {
    pub fn address(&self) -> Address {
        Address::new(&self.type_name, &self.name)
    }
}

/// merged manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// provider configuration overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Value>,
    /// managed resources.
    #[serde(default)]
    pub resources: Vec<Block>,
    /// read-only data sources.
    #[serde(default)]
    pub data: Vec<Block>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_and_parse() {
        let address = Address::new("codefresh_team", "devs");
        assert_eq!(address.to_string(), "codefresh_team.devs");
        let parsed = Address::try_from("codefresh_team.devs".to_string()).unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn address_rejects_missing_name() {
        assert!(Address::try_from("codefresh_team".to_string()).is_err());
        assert!(Address::try_from("codefresh_team.".to_string()).is_err());
    }

    #[test]
    fn manifest_parses_yaml() {
        let raw = r#"
resources:
  - type: codefresh_team
    name: devs
    attrs:
      name: developers
      users: ["u1"]
data:
  - type: codefresh_current_account
    name: me
"#;
        let manifest: Manifest = serde_yaml::from_str(raw).unwrap();
        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.resources[0].attrs["name"], "developers");
        assert!(manifest.data[0].attrs.is_empty());
        assert!(manifest.provider.is_none());
    }
}
