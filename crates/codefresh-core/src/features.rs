//! account feature flag decoding.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// decode a raw `features` object into flag name -> enabled.
///
/// the api reports flags as booleans, as `"true"`/`"false"` strings, as
/// `{ "enabled": bool }` objects, or as `null` for flags that were never set.
/// anything that is not recognisably enabled decodes as disabled.
pub fn decode_feature_flags(raw: &Value) -> BTreeMap<String, bool> {
    let Value::Object(map) = raw else {
        return BTreeMap::new();
    };
    map.iter()
        .map(|(name, value)| (name.clone(), flag_enabled(value)))
        .collect()
}

fn flag_enabled(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_i64().map(|n| n != 0).unwrap_or(false),
        Value::Object(map) => map.get("enabled").map(flag_enabled).unwrap_or(false),
        _ => false,
    }
}

/// serde adapter for `#[serde(deserialize_with = ...)]` on feature maps.
pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(|v| decode_feature_flags(&v)).unwrap_or_default())
}
