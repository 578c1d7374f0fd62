//! yaml normalization used to suppress formatting-only diffs.

use serde_yaml::Value;

/// re-serialize yaml into a canonical form with mapping keys sorted.
pub fn normalize_yaml(raw: &str) -> Result<String, serde_yaml::Error> {
    let value: Value = serde_yaml::from_str(raw)?;
    serde_yaml::to_string(&sorted(value))
}

/// true when both documents parse to the same yaml value.
///
/// documents that fail to parse are compared textually.
pub fn yaml_equivalent(left: &str, right: &str) -> bool {
    match (normalize_yaml(left), normalize_yaml(right)) {
        (Ok(l), Ok(r)) => l == r,
        _ => left.trim() == right.trim(),
    }
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut entries: Vec<(Value, Value)> =
                map.into_iter().map(|(k, v)| (k, sorted(v))).collect();
            entries.sort_by(|(a, _), (b, _)| key_order(a).cmp(&key_order(b)));
            Value::Mapping(entries.into_iter().collect())
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(sorted).collect()),
        Value::Tagged(tagged) => {
            let mut tagged = *tagged;
            tagged.value = sorted(tagged.value);
            Value::Tagged(Box::new(tagged))
        }
        other => other,
    }
}

fn key_order(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_does_not_matter() {
        let a = "version: '1.0'\nsteps:\n  build:\n    image: alpine\n    title: Build\n";
        let b = "steps:\n  build:\n    title: Build\n    image: alpine\nversion: '1.0'\n";
        assert!(yaml_equivalent(a, b));
    }

    #[test]
    fn sequence_order_matters() {
        assert!(!yaml_equivalent("a: [1, 2]", "a: [2, 1]"));
    }

    #[test]
    fn different_values_differ() {
        assert!(!yaml_equivalent("a: 1", "a: 2"));
    }

    #[test]
    fn normalize_sorts_nested_keys() {
        let out = normalize_yaml("b:\n  z: 1\n  y: 2\na: 3\n").unwrap();
        assert_eq!(out, "a: 3\nb:\n  y: 2\n  z: 1\n");
    }

    #[test]
    fn invalid_yaml_falls_back_to_text() {
        assert!(yaml_equivalent("a: [", "a: [\n"));
        assert!(!yaml_equivalent("a: [", "b: ["));
    }
}
