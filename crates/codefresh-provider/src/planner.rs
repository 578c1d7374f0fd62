//! diff and plan generation.

use crate::state::StateStore;
use crate::types::{FieldChange, Op, Plan};
use codefresh_core::{Address, Block, JsonMap};
use serde_json::Value;
use std::collections::BTreeSet;

/// build a deterministic plan from desired resources and stored state.
pub fn plan(desired: &[Block], state: &StateStore, allow_delete: bool) -> Plan {
    let mut ops = Vec::new();
    let mut seen = BTreeSet::new();

    let mut sorted: Vec<&Block> = desired.iter().collect();
    sorted.sort_by_key(|block| block.address());

    for block in sorted {
        let address = block.address();
        seen.insert(address.clone());
        match state.get(&address) {
            Some(entry) => {
                let changes = diff_attrs(&entry.attrs, &block.attrs);
                if !changes.is_empty() {
                    ops.push(Op::Update {
                        address,
                        id: entry.id.clone(),
                        desired: block.attrs.clone(),
                        changes,
                    });
                }
            }
            None => ops.push(Op::Create {
                address,
                desired: block.attrs.clone(),
            }),
        }
    }

    if allow_delete {
        for (address, entry) in state.entries() {
            if seen.contains(address) {
                continue;
            }
            ops.push(Op::Delete {
                address: address.clone(),
                id: entry.id.clone(),
            });
        }
    }

    Plan {
        ops: sort_ops_for_apply(&ops),
    }
}

/// plan that deletes every stored object.
pub fn destroy_plan(state: &StateStore) -> Plan {
    let ops = state
        .entries()
        .iter()
        .map(|(address, entry)| Op::Delete {
            address: address.clone(),
            id: entry.id.clone(),
        })
        .collect::<Vec<_>>();
    Plan {
        ops: sort_ops_for_apply(&ops),
    }
}

/// compute field-level diffs for attrs. keys only present in state are
/// computed values and never produce a change.
fn diff_attrs(existing: &JsonMap, desired: &JsonMap) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    for (key, to) in desired {
        let from = existing.get(key).cloned().unwrap_or(Value::Null);
        if from != *to {
            changes.push(FieldChange {
                field: key.clone(),
                from,
                to: to.clone(),
            });
        }
    }
    changes
}

/// stable sort key for plan operations.
fn op_order_key(op: &Op) -> (u8, Address) {
    let weight = match op {
        Op::Create { .. } | Op::Update { .. } => 0u8,
        Op::Delete { .. } => 1u8,
    };
    (weight, op.address().clone())
}

/// order operations for apply (creates/updates first, deletes last).
pub fn sort_ops_for_apply(ops: &[Op]) -> Vec<Op> {
    let mut ordered = ops.to_vec();
    ordered.sort_by_key(op_order_key);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn block(type_name: &str, name: &str, attrs: Value) -> Block {
        Block {
            type_name: type_name.to_string(),
            name: name.to_string(),
            attrs: serde_json::from_value(attrs).unwrap(),
        }
    }

    fn state_with(entries: &[(&str, &str, &str, Value)]) -> (tempfile::TempDir, StateStore) {
        let dir = tempdir().unwrap();
        let mut state = StateStore::load(dir.path().join("state.json")).unwrap();
        for (type_name, name, id, attrs) in entries {
            state.set(
                Address::new(*type_name, *name),
                *id,
                serde_json::from_value(attrs.clone()).unwrap(),
            );
        }
        (dir, state)
    }

    #[test]
    fn new_blocks_are_created() {
        let (_dir, state) = state_with(&[]);
        let plan = plan(
            &[block("codefresh_team", "devs", json!({ "name": "devs" }))],
            &state,
            false,
        );
        assert!(matches!(&plan.ops[0], Op::Create { address, .. } if address.name == "devs"));
    }

    #[test]
    fn computed_state_keys_are_ignored() {
        let (_dir, state) = state_with(&[(
            "codefresh_team",
            "devs",
            "t1",
            json!({ "name": "devs", "account_id": "acc1" }),
        )]);
        let plan = plan(
            &[block("codefresh_team", "devs", json!({ "name": "devs" }))],
            &state,
            false,
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn changed_fields_produce_update() {
        let (_dir, state) = state_with(&[(
            "codefresh_team",
            "devs",
            "t1",
            json!({ "name": "devs", "users": ["u1"] }),
        )]);
        let plan = plan(
            &[block(
                "codefresh_team",
                "devs",
                json!({ "name": "devs", "users": ["u1", "u2"] }),
            )],
            &state,
            false,
        );
        match &plan.ops[0] {
            Op::Update { id, changes, .. } => {
                assert_eq!(id, "t1");
                assert_eq!(changes.len(), 1);
                assert_eq!(changes[0].field, "users");
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn deletes_only_when_allowed_and_last() {
        let (_dir, state) = state_with(&[(
            "codefresh_context",
            "old",
            "old",
            json!({ "name": "old" }),
        )]);
        let desired = [block("codefresh_team", "devs", json!({ "name": "devs" }))];

        assert_eq!(plan(&desired, &state, false).ops.len(), 1);

        let plan = plan(&desired, &state, true);
        assert_eq!(plan.ops.len(), 2);
        assert!(matches!(plan.ops[0], Op::Create { .. }));
        assert!(matches!(plan.ops[1], Op::Delete { .. }));
    }

    #[test]
    fn destroy_deletes_everything() {
        let (_dir, state) = state_with(&[
            ("codefresh_team", "a", "t1", json!({})),
            ("codefresh_team", "b", "t2", json!({})),
        ]);
        let plan = destroy_plan(&state);
        assert_eq!(plan.ops.len(), 2);
        assert!(plan.ops.iter().all(|op| matches!(op, Op::Delete { .. })));
    }
}
