//! gitops abac rules, served by the graphql api.

use crate::client::Client;
use crate::error::ApiError;
use codefresh_core::model::GitopsAbacRule;
use serde::Deserialize;
use serde_json::json;

const RULE_FIELDS: &str = "id accountId entityType teams tags actions attributes { name key value }";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RulesData {
    #[serde(default)]
    abac_rules: Vec<GitopsAbacRule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleData {
    abac_rule: Option<GitopsAbacRule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedData {
    create_abac_rule: GitopsAbacRule,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedData {
    update_abac_rule: GitopsAbacRule,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemovedData {
    #[allow(dead_code)]
    remove_abac_rule: Option<serde_json::Value>,
}

/// input shape shared by create and update mutations.
fn rule_input(rule: &GitopsAbacRule) -> serde_json::Value {
    let mut input = json!({
        "entityType": rule.entity_type,
        "teams": rule.teams,
        "tags": rule.tags,
        "actions": rule.actions,
        "attributes": rule.attributes,
    });
    if let Some(id) = &rule.id {
        input["id"] = json!(id);
    }
    input
}

impl Client {
    pub async fn get_abac_rules_list(
        &self,
        entity_type: &str,
    ) -> Result<Vec<GitopsAbacRule>, ApiError> {
        let query = format!(
            "query AbacRules($entityType: AbacEntityValues!) {{ abacRules(entityType: $entityType) {{ {RULE_FIELDS} }} }}"
        );
        let data: RulesData = self
            .graphql(&query, json!({ "entityType": entity_type }))
            .await?;
        Ok(data.abac_rules)
    }

    /// `None` when the api reports no rule with this id.
    pub async fn get_abac_rule_by_id(&self, id: &str) -> Result<Option<GitopsAbacRule>, ApiError> {
        let query =
            format!("query AbacRule($id: ID!) {{ abacRule(id: $id) {{ {RULE_FIELDS} }} }}");
        let data: RuleData = self.graphql(&query, json!({ "id": id })).await?;
        Ok(data.abac_rule)
    }

    pub async fn create_abac_rule(&self, rule: &GitopsAbacRule) -> Result<GitopsAbacRule, ApiError> {
        let query = format!(
            "mutation CreateAbacRule($createAbacRuleInput: CreateAbacRuleInput!) {{ createAbacRule(createAbacRuleInput: $createAbacRuleInput) {{ {RULE_FIELDS} }} }}"
        );
        let data: CreatedData = self
            .graphql(&query, json!({ "createAbacRuleInput": rule_input(rule) }))
            .await?;
        Ok(data.create_abac_rule)
    }

    pub async fn update_abac_rule(&self, rule: &GitopsAbacRule) -> Result<GitopsAbacRule, ApiError> {
        if rule.id.is_none() {
            return Err(ApiError::precondition("abac rule id is required for update"));
        }
        let query = format!(
            "mutation UpdateAbacRule($updateAbacRuleInput: UpdateAbacRuleInput!) {{ updateAbacRule(updateAbacRuleInput: $updateAbacRuleInput) {{ {RULE_FIELDS} }} }}"
        );
        let data: UpdatedData = self
            .graphql(&query, json!({ "updateAbacRuleInput": rule_input(rule) }))
            .await?;
        Ok(data.update_abac_rule)
    }

    pub async fn delete_abac_rule(&self, id: &str) -> Result<(), ApiError> {
        let query = "mutation RemoveAbacRule($id: ID!) { removeAbacRule(id: $id) { id } }";
        let _: RemovedData = self.graphql(query, json!({ "id": id })).await?;
        Ok(())
    }
}
