//! `codefresh_idps` data source: system idps filtered by id, names or type.

use crate::types::{DataSource, ResourceData};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use codefresh_client::Client;
use codefresh_core::model::Idp;

pub struct IdpsData;

/// apply the optional `_id`, `display_name`, `client_name` and `client_type`
/// filters; exactly one idp must remain.
pub(crate) fn select_idp(data: &mut ResourceData, idps: Vec<Idp>) -> Result<()> {
    let id = data.get_str("_id");
    let display_name = data.get_str("display_name");
    let client_name = data.get_str("client_name");
    let client_type = data.get_str("client_type");
    let mut matches: Vec<Idp> = idps
        .into_iter()
        .filter(|idp| id.map_or(true, |id| idp.id.as_deref() == Some(id)))
        .filter(|idp| display_name.map_or(true, |name| idp.display_name == name))
        .filter(|idp| client_name.map_or(true, |name| idp.client_name.as_deref() == Some(name)))
        .filter(|idp| client_type.map_or(true, |kind| idp.client_type == kind))
        .collect();
    let idp = match matches.len() {
        0 => return Err(anyhow!("no idp matches the given filters")),
        1 => matches.remove(0),
        n => return Err(anyhow!("{n} idps match the given filters; narrow them down")),
    };
    let id = idp
        .id
        .clone()
        .ok_or_else(|| anyhow!("idp {} has no id", idp.display_name))?;
    data.set("_id", &id)?;
    data.set("display_name", &idp.display_name)?;
    data.set_opt("client_name", idp.client_name.as_deref())?;
    data.set("client_type", &idp.client_type)?;
    data.set_opt("client_host", idp.client_host.as_deref())?;
    data.set_opt("login_url", idp.login_url.as_deref())?;
    data.set_opt("callback_url", idp.callback_url.as_deref())?;
    data.set("accounts", &idp.accounts)?;
    data.set_id(id);
    Ok(())
}

#[async_trait]
impl DataSource for IdpsData {
    fn name(&self) -> &'static str {
        "codefresh_idps"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let idps = client.get_idps().await?;
        select_idp(data, idps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn idp(id: &str, name: &str, kind: &str) -> Idp {
        Idp {
            id: Some(id.to_string()),
            display_name: name.to_string(),
            client_type: kind.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn filters_narrow_to_one() {
        let mut data = ResourceData::new(
            serde_json::from_value(json!({ "client_type": "okta" })).unwrap(),
        );
        select_idp(
            &mut data,
            vec![idp("i1", "github", "github"), idp("i2", "okta", "okta")],
        )
        .unwrap();
        assert_eq!(data.id.as_deref(), Some("i2"));
        assert_eq!(data.get_str("display_name"), Some("okta"));
    }

    #[test]
    fn ambiguous_filters_fail() {
        let mut data = ResourceData::default();
        let err = select_idp(
            &mut data,
            vec![idp("i1", "a", "okta"), idp("i2", "b", "okta")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("2 idps"));
    }
}
