//! `codefresh_account_idp` data source: idps configured on the current account.

use crate::data_sources::idps::select_idp;
use crate::types::{DataSource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;

pub struct AccountIdpData;

#[async_trait]
impl DataSource for AccountIdpData {
    fn name(&self) -> &'static str {
        "codefresh_account_idp"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let idps = client.get_account_idps().await?;
        select_idp(data, idps)
    }
}
