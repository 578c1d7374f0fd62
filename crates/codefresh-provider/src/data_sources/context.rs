//! `codefresh_context` data source.

use crate::resources::context::map_context;
use crate::types::{DataSource, ResourceData};
use anyhow::Result;
use async_trait::async_trait;
use codefresh_client::Client;

pub struct ContextData;

#[async_trait]
impl DataSource for ContextData {
    fn name(&self) -> &'static str {
        "codefresh_context"
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<()> {
        let name = data.str("name")?.to_string();
        let context = client.get_context(&name).await?;
        map_context(data, &context)?;
        data.set_id(name);
        Ok(())
    }
}
