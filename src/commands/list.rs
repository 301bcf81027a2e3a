use anyhow::Result;

use super::credentials::resolve_credentials;
use crate::api::client::{ApiClient, HttpClient};
use crate::api::types::EntityType;
use crate::context::Context;

/// Handles the 'list' command - prints an id/name table for one entity type
pub struct ListCommand;

impl ListCommand {
    /// Execute the list command
    pub fn execute(
        ctx: &Context,
        account: Option<&str>,
        api_key: Option<&str>,
        entity_type: EntityType,
    ) -> Result<()> {
        let credentials = resolve_credentials(ctx, account, api_key)?;
        let client = ApiClient::new(&credentials.account, &credentials.api_key);
        Self::run(ctx, &client, entity_type)
    }

    /// List using an already-constructed client
    pub fn run<H: HttpClient>(
        ctx: &Context,
        client: &ApiClient<H>,
        entity_type: EntityType,
    ) -> Result<()> {
        let labels = client.fetch_labels(entity_type)?;

        ctx.output.table_header(&["Id", "Name"]);
        for label in &labels {
            ctx.output.table_row(&[&label.id, &label.name]);
        }
        ctx.output.blank();
        ctx.output.dimmed(&format!("{} total", labels.len()));

        Ok(())
    }
}
