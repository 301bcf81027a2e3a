use anyhow::{Result, bail};
use clap::ValueEnum;

use super::credentials::resolve_credentials;
use crate::api::client::{ApiClient, HttpClient};
use crate::api::types::DeleteResult;
use crate::context::Context;

/// Entity kinds that can be removed by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RemoveKind {
    Group,
    Resource,
    ServiceAccount,
}

impl RemoveKind {
    fn noun(&self) -> &'static str {
        match self {
            RemoveKind::Group => "group",
            RemoveKind::Resource => "resource",
            RemoveKind::ServiceAccount => "service account",
        }
    }
}

/// Output format for the remove command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Handles the 'remove' command - deletes one entity by id
pub struct RemoveCommand;

impl RemoveCommand {
    /// Execute the remove command
    pub fn execute(
        ctx: &Context,
        account: Option<&str>,
        api_key: Option<&str>,
        kind: RemoveKind,
        id: &str,
        format: OutputFormat,
    ) -> Result<()> {
        let credentials = resolve_credentials(ctx, account, api_key)?;
        let client = ApiClient::new(&credentials.account, &credentials.api_key);
        Self::run(ctx, &client, kind, id, format)
    }

    /// Remove using an already-constructed client
    pub fn run<H: HttpClient>(
        ctx: &Context,
        client: &ApiClient<H>,
        kind: RemoveKind,
        id: &str,
        format: OutputFormat,
    ) -> Result<()> {
        let result = match kind {
            RemoveKind::Group => client.remove_group(id)?,
            RemoveKind::Resource => client.remove_resource(id)?,
            RemoveKind::ServiceAccount => client.remove_service_account(id)?,
        };

        match format {
            OutputFormat::Json => {
                ctx.output.plain(&serde_json::to_string(&result)?);
            }
            OutputFormat::Text => {
                report_text(ctx, kind, id, &result)?;
            }
        }

        Ok(())
    }
}

fn report_text(ctx: &Context, kind: RemoveKind, id: &str, result: &DeleteResult) -> Result<()> {
    if !result.ok {
        bail!(
            "Failed to remove {} '{}': {}",
            kind.noun(),
            id,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    ctx.output
        .success(&format!("Removed {} with id '{}'", kind.noun(), id));
    Ok(())
}
