use anyhow::{Context as _, Result};
use std::path::Path;

use super::credentials::{Credentials, resolve_credentials};
use crate::api::client::{ApiClient, HttpClient};
use crate::context::Context;
use crate::terraform::{self, MODULE_NAME, TfVariables};

/// Handles 'export terraform' - exports the account configuration as a
/// Terraform module plus an import script
pub struct ExportCommand;

impl ExportCommand {
    /// Execute the export command
    pub fn execute(
        ctx: &Context,
        account: Option<&str>,
        api_key: Option<&str>,
        output_dir: Option<&str>,
    ) -> Result<()> {
        let credentials = resolve_credentials(ctx, account, api_key)?;
        let client = ApiClient::new(&credentials.account, &credentials.api_key);
        Self::run(ctx, &client, &credentials, output_dir)
    }

    /// Export using an already-constructed client
    pub fn run<H: HttpClient>(
        ctx: &Context,
        client: &ApiClient<H>,
        credentials: &Credentials,
        output_dir: Option<&str>,
    ) -> Result<()> {
        ctx.output.section("Export to Terraform");

        let output_dir = Path::new(output_dir.unwrap_or("terraform"));

        let generated = terraform::generate_module(client, MODULE_NAME)?;
        ctx.output
            .key_value("Entities", &generated.imports.len().to_string());

        let variables = TfVariables::new(&credentials.account, &credentials.api_key)?;
        let layout = terraform::write_module(&*ctx.fs, output_dir, &generated, &variables)
            .context("Failed to write Terraform module")?;

        ctx.output.blank();
        ctx.output.warning(&format!(
            "Your API key has been written to '{}' in plaintext, please take care to keep it secure",
            layout.tfvars.display()
        ));
        ctx.output
            .success(&format!("Export to '{}' completed", output_dir.display()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::HttpClient;
    use crate::traits::filesystem::MockFileSystem;
    use crate::traits::output::{MockOutput, OutputMessage};
    use crate::traits::user_input::MockUserInput;
    use anyhow::Context as _;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    struct MockHttpClient {
        responses: Mutex<std::collections::VecDeque<Value>>,
    }

    impl MockHttpClient {
        fn with_responses(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn post_json(&self, _url: &str, _api_key: &str, _body: &Value) -> Result<Value> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .context("No mock response configured")
        }
    }

    fn page(field: &str, nodes: Vec<Value>) -> Value {
        json!({
            "data": {
                field: {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "edges": nodes.into_iter().map(|n| json!({ "node": n })).collect::<Vec<_>>()
                }
            }
        })
    }

    #[test]
    fn test_export_writes_full_layout() {
        let http = MockHttpClient::with_responses(vec![
            page(
                "remoteNetworks",
                vec![json!({ "id": "net1", "name": "HQ" })],
            ),
            page(
                "connectors",
                vec![json!({ "id": "con1", "name": "hq connector", "remoteNetwork": { "id": "net1" } })],
            ),
            page("groups", vec![json!({ "id": "grp1", "name": "Ops" })]),
            page(
                "resources",
                vec![json!({
                    "id": "res1",
                    "name": "db",
                    "address": { "value": "db.internal" },
                    "remoteNetwork": { "id": "net1" },
                    "groups": {
                        "pageInfo": { "hasNextPage": false, "endCursor": null },
                        "edges": [{ "node": { "id": "grp1" } }]
                    },
                    "protocols": {
                        "allowIcmp": false,
                        "tcp": { "policy": "RESTRICTED", "ports": [{ "start": 443, "end": 443 }] },
                        "udp": { "policy": "ALLOW_ALL", "ports": [] }
                    }
                })],
            ),
        ]);

        let fs = Arc::new(MockFileSystem::new());
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(fs.clone(), Arc::new(MockUserInput::new()), output.clone());

        let client = ApiClient::with_client("acme", "secret", http);
        let credentials = Credentials {
            account: "acme".to_string(),
            api_key: "secret".to_string(),
        };

        ExportCommand::run(&ctx, &client, &credentials, Some("out")).unwrap();

        let module_tf = fs
            .get_file_contents(std::path::Path::new("out/twingate/twingate.tf"))
            .unwrap();
        assert!(module_tf.contains("remote_network_id = twingate_remote_network.HQ.id"));
        assert!(module_tf.contains("group_ids = [twingate_group.Ops.id]"));

        assert!(fs.has_file(std::path::Path::new("out/twingate.auto.tfvars.json")));

        // The plaintext-key warning is always printed
        assert!(output.messages().iter().any(|m| matches!(
            m,
            OutputMessage::Warning(text) if text.contains("API key")
        )));
    }

    #[test]
    fn test_export_propagates_fetch_failure() {
        let http = MockHttpClient::with_responses(vec![]);
        let ctx = Context::test();
        let client = ApiClient::with_client("acme", "secret", http);
        let credentials = Credentials {
            account: "acme".to_string(),
            api_key: "secret".to_string(),
        };

        let result = ExportCommand::run(&ctx, &client, &credentials, Some("out"));

        assert!(result.is_err());
    }
}
