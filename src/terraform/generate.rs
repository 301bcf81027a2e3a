use anyhow::{Context, Result};

use super::import_script;
use super::render;
use super::sanitize::IdentifierMap;
use crate::api::client::{ApiClient, FetchConfig, HttpClient};
use crate::api::types::{EntityType, FieldSet, Resource, Snapshot};

/// Rendered module content plus the matching import commands
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    /// The four concatenated resource/output sections
    pub content: String,
    /// One `terraform import` line per entity, in render order
    pub imports: Vec<String>,
}

/// Fetch everything from the API and generate the Terraform module.
///
/// Networks, connectors and groups come from one lightweight batch fetch;
/// resources are fetched separately with the full field set because their
/// blocks need address and protocol details.
pub fn generate_module<H: HttpClient>(
    client: &ApiClient<H>,
    module: &str,
) -> Result<GeneratedModule> {
    let snapshot = client
        .fetch_all(&FetchConfig {
            types_to_fetch: vec![
                EntityType::RemoteNetwork,
                EntityType::Connector,
                EntityType::Group,
            ],
            field_set: FieldSet::Nodes,
        })
        .context("Failed to fetch networks, connectors and groups")?;

    let resources = client
        .fetch_all_resources()
        .context("Failed to fetch resources")?;

    generate_from_entities(&snapshot, &resources, module)
}

/// Generate the module from an already-fetched snapshot.
///
/// Every entity is registered in the identifier map before any section is
/// rendered, so cross-references always resolve against the complete map.
pub fn generate_from_entities(
    snapshot: &Snapshot,
    resources: &[Resource],
    module: &str,
) -> Result<GeneratedModule> {
    let mut map = IdentifierMap::new();
    for network in &snapshot.remote_networks {
        map.register(&network.id, &network.name);
    }
    for connector in &snapshot.connectors {
        map.register(&connector.id, &connector.name);
    }
    for group in &snapshot.groups {
        map.register(&group.id, &group.name);
    }
    for resource in resources {
        map.register(&resource.id, &resource.name);
    }

    let sections = [
        render::remote_networks_section(&snapshot.remote_networks, &map)?,
        render::connectors_section(&snapshot.connectors, &map)?,
        render::groups_section(&snapshot.groups, &map)?,
        render::resources_section(resources, &map)?,
    ];

    let imports = import_script::build_import_lines(snapshot, resources, &map, module)?;

    Ok(GeneratedModule {
        content: sections.join("\n\n"),
        imports,
    })
}
