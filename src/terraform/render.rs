use anyhow::{Result, anyhow};

use super::sanitize::IdentifierMap;
use crate::api::types::{Connector, Group, PortRange, RemoteNetwork, Resource};

pub const TF_REMOTE_NETWORK: &str = "twingate_remote_network";
pub const TF_CONNECTOR: &str = "twingate_connector";
pub const TF_GROUP: &str = "twingate_group";
pub const TF_RESOURCE: &str = "twingate_resource";

fn section_header(title: &str) -> String {
    format!("\n#\n# {}\n#\n", title)
}

fn tf_id<'a>(map: &'a IdentifierMap, id: &str, what: &str) -> Result<&'a str> {
    map.resolve(id)
        .ok_or_else(|| anyhow!("{} '{}' is not in the identifier map", what, id))
}

/// Format a port range list the way the provider expects: `"80"` for a
/// single port, `"1000-2000"` for a range.
fn format_ports(ports: &[PortRange]) -> String {
    ports
        .iter()
        .map(|p| {
            if p.start == p.end {
                format!("\"{}\"", p.start)
            } else {
                format!("\"{}-{}\"", p.start, p.end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_remote_network(network: &RemoteNetwork, map: &IdentifierMap) -> Result<String> {
    let id = tf_id(map, &network.id, "Remote network")?;
    Ok(format!(
        r#"resource "{TF_REMOTE_NETWORK}" "{id}" {{ # Id: {entity_id}
  name = "{name}"
}}
output "network-{id}" {{
  value = {TF_REMOTE_NETWORK}.{id}
}}
"#,
        entity_id = network.id,
        name = network.name,
    ))
}

fn render_connector(connector: &Connector, map: &IdentifierMap) -> Result<String> {
    let id = tf_id(map, &connector.id, "Connector")?;
    let network_id = map.resolve(&connector.remote_network_id).ok_or_else(|| {
        anyhow!(
            "Connector '{}' references unknown remote network '{}'",
            connector.id,
            connector.remote_network_id
        )
    })?;
    Ok(format!(
        r#"resource "{TF_CONNECTOR}" "{id}" {{ # Id: {entity_id}
  name = "{name}"
  remote_network_id = {TF_REMOTE_NETWORK}.{network_id}.id
}}
output "connector-{id}" {{
  value = {TF_CONNECTOR}.{id}
}}
"#,
        entity_id = connector.id,
        name = connector.name,
    ))
}

fn render_group(group: &Group, map: &IdentifierMap) -> Result<String> {
    let id = tf_id(map, &group.id, "Group")?;
    Ok(format!(
        r#"resource "{TF_GROUP}" "{id}" {{ # Id: {entity_id}
  name = "{name}"
}}
output "group-{id}" {{
  value = {TF_GROUP}.{id}
}}
"#,
        entity_id = group.id,
        name = group.name,
    ))
}

fn render_resource(resource: &Resource, map: &IdentifierMap) -> Result<String> {
    let id = tf_id(map, &resource.id, "Resource")?;
    let network_id = map.resolve(&resource.remote_network_id).ok_or_else(|| {
        anyhow!(
            "Resource '{}' references unknown remote network '{}'",
            resource.id,
            resource.remote_network_id
        )
    })?;

    let group_refs = resource
        .group_ids
        .iter()
        .map(|group_id| {
            map.resolve(group_id)
                .map(|tf| format!("{TF_GROUP}.{tf}.id"))
                .ok_or_else(|| {
                    anyhow!(
                        "Resource '{}' references unknown group '{}'",
                        resource.id,
                        group_id
                    )
                })
        })
        .collect::<Result<Vec<_>>>()?
        .join(", ");

    Ok(format!(
        r#"resource "{TF_RESOURCE}" "{id}" {{ # Id: {entity_id}
  name = "{name}"
  address = "{address}"
  remote_network_id = {TF_REMOTE_NETWORK}.{network_id}.id
  group_ids = [{group_refs}]
  protocols {{
    allow_icmp = {allow_icmp}
    tcp {{
      policy = "{tcp_policy}"
      ports = [{tcp_ports}]
    }}
    udp {{
      policy = "{udp_policy}"
      ports = [{udp_ports}]
    }}
  }}
}}
output "resource-{id}" {{
  value = {TF_RESOURCE}.{id}
}}
"#,
        entity_id = resource.id,
        name = resource.name,
        address = resource.address,
        allow_icmp = resource.protocols.allow_icmp,
        tcp_policy = resource.protocols.tcp.policy,
        tcp_ports = format_ports(&resource.protocols.tcp.ports),
        udp_policy = resource.protocols.udp.policy,
        udp_ports = format_ports(&resource.protocols.udp.ports),
    ))
}

/// Render the remote-network section, header included
pub fn remote_networks_section(networks: &[RemoteNetwork], map: &IdentifierMap) -> Result<String> {
    let blocks = networks
        .iter()
        .map(|n| render_remote_network(n, map))
        .collect::<Result<Vec<_>>>()?;
    Ok(section_header("Twingate Remote Networks") + &blocks.join("\n"))
}

/// Render the connector section, header included
pub fn connectors_section(connectors: &[Connector], map: &IdentifierMap) -> Result<String> {
    let blocks = connectors
        .iter()
        .map(|c| render_connector(c, map))
        .collect::<Result<Vec<_>>>()?;
    Ok(section_header("Twingate Connectors") + &blocks.join("\n"))
}

/// Render the group section, header included
pub fn groups_section(groups: &[Group], map: &IdentifierMap) -> Result<String> {
    let blocks = groups
        .iter()
        .map(|g| render_group(g, map))
        .collect::<Result<Vec<_>>>()?;
    Ok(section_header("Twingate Groups") + &blocks.join("\n"))
}

/// Render the resource section, header included
pub fn resources_section(resources: &[Resource], map: &IdentifierMap) -> Result<String> {
    let blocks = resources
        .iter()
        .map(|r| render_resource(r, map))
        .collect::<Result<Vec<_>>>()?;
    Ok(section_header("Twingate Resources") + &blocks.join("\n"))
}
