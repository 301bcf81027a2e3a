use anyhow::{Result, anyhow};

use super::render::{TF_CONNECTOR, TF_GROUP, TF_REMOTE_NETWORK, TF_RESOURCE};
use super::sanitize::IdentifierMap;
use crate::api::types::{Resource, Snapshot};

fn import_line(module: &str, tf_type: &str, tf_id: &str, entity_id: &str) -> String {
    format!("terraform import module.{module}.{tf_type}.{tf_id} {entity_id}")
}

/// Build one `terraform import` line per entity, in render order
/// (networks, connectors, groups, resources; fetch order within each type).
pub fn build_import_lines(
    snapshot: &Snapshot,
    resources: &[Resource],
    map: &IdentifierMap,
    module: &str,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    for network in &snapshot.remote_networks {
        push_line(&mut lines, map, module, TF_REMOTE_NETWORK, &network.id)?;
    }
    for connector in &snapshot.connectors {
        push_line(&mut lines, map, module, TF_CONNECTOR, &connector.id)?;
    }
    for group in &snapshot.groups {
        push_line(&mut lines, map, module, TF_GROUP, &group.id)?;
    }
    for resource in resources {
        push_line(&mut lines, map, module, TF_RESOURCE, &resource.id)?;
    }

    Ok(lines)
}

fn push_line(
    lines: &mut Vec<String>,
    map: &IdentifierMap,
    module: &str,
    tf_type: &str,
    entity_id: &str,
) -> Result<()> {
    let tf_id = map
        .resolve(entity_id)
        .ok_or_else(|| anyhow!("Entity '{}' is not in the identifier map", entity_id))?;
    lines.push(import_line(module, tf_type, tf_id, entity_id));
    Ok(())
}

/// Script body for unix shells; the caller writes it with mode 0755
pub fn script_body_unix(lines: &[String]) -> String {
    format!("#!/bin/sh\n{}", lines.join("\n"))
}

/// Script body for Windows batch files (CRLF line endings)
pub fn script_body_windows(lines: &[String]) -> String {
    lines.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Group, RemoteNetwork};

    #[test]
    fn test_import_lines_follow_render_order() {
        let snapshot = Snapshot {
            remote_networks: vec![RemoteNetwork {
                id: "net1".to_string(),
                name: "HQ".to_string(),
            }],
            connectors: vec![],
            groups: vec![
                Group {
                    id: "grp1".to_string(),
                    name: "Ops".to_string(),
                },
                Group {
                    id: "grp2".to_string(),
                    name: "Eng Team".to_string(),
                },
            ],
        };

        let mut map = IdentifierMap::new();
        map.register("net1", "HQ");
        map.register("grp1", "Ops");
        map.register("grp2", "Eng Team");

        let lines = build_import_lines(&snapshot, &[], &map, "twingate").unwrap();

        assert_eq!(
            lines,
            vec![
                "terraform import module.twingate.twingate_remote_network.HQ net1",
                "terraform import module.twingate.twingate_group.Ops grp1",
                "terraform import module.twingate.twingate_group.Eng-Team grp2",
            ]
        );
    }

    #[test]
    fn test_import_lines_fail_on_unregistered_entity() {
        let snapshot = Snapshot {
            remote_networks: vec![RemoteNetwork {
                id: "net1".to_string(),
                name: "HQ".to_string(),
            }],
            ..Default::default()
        };

        let err = build_import_lines(&snapshot, &[], &IdentifierMap::new(), "twingate").unwrap_err();
        assert!(err.to_string().contains("net1"));
    }

    #[test]
    fn test_script_bodies() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(script_body_unix(&lines), "#!/bin/sh\na\nb");
        assert_eq!(script_body_windows(&lines), "a\r\nb");
    }
}
