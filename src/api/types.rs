use anyhow::bail;
use serde::Deserialize;

/// The entity types managed through the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    RemoteNetwork,
    Connector,
    Group,
    Resource,
}

impl EntityType {
    /// The GraphQL connection field that lists entities of this type
    pub fn graphql_field(&self) -> &'static str {
        match self {
            EntityType::RemoteNetwork => "remoteNetworks",
            EntityType::Connector => "connectors",
            EntityType::Group => "groups",
            EntityType::Resource => "resources",
        }
    }
}

/// Level of detail requested per fetch, controlling response payload size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum FieldSet {
    /// Only the entity id
    Id,
    /// Id plus display name
    Label,
    /// Label plus referenced entity ids (owning network, group list)
    Nodes,
    /// Every field the renderer needs (addresses, protocols)
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteNetwork {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub id: String,
    pub name: String,
    pub remote_network_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub address: String,
    pub remote_network_id: String,
    pub group_ids: Vec<String>,
    pub protocols: Protocols,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Protocols {
    pub allow_icmp: bool,
    pub tcp: ProtocolPolicy,
    pub udp: ProtocolPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolPolicy {
    /// Access policy string as reported by the API, e.g. "ALLOW_ALL" or "RESTRICTED"
    pub policy: String,
    pub ports: Vec<PortRange>,
}

/// Inclusive port range; a single port has start == end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    #[allow(dead_code)]
    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }
}

/// One run's read-only snapshot of the lightweight entity types
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub remote_networks: Vec<RemoteNetwork>,
    pub connectors: Vec<Connector>,
    pub groups: Vec<Group>,
}

/// Result payload of a delete mutation
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct DeleteResult {
    pub ok: bool,
    pub error: Option<String>,
}

// Wire-side shapes. The API returns relay-style connections; these structs
// mirror that and flatten into the model above (nested nodes become plain
// id lists).

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoteNetworkNode {
    pub id: String,
    pub name: String,
}

impl From<RemoteNetworkNode> for RemoteNetwork {
    fn from(node: RemoteNetworkNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConnectorNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "remoteNetwork")]
    pub remote_network: IdRef,
}

impl From<ConnectorNode> for Connector {
    fn from(node: ConnectorNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            remote_network_id: node.remote_network.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupNode {
    pub id: String,
    pub name: String,
}

impl From<GroupNode> for Group {
    fn from(node: GroupNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressNode {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortRangeNode {
    pub start: u16,
    pub end: u16,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProtocolPolicyNode {
    pub policy: String,
    pub ports: Vec<PortRangeNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProtocolsNode {
    #[serde(rename = "allowIcmp")]
    pub allow_icmp: bool,
    pub tcp: ProtocolPolicyNode,
    pub udp: ProtocolPolicyNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceNode {
    pub id: String,
    pub name: String,
    pub address: AddressNode,
    #[serde(rename = "remoteNetwork")]
    pub remote_network: IdRef,
    pub groups: Connection<IdRef>,
    pub protocols: ProtocolsNode,
}

impl TryFrom<ResourceNode> for Resource {
    type Error = anyhow::Error;

    /// Flattens the nested group connection into a plain id list. Fails when
    /// the connection reports more groups than the response carried, so a
    /// partial membership list never reaches the renderer.
    fn try_from(node: ResourceNode) -> Result<Self, Self::Error> {
        if node.groups.page_info.has_next_page {
            bail!(
                "Resource '{}' has more groups than a single fetch returned",
                node.id
            );
        }

        Ok(Self {
            id: node.id,
            name: node.name,
            address: node.address.value,
            remote_network_id: node.remote_network.id,
            group_ids: node.groups.edges.into_iter().map(|e| e.node.id).collect(),
            protocols: Protocols {
                allow_icmp: node.protocols.allow_icmp,
                tcp: ProtocolPolicy {
                    policy: node.protocols.tcp.policy,
                    ports: node
                        .protocols
                        .tcp
                        .ports
                        .into_iter()
                        .map(|p| PortRange {
                            start: p.start,
                            end: p.end,
                        })
                        .collect(),
                },
                udp: ProtocolPolicy {
                    policy: node.protocols.udp.policy,
                    ports: node
                        .protocols
                        .udp
                        .ports
                        .into_iter()
                        .map(|p| PortRange {
                            start: p.start,
                            end: p.end,
                        })
                        .collect(),
                },
            },
        })
    }
}
