use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::types::{
    Connection, Connector, ConnectorNode, DeleteResult, EntityType, FieldSet, Group, GroupNode,
    RemoteNetwork, RemoteNetworkNode, Resource, ResourceNode, Snapshot,
};

const PAGE_SIZE: u32 = 100;

/// HTTP client trait for testing
pub trait HttpClient: Send + Sync {
    /// POST a JSON body and return the parsed JSON response
    fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<Value>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header("X-API-KEY", api_key)
            .json(body)
            .send()
            .with_context(|| format!("Failed to reach API endpoint: {}", url))?;

        if !response.status().is_success() {
            bail!(
                "API request failed with status {}: {}",
                response.status(),
                url
            );
        }

        response
            .json()
            .with_context(|| format!("Failed to parse API response from: {}", url))
    }
}

/// Configuration for a fetch-all call
pub struct FetchConfig {
    pub types_to_fetch: Vec<EntityType>,
    pub field_set: FieldSet,
}

/// Lightweight id/name record used by listings
#[derive(Debug, Clone, serde::Deserialize)]
pub struct EntityLabel {
    pub id: String,
    pub name: String,
}

/// GraphQL API client for one account
pub struct ApiClient<H: HttpClient = ReqwestClient> {
    account: String,
    api_key: String,
    http: H,
}

impl ApiClient<ReqwestClient> {
    /// Create a new API client with the default HTTP client
    pub fn new(account: &str, api_key: &str) -> Self {
        Self {
            account: account.to_string(),
            api_key: api_key.to_string(),
            http: ReqwestClient::new(),
        }
    }
}

impl<H: HttpClient> ApiClient<H> {
    /// Create a new API client with a custom HTTP client (for testing)
    #[allow(dead_code)]
    pub fn with_client(account: &str, api_key: &str, http: H) -> Self {
        Self {
            account: account.to_string(),
            api_key: api_key.to_string(),
            http,
        }
    }

    fn endpoint(&self) -> String {
        format!("https://{}.twingate.com/api/graphql/", self.account)
    }

    /// Execute one GraphQL document and return its `data` payload
    fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        let body = json!({ "query": query, "variables": variables });
        let response = self.http.post_json(&self.endpoint(), &self.api_key, &body)?;

        if let Some(errors) = response.get("errors").and_then(|e| e.as_array()) {
            if !errors.is_empty() {
                let messages = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                    .collect::<Vec<_>>()
                    .join("; ");
                bail!("API returned errors: {}", messages);
            }
        }

        response
            .get("data")
            .cloned()
            .context("API response missing data payload")
    }

    /// Fetch every page of one connection field, in API return order
    fn fetch_connection<T: DeserializeOwned>(&self, field: &str, selection: &str) -> Result<Vec<T>> {
        let query = format!(
            "query($after: String) {{ {field}(first: {PAGE_SIZE}, after: $after) {{ \
             pageInfo {{ hasNextPage endCursor }} edges {{ node {{ {selection} }} }} }} }}"
        );

        let mut nodes = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let data = self.execute(&query, json!({ "after": after.as_deref() }))?;
            let page = data
                .get(field)
                .cloned()
                .with_context(|| format!("API response missing field: {}", field))?;
            let page: Connection<T> = serde_json::from_value(page)
                .with_context(|| format!("Failed to decode {} page", field))?;

            let page_info = page.page_info;
            nodes.extend(page.edges.into_iter().map(|e| e.node));

            if !page_info.has_next_page {
                break;
            }
            after = page_info.end_cursor;
            if after.is_none() {
                bail!("API reported another {} page but returned no cursor", field);
            }
        }

        Ok(nodes)
    }

    /// Fetch the requested lightweight entity types in one pass
    pub fn fetch_all(&self, config: &FetchConfig) -> Result<Snapshot> {
        let mut snapshot = Snapshot::default();

        for entity_type in &config.types_to_fetch {
            let selection = selection(*entity_type, config.field_set);
            match entity_type {
                EntityType::RemoteNetwork => {
                    let nodes: Vec<RemoteNetworkNode> =
                        self.fetch_connection(entity_type.graphql_field(), selection)?;
                    snapshot.remote_networks = nodes.into_iter().map(RemoteNetwork::from).collect();
                }
                EntityType::Connector => {
                    let nodes: Vec<ConnectorNode> =
                        self.fetch_connection(entity_type.graphql_field(), selection)?;
                    snapshot.connectors = nodes.into_iter().map(Connector::from).collect();
                }
                EntityType::Group => {
                    let nodes: Vec<GroupNode> =
                        self.fetch_connection(entity_type.graphql_field(), selection)?;
                    snapshot.groups = nodes.into_iter().map(Group::from).collect();
                }
                EntityType::Resource => {
                    bail!("Resources must be fetched through fetch_all_resources");
                }
            }
        }

        Ok(snapshot)
    }

    /// Fetch all resources with the full field set
    pub fn fetch_all_resources(&self) -> Result<Vec<Resource>> {
        let nodes: Vec<ResourceNode> = self.fetch_connection(
            EntityType::Resource.graphql_field(),
            selection(EntityType::Resource, FieldSet::All),
        )?;
        nodes.into_iter().map(Resource::try_from).collect()
    }

    /// Fetch id/name pairs for one entity type
    pub fn fetch_labels(&self, entity_type: EntityType) -> Result<Vec<EntityLabel>> {
        self.fetch_connection(
            entity_type.graphql_field(),
            selection(entity_type, FieldSet::Label),
        )
    }

    fn delete(&self, mutation: &str, id: &str) -> Result<DeleteResult> {
        let query = format!("mutation($id: ID!) {{ {mutation}(id: $id) {{ ok error }} }}");
        let data = self.execute(&query, json!({ "id": id }))?;
        let payload = data
            .get(mutation)
            .cloned()
            .with_context(|| format!("API response missing field: {}", mutation))?;
        serde_json::from_value(payload)
            .with_context(|| format!("Failed to decode {} result", mutation))
    }

    /// Remove a group by id
    pub fn remove_group(&self, id: &str) -> Result<DeleteResult> {
        self.delete("groupDelete", id)
    }

    /// Remove a resource by id
    pub fn remove_resource(&self, id: &str) -> Result<DeleteResult> {
        self.delete("resourceDelete", id)
    }

    /// Remove a service account by id
    pub fn remove_service_account(&self, id: &str) -> Result<DeleteResult> {
        self.delete("serviceAccountDelete", id)
    }
}

/// GraphQL field selection for one entity type at one level of detail
fn selection(entity_type: EntityType, field_set: FieldSet) -> &'static str {
    match (entity_type, field_set) {
        (_, FieldSet::Id) => "id",
        (_, FieldSet::Label) => "id name",
        (EntityType::Connector, FieldSet::Nodes | FieldSet::All) => {
            "id name remoteNetwork { id }"
        }
        (EntityType::Resource, FieldSet::Nodes) => {
            "id name remoteNetwork { id } \
             groups { pageInfo { hasNextPage endCursor } edges { node { id } } }"
        }
        (EntityType::Resource, FieldSet::All) => {
            "id name address { value } remoteNetwork { id } \
             groups { pageInfo { hasNextPage endCursor } edges { node { id } } } \
             protocols { allowIcmp tcp { policy ports { start end } } \
             udp { policy ports { start end } } }"
        }
        (EntityType::RemoteNetwork | EntityType::Group, FieldSet::Nodes | FieldSet::All) => {
            "id name"
        }
    }
}
