// Network adapter

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{
    EndpointIpamConfig, EndpointSettings, Ipam as DaemonIpam, IpamConfig, NetworkConnectRequest,
    NetworkCreateRequest, NetworkDisconnectRequest,
};
use bollard::query_parameters::{InspectNetworkOptions, ListNetworksOptions};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::model::{
    ConnectOptions, ContainerEndpoint, CreateNetworkOptions, DisconnectOptions, Ipam, IpamPool,
    Network,
};

pub const DEFAULT_DRIVER: &str = "bridge";

#[async_trait]
pub trait NetworkAdapter: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Network>>;
    async fn inspect(&self, id: &str) -> anyhow::Result<Network>;
    async fn create(&self, opts: CreateNetworkOptions) -> anyhow::Result<Network>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
    async fn connect(&self, network_id: &str, opts: ConnectOptions) -> anyhow::Result<()>;
    async fn disconnect(&self, network_id: &str, opts: DisconnectOptions) -> anyhow::Result<()>;
}

pub struct DockerNetworkAdapter {
    docker: Docker,
}

impl DockerNetworkAdapter {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl NetworkAdapter for DockerNetworkAdapter {
    #[instrument(skip(self), fields(adapter = "networks", operation = "list"))]
    async fn list(&self) -> anyhow::Result<Vec<Network>> {
        let networks = self
            .docker
            .list_networks(None::<ListNetworksOptions>)
            .await
            .context("failed to list networks")?;
        networks
            .iter()
            .map(|n| decode(n).context("failed to list networks"))
            .collect()
    }

    #[instrument(skip(self), fields(adapter = "networks", operation = "inspect"))]
    async fn inspect(&self, id: &str) -> anyhow::Result<Network> {
        let network = self
            .docker
            .inspect_network(id, None::<InspectNetworkOptions>)
            .await
            .with_context(|| format!("failed to inspect network {}", id))?;
        decode(&network).with_context(|| format!("failed to inspect network {}", id))
    }

    #[instrument(skip(self, opts), fields(adapter = "networks", operation = "create", name = %opts.name))]
    async fn create(&self, opts: CreateNetworkOptions) -> anyhow::Result<Network> {
        let request = create_request(&opts);
        let response = self
            .docker
            .create_network(request)
            .await
            .with_context(|| format!("failed to create network {}", opts.name))?;
        tracing::info!("Created network {} ({})", opts.name, response.id);
        self.inspect(&response.id).await
    }

    #[instrument(skip(self), fields(adapter = "networks", operation = "delete"))]
    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.docker
            .remove_network(id)
            .await
            .with_context(|| format!("failed to delete network {}", id))
    }

    #[instrument(skip(self), fields(adapter = "networks", operation = "connect"))]
    async fn connect(&self, network_id: &str, opts: ConnectOptions) -> anyhow::Result<()> {
        let request = connect_request(&opts);
        self.docker
            .connect_network(network_id, request)
            .await
            .with_context(|| {
                format!(
                    "failed to connect container {} to network {}",
                    opts.container_id, network_id
                )
            })
    }

    #[instrument(skip(self), fields(adapter = "networks", operation = "disconnect"))]
    async fn disconnect(&self, network_id: &str, opts: DisconnectOptions) -> anyhow::Result<()> {
        let request = NetworkDisconnectRequest {
            container: opts.container_id.clone(),
            force: Some(opts.force),
        };
        self.docker
            .disconnect_network(network_id, request)
            .await
            .with_context(|| {
                format!(
                    "failed to disconnect container {} from network {}",
                    opts.container_id, network_id
                )
            })
    }
}

pub(crate) fn create_request(opts: &CreateNetworkOptions) -> NetworkCreateRequest {
    let driver = if opts.driver.is_empty() {
        DEFAULT_DRIVER
    } else {
        opts.driver.as_str()
    };
    let ipam = opts.ipam.as_ref().map(|ipam| DaemonIpam {
        driver: (!ipam.driver.is_empty()).then(|| ipam.driver.clone()),
        config: Some(
            ipam.config
                .iter()
                .map(|p| IpamConfig {
                    subnet: (!p.subnet.is_empty()).then(|| p.subnet.clone()),
                    gateway: (!p.gateway.is_empty()).then(|| p.gateway.clone()),
                    ..Default::default()
                })
                .collect(),
        ),
        ..Default::default()
    });
    NetworkCreateRequest {
        name: opts.name.clone(),
        driver: Some(driver.to_string()),
        internal: Some(opts.internal),
        attachable: Some(opts.attachable),
        labels: Some(opts.labels.clone()),
        options: Some(opts.options.clone()),
        ipam,
        ..Default::default()
    }
}

/// A static address goes in the endpoint's IPAM config; that is the field the
/// daemon reserves for a requested address.
pub(crate) fn connect_request(opts: &ConnectOptions) -> NetworkConnectRequest {
    let ipam_config = (!opts.ipv4_address.is_empty()).then(|| EndpointIpamConfig {
        ipv4_address: Some(opts.ipv4_address.clone()),
        ..Default::default()
    });
    NetworkConnectRequest {
        container: opts.container_id.clone(),
        endpoint_config: Some(EndpointSettings {
            aliases: (!opts.aliases.is_empty()).then(|| opts.aliases.clone()),
            ipam_config,
            ..Default::default()
        }),
    }
}

// Daemon network JSON, reduced to the fields we expose. Listing and inspection
// return different generated types, both serializing to this shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NetworkPayload {
    #[serde(rename = "Id")]
    id: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Driver")]
    driver: Option<String>,
    #[serde(rename = "Scope")]
    scope: Option<String>,
    #[serde(rename = "Internal")]
    internal: Option<bool>,
    #[serde(rename = "Attachable")]
    attachable: Option<bool>,
    #[serde(rename = "Labels")]
    labels: Option<HashMap<String, String>>,
    #[serde(rename = "Options")]
    options: Option<HashMap<String, String>>,
    #[serde(rename = "Created")]
    created: Option<String>,
    #[serde(rename = "IPAM")]
    ipam: Option<IpamPayload>,
    #[serde(rename = "Containers")]
    containers: Option<HashMap<String, EndpointPayload>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IpamPayload {
    #[serde(rename = "Driver")]
    driver: Option<String>,
    #[serde(rename = "Config")]
    config: Option<Vec<PoolPayload>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PoolPayload {
    #[serde(rename = "Subnet")]
    subnet: Option<String>,
    #[serde(rename = "Gateway")]
    gateway: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EndpointPayload {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "EndpointID")]
    endpoint_id: Option<String>,
    #[serde(rename = "MacAddress")]
    mac_address: Option<String>,
    #[serde(rename = "IPv4Address")]
    ipv4_address: Option<String>,
}

fn decode<T: Serialize>(raw: &T) -> anyhow::Result<Network> {
    let value = serde_json::to_value(raw).context("failed to encode network payload")?;
    network_from_value(value)
}

pub(crate) fn network_from_value(value: serde_json::Value) -> anyhow::Result<Network> {
    let p: NetworkPayload =
        serde_json::from_value(value).context("failed to decode network payload")?;
    let ipam = p.ipam.unwrap_or_default();
    Ok(Network {
        id: p.id.unwrap_or_default(),
        name: p.name.unwrap_or_default(),
        driver: p.driver.unwrap_or_default(),
        scope: p.scope.unwrap_or_default(),
        internal: p.internal.unwrap_or(false),
        attachable: p.attachable.unwrap_or(false),
        labels: p.labels.unwrap_or_default(),
        options: p.options.unwrap_or_default(),
        created: p.created.unwrap_or_default(),
        ipam: Ipam {
            driver: ipam.driver.unwrap_or_default(),
            config: ipam
                .config
                .unwrap_or_default()
                .into_iter()
                .map(|c| IpamPool {
                    subnet: c.subnet.unwrap_or_default(),
                    gateway: c.gateway.unwrap_or_default(),
                })
                .collect(),
        },
        containers: p
            .containers
            .unwrap_or_default()
            .into_iter()
            .map(|(id, c)| {
                (
                    id,
                    ContainerEndpoint {
                        name: c.name.unwrap_or_default(),
                        endpoint_id: c.endpoint_id.unwrap_or_default(),
                        mac_address: c.mac_address.unwrap_or_default(),
                        ipv4_address: c.ipv4_address.unwrap_or_default(),
                    },
                )
            })
            .collect(),
    })
}
