// Network domain models

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub internal: bool,
    pub attachable: bool,
    pub labels: HashMap<String, String>,
    pub options: HashMap<String, String>,
    /// As reported by the daemon (RFC 3339).
    pub created: String,
    pub ipam: Ipam,
    /// Keyed by container id.
    pub containers: HashMap<String, ContainerEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ipam {
    pub driver: String,
    pub config: Vec<IpamPool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpamPool {
    pub subnet: String,
    pub gateway: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerEndpoint {
    pub name: String,
    pub endpoint_id: String,
    pub mac_address: String,
    pub ipv4_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateNetworkOptions {
    pub name: String,
    /// Empty means "bridge".
    pub driver: String,
    pub internal: bool,
    pub attachable: bool,
    pub labels: HashMap<String, String>,
    pub options: HashMap<String, String>,
    pub ipam: Option<Ipam>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    pub container_id: String,
    /// Static address; empty lets the daemon pick.
    pub ipv4_address: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisconnectOptions {
    pub container_id: String,
    pub force: bool,
}
