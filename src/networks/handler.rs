// Network handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::adapter::DEFAULT_DRIVER;
use super::model::{
    ConnectOptions, ContainerEndpoint, CreateNetworkOptions, DisconnectOptions, Ipam, IpamPool,
    Network,
};
use super::service::NetworkService;
use crate::error::{ApiError, ApiResult};
use crate::extract::{Validate, ValidJson, required};

type Service = State<Arc<dyn NetworkService>>;

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

#[derive(Debug, Deserialize)]
pub struct IpamPoolRequest {
    #[serde(default)]
    pub subnet: String,
    #[serde(default)]
    pub gateway: String,
}

#[derive(Debug, Deserialize)]
pub struct IpamRequest {
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub config: Vec<IpamPoolRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNetworkRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub attachable: bool,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub options: HashMap<String, String>,
    pub ipam: Option<IpamRequest>,
}

impl Validate for CreateNetworkRequest {
    fn validate(&self) -> Result<(), ApiError> {
        required("name", &self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub ipv4_address: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Validate for ConnectRequest {
    fn validate(&self) -> Result<(), ApiError> {
        required("container_id", &self.container_id)?;
        if !self.ipv4_address.is_empty()
            && self.ipv4_address.parse::<std::net::Ipv4Addr>().is_err()
        {
            return Err(ApiError::BadRequest(format!(
                "ipv4_address is not a valid IPv4 address: {:?}",
                self.ipv4_address
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct DisconnectRequest {
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub force: bool,
}

impl Validate for DisconnectRequest {
    fn validate(&self) -> Result<(), ApiError> {
        required("container_id", &self.container_id)
    }
}

#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub internal: bool,
    pub attachable: bool,
    pub labels: HashMap<String, String>,
    pub created: String,
}

#[derive(Debug, Serialize)]
pub struct IpamPoolResponse {
    pub subnet: String,
    pub gateway: String,
}

#[derive(Debug, Serialize)]
pub struct IpamResponse {
    pub driver: String,
    pub config: Vec<IpamPoolResponse>,
}

#[derive(Debug, Serialize)]
pub struct ContainerEndpointResponse {
    pub name: String,
    pub endpoint_id: String,
    pub mac_address: String,
    pub ipv4_address: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkDetailResponse {
    #[serde(flatten)]
    pub summary: NetworkResponse,
    pub ipam: IpamResponse,
    pub containers: HashMap<String, ContainerEndpointResponse>,
    pub options: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl From<Network> for NetworkResponse {
    fn from(n: Network) -> Self {
        Self {
            id: n.id,
            name: n.name,
            driver: n.driver,
            scope: n.scope,
            internal: n.internal,
            attachable: n.attachable,
            labels: n.labels,
            created: n.created,
        }
    }
}

impl From<ContainerEndpoint> for ContainerEndpointResponse {
    fn from(c: ContainerEndpoint) -> Self {
        Self {
            name: c.name,
            endpoint_id: c.endpoint_id,
            mac_address: c.mac_address,
            ipv4_address: c.ipv4_address,
        }
    }
}

impl From<Network> for NetworkDetailResponse {
    fn from(mut n: Network) -> Self {
        let ipam = std::mem::take(&mut n.ipam);
        let containers = std::mem::take(&mut n.containers);
        let options = std::mem::take(&mut n.options);
        Self {
            summary: n.into(),
            ipam: IpamResponse {
                driver: ipam.driver,
                config: ipam
                    .config
                    .into_iter()
                    .map(|p| IpamPoolResponse {
                        subnet: p.subnet,
                        gateway: p.gateway,
                    })
                    .collect(),
            },
            containers: containers
                .into_iter()
                .map(|(id, c)| (id, c.into()))
                .collect(),
            options,
        }
    }
}

/// GET /networks
pub(super) async fn list_networks(
    State(service): Service,
) -> ApiResult<Json<Vec<NetworkResponse>>> {
    let networks = service.list().await.map_err(ApiError::internal)?;
    Ok(Json(networks.into_iter().map(Into::into).collect()))
}

/// GET /networks/{id}
pub(super) async fn get_network(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<Json<NetworkDetailResponse>> {
    let network = service.inspect(&id).await.map_err(ApiError::not_found)?;
    Ok(Json(network.into()))
}

/// POST /networks
pub(super) async fn create_network(
    State(service): Service,
    ValidJson(req): ValidJson<CreateNetworkRequest>,
) -> ApiResult<(StatusCode, Json<NetworkDetailResponse>)> {
    let opts = CreateNetworkOptions {
        name: req.name,
        driver: req.driver,
        internal: req.internal,
        attachable: req.attachable,
        labels: req.labels,
        options: req.options,
        ipam: req.ipam.map(|ipam| Ipam {
            driver: ipam.driver,
            config: ipam
                .config
                .into_iter()
                .map(|p| IpamPool {
                    subnet: p.subnet,
                    gateway: p.gateway,
                })
                .collect(),
        }),
    };
    let network = service.create(opts).await.map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(network.into())))
}

/// DELETE /networks/{id}
pub(super) async fn delete_network(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete(&id).await.map_err(ApiError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /networks/{id}/connect
pub(super) async fn connect_container(
    State(service): Service,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<ConnectRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let opts = ConnectOptions {
        container_id: req.container_id,
        ipv4_address: req.ipv4_address,
        aliases: req.aliases,
    };
    service
        .connect(&id, opts)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(MessageResponse {
        message: "container connected to network",
    }))
}

/// POST /networks/{id}/disconnect
pub(super) async fn disconnect_container(
    State(service): Service,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<DisconnectRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let opts = DisconnectOptions {
        container_id: req.container_id,
        force: req.force,
    };
    service
        .disconnect(&id, opts)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(MessageResponse {
        message: "container disconnected from network",
    }))
}
