// Container handlers: request binding, one service call, response shaping

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::logs::parse_timestamp;
use super::model::{
    Container, ContainerSpec, ContainerStats, ExecOptions, LogsOptions, Mount, NetworkEndpoint,
    Port,
};
use super::service::ContainerService;
use crate::error::{ApiError, ApiResult};
use crate::extract::{Validate, ValidJson, ValidQuery, required};

type Service = State<Arc<dyn ContainerService>>;

const RESTART_POLICIES: [&str; 4] = ["no", "always", "on-failure", "unless-stopped"];

#[derive(Debug, Deserialize)]
pub struct PortRequest {
    #[serde(default)]
    pub host_port: String,
    #[serde(default)]
    pub container_port: String,
    #[serde(default)]
    pub protocol: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateContainerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ports: Vec<PortRequest>,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub volumes: Vec<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub restart_policy: String,
}

impl Validate for CreateContainerRequest {
    fn validate(&self) -> Result<(), ApiError> {
        required("name", &self.name)?;
        required("image", &self.image)?;
        if !self.restart_policy.is_empty() && !RESTART_POLICIES.contains(&self.restart_policy.as_str())
        {
            return Err(ApiError::BadRequest(format!(
                "restart_policy must be one of {}",
                RESTART_POLICIES.join(", ")
            )));
        }
        Ok(())
    }
}

fn parse_port(field: &str, value: &str) -> Result<u16, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{} must be a port number, got {:?}", field, value)))
}

impl TryFrom<CreateContainerRequest> for ContainerSpec {
    type Error = ApiError;

    fn try_from(req: CreateContainerRequest) -> Result<Self, Self::Error> {
        let mut ports = Vec::with_capacity(req.ports.len());
        for p in req.ports {
            required("container_port", &p.container_port)?;
            let public_port = if p.host_port.trim().is_empty() {
                0
            } else {
                parse_port("host_port", &p.host_port)?
            };
            ports.push(Port {
                private_port: parse_port("container_port", &p.container_port)?,
                public_port,
                kind: if p.protocol.is_empty() {
                    "tcp".to_string()
                } else {
                    p.protocol.to_lowercase()
                },
                ip: String::new(),
            });
        }
        Ok(ContainerSpec {
            name: req.name,
            image: req.image,
            ports,
            env: req.env,
            binds: req.volumes,
            labels: req.labels,
            restart_policy: req.restart_policy,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StopRequest {
    pub timeout: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub since: Option<String>,
    pub until: Option<String>,
    pub tail: Option<String>,
    #[serde(default)]
    pub follow: bool,
}

impl Validate for LogsQuery {
    fn validate(&self) -> Result<(), ApiError> {
        match self.tail.as_deref() {
            None | Some("") | Some("all") => Ok(()),
            Some(n) if n.parse::<u64>().is_ok() => Ok(()),
            Some(other) => Err(ApiError::BadRequest(format!(
                "tail must be a line count or \"all\", got {:?}",
                other
            ))),
        }
    }
}

impl LogsQuery {
    fn into_options(self) -> Result<LogsOptions, ApiError> {
        let now = chrono::Utc::now();
        let parse = |field: &str, value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(|v| parse_timestamp(&v, now))
                .transpose()
                .map_err(|e| ApiError::BadRequest(format!("{}: {}", field, e)))
        };
        Ok(LogsOptions {
            since: parse("since", self.since)?,
            until: parse("until", self.until)?,
            tail: self
                .tail
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "all".to_string()),
            follow: self.follow,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ExecRequest {
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub attach_stdout: bool,
    #[serde(default)]
    pub attach_stderr: bool,
}

impl Validate for ExecRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.command.is_empty() {
            return Err(ApiError::BadRequest("command is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PortResponse {
    pub private_port: u16,
    pub public_port: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub ip: String,
}

#[derive(Debug, Serialize)]
pub struct MountResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub destination: String,
    pub mode: String,
    pub rw: bool,
}

#[derive(Debug, Serialize)]
pub struct ContainerResponse {
    pub id: String,
    pub name: String,
    pub image: String,
    pub image_id: String,
    pub status: String,
    pub state: String,
    pub created: i64,
    pub ports: Vec<PortResponse>,
    pub labels: HashMap<String, String>,
    pub mounts: Vec<MountResponse>,
    pub network_mode: String,
    pub restart_policy: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkEndpointResponse {
    pub network_id: String,
    pub ip_address: String,
    pub gateway: String,
    pub mac_address: String,
}

#[derive(Debug, Serialize)]
pub struct ContainerDetailResponse {
    #[serde(flatten)]
    pub summary: ContainerResponse,
    pub hostname: String,
    pub env: Vec<String>,
    pub cmd: Vec<String>,
    pub entrypoint: Vec<String>,
    pub working_dir: String,
    pub user: String,
    pub networks: HashMap<String, NetworkEndpointResponse>,
    pub started_at: String,
    pub finished_at: String,
    pub exit_code: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateContainerResponse {
    pub id: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub cpu_percent: f64,
    pub memory_usage: u64,
    pub memory_limit: u64,
    pub memory_percent: f64,
    pub network_in: u64,
    pub network_out: u64,
    pub block_read: u64,
    pub block_write: u64,
    pub pids: u64,
}

#[derive(Debug, Serialize)]
pub struct ExecResponse {
    pub output: String,
    pub exit_code: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl From<Port> for PortResponse {
    fn from(p: Port) -> Self {
        Self {
            private_port: p.private_port,
            public_port: p.public_port,
            kind: p.kind,
            ip: p.ip,
        }
    }
}

impl From<Mount> for MountResponse {
    fn from(m: Mount) -> Self {
        Self {
            kind: m.kind,
            source: m.source,
            destination: m.destination,
            mode: m.mode,
            rw: m.rw,
        }
    }
}

impl From<NetworkEndpoint> for NetworkEndpointResponse {
    fn from(n: NetworkEndpoint) -> Self {
        Self {
            network_id: n.network_id,
            ip_address: n.ip_address,
            gateway: n.gateway,
            mac_address: n.mac_address,
        }
    }
}

fn summary_response(c: &mut Container) -> ContainerResponse {
    ContainerResponse {
        id: std::mem::take(&mut c.id),
        name: std::mem::take(&mut c.name),
        image: std::mem::take(&mut c.image),
        image_id: std::mem::take(&mut c.image_id),
        status: std::mem::take(&mut c.status),
        state: std::mem::take(&mut c.state),
        created: c.created,
        ports: c.ports.drain(..).map(PortResponse::from).collect(),
        labels: std::mem::take(&mut c.labels),
        mounts: c.mounts.drain(..).map(MountResponse::from).collect(),
        network_mode: std::mem::take(&mut c.network_mode),
        restart_policy: std::mem::take(&mut c.restart_policy),
    }
}

impl From<Container> for ContainerResponse {
    fn from(mut c: Container) -> Self {
        summary_response(&mut c)
    }
}

impl From<Container> for ContainerDetailResponse {
    fn from(mut c: Container) -> Self {
        let summary = summary_response(&mut c);
        Self {
            summary,
            hostname: c.hostname,
            env: c.env,
            cmd: c.cmd,
            entrypoint: c.entrypoint,
            working_dir: c.working_dir,
            user: c.user,
            networks: c
                .networks
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
            started_at: c.started_at,
            finished_at: c.finished_at,
            exit_code: c.exit_code,
        }
    }
}

impl From<ContainerStats> for StatsResponse {
    fn from(s: ContainerStats) -> Self {
        Self {
            cpu_percent: s.cpu_percent,
            memory_usage: s.memory_usage,
            memory_limit: s.memory_limit,
            memory_percent: s.memory_percent,
            network_in: s.network_in,
            network_out: s.network_out,
            block_read: s.block_read,
            block_write: s.block_write,
            pids: s.pids,
        }
    }
}

/// GET /containers
pub(super) async fn list_containers(
    State(service): Service,
) -> ApiResult<Json<Vec<ContainerResponse>>> {
    let containers = service.list().await.map_err(ApiError::internal)?;
    Ok(Json(containers.into_iter().map(Into::into).collect()))
}

/// GET /containers/{id}
pub(super) async fn get_container(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<Json<ContainerDetailResponse>> {
    let container = service.inspect(&id).await.map_err(ApiError::not_found)?;
    Ok(Json(container.into()))
}

/// POST /containers
pub(super) async fn create_container(
    State(service): Service,
    ValidJson(req): ValidJson<CreateContainerRequest>,
) -> ApiResult<(StatusCode, Json<CreateContainerResponse>)> {
    let spec = ContainerSpec::try_from(req)?;
    let created = service.create(spec).await.map_err(ApiError::internal)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateContainerResponse {
            id: created.id,
            warnings: created.warnings,
        }),
    ))
}

/// DELETE /containers/{id}
pub(super) async fn delete_container(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete(&id).await.map_err(ApiError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /containers/{id}/start
pub(super) async fn start_container(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    service.start(&id).await.map_err(ApiError::internal)?;
    Ok(Json(MessageResponse {
        message: "container started",
    }))
}

/// POST /containers/{id}/stop. The body is optional; without one the
/// daemon's default grace period applies.
pub(super) async fn stop_container(
    State(service): Service,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        StopRequest::default()
    } else {
        serde_json::from_slice::<StopRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid stop request: {}", e)))?
    };
    service
        .stop(&id, req.timeout)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(MessageResponse {
        message: "container stopped",
    }))
}

/// POST /containers/{id}/restart
pub(super) async fn restart_container(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    service.restart(&id).await.map_err(ApiError::internal)?;
    Ok(Json(MessageResponse {
        message: "container restarted",
    }))
}

/// GET /containers/{id}/logs
pub(super) async fn container_logs(
    State(service): Service,
    Path(id): Path<String>,
    ValidQuery(query): ValidQuery<LogsQuery>,
) -> ApiResult<Json<LogsResponse>> {
    let opts = query.into_options()?;
    let logs = service.logs(&id, opts).await.map_err(ApiError::internal)?;
    Ok(Json(LogsResponse { logs }))
}

/// GET /containers/{id}/stats
pub(super) async fn container_stats(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<Json<StatsResponse>> {
    let stats = service.stats(&id).await.map_err(ApiError::internal)?;
    Ok(Json(stats.into()))
}

/// POST /containers/{id}/exec
pub(super) async fn exec_container(
    State(service): Service,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<ExecRequest>,
) -> ApiResult<Json<ExecResponse>> {
    let opts = ExecOptions {
        command: req.command,
        attach_stdout: req.attach_stdout,
        attach_stderr: req.attach_stderr,
    };
    let result = service.exec(&id, opts).await.map_err(ApiError::internal)?;
    Ok(Json(ExecResponse {
        output: result.output,
        exit_code: result.exit_code,
    }))
}
