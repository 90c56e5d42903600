// Container adapter: bollard calls reshaped into the container domain model

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use bollard::Docker;
use bollard::container::LogOutput;
use bollard::exec::{StartExecOptions, StartExecResults};
use bollard::models::{
    ContainerCreateBody, ContainerInspectResponse, ContainerSummary, ExecConfig, HostConfig,
    MountPoint, PortBinding, RestartPolicy, RestartPolicyNameEnum,
};
use bollard::query_parameters::{
    CreateContainerOptions, InspectContainerOptions, ListContainersOptions, LogsOptions as DaemonLogsOptions,
    RemoveContainerOptions, RestartContainerOptions, StartContainerOptions, StatsOptions,
    StopContainerOptions,
};
use bytes::Bytes;
use futures_util::StreamExt;
use tracing::instrument;

use super::logs::LineBuffer;
use super::model::{
    Container, ContainerSpec, ContainerStats, CreatedContainer, ExecOptions, ExecResult,
    LogsOptions, Mount, NetworkEndpoint, Port,
};
use super::stats;

#[async_trait]
pub trait ContainerAdapter: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Container>>;
    async fn inspect(&self, id: &str) -> anyhow::Result<Container>;
    async fn create(&self, spec: ContainerSpec) -> anyhow::Result<CreatedContainer>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
    async fn start(&self, id: &str) -> anyhow::Result<()>;
    async fn stop(&self, id: &str, timeout: Option<i64>) -> anyhow::Result<()>;
    async fn restart(&self, id: &str) -> anyhow::Result<()>;
    async fn logs(&self, id: &str, opts: LogsOptions) -> anyhow::Result<Vec<String>>;
    async fn stats(&self, id: &str) -> anyhow::Result<ContainerStats>;
    async fn exec(&self, id: &str, opts: ExecOptions) -> anyhow::Result<ExecResult>;
}

pub struct DockerContainerAdapter {
    docker: Docker,
}

impl DockerContainerAdapter {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl ContainerAdapter for DockerContainerAdapter {
    #[instrument(skip(self), fields(adapter = "containers", operation = "list"))]
    async fn list(&self) -> anyhow::Result<Vec<Container>> {
        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .context("failed to list containers")?;
        Ok(containers.into_iter().map(container_from_summary).collect())
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "inspect"))]
    async fn inspect(&self, id: &str) -> anyhow::Result<Container> {
        let details = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .with_context(|| format!("failed to inspect container {}", id))?;
        Ok(container_from_inspect(details))
    }

    #[instrument(skip(self, spec), fields(adapter = "containers", operation = "create", name = %spec.name))]
    async fn create(&self, spec: ContainerSpec) -> anyhow::Result<CreatedContainer> {
        let body = create_body(&spec)?;
        let options = CreateContainerOptions {
            name: Some(spec.name.clone()),
            ..Default::default()
        };
        let response = self
            .docker
            .create_container(Some(options), body)
            .await
            .with_context(|| format!("failed to create container {}", spec.name))?;
        tracing::info!("Created container {} ({})", spec.name, response.id);
        Ok(CreatedContainer {
            id: response.id,
            warnings: response.warnings,
        })
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "delete"))]
    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        self.docker
            .remove_container(id, Some(options))
            .await
            .with_context(|| format!("failed to delete container {}", id))
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "start"))]
    async fn start(&self, id: &str) -> anyhow::Result<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions>)
            .await
            .with_context(|| format!("failed to start container {}", id))
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "stop"))]
    async fn stop(&self, id: &str, timeout: Option<i64>) -> anyhow::Result<()> {
        let options = stop_options(timeout);
        self.docker
            .stop_container(id, Some(options))
            .await
            .with_context(|| format!("failed to stop container {}", id))
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "restart"))]
    async fn restart(&self, id: &str) -> anyhow::Result<()> {
        self.docker
            .restart_container(id, None::<RestartContainerOptions>)
            .await
            .with_context(|| format!("failed to restart container {}", id))
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "logs"))]
    async fn logs(&self, id: &str, opts: LogsOptions) -> anyhow::Result<Vec<String>> {
        let options = DaemonLogsOptions {
            follow: opts.follow,
            stdout: true,
            stderr: true,
            since: opts.since.map_or(0, clamp_i32),
            until: opts.until.map_or(0, clamp_i32),
            tail: if opts.tail.is_empty() {
                "all".to_string()
            } else {
                opts.tail
            },
            ..Default::default()
        };
        let mut stream = self.docker.logs(id, Some(options));
        let mut lines = LineBuffer::default();
        while let Some(item) = stream.next().await {
            let output = item.with_context(|| format!("failed to get logs for container {}", id))?;
            lines.push(&output_bytes(output));
        }
        Ok(lines.finish())
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "stats"))]
    async fn stats(&self, id: &str) -> anyhow::Result<ContainerStats> {
        let options = StatsOptions {
            stream: false,
            one_shot: true,
        };
        let mut stream = self.docker.stats(id, Some(options));
        let sample = stream
            .next()
            .await
            .with_context(|| format!("failed to get stats for container {}: empty response", id))?
            .with_context(|| format!("failed to get stats for container {}", id))?;
        Ok(stats::process_statistics(&sample))
    }

    #[instrument(skip(self), fields(adapter = "containers", operation = "exec"))]
    async fn exec(&self, id: &str, opts: ExecOptions) -> anyhow::Result<ExecResult> {
        let config = ExecConfig {
            cmd: Some(opts.command),
            attach_stdout: Some(opts.attach_stdout),
            attach_stderr: Some(opts.attach_stderr),
            ..Default::default()
        };
        let exec = self
            .docker
            .create_exec(id, config)
            .await
            .with_context(|| format!("failed to create exec for container {}", id))?;

        let started = self
            .docker
            .start_exec(
                &exec.id,
                Some(StartExecOptions {
                    detach: false,
                    ..Default::default()
                }),
            )
            .await
            .with_context(|| format!("failed to attach exec {}", exec.id))?;

        let mut output = Vec::new();
        if let StartExecResults::Attached { output: mut stream, .. } = started {
            while let Some(item) = stream.next().await {
                let chunk = item.with_context(|| format!("failed to read exec {} output", exec.id))?;
                output.extend_from_slice(&output_bytes(chunk));
            }
        }

        let inspect = self
            .docker
            .inspect_exec(&exec.id)
            .await
            .with_context(|| format!("failed to inspect exec {}", exec.id))?;

        Ok(ExecResult {
            output: String::from_utf8_lossy(&output).into_owned(),
            exit_code: exec_exit_code(&exec.id, inspect.running, inspect.exit_code)?,
        })
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(0, i32::MAX as i64) as i32
}

/// Negative timeouts reach the daemon unchanged: `-1` waits for the
/// container to exit instead of killing it.
pub(crate) fn stop_options(timeout: Option<i64>) -> StopContainerOptions {
    StopContainerOptions {
        t: timeout.map(|t| t.clamp(i32::MIN as i64, i32::MAX as i64) as i32),
        signal: None,
    }
}

/// An exec with no exit code has not finished; report that rather than 0.
pub(crate) fn exec_exit_code(
    id: &str,
    running: Option<bool>,
    exit_code: Option<i64>,
) -> anyhow::Result<i64> {
    match exit_code {
        Some(code) if running != Some(true) => Ok(code),
        _ => anyhow::bail!("exec {} finished without an exit code", id),
    }
}

fn output_bytes(output: LogOutput) -> Bytes {
    match output {
        LogOutput::StdOut { message }
        | LogOutput::StdErr { message }
        | LogOutput::StdIn { message }
        | LogOutput::Console { message } => message,
    }
}

/// Daemon names carry a leading `/`; strip it once here.
fn strip_name(name: &str) -> String {
    name.strip_prefix('/').unwrap_or(name).to_string()
}

fn mount_from_point(m: MountPoint) -> Mount {
    Mount {
        kind: m.typ.map(|t| t.to_string()).unwrap_or_default(),
        source: m.source.unwrap_or_default(),
        destination: m.destination.unwrap_or_default(),
        mode: m.mode.unwrap_or_default(),
        rw: m.rw.unwrap_or(false),
    }
}

pub(crate) fn container_from_summary(c: ContainerSummary) -> Container {
    let name = c
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| strip_name(n))
        .unwrap_or_default();
    let ports = c
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|p| Port {
            private_port: p.private_port,
            public_port: p.public_port.unwrap_or(0),
            kind: p.typ.map(|t| t.to_string()).unwrap_or_default(),
            ip: p.ip.unwrap_or_default(),
        })
        .collect();
    Container {
        id: c.id.unwrap_or_default(),
        name,
        image: c.image.unwrap_or_default(),
        image_id: c.image_id.unwrap_or_default(),
        state: c.state.map(|s| s.to_string()).unwrap_or_default(),
        status: c.status.unwrap_or_default(),
        created: c.created.unwrap_or(0),
        ports,
        mounts: c
            .mounts
            .unwrap_or_default()
            .into_iter()
            .map(mount_from_point)
            .collect(),
        labels: c.labels.unwrap_or_default(),
        network_mode: c
            .host_config
            .and_then(|h| h.network_mode)
            .unwrap_or_default(),
        ..Default::default()
    }
}

pub(crate) fn container_from_inspect(c: ContainerInspectResponse) -> Container {
    let config = c.config.unwrap_or_default();
    let host_config = c.host_config.unwrap_or_default();
    let state = c.state.unwrap_or_default();
    let settings = c.network_settings.unwrap_or_default();

    let mut ports = Vec::new();
    for (key, bindings) in settings.ports.unwrap_or_default() {
        let (private_port, kind) = split_port_key(&key);
        for b in bindings.unwrap_or_default() {
            ports.push(Port {
                private_port,
                public_port: b
                    .host_port
                    .as_deref()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0),
                kind: kind.clone(),
                ip: b.host_ip.unwrap_or_default(),
            });
        }
    }
    ports.sort_by(|a, b| (a.private_port, &a.kind).cmp(&(b.private_port, &b.kind)));

    let networks = settings
        .networks
        .unwrap_or_default()
        .into_iter()
        .map(|(name, n)| {
            (
                name,
                NetworkEndpoint {
                    network_id: n.network_id.unwrap_or_default(),
                    ip_address: n.ip_address.unwrap_or_default(),
                    gateway: n.gateway.unwrap_or_default(),
                    mac_address: n.mac_address.unwrap_or_default(),
                },
            )
        })
        .collect();

    let status = state.status.map(|s| s.to_string()).unwrap_or_default();
    let created = c
        .created
        .map(|d| d.to_string())
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(&s).ok())
        .map_or(0, |d| d.timestamp());

    Container {
        id: c.id.unwrap_or_default(),
        name: strip_name(c.name.as_deref().unwrap_or_default()),
        image: config.image.unwrap_or_default(),
        image_id: c.image.unwrap_or_default(),
        state: status.clone(),
        status,
        created,
        ports,
        mounts: c
            .mounts
            .unwrap_or_default()
            .into_iter()
            .map(mount_from_point)
            .collect(),
        labels: config.labels.unwrap_or_default(),
        network_mode: host_config.network_mode.unwrap_or_default(),
        restart_policy: host_config
            .restart_policy
            .and_then(|r| r.name)
            .map(|n| n.to_string())
            .unwrap_or_default(),
        env: config.env.unwrap_or_default(),
        cmd: config.cmd.unwrap_or_default(),
        entrypoint: config.entrypoint.unwrap_or_default(),
        working_dir: config.working_dir.unwrap_or_default(),
        user: config.user.unwrap_or_default(),
        hostname: config.hostname.unwrap_or_default(),
        networks,
        started_at: state.started_at.unwrap_or_default(),
        finished_at: state.finished_at.unwrap_or_default(),
        exit_code: state.exit_code.unwrap_or(0),
    }
}

/// "80/tcp" -> (80, "tcp"). A key without a protocol is tcp.
fn split_port_key(key: &str) -> (u16, String) {
    let (port, proto) = key.split_once('/').unwrap_or((key, "tcp"));
    (port.parse().unwrap_or(0), proto.to_string())
}

fn restart_policy(name: &str) -> anyhow::Result<Option<RestartPolicy>> {
    let name = match name {
        "" => return Ok(None),
        "no" => RestartPolicyNameEnum::NO,
        "always" => RestartPolicyNameEnum::ALWAYS,
        "on-failure" => RestartPolicyNameEnum::ON_FAILURE,
        "unless-stopped" => RestartPolicyNameEnum::UNLESS_STOPPED,
        other => anyhow::bail!("unknown restart policy {:?}", other),
    };
    Ok(Some(RestartPolicy {
        name: Some(name),
        ..Default::default()
    }))
}

/// Translates a creation spec into the daemon's create body. Every requested
/// port is exposed; ports with a non-zero public port are also bound on the
/// host (default bind address 0.0.0.0).
pub(crate) fn create_body(spec: &ContainerSpec) -> anyhow::Result<ContainerCreateBody> {
    let mut exposed_ports: Vec<String> = Vec::new();
    let mut port_bindings: HashMap<String, Vec<PortBinding>> = HashMap::new();
    for p in &spec.ports {
        let proto = if p.kind.is_empty() { "tcp" } else { p.kind.as_str() };
        let key = format!("{}/{}", p.private_port, proto);
        if !exposed_ports.contains(&key) {
            exposed_ports.push(key.clone());
        }
        if p.public_port > 0 {
            let host_ip = if p.ip.is_empty() { "0.0.0.0" } else { p.ip.as_str() };
            port_bindings.entry(key).or_default().push(PortBinding {
                host_ip: Some(host_ip.to_string()),
                host_port: Some(p.public_port.to_string()),
            });
        }
    }

    let host_config = HostConfig {
        port_bindings: (!port_bindings.is_empty()).then(|| {
            port_bindings
                .into_iter()
                .map(|(k, v)| (k, Some(v)))
                .collect()
        }),
        binds: (!spec.binds.is_empty()).then(|| spec.binds.clone()),
        restart_policy: restart_policy(&spec.restart_policy)?,
        ..Default::default()
    };

    Ok(ContainerCreateBody {
        image: Some(spec.image.clone()),
        env: (!spec.env.is_empty()).then(|| spec.env.clone()),
        labels: (!spec.labels.is_empty()).then(|| spec.labels.clone()),
        exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
        host_config: Some(host_config),
        ..Default::default()
    })
}
