// Container domain models

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub id: String,
    /// Without the daemon's leading `/`.
    pub name: String,
    pub image: String,
    pub image_id: String,
    pub state: String,
    pub status: String,
    /// Unix seconds.
    pub created: i64,
    pub ports: Vec<Port>,
    pub mounts: Vec<Mount>,
    pub labels: HashMap<String, String>,
    pub network_mode: String,
    pub restart_policy: String,
    pub env: Vec<String>,
    pub cmd: Vec<String>,
    pub entrypoint: Vec<String>,
    pub working_dir: String,
    pub user: String,
    pub hostname: String,
    pub networks: HashMap<String, NetworkEndpoint>,
    pub started_at: String,
    pub finished_at: String,
    pub exit_code: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Port {
    pub private_port: u16,
    pub public_port: u16,
    /// "tcp", "udp" or "sctp".
    pub kind: String,
    pub ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mount {
    pub kind: String,
    pub source: String,
    pub destination: String,
    pub mode: String,
    pub rw: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkEndpoint {
    pub network_id: String,
    pub ip_address: String,
    pub gateway: String,
    pub mac_address: String,
}

/// Input for container creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub ports: Vec<Port>,
    pub env: Vec<String>,
    /// `source:destination[:mode]` strings, passed to the daemon as binds.
    pub binds: Vec<String>,
    pub labels: HashMap<String, String>,
    /// "no", "always", "on-failure", "unless-stopped" or empty.
    pub restart_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedContainer {
    pub id: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerStats {
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

/// Log filters. `since`/`until` are unix seconds; `tail` is a line count or "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogsOptions {
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub tail: String,
    pub follow: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub command: Vec<String>,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// stdout and stderr interleaved in arrival order.
    pub output: String,
    pub exit_code: i64,
}
