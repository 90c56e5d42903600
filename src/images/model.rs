// Image domain models

use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub id: String,
    pub tags: Vec<String>,
    pub size: i64,
    pub virtual_size: i64,
    /// Unix seconds.
    pub created: i64,
    pub labels: HashMap<String, String>,
    /// Containers using the image; -1 when the daemon did not count them.
    pub containers: i64,
    pub os: String,
    pub architecture: String,
    pub author: String,
    pub comment: String,
    pub cmd: Vec<String>,
    pub entrypoint: Vec<String>,
    pub env: Vec<String>,
    pub working_dir: String,
    pub exposed_ports: Vec<String>,
    /// Number of root filesystem layers.
    pub layers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryAuth {
    pub username: String,
    pub password: String,
    pub server_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullOptions {
    /// Reference such as `nginx`, `nginx:1.27` or `registry:5000/app@sha256:..`.
    pub image: String,
    pub auth: Option<RegistryAuth>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub tag: String,
    /// Path inside the context; empty means `Dockerfile`.
    pub dockerfile: String,
    /// Directory on the host, tarred and sent as the build context.
    pub context: PathBuf,
    pub build_args: HashMap<String, String>,
    pub labels: HashMap<String, String>,
    pub no_cache: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub image_id: String,
    pub tags: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    pub force: bool,
    pub prune_children: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveResult {
    pub deleted: Vec<String>,
    pub untagged: Vec<String>,
}
