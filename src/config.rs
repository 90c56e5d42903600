use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable that overrides `server.port`.
pub const PORT_ENV: &str = "DOCKGATE_PORT";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub docker: DockerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

fn default_port() -> u16 {
    9876
}

fn default_host() -> String {
    "0.0.0.0".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockerConfig {
    /// Unix socket path. Empty means bollard's local defaults (honours DOCKER_HOST).
    #[serde(default)]
    pub socket: String,
    /// Client request timeout in seconds; only used with an explicit socket.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (default `config.toml`) when it exists, otherwise
    /// starts from defaults. `DOCKGATE_PORT` wins over the file.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(Path::new(&path), std::env::var(PORT_ENV).ok().as_deref())
    }

    /// Loads `path` (defaults when missing), then applies `port_override`.
    pub fn load_from_path(path: &Path, port_override: Option<&str>) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}, using defaults", path.display());
                AppConfig::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        config.apply_port_override(port_override)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies the value of the port environment variable, if set and non-empty.
    pub fn apply_port_override(&mut self, value: Option<&str>) -> anyhow::Result<()> {
        if let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.server.port = raw
                .parse()
                .map_err(|e| anyhow::anyhow!("{} must be a port number, got {:?}: {}", PORT_ENV, raw, e))?;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.docker.timeout_secs > 0,
            "docker.timeout_secs must be > 0, got {}",
            self.docker.timeout_secs
        );
        Ok(())
    }
}
