// Daemon client construction, shared by every adapter

use std::time::Duration;

use bollard::Docker;

use crate::config::DockerConfig;

/// Builds the single `Docker` handle for the process. Clones are cheap and
/// share the underlying connection pool.
pub fn connect(config: &DockerConfig) -> anyhow::Result<Docker> {
    let docker = if config.socket.is_empty() {
        Docker::connect_with_local_defaults()?
            .with_timeout(Duration::from_secs(config.timeout_secs))
    } else {
        Docker::connect_with_unix(
            &config.socket,
            config.timeout_secs,
            bollard::API_DEFAULT_VERSION,
        )?
    };
    Ok(docker)
}
