use anyhow::Result;
use dockgate::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let docker = docker_client::connect(&app_config.docker)?;
    match docker.ping().await {
        Ok(_) => tracing::info!("Connected to Docker daemon"),
        // requests fail with 500 until the daemon comes up
        Err(e) => tracing::warn!("Docker daemon not reachable yet: {}", e),
    }

    let state = routes::AppState {
        containers: Arc::new(containers::ContainerServiceImpl::new(Arc::new(
            containers::DockerContainerAdapter::new(docker.clone()),
        ))),
        images: Arc::new(images::ImageServiceImpl::new(Arc::new(
            images::DockerImageAdapter::new(docker.clone()),
        ))),
        networks: Arc::new(networks::NetworkServiceImpl::new(Arc::new(
            networks::DockerNetworkAdapter::new(docker.clone()),
        ))),
        volumes: Arc::new(volumes::VolumeServiceImpl::new(Arc::new(
            volumes::DockerVolumeAdapter::new(docker),
        ))),
    };

    let app = routes::app(state);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{} {} listening on http://{}", version::NAME, version::VERSION, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
