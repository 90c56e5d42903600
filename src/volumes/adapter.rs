// Volume adapter

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{Volume as DaemonVolume, VolumeCreateRequest};
use bollard::query_parameters::{ListVolumesOptions, RemoveVolumeOptions};
use tracing::instrument;

use super::model::{CreateVolumeOptions, Volume};

#[async_trait]
pub trait VolumeAdapter: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Volume>>;
    async fn inspect(&self, name: &str) -> anyhow::Result<Volume>;
    async fn create(&self, opts: CreateVolumeOptions) -> anyhow::Result<Volume>;
    async fn delete(&self, name: &str) -> anyhow::Result<()>;
}

pub struct DockerVolumeAdapter {
    docker: Docker,
}

impl DockerVolumeAdapter {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl VolumeAdapter for DockerVolumeAdapter {
    #[instrument(skip(self), fields(adapter = "volumes", operation = "list"))]
    async fn list(&self) -> anyhow::Result<Vec<Volume>> {
        let response = self
            .docker
            .list_volumes(None::<ListVolumesOptions>)
            .await
            .context("failed to list volumes")?;
        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(volume_from_daemon)
            .collect())
    }

    #[instrument(skip(self), fields(adapter = "volumes", operation = "inspect"))]
    async fn inspect(&self, name: &str) -> anyhow::Result<Volume> {
        let volume = self
            .docker
            .inspect_volume(name)
            .await
            .with_context(|| format!("failed to inspect volume {}", name))?;
        Ok(volume_from_daemon(volume))
    }

    #[instrument(skip(self, opts), fields(adapter = "volumes", operation = "create", name = %opts.name))]
    async fn create(&self, opts: CreateVolumeOptions) -> anyhow::Result<Volume> {
        let request = VolumeCreateRequest {
            name: Some(opts.name.clone()),
            driver: (!opts.driver.is_empty()).then(|| opts.driver.clone()),
            driver_opts: Some(opts.driver_opts),
            labels: Some(opts.labels),
            ..Default::default()
        };
        let volume = self
            .docker
            .create_volume(request)
            .await
            .with_context(|| format!("failed to create volume {}", opts.name))?;
        tracing::info!("Created volume {} at {}", volume.name, volume.mountpoint);
        Ok(volume_from_daemon(volume))
    }

    /// Never forced: a volume still in use is a daemon conflict error.
    #[instrument(skip(self), fields(adapter = "volumes", operation = "delete"))]
    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        self.docker
            .remove_volume(name, None::<RemoveVolumeOptions>)
            .await
            .with_context(|| format!("failed to delete volume {}", name))
    }
}

pub(crate) fn volume_from_daemon(v: DaemonVolume) -> Volume {
    // bollard types the free-form status map with unit-keyed inner maps, so
    // only the top-level keys survive; anything it cannot serialize is dropped.
    let status = match v.status.as_ref().map(serde_json::to_value) {
        Some(Ok(serde_json::Value::Object(map))) => map.into_iter().collect(),
        _ => HashMap::new(),
    };
    Volume {
        name: v.name,
        driver: v.driver,
        mountpoint: v.mountpoint,
        labels: v.labels,
        options: v.options,
        scope: v.scope.map(|s| s.to_string()).unwrap_or_default(),
        created_at: v.created_at.map(|d| d.to_string()).unwrap_or_default(),
        status,
    }
}
