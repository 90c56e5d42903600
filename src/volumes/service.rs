// Volume service: forwards to the adapter

use std::sync::Arc;

use async_trait::async_trait;

use super::adapter::VolumeAdapter;
use super::model::{CreateVolumeOptions, Volume};

#[async_trait]
pub trait VolumeService: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Volume>>;
    async fn inspect(&self, name: &str) -> anyhow::Result<Volume>;
    async fn create(&self, opts: CreateVolumeOptions) -> anyhow::Result<Volume>;
    async fn delete(&self, name: &str) -> anyhow::Result<()>;
}

pub struct VolumeServiceImpl {
    adapter: Arc<dyn VolumeAdapter>,
}

impl VolumeServiceImpl {
    pub fn new(adapter: Arc<dyn VolumeAdapter>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl VolumeService for VolumeServiceImpl {
    async fn list(&self) -> anyhow::Result<Vec<Volume>> {
        self.adapter.list().await
    }

    async fn inspect(&self, name: &str) -> anyhow::Result<Volume> {
        self.adapter.inspect(name).await
    }

    async fn create(&self, opts: CreateVolumeOptions) -> anyhow::Result<Volume> {
        self.adapter.create(opts).await
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        self.adapter.delete(name).await
    }
}
