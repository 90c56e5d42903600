// Image service: forwards to the adapter

use std::sync::Arc;

use async_trait::async_trait;

use super::adapter::ImageAdapter;
use super::model::{BuildOptions, BuildResult, Image, PullOptions, RemoveOptions, RemoveResult};

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Image>>;
    async fn inspect(&self, id: &str) -> anyhow::Result<Image>;
    async fn delete(&self, id: &str, opts: RemoveOptions) -> anyhow::Result<RemoveResult>;
    async fn pull(&self, opts: PullOptions) -> anyhow::Result<()>;
    async fn build(&self, opts: BuildOptions) -> anyhow::Result<BuildResult>;
}

pub struct ImageServiceImpl {
    adapter: Arc<dyn ImageAdapter>,
}

impl ImageServiceImpl {
    pub fn new(adapter: Arc<dyn ImageAdapter>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl ImageService for ImageServiceImpl {
    async fn list(&self) -> anyhow::Result<Vec<Image>> {
        self.adapter.list().await
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<Image> {
        self.adapter.inspect(id).await
    }

    async fn delete(&self, id: &str, opts: RemoveOptions) -> anyhow::Result<RemoveResult> {
        self.adapter.delete(id, opts).await
    }

    async fn pull(&self, opts: PullOptions) -> anyhow::Result<()> {
        self.adapter.pull(opts).await
    }

    async fn build(&self, opts: BuildOptions) -> anyhow::Result<BuildResult> {
        self.adapter.build(opts).await
    }
}
