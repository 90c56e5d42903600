// Container service: the seam handlers depend on

use std::sync::Arc;

use async_trait::async_trait;

use super::adapter::ContainerAdapter;
use super::model::{
    Container, ContainerSpec, ContainerStats, CreatedContainer, ExecOptions, ExecResult,
    LogsOptions,
};

#[async_trait]
pub trait ContainerService: Send + Sync {
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

/// Delegates every call to the adapter unchanged.
pub struct ContainerServiceImpl {
    adapter: Arc<dyn ContainerAdapter>,
}

impl ContainerServiceImpl {
    pub fn new(adapter: Arc<dyn ContainerAdapter>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl ContainerService for ContainerServiceImpl {
    async fn list(&self) -> anyhow::Result<Vec<Container>> {
        self.adapter.list().await
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<Container> {
        self.adapter.inspect(id).await
    }

    async fn create(&self, spec: ContainerSpec) -> anyhow::Result<CreatedContainer> {
        self.adapter.create(spec).await
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.adapter.delete(id).await
    }

    async fn start(&self, id: &str) -> anyhow::Result<()> {
        self.adapter.start(id).await
    }

    async fn stop(&self, id: &str, timeout: Option<i64>) -> anyhow::Result<()> {
        self.adapter.stop(id, timeout).await
    }

    async fn restart(&self, id: &str) -> anyhow::Result<()> {
        self.adapter.restart(id).await
    }

    async fn logs(&self, id: &str, opts: LogsOptions) -> anyhow::Result<Vec<String>> {
        self.adapter.logs(id, opts).await
    }

    async fn stats(&self, id: &str) -> anyhow::Result<ContainerStats> {
        self.adapter.stats(id).await
    }

    async fn exec(&self, id: &str, opts: ExecOptions) -> anyhow::Result<ExecResult> {
        self.adapter.exec(id, opts).await
    }
}
