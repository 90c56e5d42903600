// Network service: forwards to the adapter

use std::sync::Arc;

use async_trait::async_trait;

use super::adapter::NetworkAdapter;
use super::model::{ConnectOptions, CreateNetworkOptions, DisconnectOptions, Network};

#[async_trait]
pub trait NetworkService: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Network>>;
    async fn inspect(&self, id: &str) -> anyhow::Result<Network>;
    async fn create(&self, opts: CreateNetworkOptions) -> anyhow::Result<Network>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
    async fn connect(&self, network_id: &str, opts: ConnectOptions) -> anyhow::Result<()>;
    async fn disconnect(&self, network_id: &str, opts: DisconnectOptions) -> anyhow::Result<()>;
}

pub struct NetworkServiceImpl {
    adapter: Arc<dyn NetworkAdapter>,
}

impl NetworkServiceImpl {
    pub fn new(adapter: Arc<dyn NetworkAdapter>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl NetworkService for NetworkServiceImpl {
    async fn list(&self) -> anyhow::Result<Vec<Network>> {
        self.adapter.list().await
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<Network> {
        self.adapter.inspect(id).await
    }

    async fn create(&self, opts: CreateNetworkOptions) -> anyhow::Result<Network> {
        self.adapter.create(opts).await
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.adapter.delete(id).await
    }

    async fn connect(&self, network_id: &str, opts: ConnectOptions) -> anyhow::Result<()> {
        self.adapter.connect(network_id, opts).await
    }

    async fn disconnect(&self, network_id: &str, opts: DisconnectOptions) -> anyhow::Result<()> {
        self.adapter.disconnect(network_id, opts).await
    }
}
