// Shared test helpers: in-memory adapters behind the real services

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use axum_test::TestServer;

use dockgate::containers::model::{
    Container, ContainerSpec, ContainerStats, CreatedContainer, ExecOptions, ExecResult,
    LogsOptions,
};
use dockgate::containers::{ContainerAdapter, ContainerServiceImpl};
use dockgate::images::model::{
    BuildOptions, BuildResult, Image, PullOptions, RemoveOptions, RemoveResult,
};
use dockgate::images::{ImageAdapter, ImageServiceImpl};
use dockgate::networks::model::{ConnectOptions, CreateNetworkOptions, DisconnectOptions, Network};
use dockgate::networks::{NetworkAdapter, NetworkServiceImpl};
use dockgate::routes::{self, AppState};
use dockgate::volumes::model::{CreateVolumeOptions, Volume};
use dockgate::volumes::{VolumeAdapter, VolumeServiceImpl};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> String {
    format!("{:064x}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// When set, every call fails with this daemon message.
type Failure = Mutex<Option<String>>;

fn check(failure: &Failure) -> anyhow::Result<()> {
    match failure.lock().unwrap().as_ref() {
        Some(msg) => Err(anyhow!(msg.clone())),
        None => Ok(()),
    }
}

#[derive(Default)]
pub struct FakeContainers {
    pub containers: Mutex<HashMap<String, Container>>,
    pub created: Mutex<Vec<ContainerSpec>>,
    pub stops: Mutex<Vec<(String, Option<i64>)>>,
    pub logs: Mutex<Vec<(String, LogsOptions)>>,
    pub execs: Mutex<Vec<(String, ExecOptions)>>,
    pub fail: Failure,
}

impl FakeContainers {
    fn get(&self, id: &str) -> anyhow::Result<Container> {
        self.containers
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("No such container: {}", id))
    }

    fn set_state(&self, id: &str, state: &str) -> anyhow::Result<()> {
        let mut containers = self.containers.lock().unwrap();
        let c = containers
            .get_mut(id)
            .ok_or_else(|| anyhow!("No such container: {}", id))?;
        c.state = state.to_string();
        c.status = state.to_string();
        Ok(())
    }
}

#[async_trait]
impl ContainerAdapter for FakeContainers {
    async fn list(&self) -> anyhow::Result<Vec<Container>> {
        check(&self.fail).context("failed to list containers")?;
        Ok(self.containers.lock().unwrap().values().cloned().collect())
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<Container> {
        check(&self.fail).with_context(|| format!("failed to inspect container {}", id))?;
        self.get(id)
            .with_context(|| format!("failed to inspect container {}", id))
    }

    async fn create(&self, spec: ContainerSpec) -> anyhow::Result<CreatedContainer> {
        check(&self.fail).with_context(|| format!("failed to create container {}", spec.name))?;
        let mut containers = self.containers.lock().unwrap();
        if containers.values().any(|c| c.name == spec.name) {
            return Err(anyhow!("Conflict. The container name \"/{}\" is already in use", spec.name))
                .with_context(|| format!("failed to create container {}", spec.name));
        }
        let id = next_id();
        containers.insert(
            id.clone(),
            Container {
                id: id.clone(),
                name: spec.name.clone(),
                image: spec.image.clone(),
                state: "created".into(),
                status: "created".into(),
                labels: spec.labels.clone(),
                env: spec.env.clone(),
                restart_policy: spec.restart_policy.clone(),
                ..Default::default()
            },
        );
        self.created.lock().unwrap().push(spec);
        Ok(CreatedContainer {
            id,
            warnings: vec![],
        })
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| format!("failed to delete container {}", id))?;
        self.containers
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No such container: {}", id))
            .with_context(|| format!("failed to delete container {}", id))
    }

    async fn start(&self, id: &str) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| format!("failed to start container {}", id))?;
        self.set_state(id, "running")
            .with_context(|| format!("failed to start container {}", id))
    }

    async fn stop(&self, id: &str, timeout: Option<i64>) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| format!("failed to stop container {}", id))?;
        self.stops.lock().unwrap().push((id.to_string(), timeout));
        self.set_state(id, "exited")
            .with_context(|| format!("failed to stop container {}", id))
    }

    async fn restart(&self, id: &str) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| format!("failed to restart container {}", id))?;
        self.set_state(id, "running")
            .with_context(|| format!("failed to restart container {}", id))
    }

    async fn logs(&self, id: &str, opts: LogsOptions) -> anyhow::Result<Vec<String>> {
        check(&self.fail).with_context(|| format!("failed to get logs for container {}", id))?;
        self.get(id)
            .with_context(|| format!("failed to get logs for container {}", id))?;
        self.logs.lock().unwrap().push((id.to_string(), opts));
        Ok(vec!["starting".into(), "ready".into()])
    }

    async fn stats(&self, id: &str) -> anyhow::Result<ContainerStats> {
        check(&self.fail).with_context(|| format!("failed to get stats for container {}", id))?;
        self.get(id)
            .with_context(|| format!("failed to get stats for container {}", id))?;
        Ok(ContainerStats {
            cpu_percent: 1.5,
            memory_usage: 4 * 1024 * 1024,
            memory_limit: 1024 * 1024 * 1024,
            memory_percent: 0.390625,
            network_in: 100,
            network_out: 200,
            block_read: 0,
            block_write: 4096,
            pids: 1,
        })
    }

    async fn exec(&self, id: &str, opts: ExecOptions) -> anyhow::Result<ExecResult> {
        check(&self.fail).with_context(|| format!("failed to create exec for container {}", id))?;
        self.get(id)
            .with_context(|| format!("failed to create exec for container {}", id))?;
        let output = if opts.attach_stdout {
            format!("{}\n", opts.command.join(" "))
        } else {
            String::new()
        };
        self.execs.lock().unwrap().push((id.to_string(), opts));
        Ok(ExecResult {
            output,
            exit_code: 0,
        })
    }
}

#[derive(Default)]
pub struct FakeImages {
    pub images: Mutex<HashMap<String, Image>>,
    pub pulls: Mutex<Vec<PullOptions>>,
    pub builds: Mutex<Vec<BuildOptions>>,
    pub removals: Mutex<Vec<(String, RemoveOptions)>>,
    pub fail: Failure,
}

impl FakeImages {
    pub fn insert(&self, image: Image) {
        self.images.lock().unwrap().insert(image.id.clone(), image);
    }
}

#[async_trait]
impl ImageAdapter for FakeImages {
    async fn list(&self) -> anyhow::Result<Vec<Image>> {
        check(&self.fail).context("failed to list images")?;
        Ok(self.images.lock().unwrap().values().cloned().collect())
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<Image> {
        check(&self.fail).with_context(|| format!("failed to inspect image {}", id))?;
        self.images
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("No such image: {}", id))
            .with_context(|| format!("failed to inspect image {}", id))
    }

    async fn delete(&self, id: &str, opts: RemoveOptions) -> anyhow::Result<RemoveResult> {
        check(&self.fail).with_context(|| format!("failed to delete image {}", id))?;
        self.removals.lock().unwrap().push((id.to_string(), opts));
        let image = self
            .images
            .lock()
            .unwrap()
            .remove(id)
            .ok_or_else(|| anyhow!("No such image: {}", id))
            .with_context(|| format!("failed to delete image {}", id))?;
        Ok(RemoveResult {
            deleted: vec![image.id],
            untagged: image.tags,
        })
    }

    async fn pull(&self, opts: PullOptions) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| format!("failed to pull image {}", opts.image))?;
        self.pulls.lock().unwrap().push(opts);
        Ok(())
    }

    async fn build(&self, opts: BuildOptions) -> anyhow::Result<BuildResult> {
        check(&self.fail).with_context(|| format!("failed to build image {}", opts.tag))?;
        let id = format!("sha256:{}", next_id());
        let tag = opts.tag.clone();
        self.builds.lock().unwrap().push(opts);
        Ok(BuildResult {
            image_id: id,
            tags: vec![tag],
            warnings: vec![],
        })
    }
}

#[derive(Default)]
pub struct FakeNetworks {
    pub networks: Mutex<HashMap<String, Network>>,
    pub connects: Mutex<Vec<(String, ConnectOptions)>>,
    pub disconnects: Mutex<Vec<(String, DisconnectOptions)>>,
    pub fail: Failure,
}

#[async_trait]
impl NetworkAdapter for FakeNetworks {
    async fn list(&self) -> anyhow::Result<Vec<Network>> {
        check(&self.fail).context("failed to list networks")?;
        Ok(self.networks.lock().unwrap().values().cloned().collect())
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<Network> {
        check(&self.fail).with_context(|| format!("failed to inspect network {}", id))?;
        self.networks
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("network {} not found", id))
            .with_context(|| format!("failed to inspect network {}", id))
    }

    async fn create(&self, opts: CreateNetworkOptions) -> anyhow::Result<Network> {
        check(&self.fail).with_context(|| format!("failed to create network {}", opts.name))?;
        let network = Network {
            id: next_id(),
            name: opts.name,
            driver: opts.driver,
            scope: "local".into(),
            internal: opts.internal,
            attachable: opts.attachable,
            labels: opts.labels,
            options: opts.options,
            created: "2024-01-01T00:00:00Z".into(),
            ipam: opts.ipam.unwrap_or_default(),
            containers: HashMap::new(),
        };
        self.networks
            .lock()
            .unwrap()
            .insert(network.id.clone(), network.clone());
        Ok(network)
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| format!("failed to delete network {}", id))?;
        self.networks
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("network {} not found", id))
            .with_context(|| format!("failed to delete network {}", id))
    }

    async fn connect(&self, network_id: &str, opts: ConnectOptions) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| {
            format!(
                "failed to connect container {} to network {}",
                opts.container_id, network_id
            )
        })?;
        self.connects
            .lock()
            .unwrap()
            .push((network_id.to_string(), opts));
        Ok(())
    }

    async fn disconnect(&self, network_id: &str, opts: DisconnectOptions) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| {
            format!(
                "failed to disconnect container {} from network {}",
                opts.container_id, network_id
            )
        })?;
        self.disconnects
            .lock()
            .unwrap()
            .push((network_id.to_string(), opts));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeVolumes {
    pub volumes: Mutex<HashMap<String, Volume>>,
    pub fail: Failure,
}

#[async_trait]
impl VolumeAdapter for FakeVolumes {
    async fn list(&self) -> anyhow::Result<Vec<Volume>> {
        check(&self.fail).context("failed to list volumes")?;
        Ok(self.volumes.lock().unwrap().values().cloned().collect())
    }

    async fn inspect(&self, name: &str) -> anyhow::Result<Volume> {
        check(&self.fail).with_context(|| format!("failed to inspect volume {}", name))?;
        self.volumes
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("get {}: no such volume", name))
            .with_context(|| format!("failed to inspect volume {}", name))
    }

    async fn create(&self, opts: CreateVolumeOptions) -> anyhow::Result<Volume> {
        check(&self.fail).with_context(|| format!("failed to create volume {}", opts.name))?;
        let volume = Volume {
            mountpoint: format!("/var/lib/docker/volumes/{}/_data", opts.name),
            driver: if opts.driver.is_empty() {
                "local".into()
            } else {
                opts.driver
            },
            name: opts.name,
            labels: opts.labels,
            options: opts.driver_opts,
            scope: "local".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            status: HashMap::new(),
        };
        self.volumes
            .lock()
            .unwrap()
            .insert(volume.name.clone(), volume.clone());
        Ok(volume)
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        check(&self.fail).with_context(|| format!("failed to delete volume {}", name))?;
        self.volumes
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| anyhow!("get {}: no such volume", name))
            .with_context(|| format!("failed to delete volume {}", name))
    }
}

/// The fakes behind a test server, kept for assertions.
#[derive(Clone, Default)]
pub struct Fakes {
    pub containers: Arc<FakeContainers>,
    pub images: Arc<FakeImages>,
    pub networks: Arc<FakeNetworks>,
    pub volumes: Arc<FakeVolumes>,
}

impl Fakes {
    pub fn app(&self) -> axum::Router {
        routes::app(AppState {
            containers: Arc::new(ContainerServiceImpl::new(self.containers.clone())),
            images: Arc::new(ImageServiceImpl::new(self.images.clone())),
            networks: Arc::new(NetworkServiceImpl::new(self.networks.clone())),
            volumes: Arc::new(VolumeServiceImpl::new(self.volumes.clone())),
        })
    }

    /// Makes every adapter call fail with `message`.
    pub fn fail_all(&self, message: &str) {
        *self.containers.fail.lock().unwrap() = Some(message.to_string());
        *self.images.fail.lock().unwrap() = Some(message.to_string());
        *self.networks.fail.lock().unwrap() = Some(message.to_string());
        *self.volumes.fail.lock().unwrap() = Some(message.to_string());
    }
}

pub fn test_server() -> (TestServer, Fakes) {
    let fakes = Fakes::default();
    let server = TestServer::new(fakes.app());
    (server, fakes)
}
