// Image adapter: list/inspect/remove plus pull and build streams

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::models::{BuildInfo, ImageInspect, ImageSummary};
use bollard::query_parameters::{
    BuildImageOptions, CreateImageOptions, ListImagesOptions, RemoveImageOptions,
};
use futures_util::StreamExt;
use tracing::instrument;

use super::model::{BuildOptions, BuildResult, Image, PullOptions, RemoveOptions, RemoveResult};

#[async_trait]
pub trait ImageAdapter: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Image>>;
    async fn inspect(&self, id: &str) -> anyhow::Result<Image>;
    async fn delete(&self, id: &str, opts: RemoveOptions) -> anyhow::Result<RemoveResult>;
    async fn pull(&self, opts: PullOptions) -> anyhow::Result<()>;
    async fn build(&self, opts: BuildOptions) -> anyhow::Result<BuildResult>;
}

pub struct DockerImageAdapter {
    docker: Docker,
}

impl DockerImageAdapter {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl ImageAdapter for DockerImageAdapter {
    #[instrument(skip(self), fields(adapter = "images", operation = "list"))]
    async fn list(&self) -> anyhow::Result<Vec<Image>> {
        let options = ListImagesOptions {
            all: true,
            ..Default::default()
        };
        let images = self
            .docker
            .list_images(Some(options))
            .await
            .context("failed to list images")?;
        Ok(images.into_iter().map(image_from_summary).collect())
    }

    #[instrument(skip(self), fields(adapter = "images", operation = "inspect"))]
    async fn inspect(&self, id: &str) -> anyhow::Result<Image> {
        let details = self
            .docker
            .inspect_image(id)
            .await
            .with_context(|| format!("failed to inspect image {}", id))?;
        Ok(image_from_inspect(details))
    }

    #[instrument(skip(self), fields(adapter = "images", operation = "delete"))]
    async fn delete(&self, id: &str, opts: RemoveOptions) -> anyhow::Result<RemoveResult> {
        let options = RemoveImageOptions {
            force: opts.force,
            noprune: !opts.prune_children,
            ..Default::default()
        };
        let items = self
            .docker
            .remove_image(id, Some(options), None)
            .await
            .with_context(|| format!("failed to delete image {}", id))?;

        let mut result = RemoveResult::default();
        for item in items {
            if let Some(deleted) = item.deleted.filter(|d| !d.is_empty()) {
                result.deleted.push(deleted);
            }
            if let Some(untagged) = item.untagged.filter(|u| !u.is_empty()) {
                result.untagged.push(untagged);
            }
        }
        Ok(result)
    }

    #[instrument(skip(self, opts), fields(adapter = "images", operation = "pull", image = %opts.image))]
    async fn pull(&self, opts: PullOptions) -> anyhow::Result<()> {
        let (repository, tag) = split_reference(&opts.image);
        let options = CreateImageOptions {
            from_image: Some(repository.to_string()),
            tag: Some(tag.to_string()),
            ..Default::default()
        };
        let credentials = opts.auth.map(|a| DockerCredentials {
            username: Some(a.username),
            password: Some(a.password),
            serveraddress: Some(a.server_address),
            ..Default::default()
        });

        let mut stream = self.docker.create_image(Some(options), None, credentials);
        // progress is drained, not surfaced
        while let Some(item) = stream.next().await {
            item.with_context(|| format!("failed to pull image {}", opts.image))?;
        }
        tracing::info!("Pulled image {}", opts.image);
        Ok(())
    }

    #[instrument(skip(self, opts), fields(adapter = "images", operation = "build", tag = %opts.tag))]
    async fn build(&self, opts: BuildOptions) -> anyhow::Result<BuildResult> {
        let context_dir = opts.context.clone();
        let tar_bytes = tokio::task::spawn_blocking(move || create_build_context(&context_dir))
            .await
            .context("failed to create build context")??;

        let options = BuildImageOptions {
            t: Some(opts.tag.clone()),
            dockerfile: if opts.dockerfile.is_empty() {
                "Dockerfile".to_string()
            } else {
                opts.dockerfile.clone()
            },
            buildargs: (!opts.build_args.is_empty()).then(|| opts.build_args.clone()),
            labels: (!opts.labels.is_empty()).then(|| opts.labels.clone()),
            nocache: opts.no_cache,
            rm: true,
            ..Default::default()
        };

        let body = bollard::body_full(tar_bytes.into());
        let mut stream = self.docker.build_image(options, None, Some(body));
        let mut progress = BuildProgress::default();
        while let Some(item) = stream.next().await {
            let info = item.with_context(|| format!("failed to build image {}", opts.tag))?;
            progress.observe(&info)?;
        }
        tracing::info!("Built image {} ({})", opts.tag, progress.image_id);

        Ok(BuildResult {
            image_id: progress.image_id,
            tags: vec![opts.tag],
            warnings: progress.warnings,
        })
    }
}

/// Tars `dir` recursively with paths relative to its root.
pub(crate) fn create_build_context(dir: &Path) -> anyhow::Result<Vec<u8>> {
    anyhow::ensure!(
        dir.is_dir(),
        "failed to create build context: {} is not a directory",
        dir.display()
    );
    let mut archive = tar::Builder::new(Vec::new());
    archive.follow_symlinks(false);
    archive
        .append_dir_all(".", dir)
        .with_context(|| format!("failed to create build context from {}", dir.display()))?;
    archive
        .into_inner()
        .context("failed to finish build context archive")
}

/// Splits an image reference into (repository, tag). A missing tag is
/// `latest`; a digest is passed through as the tag. A colon before the last
/// `/` belongs to a registry port, not a tag.
pub(crate) fn split_reference(reference: &str) -> (&str, &str) {
    if let Some((repo, digest)) = reference.split_once('@') {
        return (repo, digest);
    }
    let name_start = reference.rfind('/').map_or(0, |i| i + 1);
    match reference[name_start..].rfind(':') {
        Some(i) => (
            &reference[..name_start + i],
            &reference[name_start + i + 1..],
        ),
        None => (reference, "latest"),
    }
}

/// Accumulates the build stream: the last image id seen and any warnings.
#[derive(Debug, Default)]
pub(crate) struct BuildProgress {
    pub(crate) image_id: String,
    pub(crate) warnings: Vec<String>,
}

impl BuildProgress {
    /// Fails on the first error event.
    pub(crate) fn observe(&mut self, info: &BuildInfo) -> anyhow::Result<()> {
        if let Some(detail) = &info.error_detail {
            anyhow::bail!(
                "build error: {}",
                detail.message.as_deref().unwrap_or("unknown error")
            );
        }
        if let Some(id) = info.aux.as_ref().and_then(|a| a.id.as_ref()) {
            self.image_id = id.clone();
        }
        if let Some(line) = &info.stream {
            let line = line.trim();
            if line.contains("WARNING") {
                self.warnings.push(line.to_string());
            } else if !line.is_empty() {
                tracing::debug!("Build: {}", line);
            }
        }
        Ok(())
    }
}

/// Exposed ports arrive as `{"80/tcp": {}}` from the daemon; accept a plain
/// list too.
fn port_keys(value: serde_json::Value) -> Vec<String> {
    let mut ports: Vec<String> = match value {
        serde_json::Value::Object(map) => map.into_iter().map(|(k, _)| k).collect(),
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    ports.sort();
    ports
}

fn parse_created(created: Option<String>) -> i64 {
    created
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(&s).ok())
        .map_or(0, |d| d.timestamp())
}

pub(crate) fn image_from_summary(i: ImageSummary) -> Image {
    Image {
        id: i.id,
        tags: i.repo_tags,
        size: i.size,
        virtual_size: i.size,
        created: i.created,
        labels: i.labels,
        containers: i.containers,
        ..Default::default()
    }
}

pub(crate) fn image_from_inspect(i: ImageInspect) -> Image {
    let config = i.config.unwrap_or_default();
    let size = i.size.unwrap_or(0);
    let exposed_ports = config
        .exposed_ports
        .as_ref()
        .and_then(|p| serde_json::to_value(p).ok())
        .map(port_keys)
        .unwrap_or_default();
    Image {
        id: i.id.unwrap_or_default(),
        tags: i.repo_tags.unwrap_or_default(),
        size,
        virtual_size: size,
        created: parse_created(i.created.map(|d| d.to_string())),
        labels: config.labels.unwrap_or_default(),
        containers: 0,
        os: i.os.unwrap_or_default(),
        architecture: i.architecture.unwrap_or_default(),
        author: i.author.unwrap_or_default(),
        comment: i.comment.unwrap_or_default(),
        cmd: config.cmd.unwrap_or_default(),
        entrypoint: config.entrypoint.unwrap_or_default(),
        env: config.env.unwrap_or_default(),
        working_dir: config.working_dir.unwrap_or_default(),
        exposed_ports,
        layers: i
            .root_fs
            .and_then(|r| r.layers)
            .map_or(0, |layers| layers.len()),
    }
}
