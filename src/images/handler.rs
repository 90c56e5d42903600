// Image handlers

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::model::{BuildOptions, Image, PullOptions, RegistryAuth, RemoveOptions};
use super::service::ImageService;
use crate::error::{ApiError, ApiResult};
use crate::extract::{Validate, ValidJson, ValidQuery, required};

type Service = State<Arc<dyn ImageService>>;

#[derive(Debug, Deserialize)]
pub struct RegistryAuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub server_address: String,
}

#[derive(Debug, Deserialize)]
pub struct PullImageRequest {
    #[serde(default)]
    pub image: String,
    pub auth: Option<RegistryAuthRequest>,
}

impl Validate for PullImageRequest {
    fn validate(&self) -> Result<(), ApiError> {
        required("image", &self.image)
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildImageRequest {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub dockerfile: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub build_args: HashMap<String, String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub no_cache: bool,
}

impl Validate for BuildImageRequest {
    fn validate(&self) -> Result<(), ApiError> {
        required("tag", &self.tag)?;
        required("context", &self.context)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveImageQuery {
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub prune_children: bool,
}

impl Validate for RemoveImageQuery {}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: String,
    pub tags: Vec<String>,
    pub size: i64,
    pub created: i64,
    pub labels: HashMap<String, String>,
    pub containers: i64,
}

#[derive(Debug, Serialize)]
pub struct ImageDetailResponse {
    #[serde(flatten)]
    pub summary: ImageResponse,
    pub os: String,
    pub architecture: String,
    pub author: String,
    pub comment: String,
    pub cmd: Vec<String>,
    pub entrypoint: Vec<String>,
    pub env: Vec<String>,
    pub working_dir: String,
    pub exposed_ports: Vec<String>,
    pub layers: usize,
    pub virtual_size: i64,
}

#[derive(Debug, Serialize)]
pub struct BuildImageResponse {
    pub image_id: String,
    pub tags: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RemoveImageResponse {
    pub deleted: Vec<String>,
    pub untagged: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl From<Image> for ImageResponse {
    fn from(i: Image) -> Self {
        Self {
            id: i.id,
            tags: i.tags,
            size: i.size,
            created: i.created,
            labels: i.labels,
            containers: i.containers,
        }
    }
}

impl From<Image> for ImageDetailResponse {
    fn from(i: Image) -> Self {
        Self {
            summary: ImageResponse {
                id: i.id,
                tags: i.tags,
                size: i.size,
                created: i.created,
                labels: i.labels,
                containers: i.containers,
            },
            os: i.os,
            architecture: i.architecture,
            author: i.author,
            comment: i.comment,
            cmd: i.cmd,
            entrypoint: i.entrypoint,
            env: i.env,
            working_dir: i.working_dir,
            exposed_ports: i.exposed_ports,
            layers: i.layers,
            virtual_size: i.virtual_size,
        }
    }
}

/// GET /images
pub(super) async fn list_images(State(service): Service) -> ApiResult<Json<Vec<ImageResponse>>> {
    let images = service.list().await.map_err(ApiError::internal)?;
    Ok(Json(images.into_iter().map(Into::into).collect()))
}

/// GET /images/{id}
pub(super) async fn get_image(
    State(service): Service,
    Path(id): Path<String>,
) -> ApiResult<Json<ImageDetailResponse>> {
    let image = service.inspect(&id).await.map_err(ApiError::not_found)?;
    Ok(Json(image.into()))
}

/// DELETE /images/{id}?force=&prune_children=
pub(super) async fn delete_image(
    State(service): Service,
    Path(id): Path<String>,
    ValidQuery(query): ValidQuery<RemoveImageQuery>,
) -> ApiResult<Json<RemoveImageResponse>> {
    let opts = RemoveOptions {
        force: query.force,
        prune_children: query.prune_children,
    };
    let result = service.delete(&id, opts).await.map_err(ApiError::internal)?;
    Ok(Json(RemoveImageResponse {
        deleted: result.deleted,
        untagged: result.untagged,
    }))
}

/// POST /images/pull
pub(super) async fn pull_image(
    State(service): Service,
    ValidJson(req): ValidJson<PullImageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let opts = PullOptions {
        image: req.image,
        auth: req.auth.map(|a| RegistryAuth {
            username: a.username,
            password: a.password,
            server_address: a.server_address,
        }),
    };
    service.pull(opts).await.map_err(ApiError::internal)?;
    Ok(Json(MessageResponse {
        message: "image pulled",
    }))
}

/// POST /images/build
pub(super) async fn build_image(
    State(service): Service,
    ValidJson(req): ValidJson<BuildImageRequest>,
) -> ApiResult<(StatusCode, Json<BuildImageResponse>)> {
    let opts = BuildOptions {
        tag: req.tag,
        dockerfile: req.dockerfile,
        context: PathBuf::from(req.context),
        build_args: req.build_args,
        labels: req.labels,
        no_cache: req.no_cache,
    };
    let result = service.build(opts).await.map_err(ApiError::internal)?;
    Ok((
        StatusCode::CREATED,
        Json(BuildImageResponse {
            image_id: result.image_id,
            tags: result.tags,
            warnings: result.warnings,
        }),
    ))
}
