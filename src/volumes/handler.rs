// Volume handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::model::{CreateVolumeOptions, Volume};
use super::service::VolumeService;
use crate::error::{ApiError, ApiResult};
use crate::extract::{Validate, ValidJson, required};

type Service = State<Arc<dyn VolumeService>>;

#[derive(Debug, Deserialize)]
pub struct CreateVolumeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub driver_opts: HashMap<String, String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Validate for CreateVolumeRequest {
    fn validate(&self) -> Result<(), ApiError> {
        required("name", &self.name)
    }
}

#[derive(Debug, Serialize)]
pub struct VolumeResponse {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub labels: HashMap<String, String>,
    pub scope: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct VolumeDetailResponse {
    #[serde(flatten)]
    pub summary: VolumeResponse,
    pub options: HashMap<String, String>,
    pub status: HashMap<String, serde_json::Value>,
}

impl From<Volume> for VolumeResponse {
    fn from(v: Volume) -> Self {
        Self {
            name: v.name,
            driver: v.driver,
            mountpoint: v.mountpoint,
            labels: v.labels,
            scope: v.scope,
            created_at: v.created_at,
        }
    }
}

impl From<Volume> for VolumeDetailResponse {
    fn from(mut v: Volume) -> Self {
        let options = std::mem::take(&mut v.options);
        let status = std::mem::take(&mut v.status);
        Self {
            summary: v.into(),
            options,
            status,
        }
    }
}

/// GET /volumes
pub(super) async fn list_volumes(State(service): Service) -> ApiResult<Json<Vec<VolumeResponse>>> {
    let volumes = service.list().await.map_err(ApiError::internal)?;
    Ok(Json(volumes.into_iter().map(Into::into).collect()))
}

/// GET /volumes/{name}
pub(super) async fn get_volume(
    State(service): Service,
    Path(name): Path<String>,
) -> ApiResult<Json<VolumeDetailResponse>> {
    let volume = service.inspect(&name).await.map_err(ApiError::not_found)?;
    Ok(Json(volume.into()))
}

/// POST /volumes
pub(super) async fn create_volume(
    State(service): Service,
    ValidJson(req): ValidJson<CreateVolumeRequest>,
) -> ApiResult<(StatusCode, Json<VolumeDetailResponse>)> {
    let opts = CreateVolumeOptions {
        name: req.name,
        driver: req.driver,
        driver_opts: req.driver_opts,
        labels: req.labels,
    };
    let volume = service.create(opts).await.map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(volume.into())))
}

/// DELETE /volumes/{name}
pub(super) async fn delete_volume(
    State(service): Service,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete(&name).await.map_err(ApiError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}
