// Volumes

pub mod adapter;
mod handler;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

pub use adapter::{DockerVolumeAdapter, VolumeAdapter};
pub use service::{VolumeService, VolumeServiceImpl};

pub fn router(service: Arc<dyn VolumeService>) -> Router {
    Router::new()
        .route(
            "/volumes",
            get(handler::list_volumes).post(handler::create_volume),
        )
        .route(
            "/volumes/{name}",
            get(handler::get_volume).delete(handler::delete_volume),
        )
        .with_state(service)
}
