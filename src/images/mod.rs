// Images: listing, inspection, removal, pull and build

pub mod adapter;
mod handler;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

pub use adapter::{DockerImageAdapter, ImageAdapter};
pub use service::{ImageService, ImageServiceImpl};

pub fn router(service: Arc<dyn ImageService>) -> Router {
    Router::new()
        .route("/images", get(handler::list_images))
        .route("/images/pull", post(handler::pull_image))
        .route("/images/build", post(handler::build_image))
        .route(
            "/images/{id}",
            get(handler::get_image).delete(handler::delete_image),
        )
        .with_state(service)
}
