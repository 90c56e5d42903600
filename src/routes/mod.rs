// HTTP composition root: resource routers under /api/docker

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::containers::{self, ContainerService};
use crate::images::{self, ImageService};
use crate::networks::{self, NetworkService};
use crate::volumes::{self, VolumeService};

pub const API_PREFIX: &str = "/api/docker";

/// One service per resource vertical.
#[derive(Clone)]
pub struct AppState {
    pub containers: Arc<dyn ContainerService>,
    pub images: Arc<dyn ImageService>,
    pub networks: Arc<dyn NetworkService>,
    pub volumes: Arc<dyn VolumeService>,
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(containers::router(state.containers))
        .merge(images::router(state.images))
        .merge(networks::router(state.networks))
        .merge(volumes::router(state.volumes));

    Router::new()
        .route("/", get(http::root_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
}
