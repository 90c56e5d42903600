// Containers: lifecycle, logs, stats and exec

pub mod adapter;
mod handler;
pub mod logs;
pub mod model;
pub mod service;
mod stats;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

pub use adapter::{ContainerAdapter, DockerContainerAdapter};
pub use service::{ContainerService, ContainerServiceImpl};

pub fn router(service: Arc<dyn ContainerService>) -> Router {
    Router::new()
        .route(
            "/containers",
            get(handler::list_containers).post(handler::create_container),
        )
        .route(
            "/containers/{id}",
            get(handler::get_container).delete(handler::delete_container),
        )
        .route("/containers/{id}/start", post(handler::start_container))
        .route("/containers/{id}/stop", post(handler::stop_container))
        .route("/containers/{id}/restart", post(handler::restart_container))
        .route("/containers/{id}/logs", get(handler::container_logs))
        .route("/containers/{id}/stats", get(handler::container_stats))
        .route("/containers/{id}/exec", post(handler::exec_container))
        .with_state(service)
}
