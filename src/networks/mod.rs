// Networks: lifecycle and container attachment

pub mod adapter;
mod handler;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

pub use adapter::{DockerNetworkAdapter, NetworkAdapter};
pub use service::{NetworkService, NetworkServiceImpl};

pub fn router(service: Arc<dyn NetworkService>) -> Router {
    Router::new()
        .route(
            "/networks",
            get(handler::list_networks).post(handler::create_network),
        )
        .route(
            "/networks/{id}",
            get(handler::get_network).delete(handler::delete_network),
        )
        .route("/networks/{id}/connect", post(handler::connect_container))
        .route("/networks/{id}/disconnect", post(handler::disconnect_container))
        .with_state(service)
}
