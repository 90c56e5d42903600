// GET handlers outside the resource groups: banner and version

use axum::response::IntoResponse;

use crate::version::{NAME, VERSION};

/// GET /: plain-text banner.
pub(super) async fn root_handler() -> impl IntoResponse {
    format!("{} {}: Docker management API under {}", NAME, VERSION, super::API_PREFIX)
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
