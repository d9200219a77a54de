//! System handlers: health, supported platforms, OpenAPI.

use crate::types::SupportedPlatforms;
use axum::{Json, response::IntoResponse};
use serde_json::json;

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /supported-platforms - Static capability manifest
#[utoipa::path(
    get,
    path = "/supported-platforms",
    tag = "system",
    responses(
        (status = 200, description = "Supported sites and features", body = SupportedPlatforms)
    )
)]
pub async fn supported_platforms() -> impl IntoResponse {
    Json(SupportedPlatforms::manifest())
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI 3.1 specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}
