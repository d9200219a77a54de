//! REST API server module
//!
//! Exposes the download orchestrator and the download index over HTTP, with
//! an OpenAPI 3.1 document generated from the handlers.

use crate::{Result, SocialDownloader};
use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Downloads
/// - `POST /download` - Download a single URL
/// - `POST /bulk-download` - Download several URLs in order
/// - `GET /downloads` - List folders and files under the download root
/// - `POST /clear-downloads` - Delete everything under the download root
///
/// ## Files
/// - `GET /download-file/*path` - Stream one file as an attachment
/// - `GET /download-folder/:name` - Stream a folder's only video, or list several
///
/// ## System
/// - `GET /supported-platforms` - Supported sites and features
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(downloader: Arc<SocialDownloader>) -> Router {
    let state = AppState::new(downloader);
    let config = Arc::clone(&state.config);

    let router = Router::new()
        // Downloads
        .route("/download", post(routes::download))
        .route("/bulk-download", post(routes::bulk_download))
        .route("/downloads", get(routes::list_downloads))
        .route("/clear-downloads", post(routes::clear_downloads))
        // Files
        .route("/download-file/*path", get(routes::download_file))
        .route("/download-folder/:name", get(routes::download_folder))
        // System
        .route("/supported-platforms", get(routes::supported_platforms))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // SwaggerUi registers its own document route, so it cannot reuse /openapi.json
    let router = if config.server.api.swagger_ui {
        router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
    } else {
        router
    };

    let router = router.with_state(state);

    // The last layer applied runs first: CORS, then tracing, then auth
    let router = if config.server.api.api_key.is_some() {
        router.layer(middleware::from_fn_with_state(
            config.server.api.api_key.clone(),
            auth::require_api_key,
        ))
    } else {
        router
    };

    let router = router.layer(TraceLayer::new_for_http());

    if config.server.api.cors_enabled {
        router.layer(build_cors_layer(&config.server.api.cors_origins))
    } else {
        router
    }
}

/// Build a CORS layer from the configured origins
///
/// `"*"` or an empty list allows any origin. Methods and headers are always
/// unrestricted.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until the listener fails. Use [`start_api_server_with_shutdown`] to
/// stop on a signal.
///
/// # Example
///
/// ```no_run
/// use social_dl::{Config, SocialDownloader};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Arc::new(SocialDownloader::new(Config::default())?);
///
/// // Blocks until the server stops
/// social_dl::api::start_api_server(downloader).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(downloader: Arc<SocialDownloader>) -> Result<()> {
    start_api_server_with_shutdown(downloader, std::future::pending()).await
}

/// Start the API server and stop accepting connections once `shutdown`
/// resolves. In-flight requests are allowed to finish.
pub async fn start_api_server_with_shutdown<F>(
    downloader: Arc<SocialDownloader>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = downloader.config().server.api.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(downloader);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
