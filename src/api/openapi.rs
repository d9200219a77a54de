//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the social-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the social-dl REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "social-dl REST API",
        version = "0.1.0",
        description = "Download media from social platforms by URL and browse, fetch or clear the downloaded files",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Downloads
        crate::api::routes::download,
        crate::api::routes::bulk_download,
        crate::api::routes::list_downloads,
        crate::api::routes::clear_downloads,

        // Files
        crate::api::routes::download_file,
        crate::api::routes::download_folder,

        // System
        crate::api::routes::supported_platforms,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::DownloadStatus,
        crate::types::ContentType,
        crate::types::DownloadRequest,
        crate::types::DownloadResult,
        crate::types::BulkDownloadResponse,
        crate::types::EntryKind,
        crate::types::IndexEntry,
        crate::types::FolderFile,
        crate::types::SupportedPlatforms,
        crate::platform::Platform,

        // Request/response types from routes
        crate::api::routes::BulkDownloadRequest,
        crate::api::routes::ListingResponse,
        crate::api::routes::StatusMessage,
        crate::api::routes::FolderListingResponse,
        crate::api::routes::ErrorMessage,

        // Error types
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "downloads", description = "Download requests, listing and clearing"),
        (name = "files", description = "Retrieval of downloaded files and folders"),
        (name = "system", description = "Health, capabilities and API documentation"),
    )
)]
pub struct ApiDoc;
