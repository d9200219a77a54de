//! Download request, listing and clearing handlers.

use super::{BulkDownloadRequest, ErrorMessage, ListingResponse, StatusMessage};
use crate::api::AppState;
use crate::types::{BulkDownloadResponse, DownloadRequest, DownloadResult};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

/// POST /download - Download a single URL
#[utoipa::path(
    post,
    path = "/download",
    tag = "downloads",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Download outcome, success or error, with the detected platform", body = DownloadResult)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected download request body");
            return Json(DownloadResult::error(format!(
                "Server error: {}",
                rejection.body_text()
            )));
        }
    };

    let url = request.url.trim();
    if url.is_empty() {
        return Json(DownloadResult::error("URL is required"));
    }

    let custom_root = match request.output_dir {
        Some(dir) if state.config.download.allow_custom_output_dir => Some(dir),
        Some(dir) => {
            tracing::warn!(
                output_dir = %dir.display(),
                "ignoring output_dir, custom output roots are disabled"
            );
            None
        }
        None => None,
    };

    // Detached so a client disconnect cannot kill the running tool
    let downloader = Arc::clone(&state.downloader);
    let url = url.to_string();
    let task = tokio::spawn(async move {
        downloader
            .download_content(&url, custom_root.as_deref())
            .await
    });

    match task.await {
        Ok(result) => Json(result),
        Err(e) => {
            tracing::error!(error = %e, "download task failed");
            Json(DownloadResult::error(format!("Server error: {e}")))
        }
    }
}

/// POST /bulk-download - Download several URLs in order
#[utoipa::path(
    post,
    path = "/bulk-download",
    tag = "downloads",
    request_body = BulkDownloadRequest,
    responses(
        (status = 200, description = "Per-URL results, or an error when the list is missing", body = BulkDownloadResponse)
    )
)]
pub async fn bulk_download(
    State(state): State<AppState>,
    payload: Result<Json<BulkDownloadRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected bulk download request body");
            return Json(BulkDownloadResponse::error(format!(
                "Bulk download error: {}",
                rejection.body_text()
            )));
        }
    };

    if request.urls.is_empty() {
        return Json(BulkDownloadResponse::error("URLs list is required"));
    }

    let downloader = Arc::clone(&state.downloader);
    let task = tokio::spawn(async move { downloader.bulk_download(&request.urls).await });

    match task.await {
        Ok(results) => Json(BulkDownloadResponse::processed(results)),
        Err(e) => {
            tracing::error!(error = %e, "bulk download task failed");
            Json(BulkDownloadResponse::error(format!("Bulk download error: {e}")))
        }
    }
}

/// GET /downloads - List the download root
#[utoipa::path(
    get,
    path = "/downloads",
    tag = "downloads",
    responses(
        (status = 200, description = "Folders and files under the download root", body = ListingResponse),
        (status = 500, description = "Download root could not be read", body = ErrorMessage)
    )
)]
pub async fn list_downloads(State(state): State<AppState>) -> impl IntoResponse {
    match state.downloader.index().list().await {
        Ok(items) => (StatusCode::OK, Json(ListingResponse { items })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list downloads");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorMessage::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// POST /clear-downloads - Delete everything under the download root
#[utoipa::path(
    post,
    path = "/clear-downloads",
    tag = "downloads",
    responses(
        (status = 200, description = "Clear outcome, success or error", body = StatusMessage)
    )
)]
pub async fn clear_downloads(State(state): State<AppState>) -> impl IntoResponse {
    match state.downloader.index().clear().await {
        Ok(()) => Json(StatusMessage::success("Downloads cleared successfully")),
        Err(e) => Json(StatusMessage::error(format!(
            "Error clearing downloads: {e}"
        ))),
    }
}
