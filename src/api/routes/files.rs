//! File and folder retrieval handlers.

use super::{ErrorMessage, FolderListingResponse, StatusMessage};
use crate::api::AppState;
use crate::error::Error;
use crate::types::{DownloadStatus, FolderContents};
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// GET /download-file/*path - Stream one file as an attachment
#[utoipa::path(
    get,
    path = "/download-file/{path}",
    tag = "files",
    params(
        ("path" = String, Path, description = "File path relative to the download root, e.g. `youtube_20240101_120000/clip.mp4`")
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorMessage),
        (status = 500, description = "File could not be read", body = ErrorMessage)
    )
)]
pub async fn download_file(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let resolved = match state.downloader.index().resolve_file(&path).await {
        Ok(resolved) => resolved,
        Err(Error::NotFound(_)) => {
            return (StatusCode::NOT_FOUND, Json(ErrorMessage::new("File not found")))
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorMessage::new(e.to_string())),
            )
                .into_response();
        }
    };

    match attachment(&resolved).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(path = %resolved.display(), error = %e, "failed to stream file");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorMessage::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /download-folder/:name - Fetch the videos of one session folder
///
/// A folder with one `.mp4` streams it directly; several yield a list of
/// retrieval URLs.
#[utoipa::path(
    get,
    path = "/download-folder/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "Session folder name")
    ),
    responses(
        (status = 200, description = "The single video, a listing of several, or an error when there are none", body = FolderListingResponse),
        (status = 404, description = "Folder not found", body = StatusMessage),
        (status = 500, description = "Folder could not be read", body = StatusMessage)
    )
)]
pub async fn download_folder(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let contents = match state.downloader.index().folder_contents(&name).await {
        Ok(contents) => contents,
        Err(Error::NotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(StatusMessage::error("Folder not found")),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusMessage::error(format!("Error: {e}"))),
            )
                .into_response();
        }
    };

    match contents {
        FolderContents::Empty => {
            Json(StatusMessage::error("No MP4 videos found in folder")).into_response()
        }
        FolderContents::Single(path) => match attachment(&path).await {
            Ok(response) => response,
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusMessage::error(format!("Error: {e}"))),
            )
                .into_response(),
        },
        FolderContents::Multiple(files) => Json(FolderListingResponse {
            status: DownloadStatus::Success,
            folder: name,
            files,
        })
        .into_response(),
    }
}

/// Stream `path` with attachment headers
async fn attachment(path: &std::path::Path) -> std::io::Result<Response> {
    let file = tokio::fs::File::open(path).await?;
    let length = file.metadata().await?.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());

    let body = Body::from_stream(ReaderStream::new(file));
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type(path)));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(header::CONTENT_DISPOSITION, content_disposition(&file_name));
    Ok(response)
}

/// `attachment` disposition with an ASCII fallback name and the exact UTF-8 name
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn content_type(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "vtt" => "text/vtt",
        "srt" => "application/x-subrip",
        _ => "application/octet-stream",
    }
}
