//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - `downloads` - Single and bulk download requests, listing, clearing
//! - `files` - File and folder retrieval
//! - `system` - Health, supported platforms, OpenAPI
//!
//! Download-facing routes keep the flat `{status, message}` response shapes
//! that existing front ends parse; only middleware failures use
//! [`ApiError`](crate::error::ApiError).

use crate::types::{DownloadStatus, FolderFile, IndexEntry};
use serde::{Deserialize, Serialize};

mod downloads;
mod files;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use downloads::*;
pub use files::*;
pub use system::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /bulk-download
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BulkDownloadRequest {
    /// URLs to download in order; blank entries are skipped
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Response body for GET /downloads
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ListingResponse {
    /// One entry per child of the download root
    pub items: Vec<IndexEntry>,
}

/// Flat `{status, message}` body used by several routes
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusMessage {
    /// Outcome
    pub status: DownloadStatus,
    /// Human-readable summary
    pub message: String,
}

impl StatusMessage {
    /// Successful outcome
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: DownloadStatus::Success,
            message: message.into(),
        }
    }

    /// Failed outcome
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: DownloadStatus::Error,
            message: message.into(),
        }
    }
}

/// Response body for GET /download-folder/:name with several videos
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FolderListingResponse {
    /// Always success
    pub status: DownloadStatus,
    /// Folder name as requested
    pub folder: String,
    /// Videos with their retrieval URLs
    pub files: Vec<FolderFile>,
}

/// Flat `{error}` body used by the listing and file routes
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ErrorMessage {
    /// What went wrong
    pub error: String,
}

impl ErrorMessage {
    /// Wrap a message
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
