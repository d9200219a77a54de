//! Error types for social-dl
//!
//! This module provides the crate-wide [`Error`] type for the orchestrator,
//! the download index and the API server, plus the [`ApiError`] body that
//! middleware answers with.
//!
//! Faults raised inside an extraction collaborator use
//! [`ExtractorError`](crate::extractors::ExtractorError) instead and never
//! reach this type; they are folded into a `DownloadResult` at the
//! collaborator boundary.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for social-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for social-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested file or folder does not exist under the download root
    #[error("not found: {0}")]
    NotFound(String),

    /// Session folder could not be created
    #[error("failed to create session folder {path}: {source}")]
    SessionFolder {
        /// The folder that could not be created
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Bulk clear removed only part of the download root
    #[error("{failed} entries could not be removed from {root}")]
    PartialClear {
        /// The download root that was being cleared
        root: PathBuf,
        /// Number of entries that survived deletion
        failed: usize,
    },

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// API error response format
///
/// Returned by middleware that rejects a request before it reaches a route;
/// the routes themselves answer with their flat `{status, message}` shapes.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "unauthorized",
///     "message": "Invalid API key"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "unauthorized")
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// Create an "unauthorized" error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }
}
