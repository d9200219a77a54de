//! # social-dl
//!
//! Web-facing dispatcher for social media downloads.
//!
//! A URL is classified into a [`Platform`], handed to the extraction
//! collaborator registered for that platform (yt-dlp or instaloader, driven as
//! subprocesses), and the files land in a fresh timestamped session folder
//! under the download root. The [`DownloadIndex`] later lists, serves and
//! clears that tree.
//!
//! ## Quick Start
//!
//! ```no_run
//! use social_dl::{Config, SocialDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = SocialDownloader::new(Config::default())?;
//!
//!     let result = downloader
//!         .download_content("https://youtu.be/dQw4w9WgXcQ", None)
//!         .await;
//!     println!("{}: {}", result.status, result.message);
//!
//!     for entry in downloader.index().list().await? {
//!         println!("{} ({:?})", entry.title, entry.kind);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Extraction collaborators (yt-dlp, instaloader)
pub mod extractors;
/// Filesystem index over downloaded content
pub mod index;
/// URL to platform classification
pub mod platform;
/// Core result and listing types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use downloader::SocialDownloader;
pub use error::{ApiError, Error, ErrorDetail, Result};
pub use extractors::{Extractor, ExtractorError, ExtractorRegistry};
pub use index::DownloadIndex;
pub use platform::{Platform, classify};
pub use types::{
    BulkDownloadResponse, ContentType, DownloadRequest, DownloadResult, DownloadStatus,
    EntryKind, FolderContents, FolderFile, IndexEntry, SupportedPlatforms,
};

/// Serve the API until a termination signal arrives.
///
/// Builds the router from the downloader's configuration and shuts the
/// listener down gracefully on SIGTERM/SIGINT (Ctrl+C on other platforms).
///
/// # Example
///
/// ```no_run
/// use social_dl::{Config, SocialDownloader, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = Arc::new(SocialDownloader::new(Config::default())?);
///     run_with_shutdown(downloader).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: std::sync::Arc<SocialDownloader>) -> Result<()> {
    api::start_api_server_with_shutdown(downloader, wait_for_signal()).await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration can fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
