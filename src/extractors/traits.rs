//! Traits and error types for extraction collaborators

use crate::types::DownloadResult;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Failure inside an extraction collaborator
///
/// These never leave the collaborator boundary: [`Extractor::run`] folds them
/// into an error [`DownloadResult`].
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Required binary is neither configured nor on PATH
    #[error("{tool} is not installed or not on PATH")]
    ToolNotFound {
        /// Binary name (e.g. "yt-dlp")
        tool: &'static str,
    },

    /// Binary exists but could not be started
    #[error("failed to execute {tool}: {source}")]
    Spawn {
        /// Binary name
        tool: &'static str,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Binary ran and exited unsuccessfully
    #[error("{message}")]
    ToolFailed {
        /// Binary name
        tool: &'static str,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Most relevant stderr text
        message: String,
    },

    /// Binary output could not be interpreted
    #[error("unexpected {tool} output: {reason}")]
    InvalidOutput {
        /// Binary name
        tool: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// URL lacks the identifier the collaborator needs
    #[error("could not extract {what} from URL {url}")]
    MissingIdentifier {
        /// Kind of identifier (e.g. "shortcode")
        what: &'static str,
        /// The offending URL
        url: String,
    },

    /// Filesystem error while inspecting written files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Contract every platform downloader satisfies
///
/// A collaborator writes zero or more files into `target_dir` and describes
/// what happened. Implementations return faults as [`ExtractorError`];
/// callers go through [`run`](Extractor::run), which never fails.
///
/// # Examples
///
/// ```no_run
/// use social_dl::extractors::{Extractor, ExtractorProfile, YtDlpExtractor};
/// use social_dl::config::ToolsConfig;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let tools = ToolsConfig::default();
/// let youtube = YtDlpExtractor::from_config(ExtractorProfile::YOUTUBE, &tools);
///
/// let result = youtube
///     .run("https://youtu.be/dQw4w9WgXcQ", Path::new("downloads/youtube_now"))
///     .await;
/// println!("{}", result.message);
/// # }
/// ```
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Download `url` into `target_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing tool is missing, fails, or produces
    /// output that cannot be interpreted.
    async fn download(
        &self,
        url: &str,
        target_dir: &Path,
    ) -> Result<DownloadResult, ExtractorError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Prefix for failure messages, e.g. "YouTube" in "YouTube error: ..."
    fn error_label(&self) -> &'static str;

    /// Download and convert any failure into an error result
    async fn run(&self, url: &str, target_dir: &Path) -> DownloadResult {
        match self.download(url, target_dir).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    extractor = self.name(),
                    url,
                    error = %e,
                    "extraction failed"
                );
                DownloadResult::error(format!("{} error: {}", self.error_label(), e))
            }
        }
    }
}
