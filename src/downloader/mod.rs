//! Download orchestration split into focused submodules.
//!
//! The `SocialDownloader` struct and its methods are organized by domain:
//! - [`session`] - Exclusive creation of timestamped session folders
//! - [`dispatch`] - Single and bulk download dispatch through the registry

mod dispatch;
mod session;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use session::MAX_COLLISION_SUFFIX;

use crate::config::Config;
use crate::error::Result;
use crate::extractors::ExtractorRegistry;
use crate::index::DownloadIndex;
use std::sync::Arc;

/// Main entry point: classifies URLs, runs collaborators, indexes the output
///
/// Cheap to share behind an `Arc`; holds no mutable state. Every request
/// gets its own session folder, so concurrent downloads never write into the
/// same directory.
#[derive(Debug)]
pub struct SocialDownloader {
    /// Configuration (wrapped in Arc for sharing with the API layer)
    config: Arc<Config>,
    /// Platform to collaborator bindings
    registry: ExtractorRegistry,
    /// Index over the configured download root
    index: DownloadIndex,
}

impl SocialDownloader {
    /// Create a downloader with the standard yt-dlp/instaloader bindings
    ///
    /// Validates the configuration and creates the download root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) for invalid settings
    /// or [`Error::Io`](crate::Error::Io) if the download root cannot be
    /// created.
    pub fn new(config: Config) -> Result<Self> {
        let registry = ExtractorRegistry::from_config(&config);
        Self::with_registry(config, registry)
    }

    /// Create a downloader with custom collaborator bindings
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_registry(config: Config, registry: ExtractorRegistry) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(config.download_dir())?;

        tracing::info!(
            download_dir = %config.download_dir().display(),
            registry = ?registry,
            "downloader ready"
        );

        let index = DownloadIndex::new(config.download_dir().clone());
        Ok(Self {
            config: Arc::new(config),
            registry,
            index,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Index over the configured download root
    pub fn index(&self) -> &DownloadIndex {
        &self.index
    }

    /// Collaborator bindings
    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }
}
