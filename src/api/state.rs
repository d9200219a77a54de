//! Application state for the API server

use crate::{Config, SocialDownloader};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator that classifies, dispatches and indexes downloads
    pub downloader: Arc<SocialDownloader>,

    /// Configuration the downloader was built with
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState sharing the downloader's configuration
    pub fn new(downloader: Arc<SocialDownloader>) -> Self {
        let config = Arc::clone(downloader.config());
        Self { downloader, config }
    }
}
