//! Shared test helpers for creating SocialDownloader instances in tests.

use crate::config::Config;
use crate::downloader::SocialDownloader;
use crate::extractors::{Extractor, ExtractorError, ExtractorRegistry};
use crate::platform::Platform;
use crate::types::{ContentType, DownloadResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a [`MockExtractor`] does when called
#[derive(Clone, Debug)]
pub(crate) enum MockBehavior {
    /// Write one `.mp4` named after the extractor and succeed
    WriteVideo,
    /// Wait, then write one `.mp4` and succeed
    SlowVideo(Duration),
    /// Fail with the given stderr text
    Fail(String),
}

/// Scripted collaborator that records every call
pub(crate) struct MockExtractor {
    name: &'static str,
    label: &'static str,
    behavior: MockBehavior,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl MockExtractor {
    pub(crate) fn new(name: &'static str, label: &'static str, behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            name,
            label,
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// `(url, target_dir)` of every call so far
    pub(crate) fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn download(
        &self,
        url: &str,
        target_dir: &Path,
    ) -> Result<DownloadResult, ExtractorError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), target_dir.to_path_buf()));

        match &self.behavior {
            MockBehavior::WriteVideo | MockBehavior::SlowVideo(_) => {
                if let MockBehavior::SlowVideo(delay) = &self.behavior {
                    tokio::time::sleep(*delay).await;
                }
                tokio::fs::write(target_dir.join(format!("{}.mp4", self.name)), b"video").await?;
                Ok(DownloadResult::success(format!("{} ok", self.name))
                    .with_title(self.name)
                    .with_content_type(ContentType::Video))
            }
            MockBehavior::Fail(stderr) => Err(ExtractorError::ToolFailed {
                tool: "mock",
                code: Some(1),
                message: stderr.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn error_label(&self) -> &'static str {
        self.label
    }
}

/// Downloader over a temp download root with mock collaborators
///
/// YouTube is bound to a succeeding mock, TikTok to a failing one and the
/// fallback succeeds. Returns the tempdir (which must be kept alive) and
/// the mocks for call inspection.
pub(crate) fn create_test_downloader() -> (
    SocialDownloader,
    tempfile::TempDir,
    Arc<MockExtractor>,
    Arc<MockExtractor>,
) {
    create_test_downloader_with(|_| {})
}

/// [`create_test_downloader`] with a hook to adjust the config first
pub(crate) fn create_test_downloader_with(
    configure: impl FnOnce(&mut Config),
) -> (
    SocialDownloader,
    tempfile::TempDir,
    Arc<MockExtractor>,
    Arc<MockExtractor>,
) {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().join("downloads");
    configure(&mut config);

    let youtube = MockExtractor::new("youtube", "YouTube", MockBehavior::WriteVideo);
    let fallback = MockExtractor::new("generic", "Download", MockBehavior::WriteVideo);
    let tiktok = MockExtractor::new(
        "tiktok",
        "TikTok",
        MockBehavior::Fail("ERROR: Unable to extract video".into()),
    );

    let mut registry = ExtractorRegistry::new(fallback.clone());
    registry.register(Platform::Youtube, youtube.clone());
    registry.register(Platform::Tiktok, tiktok);

    let downloader = SocialDownloader::with_registry(config, registry).unwrap();
    (downloader, temp_dir, youtube, fallback)
}
