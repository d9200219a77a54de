//! Single and bulk download dispatch

use super::SocialDownloader;
use super::session::create_session_folder;
use crate::platform::classify;
use crate::types::DownloadResult;
use chrono::Local;
use std::path::Path;
use tracing::{info, warn};

impl SocialDownloader {
    /// Download one URL into a new session folder
    ///
    /// The URL is classified, a `{platform}_{timestamp}` folder is created
    /// under `custom_root` (or the configured download root), and the
    /// registered collaborator runs against it. The returned result always
    /// carries the classified platform. This never fails: collaborator faults
    /// come back as `"<Label> error: ..."` results and orchestration faults
    /// as `"Unexpected error: ..."`.
    ///
    /// Files written before a failure are left in place.
    pub async fn download_content(&self, url: &str, custom_root: Option<&Path>) -> DownloadResult {
        let platform = classify(url);
        let root = custom_root.unwrap_or_else(|| self.config.download_dir().as_path());

        info!(url, %platform, root = %root.display(), "dispatching download");

        let folder = match create_session_folder(root, platform, &Local::now()).await {
            Ok(folder) => folder,
            Err(e) => {
                warn!(url, %platform, error = %e, "could not prepare session folder");
                return DownloadResult::error(format!("Unexpected error: {e}"))
                    .with_platform(platform);
            }
        };

        let extractor = self.registry.get(platform);
        let result = extractor.run(url, &folder).await.with_platform(platform);

        info!(
            url,
            %platform,
            extractor = extractor.name(),
            status = %result.status,
            folder = %folder.display(),
            "download finished"
        );
        result
    }

    /// Download several URLs one after another
    ///
    /// Blank entries are skipped, the rest are trimmed before dispatch and
    /// each result is tagged with the URL string exactly as given. A failing
    /// URL does not stop the batch.
    pub async fn bulk_download(&self, urls: &[String]) -> Vec<DownloadResult> {
        let mut results = Vec::with_capacity(urls.len());

        for url in urls {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                continue;
            }
            let result = self.download_content(trimmed, None).await;
            results.push(result.with_url(url.clone()));
        }

        info!(requested = urls.len(), processed = results.len(), "bulk download finished");
        results
    }
}
