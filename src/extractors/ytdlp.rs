//! yt-dlp backed collaborator
//!
//! One [`YtDlpExtractor`] type serves every yt-dlp platform; what differs per
//! platform (format selector, filename template, defaults, reported fields)
//! lives in an [`ExtractorProfile`].

use super::tool::ToolBinary;
use super::traits::{Extractor, ExtractorError};
use crate::config::ToolsConfig;
use crate::types::{ContentType, DownloadResult};
use async_trait::async_trait;
use serde_json::Value;
use std::ffi::OsString;
use std::path::Path;

/// Number of playlist titles echoed back in a result
pub const PLAYLIST_TITLE_LIMIT: usize = 5;

const TOOL: &str = "yt-dlp";

/// Per-platform yt-dlp options and result shaping
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractorProfile {
    /// Name used in logs
    pub name: &'static str,
    /// Failure message prefix
    pub label: &'static str,
    /// `-f` format selector; `None` leaves yt-dlp's default
    pub format: Option<&'static str>,
    /// Filename template relative to the session folder
    pub output_template: &'static str,
    /// Merge separate streams into an mp4 container
    pub merge_mp4: bool,
    /// Also fetch subtitles
    pub write_subtitles: bool,
    /// Title reported when the extractor has none
    pub default_title: &'static str,
    /// Content-type tag for single items
    pub content_type: ContentType,
    /// Success message for single items
    pub success_message: &'static str,
    /// Report `uploader` (defaulting to "Unknown")
    pub report_uploader: bool,
    /// Report the remote thumbnail URL
    pub report_thumbnail: bool,
    /// Report the autodetected extractor (defaulting to "Unknown")
    pub report_extractor: bool,
}

impl ExtractorProfile {
    /// YouTube videos, shorts and playlists, capped at 1080p
    pub const YOUTUBE: Self = Self {
        name: "youtube",
        label: "YouTube",
        format: Some("bestvideo[height<=1080]+bestaudio/best"),
        output_template: "%(title)s.%(ext)s",
        merge_mp4: true,
        write_subtitles: false,
        default_title: "Unknown",
        content_type: ContentType::Video,
        success_message: "YouTube content downloaded successfully!",
        report_uploader: true,
        report_thumbnail: true,
        report_extractor: false,
    };

    /// TikTok videos
    pub const TIKTOK: Self = Self {
        name: "tiktok",
        label: "TikTok",
        format: Some("best"),
        output_template: "TikTok_%(uploader)s_%(title)s.%(ext)s",
        merge_mp4: false,
        write_subtitles: false,
        default_title: "TikTok Video",
        content_type: ContentType::Video,
        success_message: "TikTok video downloaded successfully!",
        report_uploader: true,
        report_thumbnail: false,
        report_extractor: false,
    };

    /// Twitter/X videos and images
    pub const TWITTER: Self = Self {
        name: "twitter",
        label: "Twitter",
        format: None,
        output_template: "Twitter_%(uploader)s_%(title)s.%(ext)s",
        merge_mp4: false,
        write_subtitles: true,
        default_title: "Twitter Content",
        content_type: ContentType::Tweet,
        success_message: "Twitter content downloaded successfully!",
        report_uploader: true,
        report_thumbnail: false,
        report_extractor: false,
    };

    /// Facebook videos and posts
    pub const FACEBOOK: Self = Self {
        name: "facebook",
        label: "Facebook",
        format: Some("best"),
        output_template: "Facebook_%(title)s.%(ext)s",
        merge_mp4: false,
        write_subtitles: false,
        default_title: "Facebook Content",
        content_type: ContentType::Video,
        success_message: "Facebook content downloaded successfully!",
        report_uploader: false,
        report_thumbnail: false,
        report_extractor: false,
    };

    /// Reddit videos, images and gifs
    pub const REDDIT: Self = Self {
        name: "reddit",
        label: "Reddit",
        format: None,
        output_template: "Reddit_%(title)s.%(ext)s",
        merge_mp4: false,
        write_subtitles: false,
        default_title: "Reddit Post",
        content_type: ContentType::Post,
        success_message: "Reddit content downloaded successfully!",
        report_uploader: false,
        report_thumbnail: false,
        report_extractor: false,
    };

    /// Anything else yt-dlp recognises
    pub const GENERIC: Self = Self {
        name: "generic",
        label: "Download",
        format: Some("best"),
        output_template: "%(extractor)s_%(title)s.%(ext)s",
        merge_mp4: false,
        write_subtitles: false,
        default_title: "Unknown",
        content_type: ContentType::Media,
        success_message: "Content downloaded successfully!",
        report_uploader: false,
        report_thumbnail: false,
        report_extractor: true,
    };

    /// Command-line arguments for downloading `url` into `target_dir`
    ///
    /// yt-dlp downloads and then prints the info JSON of the whole URL
    /// (playlist included) on stdout.
    pub fn args(&self, url: &str, target_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--dump-single-json".into(),
            "--no-simulate".into(),
            "--no-progress".into(),
            "-o".into(),
            target_dir.join(self.output_template).into_os_string(),
        ];

        if let Some(format) = self.format {
            args.push("-f".into());
            args.push(format.into());
        }
        if self.merge_mp4 {
            args.push("--merge-output-format".into());
            args.push("mp4".into());
        }
        if self.write_subtitles {
            args.push("--write-subs".into());
        }

        args.push("--".into());
        args.push(url.into());
        args
    }

    /// Turn yt-dlp's info JSON into a result
    pub fn shape_result(&self, info: &Value) -> DownloadResult {
        let Some(fields) = info.as_object().filter(|map| !map.is_empty()) else {
            return DownloadResult::error("No information extracted from the URL");
        };

        if let Some(entries) = fields.get("entries").and_then(Value::as_array) {
            let titles: Vec<String> = entries
                .iter()
                .filter(|entry| !entry.is_null())
                .map(|entry| string_field(entry, "title").unwrap_or_else(|| "Unknown".to_string()))
                .collect();
            let count = titles.len();

            return DownloadResult::success(format!("Downloaded {count} videos from playlist"))
                .with_titles(
                    titles.into_iter().take(PLAYLIST_TITLE_LIMIT).collect(),
                    count,
                )
                .with_content_type(ContentType::Playlist);
        }

        let mut result = DownloadResult::success(self.success_message)
            .with_title(string_field(info, "title").unwrap_or_else(|| self.default_title.to_string()))
            .with_content_type(self.content_type);

        if self.report_uploader {
            result = result
                .with_uploader(string_field(info, "uploader").unwrap_or_else(|| "Unknown".to_string()));
        }
        if self.report_thumbnail {
            result = result.with_thumbnail(string_field(info, "thumbnail"));
        }
        if self.report_extractor {
            result = result
                .with_extractor(string_field(info, "extractor").unwrap_or_else(|| "Unknown".to_string()));
        }
        result
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Collaborator that downloads through yt-dlp
pub struct YtDlpExtractor {
    profile: ExtractorProfile,
    tool: ToolBinary,
}

impl YtDlpExtractor {
    /// Create an extractor over an already resolved binary
    pub fn new(profile: ExtractorProfile, tool: ToolBinary) -> Self {
        Self { profile, tool }
    }

    /// Create an extractor, resolving yt-dlp from configuration or PATH
    pub fn from_config(profile: ExtractorProfile, tools: &ToolsConfig) -> Self {
        let tool = ToolBinary::resolve(TOOL, tools.ytdlp_path.as_deref(), tools.search_path);
        Self::new(profile, tool)
    }

    /// Profile this extractor runs with
    pub fn profile(&self) -> &ExtractorProfile {
        &self.profile
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    async fn download(
        &self,
        url: &str,
        target_dir: &Path,
    ) -> Result<DownloadResult, ExtractorError> {
        tracing::info!(extractor = self.profile.name, url, dir = %target_dir.display(), "starting yt-dlp download");

        let stdout = self.tool.run(self.profile.args(url, target_dir)).await?;

        let text = String::from_utf8_lossy(&stdout);
        let text = text.trim();
        if text.is_empty() {
            return Ok(self.profile.shape_result(&Value::Null));
        }

        let info: Value = serde_json::from_str(text).map_err(|e| ExtractorError::InvalidOutput {
            tool: TOOL,
            reason: format!("invalid JSON: {e}"),
        })?;

        let result = self.profile.shape_result(&info);
        tracing::info!(extractor = self.profile.name, url, status = %result.status, "yt-dlp download finished");
        Ok(result)
    }

    fn name(&self) -> &'static str {
        self.profile.name
    }

    fn error_label(&self) -> &'static str {
        self.profile.label
    }
}
