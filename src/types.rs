//! Core types for social-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::platform::Platform;

/// Outcome flag carried by every result body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    /// The request completed
    Success,
    /// The request failed; `message` says why
    Error,
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadStatus::Success => f.write_str("success"),
            DownloadStatus::Error => f.write_str("error"),
        }
    }
}

/// Kind of media a download produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Single video
    Video,
    /// Several entries from one playlist-like URL
    Playlist,
    /// Image post
    Post,
    /// Instagram reel or other single video post
    Reel,
    /// Multi-item post
    Carousel,
    /// Story sequence
    Stories,
    /// Tweet media
    Tweet,
    /// Anything the generic fallback fetched
    Media,
    /// Recent posts from a profile
    Profile,
}

impl ContentType {
    /// Lowercase tag, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Playlist => "playlist",
            ContentType::Post => "post",
            ContentType::Reel => "reel",
            ContentType::Carousel => "carousel",
            ContentType::Stories => "stories",
            ContentType::Tweet => "tweet",
            ContentType::Media => "media",
            ContentType::Profile => "profile",
        }
    }
}

/// Input to a single download
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DownloadRequest {
    /// URL to download
    #[serde(default)]
    pub url: String,

    /// Custom output root replacing the configured download directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub output_dir: Option<PathBuf>,
}

/// Normalized result of one download request
///
/// Built once by a collaborator or the orchestrator; the `with_*` methods are
/// construction helpers that consume the value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DownloadResult {
    /// Whether the download succeeded
    pub status: DownloadStatus,

    /// Human-readable summary
    pub message: String,

    /// Title of the downloaded item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Uploader or channel name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,

    /// Remote thumbnail URL reported by the extractor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Content-type tag
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,

    /// Platform the URL was classified as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// First titles of a playlist-like download
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<Vec<String>>,

    /// Total number of items fetched (playlists, profiles)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Owner account (Instagram)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Caption, truncated to 100 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Extractor autodetected by the generic fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,

    /// Source URL, set in bulk mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DownloadResult {
    fn with_status(status: DownloadStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            title: None,
            uploader: None,
            thumbnail: None,
            content_type: None,
            platform: None,
            titles: None,
            count: None,
            username: None,
            caption: None,
            extractor: None,
            url: None,
        }
    }

    /// Successful result with a message and nothing else
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_status(DownloadStatus::Success, message)
    }

    /// Failed result with a message and nothing else
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status(DownloadStatus::Error, message)
    }

    /// Whether `status` is success
    pub fn is_success(&self) -> bool {
        self.status == DownloadStatus::Success
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the uploader
    pub fn with_uploader(mut self, uploader: impl Into<String>) -> Self {
        self.uploader = Some(uploader.into());
        self
    }

    /// Set the thumbnail URL, if any
    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    /// Set the content-type tag
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Set the platform tag
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the playlist titles and total count
    pub fn with_titles(mut self, titles: Vec<String>, count: usize) -> Self {
        self.titles = Some(titles);
        self.count = Some(count);
        self
    }

    /// Set the item count
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the owner account
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the (already truncated) caption, if any
    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption;
        self
    }

    /// Set the autodetected extractor name
    pub fn with_extractor(mut self, extractor: impl Into<String>) -> Self {
        self.extractor = Some(extractor.into());
        self
    }

    /// Tag the result with its source URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Response body of `POST /bulk-download`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDownloadResponse {
    /// Overall status of the batch request
    pub status: DownloadStatus,

    /// Human-readable summary
    pub message: String,

    /// One result per processed (non-blank) URL, in input order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<DownloadResult>>,
}

impl BulkDownloadResponse {
    /// Successful batch over the given results
    pub fn processed(results: Vec<DownloadResult>) -> Self {
        Self {
            status: DownloadStatus::Success,
            message: format!("Processed {} URLs", results.len()),
            results: Some(results),
        }
    }

    /// Rejected batch
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: DownloadStatus::Error,
            message: message.into(),
            results: None,
        }
    }
}

/// Whether an index entry is a session folder or a loose file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Download session directory
    Folder,
    /// Regular file directly under the download root
    File,
}

/// Read-only listing view over one child of the download root
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IndexEntry {
    /// File or folder name
    pub name: String,

    /// Folder or file
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Number of `.mp4` files (folders only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,

    /// Size in bytes (files only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Retrieval URL of the folder's thumbnail image
    pub thumbnail: Option<String>,

    /// Display title
    pub title: String,
}

/// One retrievable file inside a session folder
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FolderFile {
    /// File name
    pub name: String,
    /// Retrieval URL (`/download-file/{folder}/{file}`)
    pub url: String,
}

/// Media found in a session folder
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FolderContents {
    /// Exactly one `.mp4`; stream it directly
    Single(PathBuf),
    /// Several `.mp4` files with their retrieval URLs
    Multiple(Vec<FolderFile>),
    /// No `.mp4` files
    Empty,
}

/// Static capability manifest served by `GET /supported-platforms`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SupportedPlatforms {
    /// Sites with video download support
    pub video_platforms: Vec<String>,
    /// Sites with post/story support
    pub social_platforms: Vec<String>,
    /// Service features
    pub features: Vec<String>,
}

impl SupportedPlatforms {
    /// The manifest advertised to clients
    pub fn manifest() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            video_platforms: owned(&[
                "YouTube (videos, shorts, playlists)",
                "TikTok",
                "Twitter/X",
                "Facebook",
                "Instagram (Reels, IGTV)",
                "Reddit",
                "Twitch",
                "Vimeo",
                "Dailymotion",
            ]),
            social_platforms: owned(&[
                "Instagram (Posts, Stories, Reels, IGTV)",
                "Twitter/X (Tweets, Threads)",
                "Facebook (Posts, Videos)",
                "Reddit (Posts, Images, Videos)",
                "LinkedIn (Posts)",
                "Pinterest (Pins)",
            ]),
            features: owned(&[
                "Auto-platform detection",
                "Bulk downloads",
                "Stories download",
                "Playlist support",
                "High quality downloads",
                "Metadata preservation",
                "Subtitle downloads",
            ]),
        }
    }
}
