//! instaloader backed Instagram collaborator
//!
//! Routing is by URL shape: stories, a single post (`/p/`, `/reel/`, `/tv/`)
//! or a profile's most recent posts. Details about a single post are read
//! back from the metadata JSON instaloader writes next to the media.

use super::tool::ToolBinary;
use super::traits::{Extractor, ExtractorError};
use crate::config::ToolsConfig;
use crate::types::{ContentType, DownloadResult};
use crate::utils::truncate_caption;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::ffi::OsString;
use std::path::Path;
use std::sync::LazyLock;

const TOOL: &str = "instaloader";

/// Filename pattern handed to instaloader for every download
pub const FILENAME_PATTERN: &str = "{profile}{mediaid}{date_utc}";

#[allow(clippy::expect_used)]
static SHORTCODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:p|reel|tv)/([^/?#]+)").expect("shortcode regex is valid")
});

#[allow(clippy::expect_used)]
static STORIES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)instagram\.com/stories/([^/?#]+)").expect("stories regex is valid")
});

#[allow(clippy::expect_used)]
static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)instagram\.com/([^/?#]+)").expect("username regex is valid")
});

/// What an Instagram URL points at
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstagramTarget {
    /// Current stories of an account
    Stories {
        /// Account name
        username: String,
    },
    /// A single post, reel or IGTV video
    Post {
        /// Post shortcode
        shortcode: String,
    },
    /// Recent posts of an account
    Profile {
        /// Account name
        username: String,
    },
}

impl InstagramTarget {
    /// Route an Instagram URL
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::MissingIdentifier`] if the URL has the right
    /// shape but no username or shortcode can be read from it.
    pub fn parse(url: &str) -> Result<Self, ExtractorError> {
        if url.contains("/stories/") {
            let username = capture(&STORIES_PATTERN, url).ok_or_else(|| {
                ExtractorError::MissingIdentifier {
                    what: "username",
                    url: url.to_string(),
                }
            })?;
            return Ok(Self::Stories { username });
        }

        if url.contains("/reel/") || url.contains("/p/") || url.contains("/tv/") {
            let shortcode = capture(&SHORTCODE_PATTERN, url).ok_or_else(|| {
                ExtractorError::MissingIdentifier {
                    what: "shortcode",
                    url: url.to_string(),
                }
            })?;
            return Ok(Self::Post { shortcode });
        }

        let username =
            capture(&USERNAME_PATTERN, url).ok_or_else(|| ExtractorError::MissingIdentifier {
                what: "username",
                url: url.to_string(),
            })?;
        Ok(Self::Profile { username })
    }
}

fn capture(pattern: &Regex, url: &str) -> Option<String> {
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// Post details read from an instaloader metadata file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostMetadata {
    /// Post shortcode
    pub shortcode: Option<String>,
    /// GraphQL typename (`GraphImage`, `GraphVideo`, `GraphSidecar`)
    pub typename: Option<String>,
    /// Whether the post is a video
    pub is_video: bool,
    /// Owner account
    pub owner_username: Option<String>,
    /// Full caption text
    pub caption: Option<String>,
}

impl PostMetadata {
    /// Parse a metadata document, returning `None` unless it describes a post
    pub fn from_json(doc: &Value) -> Option<Self> {
        let node_type = doc.pointer("/instaloader/node_type").and_then(Value::as_str);
        if node_type.is_some_and(|t| t != "Post") {
            return None;
        }
        let node = doc.get("node")?;

        Some(Self {
            shortcode: str_at(node, "/shortcode"),
            typename: str_at(node, "/__typename"),
            is_video: node.get("is_video").and_then(Value::as_bool).unwrap_or(false),
            owner_username: str_at(node, "/owner/username"),
            caption: str_at(node, "/edge_media_to_caption/edges/0/node/text"),
        })
    }

    /// Content-type tag: carousel for sidecars, reel for videos, post otherwise
    pub fn content_type(&self) -> ContentType {
        if self
            .typename
            .as_deref()
            .is_some_and(|t| t.ends_with("Sidecar"))
        {
            ContentType::Carousel
        } else if self.is_video {
            ContentType::Reel
        } else {
            ContentType::Post
        }
    }
}

fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).map(str::to_string)
}

/// Read every post metadata file instaloader left in `dir`
async fn read_post_metadata(dir: &Path) -> Result<Vec<PostMetadata>, ExtractorError> {
    let mut posts = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read instaloader metadata");
                continue;
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(doc) => posts.extend(PostMetadata::from_json(&doc)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unparseable instaloader metadata");
            }
        }
    }

    Ok(posts)
}

/// Collaborator that downloads Instagram content through instaloader
pub struct InstagramExtractor {
    tool: ToolBinary,
    profile_limit: usize,
}

impl InstagramExtractor {
    /// Create an extractor over an already resolved binary
    pub fn new(tool: ToolBinary, profile_limit: usize) -> Self {
        Self {
            tool,
            profile_limit,
        }
    }

    /// Create an extractor, resolving instaloader from configuration or PATH
    pub fn from_config(tools: &ToolsConfig) -> Self {
        let tool = ToolBinary::resolve(TOOL, tools.instaloader_path.as_deref(), tools.search_path);
        Self::new(tool, tools.instagram_profile_limit)
    }

    /// Command-line arguments for fetching `target` into `dir`
    pub fn args(&self, target: &InstagramTarget, dir: &Path) -> Vec<OsString> {
        let mut dirname = OsString::from("--dirname-pattern=");
        dirname.push(dir.as_os_str());

        let mut args: Vec<OsString> = vec![
            "--quiet".into(),
            dirname,
            format!("--filename-pattern={FILENAME_PATTERN}").into(),
            "--no-video-thumbnails".into(),
            "--no-geotags".into(),
            "--no-compress-json".into(),
            "--no-profile-pic".into(),
        ];

        match target {
            InstagramTarget::Stories { username } => {
                args.push("--stories".into());
                args.push("--no-posts".into());
                args.push("--".into());
                args.push(username.into());
            }
            InstagramTarget::Post { shortcode } => {
                args.push("--".into());
                args.push(format!("-{shortcode}").into());
            }
            InstagramTarget::Profile { username } => {
                args.push("--count".into());
                args.push(self.profile_limit.to_string().into());
                args.push("--".into());
                args.push(username.into());
            }
        }
        args
    }

    async fn fetch_post(
        &self,
        shortcode: &str,
        dir: &Path,
    ) -> Result<DownloadResult, ExtractorError> {
        let posts = read_post_metadata(dir).await?;
        let post = posts
            .iter()
            .find(|p| p.shortcode.as_deref() == Some(shortcode))
            .or_else(|| posts.first())
            .ok_or_else(|| ExtractorError::InvalidOutput {
                tool: TOOL,
                reason: format!("no metadata written for post {shortcode}"),
            })?;

        let content_type = post.content_type();
        let mut result = DownloadResult::success(format!(
            "Instagram {} downloaded successfully!",
            content_type.as_str()
        ))
        .with_content_type(content_type)
        .with_caption(post.caption.as_deref().map(truncate_caption));

        if let Some(username) = &post.owner_username {
            result = result.with_username(username.clone());
        }
        Ok(result)
    }
}

#[async_trait]
impl Extractor for InstagramExtractor {
    async fn download(
        &self,
        url: &str,
        target_dir: &Path,
    ) -> Result<DownloadResult, ExtractorError> {
        let target = InstagramTarget::parse(url)?;
        tracing::info!(url, target = ?target, dir = %target_dir.display(), "starting instaloader download");

        self.tool.run(self.args(&target, target_dir)).await?;

        let result = match &target {
            InstagramTarget::Stories { username } => {
                DownloadResult::success(format!("Instagram stories downloaded for {username}"))
                    .with_content_type(ContentType::Stories)
            }
            InstagramTarget::Post { shortcode } => self.fetch_post(shortcode, target_dir).await?,
            InstagramTarget::Profile { username } => {
                let count = read_post_metadata(target_dir)
                    .await?
                    .len()
                    .min(self.profile_limit);
                DownloadResult::success(format!("Downloaded {count} recent posts from {username}"))
                    .with_content_type(ContentType::Profile)
                    .with_count(count)
            }
        };

        tracing::info!(url, status = %result.status, "instaloader download finished");
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "instagram"
    }

    fn error_label(&self) -> &'static str {
        "Instagram"
    }
}
