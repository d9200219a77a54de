//! Utility functions for file naming and path handling

use crate::platform::Platform;
use chrono::{DateTime, TimeZone};
use std::path::{Component, Path, PathBuf};

/// Captions longer than this are cut and suffixed with `...`
pub const CAPTION_LIMIT: usize = 100;

/// Extensions accepted as folder thumbnails
const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Route prefix for single-file retrieval
pub const FILE_ROUTE_PREFIX: &str = "/download-file";

/// Session folder name `{platform}_{YYYYMMDD_HHMMSS}`
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use social_dl::Platform;
/// use social_dl::utils::session_folder_name;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(session_folder_name(Platform::Tiktok, &at), "tiktok_20240309_070501");
/// ```
#[must_use]
pub fn session_folder_name<Tz: TimeZone>(platform: Platform, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}", platform, at.format("%Y%m%d_%H%M%S"))
}

/// Cut a caption to [`CAPTION_LIMIT`] characters, appending `...` when cut
#[must_use]
pub fn truncate_caption(caption: &str) -> String {
    if caption.chars().count() > CAPTION_LIMIT {
        let mut cut: String = caption.chars().take(CAPTION_LIMIT).collect();
        cut.push_str("...");
        cut
    } else {
        caption.to_string()
    }
}

/// File name without its final extension
#[must_use]
pub fn title_from_file_name(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Whether a file name has the `.mp4` extension (case-insensitive)
#[must_use]
pub fn is_mp4(name: &str) -> bool {
    name.to_lowercase().ends_with(".mp4")
}

/// Whether a file name looks like a folder thumbnail (`thumbnail*.{jpg,jpeg,png,webp}`)
#[must_use]
pub fn is_thumbnail(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with("thumbnail")
        && THUMBNAIL_EXTENSIONS
            .iter()
            .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// Retrieval URL for a file, percent-encoding every path segment
#[must_use]
pub fn file_url(segments: &[&str]) -> String {
    let mut url = String::from(FILE_ROUTE_PREFIX);
    for segment in segments {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    url
}

/// Validate a client-supplied path relative to the download root
///
/// Only plain name components are accepted; `..`, roots, prefixes and empty
/// paths yield `None`. `.` components are dropped.
#[must_use]
pub fn safe_relative_path(raw: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}
