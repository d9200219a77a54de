//! Session folder creation

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::utils::session_folder_name;
use chrono::{DateTime, TimeZone};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Highest `_N` suffix tried before giving up on a session folder name
pub const MAX_COLLISION_SUFFIX: u32 = 1000;

/// Create a fresh `{platform}_{YYYYMMDD_HHMMSS}` folder under `root`
///
/// The folder is created exclusively. If the name is taken (two requests for
/// the same platform within one second) `_2`, `_3`, ... is appended, so an
/// existing folder is never reused.
pub(crate) async fn create_session_folder<Tz: TimeZone>(
    root: &Path,
    platform: Platform,
    at: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    tokio::fs::create_dir_all(root)
        .await
        .map_err(|source| Error::SessionFolder {
            path: root.to_path_buf(),
            source,
        })?;

    let base = session_folder_name(platform, at);
    let mut candidate = root.join(&base);

    for suffix in 2..=MAX_COLLISION_SUFFIX + 1 {
        match tokio::fs::create_dir(&candidate).await {
            Ok(()) => {
                tracing::debug!(folder = %candidate.display(), "created session folder");
                return Ok(candidate);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(folder = %candidate.display(), "session folder name taken");
                candidate = root.join(format!("{base}_{suffix}"));
            }
            Err(source) => {
                return Err(Error::SessionFolder {
                    path: candidate,
                    source,
                });
            }
        }
    }

    Err(Error::SessionFolder {
        path: root.join(base),
        source: std::io::Error::new(ErrorKind::AlreadyExists, "no free session folder name"),
    })
}
