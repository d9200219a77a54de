//! Configuration types for social-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf};
use utoipa::ToSchema;

/// Download behavior configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Download root holding one folder per download session (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Honour `output_dir` in `POST /download` bodies (default: false)
    ///
    /// The library API always accepts a custom root; this flag only gates
    /// what remote callers may request.
    #[serde(default)]
    pub allow_custom_output_dir: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            allow_custom_output_dir: false,
        }
    }
}

/// External tool paths (yt-dlp, instaloader)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Path to instaloader executable (auto-detected if None)
    #[serde(default)]
    pub instaloader_path: Option<PathBuf>,

    /// Whether to search PATH for external binaries if explicit paths not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Maximum number of recent posts fetched for an Instagram profile URL (default: 10)
    #[serde(default = "default_instagram_profile_limit")]
    pub instagram_profile_limit: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            instaloader_path: None,
            search_path: true,
            instagram_profile_limit: default_instagram_profile_limit(),
        }
    }
}

/// Main configuration for SocialDownloader
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig) - download root and request policy
/// - [`tools`](ToolsConfig) - external binary paths and fetch limits
/// - [`server`](ServerIntegrationConfig) - REST API settings
///
/// `download` and `tools` are flattened so the JSON file stays flat.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// External tool paths and limits
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }

    /// Load configuration from a JSON file
    ///
    /// Missing keys fall back to their defaults, so an empty object is a
    /// valid file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("invalid config file {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot work at runtime
    pub fn validate(&self) -> Result<()> {
        if self.download.download_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "download directory must not be empty".to_string(),
                key: Some("download_dir".to_string()),
            });
        }
        if self.tools.instagram_profile_limit == 0 {
            return Err(Error::Config {
                message: "instagram profile limit must be at least 1".to_string(),
                key: Some("instagram_profile_limit".to_string()),
            });
        }
        Ok(())
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:5000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Optional API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_key: None,
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_true() -> bool {
    true
}

fn default_instagram_profile_limit() -> usize {
    10
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize failed");

        assert_eq!(config.download_dir(), &PathBuf::from("./downloads"));
        assert!(!config.download.allow_custom_output_dir);
        assert!(config.tools.search_path);
        assert_eq!(config.tools.instagram_profile_limit, 10);
        assert_eq!(config.server.api.bind_address.port(), 5000);
        assert!(config.server.api.api_key.is_none());
        assert_eq!(config.server.api.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn flattened_fields_deserialize_at_top_level() {
        let json = r#"{
            "download_dir": "/srv/media",
            "ytdlp_path": "/opt/bin/yt-dlp",
            "instagram_profile_limit": 3,
            "server": { "api": { "bind_address": "127.0.0.1:8080", "api_key": "k" } }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.download.download_dir, PathBuf::from("/srv/media"));
        assert_eq!(
            config.tools.ytdlp_path.as_deref(),
            Some(Path::new("/opt/bin/yt-dlp"))
        );
        assert_eq!(config.tools.instagram_profile_limit, 3);
        assert_eq!(config.server.api.bind_address.port(), 8080);
        assert_eq!(config.server.api.api_key.as_deref(), Some("k"));
        assert!(config.server.api.swagger_ui, "unset fields keep defaults");
    }

    #[test]
    fn validate_rejects_zero_profile_limit() {
        let mut config = Config::default();
        config.tools.instagram_profile_limit = 0;

        match config.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("instagram_profile_limit"))
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_download_dir() {
        let mut config = Config::default();
        config.download.download_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"download_dir": "media"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.download_dir(), &PathBuf::from("media"));
    }

    #[test]
    fn from_file_reports_missing_file_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
