//! Server entry point for social-dl.

use clap::Parser;
use social_dl::{Config, Result, SocialDownloader, run_with_shutdown};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Serve the social-dl download API
#[derive(Debug, Parser)]
#[command(name = "social-dl", version, about)]
struct Args {
    /// JSON configuration file; missing keys fall back to defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the config file
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Download root, overriding the config file
    #[arg(short, long)]
    download_dir: Option<PathBuf>,

    /// Path to the yt-dlp executable
    #[arg(long)]
    ytdlp: Option<PathBuf>,

    /// Path to the instaloader executable
    #[arg(long)]
    instaloader: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(bind) = self.bind {
            config.server.api.bind_address = bind;
        }
        if let Some(dir) = self.download_dir {
            config.download.download_dir = dir;
        }
        if let Some(path) = self.ytdlp {
            config.tools.ytdlp_path = Some(path);
        }
        if let Some(path) = self.instaloader {
            config.tools.instaloader_path = Some(path);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse before tracing so --help prints without log noise
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("social_dl=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let config = args.into_config()?;
    let downloader = Arc::new(SocialDownloader::new(config)?);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        download_dir = %downloader.config().download_dir().display(),
        address = %downloader.config().server.api.bind_address,
        "social-dl starting"
    );

    run_with_shutdown(downloader).await
}
