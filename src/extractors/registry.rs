//! Platform to collaborator bindings

use super::instagram::InstagramExtractor;
use super::traits::Extractor;
use super::ytdlp::{ExtractorProfile, YtDlpExtractor};
use crate::config::Config;
use crate::platform::Platform;
use std::collections::HashMap;
use std::sync::Arc;

/// Explicit map from platform to collaborator
///
/// Platforms without a binding (pinterest, linkedin, snapchat, twitch,
/// unknown) resolve to the fallback.
#[derive(Clone)]
pub struct ExtractorRegistry {
    bindings: HashMap<Platform, Arc<dyn Extractor>>,
    fallback: Arc<dyn Extractor>,
}

impl ExtractorRegistry {
    /// Registry with no bindings, sending everything to `fallback`
    pub fn new(fallback: Arc<dyn Extractor>) -> Self {
        Self {
            bindings: HashMap::new(),
            fallback,
        }
    }

    /// Standard bindings backed by yt-dlp and instaloader
    pub fn from_config(config: &Config) -> Self {
        let tools = &config.tools;
        let ytdlp = |profile| -> Arc<dyn Extractor> {
            Arc::new(YtDlpExtractor::from_config(profile, tools))
        };

        let mut registry = Self::new(ytdlp(ExtractorProfile::GENERIC));
        registry.register(Platform::Youtube, ytdlp(ExtractorProfile::YOUTUBE));
        registry.register(Platform::Tiktok, ytdlp(ExtractorProfile::TIKTOK));
        registry.register(Platform::Twitter, ytdlp(ExtractorProfile::TWITTER));
        registry.register(Platform::Facebook, ytdlp(ExtractorProfile::FACEBOOK));
        registry.register(Platform::Reddit, ytdlp(ExtractorProfile::REDDIT));
        registry.register(
            Platform::Instagram,
            Arc::new(InstagramExtractor::from_config(tools)),
        );
        registry
    }

    /// Bind `platform` to `extractor`, replacing any previous binding
    pub fn register(&mut self, platform: Platform, extractor: Arc<dyn Extractor>) {
        self.bindings.insert(platform, extractor);
    }

    /// Collaborator for `platform`, or the fallback
    pub fn get(&self, platform: Platform) -> Arc<dyn Extractor> {
        self.bindings
            .get(&platform)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    /// Whether `platform` has its own binding
    pub fn is_bound(&self, platform: Platform) -> bool {
        self.bindings.contains_key(&platform)
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bound: Vec<_> = self
            .bindings
            .iter()
            .map(|(platform, extractor)| (platform.as_str(), extractor.name()))
            .collect();
        bound.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("bindings", &bound)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
