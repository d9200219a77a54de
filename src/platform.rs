//! URL to platform classification

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Social or media site a URL belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// youtube.com, youtu.be
    Youtube,
    /// instagram.com
    Instagram,
    /// facebook.com, fb.watch
    Facebook,
    /// twitter.com, x.com
    Twitter,
    /// tiktok.com
    Tiktok,
    /// pinterest.com
    Pinterest,
    /// linkedin.com
    Linkedin,
    /// snapchat.com
    Snapchat,
    /// reddit.com
    Reddit,
    /// twitch.tv
    Twitch,
    /// Nothing matched
    Unknown,
}

/// Domain substrings in match order; first hit wins.
const DOMAIN_TABLE: &[(&str, Platform)] = &[
    ("youtube.com", Platform::Youtube),
    ("youtu.be", Platform::Youtube),
    ("instagram.com", Platform::Instagram),
    ("facebook.com", Platform::Facebook),
    ("fb.watch", Platform::Facebook),
    ("twitter.com", Platform::Twitter),
    ("x.com", Platform::Twitter),
    ("tiktok.com", Platform::Tiktok),
    ("pinterest.com", Platform::Pinterest),
    ("linkedin.com", Platform::Linkedin),
    ("snapchat.com", Platform::Snapchat),
    ("reddit.com", Platform::Reddit),
    ("twitch.tv", Platform::Twitch),
];

impl Platform {
    /// Every tag, `Unknown` last
    pub const ALL: [Platform; 11] = [
        Platform::Youtube,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Twitter,
        Platform::Tiktok,
        Platform::Pinterest,
        Platform::Linkedin,
        Platform::Snapchat,
        Platform::Reddit,
        Platform::Twitch,
        Platform::Unknown,
    ];

    /// Lowercase tag used in folder names and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
            Platform::Pinterest => "pinterest",
            Platform::Linkedin => "linkedin",
            Platform::Snapchat => "snapchat",
            Platform::Reddit => "reddit",
            Platform::Twitch => "twitch",
            Platform::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw URL by case-insensitive domain substring.
///
/// Never fails: anything unrecognised is [`Platform::Unknown`].
///
/// ```
/// use social_dl::{Platform, classify};
///
/// assert_eq!(classify("https://YOUTU.BE/abc"), Platform::Youtube);
/// assert_eq!(classify("https://example.org/video"), Platform::Unknown);
/// ```
#[must_use]
pub fn classify(url: &str) -> Platform {
    let url = url.to_lowercase();
    DOMAIN_TABLE
        .iter()
        .find(|(domain, _)| url.contains(domain))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_maps_to_its_platform() {
        let cases = [
            ("https://www.youtube.com/watch?v=abc", Platform::Youtube),
            ("https://youtu.be/abc", Platform::Youtube),
            ("https://www.instagram.com/p/XYZ/", Platform::Instagram),
            ("https://www.facebook.com/watch/?v=1", Platform::Facebook),
            ("https://fb.watch/abc/", Platform::Facebook),
            ("https://twitter.com/user/status/1", Platform::Twitter),
            ("https://x.com/user/status/1", Platform::Twitter),
            ("https://www.tiktok.com/@user/video/1", Platform::Tiktok),
            ("https://www.pinterest.com/pin/1/", Platform::Pinterest),
            ("https://www.linkedin.com/posts/abc", Platform::Linkedin),
            ("https://www.snapchat.com/spotlight/abc", Platform::Snapchat),
            ("https://www.reddit.com/r/rust/comments/1/", Platform::Reddit),
            ("https://www.twitch.tv/videos/1", Platform::Twitch),
        ];

        for (url, expected) in cases {
            assert_eq!(classify(url), expected, "{url}");
        }
    }

    #[test]
    fn unmatched_urls_are_unknown() {
        assert_eq!(classify("https://vimeo.com/123"), Platform::Unknown);
        assert_eq!(classify(""), Platform::Unknown);
        assert_eq!(classify("not a url at all"), Platform::Unknown);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(classify("HTTPS://WWW.YOUTUBE.COM/WATCH"), Platform::Youtube);
        assert_eq!(classify("https://Instagram.Com/someone"), Platform::Instagram);
    }

    #[test]
    fn classification_is_deterministic() {
        let url = "https://www.reddit.com/r/videos/comments/abc/";
        assert_eq!(classify(url), classify(url));
    }

    #[test]
    fn tags_round_trip_through_serde() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
        }
    }
}
