//! Extraction collaborators
//!
//! Each supported platform is served by an [`Extractor`]: yt-dlp for video
//! sites, instaloader for Instagram. The [`ExtractorRegistry`] decides which
//! one handles a classified URL.

pub mod instagram;
pub mod registry;
pub mod tool;
pub mod traits;
pub mod ytdlp;

pub use instagram::{InstagramExtractor, InstagramTarget, PostMetadata};
pub use registry::ExtractorRegistry;
pub use tool::ToolBinary;
pub use traits::{Extractor, ExtractorError};
pub use ytdlp::{ExtractorProfile, YtDlpExtractor};
