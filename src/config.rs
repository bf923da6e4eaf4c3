// ABOUTME: Configuration module for the deckgen application
// ABOUTME: Provides configuration settings and environment variable handling

use std::env;
use std::path::PathBuf;

/// English Metric Units per inch, the unit of every OOXML offset and extent.
pub const EMU_PER_INCH: i64 = 914_400;

const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_JPEG_QUALITY: u8 = 85;
const DEFAULT_USER_AGENT: &str = concat!("deckgen/", env!("CARGO_PKG_VERSION"));

/// Where an illustration lands on a content slide.
///
/// Only the height is fixed; the width follows from the image's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PicturePlacement {
    pub left: i64,
    pub top: i64,
    pub height: i64,
}

impl Default for PicturePlacement {
    fn default() -> Self {
        Self {
            left: 6 * EMU_PER_INCH,
            top: EMU_PER_INCH * 12 / 10,
            height: EMU_PER_INCH * 35 / 10,
        }
    }
}

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub image_timeout_ms: u64,
    pub jpeg_quality: u8,
    pub user_agent: String,
    pub deck_path: Option<PathBuf>,
    pub body_font_size_pt: u32,
    pub picture: PicturePlacement,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_timeout_ms: DEFAULT_TIMEOUT_MS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            deck_path: None,
            body_font_size_pt: 18,
            picture: PicturePlacement::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let image_timeout_ms = env::var("DECK_IMAGE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.image_timeout_ms);
        let jpeg_quality = env::var("DECK_JPEG_QUALITY")
            .ok()
            .and_then(|s| s.parse::<u8>().ok())
            .filter(|q| (1..=100).contains(q))
            .unwrap_or(defaults.jpeg_quality);
        let user_agent = env::var("DECK_USER_AGENT").unwrap_or(defaults.user_agent);
        let deck_path = env::var("DECK_CONTENT_PATH").ok().map(PathBuf::from);

        Self {
            image_timeout_ms,
            jpeg_quality,
            user_agent,
            deck_path,
            ..defaults
        }
    }

    /// Body text size in hundredths of a point, as OOXML run properties expect it.
    pub fn body_font_size(&self) -> u32 {
        self.body_font_size_pt * 100
    }
}
