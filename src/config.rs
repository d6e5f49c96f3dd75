//! Configuration for the marquee and the icon resolver.
//!
//! Every struct deserializes from JSON with missing fields falling back to
//! the portfolio site's defaults, so a settings file only needs the
//! values it changes.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{Direction, Rgba};

/// Technologies shown when the caller does not supply a list.
pub const DEFAULT_TECHNOLOGIES: &[&str] = &[
    "Python",
    "FastAPI",
    "Java",
    "C",
    "React",
    "TailwindCSS",
    "Git",
    "Convex",
    "Clerk",
    "AWS",
    "MySQL",
    "Bash",
];

/// Public curated icon index.
pub const DEFAULT_INDEX_URL: &str = "https://api.svgl.app";

/// Slug-based icon CDN.
pub const DEFAULT_CDN_BASE: &str = "https://cdn.simpleicons.org";

pub const ENV_INDEX_URL: &str = "SKILL_MARQUEE_INDEX_URL";
pub const ENV_CDN_BASE: &str = "SKILL_MARQUEE_CDN_BASE";
pub const ENV_TIMEOUT_SECS: &str = "SKILL_MARQUEE_TIMEOUT_SECS";

// =============================================================================
// STYLE
// =============================================================================

/// Colors used when painting the track.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarqueeStyle {
    /// Label color.
    pub label: Rgba,
    /// Glyph color once an icon has loaded.
    pub icon: Rgba,
    /// Glyph color while the current candidate is still loading.
    pub icon_pending: Rgba,
    /// Row background; also the color the side gradients fade into.
    pub background: Rgba,
}

impl Default for MarqueeStyle {
    fn default() -> Self {
        Self {
            label: Rgba::WHITE,
            icon: Rgba::rgb(153, 153, 153),
            icon_pending: Rgba::rgb(64, 64, 70),
            background: Rgba::SITE_BACKGROUND,
        }
    }
}

// =============================================================================
// MARQUEE CONFIG
// =============================================================================

/// Options recognized by the marquee component.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Display names, in track order.
    pub technologies: Vec<String>,
    /// Cells moved per frame while auto-scrolling.
    pub speed: f32,
    /// Width in cells of each side fade.
    pub gradient_width: u16,
    /// Initial auto-scroll direction.
    pub direction: Direction,
    /// Whether pointer drag is enabled.
    pub interactive: bool,
    /// Frame rate of the auto-scroll clock.
    pub fps: u8,
    /// Blank cells on each side of an item.
    pub item_margin: u16,
    /// Suspend auto-scroll while the pointer hovers the track.
    pub pause_on_hover: bool,
    /// Never auto-scroll; drag still works when interactive.
    pub reduced_motion: bool,
    pub style: MarqueeStyle,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            technologies: DEFAULT_TECHNOLOGIES.iter().map(|s| s.to_string()).collect(),
            speed: 0.5,
            gradient_width: 8,
            direction: Direction::Left,
            interactive: true,
            fps: 30,
            item_margin: 3,
            pause_on_hover: false,
            reduced_motion: false,
            style: MarqueeStyle::default(),
        }
    }
}

impl MarqueeConfig {
    /// Config with a custom technology list and defaults for everything else.
    pub fn with_technologies<I, S>(technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            technologies: technologies.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Reject values the scroll loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::config(format!("speed must be >= 0, got {}", self.speed)));
        }
        if self.fps == 0 {
            return Err(Error::config("fps must be at least 1"));
        }
        if self.technologies.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::config("technology names must be non-empty"));
        }
        Ok(())
    }
}

// =============================================================================
// RESOLVER CONFIG
// =============================================================================

/// Endpoints used by the icon resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub index_url: String,
    pub cdn_base: String,
    /// Request timeout in seconds for index fetches and icon probes.
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by the `SKILL_MARQUEE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the
    /// `SKILL_MARQUEE_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_INDEX_URL) {
            config.index_url = url;
        }
        if let Some(base) = lookup(ENV_CDN_BASE) {
            config.cdn_base = base;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{raw}'"))
            })?;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// CDN base without a trailing slash.
    pub fn cdn_base(&self) -> &str {
        self.cdn_base.trim_end_matches('/')
    }
}

// =============================================================================
// SETTINGS FILE
// =============================================================================

/// Top-level settings file: `{ "marquee": {...}, "resolver": {...} }`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub marquee: MarqueeConfig,
    pub resolver: ResolverConfig,
}

impl Settings {
    /// Load and validate a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw).map_err(|e| Error::Config {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;
        settings.marquee.validate().map_err(|e| match e {
            Error::Config { message, .. } => Error::Config {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })?;
        Ok(settings)
    }
}

// =============================================================================
// TESTS
// =============================================================================
