//! Core types for skill-marquee.
//!
//! These types are shared by the scroll loop, the painter and the renderer.
//! The renderer only understands [`Cell`]s; everything above it computes them.

use serde::{Deserialize, Deserializer};

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Stored as i16 so the "terminal default" marker (r=-1) fits next to real
/// channel values. Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Background of the portfolio site (`hsl(240 10% 4%)`).
    pub const SITE_BACKGROUND: Self = Self::rgb(9, 9, 11);

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Linear interpolation between two colors.
    ///
    /// Terminal default on either side yields `b`, since there is nothing
    /// to mix with.
    #[inline]
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        if a.is_terminal_default() || b.is_terminal_default() {
            return b;
        }
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self {
            r: ((a.r as f32 * inv_t) + (b.r as f32 * t)).round() as i16,
            g: ((a.g as f32 * inv_t) + (b.g as f32 * t)).round() as i16,
            b: ((a.b as f32 * inv_t) + (b.b as f32 * t)).round() as i16,
            a: ((a.a as f32 * inv_t) + (b.a as f32 * t)).round() as i16,
        }
    }

    /// Parse hex color string (#RGB or #RRGGBB, `#` optional).
    ///
    /// Returns None for invalid format.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let byte = |i: usize| -> Option<u8> {
                    Some((hex_digit(bytes[i])? << 4) | hex_digit(bytes[i + 1])?)
                };
                Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("default") {
            return Ok(Self::TERMINAL_DEFAULT);
        }
        Self::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{raw}'")))
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::DIM`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
    }
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint (32 for space).
    pub char: u32,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Attribute flags.
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// ClipRect
// =============================================================================

/// A rectangle in terminal cells. Used as the marquee's region and as the
/// clip for painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ClipRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && (x as u32) < self.x as u32 + self.width as u32
            && y >= self.y
            && (y as u32) < self.y as u32 + self.height as u32
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Auto-scroll direction of the track.
///
/// `Left` moves content toward the left edge (offset decreases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// Sign applied to the per-frame speed.
    #[inline]
    pub const fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    /// Direction implied by a horizontal pointer delta.
    ///
    /// Only a strictly positive delta means `Right`; zero falls back to `Left`.
    #[inline]
    pub fn from_delta(delta: f32) -> Self {
        if delta > 0.0 { Direction::Right } else { Direction::Left }
    }
}

// =============================================================================
// Tests
// =============================================================================
