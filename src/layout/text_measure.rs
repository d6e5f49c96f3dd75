//! Text Measurement
//!
//! Display width of labels in terminal cells, via `unicode-width`:
//! - ASCII characters: 1 cell
//! - CJK characters and most emoji: 2 cells
//! - Zero-width and control characters: 0 cells

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Width of a single character in cells (0 for control characters).
#[inline]
pub fn char_width(c: char) -> u16 {
    UnicodeWidthChar::width(c).unwrap_or(0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("Python"), 6);
        assert_eq!(string_width(""), 0);
    }

    #[test]
    fn test_string_width_wide() {
        assert_eq!(string_width("日本"), 4);
    }

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('日'), 2);
        assert_eq!(char_width('\u{7}'), 0);
    }
}
