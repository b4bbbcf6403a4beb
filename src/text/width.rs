//! Visual-column width measurement for terminal text.
//!
//! Measures how many terminal cells a single line occupies. Escape
//! sequences contribute nothing, horizontal tabs advance to the next tab
//! stop, East Asian wide characters and emoji occupy two cells, combining
//! marks occupy none. Iteration is by Unicode scalar, never by UTF-16 unit
//! or byte, so surrogate-pair-encoded emoji are counted once.

use unicode_width::UnicodeWidthChar;

use super::ansi::strip_ansi;
use crate::error::{Error, Result};

/// Measurement configuration shared by the width and slice operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    /// Tab stop interval; a `\t` advances the running width to the next
    /// multiple of this. 8 matches common terminal defaults.
    pub tab_stop: usize,
    /// When set, every emoji-classified scalar counts this many cells
    /// instead of its East-Asian-width classification. Lets hosts whose
    /// terminal renders emoji narrow (or double-wide) stay aligned.
    pub emoji_width: Option<usize>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            tab_stop: 8,
            emoji_width: None,
        }
    }
}

impl Metrics {
    /// Metrics with a fixed emoji width override.
    pub fn with_emoji_width(width: usize) -> Self {
        Self {
            emoji_width: Some(width),
            ..Self::default()
        }
    }

    /// Display width of a single scalar in terminal cells, honoring the
    /// emoji override. Tabs are *not* handled here — they depend on the
    /// running column and are resolved by [`Metrics::advance`].
    #[inline]
    pub fn char_width(&self, c: char) -> usize {
        if let Some(forced) = self.emoji_width {
            if is_emoji(c) {
                return forced;
            }
        }
        char_cells(c)
    }

    /// Advance a running column count over one scalar, applying the tab rule.
    #[inline]
    pub(crate) fn advance(&self, column: usize, c: char) -> usize {
        if c == '\t' {
            // Round up to the next tab stop multiple.
            (column / self.tab_stop + 1) * self.tab_stop
        } else {
            column + self.char_width(c)
        }
    }

    /// Visual width of a single-line string in terminal cells.
    ///
    /// ANSI escape sequences are stripped first and contribute zero width.
    /// Errors with [`Error::LineSeparator`] if the input contains `\n`;
    /// multi-line measurement is the caller's job.
    pub fn visual_width(&self, text: &str) -> Result<usize> {
        if text.as_bytes().contains(&b'\n') {
            return Err(Error::LineSeparator);
        }
        Ok(self.width_of(strip_ansi(text).chars()))
    }

    /// Width of an already-stripped scalar sequence. Infallible; used by the
    /// slicer which tokenizes up front.
    pub(crate) fn width_of(&self, chars: impl Iterator<Item = char>) -> usize {
        let mut column = 0;
        for c in chars {
            column = self.advance(column, c);
        }
        column
    }
}

/// Display width of a single scalar per East Asian Width / emoji
/// classification: 0 for control and combining characters, 2 for wide
/// characters and emoji, 1 otherwise.
#[inline]
pub fn char_cells(c: char) -> usize {
    // Force known emoji ranges to width 2 (terminal renderers usually treat
    // them as wide even where the Unicode tables say ambiguous/neutral).
    if is_emoji(c) {
        return 2;
    }
    c.width().unwrap_or(0)
}

/// Whether a scalar falls in the pictographic ranges treated as emoji.
#[inline]
pub fn is_emoji(c: char) -> bool {
    matches!(c as u32,
        // Misc symbols and dingbats (✨, ⚡, ✂)
        0x2600..=0x27BF
        // Regional indicators (flag halves)
        | 0x1F1E6..=0x1F1FF
        // Misc Symbols and Pictographs
        | 0x1F300..=0x1F5FF
        // Emoticons (😀)
        | 0x1F600..=0x1F64F
        // Transport and Map Symbols (🚀)
        | 0x1F680..=0x1F6FF
        // Supplemental Symbols and Pictographs
        | 0x1F900..=0x1F9FF
        // Symbols and Pictographs Extended-A
        | 0x1FA70..=0x1FAFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(s: &str) -> usize {
        Metrics::default().visual_width(s).unwrap()
    }

    // ── plain scalars ──

    #[test]
    fn ascii() {
        assert_eq!(width(""), 0);
        assert_eq!(width("hello"), 5);
        assert_eq!(width("a b c"), 5);
    }

    #[test]
    fn cjk_is_wide() {
        assert_eq!(width("你好"), 4);
        assert_eq!(width("가"), 2);
        assert_eq!(width("hello你好"), 9);
        assert_eq!(width("Ａ０"), 4); // fullwidth forms
    }

    #[test]
    fn combining_marks_are_zero_width() {
        assert_eq!(width("cafe\u{0301}"), 4);
        assert_eq!(width("a\u{030A}"), 1);
    }

    #[test]
    fn emoji_default_is_two() {
        assert_eq!(width("🙂"), 2);
        assert_eq!(width("🚀"), 2);
        assert_eq!(width("✨"), 2);
    }

    // ── tab rule ──

    #[test]
    fn tab_advances_to_next_stop() {
        assert_eq!(width("\t"), 8);
        assert_eq!(width("A\tB"), 9); // A=1, tab 1→8, B → 9
        assert_eq!(width("1234567\tx"), 9); // 7 → 8, x → 9
        assert_eq!(width("12345678\tx"), 17); // already at stop → next stop
    }

    #[test]
    fn tab_stop_is_configurable() {
        let metrics = Metrics {
            tab_stop: 4,
            ..Metrics::default()
        };
        assert_eq!(metrics.visual_width("A\tB").unwrap(), 5);
    }

    // ── ANSI ──

    #[test]
    fn escape_codes_have_no_width() {
        assert_eq!(width("\x1b[31mred\x1b[0m"), 3);
        assert_eq!(width("\x1b[1m\x1b[31m你好\x1b[0m"), 4);
    }

    // ── emoji override ──

    #[test]
    fn emoji_override_forces_width() {
        let metrics = Metrics::with_emoji_width(1);
        assert_eq!(metrics.visual_width("🙂").unwrap(), 1);
        assert_eq!(metrics.visual_width("a🙂b").unwrap(), 3);
        // Non-emoji text is unaffected.
        assert_eq!(metrics.visual_width("你好").unwrap(), 4);
    }

    // ── contract ──

    #[test]
    fn newline_is_rejected() {
        assert!(matches!(
            Metrics::default().visual_width("a\nb"),
            Err(Error::LineSeparator)
        ));
    }
}
