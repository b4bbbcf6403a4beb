//! Monospace-aware padding.
//!
//! `format!("{:>10}")` pads by code-point count, which drifts as soon as a
//! string contains wide characters, tabs, or escape codes. These helpers pad
//! by *visual* width instead, so gutters and right-aligned cells stay
//! column-exact.

use super::width::Metrics;
use crate::error::Result;

impl Metrics {
    /// Left-pad `text` with `fill` until it occupies at least `width`
    /// visual columns. Text already at or past the target is returned as is.
    pub fn pad_start(&self, text: &str, width: usize, fill: char) -> Result<String> {
        let current = self.visual_width(text)?;
        let missing = width.saturating_sub(current);
        let mut out = String::with_capacity(text.len() + missing);
        for _ in 0..missing {
            out.push(fill);
        }
        out.push_str(text);
        Ok(out)
    }

    /// Right-pad `text` with `fill` until it occupies at least `width`
    /// visual columns.
    pub fn pad_end(&self, text: &str, width: usize, fill: char) -> Result<String> {
        let current = self.visual_width(text)?;
        let missing = width.saturating_sub(current);
        let mut out = String::with_capacity(text.len() + missing);
        out.push_str(text);
        for _ in 0..missing {
            out.push(fill);
        }
        Ok(out)
    }
}

/// A run of `n` spaces.
pub fn blank(n: usize) -> String {
    " ".repeat(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_by_visual_width_not_length() {
        let m = Metrics::default();
        assert_eq!(m.pad_start("你好", 6, ' ').unwrap(), "  你好");
        assert_eq!(m.pad_end("你好", 6, ' ').unwrap(), "你好  ");
    }

    #[test]
    fn ansi_does_not_count_toward_padding() {
        let m = Metrics::default();
        let padded = m.pad_start("\x1b[31mab\x1b[0m", 4, ' ').unwrap();
        assert_eq!(padded, "  \x1b[31mab\x1b[0m");
        assert_eq!(m.visual_width(&padded).unwrap(), 4);
    }

    #[test]
    fn no_truncation_when_already_wide_enough() {
        let m = Metrics::default();
        assert_eq!(m.pad_end("hello", 3, ' ').unwrap(), "hello");
    }

    #[test]
    fn blank_run() {
        assert_eq!(blank(0), "");
        assert_eq!(blank(3), "   ");
    }
}
