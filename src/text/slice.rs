//! Width-bounded, ANSI-preserving substring extraction.
//!
//! The composer wraps logical lines by repeatedly cutting windows out of
//! them. A window is bounded by *visual* width, measured on the plain text,
//! but the returned content carries the original escape tokens re-inserted
//! at their relative offsets so coloring survives the cut. The style active
//! at the end of the window is reported separately so the next window can
//! reopen it.

use super::ansi::{active_style, tokenize};
use super::width::Metrics;
use crate::error::{Error, Result};

/// One width-bounded window cut from a single line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SliceResult {
    /// The plain (unstyled) text actually consumed.
    pub original: String,
    /// `original` with the line's inline ANSI tokens re-inserted at their
    /// relative offsets. Stripping `content` yields `original` again.
    pub content: String,
    /// The escape sequence active at the final character of the window;
    /// empty when no style is open. Prepend this to the next window's
    /// content to continue coloring across a physical line break.
    pub last_style: String,
}

impl Metrics {
    /// Cut a visual-width-bounded window out of a single line.
    ///
    /// `start` is the cursor position in *code points of the plain text*
    /// (callers advance it by `original.chars().count()` per window), and
    /// `max_cols` is the maximum visual width of the returned window. A wide
    /// character that would straddle the boundary is excluded entirely, so
    /// the returned width is always `<= max_cols`.
    ///
    /// Skipped and emitted characters both accumulate the tab rule, so a
    /// window starting mid-line sees tabs expand exactly as they would have
    /// on the full line.
    ///
    /// Errors with [`Error::LineSeparator`] on embedded `\n`. Empty input,
    /// `max_cols == 0`, or `start` past the end all yield an empty result
    /// with an empty `last_style`.
    pub fn slice(&self, text: &str, start: usize, max_cols: usize) -> Result<SliceResult> {
        if text.as_bytes().contains(&b'\n') {
            return Err(Error::LineSeparator);
        }
        if text.is_empty() || max_cols == 0 {
            return Ok(SliceResult::default());
        }

        let (plain, tokens) = tokenize(text);

        // Walk the plain scalars, accumulating visual width. Characters
        // before `start` are counted but not emitted; emission stops before
        // the first character that would push past the ceiling.
        let mut emitted: Vec<char> = Vec::new();
        let mut column = 0usize;
        let mut ceiling: Option<usize> = None;
        for (i, c) in plain.chars().enumerate() {
            let before = column;
            column = self.advance(column, c);
            if i < start {
                continue;
            }
            let limit = *ceiling.get_or_insert(before + max_cols);
            if column <= limit {
                emitted.push(c);
            } else {
                break;
            }
        }

        let original: String = emitted.iter().collect();

        // Re-insert the tokens whose plain offsets fall inside the emitted
        // window, in their original order. A token sitting exactly at the
        // window's end boundary belongs to the next window's prefix (the
        // carried style covers it), so it is dropped here.
        let mut content = String::with_capacity(text.len());
        let mut pending = tokens
            .iter()
            .filter(|t| t.offset >= start && t.offset < start + emitted.len())
            .peekable();
        for (j, c) in emitted.iter().enumerate() {
            while pending
                .peek()
                .is_some_and(|t| t.offset - start == j)
            {
                content.push_str(&pending.next().unwrap().code);
            }
            content.push(*c);
        }

        let last_style = if original.is_empty() {
            String::new()
        } else {
            active_style(&content)
        };

        Ok(SliceResult {
            original,
            content,
            last_style,
        })
    }
}
