//! ANSI escape sequence scanning.
//!
//! The slicer needs more than stripping: it must know *where* each escape
//! token sat relative to the plain text so it can re-inject tokens into a
//! width-bounded window and report the style active at a cut point. This
//! module provides the shared scanner. Handled sequence shapes:
//! - CSI sequences: `ESC [` ... final byte (0x40-0x7E)
//! - OSC sequences: `ESC ]` ... BEL (0x07) or ST (ESC \)
//! - DCS/PM/APC sequences: `ESC P`/`ESC ^`/`ESC _` ... ST
//! - Two-character sequences: `ESC` + single char

use std::borrow::Cow;

const ESC: u8 = 0x1B;

/// An escape token and the plain-text position it was captured at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiToken {
    /// Offset in *code points* of the plain text at which the token occurred.
    pub offset: usize,
    /// The raw escape sequence, e.g. `"\x1b[31m"`.
    pub code: String,
}

impl AnsiToken {
    /// Whether this token resets all SGR attributes (`ESC[0m` / `ESC[m`).
    pub fn is_sgr_reset(&self) -> bool {
        let Some(params) = self
            .code
            .strip_prefix("\x1b[")
            .and_then(|rest| rest.strip_suffix('m'))
        else {
            return false;
        };
        params.is_empty() || params.split(';').all(|p| p.is_empty() || p == "0")
    }
}

/// Strip ANSI escape sequences from a string.
///
/// Returns `Cow::Borrowed` when no escape sequences are present (zero
/// allocation). Returns `Cow::Owned` with sequences removed otherwise.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.as_bytes().contains(&ESC) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        if bytes[i] == ESC {
            i = skip_escape_sequence(bytes, i);
        } else {
            // Regular content: copy everything up to the next ESC.
            // ESC is a single-byte ASCII character, so splitting at ESC
            // positions never breaks a UTF-8 sequence.
            let start = i;
            while i < len && bytes[i] != ESC {
                i += 1;
            }
            result.push_str(&s[start..i]);
        }
    }

    Cow::Owned(result)
}

/// Split a string into its plain text and the escape tokens that were
/// embedded in it, each tagged with its code-point offset in the plain text.
///
/// Re-joining the tokens into the plain text at their offsets reproduces the
/// input, so this is the lossless form of [`strip_ansi`].
pub fn tokenize(s: &str) -> (String, Vec<AnsiToken>) {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut plain = String::with_capacity(s.len());
    let mut tokens = Vec::new();
    let mut offset = 0; // code points emitted into `plain`
    let mut i = 0;

    while i < len {
        if bytes[i] == ESC {
            let end = skip_escape_sequence(bytes, i);
            tokens.push(AnsiToken {
                offset,
                code: s[i..end].to_string(),
            });
            i = end;
        } else {
            let start = i;
            while i < len && bytes[i] != ESC {
                i += 1;
            }
            let fragment = &s[start..i];
            offset += fragment.chars().count();
            plain.push_str(fragment);
        }
    }

    (plain, tokens)
}

/// The accumulated style in effect after the final character of `styled`.
///
/// Escape tokens are concatenated in order; an SGR reset clears the
/// accumulator. The result is what a continuation line must be prefixed
/// with so that coloring resumes where the previous chunk left off.
pub fn active_style(styled: &str) -> String {
    let (_, tokens) = tokenize(styled);
    let mut style = String::new();
    for token in tokens {
        if token.is_sgr_reset() {
            style.clear();
        } else {
            style.push_str(&token.code);
        }
    }
    style
}

/// Skip an escape sequence starting at `pos` (which points to ESC byte).
/// Returns the byte index after the complete sequence.
fn skip_escape_sequence(bytes: &[u8], pos: usize) -> usize {
    let next = pos + 1;
    if next >= bytes.len() {
        return bytes.len();
    }

    match bytes[next] {
        b'[' => skip_csi(bytes, next + 1),
        b']' => skip_string_terminated(bytes, next + 1),
        b'P' | b'^' | b'_' => skip_string_terminated(bytes, next + 1),
        _ => next + 1, // Two-character sequence
    }
}

/// Skip a CSI sequence. `pos` is the byte after `[`.
///
/// CSI format: parameter bytes (0x30-0x3F), intermediate bytes (0x20-0x2F),
/// final byte (0x40-0x7E).
fn skip_csi(bytes: &[u8], pos: usize) -> usize {
    let len = bytes.len();
    let mut i = pos;

    while i < len {
        let b = bytes[i];
        if (0x40..=0x7E).contains(&b) {
            return i + 1; // Final byte — sequence complete
        }
        if !(0x20..=0x7E).contains(&b) {
            return i; // Invalid byte — abort sequence
        }
        i += 1;
    }

    len // Unterminated — consume all
}

/// Skip a string-terminated sequence (OSC, DCS, PM, APC).
/// `pos` is the byte after the type indicator.
///
/// Terminates with BEL (0x07) or ST (ESC \).
fn skip_string_terminated(bytes: &[u8], pos: usize) -> usize {
    let len = bytes.len();
    let mut i = pos;

    while i < len {
        match bytes[i] {
            0x07 => return i + 1,
            ESC if i + 1 < len && bytes[i + 1] == b'\\' => return i + 2,
            _ => i += 1,
        }
    }

    len // Unterminated — consume all
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── strip_ansi ──

    #[test]
    fn strip_no_ansi_borrows() {
        assert!(matches!(strip_ansi("hello"), Cow::Borrowed(_)));
        assert_eq!(strip_ansi("hello"), "hello");
    }

    #[test]
    fn strip_csi_color() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("\x1b[38;5;196mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("\x1b[38;2;255;0;0mred\x1b[0m"), "red");
    }

    #[test]
    fn strip_osc_hyperlink() {
        assert_eq!(
            strip_ansi("\x1b]8;;https://example.com\x07click\x1b]8;;\x07"),
            "click"
        );
        assert_eq!(strip_ansi("\x1b]0;window title\x1b\\text"), "text");
    }

    #[test]
    fn strip_two_char_sequence() {
        assert_eq!(strip_ansi("\x1b=normal mode"), "normal mode");
    }

    #[test]
    fn strip_unterminated() {
        assert_eq!(strip_ansi("text\x1b"), "text");
        assert_eq!(strip_ansi("\x1b[31"), "");
        assert_eq!(strip_ansi("\x1b]8;;url"), "");
    }

    #[test]
    fn strip_unicode_outside_ansi() {
        assert_eq!(strip_ansi("\x1b[31m你好\x1b[0m"), "你好");
    }

    // ── tokenize ──

    #[test]
    fn tokenize_clean_string() {
        let (plain, tokens) = tokenize("hello");
        assert_eq!(plain, "hello");
        assert!(tokens.is_empty());
    }

    #[test]
    fn tokenize_offsets_are_code_points() {
        let (plain, tokens) = tokenize("你\x1b[31m好\x1b[0m");
        assert_eq!(plain, "你好");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], AnsiToken { offset: 1, code: "\x1b[31m".into() });
        assert_eq!(tokens[1], AnsiToken { offset: 2, code: "\x1b[0m".into() });
    }

    #[test]
    fn tokenize_leading_and_adjacent_tokens() {
        let (plain, tokens) = tokenize("\x1b[1m\x1b[31mab");
        assert_eq!(plain, "ab");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 0);
        assert_eq!(tokens[0].code, "\x1b[1m");
        assert_eq!(tokens[1].code, "\x1b[31m");
    }

    // ── is_sgr_reset ──

    #[test]
    fn reset_detection() {
        let token = |code: &str| AnsiToken { offset: 0, code: code.into() };
        assert!(token("\x1b[0m").is_sgr_reset());
        assert!(token("\x1b[m").is_sgr_reset());
        assert!(!token("\x1b[31m").is_sgr_reset());
        assert!(!token("\x1b[1;31m").is_sgr_reset());
        assert!(!token("\x1b[2J").is_sgr_reset());
    }

    // ── active_style ──

    #[test]
    fn active_style_last_color_wins_until_reset() {
        assert_eq!(active_style("\x1b[31mred"), "\x1b[31m");
        assert_eq!(active_style("\x1b[31mred\x1b[0m"), "");
        assert_eq!(active_style("plain"), "");
    }

    #[test]
    fn active_style_accumulates_compound_styles() {
        assert_eq!(active_style("\x1b[41m\x1b[1mx"), "\x1b[41m\x1b[1m");
        assert_eq!(active_style("\x1b[1ma\x1b[0mb\x1b[4mc"), "\x1b[4m");
    }
}
