//! Color and SGR style primitives.
//!
//! A [`Style`] is a truecolor foreground/background pair plus attribute
//! flags. [`Style::paint`] wraps text in the corresponding SGR open codes
//! and a trailing reset; layout code never needs to know what the codes
//! look like, it only measures and splices them via [`crate::text`].

pub mod css;

use bitflags::bitflags;

pub use css::{parse_sheet, Sheet};

// =============================================================================
// Rgb
// =============================================================================

/// An opaque truecolor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create an RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional, case-insensitive).
    ///
    /// Returns `None` on anything else; CSS parsing treats that as a rule
    /// to skip, not an error.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or_else(|| s.trim());
        let expand = |h: u8| h << 4 | h;
        match hex.len() {
            3 => {
                let v = u16::from_str_radix(hex, 16).ok()?;
                Some(Self::new(
                    expand((v >> 8) as u8 & 0xF),
                    expand((v >> 4) as u8 & 0xF),
                    expand(v as u8 & 0xF),
                ))
            }
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Attr
// =============================================================================

bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const BOLD      = 1 << 0;
        const ITALIC    = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE   = 1 << 3;
    }
}

// =============================================================================
// Style
// =============================================================================

/// SGR reset sequence.
pub const RESET: &str = "\x1b[0m";

/// A paintable terminal style: optional fg, optional bg, attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub attrs: Attr,
}

impl Style {
    /// The empty style: paints text unchanged.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: Attr::empty(),
        }
    }

    /// Set the foreground color.
    pub const fn fg(mut self, color: Rgb) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    pub const fn bg(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.attrs |= Attr::BOLD;
        self
    }

    pub fn italic(mut self) -> Self {
        self.attrs |= Attr::ITALIC;
        self
    }

    pub fn underline(mut self) -> Self {
        self.attrs |= Attr::UNDERLINE;
        self
    }

    /// Swap foreground and background at render time (SGR 7).
    pub fn inverse(mut self) -> Self {
        self.attrs |= Attr::INVERSE;
        self
    }

    /// Whether painting would emit any codes at all.
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_empty()
    }

    /// The SGR open sequence for this style (empty for a plain style).
    pub fn open(&self) -> String {
        let mut codes = String::new();
        if let Some(fg) = self.fg {
            codes.push_str(&format!("\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b));
        }
        if let Some(bg) = self.bg {
            codes.push_str(&format!("\x1b[48;2;{};{};{}m", bg.r, bg.g, bg.b));
        }
        if self.attrs.contains(Attr::BOLD) {
            codes.push_str("\x1b[1m");
        }
        if self.attrs.contains(Attr::ITALIC) {
            codes.push_str("\x1b[3m");
        }
        if self.attrs.contains(Attr::UNDERLINE) {
            codes.push_str("\x1b[4m");
        }
        if self.attrs.contains(Attr::INVERSE) {
            codes.push_str("\x1b[7m");
        }
        codes
    }

    /// Wrap `text` in this style's open codes and a trailing reset.
    ///
    /// Empty text and plain styles pass through untouched so padding runs
    /// never emit stray escape sequences.
    pub fn paint(&self, text: &str) -> String {
        if text.is_empty() || self.is_plain() {
            return text.to_string();
        }
        let mut out = self.open();
        out.push_str(text);
        out.push_str(RESET);
        out
    }
}
