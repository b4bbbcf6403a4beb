//! Best-effort extraction of a highlight.js stylesheet into a color sheet.
//!
//! The input is a CSS-like text blob with a `.hljs { background; color }`
//! base rule and `.hljs-<token> { … }` rules. This is pattern extraction for
//! a small fixed rule grammar, not a CSS parser: anything the patterns miss
//! is skipped, a declaration with an unparseable color logs a warning and is
//! ignored, and missing rules leave the caller's prior colors intact.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{Rgb, Style};

static BASE_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\.hljs\s*\{(.*?)\}").expect("base rule regex is valid")
});

static TOKEN_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\.hljs-[a-zA-Z\-_,.\s]+?)\{(.*?)\}").expect("token rule regex is valid")
});

static COLOR_DECL: LazyLock<Regex> = LazyLock::new(|| {
    // `[^-]` keeps `background-color` from matching as `color`.
    Regex::new(r"(?:^|[^-\w])color:\s*([^;}]+)").expect("color regex is valid")
});

static BG_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"background(?:-color)?:\s*([^;}]+)").expect("background regex is valid")
});

static TOKEN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.hljs-([\w-]+)").expect("token name regex is valid")
});

/// Parsed stylesheet: base colors plus a token → style mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// `.hljs` rule background, if present and parseable.
    pub background: Option<Rgb>,
    /// `.hljs` rule foreground, if present and parseable.
    pub foreground: Option<Rgb>,
    /// Style per highlight token name (`"keyword"`, `"string"`, …).
    pub tokens: HashMap<String, Style>,
}

impl Sheet {
    /// Style for a token name, if the sheet defines one.
    pub fn token(&self, name: &str) -> Option<&Style> {
        self.tokens.get(name)
    }
}

/// Extract a [`Sheet`] from stylesheet text.
pub fn parse_sheet(css: &str) -> Sheet {
    let mut sheet = Sheet::default();

    if let Some(base) = BASE_RULE.captures(css) {
        let body = &base[1];
        sheet.background = BG_DECL
            .captures(body)
            .and_then(|c| color_value(c[1].trim()));
        sheet.foreground = COLOR_DECL
            .captures(body)
            .and_then(|c| color_value(c[1].trim()));
    }

    for rule in TOKEN_RULE.captures_iter(css) {
        let (header, body) = (&rule[1], &rule[2]);
        let mut style = Style::new();
        if let Some(c) = COLOR_DECL.captures(body) {
            match color_value(c[1].trim()) {
                Some(color) => style = style.fg(color),
                None => continue, // bad color token: skip the whole rule
            }
        }
        if let Some(c) = BG_DECL.captures(body) {
            if let Some(color) = color_value(c[1].trim()) {
                style = style.bg(color);
            }
        }
        if body.contains("font-weight:") && body.contains("bold") {
            style = style.bold();
        }
        if body.contains("font-style:") && body.contains("italic") {
            style = style.italic();
        }
        if body.contains("text-decoration:") && body.contains("underline") {
            style = style.underline();
        }
        for name in TOKEN_NAME.captures_iter(header) {
            sheet.tokens.insert(name[1].to_string(), style);
        }
    }

    sheet
}

/// Parse a CSS color value, hex forms only. Logs and returns `None` on miss.
fn color_value(value: &str) -> Option<Rgb> {
    let color = Rgb::from_hex(value);
    if color.is_none() {
        log::warn!("skipping unparseable CSS color value: {value:?}");
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
.hljs {
    display: block;
    background: #1E1E1E;
    color: #DCDCDC;
}
.hljs-keyword,
.hljs-literal,
.hljs-symbol {
    color: #569CD6;
}
.hljs-string {
    color: #D69D85;
    font-style: italic;
}
.hljs-title {
    color: #ff0;
    font-weight: bold;
    text-decoration: underline;
}
.hljs-emphasis {
    font-style: italic;
}
";

    #[test]
    fn base_rule_colors() {
        let sheet = parse_sheet(SAMPLE);
        assert_eq!(sheet.background, Some(Rgb::new(0x1E, 0x1E, 0x1E)));
        assert_eq!(sheet.foreground, Some(Rgb::new(0xDC, 0xDC, 0xDC)));
    }

    #[test]
    fn grouped_selectors_share_a_style() {
        let sheet = parse_sheet(SAMPLE);
        let keyword = sheet.token("keyword").copied();
        assert_eq!(keyword.and_then(|s| s.fg), Some(Rgb::new(0x56, 0x9C, 0xD6)));
        assert_eq!(sheet.token("literal").copied(), keyword);
        assert_eq!(sheet.token("symbol").copied(), keyword);
    }

    #[test]
    fn boolean_flags() {
        let sheet = parse_sheet(SAMPLE);
        let title = sheet.token("title").unwrap();
        assert!(title.attrs.contains(crate::style::Attr::BOLD));
        assert!(title.attrs.contains(crate::style::Attr::UNDERLINE));
        let string = sheet.token("string").unwrap();
        assert!(string.attrs.contains(crate::style::Attr::ITALIC));
        assert_eq!(string.fg, Some(Rgb::new(0xD6, 0x9D, 0x85)));
    }

    #[test]
    fn attribute_only_rule_has_no_colors() {
        let sheet = parse_sheet(SAMPLE);
        let emphasis = sheet.token("emphasis").unwrap();
        assert_eq!(emphasis.fg, None);
        assert!(emphasis.attrs.contains(crate::style::Attr::ITALIC));
    }

    #[test]
    fn bad_color_skips_the_rule() {
        let css = ".hljs-bad { color: rainbow; }\n.hljs-good { color: #123456; }";
        let sheet = parse_sheet(css);
        assert!(sheet.token("bad").is_none());
        assert!(sheet.token("good").is_some());
    }

    #[test]
    fn missing_rules_leave_sheet_empty() {
        let sheet = parse_sheet("body { margin: 0; }");
        assert_eq!(sheet, Sheet::default());
    }

    #[test]
    fn background_color_is_not_mistaken_for_color() {
        let css = ".hljs-mark { background-color: #101010; }";
        let sheet = parse_sheet(css);
        let mark = sheet.token("mark").unwrap();
        assert_eq!(mark.fg, None);
        assert_eq!(mark.bg, Some(Rgb::new(0x10, 0x10, 0x10)));
    }
}
