//! The line composer: turns `(header, body, options)` into one color-boxed
//! block of terminal text.
//!
//! Layout of a composed block:
//!
//! ```text
//! ┌ timestamp ┬ header (right-aligned) ┬ tag ┬ body ............ ┬ footer ┐
//! │ A09:41:05 │              my-module │  I  │ first line        │ caller │
//! │       1?  │ continuation gutter    │     │ wrapped content   │        │
//! └───────────┴─────────────────────────────┴────────────────────┴────────┘
//! ```
//!
//! The first physical row carries the timestamp + header + tag badge; every
//! continuation row carries a 3-wide inverse line-number gutter that shows
//! the logical line number only on that line's first physical row. Row
//! backgrounds alternate by *logical* line parity so wrapped continuations
//! share their line's shade. The call-site footer rides the last row when it
//! fits and gets its own full-width row when it doesn't.

use crate::error::Result;
use crate::level::LogLv;
use crate::style::{Rgb, Style, RESET};
use crate::text::{active_style, blank, strip_ansi, Metrics};

/// Badge background and footer text color.
const BRIGHT_DARK: Rgb = Rgb::new(0x33, 0x33, 0x33);
/// Footer / timestamp cell background.
const INFO_BG: Rgb = Rgb::new(0xFC, 0xE5, 0xE5);
/// Default odd-row background.
const PRIMARY_BG: Rgb = Rgb::new(0x22, 0x22, 0x22);
/// Default even-row ("subline") background.
const SECONDARY_BG: Rgb = Rgb::new(0x29, 0x29, 0x29);
/// Default body text color.
const TEXT_COLOR: Rgb = Rgb::new(0xEE, 0xEE, 0xEE);

/// Visual width of the line-number gutter label.
const GUTTER_DIGITS: usize = 3;
/// Bodies with at least this many logical lines switch to "large design":
/// a synthetic summary line replaces the footer.
const LARGE_DESIGN_LINES: usize = 3;

/// Immutable per-call rendering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Type label; its first character becomes the inverse-video badge.
    pub tag: String,
    /// Badge tint (level color).
    pub color: Rgb,
    /// Body text color.
    pub text: Rgb,
    /// Odd-logical-line row background.
    pub primary: Rgb,
    /// Even-logical-line row background.
    pub secondary: Rgb,
    /// Overrides `primary` when set (used for code blocks).
    pub background: Option<Rgb>,
    /// Severity of this call, compared against the configured minimum.
    pub level: LogLv,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tag: "I".to_string(),
            color: Rgb::new(0xAF, 0xD7, 0xFF),
            text: TEXT_COLOR,
            primary: PRIMARY_BG,
            secondary: SECONDARY_BG,
            background: None,
            level: LogLv::Info,
        }
    }
}

/// Everything a single render needs. The caller re-reads the terminal width
/// for every request and preformats the timestamp and call site, which keeps
/// `compose` pure and deterministic under test.
#[derive(Debug, Clone)]
pub struct ComposeRequest<'a> {
    pub header: &'a str,
    pub body: &'a str,
    pub options: &'a RenderOptions,
    /// The logger's configured minimum severity.
    pub min_level: LogLv,
    /// Terminal column count for this render.
    pub width: usize,
    /// Preformatted timestamp, e.g. `A09:41:05`.
    pub timestamp: &'a str,
    /// Encoded call site for the footer, when resolution is enabled.
    pub caller: Option<&'a str>,
}

/// One terminal row plus the 1-based logical line it was wrapped from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PhysicalLine {
    content: String,
    logical: usize,
}

/// Compose a log block. Returns `Ok(None)` without doing any formatting
/// work when the call is below the configured minimum severity.
pub fn compose(req: &ComposeRequest<'_>, metrics: &Metrics) -> Result<Option<String>> {
    if req.min_level > req.options.level {
        return Ok(None);
    }

    let opts = req.options;
    let width = req.width;

    let tag_style = Style::new().bg(BRIGHT_DARK).fg(opts.color);
    let badge_style = tag_style.inverse();
    let info_style = Style::new().bg(INFO_BG).fg(BRIGHT_DARK);
    let theme1 = Style::new()
        .bg(opts.background.unwrap_or(opts.primary))
        .fg(opts.text);
    let theme2 = Style::new().bg(opts.secondary).fg(opts.text);

    // Header cell: timestamp badge, width-clamped right-aligned header,
    // one-letter tag badge, one column of row padding.
    let header_size = (width / 4).min(24).max(1);
    let clamped = metrics.slice(req.header, 0, header_size)?;
    let aligned = metrics.pad_start(&clamped.content, header_size, ' ')?;
    let tag_letter: String = opts.tag.chars().take(1).collect();
    let enc_header = format!(
        "{}{}{}{}",
        info_style.paint(&format!(" {} ", req.timestamp)),
        tag_style.paint(&format!(" {aligned} ")),
        badge_style.paint(&format!(" {tag_letter} ")),
        theme1.paint(" "),
    );
    let enc_middle = format!(
        "{}{}",
        gutter_cell(&badge_style, &tag_letter),
        theme1.paint(" ")
    );
    let enc_footer = req.caller.map(|c| info_style.paint(&format!(" {c} ")));

    // Logical lines. Three or more switch to large design: a synthetic
    // italic summary line absorbs the call site and the footer is skipped.
    let mut logical: Vec<String> = req.body.split('\n').map(str::to_string).collect();
    let mut large_design = false;
    if logical.len() >= LARGE_DESIGN_LINES {
        let chars: usize = logical.iter().map(|l| l.chars().count()).sum();
        let mut summary = format!("{}L, {}C", logical.len() + 1, chars);
        if let Some(caller) = req.caller {
            summary.push_str(&format!(", {caller}"));
        }
        logical.insert(0, Style::new().italic().paint(&summary));
        large_design = true;
    }
    // Blank logical lines still occupy a row; a single space keeps the
    // width arithmetic away from zero-width slices.
    for line in &mut logical {
        if line.is_empty() {
            line.push(' ');
        }
    }

    // Width budgets: first physical row sits after the header, every other
    // row after the gutter. One column is held back for row padding.
    let max_first = width
        .saturating_sub(metrics.visual_width(&enc_header)? + 1)
        .max(1);
    let max_rest = width
        .saturating_sub(metrics.visual_width(&enc_middle)? + 1)
        .max(1);

    // Wrapping loop: cut width-bounded windows out of each logical line,
    // carrying the active style between windows of the same line and
    // resetting it at every logical line boundary.
    let mut rows: Vec<PhysicalLine> = Vec::new();
    let mut carried_style = String::new();
    for (index, line) in logical.iter().enumerate() {
        let plain_len = strip_ansi(line).chars().count();
        let mut budget = if index == 0 { max_first } else { max_rest };
        let mut cursor = 0;
        let first_row_of_line = rows.len();
        while cursor < plain_len {
            let window = metrics.slice(line, cursor, budget)?;
            if window.original.is_empty() {
                // A single scalar wider than the whole budget; nothing can
                // ever fit, so drop the remainder instead of spinning.
                break;
            }
            let mut content = window.content;
            let mut next_style = window.last_style;
            if !carried_style.is_empty() {
                content = format!("{carried_style}{content}");
                next_style = active_style(&content);
            }
            carried_style = next_style;
            cursor += window.original.chars().count();
            rows.push(PhysicalLine {
                content,
                logical: index + 1,
            });
            budget = max_rest;
        }
        carried_style.clear();
        if rows.len() > first_row_of_line {
            if let Some(last) = rows.last_mut() {
                last.content.push_str(RESET);
            }
        }
    }

    // Row rendering. The budgets reserve one column; the pad targets give
    // it back so every row reaches the full terminal width.
    let pad_first = max_first + 1;
    let pad_rest = max_rest + 1;
    let total = rows.len();
    let mut out = String::new();
    let mut previous_no: Option<usize> = None;
    for (i, row) in rows.iter().enumerate() {
        // The summary line of a large design displays as line 0 but is
        // rendered in the header row; real content starts back at 1.
        let display_no = row.logical - usize::from(large_design);
        let theme = if row.logical % 2 == 1 { theme1 } else { theme2 };
        let row_width = metrics.visual_width(&row.content)?;
        let mut this_line = String::new();

        if i == 0 {
            this_line.push_str(&enc_header);
            this_line.push_str(&theme.paint(&row.content));
            if i < total - 1 {
                this_line.push_str(&theme.paint(&blank(pad_first.saturating_sub(row_width))));
            }
        } else {
            let label = if previous_no != Some(display_no) {
                display_no.to_string()
            } else {
                String::new()
            };
            this_line.push_str(&gutter_cell(&badge_style, &label));
            this_line.push_str(&theme.paint(" "));
            this_line.push_str(&theme.paint(&row.content));
            if i < total - 1 {
                this_line.push_str(&theme.paint(&blank(pad_rest.saturating_sub(row_width))));
            }
        }

        if i == total - 1 {
            let used = metrics.visual_width(&this_line)?;
            match (&enc_footer, large_design) {
                (Some(footer), false) => {
                    let left = width.saturating_sub(used);
                    let footer_width = metrics.visual_width(footer)?;
                    if left >= footer_width {
                        this_line.push_str(&theme.paint(&blank(left - footer_width)));
                        this_line.push_str(footer);
                    } else {
                        this_line.push_str(&theme.paint(&blank(left)));
                        this_line.push('\n');
                        this_line.push_str(
                            &theme.paint(&blank(width.saturating_sub(footer_width))),
                        );
                        this_line.push_str(footer);
                    }
                }
                // Large design folded the call site into the summary line;
                // no footer either way, just pad the row out.
                _ => {
                    this_line.push_str(&theme.paint(&blank(width.saturating_sub(used))));
                }
            }
        } else {
            this_line.push('\n');
        }

        previous_no = Some(display_no);
        out.push_str(&this_line);
    }

    out.push('\n');
    Ok(Some(out))
}

/// The inverse-video gutter cell: ` nnn ` with a right-aligned label.
fn gutter_cell(style: &Style, label: &str) -> String {
    style.paint(&format!(" {label:>width$} ", width = GUTTER_DIGITS))
}
