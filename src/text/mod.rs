//! Monospace text metrics and ANSI-aware slicing.
//!
//! The leaf layer of the renderer: exact visual-column arithmetic over
//! ANSI-laden, tab-containing, wide-character text, plus extraction of any
//! contiguous visual-width window without breaking escape sequences or
//! losing style continuity.
//!
//! # Capabilities
//!
//! - **Width calculation**: terminal cell width per Unicode scalar, with the
//!   tab-stop rule and an optional emoji width override
//! - **ANSI scanning**: strips or tokenizes CSI, OSC, and ESC sequences
//! - **Slicing**: width-bounded windows with escape tokens re-inserted and
//!   the active style reported for continuation lines
//! - **Padding**: pad-to-visual-width for gutters and right-aligned cells
//!
//! Everything here is pure and single-line: inputs containing `\n` are a
//! contract violation surfaced as [`crate::Error::LineSeparator`].

mod ansi;
mod pad;
mod slice;
mod width;

pub use ansi::{active_style, strip_ansi, tokenize, AnsiToken};
pub use pad::blank;
pub use slice::SliceResult;
pub use width::{char_cells, is_emoji, Metrics};
