//! # boxlog
//!
//! A console pretty-printer: log calls render as color-boxed blocks with a
//! timestamp badge, a right-aligned header, a one-letter level tag,
//! line-numbered gutters on wrapped rows, and a call-site footer.
//!
//! The crate splits into two halves:
//!
//! ```text
//! Logger (levels, theme, sink)
//!   → stringify (values → text) → compose (text → styled rows) → sink
//!                                    ↑
//!               text::Metrics (ANSI-aware width, slice, pad)
//! ```
//!
//! The [`text`] layer measures and cuts strings by terminal cells while
//! keeping embedded ANSI sequences intact, so styled input survives
//! wrapping. [`compose`] turns one log call into one block of full-width
//! rows. [`Logger`] owns the level gate, per-level tints, the code theme,
//! and the output sink, and hands the sink exactly one write per call.
//!
//! ## Quick start
//!
//! ```no_run
//! use boxlog::Logger;
//!
//! let log = Logger::named("app");
//! log.i("server listening on :8080")?;
//! log.w_with("config", "falling back to defaults")?;
//! # Ok::<(), boxlog::Error>(())
//! ```

pub mod caller;
pub mod compose;
pub mod error;
pub mod level;
pub mod logger;
pub mod stringify;
pub mod style;
pub mod text;

pub use caller::{CallSite, MapLoader, MappedPoint, SourceMap};
pub use compose::{compose, ComposeRequest, RenderOptions};
pub use error::{Error, Result};
pub use level::LogLv;
pub use logger::{Highlighter, Logger};
pub use stringify::LogValue;
pub use style::{Rgb, Sheet, Style};
pub use text::{Metrics, SliceResult};
