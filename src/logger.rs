//! The logger instance: per-level entry points, theme and level state, the
//! output sink, and the glue between stringification, call-site resolution,
//! and the composer.
//!
//! A `Logger` is an explicit instance, not a process-wide singleton. Child
//! loggers are cheap clones that share the output sink but keep their own
//! name, levels, and source-map cache. Each log call runs to completion and
//! hands the sink exactly one write, so output is never torn mid-block.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, Timelike};
use parking_lot::Mutex;

use crate::caller::{CallSite, MapCache, MapLoader};
use crate::compose::{compose, ComposeRequest, RenderOptions};
use crate::error::Result;
use crate::level::LogLv;
use crate::stringify::LogValue;
use crate::style::{parse_sheet, Rgb, Sheet};
use crate::text::Metrics;

/// Black-box syntax highlighter: text in, ANSI-colored text out.
///
/// `language: None` asks the implementation to auto-detect. The default
/// logger carries no highlighter and passes source through unchanged.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, language: Option<&str>, source: &str, sheet: &Sheet) -> String;
}

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Fallback terminal width when the host has no queryable terminal.
const FALLBACK_WIDTH: usize = 80;

/// A console pretty-printing logger.
pub struct Logger {
    name: String,
    level: LogLv,
    metrics: Metrics,
    code_background: Rgb,
    code_text: Rgb,
    sheet: Sheet,
    cwd: PathBuf,
    resolve_caller: bool,
    fixed_width: Option<usize>,
    highlighter: Option<Arc<dyn Highlighter>>,
    map_loader: Option<Arc<dyn MapLoader>>,
    maps: MapCache,
    sink: Sink,
}

impl Default for Logger {
    fn default() -> Self {
        Self::named("boxlog")
    }
}

impl Logger {
    /// A logger with the default name.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger writing to stdout.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLv::All,
            metrics: Metrics::default(),
            code_background: Rgb::new(0x22, 0x22, 0x22),
            code_text: Rgb::new(0xFF, 0xFF, 0xFF),
            sheet: Sheet::default(),
            cwd: std::env::current_dir().unwrap_or_default(),
            resolve_caller: true,
            fixed_width: None,
            highlighter: None,
            map_loader: None,
            maps: MapCache::default(),
            sink: Arc::new(Mutex::new(Box::new(std::io::stdout()))),
        }
    }

    /// A child logger: same configuration and shared sink, own name and
    /// own (empty) source-map cache.
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: self.level,
            metrics: self.metrics,
            code_background: self.code_background,
            code_text: self.code_text,
            sheet: self.sheet.clone(),
            cwd: self.cwd.clone(),
            resolve_caller: self.resolve_caller,
            fixed_width: self.fixed_width,
            highlighter: self.highlighter.clone(),
            map_loader: self.map_loader.clone(),
            maps: MapCache::default(),
            sink: Arc::clone(&self.sink),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLv {
        self.level
    }

    /// Set the minimum severity; calls below it are silently skipped.
    pub fn set_level(&mut self, level: LogLv) {
        self.level = level;
    }

    /// Replace the measurement configuration (tab stop, emoji width).
    pub fn set_metrics(&mut self, metrics: Metrics) {
        self.metrics = metrics;
    }

    /// Redirect output. The sink receives exactly one write per log call.
    pub fn set_sink(&mut self, sink: Box<dyn Write + Send>) {
        self.sink = Arc::new(Mutex::new(sink));
    }

    /// Enable or disable call-site footers.
    pub fn set_caller_resolution(&mut self, enabled: bool) {
        self.resolve_caller = enabled;
    }

    /// Pin the render width instead of querying the terminal. Mostly useful
    /// for tests and non-tty sinks.
    pub fn set_fixed_width(&mut self, width: Option<usize>) {
        self.fixed_width = width;
    }

    /// Install the syntax highlighter used by [`Logger::code`] and for
    /// JSON-ish bodies.
    pub fn set_highlighter(&mut self, highlighter: Arc<dyn Highlighter>) {
        self.highlighter = Some(highlighter);
    }

    /// Install a source-map loader for call-site resolution.
    pub fn set_map_loader(&mut self, loader: Arc<dyn MapLoader>) {
        self.map_loader = Some(loader);
    }

    /// Parse a highlight.js stylesheet (provided as a string; fetching is
    /// the caller's business) into the active color sheet. Base `.hljs`
    /// colors move the code background/foreground; rules that fail to parse
    /// are skipped and prior colors stay intact.
    pub fn set_code_theme(&mut self, css: &str) -> &Sheet {
        let sheet = parse_sheet(css);
        if let Some(bg) = sheet.background {
            self.code_background = bg;
        }
        if let Some(fg) = sheet.foreground {
            self.code_text = fg;
        }
        self.sheet = sheet;
        &self.sheet
    }

    /// The active color sheet.
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    // =========================================================================
    // Logging entry points
    // =========================================================================

    /// Verbose log.
    #[track_caller]
    pub fn v(&self, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Verbose, LogValue::Unit, message.into(), CallSite::here())
    }

    /// Verbose log with a title.
    #[track_caller]
    pub fn v_with(&self, title: impl Into<LogValue>, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Verbose, title.into(), message.into(), CallSite::here())
    }

    /// Debug log.
    #[track_caller]
    pub fn d(&self, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Debug, LogValue::Unit, message.into(), CallSite::here())
    }

    /// Debug log with a title.
    #[track_caller]
    pub fn d_with(&self, title: impl Into<LogValue>, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Debug, title.into(), message.into(), CallSite::here())
    }

    /// Info log.
    #[track_caller]
    pub fn i(&self, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Info, LogValue::Unit, message.into(), CallSite::here())
    }

    /// Info log with a title.
    #[track_caller]
    pub fn i_with(&self, title: impl Into<LogValue>, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Info, title.into(), message.into(), CallSite::here())
    }

    /// Warning log.
    #[track_caller]
    pub fn w(&self, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Warn, LogValue::Unit, message.into(), CallSite::here())
    }

    /// Warning log with a title.
    #[track_caller]
    pub fn w_with(&self, title: impl Into<LogValue>, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Warn, title.into(), message.into(), CallSite::here())
    }

    /// Error log.
    #[track_caller]
    pub fn e(&self, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Error, LogValue::Unit, message.into(), CallSite::here())
    }

    /// Error log with a title.
    #[track_caller]
    pub fn e_with(&self, title: impl Into<LogValue>, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Error, title.into(), message.into(), CallSite::here())
    }

    /// Assertion-level log. The body is tinted to match the screaming tag.
    #[track_caller]
    pub fn wtf(&self, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Assert, LogValue::Unit, message.into(), CallSite::here())
    }

    /// Assertion-level log with a title.
    #[track_caller]
    pub fn wtf_with(&self, title: impl Into<LogValue>, message: impl Into<LogValue>) -> Result<()> {
        self.print(LogLv::Assert, title.into(), message.into(), CallSite::here())
    }

    /// Generic entry point when the level is a runtime value.
    #[track_caller]
    pub fn log(&self, level: LogLv, message: impl Into<LogValue>) -> Result<()> {
        self.print(level, LogValue::Unit, message.into(), CallSite::here())
    }

    /// Generic entry point with a title.
    #[track_caller]
    pub fn log_with(
        &self,
        level: LogLv,
        title: impl Into<LogValue>,
        message: impl Into<LogValue>,
    ) -> Result<()> {
        self.print(level, title.into(), message.into(), CallSite::here())
    }

    /// Log source code, auto-highlighted when a highlighter is installed.
    /// Renders on the code theme's background.
    #[track_caller]
    pub fn code(&self, source: &str) -> Result<()> {
        self.print_code("Code", source, CallSite::here())
    }

    /// Log source code with a custom title.
    #[track_caller]
    pub fn code_with(&self, title: &str, source: &str) -> Result<()> {
        self.print_code(title, source, CallSite::here())
    }

    // =========================================================================
    // Rendering pipeline
    // =========================================================================

    fn print(&self, level: LogLv, title: LogValue, body: LogValue, site: CallSite) -> Result<()> {
        if self.level > level {
            return Ok(());
        }
        let (header, body_text) = fallback_param(title, body);
        let body_text = self.beautify(body_text);
        let options = self.options_for(level);
        self.render(&header, &body_text, &options, site)
    }

    fn print_code(&self, title: &str, source: &str, site: CallSite) -> Result<()> {
        if self.level > LogLv::Debug {
            return Ok(());
        }
        let body = match &self.highlighter {
            Some(h) => h.highlight(None, source, &self.sheet),
            None => source.to_string(),
        };
        let options = RenderOptions {
            tag: "C".to_string(),
            color: self.code_text,
            text: self.code_text,
            background: Some(self.code_background),
            level: LogLv::Debug,
            ..RenderOptions::default()
        };
        self.render(title, &body, &options, site)
    }

    fn render(
        &self,
        header: &str,
        body: &str,
        options: &RenderOptions,
        site: CallSite,
    ) -> Result<()> {
        let caller = if self.resolve_caller {
            let resolved = self
                .maps
                .resolve(self.map_loader.as_deref(), &self.cwd, &site);
            Some(resolved.encode())
        } else {
            None
        };
        // Headers are single-line by contract for the metrics layer.
        let header = header.replace('\n', " ");
        let request = ComposeRequest {
            header: &header,
            body,
            options,
            min_level: self.level,
            width: self.terminal_width(),
            timestamp: &timestamp(),
            caller: caller.as_deref(),
        };
        if let Some(block) = compose(&request, &self.metrics)? {
            let mut sink = self.sink.lock();
            sink.write_all(block.as_bytes())?;
            sink.flush()?;
        }
        Ok(())
    }

    /// Per-level tag letters and tints.
    fn options_for(&self, level: LogLv) -> RenderOptions {
        let defaults = RenderOptions::default();
        let (tag, color, text) = match level {
            LogLv::All | LogLv::Verbose => ("V", Rgb::new(0xFF, 0xD7, 0xFF), defaults.text),
            LogLv::Debug => ("D", Rgb::new(0xA6, 0xDB, 0x92), defaults.text),
            LogLv::Info => ("I", Rgb::new(0xAF, 0xD7, 0xFF), defaults.text),
            LogLv::Warn => ("W", Rgb::new(0xFF, 0xFA, 0xCD), defaults.text),
            LogLv::Error => ("E", Rgb::new(0xFF, 0x71, 0x5B), Rgb::new(0xC6, 0x43, 0x37)),
            LogLv::Assert | LogLv::Silent => {
                ("F", Rgb::new(0xFF, 0x00, 0x00), Rgb::new(0xFF, 0xCB, 0xC6))
            }
        };
        RenderOptions {
            tag: tag.to_string(),
            color,
            text,
            level,
            ..defaults
        }
    }

    /// JSON-ish bodies with no embedded ANSI go through the highlighter so
    /// plain structures print colored; already-styled bodies pass through.
    fn beautify(&self, body: String) -> String {
        if body.as_bytes().contains(&0x1B) {
            return body;
        }
        match &self.highlighter {
            Some(h) => h.highlight(Some("json"), &body, &self.sheet),
            None => body,
        }
    }

    /// Current terminal column count, re-read every render (it can change
    /// between calls).
    fn terminal_width(&self) -> usize {
        if let Some(width) = self.fixed_width {
            return width;
        }
        crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(FALLBACK_WIDTH)
    }
}

/// Title/description fallback: a call without a body promotes the title to
/// the body and leaves a single-space header.
fn fallback_param(title: LogValue, body: LogValue) -> (String, String) {
    match body {
        LogValue::Unit => (" ".to_string(), title.render()),
        body => {
            let header = match title {
                LogValue::Unit => " ".to_string(),
                title => title.render(),
            };
            (header, body.render())
        }
    }
}

/// `A`/`P`-prefixed 12-hour clock, e.g. `P03:24:58`.
fn timestamp() -> String {
    let now = Local::now();
    let (is_pm, hour) = now.hour12();
    format!(
        "{}{:02}:{:02}:{:02}",
        if is_pm { 'P' } else { 'A' },
        hour,
        now.minute(),
        now.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::strip_ansi;

    /// A sink whose buffer outlives the logger, for asserting on output.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }

        fn plain(&self) -> String {
            strip_ansi(&self.contents()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn test_logger() -> (Logger, SharedBuf) {
        let buf = SharedBuf::default();
        let mut logger = Logger::named("test");
        logger.set_sink(Box::new(buf.clone()));
        logger.set_fixed_width(Some(100));
        (logger, buf)
    }

    #[test]
    fn info_renders_body_and_footer() {
        let (logger, buf) = test_logger();
        logger.i("hello there").unwrap();
        let plain = buf.plain();
        assert!(plain.contains("hello there"));
        assert!(plain.contains("./src/logger.rs"), "footer has the call site");
        assert!(plain.ends_with('\n'));
    }

    #[test]
    fn level_gate_skips_without_writing() {
        let (mut logger, buf) = test_logger();
        logger.set_level(LogLv::Warn);
        logger.d("invisible").unwrap();
        assert!(buf.contents().is_empty());
        logger.w("visible").unwrap();
        assert!(buf.plain().contains("visible"));
    }

    #[test]
    fn silent_swallows_everything() {
        let (mut logger, buf) = test_logger();
        logger.set_level(LogLv::Silent);
        logger.wtf("the building is on fire").unwrap();
        assert!(buf.contents().is_empty());
    }

    #[test]
    fn titled_call_puts_title_in_the_header() {
        let (logger, buf) = test_logger();
        logger.i_with("req-42", "handled").unwrap();
        let plain = buf.plain();
        assert!(plain.contains("req-42"));
        assert!(plain.contains("handled"));
    }

    #[test]
    fn untitled_call_promotes_message_to_body() {
        let (logger, buf) = test_logger();
        logger.e(vec!["a", "b"]).unwrap();
        let plain = buf.plain();
        assert!(plain.contains("\"a\""));
        assert!(plain.contains("\"b\""));
    }

    #[test]
    fn structured_value_renders_multiline() {
        let (logger, buf) = test_logger();
        let value = LogValue::Map(vec![
            ("x".to_string(), LogValue::Int(1)),
            ("y".to_string(), LogValue::Int(2)),
        ]);
        logger.d(value).unwrap();
        let plain = buf.plain();
        // 4 body lines → large design with a summary row
        assert!(plain.contains("L,"));
        assert!(plain.contains("x: 1"));
    }

    #[test]
    fn child_shares_the_sink() {
        let (logger, buf) = test_logger();
        let child = logger.child("sub");
        assert_eq!(child.name(), "sub");
        child.i("from child").unwrap();
        assert!(buf.plain().contains("from child"));
    }

    #[test]
    fn per_level_tags_show_in_the_badge() {
        let (logger, buf) = test_logger();
        logger.w("careful").unwrap();
        assert!(buf.plain().contains(" W "));
    }

    #[test]
    fn code_uses_the_code_background() {
        let (mut logger, buf) = test_logger();
        logger.set_code_theme(".hljs { background: #1E1E1E; color: #DCDCDC; }");
        logger.code("fn main() {}").unwrap();
        let out = buf.contents();
        assert!(out.contains("\x1b[48;2;30;30;30m"));
        assert!(strip_ansi(&out).contains("fn main() {}"));
        assert!(strip_ansi(&out).contains("Code"));
    }

    #[test]
    fn highlighter_is_used_for_plain_bodies() {
        struct Pink;
        impl Highlighter for Pink {
            fn highlight(&self, _lang: Option<&str>, source: &str, _sheet: &Sheet) -> String {
                format!("\x1b[35m{source}\x1b[0m")
            }
        }
        let (mut logger, buf) = test_logger();
        logger.set_highlighter(Arc::new(Pink));
        logger.i("plain").unwrap();
        assert!(buf.contents().contains("\x1b[35mplain"));
    }

    #[test]
    fn already_styled_bodies_are_not_rehighlighted() {
        struct Panics;
        impl Highlighter for Panics {
            fn highlight(&self, _: Option<&str>, _: &str, _: &Sheet) -> String {
                panic!("must not be called for pre-styled bodies");
            }
        }
        let (mut logger, buf) = test_logger();
        logger.set_highlighter(Arc::new(Panics));
        logger.i("\x1b[32malready green\x1b[0m").unwrap();
        assert!(buf.plain().contains("already green"));
    }

    #[test]
    fn caller_resolution_can_be_disabled() {
        let (mut logger, buf) = test_logger();
        logger.set_caller_resolution(false);
        logger.i("no footer").unwrap();
        assert!(!buf.plain().contains("logger.rs"));
    }

    #[test]
    fn timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 9);
        assert!(ts.starts_with('A') || ts.starts_with('P'));
        let bytes = ts.as_bytes();
        assert_eq!(bytes[3], b':');
        assert_eq!(bytes[6], b':');
    }

    #[test]
    fn theme_parse_updates_the_sheet() {
        let mut logger = Logger::named("t");
        let sheet = logger.set_code_theme(
            ".hljs { background: #101010; color: #fafafa; }\n.hljs-keyword { color: #569CD6; }",
        );
        assert!(sheet.token("keyword").is_some());
        assert_eq!(sheet.background, Some(Rgb::new(0x10, 0x10, 0x10)));
    }
}
