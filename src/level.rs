//! Log severity levels.
//!
//! A flat, totally ordered gate: a call at level `L` is emitted iff the
//! logger's configured level is `<= L`. `All` and `Silent` are convenience
//! aliases for the two extremes; there are no transitions beyond direct
//! assignment via [`crate::Logger::set_level`].

/// Log severity, ordered from chattiest to silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LogLv {
    /// Emit everything.
    #[default]
    All = 0,
    Verbose = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Assert = 6,
    /// Emit nothing.
    Silent = 7,
}

impl LogLv {
    /// Short uppercase name, e.g. for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Verbose => "VERBOSE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Assert => "ASSERT",
            Self::Silent => "SILENT",
        }
    }
}
