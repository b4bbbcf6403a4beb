//! Error types for the layout and rendering pipeline.

use thiserror::Error;

/// Errors surfaced by the text metrics, slicer, and composer.
#[derive(Debug, Error)]
pub enum Error {
    /// Single-line input contained a `\n`.
    ///
    /// Width measurement and slicing are deliberately single-line so they
    /// stay O(line length) and stateless. Splitting on newlines is the
    /// caller's job; violating the contract is a programmer error.
    #[error("line separator is not allowed in single-line input")]
    LineSeparator,

    /// Writing the composed block to the output sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
