//! Error types for csvpreview

use std::fmt;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, PreviewError>;

/// Why CSV text could not be turned into a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorReason {
    /// A quoted field was still open when the input ended
    UnterminatedQuote,
}

impl ParseErrorReason {
    /// Stable machine-readable name of the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorReason::UnterminatedQuote => "unterminated-quote",
        }
    }
}

impl fmt::Display for ParseErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while loading, parsing or rendering a preview
#[derive(Debug, Error)]
pub enum PreviewError {
    /// CSV text is structurally unrecoverable
    ///
    /// `line` is the 1-based physical line where the offending record started.
    #[error("CSV parse error at line {line}: {reason}")]
    Parse {
        reason: ParseErrorReason,
        line: usize,
    },

    /// The document could not be read
    #[error("Read error: {0}")]
    Read(String),

    /// The document was rejected by the CSV gate
    #[error("The current file does not appear to be a CSV file: {0}")]
    NotCsv(String),

    /// Writing rendered output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewError {
    /// Parse failure reason, if this is a parse error
    pub fn parse_reason(&self) -> Option<ParseErrorReason> {
        match self {
            PreviewError::Parse { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
