//! Error types for logsift.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in logsift operations.
#[derive(Error, Debug)]
pub enum LogsiftError {
    /// A log line is structurally malformed (missing fields)
    #[error("malformed log line {line_no}: {reason}: {line:?}")]
    MalformedLine {
        line_no: u64,
        reason: &'static str,
        line: String,
    },

    /// A log line's timestamp could not be parsed
    #[error("bad timestamp on line {line_no}: {text:?}")]
    BadTimestamp { line_no: u64, text: String },

    /// A log line's byte count could not be parsed
    #[error("bad byte count on line {line_no}: {text:?}")]
    BadByteCount { line_no: u64, text: String },

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
