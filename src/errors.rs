/*!
 * Error types for the subminer library.
 *
 * Each failure path of the timing engine is a distinct variant so callers can
 * tell a broken file layout from a bad timestamp or a reversed interval.
 * Variants are grouped into four kinds, see [`ErrorKind`].
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the timestamp grammar
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// `%` followed by a key that is not a known marker
    #[error("unknown marker '%{key}' in timestamp format '{format}'")]
    UnknownMarker { key: char, format: String },

    /// `%` as the last character of the format
    #[error("timestamp format '{format}' ends with a dangling '%'")]
    DanglingMarker { format: String },

    /// A literal character of the format does not match the input
    #[error("expected '{expected}' but found '{found}' in '{input}' (format '{format}')")]
    LiteralMismatch {
        expected: char,
        found: char,
        input: String,
        format: String,
    },

    /// A strict marker consumed a digit run of the wrong width
    #[error("marker '%{marker}' needs {expected} digits but found {found} in '{input}' (format '{format}')")]
    DigitWidth {
        marker: char,
        expected: usize,
        found: usize,
        input: String,
        format: String,
    },

    /// Input ran out while the format still had tokens
    #[error("input '{input}' ended before format '{format}' was complete")]
    InputExhausted { input: String, format: String },

    /// Format ran out while the input still had characters
    #[error("unexpected trailing '{remaining}' in '{input}' (format '{format}')")]
    TrailingInput {
        remaining: String,
        input: String,
        format: String,
    },
}

/// Errors raised when building a subtitle event from two bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntervalError {
    #[error("{start}-{end} is not a finite time range")]
    NotFinite { start: f64, end: f64 },

    #[error("{start}-{end} has a negative bound")]
    Negative { start: f64, end: f64 },

    #[error("{start}-{end} ends before it starts")]
    Reversed { start: f64, end: f64 },
}

/// Broad category of a [`SubtitleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing file, unsupported extension, unreadable content
    Input,
    /// Broken file layout: sections, declarations, block shape
    Structural,
    /// A line or timestamp that does not follow its grammar
    Grammar,
    /// An event whose end precedes its start, or a negative bound
    Ordering,
}

/// Errors that can occur while loading a subtitle track
#[derive(Error, Debug)]
pub enum SubtitleError {
    #[error("no file at path {0}")]
    FileNotFound(PathBuf),

    #[error("file type '{extension}' of {path} is not supported (expected one of: {supported})")]
    UnsupportedExtension {
        path: PathBuf,
        extension: String,
        supported: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no [Events] section found")]
    MissingEventsSection,

    #[error("expected exactly one [Events] section, found {count}")]
    DuplicateEventsSection { count: usize },

    #[error("line {line}: [Events] section must be followed by a 'Format: ' line")]
    MissingFormatLine { line: usize },

    #[error("line {line}: format declaration has no '{column}' column")]
    MissingColumn { line: usize, column: String },

    #[error("line {line}: 'Text' must be the last declared column")]
    TextNotLast { line: usize },

    #[error("line {line}: truncated block, need an index, a time range and text")]
    TruncatedBlock { line: usize },

    #[error("line {line}: block has no text")]
    MissingText { line: usize },

    #[error("line {line}: '{tag}' is not a Dialogue or Comment line")]
    UnknownLineType { line: usize, tag: String },

    #[error("line {line}: time range '{content}' has no '-->' separator")]
    MissingTimeSeparator { line: usize, content: String },

    #[error("line {line}: expected at least {expected} fields, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {source}")]
    Timestamp {
        line: usize,
        #[source]
        source: TimestampError,
    },

    #[error("line {line}: {source}")]
    Interval {
        line: usize,
        #[source]
        source: IntervalError,
    },
}

impl SubtitleError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) | Self::UnsupportedExtension { .. } | Self::Io { .. } => {
                ErrorKind::Input
            }
            Self::MissingEventsSection
            | Self::DuplicateEventsSection { .. }
            | Self::MissingFormatLine { .. }
            | Self::MissingColumn { .. }
            | Self::TextNotLast { .. }
            | Self::TruncatedBlock { .. }
            | Self::MissingText { .. } => ErrorKind::Structural,
            Self::UnknownLineType { .. }
            | Self::MissingTimeSeparator { .. }
            | Self::TooFewFields { .. }
            | Self::Timestamp { .. } => ErrorKind::Grammar,
            Self::Interval { .. } => ErrorKind::Ordering,
        }
    }

    /// 1-based line the error was found on, if it belongs to one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingFormatLine { line }
            | Self::MissingColumn { line, .. }
            | Self::TextNotLast { line }
            | Self::TruncatedBlock { line }
            | Self::MissingText { line }
            | Self::UnknownLineType { line, .. }
            | Self::MissingTimeSeparator { line, .. }
            | Self::TooFewFields { line, .. }
            | Self::Timestamp { line, .. }
            | Self::Interval { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error while loading a subtitle track
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error parsing an operator-entered timestamp
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
