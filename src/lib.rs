/*!
 * # subminer - subtitle timing engine
 *
 * A Rust library that loads subtitle tracks into a uniform timeline of
 * timestamped text events and answers time queries against it, so that
 * independently timed tracks (a source language and its translation) can be
 * lined up moment by moment.
 *
 * ## Features
 *
 * - SRT and ASS track readers with fail-fast structural validation
 * - A small declarative timestamp grammar (`%h:%m:%s,%M`, `%m:%s.%C`, ...)
 *   used for in-file timestamps and operator input alike
 * - Point queries (events active at an instant) and range queries
 *   (events overlapping another event)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timestamp`: Timestamp grammar
 * - `event`: The validated `SubtitleEvent` value
 * - `query`: `TimeQuery` and the `Track` it runs over
 * - `reader`: Format readers:
 *   - `reader::srt`: SRT reader
 *   - `reader::ass`: ASS reader
 *   - `reader::master`: Extension-based dispatch between the two
 * - `app_config`: Configuration management
 * - `app_controller`: Operations behind the command line tool
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod event;
pub mod file_utils;
pub mod query;
pub mod reader;
pub mod timestamp;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ErrorKind, IntervalError, SubtitleError, TimestampError};
pub use event::SubtitleEvent;
pub use query::{TimeQuery, Track};
pub use reader::{AssReader, MasterReader, SrtReader, SubtitleReader};
pub use timestamp::{TimestampFormat, parse_timestamp};
