/*!
 * Subtitle track readers.
 *
 * Two concrete readers exist, one per on-disk format, and [`MasterReader`]
 * picks between them by file extension. The set is closed: there is no
 * registration of further formats.
 */

use std::fs;
use std::path::Path;

use log::trace;

use crate::errors::SubtitleError;
use crate::event::SubtitleEvent;
use crate::query::{TimeQuery, Track};

pub mod ass;
pub mod master;
pub mod srt;

pub use ass::AssReader;
pub use master::{MasterReader, ReaderOptions, SubtitleFormat};
pub use srt::SrtReader;

/// Every extension some reader accepts, lowercase with the leading dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".srt", ".ass"];

/// Common query surface of a loaded subtitle track
pub trait SubtitleReader {
    /// Extensions this reader accepts, lowercase with the leading dot
    const EXTENSIONS: &'static [&'static str];

    /// The parsed events, in file order
    fn track(&self) -> &Track;

    fn at(&self, t: f64) -> Vec<&SubtitleEvent> {
        self.track().at(t)
    }

    fn overlapping(&self, other: &SubtitleEvent) -> Vec<&SubtitleEvent> {
        self.track().overlapping(other)
    }

    fn query(&self, query: &TimeQuery) -> Vec<&SubtitleEvent> {
        self.track().query(query)
    }
}

/// Extension of `path` as `.ext`, lowercased
pub fn normalize_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
}

/// Fail unless `path` carries one of `allowed`
pub(crate) fn check_extension(path: &Path, allowed: &[&str]) -> Result<(), SubtitleError> {
    match normalize_extension(path) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        other => Err(SubtitleError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: other.unwrap_or_default(),
            supported: allowed.join(", "),
        }),
    }
}

/// Read a subtitle file as UTF-8
pub(crate) fn read_source(path: &Path) -> Result<String, SubtitleError> {
    if !path.is_file() {
        return Err(SubtitleError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| SubtitleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    trace!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Split content into lines, dropping a leading byte order mark
pub(crate) fn split_lines(content: &str) -> Vec<&str> {
    content.strip_prefix('\u{feff}').unwrap_or(content).lines().collect()
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
