use std::fmt;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::errors::SubtitleError;
use crate::query::Track;

use super::{
    AssReader, SUPPORTED_EXTENSIONS, SrtReader, SubtitleReader, normalize_extension, read_source,
};

// @module: Extension-based reader dispatch

/// Known on-disk subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Ass,
}

impl SubtitleFormat {
    /// Format whose reader declares `extension` (`.srt`, `.ASS`, ...)
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        if SrtReader::EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Srt)
        } else if AssReader::EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Ass)
        } else {
            None
        }
    }

    /// Format of `path`, judged by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        normalize_extension(path).and_then(|ext| Self::from_extension(&ext))
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Srt => write!(f, "srt"),
            Self::Ass => write!(f, "ass"),
        }
    }
}

/// Options applied when a reader is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Require exactly one `[Events]` section in ASS files
    pub strict_ass: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { strict_ass: true }
    }
}

/// Reader for any supported format, chosen by file extension
#[derive(Debug, Clone)]
pub enum MasterReader {
    Srt(SrtReader),
    Ass(AssReader),
}

impl MasterReader {
    /// Load `path` with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        Self::open_with(path, ReaderOptions::default())
    }

    /// Load `path`, failing on an unsupported extension before reading it
    pub fn open_with<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let format = SubtitleFormat::from_path(path).ok_or_else(|| {
            SubtitleError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: normalize_extension(path).unwrap_or_default(),
                supported: SUPPORTED_EXTENSIONS.join(", "),
            }
        })?;
        Self::open_as(path, format, options)
    }

    /// Load `path` as `format` whatever its extension, e.g. after content sniffing
    pub fn open_as<P: AsRef<Path>>(
        path: P,
        format: SubtitleFormat,
        options: ReaderOptions,
    ) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let content = read_source(path)?;
        let reader = Self::parse(&content, format, options)?;
        debug!(
            "Loaded {} events from {} as {}",
            reader.track().len(),
            path.display(),
            format
        );
        Ok(reader)
    }

    /// Parse in-memory `content` as `format`
    pub fn parse(content: &str, format: SubtitleFormat, options: ReaderOptions) -> Result<Self, SubtitleError> {
        match format {
            SubtitleFormat::Srt => SrtReader::parse(content).map(Self::Srt),
            SubtitleFormat::Ass => AssReader::parse_with(content, options.strict_ass).map(Self::Ass),
        }
    }

    /// Every extension accepted by some reader
    pub fn supported_extensions() -> &'static [&'static str] {
        SUPPORTED_EXTENSIONS
    }

    pub fn format(&self) -> SubtitleFormat {
        match self {
            Self::Srt(_) => SubtitleFormat::Srt,
            Self::Ass(_) => SubtitleFormat::Ass,
        }
    }

    pub fn into_track(self) -> Track {
        match self {
            Self::Srt(reader) => reader.into_track(),
            Self::Ass(reader) => reader.into_track(),
        }
    }
}

impl SubtitleReader for MasterReader {
    const EXTENSIONS: &'static [&'static str] = SUPPORTED_EXTENSIONS;

    fn track(&self) -> &Track {
        match self {
            Self::Srt(reader) => reader.track(),
            Self::Ass(reader) => reader.track(),
        }
    }
}
