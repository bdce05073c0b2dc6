use anyhow::{Result, Context};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::reader::SubtitleFormat;

// @module: Subtitle file discovery and format sniffing

// @const: Bytes read from a file whose extension says nothing
const SNIFF_BYTES: u64 = 4096;

// @const: First SRT block, index line followed by a time range
static SRT_SNIFF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\s*\r?\n\s*\d{1,2}:\d{2}:\d{2},\d{3}\s*-->").unwrap()
});

// @const: ASS section header
static ASS_SNIFF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\[(Script Info|Events)\]\s*$").unwrap()
});

// @struct: Subtitle file discovery
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Recursively find subtitle files under `dir`, sorted by path.
    ///
    /// Files with a supported extension are taken as is; any other file is
    /// kept when its first bytes look like SRT or ASS.
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<(PathBuf, SubtitleFormat)>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow::anyhow!("Directory does not exist: {:?}", dir));
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", dir))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let FileType::Subtitle(format) = Self::detect_file_type(entry.path())? {
                found.push((entry.into_path(), format));
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found)
    }

    /// Detect the subtitle format of a file from its extension, then its content
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(anyhow::anyhow!("No subtitle candidate at {:?}", path));
        }

        if let Some(format) = SubtitleFormat::from_path(path) {
            return Ok(FileType::Subtitle(format));
        }

        // No known extension, sniff the content
        let head = Self::read_head(path)?;
        if ASS_SNIFF_REGEX.is_match(&head) {
            return Ok(FileType::Subtitle(SubtitleFormat::Ass));
        }
        if head.contains("-->") && SRT_SNIFF_REGEX.is_match(&head) {
            return Ok(FileType::Subtitle(SubtitleFormat::Srt));
        }

        Ok(FileType::Unknown)
    }

    fn read_head(path: &Path) -> Result<String> {
        let mut head = Vec::new();
        File::open(path)
            .and_then(|file| file.take(SNIFF_BYTES).read_to_end(&mut head))
            .with_context(|| format!("Failed to read {:?}", path))?;
        Ok(String::from_utf8_lossy(&head).into_owned())
    }
}

/// Outcome of format detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file in a known format
    Subtitle(SubtitleFormat),
    /// Unknown file type
    Unknown,
}
