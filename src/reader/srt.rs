use std::path::Path;

use log::{debug, warn};

use crate::errors::SubtitleError;
use crate::event::SubtitleEvent;
use crate::query::Track;
use crate::timestamp::SRT_FORMAT;

use super::{SubtitleReader, check_extension, is_blank, read_source, split_lines};

// @module: SRT track reader

/// Separator between the two timestamps of a block
const TIME_RANGE_SEPARATOR: &str = "-->";

/// Lines every block needs: index, time range, first text line
const MIN_BLOCK_LINES: usize = 3;

/// Reader for `.srt` files.
///
/// A file is a list of blocks separated by blank lines:
///
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:02,500
/// Hello
/// ```
#[derive(Debug, Clone)]
pub struct SrtReader {
    track: Track,
}

impl SrtReader {
    /// Load and parse the file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        check_extension(path, Self::EXTENSIONS)?;
        let content = read_source(path)?;
        let reader = Self::parse(&content)?;
        debug!("Loaded {} SRT events from {}", reader.track.len(), path.display());
        Ok(reader)
    }

    /// Parse SRT content
    pub fn parse(content: &str) -> Result<Self, SubtitleError> {
        let lines = split_lines(content);
        let mut cursor = 0;
        let mut events = Vec::new();

        loop {
            while cursor < lines.len() && is_blank(lines[cursor]) {
                cursor += 1;
            }
            if cursor == lines.len() {
                break;
            }
            let (event, next) = parse_block(&lines, cursor)?;
            events.push(event);
            cursor = next;
        }

        let track = Track::new(events);
        if !track.is_sorted() {
            warn!("SRT blocks are not in chronological order");
        }
        Ok(Self { track })
    }

    pub fn into_track(self) -> Track {
        self.track
    }
}

impl SubtitleReader for SrtReader {
    const EXTENSIONS: &'static [&'static str] = &[".srt"];

    fn track(&self) -> &Track {
        &self.track
    }
}

/// Parse the block starting at `start`, returning it and the index past it
fn parse_block(lines: &[&str], start: usize) -> Result<(SubtitleEvent, usize), SubtitleError> {
    if lines.len() - start < MIN_BLOCK_LINES {
        return Err(SubtitleError::TruncatedBlock { line: start + 1 });
    }

    let index = lines[start].trim();
    if index.parse::<u64>().is_err() {
        warn!("Line {}: block index '{}' is not a number", start + 1, index);
    }

    let time_line = start + 1;
    let (begin, end) = parse_time_range(lines[time_line], time_line + 1)?;

    let text_start = time_line + 1;
    let text_end = lines[text_start..]
        .iter()
        .position(|line| is_blank(line))
        .map_or(lines.len(), |offset| text_start + offset);
    if text_end == text_start {
        return Err(SubtitleError::MissingText { line: text_start + 1 });
    }

    let text = lines[text_start..text_end].join("\n");
    let event = SubtitleEvent::new(begin, end, text).map_err(|source| SubtitleError::Interval {
        line: time_line + 1,
        source,
    })?;
    Ok((event, text_end))
}

/// Parse `<start> --> <end>` into seconds
fn parse_time_range(content: &str, line: usize) -> Result<(f64, f64), SubtitleError> {
    let (begin, end) = content.split_once(TIME_RANGE_SEPARATOR).ok_or_else(|| {
        SubtitleError::MissingTimeSeparator {
            line,
            content: content.to_string(),
        }
    })?;
    let parse = |stamp: &str| {
        SRT_FORMAT
            .parse(stamp.trim())
            .map_err(|source| SubtitleError::Timestamp { line, source })
    };
    Ok((parse(begin)?, parse(end)?))
}
