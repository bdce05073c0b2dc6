use std::path::Path;

use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;
use crate::event::SubtitleEvent;
use crate::query::Track;
use crate::timestamp::ASS_FORMAT;

use super::{SubtitleReader, check_extension, is_blank, read_source, split_lines};

// @module: ASS track reader

// @const: Section header line, e.g. "[Events]"
static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[.*]\s*$").unwrap());

const EVENTS_SECTION: &str = "Events";
const FORMAT_TAG: &str = "Format";
const DIALOGUE_TAG: &str = "Dialogue";
const COMMENT_TAG: &str = "Comment";
const TAG_SEPARATOR: &str = ": ";
const START_COLUMN: &str = "Start";
const END_COLUMN: &str = "End";
const TEXT_COLUMN: &str = "Text";

/// Reader for `.ass` files.
///
/// Only the `[Events]` section is read. Its first line must be a `Format:`
/// declaration whose last column is `Text`, so that commas inside dialogue
/// survive the comma split. `Comment:` lines are validated and dropped.
#[derive(Debug, Clone)]
pub struct AssReader {
    track: Track,
}

/// Column positions declared by a `Format:` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    start: usize,
    end: usize,
    text: usize,
    count: usize,
}

/// Kind of an event line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Dialogue,
    Comment,
}

impl AssReader {
    /// Load and parse the file at `path` in strict mode
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        Self::open_with(path, true)
    }

    /// Load and parse the file at `path`.
    ///
    /// With `strict` set the file must hold exactly one `[Events]` section;
    /// otherwise every such section is read in file order.
    pub fn open_with<P: AsRef<Path>>(path: P, strict: bool) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        check_extension(path, Self::EXTENSIONS)?;
        let content = read_source(path)?;
        let reader = Self::parse_with(&content, strict)?;
        debug!("Loaded {} ASS events from {}", reader.track.len(), path.display());
        Ok(reader)
    }

    /// Parse ASS content in strict mode
    pub fn parse(content: &str) -> Result<Self, SubtitleError> {
        Self::parse_with(content, true)
    }

    pub fn parse_with(content: &str, strict: bool) -> Result<Self, SubtitleError> {
        let lines = split_lines(content);
        let starts = section_starts(&lines, EVENTS_SECTION);

        if strict {
            match starts.len() {
                0 => return Err(SubtitleError::MissingEventsSection),
                1 => {}
                count => return Err(SubtitleError::DuplicateEventsSection { count }),
            }
        } else if starts.is_empty() {
            warn!("No [Events] section found, track is empty");
        }

        let mut events = Vec::new();
        for start in starts {
            let end = section_end(&lines, start);
            parse_events_section(&lines, start, end, &mut events)?;
        }

        let track = Track::new(events);
        if !track.is_sorted() {
            debug!("ASS events are not in chronological order");
        }
        Ok(Self { track })
    }

    pub fn into_track(self) -> Track {
        self.track
    }
}

impl SubtitleReader for AssReader {
    const EXTENSIONS: &'static [&'static str] = &[".ass"];

    fn track(&self) -> &Track {
        &self.track
    }
}

/// Name between the brackets of a header line, if `line` is one
fn header_name(line: &str) -> Option<&str> {
    if !HEADER_REGEX.is_match(line) {
        return None;
    }
    let open = line.find('[')?;
    let close = line.find(']')?;
    line.get(open + 1..close)
}

/// Indices of every header line named `name`
fn section_starts(lines: &[&str], name: &str) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| header_name(line) == Some(name))
        .map(|(i, _)| i)
        .collect()
}

/// Index of the next header after `start`, or the line count
fn section_end(lines: &[&str], start: usize) -> usize {
    lines[start + 1..]
        .iter()
        .position(|line| header_name(line).is_some())
        .map_or(lines.len(), |offset| start + 1 + offset)
}

fn parse_events_section(
    lines: &[&str],
    start: usize,
    end: usize,
    events: &mut Vec<SubtitleEvent>,
) -> Result<(), SubtitleError> {
    let format_index = start + 1;
    if format_index >= end {
        return Err(SubtitleError::MissingFormatLine { line: start + 1 });
    }
    let layout = parse_format_line(lines[format_index], format_index + 1)?;
    trace!("Events section at line {} uses layout {:?}", start + 1, layout);

    let mut comments = 0;
    for (index, line) in lines.iter().enumerate().take(end).skip(format_index + 1) {
        if is_blank(line) {
            continue;
        }
        let (kind, event) = parse_event_line(line, &layout, index + 1)?;
        match kind {
            LineKind::Dialogue => events.push(event),
            LineKind::Comment => comments += 1,
        }
    }

    if comments > 0 {
        debug!("Skipped {} comment lines in Events section at line {}", comments, start + 1);
    }
    Ok(())
}

/// Parse `Format: Layer, Start, End, ..., Text`
fn parse_format_line(content: &str, line: usize) -> Result<ColumnLayout, SubtitleError> {
    let columns: Vec<&str> = match content.split_once(TAG_SEPARATOR) {
        Some((FORMAT_TAG, payload)) => payload.split(',').map(str::trim).collect(),
        _ => return Err(SubtitleError::MissingFormatLine { line }),
    };

    let position = |name: &str| {
        columns
            .iter()
            .position(|column| *column == name)
            .ok_or_else(|| SubtitleError::MissingColumn {
                line,
                column: name.to_string(),
            })
    };
    let layout = ColumnLayout {
        start: position(START_COLUMN)?,
        end: position(END_COLUMN)?,
        text: position(TEXT_COLUMN)?,
        count: columns.len(),
    };

    if layout.text != layout.count - 1 {
        return Err(SubtitleError::TextNotLast { line });
    }
    Ok(layout)
}

/// Parse a `Dialogue:` or `Comment:` line against `layout`
fn parse_event_line(
    content: &str,
    layout: &ColumnLayout,
    line: usize,
) -> Result<(LineKind, SubtitleEvent), SubtitleError> {
    let Some((tag, payload)) = content.split_once(TAG_SEPARATOR) else {
        return Err(SubtitleError::UnknownLineType {
            line,
            tag: content.trim().to_string(),
        });
    };
    let kind = match tag {
        DIALOGUE_TAG => LineKind::Dialogue,
        COMMENT_TAG => LineKind::Comment,
        _ => {
            return Err(SubtitleError::UnknownLineType {
                line,
                tag: tag.to_string(),
            });
        }
    };

    let fields: Vec<&str> = payload.split(',').collect();
    if fields.len() < layout.count {
        return Err(SubtitleError::TooFewFields {
            line,
            expected: layout.count,
            found: fields.len(),
        });
    }

    let parse = |stamp: &str| {
        ASS_FORMAT
            .parse(stamp)
            .map_err(|source| SubtitleError::Timestamp { line, source })
    };
    let start = parse(fields[layout.start])?;
    let end = parse(fields[layout.end])?;
    let text = fields[layout.text..].join(",");

    let event = SubtitleEvent::new(start, end, text)
        .map_err(|source| SubtitleError::Interval { line, source })?;
    Ok((kind, event))
}
