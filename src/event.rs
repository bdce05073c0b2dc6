use std::fmt;

use serde::Serialize;

use crate::errors::IntervalError;
use crate::timestamp::format_timestamp;

// @module: Timestamped subtitle text

/// Width the time range column is padded to when displayed
const RANGE_COLUMN_WIDTH: usize = 32;

/// A closed time interval `[start, end]` in seconds with its text.
///
/// Events are validated on construction and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleEvent {
    start: f64,
    end: f64,
    text: String,
}

impl SubtitleEvent {
    /// Build an event, rejecting negative, non-finite or reversed bounds
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Result<Self, IntervalError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(IntervalError::NotFinite { start, end });
        }
        if start < 0.0 || end < 0.0 {
            return Err(IntervalError::Negative { start, end });
        }
        if end < start {
            return Err(IntervalError::Reversed { start, end });
        }
        Ok(Self {
            start,
            end,
            text: text.into(),
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` lies inside the interval, both ends included
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Whether the two closed intervals share at least one instant
    pub fn overlaps(&self, other: &SubtitleEvent) -> bool {
        self.overlaps_range(other.start, other.end)
    }

    pub(crate) fn overlaps_range(&self, start: f64, end: f64) -> bool {
        self.start <= end && start <= self.end
    }
}

impl fmt::Display for SubtitleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = format!("{} - {}", format_timestamp(self.start), format_timestamp(self.end));
        write!(f, "{:<width$}{}", range, self.text, width = RANGE_COLUMN_WIDTH)
    }
}
