/*!
 * Time queries over a loaded track.
 *
 * Tracks are small and queried interactively, so every query is a linear
 * scan that keeps the events in file order.
 */

use serde::Serialize;

use crate::event::SubtitleEvent;

/// What to look for in a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeQuery {
    /// Events active at an instant, `start <= t <= end`
    Point(f64),
    /// Events intersecting a closed interval
    Range { start: f64, end: f64 },
}

impl TimeQuery {
    /// Whether `event` satisfies this query
    pub fn matches(&self, event: &SubtitleEvent) -> bool {
        match *self {
            Self::Point(t) => event.contains(t),
            Self::Range { start, end } => event.overlaps_range(start, end),
        }
    }
}

impl From<&SubtitleEvent> for TimeQuery {
    fn from(event: &SubtitleEvent) -> Self {
        Self::Range {
            start: event.start(),
            end: event.end(),
        }
    }
}

/// Ordered, immutable sequence of events parsed from one file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Track {
    events: Vec<SubtitleEvent>,
}

impl Track {
    pub fn new(events: Vec<SubtitleEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[SubtitleEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether start times never decrease in file order
    pub fn is_sorted(&self) -> bool {
        self.events.windows(2).all(|w| w[0].start() <= w[1].start())
    }

    /// Events matching `query`, in file order
    pub fn query(&self, query: &TimeQuery) -> Vec<&SubtitleEvent> {
        self.events.iter().filter(|e| query.matches(e)).collect()
    }

    /// Events active at `t`
    pub fn at(&self, t: f64) -> Vec<&SubtitleEvent> {
        self.query(&TimeQuery::Point(t))
    }

    /// Events whose interval intersects `other`'s
    pub fn overlapping(&self, other: &SubtitleEvent) -> Vec<&SubtitleEvent> {
        self.query(&TimeQuery::from(other))
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a SubtitleEvent;
    type IntoIter = std::slice::Iter<'a, SubtitleEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
