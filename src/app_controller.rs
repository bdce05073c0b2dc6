use anyhow::{Result, Context, anyhow};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, OutputFormat};
use crate::event::SubtitleEvent;
use crate::file_utils::FileManager;
use crate::query::Track;
use crate::reader::{MasterReader, SubtitleFormat, SubtitleReader};
use crate::timestamp::TimestampFormat;

// @module: Application controller for subtitle queries

/// Width of the "n)" prefix in numbered listings
const INDEX_COLUMN_WIDTH: usize = 4;

/// One source event and the target events overlapping it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    pub source: SubtitleEvent,
    pub matches: Vec<SubtitleEvent>,
}

/// A subtitle file found by a directory scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub format: SubtitleFormat,
    pub events: Option<usize>,
    pub error: Option<String>,
}

/// Main application controller for subtitle lookups
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Compiled operator timestamp grammar
    grammar: TimestampFormat,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let grammar = config.timestamp_grammar()?;
        Ok(Self { config, grammar })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a timestamp typed by the operator with the configured grammar
    pub fn parse_user_timestamp(&self, input: &str) -> Result<f64> {
        self.grammar
            .parse(input.trim())
            .with_context(|| format!("Invalid timestamp '{}', expected format {}", input, self.grammar))
    }

    /// Load a subtitle track, picking the reader by extension
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<MasterReader> {
        let path = path.as_ref();
        MasterReader::open_with(path, self.config.reader_options())
            .with_context(|| format!("Failed to load subtitles from {:?}", path))
    }

    /// Events of `path` active at the operator timestamp `at`
    pub fn lookup<P: AsRef<Path>>(&self, path: P, at: &str) -> Result<Vec<SubtitleEvent>> {
        let t = self.parse_user_timestamp(at)?;
        let reader = self.load(path)?;
        let events: Vec<SubtitleEvent> = reader.at(t).into_iter().cloned().collect();
        debug!("{} events active at {}", events.len(), t);
        Ok(events)
    }

    /// Pair each source event with the overlapping target events.
    ///
    /// With `at` set only source events active at that instant are aligned.
    pub fn align<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        source: P1,
        target: P2,
        at: Option<&str>,
    ) -> Result<Vec<Alignment>> {
        let t = at.map(|input| self.parse_user_timestamp(input)).transpose()?;
        let source = self.load(source)?;
        let target = self.load(target)?;

        let candidates: Vec<&SubtitleEvent> = match t {
            Some(t) => source.at(t),
            None => source.track().iter().collect(),
        };

        let alignments: Vec<Alignment> = candidates
            .into_iter()
            .map(|event| Alignment {
                source: event.clone(),
                matches: target.overlapping(event).into_iter().cloned().collect(),
            })
            .collect();

        let unmatched = alignments.iter().filter(|a| a.matches.is_empty()).count();
        if unmatched > 0 {
            warn!("{} of {} source events have no overlapping target event", unmatched, alignments.len());
        }
        Ok(alignments)
    }

    /// Every event of `path`
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<Track> {
        Ok(self.load(path)?.into_track())
    }

    /// Find subtitle files under `dir` and try loading each one
    pub fn scan<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<ScanEntry>> {
        let dir = dir.as_ref();
        let files = FileManager::find_subtitle_files(dir)?;
        info!("Found {} subtitle file(s) in {:?}", files.len(), dir);

        let entries = files
            .into_iter()
            .map(|(path, format)| {
                let loaded = MasterReader::open_as(&path, format, self.config.reader_options());
                match loaded {
                    Ok(reader) => ScanEntry {
                        path,
                        format,
                        events: Some(reader.track().len()),
                        error: None,
                    },
                    Err(e) => ScanEntry {
                        path,
                        format,
                        events: None,
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect();
        Ok(entries)
    }

    /// Render query matches in the configured output format, capped at `max_results`
    pub fn render_events(&self, events: &[SubtitleEvent]) -> Result<String> {
        self.render_event_list(events, self.limit(events))
    }

    /// Render a whole track in the configured output format, without any cap
    pub fn render_track(&self, track: &Track) -> Result<String> {
        self.render_event_list(track.events(), track.events())
    }

    fn render_event_list(&self, events: &[SubtitleEvent], shown: &[SubtitleEvent]) -> Result<String> {
        match self.config.output {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(shown)?),
            OutputFormat::Text => {
                if events.is_empty() {
                    return Ok("No subtitles found\n".to_string());
                }
                let mut out = String::new();
                for (i, event) in shown.iter().enumerate() {
                    writeln!(out, "{:<width$}{}", format!("{})", i), event, width = INDEX_COLUMN_WIDTH)?;
                }
                self.write_hidden_count(&mut out, events.len(), shown.len())?;
                Ok(out)
            }
        }
    }

    /// Render alignments in the configured output format
    pub fn render_alignments(&self, alignments: &[Alignment]) -> Result<String> {
        match self.config.output {
            OutputFormat::Json => {
                let limited: Vec<Alignment> = alignments
                    .iter()
                    .map(|a| Alignment {
                        source: a.source.clone(),
                        matches: self.limit(&a.matches).to_vec(),
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&limited)?)
            }
            OutputFormat::Text => {
                let mut out = String::new();
                for alignment in alignments {
                    writeln!(out, "{}", alignment.source)?;
                    let shown = self.limit(&alignment.matches);
                    if shown.is_empty() {
                        writeln!(out, "{:<width$}(no overlapping subtitles)", "", width = INDEX_COLUMN_WIDTH)?;
                    }
                    for (i, event) in shown.iter().enumerate() {
                        writeln!(out, "{:<width$}{}", format!("{})", i), event, width = INDEX_COLUMN_WIDTH)?;
                    }
                    self.write_hidden_count(&mut out, alignment.matches.len(), shown.len())?;
                }
                Ok(out)
            }
        }
    }

    /// Render scan results in the configured output format
    pub fn render_scan(&self, entries: &[ScanEntry]) -> Result<String> {
        match self.config.output {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
            OutputFormat::Text => {
                let mut out = String::new();
                for entry in entries {
                    let format = entry.format.to_string();
                    match (&entry.events, &entry.error) {
                        (Some(count), _) => writeln!(out, "{:<5}{:>6} events  {}", format, count, entry.path.display())?,
                        (None, Some(error)) => writeln!(out, "{:<5}{:>6}         {}: {}", format, "error", entry.path.display(), error)?,
                        (None, None) => return Err(anyhow!("Scan entry for {:?} has neither events nor error", entry.path)),
                    }
                }
                Ok(out)
            }
        }
    }

    fn limit<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match self.config.max_results {
            0 => items,
            max => &items[..items.len().min(max)],
        }
    }

    fn write_hidden_count(&self, out: &mut String, total: usize, shown: usize) -> Result<()> {
        if total > shown {
            writeln!(out, "... {} more", total - shown)?;
        }
        Ok(())
    }
}
