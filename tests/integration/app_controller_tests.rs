/*!
 * Tests for the application controller
 */

use anyhow::Result;
use subminer::app_config::{Config, OutputFormat};
use subminer::app_controller::Controller;
use subminer::reader::SubtitleFormat;
use crate::common;

fn controller_with(output: OutputFormat, max_results: usize) -> Result<Controller> {
    let config = Config {
        output,
        max_results,
        ..Config::default()
    };
    Controller::with_config(config)
}

/// Test that a bad grammar is refused up front
#[test]
fn test_with_config_withBadGrammar_shouldFail() {
    let config = Config {
        timestamp_format: "%m:%z".to_string(),
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
}

/// Test operator timestamps go through the configured grammar
#[test]
fn test_parse_user_timestamp_withConfiguredGrammar_shouldParse() -> Result<()> {
    let controller = controller_with(OutputFormat::Text, 10)?;
    assert_eq!(controller.parse_user_timestamp(" 07:54.32 ")?, 474.32);

    let err = controller.parse_user_timestamp("7:54").unwrap_err();
    assert!(err.to_string().contains("%m:%s.%C"));
    Ok(())
}

/// Test lookup and text rendering
#[test]
fn test_lookup_withTextOutput_shouldListNumberedEvents() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "en.srt", common::sample_srt())?;
    let controller = controller_with(OutputFormat::Text, 10)?;

    let events = controller.lookup(&path, "00:08.75")?;
    assert_eq!(events.len(), 2);

    let rendered = controller.render_events(&events)?;
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines[0].starts_with("0)  0:05.00 - 0:09.00"));
    assert!(lines[0].ends_with("It contains multiple entries."));
    assert!(lines[1].starts_with("1)  0:08.50 - 0:14.00"));
    Ok(())
}

/// Test empty results render a friendly line
#[test]
fn test_render_events_withNoEvents_shouldSayNothingFound() -> Result<()> {
    let controller = controller_with(OutputFormat::Text, 10)?;
    assert_eq!(controller.render_events(&[])?, "No subtitles found\n");
    Ok(())
}

/// Test the result cap in text output
#[test]
fn test_render_events_withCap_shouldReportHiddenCount() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "en.srt", common::sample_srt())?;
    let controller = controller_with(OutputFormat::Text, 1)?;

    let track = controller.dump(&path)?;
    let rendered = controller.render_events(track.events())?;
    assert_eq!(rendered.lines().count(), 2);
    assert!(rendered.ends_with("... 2 more\n"));
    Ok(())
}

/// Test JSON rendering of a dump
#[test]
fn test_dump_withJsonOutput_shouldSerializeEvents() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "ja.ass", &common::sample_ass())?;
    let controller = controller_with(OutputFormat::Json, 0)?;

    let track = controller.dump(&path)?;
    let rendered = controller.render_events(track.events())?;
    let value: serde_json::Value = serde_json::from_str(&rendered)?;

    let events = value.as_array().expect("array of events");
    assert_eq!(events.len(), 3);
    assert_eq!(events[2]["text"], "Hello, world");
    assert_eq!(events[0]["start"], 1.5);
    Ok(())
}

/// Test alignment of two files, restricted to one timestamp
#[test]
fn test_align_withTimestamp_shouldPairOverlappingLines() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let ja = common::create_test_file(temp_dir.path(), "ja.ass", &common::sample_ass())?;
    let en = common::create_test_file(temp_dir.path(), "en.srt", common::sample_srt())?;
    let controller = controller_with(OutputFormat::Text, 10)?;

    let alignments = controller.align(&ja, &en, Some("00:02.00"))?;
    assert_eq!(alignments.len(), 1);
    assert_eq!(alignments[0].source.text(), "テストです。");
    assert_eq!(alignments[0].matches.len(), 1);
    assert_eq!(alignments[0].matches[0].text(), "This is a test subtitle.");

    let all = controller.align(&ja, &en, None)?;
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].matches[0].text(), "It contains multiple entries.");
    assert_eq!(all[2].matches[0].text(), "For testing\npurposes.");

    let rendered = controller.render_alignments(&all)?;
    assert!(rendered.contains("Hello, world"));
    Ok(())
}

/// Test that structural errors surface through the controller
#[test]
fn test_lookup_withBrokenFile_shouldFailWithContext() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.ass", "[Script Info]\n")?;
    let controller = controller_with(OutputFormat::Text, 10)?;

    let err = controller.lookup(&path, "00:01.00").unwrap_err();
    assert!(err.to_string().contains("Failed to load subtitles"));
    assert!(format!("{:#}", err).contains("[Events]"));
    Ok(())
}

/// Test scanning a folder with one good and one broken file
#[test]
fn test_scan_withMixedFiles_shouldReportEach() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.srt", common::sample_srt())?;
    common::create_test_file(temp_dir.path(), "b.ass", "[Script Info]\n")?;
    let controller = controller_with(OutputFormat::Text, 10)?;

    let entries = controller.scan(temp_dir.path())?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].events, Some(3));
    assert!(entries[1].error.is_some());

    let rendered = controller.render_scan(&entries)?;
    assert!(rendered.contains("3 events"));
    assert!(rendered.contains("error"));
    Ok(())
}

/// SRT track with `count` consecutive two-second blocks
fn long_srt(count: usize) -> String {
    (0..count)
        .map(|i| format!("{}\n00:00:{:02},000 --> 00:00:{:02},000\nLine {}\n\n", i + 1, i * 2, i * 2 + 1, i))
        .collect()
}

/// Test that a JSON dump keeps every event whatever the result cap
#[test]
fn test_render_track_withJsonOutput_shouldIgnoreResultCap() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "long.srt", &long_srt(12))?;
    let controller = controller_with(OutputFormat::Json, Config::default().max_results)?;

    let track = controller.dump(&path)?;
    assert_eq!(track.len(), 12);

    let value: serde_json::Value = serde_json::from_str(&controller.render_track(&track)?)?;
    let events = value.as_array().expect("array of events");
    assert_eq!(events.len(), 12);
    assert_eq!(events[11]["text"], "Line 11");
    Ok(())
}

/// Test that a text dump lists every event without a hidden count
#[test]
fn test_render_track_withTextOutput_shouldListEveryEvent() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "long.srt", &long_srt(12))?;
    let controller = controller_with(OutputFormat::Text, Config::default().max_results)?;

    let rendered = controller.render_track(&controller.dump(&path)?)?;
    assert_eq!(rendered.lines().count(), 12);
    assert!(rendered.lines().last().unwrap_or_default().starts_with("11) 0:22.00 - 0:23.00"));
    assert!(!rendered.contains("more"));
    Ok(())
}

/// Test that scanning loads files recognised only by their content
#[test]
fn test_scan_withSniffedFile_shouldLoadWithDetectedReader() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "episode.ja.txt", &common::sample_ass())?;
    common::create_test_file(temp_dir.path(), "readme.txt", "nothing to see")?;
    let controller = controller_with(OutputFormat::Json, 10)?;

    let entries = controller.scan(temp_dir.path())?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].format, SubtitleFormat::Ass);
    assert_eq!(entries[0].events, Some(3));

    let value: serde_json::Value = serde_json::from_str(&controller.render_scan(&entries)?)?;
    assert_eq!(value[0]["format"], "ass");
    Ok(())
}
