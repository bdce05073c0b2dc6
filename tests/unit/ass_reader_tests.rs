/*!
 * Tests for the ASS reader
 */

use anyhow::Result;
use subminer::errors::{ErrorKind, IntervalError, SubtitleError, TimestampError};
use subminer::reader::{AssReader, SubtitleReader};
use crate::common::{self, ASS_FORMAT_LINE};

/// Test that commas inside the Text column survive
#[test]
fn test_parse_withCommaInText_shouldKeepWholeText() -> Result<()> {
    let content = common::ass_with_events(
        ASS_FORMAT_LINE,
        &["Dialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,Hello, world"],
    );
    let reader = AssReader::parse(&content)?;
    let events = reader.track().events();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start(), 1.0);
    assert_eq!(events[0].end(), 2.5);
    assert_eq!(events[0].text(), "Hello, world");
    Ok(())
}

/// Test the full sample, comment lines excluded
#[test]
fn test_parse_withSampleFile_shouldSkipComments() -> Result<()> {
    let reader = AssReader::parse(&common::sample_ass())?;
    let texts: Vec<&str> = reader.track().iter().map(|e| e.text()).collect();

    assert_eq!(texts, vec!["テストです。", "はい、そうです。", "Hello, world"]);
    // the comment spans 2.0-6.0 but never matches
    assert!(reader.at(4.0).is_empty());
    assert_eq!(reader.at(2.0).len(), 1);
    Ok(())
}

/// Test a reordered format declaration
#[test]
fn test_parse_withCustomColumnOrder_shouldFollowDeclaration() -> Result<()> {
    let content = common::ass_with_events(
        "Format: End, Style, Start, Text",
        &["Dialogue: 0:00:05.00,Default,0:00:04.00,Late line"],
    );
    let reader = AssReader::parse(&content)?;
    let event = &reader.track().events()[0];
    assert_eq!((event.start(), event.end()), (4.0, 5.0));
    assert_eq!(event.text(), "Late line");
    Ok(())
}

/// Test blank lines inside the Events section and a following section
#[test]
fn test_parse_withBlankLinesAndTrailingSection_shouldStopAtHeader() -> Result<()> {
    let content = format!(
        "[Events]\n{}\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,A\n\n[Fonts]\nfontname: x.ttf\n",
        ASS_FORMAT_LINE
    );
    let reader = AssReader::parse(&content)?;
    assert_eq!(reader.track().len(), 1);
    Ok(())
}

/// Test that a missing Events section fails in strict mode only
#[test]
fn test_parse_withoutEventsSection_shouldDependOnStrictness() -> Result<()> {
    let content = "[Script Info]\nTitle: nothing\n";
    let err = AssReader::parse(content).unwrap_err();
    assert!(matches!(err, SubtitleError::MissingEventsSection));
    assert_eq!(err.kind(), ErrorKind::Structural);

    assert!(AssReader::parse_with(content, false)?.track().is_empty());
    Ok(())
}

/// Test that duplicate Events sections fail in strict mode and merge otherwise
#[test]
fn test_parse_withTwoEventsSections_shouldDependOnStrictness() -> Result<()> {
    let section = |text: &str| {
        format!(
            "[Events]\n{}\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{}\n",
            ASS_FORMAT_LINE, text
        )
    };
    let content = format!("{}{}", section("first"), section("second"));

    let err = AssReader::parse(&content).unwrap_err();
    assert!(matches!(err, SubtitleError::DuplicateEventsSection { count: 2 }));

    let reader = AssReader::parse_with(&content, false)?;
    let texts: Vec<&str> = reader.track().iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    Ok(())
}

/// Test that the Format line must follow the header immediately
#[test]
fn test_parse_withoutFormatLine_shouldFail() {
    let err = AssReader::parse("[Events]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,A\n").unwrap_err();
    assert!(matches!(err, SubtitleError::MissingFormatLine { line: 2 }));

    let err = AssReader::parse("[Script Info]\n[Events]\n").unwrap_err();
    assert!(matches!(err, SubtitleError::MissingFormatLine { line: 2 }));
}

/// Test that Text must be the last declared column
#[test]
fn test_parse_withTextNotLast_shouldFail() {
    let content = common::ass_with_events("Format: Layer, Start, End, Text, Effect", &[]);
    let err = AssReader::parse(&content).unwrap_err();
    assert!(matches!(err, SubtitleError::TextNotLast { line: 5 }));
    assert_eq!(err.kind(), ErrorKind::Structural);
}

/// Test a declaration lacking a required column
#[test]
fn test_parse_withMissingStartColumn_shouldFail() {
    let content = common::ass_with_events("Format: Layer, End, Text", &[]);
    let err = AssReader::parse(&content).unwrap_err();
    assert!(matches!(err, SubtitleError::MissingColumn { ref column, .. } if column == "Start"));
}

/// Test that unknown line types abort the load
#[test]
fn test_parse_withUnknownLineType_shouldFail() {
    let content = common::ass_with_events(
        ASS_FORMAT_LINE,
        &[
            "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,A",
            "Picture: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,x.png",
        ],
    );
    let err = AssReader::parse(&content).unwrap_err();
    assert!(matches!(err, SubtitleError::UnknownLineType { line: 7, ref tag } if tag == "Picture"));
    assert_eq!(err.kind(), ErrorKind::Grammar);
}

/// Test that rows with too few fields are rejected
#[test]
fn test_parse_withTooFewFields_shouldFail() {
    let content = common::ass_with_events(ASS_FORMAT_LINE, &["Dialogue: 0,0:00:01.00,0:00:02.00,Default"]);
    let err = AssReader::parse(&content).unwrap_err();
    assert!(matches!(err, SubtitleError::TooFewFields { expected: 10, found: 4, .. }));
}

/// Test that comment lines are still validated
#[test]
fn test_parse_withMalformedComment_shouldFail() {
    let content = common::ass_with_events(ASS_FORMAT_LINE, &["Comment: 0,0:00:01.0,0:00:02.00,Default,,0,0,0,,note"]);
    let err = AssReader::parse(&content).unwrap_err();
    assert!(matches!(
        err,
        SubtitleError::Timestamp { source: TimestampError::DigitWidth { marker: 'C', .. }, .. }
    ));
}

/// Test reversed dialogue intervals
#[test]
fn test_parse_withEndBeforeStart_shouldFail() {
    let content = common::ass_with_events(ASS_FORMAT_LINE, &["Dialogue: 0,0:00:03.00,0:00:02.00,Default,,0,0,0,,A"]);
    let err = AssReader::parse(&content).unwrap_err();
    assert!(matches!(err, SubtitleError::Interval { source: IntervalError::Reversed { .. }, .. }));
    assert_eq!(err.kind(), ErrorKind::Ordering);
}

/// Test loading from disk
#[test]
fn test_open_withAssFile_shouldLoad() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "episode.ja.ass", &common::sample_ass())?;

    let reader = AssReader::open(&path)?;
    assert_eq!(reader.track().len(), 3);

    let err = AssReader::open(temp_dir.path().join("episode.ja.ssa")).unwrap_err();
    assert!(matches!(err, SubtitleError::UnsupportedExtension { .. }));
    Ok(())
}
