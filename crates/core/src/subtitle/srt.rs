//! SRT parsing and writing.
//! Blocks are an index line, a timing line and text lines up to a blank line.

use super::timecode;
use super::{CaptionRecord, SubtitleFormat, TextProvenance};
use crate::error::EngineError;
use std::path::Path;

/// Parse SRT content into caption records.
/// Any structurally broken block fails the whole parse so callers never
/// see a silently truncated document.
pub fn parse(content: &str, path: &Path) -> Result<Vec<CaptionRecord>, EngineError> {
    let lines: Vec<&str> = content.trim_start_matches('\u{feff}').lines().collect();
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < lines.len() {
        if lines[pos].trim().is_empty() {
            pos += 1;
            continue;
        }
        let index: u32 = lines[pos]
            .trim()
            .parse()
            .map_err(|_| EngineError::MalformedCue {
                path: path.to_path_buf(),
                line: pos + 1,
                detail: format!("expected cue index, got {:?}", lines[pos].trim()),
            })?;
        let timing = lines.get(pos + 1).ok_or_else(|| EngineError::MalformedCue {
            path: path.to_path_buf(),
            line: pos + 1,
            detail: "cue index without timing line".to_string(),
        })?;
        let (start_time, end_time) = parse_timing(timing, path, pos + 2)?;
        let mut text_lines = Vec::new();
        pos += 2;
        while pos < lines.len() && !lines[pos].trim().is_empty() {
            text_lines.push(lines[pos].trim());
            pos += 1;
        }
        let text = text_lines.join(" ").trim().to_string();
        if text.is_empty() {
            return Err(EngineError::MalformedCue {
                path: path.to_path_buf(),
                line: pos,
                detail: format!("cue {index} has no text"),
            });
        }
        records.push(CaptionRecord {
            index,
            start_time,
            end_time,
            original_text: text.clone(),
            text,
            source: TextProvenance::Original,
        });
    }
    Ok(records)
}

/// Parse a `start --> end` line, validating the cue interval.
pub(super) fn parse_timing(
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<(f64, f64), EngineError> {
    let mut parts = line.trim().split(" --> ");
    let (start, end) = match (parts.next(), parts.next()) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            return Err(EngineError::MalformedCue {
                path: path.to_path_buf(),
                line: line_no,
                detail: format!("expected timing line, got {:?}", line.trim()),
            })
        }
    };
    // WebVTT allows cue settings after the end timestamp.
    let end = end.split_whitespace().next().unwrap_or(end);
    let to_secs = |value: &str| {
        timecode::parse_timestamp(value).map_err(|e| EngineError::MalformedTimestamp {
            path: path.to_path_buf(),
            value: e.value,
        })
    };
    let (start_time, end_time) = (to_secs(start)?, to_secs(end)?);
    if start_time < 0.0 || end_time <= start_time {
        return Err(EngineError::MalformedCue {
            path: path.to_path_buf(),
            line: line_no,
            detail: format!("cue interval {start_time}..{end_time} is not ascending"),
        });
    }
    Ok((start_time, end_time))
}

/// Write caption records back to SRT text.
pub fn format(records: &[CaptionRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            record.index,
            timecode::format_timestamp(record.start_time, SubtitleFormat::Srt),
            timecode::format_timestamp(record.end_time, SubtitleFormat::Srt),
            record.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_cue_file() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,500 --> 00:00:04,200\nWorld\n\n";
        let records = parse(input, Path::new("a.srt")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].start_time, 1.0);
        assert_eq!(records[0].end_time, 2.0);
        assert_eq!(records[0].text, "Hello");
        assert_eq!(records[1].index, 2);
        assert_eq!(records[1].start_time, 3.5);
        assert_eq!(records[1].end_time, 4.2);
        assert_eq!(records[1].text, "World");
    }

    #[test]
    fn joins_multi_line_text_with_spaces() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nfirst line\nsecond line\n\n";
        let records = parse(input, Path::new("a.srt")).unwrap();
        assert_eq!(records[0].text, "first line second line");
        assert_eq!(records[0].original_text, "first line second line");
    }

    #[test]
    fn roundtrips_through_format() {
        let input = "1\n00:00:00,000 --> 00:00:01,000\nHello\n\n";
        let records = parse(input, Path::new("a.srt")).unwrap();
        assert_eq!(format(&records), input);
    }

    #[test]
    fn rejects_non_numeric_index() {
        let input = "one\n00:00:01,000 --> 00:00:02,000\nHello\n\n";
        let err = parse(input, Path::new("a.srt")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCue { line: 1, .. }));
    }

    #[test]
    fn rejects_bad_timestamp() {
        let input = "1\n00:00:0x,000 --> 00:00:02,000\nHello\n\n";
        let err = parse(input, Path::new("a.srt")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedTimestamp { .. }));
    }

    #[test]
    fn rejects_absurdly_large_hour_component() {
        let input = "1\n18446744073709551615:00:01,000 --> 00:00:02,000\nHello\n\n";
        let err = parse(input, Path::new("a.srt")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedTimestamp { .. }));
    }

    #[test]
    fn rejects_cue_ending_before_it_starts() {
        let input = "1\n00:00:02,000 --> 00:00:01,000\nHello\n\n";
        let err = parse(input, Path::new("a.srt")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCue { .. }));
    }

    #[test]
    fn rejects_missing_timing_line() {
        let input = "1\nHello there\n\n";
        let err = parse(input, Path::new("a.srt")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCue { .. }));
    }
}
