//! WebVTT parsing and writing.
//! Cues carry no indices in this format, so sequential ones are synthesized.

use super::timecode;
use super::{srt, CaptionRecord, SubtitleFormat, TextProvenance};
use crate::error::EngineError;
use std::path::Path;

/// Parse WebVTT content into caption records.
/// Requires the `WEBVTT` header, tolerates cue identifier lines and skips
/// `NOTE`/`STYLE`/`REGION` blocks.
pub fn parse(content: &str, path: &Path) -> Result<Vec<CaptionRecord>, EngineError> {
    let lines: Vec<&str> = content.trim_start_matches('\u{feff}').lines().collect();
    let mut pos = 0;
    while pos < lines.len() && lines[pos].trim().is_empty() {
        pos += 1;
    }
    if pos >= lines.len() || !lines[pos].trim_start().starts_with("WEBVTT") {
        return Err(EngineError::MalformedCue {
            path: path.to_path_buf(),
            line: pos + 1,
            detail: "missing WEBVTT header".to_string(),
        });
    }
    pos += 1;

    let mut records = Vec::new();
    while pos < lines.len() {
        if lines[pos].trim().is_empty() {
            pos += 1;
            continue;
        }
        let block_start = pos;
        let mut block = Vec::new();
        while pos < lines.len() && !lines[pos].trim().is_empty() {
            block.push(lines[pos]);
            pos += 1;
        }
        let head = block[0].trim_start();
        if head.starts_with("NOTE") || head.starts_with("STYLE") || head.starts_with("REGION") {
            continue;
        }
        // The timing line is either the first line of the block or follows
        // an optional cue identifier line.
        let timing_at = if block[0].contains("-->") {
            0
        } else if block.len() > 1 && block[1].contains("-->") {
            1
        } else {
            return Err(EngineError::MalformedCue {
                path: path.to_path_buf(),
                line: block_start + 1,
                detail: format!("cue block without timing line, got {:?}", block[0].trim()),
            });
        };
        let (start_time, end_time) =
            srt::parse_timing(block[timing_at], path, block_start + timing_at + 1)?;
        let text = block[timing_at + 1..]
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if text.is_empty() {
            return Err(EngineError::MalformedCue {
                path: path.to_path_buf(),
                line: block_start + timing_at + 1,
                detail: "cue has no text".to_string(),
            });
        }
        records.push(CaptionRecord {
            index: records.len() as u32 + 1,
            start_time,
            end_time,
            original_text: text.clone(),
            text,
            source: TextProvenance::Original,
        });
    }
    Ok(records)
}

/// Write caption records back to WebVTT text.
pub fn format(records: &[CaptionRecord]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for record in records {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            timecode::format_timestamp(record.start_time, SubtitleFormat::Vtt),
            timecode::format_timestamp(record.end_time, SubtitleFormat::Vtt),
            record.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cues_and_synthesizes_indices() {
        let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n\n00:00:03.500 --> 00:00:04.200\nWorld\n\n";
        let records = parse(input, Path::new("a.vtt")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[1].index, 2);
        assert_eq!(records[1].start_time, 3.5);
        assert_eq!(records[1].text, "World");
    }

    #[test]
    fn tolerates_cue_identifiers_and_notes() {
        let input = "WEBVTT\n\nNOTE produced by hand\n\nintro\n00:00:01.000 --> 00:00:02.000\nHello\n\n";
        let records = parse(input, Path::new("a.vtt")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Hello");
    }

    #[test]
    fn rejects_missing_header() {
        let input = "00:00:01.000 --> 00:00:02.000\nHello\n\n";
        let err = parse(input, Path::new("a.vtt")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCue { .. }));
    }

    #[test]
    fn rejects_block_without_timing() {
        let input = "WEBVTT\n\njust some text\nand more\n\n";
        let err = parse(input, Path::new("a.vtt")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCue { .. }));
    }

    #[test]
    fn formats_expected_output() {
        let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n\n";
        let records = parse(input, Path::new("a.vtt")).unwrap();
        assert_eq!(format(&records), input);
    }
}
