//! Caption data model, format dispatch and file I/O.
//! Parsing picks a format by extension; writing goes through a temp file so
//! a destination is never left half-written.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::trace;

pub mod extract;
pub mod srt;
pub mod timecode;
pub mod vtt;

/// Where a record's current text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextProvenance {
    /// Unchanged since parse (identity mode, or backend returned nothing).
    #[default]
    Original,
    /// Produced by the generation backend.
    Backend,
    /// Produced by the mode's offline fallback.
    Fallback,
}

/// One timed caption cue.
/// `original_text` is fixed at parse time; only `text` is replaced during
/// transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionRecord {
    pub index: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub original_text: String,
    #[serde(default)]
    pub source: TextProvenance,
}

/// An ordered subtitle document; length and indices are fixed after parse.
pub type CaptionDocument = Vec<CaptionRecord>;

/// Supported subtitle file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// Match a format name or file extension, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "vtt" | "webvtt" => Some(Self::Vtt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }
}

/// Determine the subtitle format of `path` from its extension.
pub fn format_of(path: &Path) -> Result<SubtitleFormat, EngineError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    SubtitleFormat::from_name(&extension).ok_or(EngineError::UnsupportedFormat { extension })
}

/// Parse a subtitle file, dispatching on its extension.
pub fn parse_file(path: &Path) -> Result<CaptionDocument, EngineError> {
    trace!("parse_file path={}", path.display());
    let format = format_of(path)?;
    let content = fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => EngineError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => EngineError::Io(err),
    })?;
    parse_str(&content, format, path)
}

/// Parse in-memory subtitle content in the given format.
/// `path` is only used for error context.
pub fn parse_str(
    content: &str,
    format: SubtitleFormat,
    path: &Path,
) -> Result<CaptionDocument, EngineError> {
    match format {
        SubtitleFormat::Srt => srt::parse(content, path),
        SubtitleFormat::Vtt => vtt::parse(content, path),
    }
}

/// Render a document to subtitle text in the given format.
pub fn render(records: &[CaptionRecord], format: SubtitleFormat) -> String {
    match format {
        SubtitleFormat::Srt => srt::format(records),
        SubtitleFormat::Vtt => vtt::format(records),
    }
}

/// Write a document to `path`, rendering fully before touching the
/// destination. The content lands via a temp sibling plus rename, so a
/// failed write never truncates an existing file.
pub fn write_file(
    records: &[CaptionRecord],
    format: SubtitleFormat,
    path: &Path,
) -> Result<(), EngineError> {
    trace!("write_file path={} format={}", path.display(), format.as_str());
    let content = render(records, format);
    let tmp = path.with_extension(format!("{}.tmp", format.as_str()));
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dispatches_format_by_extension() {
        assert_eq!(format_of(Path::new("a.srt")).unwrap(), SubtitleFormat::Srt);
        assert_eq!(format_of(Path::new("a.VTT")).unwrap(), SubtitleFormat::Vtt);
        assert!(matches!(
            format_of(Path::new("a.ass")),
            Err(EngineError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            format_of(Path::new("noext")),
            Err(EngineError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let err = parse_file(Path::new("/nowhere/missing.srt")).unwrap_err();
        assert!(matches!(err, EngineError::SourceNotFound { .. }));
    }

    /// SRT in, VTT out, byte for byte.
    #[test]
    fn converts_srt_document_to_vtt() {
        let input =
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,500 --> 00:00:04,200\nWorld\n\n";
        let records = parse_str(input, SubtitleFormat::Srt, Path::new("a.srt")).unwrap();
        let vtt = render(&records, SubtitleFormat::Vtt);
        assert_eq!(
            vtt,
            "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n\n00:00:03.500 --> 00:00:04.200\nWorld\n\n"
        );
    }

    /// parse(export(D)) == D for both formats.
    #[test]
    fn roundtrips_documents_in_both_formats() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,500 --> 00:00:04,200\nWorld\n\n";
        let doc = parse_str(input, SubtitleFormat::Srt, Path::new("a.srt")).unwrap();
        for &fmt in &[SubtitleFormat::Srt, SubtitleFormat::Vtt] {
            let rendered = render(&doc, fmt);
            let back = parse_str(&rendered, fmt, Path::new("b")).unwrap();
            assert_eq!(back, doc);
        }
    }

    #[test]
    fn writes_file_to_completion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.vtt");
        let doc = parse_str(
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n",
            SubtitleFormat::Srt,
            Path::new("a.srt"),
        )
        .unwrap();
        write_file(&doc, SubtitleFormat::Vtt, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("WEBVTT\n\n"));
        assert!(!dir
            .path()
            .join("out.vtt.tmp")
            .exists());
    }
}
