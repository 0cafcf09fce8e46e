//! Timestamp codec between subtitle text and canonical seconds.
//! SRT uses comma milliseconds, WebVTT uses a dot; both map to `f64` seconds.

use super::SubtitleFormat;
use thiserror::Error;

/// A timestamp string that could not be understood.
#[derive(Debug, Error)]
#[error("not a valid timestamp: {value:?}")]
pub struct BadTimestamp {
    pub value: String,
}

/// Parse a subtitle timestamp into seconds.
/// Accepts `HH:MM:SS,mmm` and `HH:MM:SS.mmm`, plus bare `MM:SS` and `SS`
/// forms that some WebVTT files use.
pub fn parse_timestamp(text: &str) -> Result<f64, BadTimestamp> {
    let bad = || BadTimestamp {
        value: text.to_string(),
    };
    // Normalize the comma separator so both formats share one path.
    let normalized = text.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(bad());
    }
    let seconds: f64 = parts[parts.len() - 1].parse().map_err(|_| bad())?;
    let mut whole: Vec<u64> = Vec::new();
    for part in &parts[..parts.len() - 1] {
        whole.push(part.parse().map_err(|_| bad())?);
    }
    if seconds < 0.0 || !seconds.is_finite() {
        return Err(bad());
    }
    // Checked arithmetic: a numeric-but-absurd component must fail the
    // parse, not overflow.
    let minutes = match whole.as_slice() {
        [] => 0,
        [m] => *m,
        [h, m] => h.checked_mul(60).and_then(|v| v.checked_add(*m)).ok_or_else(bad)?,
        _ => unreachable!(),
    };
    let total = minutes.checked_mul(60).ok_or_else(bad)? as f64 + seconds;
    Ok(total)
}

/// Format seconds back to subtitle text, millisecond precision.
/// Rounds to the nearest millisecond so formatting is a left inverse of
/// parsing for any value representable to 1 ms.
pub fn format_timestamp(seconds: f64, format: SubtitleFormat) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    let sep = match format {
        SubtitleFormat::Srt => ',',
        SubtitleFormat::Vtt => '.',
    };
    format!("{h:02}:{m:02}:{s:02}{sep}{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_srt_and_vtt_forms() {
        assert_eq!(parse_timestamp("00:00:01,000").unwrap(), 1.0);
        assert_eq!(parse_timestamp("00:00:03,500").unwrap(), 3.5);
        assert_eq!(parse_timestamp("01:02:03.250").unwrap(), 3723.25);
    }

    #[test]
    fn parses_bare_fallback_forms() {
        assert_eq!(parse_timestamp("02:30").unwrap(), 150.0);
        assert_eq!(parse_timestamp("7.5").unwrap(), 7.5);
        assert_eq!(parse_timestamp("42").unwrap(), 42.0);
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert!(parse_timestamp("aa:00:01,000").is_err());
        assert!(parse_timestamp("00:00:xx,000").is_err());
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("1:2:3:4").is_err());
    }

    #[test]
    fn rejects_overflowing_components() {
        assert!(parse_timestamp("18446744073709551615:00:01,000").is_err());
        assert!(parse_timestamp("307445734561825860:17:01,000").is_err());
        assert!(parse_timestamp("18446744073709551615:30").is_err());
        assert!(parse_timestamp("99999999999999999999:00:01,000").is_err());
    }

    #[test]
    fn formats_with_per_format_separator() {
        assert_eq!(format_timestamp(1.0, SubtitleFormat::Srt), "00:00:01,000");
        assert_eq!(format_timestamp(3.5, SubtitleFormat::Vtt), "00:00:03.500");
        assert_eq!(
            format_timestamp(3723.25, SubtitleFormat::Srt),
            "01:02:03,250"
        );
    }

    /// Format then parse must land within one millisecond.
    #[test]
    fn roundtrips_to_millisecond_precision() {
        for &secs in &[0.0, 0.001, 1.5, 59.999, 61.01, 3599.5, 86_399.999] {
            for &fmt in &[SubtitleFormat::Srt, SubtitleFormat::Vtt] {
                let text = format_timestamp(secs, fmt);
                let back = parse_timestamp(&text).unwrap();
                assert!((back - secs).abs() < 0.001, "{secs} -> {text} -> {back}");
            }
        }
    }
}
