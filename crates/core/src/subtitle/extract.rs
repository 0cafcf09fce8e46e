//! Pulls embedded subtitle tracks out of video containers with ffmpeg.

use crate::error::EngineError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, trace};

/// Build the ffmpeg invocation for extracting the first subtitle stream,
/// plus the SRT path it will write next to the input.
pub fn ffmpeg_extract_args(input: &Path) -> (PathBuf, Vec<String>) {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let out = input.with_file_name(format!("{stem}.srt"));
    let args = vec![
        "-i".to_string(),
        input.display().to_string(),
        "-map".to_string(),
        "0:s:0".to_string(),
        "-c:s".to_string(),
        "srt".to_string(),
        out.display().to_string(),
        "-y".to_string(),
    ];
    (out, args)
}

/// Extract the first embedded subtitle track of `path` to a sibling SRT.
pub fn extract_first_track(path: &Path) -> Result<PathBuf, EngineError> {
    trace!("extract_first_track path={}", path.display());
    if !path.exists() {
        return Err(EngineError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let (out, args) = ffmpeg_extract_args(path);
    let output = Command::new("ffmpeg").args(&args).output()?;
    if !output.status.success() || !out.exists() {
        return Err(EngineError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: String::from_utf8_lossy(&output.stderr)
                .lines()
                .last()
                .unwrap_or("ffmpeg failed")
                .to_string(),
        });
    }
    info!("extracted subtitles to {}", out.display());
    Ok(out)
}
