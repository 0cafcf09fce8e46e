//! Error types shared across the pipeline.
//! Parse and lookup failures abort a call; backend failures never do.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the engine and parser.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The subtitle file does not exist or cannot be stat'ed.
    #[error("subtitle file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The file extension maps to no supported subtitle format.
    #[error("unsupported subtitle format: {extension:?}")]
    UnsupportedFormat { extension: String },

    /// A timestamp component failed to parse as a number.
    #[error("malformed timestamp {value:?} in {path}")]
    MalformedTimestamp { path: PathBuf, value: String },

    /// A cue block is structurally invalid.
    #[error("malformed cue in {path} near line {line}: {detail}")]
    MalformedCue {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    /// The requested mode key is not registered.
    #[error("unknown caption mode: {key:?}")]
    UnknownMode { key: String },

    /// The requested export format is not recognized.
    #[error("unsupported export format: {format:?}")]
    UnsupportedExportFormat { format: String },

    /// ffmpeg failed while pulling an embedded subtitle track.
    #[error("subtitle extraction failed for {path}: {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures from the text-generation backend.
/// These are always recovered via the mode fallback and never abort a
/// transform call; they exist so the batch loop can log the reason.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status}")]
    Status { status: u16 },

    #[error("backend response missing generated text")]
    MalformedResponse,

    #[error("backend call timed out after {ms} ms")]
    Timeout { ms: u64 },

    #[error("no generation backend configured")]
    NoBackends,
}
