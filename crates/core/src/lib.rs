//! Caption style-transform pipeline.
//! Parses SRT/WebVTT files, rewrites every cue under a named mode through a
//! text-generation backend (with offline fallbacks), caches results keyed by
//! source path + mode + mtime, and re-exports to either format.

pub mod backend;
pub mod cache;
pub mod engine;
pub mod error;
pub mod modes;
pub mod subtitle;

pub use engine::{Engine, EngineConfig, SubtitleInfo, TransformResult, DEFAULT_BATCH_SIZE};
pub use error::{BackendError, EngineError};
pub use modes::{Mode, ModeKey, ModeRegistry};
pub use subtitle::{CaptionDocument, CaptionRecord, SubtitleFormat, TextProvenance};
