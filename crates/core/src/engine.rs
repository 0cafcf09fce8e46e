//! Transformation orchestration.
//! This module wires cache lookups, subtitle parsing, batched backend calls
//! and fallback recovery into one `transform` entry point.

use crate::backend::{GenerationRequest, Generator};
use crate::cache::{cache_key, TransformCache};
use crate::error::{BackendError, EngineError};
use crate::modes::{self, Mode, ModeKey, ModeRegistry};
use crate::subtitle::{self, CaptionDocument, SubtitleFormat, TextProvenance};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default number of captions transformed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Hard cap on in-flight backend calls, whatever batch size a caller asks
/// for.
pub const MAX_BATCH_SIZE: usize = 16;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cache_dir: PathBuf,
    /// Per backend call; a timed-out call falls back for that record only.
    pub request_timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data/cache"),
            request_timeout: Duration::from_secs(30),
            max_tokens: 200,
            temperature: 0.7,
        }
    }
}

/// The cacheable unit: one document transformed under one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    pub mode: ModeKey,
    pub source_path: PathBuf,
    pub cache_key: String,
    pub subtitles: CaptionDocument,
}

/// Summary of a subtitle file for the `info` surface.
#[derive(Debug, Clone, Serialize)]
pub struct SubtitleInfo {
    pub path: PathBuf,
    pub format: String,
    pub count: usize,
    pub total_duration: f64,
    pub available_modes: Vec<String>,
}

/// Caption transformation engine.
/// Holds the injected mode registry, the configured backends (possibly
/// none) and the on-disk cache.
pub struct Engine {
    registry: ModeRegistry,
    backends: Vec<Arc<dyn Generator>>,
    cache: TransformCache,
    config: EngineConfig,
    // One gate per cache key so concurrent calls for the same key share a
    // single computation.
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        registry: ModeRegistry,
        backends: Vec<Arc<dyn Generator>>,
    ) -> Result<Self, EngineError> {
        let cache = TransformCache::new(&config.cache_dir)?;
        Ok(Self {
            registry,
            backends,
            cache,
            config,
            inflight: Mutex::new(HashMap::new()),
        })
    }

    /// Ordered mode metadata for listing surfaces.
    pub fn list_modes(&self) -> &[Mode] {
        self.registry.modes()
    }

    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    /// Transform `path` under the mode named `mode`.
    /// Served verbatim from cache when the source file is unchanged;
    /// otherwise parsed and pushed through the backend in sequential
    /// batches, falling back per record on any backend failure.
    pub async fn transform(
        &self,
        path: &Path,
        mode: &str,
        batch_size: usize,
    ) -> Result<TransformResult, EngineError> {
        let metadata = fs::metadata(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => EngineError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => EngineError::Io(err),
        })?;
        let mode = self.registry.resolve(mode)?;
        let mtime = metadata.modified()?;
        let key = cache_key(path, mode.key, mtime);

        let gate = {
            let mut inflight = self.inflight.lock().await;
            inflight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = gate.lock().await;

        let outcome = self.transform_gated(path, mode, batch_size, &key).await;

        self.release_gate(&key, &gate).await;
        drop(guard);
        outcome
    }

    /// Drop the in-flight entry for `key`, but only if the map still holds
    /// our gate; a later caller may have installed a fresh one, which must
    /// stay so its own waiters keep coalescing.
    async fn release_gate(&self, key: &str, gate: &Arc<Mutex<()>>) {
        let mut inflight = self.inflight.lock().await;
        if inflight.get(key).is_some_and(|g| Arc::ptr_eq(g, gate)) {
            inflight.remove(key);
        }
    }

    async fn transform_gated(
        &self,
        path: &Path,
        mode: &Mode,
        batch_size: usize,
        key: &str,
    ) -> Result<TransformResult, EngineError> {
        if let Some(cached) = self.cache.get(key) {
            debug!("using cached transformation for mode {}", mode.key);
            return Ok(cached);
        }

        let records = subtitle::parse_file(path)?;
        let subtitles = if mode.key == ModeKey::Original {
            records
        } else {
            info!(
                "transforming {} captions to {} mode",
                records.len(),
                mode.key
            );
            self.transform_records(mode, records, batch_size).await
        };

        let result = TransformResult {
            mode: mode.key,
            source_path: path.to_path_buf(),
            cache_key: key.to_string(),
            subtitles,
        };
        // The cache is an optimization: a write failure degrades to
        // recompute-next-time, never to a failed call.
        if let Err(err) = self.cache.put(&result) {
            warn!("cache write failed for {key}: {err}");
        }
        Ok(result)
    }

    /// Batches run strictly in sequence; records within a batch run
    /// concurrently, each writing its own slot, so output order always
    /// equals input order.
    async fn transform_records(
        &self,
        mode: &Mode,
        mut records: CaptionDocument,
        batch_size: usize,
    ) -> CaptionDocument {
        let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        let total_batches = records.len().div_ceil(batch_size);
        for (batch_no, chunk) in records.chunks_mut(batch_size).enumerate() {
            let outputs =
                futures::future::join_all(chunk.iter().map(|r| self.generate(mode, &r.text)))
                    .await;
            for (record, outcome) in chunk.iter_mut().zip(outputs) {
                match outcome {
                    Ok(text) if !text.trim().is_empty() => {
                        record.text = text.trim().to_string();
                        record.source = TextProvenance::Backend;
                    }
                    Ok(_) => {
                        // Empty response: keep the original cue rather than
                        // emit a blank one.
                        debug!("backend returned empty text, keeping original");
                    }
                    Err(err) => {
                        debug!("generation failed ({err}), using {} fallback", mode.key);
                        record.text = modes::fallback(mode.key, &record.text);
                        record.source = TextProvenance::Fallback;
                    }
                }
            }
            debug!("processed batch {}/{}", batch_no + 1, total_batches);
        }
        records
    }

    /// Try each configured backend in order with a bounded per-call
    /// timeout. The returned error is only ever logged; the batch loop
    /// converts it into a fallback call.
    async fn generate(&self, mode: &Mode, text: &str) -> Result<String, BackendError> {
        let mut last = BackendError::NoBackends;
        for backend in &self.backends {
            let req = GenerationRequest {
                instruction: mode.instruction,
                input: text,
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
                stop: &[],
            };
            match tokio::time::timeout(self.config.request_timeout, backend.generate(&req)).await
            {
                Ok(Ok(output)) => return Ok(output),
                Ok(Err(err)) => {
                    debug!("backend {} failed: {err}", backend.name());
                    last = err;
                }
                Err(_) => {
                    let ms = self.config.request_timeout.as_millis() as u64;
                    debug!("backend {} timed out after {ms} ms", backend.name());
                    last = BackendError::Timeout { ms };
                }
            }
        }
        Err(last)
    }

    /// Serialize a transformation result to `output_path` in `format`.
    pub fn export(
        &self,
        result: &TransformResult,
        output_path: &Path,
        format: &str,
    ) -> Result<(), EngineError> {
        let format =
            SubtitleFormat::from_name(format).ok_or_else(|| EngineError::UnsupportedExportFormat {
                format: format.to_string(),
            })?;
        subtitle::write_file(&result.subtitles, format, output_path)
    }

    /// Summarize a subtitle file without transforming it.
    pub fn get_info(&self, path: &Path) -> Result<SubtitleInfo, EngineError> {
        let records = subtitle::parse_file(path)?;
        let format = subtitle::format_of(path)?;
        Ok(SubtitleInfo {
            path: path.to_path_buf(),
            format: format.as_str().to_string(),
            count: records.len(),
            total_duration: records.last().map(|r| r.end_time).unwrap_or(0.0),
            available_modes: self
                .registry
                .modes()
                .iter()
                .map(|m| m.key.as_str().to_string())
                .collect(),
        })
    }
}
