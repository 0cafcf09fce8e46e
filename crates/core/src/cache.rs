//! On-disk transformation cache: one JSON file per cache key.
//! The cache is an optimization only; read and write failures degrade to
//! recomputation and never fail a transform call.

use crate::engine::TransformResult;
use crate::modes::ModeKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Bumped whenever the cached result layout changes; mismatched entries
/// are treated as misses.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    result: TransformResult,
}

/// Deterministic fingerprint of (source path, mode, mtime).
/// Touching the source changes the key, which orphans the old entry.
pub fn cache_key(path: &Path, mode: ModeKey, mtime: SystemTime) -> String {
    let nanos = mtime
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update(b"|");
    hasher.update(mode.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(nanos.to_string().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Durable key to transformation-result store backed by a directory.
pub struct TransformCache {
    dir: PathBuf,
}

impl TransformCache {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Fetch a cached result. Corrupt or stale-schema entries read as
    /// misses.
    pub fn get(&self, key: &str) -> Option<TransformResult> {
        let path = self.entry_path(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("cache read failed for {}: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_str::<Envelope>(&text) {
            Ok(envelope) if envelope.version == CACHE_SCHEMA_VERSION => Some(envelope.result),
            Ok(envelope) => {
                debug!(
                    "ignoring cache entry {key} with schema version {}",
                    envelope.version
                );
                None
            }
            Err(err) => {
                warn!("discarding corrupt cache entry {key}: {err}");
                None
            }
        }
    }

    /// Persist a fully assembled result, atomically from a reader's
    /// perspective: written to a temp sibling, then renamed into place.
    pub fn put(&self, result: &TransformResult) -> std::io::Result<()> {
        let envelope = Envelope {
            version: CACHE_SCHEMA_VERSION,
            result: result.clone(),
        };
        let text = serde_json::to_string(&envelope)?;
        let path = self.entry_path(&result.cache_key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &path)?;
        debug!("cached transformation {}", result.cache_key);
        Ok(())
    }

    /// Remove one entry; returns whether it existed.
    pub fn invalidate(&self, key: &str) -> bool {
        fs::remove_file(self.entry_path(key)).is_ok()
    }

    /// Remove every entry, returning how many were deleted.
    pub fn clear(&self) -> std::io::Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
