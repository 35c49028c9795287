//! Snapshot stores.
//!
//! A store saves and loads whole [`EngineSnapshot`]s. Failures never reach
//! the caller as errors: `save` reports `false` and `load` reports `None`,
//! and both log the cause.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, read_text, to_json, write_text};
use ecotick_core::snapshot::EngineSnapshot;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Mutex;

const FORMAT: &str = "ecotick-snapshot";

pub trait SnapshotStore: Send + Sync {
    /// Persists `snapshot`, replacing any earlier one. Returns `false` on failure.
    fn save(&self, snapshot: &EngineSnapshot) -> bool;

    /// The last saved snapshot, or `None` when absent or unreadable.
    fn load(&self) -> Option<EngineSnapshot>;
}

/// On-disk wrapper around a snapshot.
#[derive(Serialize, Deserialize, Debug)]
struct SaveFile {
    format: String,
    saved_at: String,
    checksum: String,
    snapshot: EngineSnapshot,
}

fn checksum(snapshot: &EngineSnapshot) -> Result<String> {
    let json = to_json(snapshot)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Encodes a snapshot with its checksum envelope.
pub fn encode_snapshot(snapshot: &EngineSnapshot) -> Result<String> {
    let file = SaveFile {
        format: FORMAT.to_string(),
        saved_at: chrono::Utc::now().to_rfc3339(),
        checksum: checksum(snapshot)?,
        snapshot: snapshot.clone(),
    };
    to_json(&file)
}

/// Decodes and verifies a snapshot envelope.
pub fn decode_snapshot(text: &str) -> Result<EngineSnapshot> {
    let file: SaveFile = from_json(text)?;
    if file.format != FORMAT {
        return Err(IoError::UnknownFormat(file.format));
    }
    let found = checksum(&file.snapshot)?;
    if found != file.checksum {
        return Err(IoError::Checksum {
            expected: file.checksum,
            found,
        });
    }
    Ok(file.snapshot)
}

/// JSON file store. Paths ending in `.gz` are gzip-compressed.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn try_save(&self, snapshot: &EngineSnapshot) -> Result<()> {
        let text = encode_snapshot(snapshot)?;
        write_text(&self.path, &text)
    }

    pub fn try_load(&self) -> Result<EngineSnapshot> {
        let text = read_text(&self.path)?;
        decode_snapshot(&text)
    }

    /// Deletes the save file if present.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &EngineSnapshot) -> bool {
        match self.try_save(snapshot) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), time = snapshot.time, "Snapshot saved");
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to save snapshot");
                false
            }
        }
    }

    fn load(&self) -> Option<EngineSnapshot> {
        match self.try_load() {
            Ok(snapshot) => Some(snapshot),
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.path.display(), "No saved snapshot");
                None
            }
            Err(e) if e.is_corrupt() => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt snapshot");
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cannot load snapshot");
                None
            }
        }
    }
}

/// In-memory store holding the encoded envelope, so it exercises the same
/// encode/verify path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored text verbatim, for corruption tests.
    pub fn put_raw(&self, text: impl Into<String>) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.into());
    }

    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, snapshot: &EngineSnapshot) -> bool {
        match encode_snapshot(snapshot) {
            Ok(text) => {
                self.put_raw(text);
                *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode snapshot");
                false
            }
        }
    }

    fn load(&self) -> Option<EngineSnapshot> {
        let text = self.raw()?;
        decode_snapshot(&text)
            .map_err(|e| tracing::warn!(error = %e, "Discarding unreadable snapshot"))
            .ok()
    }
}
