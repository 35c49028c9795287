//! # Ecotick IO
//!
//! I/O and persistence layer for the ecotick simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON serialization helpers with optional gzip compression
//! - Snapshot stores for saving and resuming an engine
//! - A JSONL event log

/// Error types and result aliases for I/O operations
pub mod error;
/// JSONL event log of notable simulation events
pub mod history;
/// Snapshot stores backed by files or memory
pub mod persistence;
/// Validated serialization helpers for JSON files
pub mod serialization;

pub use error::{IoError, Result};
pub use history::{EventLogger, LiveEvent};
pub use persistence::{JsonFileStore, MemoryStore, SnapshotStore};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
