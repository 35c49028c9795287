//! Serialization utilities with robust error handling.
//!
//! JSON helpers plus file helpers that transparently gzip any path ending in
//! `.gz`.

use crate::error::{IoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// Serializes data to JSON with error handling.
///
/// # Returns
/// JSON string on success, or `IoError::Serialization` on failure.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from a JSON string. Empty input is rejected; malformed
/// input comes back as [`IoError::Json`].
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::invalid("Empty JSON string"));
    }

    Ok(serde_json::from_str(json)?)
}

#[must_use]
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Writes `text` to `path`, gzip-compressed when the path ends in `.gz`.
pub fn write_text<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IoError::file(parent, e))?;
    }

    let bytes = if is_gzip_path(path) {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| IoError::gzip(path, e))?;
        encoder.finish().map_err(|e| IoError::gzip(path, e))?
    } else {
        text.as_bytes().to_vec()
    };

    std::fs::write(path, bytes).map_err(|e| IoError::file(path, e))
}

/// Reads `path` as text, decompressing when the path ends in `.gz`.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| IoError::file(path, e))?;

    if is_gzip_path(path) {
        let mut decoded = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut decoded)
            .map_err(|e| IoError::gzip(path, e))?;
        Ok(decoded)
    } else {
        String::from_utf8(bytes)
            .map_err(|e| IoError::invalid(format!("Invalid UTF-8 in {:?}: {}", path, e)))
    }
}

/// Safely writes JSON to a file.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    write_text(path, &json)
}

/// Safely reads JSON from a file.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = read_text(path)?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ecotick_ser_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_empty_json_fails() {
        let result: Result<TestData> = from_json("  ");
        assert!(matches!(result, Err(IoError::Invalid(_))));
    }

    #[test]
    fn test_invalid_json_fails() {
        let result: Result<TestData> = from_json("{ invalid json");
        assert!(matches!(result, Err(IoError::Json(_))));
    }

    #[test]
    fn test_gzip_file_is_compressed() {
        let path = temp_path("data.json.gz");
        let data = TestData {
            name: "x".repeat(200),
            value: 7,
        };
        write_json_file(&data, &path).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
        assert!(raw.len() < 200);
        let restored: TestData = read_json_file(&path).unwrap();
        assert_eq!(restored, data);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = read_text(temp_path("missing.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_is_gzip_path() {
        assert!(is_gzip_path(Path::new("save.json.gz")));
        assert!(!is_gzip_path(Path::new("save.json")));
    }
}
