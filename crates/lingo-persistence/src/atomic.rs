//! Crash-safe file writes for the state file.
//!
//! The state file is rewritten in full on every change, so a crash halfway
//! through a plain `fs::write` would leave a truncated JSON object behind.
//! Writes go to a sibling temp file that is renamed over the target instead.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{PersistenceError, Result};

/// Replaces the contents of `path` with `data` in a single rename.
///
/// Missing parent directories are created first.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::DirectoryError {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source: std::io::Error| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    // Same directory as the target so the rename never crosses filesystems.
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp_file.write_all(data).map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;

    temp_file
        .persist(path)
        .map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Serializes `value` as pretty JSON (with a trailing newline) and writes it atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    atomic_write(path, json.as_bytes())
}

/// Reads and decodes a JSON file, returning `None` when it does not exist.
pub fn read_json_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path).map_err(|source| PersistenceError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(serde_json::from_str(&data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_replaces_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chats.json");

        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state/nested/chats.json");

        atomic_write(&path, b"{}").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chats.json");

        atomic_write(&path, b"{}").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_atomic_write_json_is_pretty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chats.json");

        let mut flags = BTreeMap::new();
        flags.insert("-100123".to_string(), false);
        atomic_write_json(&path, &flags).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\n  \"-100123\": false\n}\n");
    }

    #[test]
    fn test_read_json_optional_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let result: Option<BTreeMap<String, bool>> = read_json_optional(&path).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_json_optional_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chats.json");
        fs::write(&path, "{not json").unwrap();

        let result: Result<Option<BTreeMap<String, bool>>> = read_json_optional(&path);
        assert!(matches!(result, Err(PersistenceError::SerializeError(_))));
    }
}
