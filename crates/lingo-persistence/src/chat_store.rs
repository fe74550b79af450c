//! Per-chat auto-translate flags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::Result;

/// Flag value reported for chats that have never been toggled.
pub const DEFAULT_ENABLED: bool = true;

/// Owns the chat id -> auto-translate mapping and its backing file.
///
/// The file is a flat, pretty-printed JSON object:
/// ```text
/// {
///   "-1001234567890": false,
///   "42": true
/// }
/// ```
///
/// A chat missing from the mapping counts as enabled. Reads never insert
/// keys, so only chats that actually ran `/enable` or `/disable` end up in
/// the file.
pub struct ChatStateStore {
    path: PathBuf,
    flags: RwLock<BTreeMap<String, bool>>,
}

impl ChatStateStore {
    /// Loads the store from `path`.
    ///
    /// A missing file yields an empty mapping. An unreadable or malformed
    /// file also yields an empty mapping, with a warning; startup never
    /// fails because of the state file.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let flags = match read_json_optional::<BTreeMap<String, bool>>(&path) {
            Ok(Some(flags)) => {
                info!(count = flags.len(), path = %path.display(), "Loaded chat flags");
                flags
            }
            Ok(None) => {
                debug!(path = %path.display(), "No state file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Ignoring unusable state file, starting empty");
                BTreeMap::new()
            }
        };

        Self {
            path,
            flags: RwLock::new(flags),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether auto-translate is on for `chat_id`.
    ///
    /// Returns the stored flag, or [`DEFAULT_ENABLED`] when the chat has no
    /// entry.
    pub async fn is_enabled(&self, chat_id: &str) -> bool {
        self.flags
            .read()
            .await
            .get(chat_id)
            .copied()
            .unwrap_or(DEFAULT_ENABLED)
    }

    /// Sets the flag for `chat_id` and rewrites the state file.
    ///
    /// A failed write is logged and otherwise ignored: the in-memory value
    /// stays in effect for the running process.
    pub async fn set_enabled(&self, chat_id: &str, enabled: bool) {
        let mut flags = self.flags.write().await;
        flags.insert(chat_id.to_string(), enabled);
        info!(chat_id = %chat_id, enabled, "Auto-translate flag changed");

        // Still holding the write lock, so concurrent toggles are written in order.
        if let Err(e) = self.write_file(&flags) {
            error!(error = %e, path = %self.path.display(), "Failed to save chat flags");
        }
    }

    /// Writes the full mapping to the backing file.
    pub async fn persist(&self) -> Result<()> {
        let flags = self.flags.write().await;
        self.write_file(&flags)
    }

    /// Copy of the current mapping.
    pub async fn snapshot(&self) -> BTreeMap<String, bool> {
        self.flags.read().await.clone()
    }

    fn write_file(&self, flags: &BTreeMap<String, bool>) -> Result<()> {
        atomic_write_json(&self.path, flags)?;
        debug!(count = flags.len(), path = %self.path.display(), "Saved chat flags");
        Ok(())
    }
}

impl std::fmt::Debug for ChatStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStateStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
