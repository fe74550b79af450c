//! Persistence layer for Lingo Relay.
//!
//! Stores the per-chat auto-translate flag in a single JSON file that is
//! rewritten atomically (temp file, then rename) on every change.
//!
//! # Example
//!
//! ```no_run
//! use lingo_persistence::ChatStateStore;
//!
//! # async fn demo() {
//! let store = ChatStateStore::load("/home/user/.lingo-relay/chats.json");
//!
//! assert!(store.is_enabled("42").await);
//! store.set_enabled("42", false).await;
//! assert!(!store.is_enabled("42").await);
//! # }
//! ```

pub mod atomic;
pub mod chat_store;
pub mod error;

pub use chat_store::{ChatStateStore, DEFAULT_ENABLED};
pub use error::{PersistenceError, Result};
