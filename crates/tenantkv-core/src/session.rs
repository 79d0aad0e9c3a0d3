//! Store session and backend traits
//!
//! A `StoreBackend` knows how to open sessions against one kind of backing
//! store (the network store, or the in-memory simulated store). A
//! `StoreSession` is one live session exposing the key/value and JSON
//! document commands this library needs.
//!
//! Sessions are never handed out directly; callers go through
//! [`ConnectionHandle::scoped`](crate::ConnectionHandle::scoped), which
//! guarantees the session is closed.

use serde_json::Value;

use crate::{ConnectionParameters, Result};

/// JSONPath addressing the whole document
pub const ROOT_PATH: &str = "$";

/// One live session against a backing store
///
/// All responses are decoded text (or JSON values decoded from text), never
/// raw bytes.
pub trait StoreSession: Send {
    /// `GET key`
    fn get(&mut self, key: &str) -> Result<Option<String>>;

    /// `SET key value`, returning the store acknowledgment
    fn set(&mut self, key: &str, value: &str) -> Result<String>;

    /// `KEYS pattern`, in the order the store yields them
    fn keys(&mut self, pattern: &str) -> Result<Vec<String>>;

    /// `JSON.GET key path`
    ///
    /// Returns the single value addressed by `path`, or `None` when the key
    /// (or the path inside it) does not exist.
    fn json_get(&mut self, key: &str, path: &str) -> Result<Option<Value>>;

    /// `JSON.SET key path value`, returning the store acknowledgment
    fn json_set(&mut self, key: &str, path: &str, value: &Value) -> Result<String>;

    /// Close the session
    ///
    /// Called exactly once by the owning `ConnectionHandle`.
    fn close(&mut self) -> Result<()>;
}

/// Factory for store sessions
pub trait StoreBackend: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &'static str;

    /// Open a new session bound to `params`
    ///
    /// # Errors
    /// - `Error::Connection` if the session cannot be established
    fn open(&self, params: &ConnectionParameters) -> Result<Box<dyn StoreSession>>;
}
