//! Schema-free JSON document cache

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use tenantkv_core::{
    ConnectionHandle, ConnectionParameters, ROOT_PATH, Result, StoreBackend, StoreSettings,
};

use crate::factory::create_backend;

/// Get/set of whole JSON documents by key
///
/// Unlike [`ConfigResolver`](crate::ConfigResolver), a miss is a normal
/// outcome and never an error.
#[derive(Clone)]
pub struct DocumentCache {
    params: ConnectionParameters,
    backend: Arc<dyn StoreBackend>,
}

impl DocumentCache {
    pub fn new(params: ConnectionParameters, backend: Arc<dyn StoreBackend>) -> Self {
        Self { params, backend }
    }

    pub fn from_settings(settings: &StoreSettings) -> Result<Self> {
        let backend = create_backend(settings)?;
        Ok(Self::new(settings.connection.clone(), backend))
    }

    /// Fresh handle for one scoped session
    pub fn connection(&self) -> ConnectionHandle {
        ConnectionHandle::new(self.params.clone(), self.backend.clone())
    }

    /// Store `document` at the root of `hash_key`
    ///
    /// `expire` is accepted but does not set a TTL; expiration is left to
    /// the caller or the store.
    pub fn save_cache(&self, hash_key: &str, document: &Value, expire: bool) -> Result<String> {
        if expire {
            debug!(key = hash_key, "Expiration requested but not applied");
        }
        self.connection()
            .scoped(|session| session.json_set(hash_key, ROOT_PATH, document))
    }

    /// Cached document at `hash_key`, `None` on a miss
    pub fn get_cache(&self, hash_key: &str) -> Result<Option<Value>> {
        self.connection()
            .scoped(|session| session.json_get(hash_key, ROOT_PATH))
    }
}

impl fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCache")
            .field("params", &self.params)
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenantkv_fake::{FakeBackend, FakeServer};

    fn cache_on(server: Arc<FakeServer>, db: i64) -> DocumentCache {
        DocumentCache::new(
            ConnectionParameters::new("localhost", 6379, db, false),
            Arc::new(FakeBackend::new(server)),
        )
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = cache_on(Arc::new(FakeServer::new()), 0);
        assert_eq!(cache.get_cache("nope").unwrap(), None);
    }

    #[test]
    fn test_save_then_get() {
        let cache = cache_on(Arc::new(FakeServer::new()), 0);
        let document = json!({"rows": [1, 2, 3], "total": 3});

        assert_eq!(cache.save_cache("report:42", &document, false).unwrap(), "OK");
        assert_eq!(cache.get_cache("report:42").unwrap(), Some(document));
    }

    #[test]
    fn test_expire_flag_is_inert() {
        let server = Arc::new(FakeServer::new());
        let cache = cache_on(server.clone(), 0);

        cache.save_cache("k", &json!("v"), true).unwrap();
        assert_eq!(cache.get_cache("k").unwrap(), Some(json!("v")));
        assert_eq!(server.db_size(0).unwrap(), 1);
    }

    #[test]
    fn test_overwrite_replaces_document() {
        let cache = cache_on(Arc::new(FakeServer::new()), 0);
        cache.save_cache("k", &json!({"a": 1}), false).unwrap();
        cache.save_cache("k", &json!({"b": 2}), false).unwrap();

        assert_eq!(cache.get_cache("k").unwrap(), Some(json!({"b": 2})));
    }

    #[test]
    fn test_database_index_isolates_entries() {
        let server = Arc::new(FakeServer::new());
        cache_on(server.clone(), 3)
            .save_cache("k", &json!(1), false)
            .unwrap();

        assert_eq!(cache_on(server.clone(), 4).get_cache("k").unwrap(), None);
        assert_eq!(cache_on(server, 3).get_cache("k").unwrap(), Some(json!(1)));
    }
}
