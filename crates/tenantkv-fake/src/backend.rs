//! StoreBackend implementation over a `FakeServer`

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use tenantkv_core::{ConnectionParameters, Error, Result, StoreBackend, StoreSession};

use crate::server::FakeServer;

const OK: &str = "OK";

/// Opens sessions against a `FakeServer` instead of a network endpoint
///
/// Host, port and TLS settings are ignored; the database index selects the
/// keyspace.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    server: Arc<FakeServer>,
}

impl FakeBackend {
    pub fn new(server: Arc<FakeServer>) -> Self {
        Self { server }
    }

    /// Backend bound to the process-wide [`FakeServer::instance`]
    pub fn shared() -> Self {
        Self::new(FakeServer::instance())
    }

    pub fn server(&self) -> &Arc<FakeServer> {
        &self.server
    }
}

impl StoreBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn open(&self, params: &ConnectionParameters) -> Result<Box<dyn StoreSession>> {
        Ok(Box::new(FakeSession::new(
            self.server.clone(),
            params.database_index,
        )))
    }
}

/// One simulated session bound to a database index
#[derive(Debug)]
pub struct FakeSession {
    server: Arc<FakeServer>,
    db: i64,
    open: bool,
}

impl FakeSession {
    pub fn new(server: Arc<FakeServer>, db: i64) -> Self {
        Self {
            server,
            db,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn server(&self) -> Result<&FakeServer> {
        if self.open {
            Ok(self.server.as_ref())
        } else {
            Err(Error::Connection("Session is closed".to_string()))
        }
    }
}

impl StoreSession for FakeSession {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        self.server()?.get(self.db, key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<String> {
        self.server()?.set(self.db, key, value)?;
        Ok(OK.to_string())
    }

    fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        self.server()?.keys(self.db, pattern)
    }

    fn json_get(&mut self, key: &str, path: &str) -> Result<Option<Value>> {
        self.server()?.json_get(self.db, key, path)
    }

    fn json_set(&mut self, key: &str, path: &str, value: &Value) -> Result<String> {
        self.server()?.json_set(self.db, key, path, value.clone())?;
        Ok(OK.to_string())
    }

    fn close(&mut self) -> Result<()> {
        if !self.open {
            return Err(Error::Connection("Session already closed".to_string()));
        }
        self.open = false;
        debug!(db = self.db, "Closed simulated session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenantkv_core::ConnectionHandle;

    fn isolated_backend() -> FakeBackend {
        FakeBackend::new(Arc::new(FakeServer::new()))
    }

    #[test]
    fn test_shared_backend_uses_instance() {
        let backend = FakeBackend::shared();
        assert!(Arc::ptr_eq(backend.server(), &FakeServer::instance()));
    }

    #[test]
    fn test_session_selects_database() {
        let backend = isolated_backend();
        let mut db0 = backend.open(&ConnectionParameters::default()).unwrap();
        let mut db1 = backend
            .open(&ConnectionParameters::new("localhost", 6379, 1, false))
            .unwrap();

        db0.set("key", "zero").unwrap();
        assert_eq!(db1.get("key").unwrap(), None);
        assert_eq!(db0.get("key").unwrap().as_deref(), Some("zero"));
    }

    #[test]
    fn test_closed_session_rejects_commands() {
        let mut session = FakeSession::new(Arc::new(FakeServer::new()), 0);
        session.close().unwrap();

        assert!(!session.is_open());
        assert!(matches!(session.get("k"), Err(Error::Connection(_))));
        assert!(matches!(session.close(), Err(Error::Connection(_))));
    }

    #[test]
    fn test_scoped_json_write_then_read() {
        let backend = Arc::new(isolated_backend());
        let params = ConnectionParameters::default();

        let ack = ConnectionHandle::new(params.clone(), backend.clone())
            .scoped(|session| session.json_set("doc", "$", &json!({"a": 1})))
            .unwrap();
        assert_eq!(ack, "OK");

        let doc = ConnectionHandle::new(params, backend)
            .scoped(|session| session.json_get("doc", "$"))
            .unwrap();
        assert_eq!(doc, Some(json!({"a": 1})));
    }
}
