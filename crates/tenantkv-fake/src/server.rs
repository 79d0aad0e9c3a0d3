//! Shared in-memory keyspace

use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use tenantkv_core::{Error, Result};

use crate::path::JsonPath;
use crate::pattern::pattern_matches;

/// Process-wide simulated store, created on first use
static INSTANCE: OnceCell<Arc<FakeServer>> = OnceCell::new();

#[derive(Debug, Clone, PartialEq)]
enum StoredValue {
    Text(String),
    Json(Value),
}

type Keyspace = BTreeMap<String, StoredValue>;

/// In-memory stand-in for the backing store
///
/// Keys are kept per database index and iterate in sorted order. All
/// operations take `&self`; the keyspaces sit behind one `RwLock`, so any
/// number of sessions may share a server across threads.
#[derive(Debug, Default)]
pub struct FakeServer {
    databases: RwLock<HashMap<i64, Keyspace>>,
}

impl FakeServer {
    /// Create an isolated server (not the shared instance)
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide server
    ///
    /// The first caller creates it; every later call, from any thread,
    /// returns the same instance. It lives until the process exits.
    pub fn instance() -> Arc<FakeServer> {
        INSTANCE
            .get_or_init(|| {
                info!("Initialized shared FakeServer");
                Arc::new(FakeServer::new())
            })
            .clone()
    }

    /// `GET key`
    pub fn get(&self, db: i64, key: &str) -> Result<Option<String>> {
        let databases = self.read()?;
        match databases.get(&db).and_then(|keyspace| keyspace.get(key)) {
            None => Ok(None),
            Some(StoredValue::Text(text)) => Ok(Some(text.clone())),
            Some(StoredValue::Json(_)) => Err(wrong_type(key)),
        }
    }

    /// `SET key value`
    pub fn set(&self, db: i64, key: &str, value: &str) -> Result<()> {
        let mut databases = self.write()?;
        databases
            .entry(db)
            .or_default()
            .insert(key.to_string(), StoredValue::Text(value.to_string()));
        Ok(())
    }

    /// `KEYS pattern`, sorted
    pub fn keys(&self, db: i64, pattern: &str) -> Result<Vec<String>> {
        let databases = self.read()?;
        let keys = databases
            .get(&db)
            .map(|keyspace| {
                keyspace
                    .keys()
                    .filter(|key| pattern_matches(pattern, key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(keys)
    }

    /// `JSON.GET key path`
    pub fn json_get(&self, db: i64, key: &str, path: &str) -> Result<Option<Value>> {
        let path = JsonPath::parse(path)?;
        let databases = self.read()?;
        match databases.get(&db).and_then(|keyspace| keyspace.get(key)) {
            None => Ok(None),
            Some(StoredValue::Json(document)) => Ok(path.lookup(document).cloned()),
            Some(StoredValue::Text(_)) => Err(wrong_type(key)),
        }
    }

    /// `JSON.SET key path value`
    ///
    /// New keys can only be created at the root path.
    pub fn json_set(&self, db: i64, key: &str, path: &str, value: Value) -> Result<()> {
        let path = JsonPath::parse(path)?;
        let mut databases = self.write()?;
        let keyspace = databases.entry(db).or_default();

        match keyspace.get_mut(key) {
            Some(StoredValue::Json(document)) => path.assign(document, value),
            Some(StoredValue::Text(_)) => Err(wrong_type(key)),
            None if path.is_root() => {
                keyspace.insert(key.to_string(), StoredValue::Json(value));
                Ok(())
            }
            None => Err(Error::Store(format!(
                "New document '{}' must be created at the root path",
                key
            ))),
        }
    }

    /// `DBSIZE`
    pub fn db_size(&self, db: i64) -> Result<usize> {
        Ok(self.read()?.get(&db).map(BTreeMap::len).unwrap_or(0))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<i64, Keyspace>>> {
        self.databases
            .read()
            .map_err(|e| Error::Internal(format!("FakeServer lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<i64, Keyspace>>> {
        self.databases
            .write()
            .map_err(|e| Error::Internal(format!("FakeServer lock poisoned: {}", e)))
    }
}

fn wrong_type(key: &str) -> Error {
    Error::Store(format!(
        "WRONGTYPE Operation against key '{}' holding the wrong kind of value",
        key
    ))
}
