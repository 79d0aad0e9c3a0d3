//! RedisBackend - StoreBackend trait implementation for Redis with RedisJSON

use redis::{Commands, ConnectionAddr, ConnectionInfo, JsonCommands, RedisConnectionInfo};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use tenantkv_core::{ConnectionParameters, Error, Result, StoreBackend, StoreSession};

/// Build the client connection info for a set of parameters
///
/// Host, port, database index, TLS flag and credentials are passed through
/// unchanged. Certificates are always verified on TLS connections.
pub fn connection_info(params: &ConnectionParameters) -> ConnectionInfo {
    let addr = if params.use_tls {
        ConnectionAddr::TcpTls {
            host: params.host.clone(),
            port: params.port,
            insecure: false,
            tls_params: None,
        }
    } else {
        ConnectionAddr::Tcp(params.host.clone(), params.port)
    };

    ConnectionInfo {
        addr,
        redis: RedisConnectionInfo {
            db: params.database_index,
            username: params.username.clone(),
            password: params.password.clone(),
            ..Default::default()
        },
    }
}

/// Redis-backed session factory
///
/// Every `open` builds a fresh client connection; nothing is pooled.
#[derive(Debug, Clone, Default)]
pub struct RedisBackend {
    /// Optional connect timeout
    connect_timeout: Option<Duration>,
}

impl RedisBackend {
    /// Create a backend with no connect timeout
    pub fn new() -> Self {
        info!("Initialized RedisBackend");
        Self::default()
    }

    /// Bound how long `open` may wait for the TCP/TLS handshake
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl StoreBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn open(&self, params: &ConnectionParameters) -> Result<Box<dyn StoreSession>> {
        let target = params.target();

        let client = redis::Client::open(connection_info(params)).map_err(|e| {
            Error::Connection(format!("Invalid connection parameters for {}: {}", target, e))
        })?;

        let connection = match self.connect_timeout {
            Some(timeout) => client.get_connection_with_timeout(timeout),
            None => client.get_connection(),
        }
        .map_err(|e| Error::Connection(format!("Failed to connect to {}: {}", target, e)))?;

        debug!(store = %target, tls = params.use_tls, "Connected to Redis");
        Ok(Box::new(RedisSession {
            connection: Some(connection),
            target,
        }))
    }
}

/// One live Redis connection
///
/// Closing drops the underlying socket; later commands fail with
/// `Error::Connection`.
pub struct RedisSession {
    connection: Option<redis::Connection>,
    target: String,
}

impl RedisSession {
    fn connection(&mut self) -> Result<&mut redis::Connection> {
        self.connection
            .as_mut()
            .ok_or_else(|| Error::Connection(format!("Session to {} is closed", self.target)))
    }
}

fn store_error(command: &str, key: &str, e: redis::RedisError) -> Error {
    Error::Store(format!("{} {} failed: {}", command, key, e))
}

impl StoreSession for RedisSession {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .connection()?
            .get(key)
            .map_err(|e| store_error("GET", key, e))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<String> {
        let ack: String = self
            .connection()?
            .set(key, value)
            .map_err(|e| store_error("SET", key, e))?;
        Ok(ack)
    }

    fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        let keys: Vec<String> = self
            .connection()?
            .keys(pattern)
            .map_err(|e| store_error("KEYS", pattern, e))?;
        Ok(keys)
    }

    fn json_get(&mut self, key: &str, path: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .connection()?
            .json_get(key, path)
            .map_err(|e| store_error("JSON.GET", key, e))?;

        let Some(raw) = raw else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw)?;

        // JSONPath queries ($...) answer with an array of matches
        if path.trim_start().starts_with('$') {
            return match value {
                Value::Array(matches) => Ok(matches.into_iter().next()),
                other => Ok(Some(other)),
            };
        }
        Ok(Some(value))
    }

    fn json_set(&mut self, key: &str, path: &str, value: &Value) -> Result<String> {
        let ack: String = self
            .connection()?
            .json_set(key, path, value)
            .map_err(|e| store_error("JSON.SET", key, e))?;
        Ok(ack)
    }

    fn close(&mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => {
                drop(connection);
                debug!(store = %self.target, "Closed Redis connection");
                Ok(())
            }
            None => Err(Error::Connection(format!(
                "Session to {} already closed",
                self.target
            ))),
        }
    }
}
