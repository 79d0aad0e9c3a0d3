//! Connection parameters and scoped session acquisition
//!
//! A `ConnectionHandle` pairs one set of `ConnectionParameters` with a
//! `StoreBackend`. The only way to reach a live session is
//! [`ConnectionHandle::scoped`]: the session is opened on entry and closed
//! exactly once on exit, whether the body returns normally, returns an
//! error, or panics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::session::{StoreBackend, StoreSession};
use crate::Result;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

/// Logical target of the backing store
///
/// Immutable once handed to a `ConnectionHandle`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    /// Store hostname
    #[serde(default = "default_host")]
    pub host: String,

    /// Store port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logical database index
    #[serde(default, alias = "db")]
    pub database_index: i64,

    /// Connect over TLS
    #[serde(default, alias = "ssl")]
    pub use_tls: bool,

    /// Username passed through to the store (supports $VAR_NAME or ${VAR_NAME})
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password passed through to the store (supports $VAR_NAME or ${VAR_NAME})
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ConnectionParameters {
    pub fn new(host: impl Into<String>, port: u16, database_index: i64, use_tls: bool) -> Self {
        Self {
            host: host.into(),
            port,
            database_index,
            use_tls,
            username: None,
            password: None,
        }
    }

    /// Attach credentials that are forwarded to the store as-is
    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password;
        self
    }

    /// `host:port/db` for log lines
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database_index)
    }
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self::new(default_host(), default_port(), 0, false)
    }
}

// Manual Debug so credentials never reach logs
impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_index", &self.database_index)
            .field("use_tls", &self.use_tls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Scoped access to one store session
///
/// Consumed by [`scoped`](Self::scoped), so a handle can never be reused
/// for a second scope.
pub struct ConnectionHandle {
    params: ConnectionParameters,
    backend: Arc<dyn StoreBackend>,
}

impl ConnectionHandle {
    pub fn new(params: ConnectionParameters, backend: Arc<dyn StoreBackend>) -> Self {
        Self { params, backend }
    }

    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Open a session, run `body` against it, and close it
    ///
    /// # Errors
    /// - Open failures are returned as-is and no close is attempted
    /// - Errors from `body` are returned after the session is closed
    /// - A close failure is returned when `body` succeeded; when `body`
    ///   failed too, the body error wins and the close error is logged
    pub fn scoped<T, F>(self, body: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreSession) -> Result<T>,
    {
        let session = self.backend.open(&self.params)?;
        debug!(
            backend = self.backend.name(),
            store = %self.params.target(),
            "Opened store session"
        );

        let mut guard = SessionGuard::new(session);
        let outcome = body(guard.session.as_mut());
        let closed = guard.close();

        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "Failed to close store session after error");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("params", &self.params)
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Closes the wrapped session exactly once, on the explicit path or on drop
struct SessionGuard {
    session: Box<dyn StoreSession>,
    closed: bool,
}

impl SessionGuard {
    fn new(session: Box<dyn StoreSession>) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        let result = self.session.close();
        debug!(ok = result.is_ok(), "Closed store session");
        result
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        // Only reached without an explicit close when the body panicked
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.session.close() {
                warn!(error = %e, "Failed to close store session during unwind");
            }
        }
    }
}
