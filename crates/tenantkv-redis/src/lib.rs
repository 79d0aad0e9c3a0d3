//! Redis-backed store sessions for tenantkv
//!
//! This crate implements the `StoreBackend` trait over a Redis server with
//! the RedisJSON module loaded.
//!
//! # Features
//! - Plain TCP or TLS (`rediss://`) connections
//! - Database index selection
//! - Username/password passed through to the server
//! - Decoded (UTF-8 text) responses throughout
//!
//! # Example
//! ```no_run
//! # use std::sync::Arc;
//! # use tenantkv_core::{ConnectionHandle, ConnectionParameters};
//! # use tenantkv_redis::RedisBackend;
//! # fn example() -> tenantkv_core::Result<()> {
//! let handle = ConnectionHandle::new(
//!     ConnectionParameters::new("localhost", 6379, 0, false),
//!     Arc::new(RedisBackend::new()),
//! );
//! let tenants = handle.scoped(|session| session.keys("*"))?;
//! # Ok(())
//! # }
//! ```

mod redis_store;

pub use redis_store::{RedisBackend, RedisSession, connection_info};
