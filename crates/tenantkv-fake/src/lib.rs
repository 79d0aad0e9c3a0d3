//! In-memory simulated store for tenantkv
//!
//! This crate provides a stand-in for the network backing store, used when
//! real infrastructure is unavailable (tests, local development).
//!
//! # Features
//! - Thread-safe keyspaces, one per database index
//! - Plain string values and JSON documents
//! - Redis-style glob matching for `KEYS`
//! - A lazily created, process-wide [`FakeServer::instance`]
//!
//! # Example
//! ```no_run
//! # use std::sync::Arc;
//! # use tenantkv_core::{ConnectionHandle, ConnectionParameters};
//! # use tenantkv_fake::FakeBackend;
//! # fn example() -> tenantkv_core::Result<()> {
//! let handle = ConnectionHandle::new(
//!     ConnectionParameters::default(),
//!     Arc::new(FakeBackend::shared()),
//! );
//! let keys = handle.scoped(|session| session.keys("*"))?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod path;
mod pattern;
mod server;

pub use backend::{FakeBackend, FakeSession};
pub use pattern::pattern_matches;
pub use server::FakeServer;
