//! tenantkv Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout tenantkv:
//! - Connection parameters and scoped session acquisition
//! - Store session/backend trait abstractions
//! - Store settings (file and environment sources)
//! - Core error types

pub mod connection;
pub mod error;
pub mod input;
pub mod session;
pub mod settings;

pub use connection::{ConnectionHandle, ConnectionParameters};
pub use error::{Error, Result};
pub use input::JsonInput;
pub use session::{ROOT_PATH, StoreBackend, StoreSession};
pub use settings::{StoreMode, StoreSettings};
