//! Store backend factory
//!
//! Factory function to create a StoreBackend based on settings.

use std::sync::Arc;
use tracing::info;

use tenantkv_core::{Result, StoreBackend, StoreMode, StoreSettings};
use tenantkv_fake::FakeBackend;

/// Create a store backend based on settings
///
/// `StoreMode::Fake` always binds to the process-wide simulated store, so
/// every resolver and cache built in fake mode sees the same data.
///
/// # Errors
/// - `Error::Config` if Redis mode is requested but the `redis` feature is
///   disabled
pub fn create_backend(settings: &StoreSettings) -> Result<Arc<dyn StoreBackend>> {
    match settings.mode {
        StoreMode::Fake => {
            info!("Using shared simulated store");
            Ok(Arc::new(FakeBackend::shared()))
        }
        StoreMode::Redis => redis_backend(settings),
    }
}

#[cfg(feature = "redis")]
fn redis_backend(settings: &StoreSettings) -> Result<Arc<dyn StoreBackend>> {
    info!("Using Redis store at {}", settings.connection.target());
    Ok(Arc::new(tenantkv_redis::RedisBackend::new()))
}

#[cfg(not(feature = "redis"))]
fn redis_backend(_settings: &StoreSettings) -> Result<Arc<dyn StoreBackend>> {
    Err(tenantkv_core::Error::Config(
        "Redis mode requested but the `redis` feature is disabled".to_string(),
    ))
}
