//! Tenant configuration resolution and document cache for tenantkv
//!
//! This crate sits on top of a `StoreBackend` and provides:
//! - [`ConfigResolver`]: per-tenant, per-service configuration lookup with
//!   typed extraction (database, object storage, identity provider, load
//!   balancer, workflow orchestrator)
//! - [`DocumentCache`]: schema-free JSON document caching
//! - [`create_backend`]: backend selection from `StoreSettings`
//!
//! # Tenant document layout
//! ```json
//! {
//!   "resources": { "<service_id>": { "host": "...", "port": 5432 } },
//!   "aws": { "region_name": "...", "aws_access_key_id": "..." },
//!   "user_admin": { "email": "..." }
//! }
//! ```
//!
//! # Example
//! ```no_run
//! # use tenantkv_core::StoreSettings;
//! # use tenantkv_resolver::ConfigResolver;
//! # fn example() -> tenantkv_core::Result<()> {
//! let resolver = ConfigResolver::from_settings(&StoreSettings::from_env()?)?;
//! let postgres = resolver.get_postgres_config("billing", "acme")?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod factory;
mod resolved;
mod resolver;
pub mod typed;

pub use cache::DocumentCache;
pub use factory::create_backend;
pub use resolved::ResolvedResourceConfig;
pub use resolver::ConfigResolver;
pub use typed::{
    AirflowConfig, CognitoConfig, LoadBalancerConfig, MongoConfig, PostgresConfig, S3Config,
    TypedConfig,
};
