//! Common test utilities for integration tests

use serde_json::{Value, json};
use std::sync::Arc;
use tenantkv_core::ConnectionParameters;
use tenantkv_fake::FakeBackend;
use tenantkv_resolver::{ConfigResolver, DocumentCache};

/// Install a test-friendly subscriber once; later calls are no-ops
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parameters selecting database `db` on the shared simulated store
///
/// Tests in one binary run concurrently against the same singleton, so each
/// test uses its own database index.
pub fn params(db: i64) -> ConnectionParameters {
    ConnectionParameters::new("localhost", 6379, db, false)
}

#[allow(dead_code)]
pub fn shared_resolver(db: i64) -> ConfigResolver {
    ConfigResolver::new(params(db), Arc::new(FakeBackend::shared()))
}

#[allow(dead_code)]
pub fn shared_cache(db: i64) -> DocumentCache {
    DocumentCache::new(params(db), Arc::new(FakeBackend::shared()))
}

/// A fully populated tenant document
#[allow(dead_code)]
pub fn tenant_document(tenant: &str) -> Value {
    json!({
        "resources": {
            "billing": {
                "host": format!("pg.{}.internal", tenant),
                "port": 5432,
                "user": "billing",
                "password": "s3cret",
                "name": "billing"
            },
            "reports": {
                "host": format!("mongo.{}.internal", tenant),
                "port": 27017,
                "complement": "?authSource=admin"
            },
            "uploads": {
                "bucket_name": format!("{}-uploads", tenant),
                "allowed_files": ["pdf", "csv"]
            },
            "auth": {
                "client_id": "client-123",
                "user_pool_id": "pool-456"
            },
            "gateway": {"host": format!("lb.{}.internal", tenant), "port": 443},
            "scheduler": {
                "host": "airflow.internal",
                "username": "scheduler",
                "password": "hunter2"
            }
        },
        "aws": {
            "region_name": "us-east-1",
            "aws_access_key_id": "AKIATEST",
            "aws_secret_access_key": "secret-key"
        },
        "user_admin": {"email": format!("admin@{}.test", tenant), "name": "Admin"}
    })
}
