//! Integration tests for the process-wide simulated store
//!
//! Every test in this binary shares one `FakeServer::instance()`.

mod common;

use common::{params, shared_resolver};
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;
use tenantkv_core::{ConnectionHandle, StoreBackend};
use tenantkv_fake::{FakeBackend, FakeServer};

#[test]
fn test_sequential_requests_return_same_instance() {
    let first = FakeServer::instance();
    let second = FakeServer::instance();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_concurrent_first_access_agrees() {
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                FakeServer::instance()
            })
        })
        .collect();

    let instances: Vec<Arc<FakeServer>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn test_concurrent_sessions_share_data() {
    let db = 20;
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let backend: Arc<dyn StoreBackend> = Arc::new(FakeBackend::shared());
                ConnectionHandle::new(params(db), backend)
                    .scoped(|session| {
                        session.json_set(&format!("tenant-{}", i), "$", &json!({"aws": {"n": i}}))
                    })
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "OK");
    }

    let resolver = shared_resolver(db);
    let codes = resolver.get_tenant_codes("tenant-*", &[] as &[&str]).unwrap();
    assert_eq!(codes.len(), 8);
    assert_eq!(
        resolver.get_resource_config("any", "tenant-3").unwrap().get("n"),
        Some(&json!(3))
    );
}

#[test]
fn test_separate_backends_see_same_keyspace() {
    let writer = shared_resolver(21);
    let reader = shared_resolver(21);

    writer.set_json("shared", json!({"aws": {"k": "v"}})).unwrap();
    assert_eq!(
        reader.get_json("shared").unwrap(),
        json!({"aws": {"k": "v"}})
    );
}
