//! End-to-end integration tests for tenantkv
//!
//! These tests wire settings, the backend factory, the resolver and the
//! document cache together against the shared simulated store.

#[cfg(test)]
mod e2e_tests {
    use serde_json::json;
    use std::io::Write;
    use tenantkv_core::{StoreMode, StoreSettings};
    use tenantkv_fake::FakeServer;
    use tenantkv_resolver::{ConfigResolver, DocumentCache};

    fn write_settings(contents: &str, suffix: &str) -> anyhow::Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_e2e_settings_file_to_resolver() -> anyhow::Result<()> {
        let file = write_settings(
            r#"
mode: fake
connection:
  host: localhost
  port: 6379
  db: 41
"#,
            ".yaml",
        )?;

        let settings = StoreSettings::from_file(file.path())?;
        assert_eq!(settings.mode, StoreMode::Fake);
        assert_eq!(settings.connection.database_index, 41);

        let resolver = ConfigResolver::from_settings(&settings)?;
        resolver.set_json(
            "acme",
            json!({
                "resources": {"billing": {"host": "pg.acme", "port": 5432, "user": "app"}},
                "aws": {"region_name": "eu-central-1"}
            }),
        )?;

        let postgres = resolver.get_postgres_config("billing", "acme")?;
        assert_eq!(postgres.host, Some(json!("pg.acme")));
        assert_eq!(postgres.user, Some(json!("app")));
        assert_eq!(postgres.password, None);

        // The write landed in the process-wide store
        assert_eq!(FakeServer::instance().db_size(41)?, 1);
        Ok(())
    }

    #[test]
    fn test_e2e_resolver_and_cache_share_store() -> anyhow::Result<()> {
        let file = write_settings(
            r#"
mode = "fake"

[connection]
host = "localhost"
port = 6379
database_index = 42
"#,
            ".toml",
        )?;
        let settings = StoreSettings::from_file(file.path())?;

        let cache = DocumentCache::from_settings(&settings)?;
        let resolver = ConfigResolver::from_settings(&settings)?;

        cache.save_cache("tenant-x", &json!({"aws": {"region_name": "us-west-2"}}), true)?;
        let s3 = resolver.get_aws_s3_config("uploads", "tenant-x")?;

        assert_eq!(s3.region_name, Some(json!("us-west-2")));
        assert_eq!(s3.allowed_files, json!([]));
        Ok(())
    }
}
