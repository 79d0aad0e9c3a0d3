//! Store settings
//!
//! Settings select the backend (network store or the in-memory simulated
//! store) and carry the connection parameters. They can be loaded from a
//! YAML/TOML/JSON file, from `TENANTKV_*` environment variables, or both
//! (environment overrides file values).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error};

use crate::{ConnectionParameters, Error, Result};

pub const ENV_MODE: &str = "TENANTKV_MODE";
pub const ENV_HOST: &str = "TENANTKV_HOST";
pub const ENV_PORT: &str = "TENANTKV_PORT";
pub const ENV_DB: &str = "TENANTKV_DB";
pub const ENV_TLS: &str = "TENANTKV_TLS";
pub const ENV_USERNAME: &str = "TENANTKV_USERNAME";
pub const ENV_PASSWORD: &str = "TENANTKV_PASSWORD";

/// Which backend sessions are opened against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// Network store
    #[default]
    Redis,
    /// Process-wide in-memory simulated store
    Fake,
}

impl FromStr for StoreMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreMode::Redis),
            "fake" | "simulated" => Ok(StoreMode::Fake),
            other => Err(Error::Config(format!("Unknown store mode: {}", other))),
        }
    }
}

/// Backend selection plus connection parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub mode: StoreMode,

    #[serde(default)]
    pub connection: ConnectionParameters,
}

impl StoreSettings {
    /// Load settings from a file
    ///
    /// The format follows the extension: `.toml`, `.json`, anything else is
    /// read as YAML. A leading `~` is expanded to the home directory.
    ///
    /// # Errors
    /// - `Error::Io` if the file can't be read
    /// - `Error::Config` if the file can't be parsed or fails validation
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_home(path.as_ref())?;

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read settings file {:?}: {}", path, e);
            Error::Io(e)
        })?;

        let settings: StoreSettings = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?,
            Some("json") => serde_json::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))?,
            _ => serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid YAML: {}", e)))?,
        };

        settings.validate()?;
        debug!("Loaded store settings from {:?}", path);
        Ok(settings)
    }

    /// Build settings from defaults overridden by `TENANTKV_*` variables
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Override fields with any `TENANTKV_*` variables that are set
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(mode) = env_value(ENV_MODE) {
            self.mode = mode.parse()?;
        }
        if let Some(host) = env_value(ENV_HOST) {
            self.connection.host = host;
        }
        if let Some(port) = env_value(ENV_PORT) {
            self.connection.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a port number", ENV_PORT)))?;
        }
        if let Some(db) = env_value(ENV_DB) {
            self.connection.database_index = db
                .parse()
                .map_err(|_| Error::Config(format!("{} must be an integer", ENV_DB)))?;
        }
        if let Some(tls) = env_value(ENV_TLS) {
            self.connection.use_tls = parse_flag(ENV_TLS, &tls)?;
        }
        if let Some(username) = env_value(ENV_USERNAME) {
            self.connection.username = Some(username);
        }
        if let Some(password) = env_value(ENV_PASSWORD) {
            self.connection.password = Some(password);
        }
        Ok(())
    }

    /// Resolve `$VAR_NAME` / `${VAR_NAME}` references in credential fields
    pub fn resolve_env_vars(&mut self) -> Result<()> {
        let username = self.connection.username.as_deref().map(resolve_env_var).transpose()?;
        let password = self.connection.password.as_deref().map(resolve_env_var).transpose()?;
        self.connection.username = username;
        self.connection.password = password;
        Ok(())
    }

    /// Check the connection parameters are usable
    pub fn validate(&self) -> Result<()> {
        let conn = &self.connection;
        if conn.host.trim().is_empty() {
            return Err(Error::Config("'host' must not be empty".to_string()));
        }
        if conn.port == 0 {
            return Err(Error::Config("'port' must be > 0".to_string()));
        }
        if conn.database_index < 0 {
            return Err(Error::Config("'database_index' must be >= 0".to_string()));
        }
        Ok(())
    }
}

fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
            .join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{} must be a boolean", name))),
    }
}

/// Resolve a single environment variable reference
/// Supports: $VAR_NAME or ${VAR_NAME}
/// If no $ prefix, returns value as-is
fn resolve_env_var(value: &str) -> Result<String> {
    let trimmed = value.trim();

    if let Some(var_name) = trimmed.strip_prefix('$') {
        let var_name = var_name
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(var_name);

        std::env::var(var_name)
            .map_err(|_| Error::Config(format!("Environment variable not found: {}", var_name)))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    fn clear_env() {
        for name in [
            ENV_MODE,
            ENV_HOST,
            ENV_PORT,
            ENV_DB,
            ENV_TLS,
            ENV_USERNAME,
            ENV_PASSWORD,
        ] {
            unsafe {
                std::env::remove_var(name);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let settings = StoreSettings::default();
        assert_eq!(settings.mode, StoreMode::Redis);
        assert_eq!(settings.connection.host, "localhost");
        assert_eq!(settings.connection.port, 6379);
        assert_eq!(settings.connection.database_index, 0);
        assert!(!settings.connection.use_tls);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("fake".parse::<StoreMode>().unwrap(), StoreMode::Fake);
        assert_eq!("REDIS".parse::<StoreMode>().unwrap(), StoreMode::Redis);
        assert!("memcached".parse::<StoreMode>().is_err());
    }

    #[test]
    fn test_read_yaml_settings() {
        let file = Builder::new().suffix(".yaml").tempfile().unwrap();
        std::fs::write(
            file.path(),
            r#"
mode: fake
connection:
  host: "cache.internal"
  port: 6380
  db: 3
  ssl: true
"#,
        )
        .unwrap();

        let settings = StoreSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.mode, StoreMode::Fake);
        assert_eq!(settings.connection.host, "cache.internal");
        assert_eq!(settings.connection.port, 6380);
        assert_eq!(settings.connection.database_index, 3);
        assert!(settings.connection.use_tls);
    }

    #[test]
    fn test_read_toml_settings() {
        let file = Builder::new().suffix(".toml").tempfile().unwrap();
        std::fs::write(
            file.path(),
            "mode = \"redis\"\n\n[connection]\nhost = \"10.0.0.5\"\ndatabase_index = 1\n",
        )
        .unwrap();

        let settings = StoreSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.mode, StoreMode::Redis);
        assert_eq!(settings.connection.host, "10.0.0.5");
        assert_eq!(settings.connection.port, 6379);
        assert_eq!(settings.connection.database_index, 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let file = Builder::new().suffix(".yaml").tempfile().unwrap();
        std::fs::write(file.path(), "connection:\n  host: \"\"\n").unwrap();

        let result = StoreSettings::from_file(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = StoreSettings::from_file("/nonexistent/tenantkv.yaml");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env() {
        clear_env();
        unsafe {
            std::env::set_var(ENV_MODE, "fake");
            std::env::set_var(ENV_HOST, "redis.local");
            std::env::set_var(ENV_PORT, "6390");
            std::env::set_var(ENV_DB, "4");
            std::env::set_var(ENV_TLS, "true");
        }

        let settings = StoreSettings::from_env().unwrap();
        assert_eq!(settings.mode, StoreMode::Fake);
        assert_eq!(settings.connection.host, "redis.local");
        assert_eq!(settings.connection.port, 6390);
        assert_eq!(settings.connection.database_index, 4);
        assert!(settings.connection.use_tls);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_bad_port() {
        clear_env();
        unsafe {
            std::env::set_var(ENV_PORT, "not-a-port");
        }

        let result = StoreSettings::from_env();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains(ENV_PORT)));

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_password_reference() {
        unsafe {
            std::env::set_var("TENANTKV_TEST_SECRET", "s3cret");
        }

        let mut settings = StoreSettings::default();
        settings.connection.password = Some("${TENANTKV_TEST_SECRET}".to_string());
        settings.connection.username = Some("app".to_string());
        settings.resolve_env_vars().unwrap();

        assert_eq!(settings.connection.password.as_deref(), Some("s3cret"));
        assert_eq!(settings.connection.username.as_deref(), Some("app"));

        unsafe {
            std::env::remove_var("TENANTKV_TEST_SECRET");
        }
    }

    #[test]
    fn test_resolve_missing_reference() {
        let mut settings = StoreSettings::default();
        settings.connection.password = Some("$TENANTKV_NONEXISTENT_VAR_XYZ".to_string());

        let result = settings.resolve_env_vars();
        assert!(result.unwrap_err().to_string().contains("TENANTKV_NONEXISTENT_VAR_XYZ"));
    }
}
