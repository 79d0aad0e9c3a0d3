//! Tenant configuration resolution
//!
//! Every lookup opens its own scoped session through a `ConnectionHandle`,
//! so a resolver holds no live connection between calls.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use tenantkv_core::{
    ConnectionHandle, ConnectionParameters, Error, JsonInput, ROOT_PATH, Result, StoreBackend,
    StoreSettings,
};

use crate::factory::create_backend;
use crate::resolved::ResolvedResourceConfig;
use crate::typed::{
    AirflowConfig, CognitoConfig, LoadBalancerConfig, MongoConfig, PostgresConfig, S3Config,
    TypedConfig,
};

const USER_ADMIN_SECTION: &str = "user_admin";

/// Per-tenant, per-service configuration lookup
///
/// Tenant documents are read-only from here except through
/// [`set_json`](Self::set_json).
#[derive(Clone)]
pub struct ConfigResolver {
    params: ConnectionParameters,
    backend: Arc<dyn StoreBackend>,
}

impl ConfigResolver {
    pub fn new(params: ConnectionParameters, backend: Arc<dyn StoreBackend>) -> Self {
        Self { params, backend }
    }

    /// Build a resolver from settings, selecting the backend by mode
    pub fn from_settings(settings: &StoreSettings) -> Result<Self> {
        let backend = create_backend(settings)?;
        Ok(Self::new(settings.connection.clone(), backend))
    }

    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    /// Fresh handle for one scoped session
    pub fn connection(&self) -> ConnectionHandle {
        ConnectionHandle::new(self.params.clone(), self.backend.clone())
    }

    /// Fetch the whole document stored at `key`
    ///
    /// # Errors
    /// - `Error::NotFound` if the key is absent or holds an empty value
    ///   (null, `false`, `0`, `""`, `[]` or `{}`)
    pub fn get_json(&self, key: &str) -> Result<Value> {
        let document = self
            .connection()
            .scoped(|session| session.json_get(key, ROOT_PATH))?;

        match document {
            Some(document) if !is_empty_document(&document) => Ok(document),
            _ => Err(Error::NotFound(key.to_string())),
        }
    }

    /// Store a document at the root of `key`
    ///
    /// Text input is decoded before any session is opened, so malformed
    /// JSON never reaches the store.
    ///
    /// # Errors
    /// - `Error::Serialization` if text input is not valid JSON
    pub fn set_json(&self, key: &str, document: impl Into<JsonInput>) -> Result<String> {
        let value = document.into().into_value()?;
        self.connection()
            .scoped(|session| session.json_set(key, ROOT_PATH, &value))
    }

    /// Merge `resources.<service_id>` with the tenant-wide `aws` section
    ///
    /// # Errors
    /// - `Error::NotFound` if the tenant has no document
    /// - `Error::InvalidDocument` if a merged section is not an object
    pub fn get_resource_config(
        &self,
        service_id: &str,
        tenant_code: &str,
    ) -> Result<ResolvedResourceConfig> {
        let document = self.get_json(tenant_code)?;
        let resolved = ResolvedResourceConfig::from_document(&document, service_id)?;
        debug!(
            tenant = tenant_code,
            service = service_id,
            fields = resolved.len(),
            "Resolved resource config"
        );
        Ok(resolved)
    }

    /// Extract a fixed-field config for `service_id`
    pub fn get_typed_config<T: TypedConfig>(
        &self,
        service_id: &str,
        tenant_code: &str,
    ) -> Result<T> {
        let resolved = self.get_resource_config(service_id, tenant_code)?;
        Ok(T::from_resolved(&resolved))
    }

    pub fn get_postgres_config(
        &self,
        service_id: &str,
        tenant_code: &str,
    ) -> Result<PostgresConfig> {
        self.get_typed_config(service_id, tenant_code)
    }

    pub fn get_mongodb_config(&self, service_id: &str, tenant_code: &str) -> Result<MongoConfig> {
        self.get_typed_config(service_id, tenant_code)
    }

    pub fn get_aws_s3_config(&self, service_id: &str, tenant_code: &str) -> Result<S3Config> {
        self.get_typed_config(service_id, tenant_code)
    }

    pub fn get_aws_cognito_config(
        &self,
        service_id: &str,
        tenant_code: &str,
    ) -> Result<CognitoConfig> {
        self.get_typed_config(service_id, tenant_code)
    }

    pub fn get_load_balancer_config(
        &self,
        service_id: &str,
        tenant_code: &str,
    ) -> Result<LoadBalancerConfig> {
        self.get_typed_config(service_id, tenant_code)
    }

    pub fn get_airflow_config(&self, service_id: &str, tenant_code: &str) -> Result<AirflowConfig> {
        self.get_typed_config(service_id, tenant_code)
    }

    /// `host:port` of the service's load balancer; see [`LoadBalancerConfig::name`]
    pub fn get_load_balancer_name(&self, service_id: &str, tenant_code: &str) -> Result<String> {
        Ok(self.get_load_balancer_config(service_id, tenant_code)?.name())
    }

    /// The tenant's `user_admin` section
    ///
    /// # Errors
    /// - `Error::NotFound` if the tenant has no document
    /// - `Error::MissingSection` if the document has no `user_admin` key
    ///
    /// A key holding JSON null is present and returned as `Value::Null`.
    pub fn get_user_admin(&self, tenant_code: &str) -> Result<Value> {
        let mut document = self.get_json(tenant_code)?;
        document
            .get_mut(USER_ADMIN_SECTION)
            .map(Value::take)
            .ok_or_else(|| Error::MissingSection {
                key: tenant_code.to_string(),
                section: USER_ADMIN_SECTION.to_string(),
            })
    }

    /// Keys matching `pattern`, minus `excluded_keys`, in store order
    pub fn get_tenant_codes<S: AsRef<str>>(
        &self,
        pattern: &str,
        excluded_keys: &[S],
    ) -> Result<Vec<String>> {
        let keys = self.connection().scoped(|session| session.keys(pattern))?;
        Ok(keys
            .into_iter()
            .filter(|key| !excluded_keys.iter().any(|excluded| excluded.as_ref() == key.as_str()))
            .collect())
    }
}

fn is_empty_document(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("params", &self.params)
            .field("backend", &self.backend.name())
            .finish()
    }
}
