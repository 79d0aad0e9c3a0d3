//! Flattened per-service configuration
//!
//! A tenant document keeps service-specific settings under
//! `resources.<service_id>` and tenant-wide cloud credentials under `aws`.
//! Resolution overlays `aws` on top of the service entry so every service
//! sees the shared credentials without duplicating them.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use tenantkv_core::{Error, Result};

/// Merge of `resources.<service_id>` and `aws`, with `aws` winning on
/// conflicting keys
///
/// Computed per call; never written back to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedResourceConfig {
    values: Map<String, Value>,
}

impl ResolvedResourceConfig {
    /// Resolve the configuration for `service_id` from a tenant document
    ///
    /// Absent (or null) sections count as empty mappings.
    ///
    /// # Errors
    /// - `Error::InvalidDocument` if `resources`, `resources.<service_id>`
    ///   or `aws` exists but is not an object
    pub fn from_document(document: &Value, service_id: &str) -> Result<Self> {
        let resources = section(document.get("resources"), "resources")?;
        let mut values = section(
            resources.get(service_id),
            &format!("resources.{}", service_id),
        )?;
        let aws = section(document.get("aws"), "aws")?;

        values.extend(aws);
        Ok(Self { values })
    }

    /// Raw value for `field`; JSON null counts as absent
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field).filter(|value| !value.is_null())
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Value for `field` exactly as stored; JSON null counts as absent
    pub fn value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned()
    }

    /// Port value for `field`
    ///
    /// Values that are not a port number are logged and passed through
    /// unchanged.
    pub fn port(&self, field: &str) -> Option<Value> {
        let value = self.get(field)?;
        if !is_port(value) {
            warn!(field, value = %value, "Expected a port number");
        }
        Some(value.clone())
    }

    /// List value for `field`, an empty array when absent
    ///
    /// Non-array values are logged and passed through unchanged.
    pub fn list(&self, field: &str) -> Value {
        match self.get(field) {
            None => Value::Array(Vec::new()),
            Some(value) => {
                if !value.is_array() {
                    warn!(field, kind = kind(value), "Expected a list config value");
                }
                value.clone()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for ResolvedResourceConfig {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

fn section(value: Option<&Value>, name: &str) -> Result<Map<String, Value>> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(Error::InvalidDocument(format!(
            "'{}' must be an object, found {}",
            name,
            kind(other)
        ))),
    }
}

fn is_port(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_u64().is_some_and(|n| u16::try_from(n).is_ok()),
        Value::String(text) => text.trim().parse::<u16>().is_ok(),
        _ => false,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
