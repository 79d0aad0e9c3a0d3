//! Fixed-shape configurations extracted from a resolved service config
//!
//! Every typed config has a fixed set of fields. Fields missing from the
//! tenant document resolve to an explicit empty value (`None`, or an empty
//! list), so a serialized config always carries exactly [`TypedConfig::FIELDS`].
//! Fields that are present keep their stored JSON value, whatever its shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolved::ResolvedResourceConfig;

/// A fixed-field view over a [`ResolvedResourceConfig`]
pub trait TypedConfig: Serialize + Sized {
    /// Declared field names, in serialization order
    const FIELDS: &'static [&'static str];

    /// Extract the declared fields, defaulting anything absent
    fn from_resolved(resolved: &ResolvedResourceConfig) -> Self;

    /// Serialize as a mapping containing exactly `FIELDS`
    fn to_mapping(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Relational database connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: Option<Value>,
    pub port: Option<Value>,
    pub user: Option<Value>,
    pub password: Option<Value>,
    pub name: Option<Value>,
}

impl TypedConfig for PostgresConfig {
    const FIELDS: &'static [&'static str] = &["host", "port", "user", "password", "name"];

    fn from_resolved(resolved: &ResolvedResourceConfig) -> Self {
        Self {
            host: resolved.value("host"),
            port: resolved.port("port"),
            user: resolved.value("user"),
            password: resolved.value("password"),
            name: resolved.value("name"),
        }
    }
}

/// Document database connection settings
///
/// `complement` carries extra connection-string options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoConfig {
    pub host: Option<Value>,
    pub port: Option<Value>,
    pub user: Option<Value>,
    pub password: Option<Value>,
    pub name: Option<Value>,
    pub complement: Option<Value>,
}

impl TypedConfig for MongoConfig {
    const FIELDS: &'static [&'static str] =
        &["host", "port", "user", "password", "name", "complement"];

    fn from_resolved(resolved: &ResolvedResourceConfig) -> Self {
        Self {
            host: resolved.value("host"),
            port: resolved.port("port"),
            user: resolved.value("user"),
            password: resolved.value("password"),
            name: resolved.value("name"),
            complement: resolved.value("complement"),
        }
    }
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// Object storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    pub region_name: Option<Value>,
    pub aws_access_key_id: Option<Value>,
    pub aws_secret_access_key: Option<Value>,
    pub bucket_name: Option<Value>,
    /// Allowed upload file types; `[]` when unset
    #[serde(default = "empty_list")]
    pub allowed_files: Value,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region_name: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            bucket_name: None,
            allowed_files: empty_list(),
        }
    }
}

impl TypedConfig for S3Config {
    const FIELDS: &'static [&'static str] = &[
        "region_name",
        "aws_access_key_id",
        "aws_secret_access_key",
        "bucket_name",
        "allowed_files",
    ];

    fn from_resolved(resolved: &ResolvedResourceConfig) -> Self {
        Self {
            region_name: resolved.value("region_name"),
            aws_access_key_id: resolved.value("aws_access_key_id"),
            aws_secret_access_key: resolved.value("aws_secret_access_key"),
            bucket_name: resolved.value("bucket_name"),
            allowed_files: resolved.list("allowed_files"),
        }
    }
}

/// Identity provider settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitoConfig {
    pub region_name: Option<Value>,
    pub aws_access_key_id: Option<Value>,
    pub aws_secret_access_key: Option<Value>,
    pub client_id: Option<Value>,
    pub user_pool_id: Option<Value>,
}

impl TypedConfig for CognitoConfig {
    const FIELDS: &'static [&'static str] = &[
        "region_name",
        "aws_access_key_id",
        "aws_secret_access_key",
        "client_id",
        "user_pool_id",
    ];

    fn from_resolved(resolved: &ResolvedResourceConfig) -> Self {
        Self {
            region_name: resolved.value("region_name"),
            aws_access_key_id: resolved.value("aws_access_key_id"),
            aws_secret_access_key: resolved.value("aws_secret_access_key"),
            client_id: resolved.value("client_id"),
            user_pool_id: resolved.value("user_pool_id"),
        }
    }
}

/// Load balancer endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    pub host: Option<Value>,
    pub port: Option<Value>,
}

impl LoadBalancerConfig {
    /// `host:port`
    ///
    /// Components are formatted as stored, strings without quotes. Missing
    /// components are rendered as `None` rather than rejected, so an
    /// unconfigured endpoint formats as `None:None`.
    pub fn name(&self) -> String {
        format!("{}:{}", render(self.host.as_ref()), render(self.port.as_ref()))
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

impl TypedConfig for LoadBalancerConfig {
    const FIELDS: &'static [&'static str] = &["host", "port"];

    fn from_resolved(resolved: &ResolvedResourceConfig) -> Self {
        Self {
            host: resolved.value("host"),
            port: resolved.port("port"),
        }
    }
}

/// Workflow orchestrator credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirflowConfig {
    pub host: Option<Value>,
    pub username: Option<Value>,
    pub password: Option<Value>,
}

impl TypedConfig for AirflowConfig {
    const FIELDS: &'static [&'static str] = &["host", "username", "password"];

    fn from_resolved(resolved: &ResolvedResourceConfig) -> Self {
        Self {
            host: resolved.value("host"),
            username: resolved.value("username"),
            password: resolved.value("password"),
        }
    }
}
