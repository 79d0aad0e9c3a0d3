//! Document input accepted by JSON write operations

use serde_json::{Map, Value};

use crate::Result;

/// A document given either as an already-structured value or as JSON text
///
/// Text is decoded exactly once, by [`JsonInput::into_value`], before it
/// reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonInput {
    /// JSON-encoded text
    Text(String),
    /// Already-structured document
    Structured(Value),
}

impl JsonInput {
    /// Decode into the value that will be stored
    ///
    /// # Errors
    /// - `Error::Serialization` if text input is not valid JSON
    pub fn into_value(self) -> Result<Value> {
        match self {
            JsonInput::Text(text) => Ok(serde_json::from_str(&text)?),
            JsonInput::Structured(value) => Ok(value),
        }
    }
}

impl From<Value> for JsonInput {
    fn from(value: Value) -> Self {
        JsonInput::Structured(value)
    }
}

impl From<Map<String, Value>> for JsonInput {
    fn from(map: Map<String, Value>) -> Self {
        JsonInput::Structured(Value::Object(map))
    }
}

impl From<String> for JsonInput {
    fn from(text: String) -> Self {
        JsonInput::Text(text)
    }
}

impl From<&str> for JsonInput {
    fn from(text: &str) -> Self {
        JsonInput::Text(text.to_string())
    }
}
