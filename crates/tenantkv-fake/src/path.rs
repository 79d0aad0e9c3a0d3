//! Minimal JSON path support for the simulated store
//!
//! Accepts the root paths `$` and `.` plus dotted member paths such as
//! `$.resources.billing` or `.aws`. Array indexing, wildcards and filters
//! are rejected.

use serde_json::Value;

use tenantkv_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    pub(crate) fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        if trimmed.contains("..") {
            return Err(Error::Store(format!("Unsupported JSON path: {}", path)));
        }

        let body = trimmed
            .strip_prefix('$')
            .unwrap_or(trimmed)
            .trim_start_matches('.');

        if body.is_empty() {
            return Ok(Self {
                segments: Vec::new(),
            });
        }

        if body.contains(['[', ']', '*', '?', '@']) {
            return Err(Error::Store(format!("Unsupported JSON path: {}", path)));
        }

        Ok(Self {
            segments: body.split('.').map(str::to_string).collect(),
        })
    }

    pub(crate) fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |node, segment| node.get(segment.as_str()))
    }

    /// Write `value` at this path inside `document`
    ///
    /// The parent of the final segment must already exist and be an object.
    pub(crate) fn assign(&self, document: &mut Value, value: Value) -> Result<()> {
        let Some((last, parents)) = self.segments.split_last() else {
            *document = value;
            return Ok(());
        };

        let mut node = document;
        for segment in parents {
            node = node
                .get_mut(segment.as_str())
                .ok_or_else(|| Error::Store(format!("Path does not exist: {}", segment)))?;
        }

        match node.as_object_mut() {
            Some(object) => {
                object.insert(last.clone(), value);
                Ok(())
            }
            None => Err(Error::Store(format!(
                "Cannot set '{}' on a non-object value",
                last
            ))),
        }
    }
}
