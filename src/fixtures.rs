use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Literal fixture values for one suite, read from the extensionless JSON
/// document `{data_dir}/{suite_name}`.
#[derive(Debug)]
pub struct TestData {
    values: Map<String, Value>,
    path: PathBuf,
}

impl TestData {
    pub fn load(data_dir: impl AsRef<Path>, suite_name: &str) -> Result<Self> {
        let path = data_dir.as_ref().join(suite_name);

        let raw = fs::read_to_string(&path).map_err(|e| {
            tracing::error!("failed to read fixture document {}: {e}", path.display());
            Error::NotFound(format!("fixture document {}", path.display()))
        })?;

        let values: Map<String, Value> = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!("invalid fixture document {}: {e}", path.display());
            Error::NotFound(format!(
                "fixture document {} is not valid JSON: {e}",
                path.display()
            ))
        })?;

        Ok(Self { values, path })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key).and_then(Value::as_str).ok_or_else(|| {
            Error::NotFound(format!(
                "fixture field `{key}` in {}",
                self.path.display()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
