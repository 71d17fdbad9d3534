//! Response shapes handed to the transport layer.
//!
//! The builders produce [`Value`]s; the typed structs decode those values
//! back on the client side.

use std::collections::BTreeMap;

use fsquery_core::Value;
use fsquery_fs::{Capacity, FileRecord, ListingResult};
use serde::{Deserialize, Serialize};

use crate::classify::{DiskMetric, AVAILABLE_MB, TOTAL_MB};

/// `{path, total-mb?, available-mb?}`, fields present per requested metric.
pub fn disk_space(fs_path: &str, metric: DiskMetric, capacity: Capacity) -> Value {
    let mut m = BTreeMap::new();
    m.insert("path".to_string(), Value::from(fs_path));
    if metric.includes_total() {
        m.insert(TOTAL_MB.to_string(), Value::from(capacity.total_mb));
    }
    if metric.includes_available() {
        m.insert(AVAILABLE_MB.to_string(), Value::from(capacity.available_mb));
    }
    Value::Map(m)
}

/// A bare integer.
pub fn count(n: usize) -> Value {
    Value::from(n)
}

/// `{directory, file}`.
pub fn single_file(directory: &str, file: &FileRecord) -> Result<Value, serde_json::Error> {
    let mut m = BTreeMap::new();
    m.insert("directory".to_string(), Value::from(directory));
    m.insert("file".to_string(), file.to_value()?);
    Ok(Value::Map(m))
}

/// `{directory, file_count, files}`.
pub fn listing(result: &ListingResult) -> Result<Value, serde_json::Error> {
    let files = result
        .files
        .iter()
        .map(FileRecord::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    let mut m = BTreeMap::new();
    m.insert("directory".to_string(), Value::from(result.directory.as_str()));
    m.insert("file_count".to_string(), Value::from(result.file_count));
    m.insert("files".to_string(), Value::Array(files));
    Ok(Value::Map(m))
}

/// Decoded form of [`single_file`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResponse {
    pub directory: String,
    pub file: FileRecord,
}

/// Decoded form of [`disk_space`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSpaceResponse {
    pub path: String,
    #[serde(rename = "total-mb", default, skip_serializing_if = "Option::is_none")]
    pub total_mb: Option<u64>,
    #[serde(rename = "available-mb", default, skip_serializing_if = "Option::is_none")]
    pub available_mb: Option<u64>,
}
