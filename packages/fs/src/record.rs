//! File metadata records produced by a directory walk.

use std::fs::Metadata;

use chrono::{DateTime, Utc};
use fsquery_core::Value;
use serde::{Deserialize, Serialize};

/// Metadata for one entry below a queried directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the queried directory, `/`-separated.
    pub name: String,
    pub size: u64,
    pub mod_time: DateTime<Utc>,
    pub is_directory: bool,
    /// `ls -l` style mode string, e.g. `-rw-r--r--`.
    pub permissions: String,
}

impl FileRecord {
    /// Build a record from an entry's metadata.
    pub fn from_metadata(name: String, metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            name,
            size: metadata.len(),
            mod_time: DateTime::<Utc>::from(metadata.modified()?),
            is_directory: metadata.is_dir(),
            permissions: mode_string(metadata),
        })
    }

    /// The record as a response [`Value`], with the same field names and
    /// timestamp format as its serde form.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        Value::from_serialize(self)
    }
}

/// A full listing of a directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResult {
    /// The requested logical directory, before rootfs resolution.
    pub directory: String,
    pub file_count: usize,
    pub files: Vec<FileRecord>,
}

impl ListingResult {
    pub fn new(directory: impl Into<String>, files: Vec<FileRecord>) -> Self {
        Self {
            directory: directory.into(),
            file_count: files.len(),
            files,
        }
    }

    /// Find the record whose relative name equals `name` exactly.
    pub fn find(&self, name: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.name == name)
    }
}

#[cfg(unix)]
fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    let file_type = metadata.file_type();
    let kind = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else if file_type.is_fifo() {
        'p'
    } else if file_type.is_socket() {
        's'
    } else if file_type.is_block_device() {
        'b'
    } else if file_type.is_char_device() {
        'c'
    } else {
        '-'
    };

    let mode = metadata.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    if metadata.permissions().readonly() {
        format!("{}r--r--r--", kind)
    } else {
        format!("{}rw-rw-rw-", kind)
    }
}
