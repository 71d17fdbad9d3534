//! Classification of query paths into resource shapes.
//!
//! Supported shapes, all below `/sonic/system`:
//!
//! ```text
//! filesystem[path=<P>]/disk-space                  both metrics
//! filesystem[path=<P>]/disk-space/total-mb
//! filesystem[path=<P>]/disk-space/available-mb
//! <listing>[directory=<D>]/files                   full listing
//! <listing>[directory=<D>]/files/count
//! <listing>[directory=<D>]/files/<filename>
//! ```
//!
//! where `<listing>` is `firmware` or `sonic-image`. Classification is a
//! single pure pass: every path yields exactly one [`ResourceQuery`] or one
//! error.

use std::fmt;
use std::str::FromStr;

use fsquery_core::Path;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Fixed names at positions 0 and 1.
pub const ROOT: [&str; 2] = ["sonic", "system"];

pub const FILESYSTEM: &str = "filesystem";
pub const DISK_SPACE: &str = "disk-space";
pub const TOTAL_MB: &str = "total-mb";
pub const AVAILABLE_MB: &str = "available-mb";
pub const FILES: &str = "files";
pub const COUNT: &str = "count";

pub const PATH_KEY: &str = "path";
pub const DIRECTORY_KEY: &str = "directory";
pub const FILENAME: &str = "filename";

const RESOURCE: usize = 2;
const SUB_RESOURCE: usize = 3;
const SELECTOR: usize = 4;

/// A file-listing resource that can be enabled independently.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ListingKind {
    /// Device firmware files, e.g. `/lib/firmware`.
    Firmware,
    /// Complete SONiC OS images.
    SonicImage,
}

impl ListingKind {
    pub const ALL: [ListingKind; 2] = [ListingKind::Firmware, ListingKind::SonicImage];

    /// The element name at position 2.
    pub fn resource_name(&self) -> &'static str {
        match self {
            ListingKind::Firmware => "firmware",
            ListingKind::SonicImage => "sonic-image",
        }
    }

    /// The data model advertised when this listing is enabled.
    pub fn model_name(&self) -> &'static str {
        match self {
            ListingKind::Firmware => "sonic-firmware",
            ListingKind::SonicImage => "sonic-image",
        }
    }

    pub fn from_resource_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.resource_name() == name)
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource_name())
    }
}

impl FromStr for ListingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_resource_name(s).ok_or_else(|| {
            format!(
                "unknown listing '{}', expected one of: {}",
                s,
                Self::ALL.map(|k| k.resource_name()).join(", ")
            )
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiskMetric {
    Total,
    Available,
    Both,
}

impl DiskMetric {
    pub fn includes_total(&self) -> bool {
        matches!(self, DiskMetric::Total | DiskMetric::Both)
    }

    pub fn includes_available(&self) -> bool {
        matches!(self, DiskMetric::Available | DiskMetric::Both)
    }
}

/// The sub-query within a file listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    List,
    Count,
    /// A specific entry, by its name relative to the directory.
    File(String),
}

/// A classified query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceQuery {
    DiskSpace {
        fs_path: String,
        metric: DiskMetric,
    },
    FileListing {
        kind: ListingKind,
        directory: String,
        selector: Selector,
    },
}

/// Classify `path` into exactly one resource shape.
pub fn classify(path: &Path) -> Result<ResourceQuery, QueryError> {
    if !path.has_name_prefix(&ROOT) || path.len() <= RESOURCE {
        return Err(QueryError::unsupported(path));
    }

    let resource = path[RESOURCE].name();
    if resource == FILESYSTEM {
        return classify_disk_space(path);
    }
    match ListingKind::from_resource_name(resource) {
        Some(kind) => classify_listing(path, kind),
        None => Err(QueryError::unsupported(path)),
    }
}

fn classify_disk_space(path: &Path) -> Result<ResourceQuery, QueryError> {
    let fs_path = required_key(path, PATH_KEY)?;

    if path.len() == SUB_RESOURCE {
        return Err(QueryError::invalid_shape(
            path,
            "disk space path has 3 elements, expected 4 or 5",
        ));
    }
    if !has_sub_resource(path, DISK_SPACE) {
        return Err(QueryError::unsupported(path));
    }

    let metric = match path.len() {
        4 => DiskMetric::Both,
        5 => match path[SELECTOR].name() {
            TOTAL_MB => DiskMetric::Total,
            AVAILABLE_MB => DiskMetric::Available,
            other => {
                return Err(QueryError::invalid_shape(
                    path,
                    format!("unknown disk space metric: {}", other),
                ))
            }
        },
        n => {
            return Err(QueryError::invalid_shape(
                path,
                format!("disk space path has {} elements, expected 4 or 5", n),
            ))
        }
    };

    Ok(ResourceQuery::DiskSpace { fs_path, metric })
}

fn classify_listing(path: &Path, kind: ListingKind) -> Result<ResourceQuery, QueryError> {
    let directory = required_key(path, DIRECTORY_KEY)?;

    if path.len() == SUB_RESOURCE {
        return Err(QueryError::invalid_shape(
            path,
            format!("{} files path has 3 elements, expected 4 or 5", kind),
        ));
    }
    if !has_sub_resource(path, FILES) {
        return Err(QueryError::unsupported(path));
    }

    let selector = match path.len() {
        4 => Selector::List,
        5 => match path[SELECTOR].name() {
            "" => return Err(QueryError::missing(path, FILENAME)),
            COUNT => Selector::Count,
            name => Selector::File(name.to_string()),
        },
        n => {
            return Err(QueryError::invalid_shape(
                path,
                format!("{} files path has {} elements, expected 4 or 5", kind, n),
            ))
        }
    };

    Ok(ResourceQuery::FileListing {
        kind,
        directory,
        selector,
    })
}

/// The non-empty value of `key` on the resource element.
fn required_key(path: &Path, key: &str) -> Result<String, QueryError> {
    match path[RESOURCE].key(key) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(QueryError::missing(path, key)),
    }
}

fn has_sub_resource(path: &Path, name: &str) -> bool {
    path.get(SUB_RESOURCE).is_some_and(|e| e.name() == name)
}
