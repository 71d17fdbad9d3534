//! Error types for directory inspection and capacity queries.

use std::io;
use std::path::PathBuf;

/// Errors reaching or reading a queried directory.
///
/// Messages name the logical (unresolved) directory so the configured root
/// never leaks to callers.
#[derive(thiserror::Error, Debug)]
pub enum InspectError {
    #[error("directory does not exist: {directory}")]
    NotExist { directory: String },

    #[error("failed to access directory {directory}: {source}")]
    Access {
        directory: String,
        #[source]
        source: io::Error,
    },

    #[error("file not found: {name}")]
    NotFound { directory: String, name: String },
}

/// Errors from the storage-capacity provider.
#[derive(thiserror::Error, Debug)]
pub enum CapacityError {
    #[error("failed to query capacity of {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage capacity is not available on this platform")]
    Unsupported,
}
