//! Error taxonomy for classification and dispatch.

use std::fmt;
use std::io;

use fsquery_fs::{CapacityError, InspectError};

/// Errors surfaced to the caller of [`crate::Dispatcher`].
///
/// Nothing here is retried. Per-entry walk failures never show up as a
/// `QueryError`; they are logged and skipped by the inspector.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// The path matched a resource but has the wrong structure or length.
    #[error("invalid path {path}: {reason}")]
    InvalidShape { path: String, reason: String },

    /// A required keyed parameter is absent or empty.
    #[error("missing parameter '{parameter}' in {path}")]
    MissingParameter { path: String, parameter: String },

    /// The resource belongs to a subsystem that is not enabled.
    #[error("{resource} is not enabled on this server")]
    PreconditionFailed { resource: String },

    /// No resource shape recognizes the path.
    #[error("unsupported path: {path}")]
    UnsupportedPath { path: String },

    #[error("directory does not exist: {directory}")]
    NotExist { directory: String },

    #[error("failed to access directory {directory}: {source}")]
    AccessError {
        directory: String,
        #[source]
        source: io::Error,
    },

    /// The requested file is absent from an otherwise successful listing.
    #[error("file not found: {name} in directory {directory}")]
    NotFound { directory: String, name: String },

    #[error("failed to retrieve disk space for path {path}: {source}")]
    Capacity {
        path: String,
        #[source]
        source: CapacityError,
    },

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Transport status class for an error, in gRPC terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusCode {
    InvalidArgument,
    FailedPrecondition,
    NotFound,
    Internal,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::InvalidArgument => "InvalidArgument",
            StatusCode::FailedPrecondition => "FailedPrecondition",
            StatusCode::NotFound => "NotFound",
            StatusCode::Internal => "Internal",
        };
        write!(f, "{}", name)
    }
}

impl QueryError {
    pub fn status(&self) -> StatusCode {
        match self {
            QueryError::InvalidShape { .. } | QueryError::MissingParameter { .. } => {
                StatusCode::InvalidArgument
            }
            QueryError::PreconditionFailed { .. } => StatusCode::FailedPrecondition,
            QueryError::UnsupportedPath { .. }
            | QueryError::NotExist { .. }
            | QueryError::NotFound { .. } => StatusCode::NotFound,
            QueryError::AccessError { .. }
            | QueryError::Capacity { .. }
            | QueryError::Encode(_) => StatusCode::Internal,
        }
    }

    pub(crate) fn missing(path: impl fmt::Display, parameter: &str) -> Self {
        QueryError::MissingParameter {
            path: path.to_string(),
            parameter: parameter.to_string(),
        }
    }

    pub(crate) fn invalid_shape(path: impl fmt::Display, reason: impl Into<String>) -> Self {
        QueryError::InvalidShape {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(path: impl fmt::Display) -> Self {
        QueryError::UnsupportedPath {
            path: path.to_string(),
        }
    }
}

impl From<InspectError> for QueryError {
    fn from(error: InspectError) -> Self {
        match error {
            InspectError::NotExist { directory } => QueryError::NotExist { directory },
            InspectError::Access { directory, source } => {
                QueryError::AccessError { directory, source }
            }
            InspectError::NotFound { directory, name } => QueryError::NotFound { directory, name },
        }
    }
}
