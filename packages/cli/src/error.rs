use fsquery_core::PathError;
use fsquery_query::{ConfigError, QueryError};

/// Everything that can stop the `fsquery` binary.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bad path '{input}': {source}")]
    Path {
        input: String,
        #[source]
        source: PathError,
    },

    #[error("{source} ({})", source.status())]
    Query {
        #[from]
        source: QueryError,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
