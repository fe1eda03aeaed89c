use thiserror::Error;

/// Configuration errors from symbol index construction
///
/// All of these are fatal for the run and reported before any analysis; a
/// file-backed index that fails to construct never falls back silently.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Symbol database not found: searched {searched} and its ancestors for {file_name}")]
    DatabaseNotFound { searched: String, file_name: String },

    #[error("Symbol database file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read symbol database {path}: {error}")]
    ReadError { path: String, error: String },

    #[error("Failed to parse symbol database {path}: {error}")]
    ParseError { path: String, error: String },

    #[error("Symbol database {path} contains a record with an empty name or header")]
    InvalidRecord { path: String },

    #[error("Malformed symbol mapping {pair:?}: expected name=header[,header...]")]
    MalformedMapping { pair: String },
}
