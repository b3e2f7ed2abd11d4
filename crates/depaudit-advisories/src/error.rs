use thiserror::Error;

/// The advisory database could not be obtained.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("advisory database not found at {path}")]
    Missing { path: String },

    #[error("advisory database from {origin} is corrupt: {message}")]
    Corrupt { origin: String, message: String },

    #[error("advisory database refresh failed and no cached copy is available: {reason}")]
    NoCache { reason: String },

    #[error("failed to read advisory database {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
