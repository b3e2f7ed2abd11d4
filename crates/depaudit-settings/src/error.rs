use thiserror::Error;

/// Configuration failures. All are fatal and, where possible, name the offending key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to parse config: {message}")]
    Parse { message: String },

    #[error("unknown config key `{path}`")]
    UnknownKey { path: String },

    #[error("invalid value for `{path}`: {message}")]
    InvalidValue { path: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Dotted key path of the offending entry, when known.
    pub fn key_path(&self) -> Option<&str> {
        match self {
            ConfigError::Parse { .. } => None,
            ConfigError::UnknownKey { path } | ConfigError::InvalidValue { path, .. } => {
                Some(path)
            }
        }
    }
}
