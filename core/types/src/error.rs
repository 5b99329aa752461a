use std::path::PathBuf;
use thiserror::Error;

/// Failure while decoding a value from its dictionary representation.
///
/// Decode failures are local: callers loading a rule set skip the offending
/// entry and keep the rest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing required key '{key}'")]
    MissingKey { key: String },

    #[error("key '{key}' has the wrong type, expected {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("unrecognized {key} '{value}'")]
    UnknownDiscriminator { key: String, value: String },

    #[error("invalid payload: {message}")]
    Payload { message: String },
}

impl DecodeError {
    pub fn missing<S: Into<String>>(key: S) -> Self {
        Self::MissingKey { key: key.into() }
    }

    pub fn wrong_type<S: Into<String>>(key: S, expected: &'static str) -> Self {
        Self::WrongType {
            key: key.into(),
            expected,
        }
    }

    pub fn unknown<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self::UnknownDiscriminator {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A rule set that cannot be indexed. Building fails as a whole so that no
/// query is ever served by a partially indexed rule set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexBuildError {
    #[error("rule #{index} ({label}) has no conditions")]
    EmptyRule { index: usize, label: String },
}

#[derive(Error, Debug)]
pub enum TopDrawerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Index build error: {0}")]
    IndexBuild(#[from] IndexBuildError),

    #[error("Scan error at path {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },
}
