use std::path::PathBuf;

use thiserror::Error;

use crate::object::{Id, Kind, ParseIdError};

/// Describes the potential error conditions that might arise from gitkit operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("config store has already been closed")]
    AlreadyClosed,

    #[error("config parse error on line {line}")]
    ConfigParseError { line: usize },

    #[error("invalid config name `{0}`")]
    InvalidConfigName(String),

    #[error("config key not found: {0}")]
    KeyNotFound(String),

    #[error("config value for `{name}` has the wrong type: `{value}`")]
    InvalidValueType { name: String, value: String },

    #[error(transparent)]
    MalformedIdentifier(#[from] ParseIdError),

    #[error("object not found: {0}")]
    ObjectNotFound(Id),

    #[error("object {id} is a {actual}, expected a {expected}")]
    ObjectTypeMismatch { id: Id, expected: Kind, actual: Kind },

    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: Id, reason: String },

    #[error("reference `{0}` does not point to any commit yet")]
    NoCommitsYet(String),

    #[error("corrupt reference `{0}`")]
    CorruptRef(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn corrupt<S: Into<String>>(id: Id, reason: S) -> Error {
        Error::CorruptObject {
            id,
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for gitkit operations.
pub type Result<T> = std::result::Result<T, Error>;
