//! Malformed-input errors raised while planning a decomposition.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::category::Category;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecomposeError {
    #[error("{category}[{index}]: missing or empty key field '{field}'")]
    MissingKey {
        category: Category,
        index: usize,
        field: &'static str,
    },

    #[error("{category}[{index}]: malformed key '{key}': {reason}")]
    MalformedKey {
        category: Category,
        index: usize,
        key: String,
        reason: String,
    },

    #[error("{category}[{index}]: '{segment}' is not usable as a path segment")]
    UnsafeSegment {
        category: Category,
        index: usize,
        segment: String,
    },

    #[error("invalid profile name '{0}'")]
    InvalidProfileName(String),

    #[error("marker template: {0}")]
    Template(String),

    #[error("path {} is written by {first} and {second}", path.display())]
    Collision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("invalid profile document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, DecomposeError>;
