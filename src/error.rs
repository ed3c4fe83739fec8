use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a catalog dataset.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML dataset: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A filter constraint that is present but cannot be applied.
///
/// The constraint is dropped and the remaining ones still apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFilterShape {
    #[error("request body is not valid JSON: {0}")]
    Body(String),

    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("`{field}` must be a [min, max] array, got {found}")]
    NotAPair { field: &'static str, found: &'static str },

    #[error("`{field}` needs two bounds, got {len}")]
    TooShort { field: &'static str, len: usize },

    #[error("`{field}` bound {position} is not numeric")]
    NotNumeric { field: &'static str, position: usize },

    #[error("`{field}` must be an object with a string `description`")]
    MissingDescription { field: &'static str },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
