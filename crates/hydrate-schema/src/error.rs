//! Error type for the schema document model.

use hydrate_core::ConstructError;
use thiserror::Error;

/// Errors surfaced by schema construction and decoding.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The construction pipeline failed: a keyword value matched no
    /// candidate type, or a vocabulary value had the wrong shape.
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// The caller passed a fundamentally wrong top-level shape.
    #[error("usage error: {0}")]
    Usage(String),

    /// Decoding schema text into a JSON value failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
