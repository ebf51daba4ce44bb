//! # Error Types — Construction Failure Taxonomy
//!
//! Defines the error types of the construction engine. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A `Mismatch` is recorded per candidate type and is not fatal on its
//!   own: the resolver moves on to the next candidate.
//! - An `Instantiation` error means every candidate for a parameter was
//!   exhausted. It keeps the ordered attempt failures, so nested failures
//!   read as a parameter trail from the root type down to the leaf.
//! - `Validation` errors are raised eagerly when a value's shape is wrong
//!   for the parameter it feeds, before any instance is built.

use thiserror::Error;

/// Top-level error type for the construction engine.
#[derive(Error, Debug)]
pub enum ConstructError {
    /// A raw value's shape does not match the candidate type under trial.
    #[error("parameter \"{parameter}\": expected {expected}, got {found}")]
    Mismatch {
        /// Name of the parameter being resolved.
        parameter: String,
        /// What the candidate type required.
        expected: String,
        /// Short description of the offending value.
        found: String,
    },

    /// A value was structurally wrong for the parameter it feeds.
    #[error("parameter \"{parameter}\": {message}")]
    Validation {
        /// Name of the offending parameter.
        parameter: String,
        /// What was wrong with the value.
        message: String,
    },

    /// Every candidate type for a parameter failed.
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    /// The metadata provider knows no type under this name.
    #[error("unknown type \"{0}\"")]
    UnknownType(String),
}

/// All candidate types for a parameter were exhausted.
///
/// Carries the parameter name and the ordered per-candidate failures.
/// When a nested construction fails with its own `InstantiationError`,
/// that error sits in `attempts`, and [`InstantiationError::path`] walks
/// the chain to produce the dotted trail of parameter names from the
/// outermost type down to the failing leaf.
#[derive(Debug)]
pub struct InstantiationError {
    parameter: String,
    attempts: Vec<ConstructError>,
}

impl std::error::Error for InstantiationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.attempts
            .first()
            .map(|attempt| attempt as &(dyn std::error::Error + 'static))
    }
}

impl std::fmt::Display for InstantiationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not resolve parameter \"{}\" ({} candidate(s) failed",
            self.parameter,
            self.attempts.len()
        )?;
        if self.first_nested().is_some() {
            write!(f, ", failing at \"{}\"", self.path())?;
        }
        f.write_str(")")
    }
}

impl InstantiationError {
    pub fn new(parameter: impl Into<String>, attempts: Vec<ConstructError>) -> Self {
        InstantiationError {
            parameter: parameter.into(),
            attempts,
        }
    }

    /// The parameter whose candidates were exhausted.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// The per-candidate failures, in candidate declaration order.
    pub fn attempts(&self) -> &[ConstructError] {
        &self.attempts
    }

    /// Dotted trail of parameter names from this error down to the
    /// deepest nested instantiation failure, e.g. `properties.age.type`.
    pub fn path(&self) -> String {
        let mut segments = vec![self.parameter.clone()];
        let mut current = self;

        while let Some(nested) = current.first_nested() {
            segments.push(nested.parameter.clone());
            current = nested;
        }

        segments.join(".")
    }

    fn first_nested(&self) -> Option<&InstantiationError> {
        self.attempts.iter().find_map(|attempt| match attempt {
            ConstructError::Instantiation(nested) => Some(nested),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_without_nesting() {
        let err = InstantiationError::new("items", vec![]);
        assert_eq!(err.path(), "items");
    }

    #[test]
    fn test_path_follows_nested_instantiations() {
        let leaf = InstantiationError::new(
            "type",
            vec![ConstructError::Validation {
                parameter: "type".into(),
                message: "bad".into(),
            }],
        );
        let mid = InstantiationError::new("age", vec![ConstructError::Instantiation(leaf)]);
        let root = InstantiationError::new("properties", vec![ConstructError::Instantiation(mid)]);
        assert_eq!(root.path(), "properties.age.type");
    }

    #[test]
    fn test_display_names_parameter() {
        let err = InstantiationError::new(
            "not",
            vec![ConstructError::Mismatch {
                parameter: "not".into(),
                expected: "a map".into(),
                found: "a number".into(),
            }],
        );
        let rendered = err.to_string();
        assert!(rendered.contains("\"not\""));
        assert!(rendered.contains("1 candidate"));
    }
}
