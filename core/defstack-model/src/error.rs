//! Error types shared by every stage of def loading.

use crate::shape::ScalarKind;
use crate::token::TokenKind;
use thiserror::Error;

/// Result type for def loading operations.
pub type DefResult<T> = Result<T, DefError>;

/// Errors that can occur while loading or filling a def.
///
/// Leaf variants describe what broke; `InField`, `InElement` and
/// `InResource` wrap them on the way up so the final error reads as a
/// route from the top-level resource down to the failure.
#[derive(Debug, Error)]
pub enum DefError {
    /// Requested path is not in the resource index.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Discriminator names a type that is not in the catalog.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Inline polymorphic object has no discriminator field.
    #[error("missing discriminator field '{key}'")]
    MissingDiscriminator { key: String },

    /// Token kind or instance type cannot satisfy the requested shape.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Primitive token cannot be coerced to the requested scalar.
    #[error("cannot convert {found} to {expected}")]
    ScalarConversion { expected: ScalarKind, found: String },

    /// Array requested but the token is not an array of the right rank
    /// or its rows are not uniform.
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// A resource was requested again while it was still being loaded.
    #[error("cyclic reference: {}", .0.join(" -> "))]
    CyclicReference(Vec<String>),

    /// Resource document could not be read.
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Resource document is not valid JSON.
    #[error("parse error in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("field '{field}': {source}")]
    InField {
        field: String,
        #[source]
        source: Box<DefError>,
    },

    #[error("element {index}: {source}")]
    InElement {
        index: String,
        #[source]
        source: Box<DefError>,
    },

    #[error("resource '{path}': {source}")]
    InResource {
        path: String,
        #[source]
        source: Box<DefError>,
    },
}

impl DefError {
    /// Builds a `TypeMismatch` for a token that could not be used as `expected`.
    pub fn type_mismatch(expected: impl Into<String>, token: &serde_json::Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: TokenKind::of(token).to_string(),
        }
    }

    /// Builds a `ShapeMismatch` for a token that could not be used as `expected`.
    pub fn shape_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Builds a `ScalarConversion`, describing the offending token.
    pub fn scalar(expected: ScalarKind, token: &serde_json::Value) -> Self {
        Self::ScalarConversion {
            expected,
            found: TokenKind::describe(token),
        }
    }

    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn in_element(self, index: impl Into<String>) -> Self {
        Self::InElement {
            index: index.into(),
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn in_resource(self, path: impl Into<String>) -> Self {
        Self::InResource {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping context wrappers.
    pub fn root_cause(&self) -> &DefError {
        let mut current = self;
        loop {
            match current {
                Self::InField { source, .. }
                | Self::InElement { source, .. }
                | Self::InResource { source, .. } => current = source,
                other => return other,
            }
        }
    }
}
