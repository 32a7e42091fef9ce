//! Error types for schema loading and validation.

use thiserror::Error;

/// Error type for ShExJ loading operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON syntax error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node is missing a field required by its kind.
    #[error("missing expected field '{field}' on {node}")]
    MissingExpectedField {
        /// Node kind.
        node: String,
        /// Field name.
        field: String,
    },

    /// Field present but with an unusable value.
    #[error("invalid value '{value}' for field '{field}' on {node}")]
    InvalidField {
        /// Node kind.
        node: String,
        /// Field name.
        field: String,
        /// Offending value.
        value: String,
    },

    /// Expression kind the generator does not know.
    #[error("unsupported expression kind '{kind}'")]
    UnsupportedExpressionKind {
        /// Kind name found in the document.
        kind: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition (shape, prefix).
        kind: String,
        /// Name of the duplicate.
        name: String,
    },

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for schema validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A shape references an undeclared shape.
    #[error("shape '{shape}' references undeclared shape '{reference}'")]
    UnresolvedReference {
        /// Referencing shape.
        shape: String,
        /// Referenced id.
        reference: String,
    },

    /// Cardinality with `min > max`.
    #[error("invalid cardinality {{{min},{max}}} on predicate '{predicate}' in shape '{shape}'")]
    InvalidCardinality {
        /// Shape id.
        shape: String,
        /// Predicate IRI.
        predicate: String,
        /// Minimum.
        min: u32,
        /// Maximum.
        max: u32,
    },
}

impl ParseError {
    /// Creates a missing field error.
    pub fn missing_field(node: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingExpectedField {
            node: node.into(),
            field: field.into(),
        }
    }

    /// Creates an invalid field error.
    pub fn invalid_field(
        node: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            node: node.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an unsupported expression kind error.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedExpressionKind { kind: kind.into() }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }
}
