//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parse error.
    #[error("schema parse error: {0}")]
    Parse(#[from] shexgen_schema::ParseError),

    /// Schema validation error.
    #[error("schema error: {0}")]
    Schema(#[from] shexgen_schema::SchemaError),

    /// Expression kind that cannot be turned into a type.
    #[error("unsupported expression kind '{kind}' in shape '{shape}'")]
    UnsupportedExpressionKind {
        /// Enclosing shape.
        shape: String,
        /// Expression kind.
        kind: String,
    },

    /// Enum name cannot be derived.
    #[error("cannot synthesize enum name: {message}")]
    NameSynthesis {
        /// Error message.
        message: String,
    },

    /// Predicate outside every declared prefix.
    #[error("no prefix declared for predicate '{predicate}'")]
    UnresolvedPrefix {
        /// Predicate IRI.
        predicate: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates an unsupported expression kind error.
    pub fn unsupported(shape: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedExpressionKind {
            shape: shape.into(),
            kind: kind.into(),
        }
    }
}
