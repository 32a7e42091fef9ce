//! # shexgen Schema
//!
//! ShEx schema model and loading utilities.
//!
//! This crate provides:
//! - Type definitions for shape declarations and expressions
//! - A ShExJ (JSON) schema loader
//! - Schema validation
//! - Identifier normalization for IRIs
//! - The duplicate-property pre-pass applied before code generation

pub mod error;
pub mod naming;
pub mod normalize;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use naming::normalize_iri;
pub use normalize::merge_duplicates;
pub use parser::{parse_schema, parse_schema_file};
pub use types::{
    Annotation, Cardinality, NodeConstraint, NodeKind, ObjectLiteral, PrefixMap, Schema, Shape,
    ShapeDecl, ShapeExpr, TripleConstraint, TripleExpr, ValueSetValue,
};
pub use validation::validate_schema;
