//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use shexgen::prelude::*;
//! ```

// Schema types
pub use shexgen_schema::{
    Cardinality, NodeConstraint, NodeKind, ParseError, PrefixMap, Schema, SchemaError, Shape,
    ShapeDecl, ShapeExpr, TripleConstraint, TripleExpr, ValueSetValue, normalize_iri,
    parse_schema, parse_schema_file, validate_schema,
};

// Generation
pub use shexgen_codegen::typescript::{EnumCatalog, EnumMember, ExpressionWalker, ShapeAssembler};
pub use shexgen_codegen::{
    CodegenError, Emitter, Generator, GeneratorConfig, OutputStyle, ShapeArtifact, ShapeModule,
    TypeDeclarations, generate_from_file, generate_from_json,
};
