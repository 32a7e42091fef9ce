//! # shexgen
//!
//! TypeScript declarations from ShEx shape schemas.
//!
//! A ShEx schema constrains the predicates of RDF graph nodes. shexgen turns
//! each shape into a structural TypeScript type, each enumerated value set
//! into a string enum and, on request, each shape's predicates into a lookup
//! table of qualified names plus a `Shape` wrapper export.
//!
//! ## Features
//!
//! - **ShExJ loading** - Parse the JSON serialization of ShEx into a typed model
//! - **Deterministic output** - Same schema, same declarations, same order
//! - **Enum synthesis** - Inline value sets merged across shapes, collision-free member names
//! - **Pluggable emission** - Plain type declarations or `rdflib`-backed shape modules
//!
//! ## Quick Start
//!
//! ```ignore
//! use shexgen::prelude::*;
//!
//! let schema = parse_schema_file(std::path::Path::new("schema.json"))?;
//! let module = Generator::new(&schema)
//!     .with_style(OutputStyle::ShapeModule)
//!     .generate_module()?;
//! println!("{module}");
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Schema model, ShExJ loader, validation and identifier normalization
//! - [`codegen`] - Expression walker, enum synthesis and the generation driver

pub mod prelude;

/// Schema model, loading and validation.
pub mod schema {
    pub use shexgen_schema::*;
}

/// TypeScript generation from schemas.
pub mod codegen {
    pub use shexgen_codegen::*;
}

// Re-export commonly used items at the crate root
pub use shexgen_codegen::{
    CodegenError, Generator, GeneratorConfig, OutputStyle, generate_from_file, generate_from_json,
};
pub use shexgen_schema::{ParseError, Schema, SchemaError, parse_schema, parse_schema_file};
