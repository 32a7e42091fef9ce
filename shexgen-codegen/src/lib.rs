//! # shexgen Codegen
//!
//! TypeScript declaration generation from ShEx schemas.
//!
//! This crate provides:
//! - The expression walker over triple expressions
//! - Value type and enum synthesis
//! - Shape assembly into exported type aliases
//! - The schema-level driver with pluggable emission strategies

pub mod error;
pub mod generator;
pub mod typescript;

pub use error::CodegenError;
pub use generator::{Generator, GeneratorConfig, OutputStyle};
pub use typescript::{Emitter, ShapeArtifact, ShapeModule, TypeDeclarations};

/// Generates TypeScript declarations from a ShExJ schema string.
///
/// # Arguments
/// * `json` - ShExJ schema content
///
/// # Returns
/// Generated TypeScript module as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_json(json: &str) -> Result<String, CodegenError> {
    generate_from_json_with(json, GeneratorConfig::default())
}

/// Generates TypeScript declarations from a ShExJ schema string with an
/// explicit configuration.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_json_with(json: &str, config: GeneratorConfig) -> Result<String, CodegenError> {
    let schema = shexgen_schema::parse_schema(json)?;
    let generator = Generator::new(&schema).with_config(config);
    generator.generate_module()
}

/// Generates TypeScript declarations from a ShExJ schema file.
///
/// # Arguments
/// * `path` - Path to the ShExJ schema file
///
/// # Returns
/// Generated TypeScript module as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails. A file
/// that cannot be read is reported as `ParseError::Io`.
pub fn generate_from_file(path: &std::path::Path) -> Result<String, CodegenError> {
    let schema = shexgen_schema::parse_schema_file(path)?;
    Generator::new(&schema).generate_module()
}
