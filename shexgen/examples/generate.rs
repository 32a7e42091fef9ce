//! Example generating TypeScript declarations from a ShExJ schema.
//!
//! Run with: `cargo run --example generate -- [schema.json] [--module]`
//!
//! Without a path, a small built-in schema is used. `--module` selects the
//! `rdflib` shape-module output. Set `RUST_LOG=shexgen_codegen=debug` to see
//! the generation steps.

use anyhow::Context;
use shexgen::prelude::*;

const DEMO_SCHEMA: &str = r#"{
    "type": "Schema",
    "prefixes": {
        "foaf": "http://xmlns.com/foaf/0.1/",
        "ex": "http://example.org/",
        "rdf": "http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    },
    "shapes": [
        {
            "type": "ShapeDecl",
            "id": "http://example.org/Status",
            "shapeExpr": {
                "type": "NodeConstraint",
                "values": ["http://example.org/Active", "http://example.org/Retired"]
            }
        },
        {
            "type": "ShapeDecl",
            "id": "http://example.org/PersonShape",
            "shapeExpr": {
                "type": "Shape",
                "expression": {
                    "type": "EachOf",
                    "expressions": [
                        {
                            "type": "TripleConstraint",
                            "predicate": "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
                            "valueExpr": {
                                "type": "NodeConstraint",
                                "values": ["http://xmlns.com/foaf/0.1/Person"]
                            }
                        },
                        {
                            "type": "TripleConstraint",
                            "predicate": "http://xmlns.com/foaf/0.1/name",
                            "valueExpr": {
                                "type": "NodeConstraint",
                                "datatype": "http://www.w3.org/2001/XMLSchema#string"
                            },
                            "annotations": [
                                {
                                    "type": "Annotation",
                                    "predicate": "http://www.w3.org/2000/01/rdf-schema#comment",
                                    "object": { "value": "Full name" }
                                }
                            ]
                        },
                        {
                            "type": "TripleConstraint",
                            "predicate": "http://example.org/status",
                            "valueExpr": "http://example.org/Status",
                            "min": 0,
                            "max": 1
                        },
                        {
                            "type": "TripleConstraint",
                            "predicate": "http://xmlns.com/foaf/0.1/knows",
                            "valueExpr": "http://example.org/PersonShape",
                            "min": 0,
                            "max": -1
                        }
                    ]
                }
            }
        }
    ]
}"#;

fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut path = None;
    let mut style = OutputStyle::TypeDeclarations;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--module" => style = OutputStyle::ShapeModule,
            _ => path = Some(arg),
        }
    }

    let schema = match &path {
        Some(path) => parse_schema_file(std::path::Path::new(path))
            .with_context(|| format!("failed to load schema {path}"))?,
        None => parse_schema(DEMO_SCHEMA).context("failed to load built-in schema")?,
    };
    tracing::info!(
        "Loaded {} shape declarations from {}",
        schema.shapes.len(),
        path.as_deref().unwrap_or("built-in schema")
    );

    let module = Generator::new(&schema)
        .with_style(style)
        .generate_module()
        .context("failed to generate declarations")?;

    print!("{module}");
    Ok(())
}
