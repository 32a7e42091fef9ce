//! Synthetic schemas for benchmarks.

use serde_json::{Value, json};
use shexgen_schema::{ParseError, Schema, parse_schema};

const NS: &str = "http://bench.example.org/";
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// Builds a ShExJ document with `shapes` shapes of `properties` properties.
///
/// Properties cycle through string, integer, shape reference and enumerated
/// values, and every shape shares the `status` predicate, so inline enums
/// are merged across the whole schema.
#[must_use]
pub fn synthetic_shexj(shapes: usize, properties: usize) -> String {
    let decls: Vec<Value> = (0..shapes)
        .map(|shape| shape_decl(shape, shapes, properties))
        .collect();

    json!({
        "type": "Schema",
        "prefixes": { "bench": NS },
        "shapes": decls,
    })
    .to_string()
}

/// Parses [`synthetic_shexj`] into a schema.
///
/// # Errors
/// Returns `ParseError` if the synthetic document does not load.
pub fn synthetic_schema(shapes: usize, properties: usize) -> Result<Schema, ParseError> {
    parse_schema(&synthetic_shexj(shapes, properties))
}

fn shape_decl(shape: usize, shapes: usize, properties: usize) -> Value {
    let mut expressions: Vec<Value> = (0..properties)
        .map(|prop| property(shape, shapes, prop))
        .collect();
    let statuses = [
        format!("{NS}Status{}", shape % 7),
        format!("{NS}Status{}", (shape + 1) % 7),
    ];
    expressions.push(json!({
        "type": "TripleConstraint",
        "predicate": format!("{NS}status"),
        "valueExpr": { "type": "NodeConstraint", "values": statuses },
        "min": 0,
    }));

    json!({
        "type": "ShapeDecl",
        "id": format!("{NS}Shape{shape}"),
        "shapeExpr": {
            "type": "Shape",
            "expression": { "type": "EachOf", "expressions": expressions },
        },
    })
}

fn property(shape: usize, shapes: usize, prop: usize) -> Value {
    let predicate = format!("{NS}p{prop}");
    let target = format!("{NS}Shape{}", (shape + 1) % shapes.max(1));
    let values = [format!("{NS}v{prop}"), format!("{NS}w{prop}")];
    let value_expr = match prop % 4 {
        0 => json!({ "type": "NodeConstraint", "datatype": XSD_STRING }),
        1 => json!({ "type": "NodeConstraint", "datatype": XSD_INTEGER }),
        2 => json!(target),
        _ => json!({ "type": "NodeConstraint", "values": values }),
    };
    let max: i64 = if prop % 3 == 0 { -1 } else { 1 };

    json!({
        "type": "TripleConstraint",
        "predicate": predicate,
        "valueExpr": value_expr,
        "min": prop % 2,
        "max": max,
    })
}
