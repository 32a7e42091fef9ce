//! ShExJ schema loader.
//!
//! This module converts the JSON serialization of ShEx (ShExJ) into the
//! typed schema model. Both the ShExJ 2.1 form (`ShapeDecl` wrappers) and
//! the older form (shape expressions carrying their own `id`) are accepted.
//! The prefix table is read from a top-level `prefixes` (or `_prefixes`)
//! object.

use crate::error::ParseError;
use crate::types::{
    Annotation, Cardinality, NodeConstraint, NodeKind, PrefixMap, Schema, Shape, ShapeDecl,
    ShapeExpr, TripleConstraint, TripleExpr, ValueSetValue,
};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// XSD facets recognised on node constraints.
const FACETS: &[&str] = &[
    "pattern",
    "flags",
    "length",
    "minlength",
    "maxlength",
    "mininclusive",
    "minexclusive",
    "maxinclusive",
    "maxexclusive",
    "totaldigits",
    "fractiondigits",
];

/// Parses a ShExJ schema from a string.
///
/// # Arguments
/// * `json` - ShExJ document
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or a node is missing a
/// field required by its kind.
pub fn parse_schema(json: &str) -> Result<Schema, ParseError> {
    let document: Value = serde_json::from_str(json)?;
    parse_schema_value(&document)
}

/// Reads and parses a ShExJ schema file.
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read, or any error of
/// [`parse_schema`].
pub fn parse_schema_file(path: &std::path::Path) -> Result<Schema, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_schema(&json)
}

/// Parses a ShExJ schema from an already decoded JSON value.
///
/// # Errors
/// Returns `ParseError` if the document is not a valid ShExJ schema.
pub fn parse_schema_value(document: &Value) -> Result<Schema, ParseError> {
    let obj = as_object(document, "Schema")?;
    expect_type(obj, "Schema")?;

    let prefixes = match obj.get("prefixes").or_else(|| obj.get("_prefixes")) {
        Some(value) => serde_json::from_value::<PrefixMap>(value.clone())?,
        None => PrefixMap::new(),
    };

    let mut schema = Schema::new(prefixes);
    schema.base = optional_str(obj, "Schema", "base")?
        .or(optional_str(obj, "Schema", "_base")?)
        .map(str::to_string);

    if let Some(shapes) = obj.get("shapes") {
        let shapes = shapes
            .as_array()
            .ok_or_else(|| ParseError::invalid_field("Schema", "shapes", shapes.to_string()))?;
        for shape in shapes {
            let decl = parse_shape_decl(shape)?;
            if schema.has_shape(&decl.id) {
                return Err(ParseError::duplicate("shape", decl.id));
            }
            schema.add_shape(decl);
        }
    }

    Ok(schema)
}

/// Parses a top-level shape declaration.
fn parse_shape_decl(value: &Value) -> Result<ShapeDecl, ParseError> {
    let obj = as_object(value, "ShapeDecl")?;

    if type_name(obj) == Some("ShapeDecl") {
        let id = required_str(obj, "ShapeDecl", "id")?;
        let shape_expr = obj
            .get("shapeExpr")
            .ok_or_else(|| ParseError::missing_field("ShapeDecl", "shapeExpr"))?;
        return Ok(ShapeDecl {
            id: id.to_string(),
            is_abstract: bool_field(obj, "ShapeDecl", "abstract")?,
            shape_expr: parse_shape_expr(shape_expr)?,
        });
    }

    let node = type_name(obj).unwrap_or("ShapeDecl");
    let id = required_str(obj, node, "id")?;
    Ok(ShapeDecl::new(id, parse_shape_expr(value)?))
}

/// Parses a shape expression.
fn parse_shape_expr(value: &Value) -> Result<ShapeExpr, ParseError> {
    if let Some(reference) = value.as_str() {
        return Ok(ShapeExpr::Ref(reference.to_string()));
    }

    let obj = as_object(value, "shapeExpr")?;
    let kind = type_name(obj).ok_or_else(|| ParseError::missing_field("shapeExpr", "type"))?;

    match kind {
        "Shape" => parse_shape(obj).map(ShapeExpr::Shape),
        "NodeConstraint" => parse_node_constraint(obj).map(ShapeExpr::NodeConstraint),
        "ShapeOr" => parse_shape_exprs(obj, kind).map(ShapeExpr::ShapeOr),
        "ShapeAnd" => parse_shape_exprs(obj, kind).map(ShapeExpr::ShapeAnd),
        "ShapeNot" => {
            let inner = obj
                .get("shapeExpr")
                .ok_or_else(|| ParseError::missing_field(kind, "shapeExpr"))?;
            Ok(ShapeExpr::ShapeNot(Box::new(parse_shape_expr(inner)?)))
        }
        "ShapeExternal" => Ok(ShapeExpr::ShapeExternal),
        other => Err(ParseError::unsupported(other)),
    }
}

fn parse_shape_exprs(obj: &Object, kind: &str) -> Result<Vec<ShapeExpr>, ParseError> {
    required_array(obj, kind, "shapeExprs")?
        .iter()
        .map(parse_shape_expr)
        .collect()
}

/// Parses a `Shape` object.
fn parse_shape(obj: &Object) -> Result<Shape, ParseError> {
    let expression = obj.get("expression").map(parse_triple_expr).transpose()?;

    Ok(Shape {
        id: optional_str(obj, "Shape", "id")?.map(str::to_string),
        closed: bool_field(obj, "Shape", "closed")?,
        extra: string_list(obj, "Shape", "extra")?,
        extends: string_list(obj, "Shape", "extends")?,
        expression,
        annotations: annotations(obj, "Shape")?,
    })
}

/// Parses a triple expression.
fn parse_triple_expr(value: &Value) -> Result<TripleExpr, ParseError> {
    if let Some(inclusion) = value.as_str() {
        return Ok(TripleExpr::Inclusion(inclusion.to_string()));
    }

    let obj = as_object(value, "tripleExpr")?;
    let kind = type_name(obj).ok_or_else(|| ParseError::missing_field("tripleExpr", "type"))?;

    match kind {
        "TripleConstraint" => parse_triple_constraint(obj).map(TripleExpr::TripleConstraint),
        "OneOf" => parse_triple_exprs(obj, kind).map(TripleExpr::OneOf),
        "EachOf" => parse_triple_exprs(obj, kind).map(TripleExpr::EachOf),
        other => Err(ParseError::unsupported(other)),
    }
}

fn parse_triple_exprs(obj: &Object, kind: &str) -> Result<Vec<TripleExpr>, ParseError> {
    required_array(obj, kind, "expressions")?
        .iter()
        .map(parse_triple_expr)
        .collect()
}

/// Parses a `TripleConstraint` object.
fn parse_triple_constraint(obj: &Object) -> Result<TripleConstraint, ParseError> {
    const NODE: &str = "TripleConstraint";

    let predicate = required_str(obj, NODE, "predicate")?;
    let value_expr = obj
        .get("valueExpr")
        .map(parse_shape_expr)
        .transpose()?
        .map(Box::new);

    Ok(TripleConstraint {
        predicate: predicate.to_string(),
        inverse: bool_field(obj, NODE, "inverse")?,
        value_expr,
        cardinality: parse_cardinality(obj)?,
        annotations: annotations(obj, NODE)?,
    })
}

/// Parses `min`/`max`; `max: -1` means unbounded.
fn parse_cardinality(obj: &Object) -> Result<Cardinality, ParseError> {
    let mut cardinality = Cardinality::default();

    if let Some(min) = obj.get("min") {
        cardinality.min = min
            .as_u64()
            .and_then(|m| u32::try_from(m).ok())
            .ok_or_else(|| ParseError::invalid_field("TripleConstraint", "min", min.to_string()))?;
    }

    if let Some(max) = obj.get("max") {
        cardinality.max = match max.as_i64() {
            Some(-1) => None,
            Some(m) => Some(u32::try_from(m).map_err(|_| {
                ParseError::invalid_field("TripleConstraint", "max", max.to_string())
            })?),
            None => {
                return Err(ParseError::invalid_field(
                    "TripleConstraint",
                    "max",
                    max.to_string(),
                ));
            }
        };
    }

    Ok(cardinality)
}

/// Parses a `NodeConstraint` object.
fn parse_node_constraint(obj: &Object) -> Result<NodeConstraint, ParseError> {
    const NODE: &str = "NodeConstraint";

    let node_kind = optional_str(obj, NODE, "nodeKind")?
        .map(|kind| {
            NodeKind::parse(kind).ok_or_else(|| ParseError::invalid_field(NODE, "nodeKind", kind))
        })
        .transpose()?;

    let values = obj
        .get("values")
        .map(|values| {
            values
                .as_array()
                .ok_or_else(|| ParseError::invalid_field(NODE, "values", values.to_string()))?
                .iter()
                .map(parse_value_set_value)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let facets = FACETS
        .iter()
        .filter_map(|facet| {
            obj.get(*facet).map(|v| {
                let text = v.as_str().map_or_else(|| v.to_string(), str::to_string);
                ((*facet).to_string(), text)
            })
        })
        .collect();

    Ok(NodeConstraint {
        node_kind,
        datatype: optional_str(obj, NODE, "datatype")?.map(str::to_string),
        facets,
        values,
    })
}

/// Parses one entry of a value set. Stems and ranges are not supported.
fn parse_value_set_value(value: &Value) -> Result<ValueSetValue, ParseError> {
    match value {
        Value::String(iri) => Ok(ValueSetValue::Iri(iri.clone())),
        Value::Object(obj) if obj.contains_key("value") => {
            Ok(serde_json::from_value(value.clone())?)
        }
        Value::Object(obj) => match type_name(obj) {
            Some(kind) => Err(ParseError::unsupported(kind)),
            None => Err(ParseError::missing_field("ObjectLiteral", "value")),
        },
        other => Err(ParseError::invalid_field(
            "NodeConstraint",
            "values",
            other.to_string(),
        )),
    }
}

fn annotations(obj: &Object, node: &str) -> Result<Vec<Annotation>, ParseError> {
    match obj.get("annotations") {
        Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value.clone())?),
        Some(other) => Err(ParseError::invalid_field(node, "annotations", other.to_string())),
        None => Ok(Vec::new()),
    }
}

fn as_object<'a>(value: &'a Value, node: &str) -> Result<&'a Object, ParseError> {
    value.as_object().ok_or_else(|| ParseError::InvalidStructure {
        message: format!("expected {node} object, found {value}"),
    })
}

fn type_name(obj: &Object) -> Option<&str> {
    obj.get("type").and_then(Value::as_str)
}

fn expect_type(obj: &Object, expected: &str) -> Result<(), ParseError> {
    match type_name(obj) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(ParseError::invalid_field(expected, "type", kind)),
        None => Err(ParseError::missing_field(expected, "type")),
    }
}

fn optional_str<'a>(obj: &'a Object, node: &str, field: &str) -> Result<Option<&'a str>, ParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ParseError::invalid_field(node, field, other.to_string())),
    }
}

fn required_str<'a>(obj: &'a Object, node: &str, field: &str) -> Result<&'a str, ParseError> {
    optional_str(obj, node, field)?.ok_or_else(|| ParseError::missing_field(node, field))
}

fn required_array<'a>(obj: &'a Object, node: &str, field: &str) -> Result<&'a [Value], ParseError> {
    match obj.get(field) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(ParseError::invalid_field(node, field, other.to_string())),
        None => Err(ParseError::missing_field(node, field)),
    }
}

fn bool_field(obj: &Object, node: &str, field: &str) -> Result<bool, ParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(ParseError::invalid_field(node, field, other.to_string())),
    }
}

fn string_list(obj: &Object, node: &str, field: &str) -> Result<Vec<String>, ParseError> {
    match obj.get(field) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ParseError::invalid_field(node, field, item.to_string()))
            })
            .collect(),
        Some(other) => Err(ParseError::invalid_field(node, field, other.to_string())),
    }
}
