//! Schema validation utilities.
//!
//! This module checks a loaded schema for dangling shape references and
//! inconsistent cardinalities before code generation.

use crate::error::SchemaError;
use crate::types::{Schema, ShapeExpr, TripleExpr};

/// Validates a parsed schema for correctness.
///
/// # Arguments
/// * `schema` - The schema to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    for decl in &schema.shapes {
        validate_shape_expr(schema, &decl.id, &decl.shape_expr)?;
    }
    Ok(())
}

/// Validates one shape expression, recursing into nested expressions.
fn validate_shape_expr(schema: &Schema, owner: &str, expr: &ShapeExpr) -> Result<(), SchemaError> {
    match expr {
        ShapeExpr::Ref(reference) => validate_reference(schema, owner, reference),
        ShapeExpr::ShapeOr(members) | ShapeExpr::ShapeAnd(members) => members
            .iter()
            .try_for_each(|member| validate_shape_expr(schema, owner, member)),
        ShapeExpr::ShapeNot(inner) => validate_shape_expr(schema, owner, inner),
        ShapeExpr::Shape(shape) => {
            for base in &shape.extends {
                validate_reference(schema, owner, base)?;
            }
            match &shape.expression {
                Some(expression) => validate_triple_expr(schema, owner, expression),
                None => Ok(()),
            }
        }
        ShapeExpr::NodeConstraint(_) | ShapeExpr::ShapeExternal => Ok(()),
    }
}

/// Validates a triple expression.
fn validate_triple_expr(
    schema: &Schema,
    owner: &str,
    expr: &TripleExpr,
) -> Result<(), SchemaError> {
    match expr {
        TripleExpr::TripleConstraint(tc) => {
            if let Some(max) = tc.cardinality.max
                && tc.cardinality.min > max
            {
                return Err(SchemaError::InvalidCardinality {
                    shape: owner.to_string(),
                    predicate: tc.predicate.clone(),
                    min: tc.cardinality.min,
                    max,
                });
            }
            match tc.value_expr.as_deref() {
                Some(value_expr) => validate_shape_expr(schema, owner, value_expr),
                None => Ok(()),
            }
        }
        TripleExpr::OneOf(children) | TripleExpr::EachOf(children) => children
            .iter()
            .try_for_each(|child| validate_triple_expr(schema, owner, child)),
        TripleExpr::Inclusion(reference) => validate_reference(schema, owner, reference),
    }
}

fn validate_reference(schema: &Schema, owner: &str, reference: &str) -> Result<(), SchemaError> {
    if schema.has_shape(reference) {
        Ok(())
    } else {
        Err(SchemaError::UnresolvedReference {
            shape: owner.to_string(),
            reference: reference.to_string(),
        })
    }
}
