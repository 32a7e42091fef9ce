//! Duplicate-property pre-pass.
//!
//! ShEx allows the same predicate to be constrained several times in one
//! group. Generated object types can only carry a property once, so
//! duplicates are folded together before a shape is walked.

use crate::types::{NodeConstraint, ShapeExpr, TripleConstraint, TripleExpr, ValueSetValue};

/// Merges triple constraints that share a predicate.
///
/// * When both constraints carry enumerated value sets, the result keeps the
///   first constraint's position and the ordered union of both sets.
/// * Otherwise the later constraint replaces the earlier one, still at the
///   earlier one's position.
///
/// Non-constraint expressions are passed through untouched.
#[must_use]
pub fn merge_duplicates(expressions: Vec<TripleExpr>) -> Vec<TripleExpr> {
    let mut merged: Vec<TripleExpr> = Vec::with_capacity(expressions.len());

    for expression in expressions {
        let TripleExpr::TripleConstraint(current) = expression else {
            merged.push(expression);
            continue;
        };

        let existing = merged.iter_mut().find_map(|e| match e {
            TripleExpr::TripleConstraint(tc) if tc.predicate == current.predicate => Some(tc),
            _ => None,
        });

        match existing {
            Some(previous) => {
                tracing::debug!("Merging duplicate predicate {}", current.predicate);
                *previous = merge_pair(previous, current);
            }
            None => merged.push(TripleExpr::TripleConstraint(current)),
        }
    }

    merged
}

/// Hoists the children of nested sequences into one sequence, then merges
/// duplicate predicates across the result.
///
/// Every constraint of a sequence nested in a sequence lands in the same
/// object type, so a predicate repeated at different depths is merged like
/// one repeated at the same depth. Choices and inclusions stay in place.
#[must_use]
pub fn flatten_sequence(expressions: Vec<TripleExpr>) -> Vec<TripleExpr> {
    let mut flat = Vec::with_capacity(expressions.len());
    hoist_sequences(expressions, &mut flat);
    merge_duplicates(flat)
}

fn hoist_sequences(expressions: Vec<TripleExpr>, flat: &mut Vec<TripleExpr>) {
    for expression in expressions {
        match expression {
            TripleExpr::EachOf(nested) => hoist_sequences(nested, flat),
            other => flat.push(other),
        }
    }
}

/// Applies the duplicate pre-pass to a shape's top-level group.
///
/// A sequence is flattened with [`flatten_sequence`]; the alternatives of a
/// choice are merged with [`merge_duplicates`].
#[must_use]
pub fn merge_expression(expression: TripleExpr) -> TripleExpr {
    match expression {
        TripleExpr::EachOf(children) => TripleExpr::EachOf(flatten_sequence(children)),
        TripleExpr::OneOf(children) => TripleExpr::OneOf(merge_duplicates(children)),
        other => other,
    }
}

fn merge_pair(previous: &TripleConstraint, current: TripleConstraint) -> TripleConstraint {
    match (previous.enum_values(), current.enum_values()) {
        (Some(first), Some(second)) => {
            let values = union_values(first, second);
            let mut constraint = match current.value_expr.as_deref() {
                Some(ShapeExpr::NodeConstraint(nc)) => NodeConstraint {
                    values: None,
                    ..nc.clone()
                },
                _ => NodeConstraint::default(),
            };
            constraint.values = Some(values);
            TripleConstraint {
                value_expr: Some(Box::new(ShapeExpr::NodeConstraint(constraint))),
                ..current
            }
        }
        _ => current,
    }
}

/// Ordered union of two value sets, keyed on lexical form.
#[must_use]
pub fn union_values(first: &[ValueSetValue], second: &[ValueSetValue]) -> Vec<ValueSetValue> {
    let mut values: Vec<ValueSetValue> = Vec::with_capacity(first.len() + second.len());
    for value in first.iter().chain(second) {
        if !values.iter().any(|v| v.lexical() == value.lexical()) {
            values.push(value.clone());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "http://example.org/status";
    const NAME: &str = "http://xmlns.com/foaf/0.1/name";

    fn enum_tc(predicate: &str, values: &[&str]) -> TripleExpr {
        TripleExpr::TripleConstraint(TripleConstraint::new(
            predicate,
            Some(ShapeExpr::NodeConstraint(NodeConstraint::with_values(
                values.iter().map(|v| ValueSetValue::literal(*v)).collect(),
            ))),
        ))
    }

    fn lexicals(expr: &TripleExpr) -> Vec<String> {
        expr.as_triple_constraint()
            .and_then(TripleConstraint::enum_values)
            .unwrap_or_default()
            .iter()
            .map(|v| v.lexical().to_string())
            .collect()
    }

    #[test]
    fn test_merge_duplicate_enums_unions_values() {
        let merged = merge_duplicates(vec![
            enum_tc(STATUS, &["a", "b"]),
            enum_tc(STATUS, &["b", "c"]),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(lexicals(&merged[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_keeps_first_position() {
        let name = TripleExpr::TripleConstraint(TripleConstraint::new(NAME, None));
        let merged = merge_duplicates(vec![
            enum_tc(STATUS, &["a"]),
            name,
            enum_tc(STATUS, &["b"]),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(lexicals(&merged[0]), vec!["a", "b"]);
        assert_eq!(merged[1].kind(), "TripleConstraint");
    }

    #[test]
    fn test_merge_non_enum_duplicate_last_wins() {
        let first = TripleConstraint::new(NAME, None).with_cardinality(1, Some(1));
        let second = TripleConstraint::new(NAME, None).with_cardinality(0, None);
        let merged = merge_duplicates(vec![
            TripleExpr::TripleConstraint(first),
            TripleExpr::TripleConstraint(second),
        ]);

        assert_eq!(merged.len(), 1);
        let tc = merged[0].as_triple_constraint().expect("constraint");
        assert_eq!(tc.cardinality.min, 0);
        assert!(tc.cardinality.is_multiple());
    }

    #[test]
    fn test_merge_passes_groups_through() {
        let merged = merge_duplicates(vec![
            TripleExpr::OneOf(vec![enum_tc(STATUS, &["a"])]),
            enum_tc(STATUS, &["b"]),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_expression_merges_top_level() {
        let expr = TripleExpr::EachOf(vec![enum_tc(STATUS, &["a"]), enum_tc(STATUS, &["a"])]);
        match merge_expression(expr) {
            TripleExpr::EachOf(children) => {
                assert_eq!(children.len(), 1);
                assert_eq!(lexicals(&children[0]), vec!["a"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_flatten_sequence_merges_across_depths() {
        let flat = flatten_sequence(vec![
            enum_tc(STATUS, &["a"]),
            TripleExpr::EachOf(vec![
                TripleExpr::TripleConstraint(TripleConstraint::new(NAME, None)),
                TripleExpr::EachOf(vec![enum_tc(STATUS, &["b"])]),
            ]),
        ]);

        assert_eq!(flat.len(), 2);
        assert_eq!(lexicals(&flat[0]), vec!["a", "b"]);
        assert_eq!(flat[1].kind(), "TripleConstraint");
    }

    #[test]
    fn test_flatten_sequence_keeps_choices() {
        let flat = flatten_sequence(vec![
            enum_tc(STATUS, &["a"]),
            TripleExpr::OneOf(vec![enum_tc(STATUS, &["b"]), enum_tc(NAME, &["x"])]),
        ]);

        assert_eq!(flat.len(), 2);
        assert_eq!(lexicals(&flat[0]), vec!["a"]);
        assert_eq!(flat[1].kind(), "OneOf");
    }

    #[test]
    fn test_merge_expression_flattens_nested_sequence() {
        let expr = TripleExpr::EachOf(vec![
            enum_tc(STATUS, &["a"]),
            TripleExpr::EachOf(vec![enum_tc(STATUS, &["b"])]),
        ]);
        match merge_expression(expr) {
            TripleExpr::EachOf(children) => {
                assert_eq!(children.len(), 1);
                assert_eq!(lexicals(&children[0]), vec!["a", "b"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
