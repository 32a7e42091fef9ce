//! Value type synthesis.
//!
//! Maps the value expression of a triple constraint to a TypeScript type.
//! Only node kind, datatype and enumerated values matter; other facets are
//! ignored.

use crate::error::CodegenError;
use crate::typescript::context::{Fragment, WalkContext};
use crate::typescript::enums::{assign_members, enum_name};
use crate::typescript::walker::ExpressionWalker;
use shexgen_schema::naming::normalize_iri;
use shexgen_schema::types::{RDF_LANG_STRING, XSD};
use shexgen_schema::{NodeConstraint, NodeKind, ShapeExpr, ValueSetValue};

const NODE: &str = "string | NamedNode";
const STRING_LITERAL: &str = "string | Literal";
const NUMBER_LITERAL: &str = "number | Literal";
const DATE_LITERAL: &str = "Date | Literal";

const NUMERIC: &[&str] = &[
    "integer",
    "decimal",
    "float",
    "double",
    "nonPositiveInteger",
    "negativeInteger",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "positiveInteger",
];

const TEMPORAL: &[&str] = &["dateTime", "date", "time", "dateTimeStamp"];

/// Returns the TypeScript type of a datatype IRI.
#[must_use]
pub fn datatype_type(datatype: &str) -> String {
    if datatype == RDF_LANG_STRING {
        return STRING_LITERAL.to_string();
    }
    match datatype.strip_prefix(XSD) {
        Some("string") => STRING_LITERAL.to_string(),
        Some(local) if NUMERIC.contains(&local) => NUMBER_LITERAL.to_string(),
        Some(local) if TEMPORAL.contains(&local) => DATE_LITERAL.to_string(),
        _ => normalize_iri(datatype, true, None, None),
    }
}

/// Returns the TypeScript type of a node constraint without value set.
#[must_use]
pub fn node_constraint_type(constraint: &NodeConstraint) -> String {
    match (constraint.node_kind, constraint.datatype.as_deref()) {
        (Some(kind), _) if kind.is_node() => NODE.to_string(),
        (_, Some(datatype)) => datatype_type(datatype),
        (Some(NodeKind::Literal), None) => STRING_LITERAL.to_string(),
        _ => "string".to_string(),
    }
}

impl ExpressionWalker<'_> {
    /// Synthesizes the type of a value expression.
    ///
    /// The returned fragment carries the type text in `generated`, plus the
    /// shapes, inline enums and name contexts it introduced.
    ///
    /// # Errors
    /// Returns `CodegenError` for negated or external value expressions and
    /// for value sets that cannot be named.
    pub fn synthesize(
        &self,
        value: Option<&ShapeExpr>,
        ctx: WalkContext<'_>,
    ) -> Result<Fragment, CodegenError> {
        let Some(value) = value else {
            return Ok(Fragment::generated("string"));
        };

        match value {
            ShapeExpr::NodeConstraint(constraint) => match constraint.values.as_deref() {
                Some(values) => self.synthesize_enum(values, ctx),
                None => Ok(Fragment::generated(node_constraint_type(constraint))),
            },
            ShapeExpr::Ref(reference) => {
                let name = normalize_iri(reference, true, None, None);
                let mut fragment = Fragment::generated(self.emitter.render_reference(&name));
                fragment.child_shapes.insert(reference.clone());
                Ok(fragment)
            }
            ShapeExpr::Shape(shape) => self.compose_shape(shape, ctx.without_predicate()),
            ShapeExpr::ShapeOr(members) => {
                let (texts, mut fragment) = self.synthesize_all(members, ctx)?;
                fragment.generated = self.emitter.render_choice(&texts);
                Ok(fragment)
            }
            ShapeExpr::ShapeAnd(members) => {
                let (texts, mut fragment) = self.synthesize_all(members, ctx)?;
                fragment.generated = self.emitter.render_intersection(&texts);
                Ok(fragment)
            }
            ShapeExpr::ShapeNot(_) | ShapeExpr::ShapeExternal => Err(CodegenError::unsupported(
                ctx.shape_label(),
                value.kind(),
            )),
        }
    }

    fn synthesize_all(
        &self,
        members: &[ShapeExpr],
        ctx: WalkContext<'_>,
    ) -> Result<(Vec<String>, Fragment), CodegenError> {
        let mut fragment = Fragment::default();
        let mut texts = Vec::with_capacity(members.len());
        for member in members {
            let mut synthesized = self.synthesize(Some(member), ctx)?;
            texts.push(std::mem::take(&mut synthesized.generated));
            fragment.absorb(synthesized);
        }
        Ok((texts, fragment))
    }

    /// Types a value set as accesses to its inline enum.
    fn synthesize_enum(
        &self,
        values: &[ValueSetValue],
        ctx: WalkContext<'_>,
    ) -> Result<Fragment, CodegenError> {
        let name = match ctx.predicate {
            Some(_) => enum_name(ctx.shape_id, ctx.predicate)?,
            // The bare shape name is taken by the declaration's own alias.
            None => format!("{}Value", enum_name(ctx.shape_id, None)?),
        };
        // Before the catalog is final, fall back to this set's own names.
        let provisional = assign_members(values, ctx.prefixes);

        let accesses: Vec<String> = provisional
            .iter()
            .map(|member| {
                let member_name = ctx
                    .enums
                    .member(&name, &member.value)
                    .unwrap_or(&member.name);
                self.emitter.render_enum_access(&name, member_name)
            })
            .collect();

        let text = match accesses.as_slice() {
            [] => "never".to_string(),
            [single] => single.clone(),
            _ => self.emitter.render_choice(&accesses),
        };

        let mut fragment = Fragment::generated(text);
        fragment.inline_enums.insert(name, values);
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typescript::context::InlineEnums;
    use crate::typescript::emitter::TypeDeclarations;
    use crate::typescript::enums::EnumCatalog;
    use shexgen_schema::{PrefixMap, Shape, TripleConstraint, TripleExpr};

    const SHAPE: &str = "http://ex.org/Issue";
    const STATUS: &str = "http://ex.org/status";

    fn xsd(local: &str) -> String {
        format!("{XSD}{local}")
    }

    fn synthesize_with(value: &ShapeExpr, enums: &EnumCatalog) -> Result<Fragment, CodegenError> {
        let prefixes = PrefixMap::new();
        let ctx = WalkContext::new(Some(SHAPE), &prefixes, enums).with_predicate(STATUS);
        ExpressionWalker::new(&TypeDeclarations).synthesize(Some(value), ctx)
    }

    fn synthesize(value: &ShapeExpr) -> Fragment {
        synthesize_with(value, &EnumCatalog::default()).unwrap()
    }

    #[test]
    fn test_datatype_mapping() {
        assert_eq!(datatype_type(&xsd("integer")), "number | Literal");
        assert_eq!(datatype_type(&xsd("unsignedByte")), "number | Literal");
        assert_eq!(datatype_type(&xsd("dateTime")), "Date | Literal");
        assert_eq!(datatype_type(&xsd("string")), "string | Literal");
        assert_eq!(datatype_type(RDF_LANG_STRING), "string | Literal");
        assert_eq!(datatype_type(&xsd("boolean")), "Boolean");
        assert_eq!(datatype_type("http://ex.org/types/Money"), "Money");
    }

    #[test]
    fn test_node_kind_wins_over_datatype() {
        let constraint = NodeConstraint {
            node_kind: Some(NodeKind::Iri),
            datatype: Some(xsd("integer")),
            ..NodeConstraint::default()
        };
        assert_eq!(node_constraint_type(&constraint), "string | NamedNode");
        assert_eq!(
            node_constraint_type(&NodeConstraint::with_node_kind(NodeKind::Literal)),
            "string | Literal"
        );
        assert_eq!(node_constraint_type(&NodeConstraint::default()), "string");
    }

    #[test]
    fn test_missing_value_is_string() {
        let prefixes = PrefixMap::new();
        let enums = EnumCatalog::default();
        let ctx = WalkContext::new(Some(SHAPE), &prefixes, &enums);
        let fragment = ExpressionWalker::new(&TypeDeclarations)
            .synthesize(None, ctx)
            .unwrap();
        assert_eq!(fragment.generated, "string");
    }

    #[test]
    fn test_enum_values() {
        let value = ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
            ValueSetValue::literal("open"),
            ValueSetValue::literal("closed"),
        ]));
        let fragment = synthesize(&value);
        assert_eq!(fragment.generated, "StatusType.Open | StatusType.Closed");
        assert_eq!(fragment.inline_enums.get("StatusType").map(<[_]>::len), Some(2));

        let single = ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
            ValueSetValue::literal("open"),
        ]));
        assert_eq!(synthesize(&single).generated, "StatusType.Open");

        let empty = ShapeExpr::NodeConstraint(NodeConstraint::with_values(Vec::new()));
        assert_eq!(synthesize(&empty).generated, "never");
    }

    #[test]
    fn test_declaration_level_values_do_not_take_shape_name() {
        let prefixes = PrefixMap::new();
        let enums = EnumCatalog::default();
        let ctx = WalkContext::new(Some(SHAPE), &prefixes, &enums);
        let value = ShapeExpr::ShapeOr(vec![
            ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
                ValueSetValue::literal("x"),
                ValueSetValue::literal("y"),
            ])),
            ShapeExpr::Ref("http://ex.org/Task".to_string()),
        ]);
        let fragment = ExpressionWalker::new(&TypeDeclarations)
            .synthesize(Some(&value), ctx)
            .unwrap();

        assert_eq!(fragment.generated, "IssueValue.X | IssueValue.Y | Task");
        assert!(fragment.inline_enums.get("IssueValue").is_some());
        assert!(fragment.inline_enums.get("Issue").is_none());
    }

    #[test]
    fn test_anonymous_value_set_cannot_be_named() {
        let prefixes = PrefixMap::new();
        let enums = EnumCatalog::default();
        let ctx = WalkContext::new(None, &prefixes, &enums);
        let value = ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
            ValueSetValue::literal("x"),
        ]));
        let err = ExpressionWalker::new(&TypeDeclarations)
            .synthesize(Some(&value), ctx)
            .unwrap_err();
        assert!(matches!(err, CodegenError::NameSynthesis { .. }));
    }

    #[test]
    fn test_enum_access_uses_catalog_names() {
        let mut inline = InlineEnums::new();
        inline.insert(
            "StatusType",
            &[
                ValueSetValue::iri("http://ex.org/a/Open"),
                ValueSetValue::iri("http://ex.org/b/Open"),
            ],
        );
        let catalog = EnumCatalog::from_inline(&inline, &PrefixMap::new());

        // On its own this set would name its only member `Open`.
        let value = ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
            ValueSetValue::iri("http://ex.org/b/Open"),
        ]));
        let fragment = synthesize_with(&value, &catalog).unwrap();
        assert_eq!(fragment.generated, "StatusType.BOpen");
    }

    #[test]
    fn test_reference_and_nested_shape() {
        let reference = synthesize(&ShapeExpr::Ref("http://ex.org/Person".to_string()));
        assert_eq!(reference.generated, "Person");
        assert!(reference.child_shapes.contains("http://ex.org/Person"));

        let nested = ShapeExpr::Shape(Shape::new(TripleExpr::TripleConstraint(
            TripleConstraint::new("http://ex.org/street", None),
        )));
        assert_eq!(synthesize(&nested).generated, "{\n  street: string;\n}");
    }

    #[test]
    fn test_shape_or_and() {
        let or = ShapeExpr::ShapeOr(vec![
            ShapeExpr::Ref("http://ex.org/Person".to_string()),
            ShapeExpr::Ref("http://ex.org/Organization".to_string()),
        ]);
        let fragment = synthesize(&or);
        assert_eq!(fragment.generated, "Person | Organization");
        assert_eq!(fragment.child_shapes.len(), 2);

        let and = ShapeExpr::ShapeAnd(vec![
            ShapeExpr::Ref("http://ex.org/Person".to_string()),
            ShapeExpr::Ref("http://ex.org/Agent".to_string()),
        ]);
        assert_eq!(synthesize(&and).generated, "Person & Agent");
    }

    #[test]
    fn test_negation_is_unsupported() {
        let value = ShapeExpr::ShapeNot(Box::new(ShapeExpr::Ref("http://ex.org/P".to_string())));
        let err = synthesize_with(&value, &EnumCatalog::default()).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedExpressionKind { ref kind, .. } if kind == "ShapeNot"
        ));
    }
}
