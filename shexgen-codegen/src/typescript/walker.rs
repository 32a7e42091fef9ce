//! Expression walker.
//!
//! Recursive walk over a shape's triple expression producing a
//! [`Fragment`] per node. Text is produced through the [`Emitter`] strategy;
//! the merge rules between children live here and only here.
//!
//! Two channels are carried up the tree:
//!
//! - `generated`: the required surface, fields of the shape's object type;
//! - `extra`: the open surface, joined to the required one by intersection.
//!
//! Inside a sequence (`EachOf`), a nested choice (`OneOf`) does not become a
//! field group of the sequence: its whole union, together with its own
//! extras, lands in the `extra` channel. Generated shapes therefore read as
//! `{ fields } & (A | B)`.

use crate::error::CodegenError;
use crate::typescript::context::{Fragment, WalkContext};
use crate::typescript::emitter::Emitter;
use shexgen_schema::naming::normalize_iri;
use shexgen_schema::normalize::flatten_sequence;
use shexgen_schema::types::RDF_TYPE;
use shexgen_schema::{TripleConstraint, TripleExpr};

/// Walks triple expressions with a given emission strategy.
#[derive(Clone, Copy)]
pub struct ExpressionWalker<'e> {
    pub(crate) emitter: &'e dyn Emitter,
}

impl<'e> ExpressionWalker<'e> {
    /// Creates a walker rendering through `emitter`.
    #[must_use]
    pub fn new(emitter: &'e dyn Emitter) -> Self {
        Self { emitter }
    }

    /// Returns the emission strategy.
    #[must_use]
    pub fn emitter(&self) -> &'e dyn Emitter {
        self.emitter
    }

    /// Walks one triple expression.
    ///
    /// # Errors
    /// Returns `CodegenError` if a value cannot be synthesized, an enum
    /// cannot be named or a predicate has no declared prefix.
    pub fn walk(&self, expr: &TripleExpr, ctx: WalkContext<'_>) -> Result<Fragment, CodegenError> {
        match expr {
            TripleExpr::TripleConstraint(tc) => self.walk_triple_constraint(tc, ctx),
            TripleExpr::OneOf(children) => self.walk_one_of(children, ctx),
            TripleExpr::EachOf(children) => self.walk_each_of(children, ctx),
            TripleExpr::Inclusion(reference) => Ok(self.walk_inclusion(reference)),
        }
    }

    fn walk_inclusion(&self, reference: &str) -> Fragment {
        let name = normalize_iri(reference, true, None, None);
        let mut fragment = Fragment::generated(self.emitter.render_reference(&name));
        fragment.child_shapes.insert(reference.to_string());
        fragment
    }

    fn walk_triple_constraint(
        &self,
        tc: &TripleConstraint,
        ctx: WalkContext<'_>,
    ) -> Result<Fragment, CodegenError> {
        let mut value = self.synthesize(tc.value_expr.as_deref(), ctx.with_predicate(&tc.predicate))?;
        let item = std::mem::take(&mut value.generated);
        let type_text = if tc.cardinality.is_multiple() {
            format!("{item} | {}", self.emitter.render_list(&item))
        } else {
            item
        };

        let name = normalize_iri(&tc.predicate, false, None, None);
        let field = self.emitter.render_field(
            &name,
            tc.cardinality.is_required(),
            &type_text,
            tc.comment(),
        );

        let enum_values = tc.enum_values();
        let mut fragment = Fragment::default();
        fragment.absorb(value);
        fragment.typed |= tc.predicate == RDF_TYPE && enum_values.is_some_and(|v| !v.is_empty());
        if ctx.is_extra(&tc.predicate) && enum_values.is_none() {
            fragment.extra = field;
        } else {
            fragment.generated = field;
        }
        fragment.type_value = Some(type_text);

        if self.emitter.collects_name_contexts() {
            let curie = curie_for(ctx, &tc.predicate)?;
            fragment.name_context.entry(name).or_insert(curie);
        }

        Ok(fragment)
    }

    fn walk_one_of(
        &self,
        children: &[TripleExpr],
        ctx: WalkContext<'_>,
    ) -> Result<Fragment, CodegenError> {
        let mut fragment = Fragment::default();
        let mut alternatives = Vec::with_capacity(children.len());
        let mut extras = Vec::new();

        for child in children {
            let mut walked = self.walk(child, ctx)?;
            if matches!(child, TripleExpr::TripleConstraint(_)) {
                walked.generated = self.wrap_field(&walked.generated);
                walked.extra = self.wrap_field(&walked.extra);
            }
            push_non_empty(&mut alternatives, &mut walked.generated);
            push_non_empty(&mut extras, &mut walked.extra);
            fragment.absorb(walked);
        }

        fragment.generated = self.emitter.render_choice(&alternatives);
        fragment.extra = self.emitter.render_intersection(&extras);
        Ok(fragment)
    }

    fn walk_each_of(
        &self,
        children: &[TripleExpr],
        ctx: WalkContext<'_>,
    ) -> Result<Fragment, CodegenError> {
        let children = flatten_sequence(children.to_vec());
        let mut fragment = Fragment::default();
        let mut fields = Vec::with_capacity(children.len());
        let mut extras = Vec::new();
        self.collect_sequence(&children, ctx, &mut fields, &mut extras, &mut fragment)?;

        if !fields.is_empty() {
            fragment.generated = self.emitter.render_object(&fields);
        }
        fragment.extra = self.emitter.render_intersection(&extras);
        Ok(fragment)
    }

    /// Gathers the fields and extras of a sequence. Callers hoist nested
    /// sequences and merge duplicate predicates first, so each predicate
    /// yields one field of the object.
    fn collect_sequence(
        &self,
        children: &[TripleExpr],
        ctx: WalkContext<'_>,
        fields: &mut Vec<String>,
        extras: &mut Vec<String>,
        fragment: &mut Fragment,
    ) -> Result<(), CodegenError> {
        for child in children {
            match child {
                TripleExpr::TripleConstraint(tc) => {
                    let mut walked = self.walk_triple_constraint(tc, ctx)?;
                    push_non_empty(fields, &mut walked.generated);
                    let mut extra = self.wrap_field(&walked.extra);
                    push_non_empty(extras, &mut extra);
                    fragment.absorb(walked);
                }
                TripleExpr::EachOf(nested) => {
                    self.collect_sequence(nested, ctx, fields, extras, fragment)?;
                }
                TripleExpr::OneOf(nested) => {
                    let mut walked = self.walk_one_of(nested, ctx)?;
                    let folded = self
                        .emitter
                        .render_intersection(&non_empty([&walked.generated, &walked.extra]));
                    if !folded.is_empty() {
                        extras.push(folded);
                    }
                    walked.generated.clear();
                    walked.extra.clear();
                    fragment.absorb(walked);
                }
                TripleExpr::Inclusion(reference) => {
                    let mut walked = self.walk_inclusion(reference);
                    push_non_empty(extras, &mut walked.generated);
                    fragment.absorb(walked);
                }
            }
        }
        Ok(())
    }

    fn wrap_field(&self, field: &str) -> String {
        if field.is_empty() {
            String::new()
        } else {
            self.emitter.render_object(&[field.to_string()])
        }
    }
}

/// Qualified name (`prefix:local`) of a predicate.
fn curie_for(ctx: WalkContext<'_>, predicate: &str) -> Result<String, CodegenError> {
    match ctx.prefixes.split(predicate) {
        Some((prefix, local)) => Ok(format!("{prefix}:{local}")),
        None if predicate == RDF_TYPE => Ok("rdf:type".to_string()),
        None => Err(CodegenError::UnresolvedPrefix {
            predicate: predicate.to_string(),
        }),
    }
}

fn push_non_empty(target: &mut Vec<String>, text: &mut String) {
    if !text.is_empty() {
        target.push(std::mem::take(text));
    }
}

fn non_empty<const N: usize>(texts: [&String; N]) -> Vec<String> {
    texts
        .into_iter()
        .filter(|t| !t.is_empty())
        .cloned()
        .collect()
}
