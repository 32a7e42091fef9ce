//! Shape assembly.
//!
//! Turns one shape declaration into an exported type alias plus the
//! metadata the driver needs (referenced shapes, inline enums, name
//! context).

use crate::error::CodegenError;
use crate::typescript::context::{Fragment, InlineEnums, WalkContext};
use crate::typescript::emitter::Emitter;
use crate::typescript::enums::EnumCatalog;
use crate::typescript::walker::ExpressionWalker;
use indexmap::{IndexMap, IndexSet};
use shexgen_schema::naming::normalize_iri;
use shexgen_schema::normalize::merge_expression;
use shexgen_schema::{PrefixMap, Shape, ShapeDecl, ShapeExpr, TripleExpr};

/// Assembled declaration of one shape.
#[derive(Debug, Clone)]
pub struct ShapeArtifact {
    /// Shape IRI.
    pub id: String,
    /// Exported type name.
    pub exported_name: String,
    /// Type text on the right-hand side of the alias.
    pub body: String,
    /// Full exported declaration.
    pub declaration: String,
    /// Shapes the declaration refers to.
    pub child_shapes: IndexSet<String>,
    /// Whether the shape constrains `rdf:type`.
    pub typed: bool,
    /// Inline enums introduced by the shape.
    pub inline_enums: InlineEnums,
    /// Short name to curie entries of the shape's properties.
    pub name_context: IndexMap<String, String>,
}

impl ExpressionWalker<'_> {
    /// Composes the type of a structural shape.
    ///
    /// Duplicate predicates of the top-level group are merged first. A lone
    /// triple constraint becomes an object of its single field; otherwise
    /// the required surface and the open surface are intersected. Bases in
    /// `extends` are prepended as intersection members.
    ///
    /// # Errors
    /// Returns `CodegenError` if walking the expression fails.
    pub fn compose_shape(
        &self,
        shape: &Shape,
        ctx: WalkContext<'_>,
    ) -> Result<Fragment, CodegenError> {
        let ctx = ctx.with_extra(&shape.extra).without_predicate();
        let empty = self.emitter.render_object(&[]);

        let mut fragment = match &shape.expression {
            None => Fragment::generated(empty.clone()),
            Some(expression) => {
                let expression = merge_expression(expression.clone());
                let mut walked = self.walk(&expression, ctx)?;
                let body = if let TripleExpr::TripleConstraint(_) = expression {
                    let field = if walked.generated.is_empty() {
                        &walked.extra
                    } else {
                        &walked.generated
                    };
                    self.emitter.render_object(std::slice::from_ref(field))
                } else {
                    let parts: Vec<String> = [&walked.generated, &walked.extra]
                        .into_iter()
                        .filter(|p| !p.is_empty())
                        .cloned()
                        .collect();
                    if parts.is_empty() {
                        empty.clone()
                    } else {
                        self.emitter.render_intersection(&parts)
                    }
                };
                walked.generated = body;
                walked.extra.clear();
                walked
            }
        };

        if !shape.extends.is_empty() {
            let mut members: Vec<String> = Vec::with_capacity(shape.extends.len() + 1);
            for base in &shape.extends {
                let name = normalize_iri(base, true, None, None);
                members.push(self.emitter.render_reference(&name));
                fragment.child_shapes.insert(base.clone());
            }
            if fragment.generated != empty {
                members.push(std::mem::take(&mut fragment.generated));
            }
            fragment.generated = self.emitter.render_intersection(&members);
        }

        Ok(fragment)
    }
}

/// Assembles shape declarations.
pub struct ShapeAssembler<'a> {
    walker: ExpressionWalker<'a>,
    prefixes: &'a PrefixMap,
    enums: &'a EnumCatalog,
}

impl<'a> ShapeAssembler<'a> {
    /// Creates an assembler.
    #[must_use]
    pub fn new(emitter: &'a dyn Emitter, prefixes: &'a PrefixMap, enums: &'a EnumCatalog) -> Self {
        Self {
            walker: ExpressionWalker::new(emitter),
            prefixes,
            enums,
        }
    }

    /// Assembles one declaration.
    ///
    /// Returns `None` for external shapes, which have no local definition.
    /// Declarations that are not structural shapes become aliases of their
    /// synthesized type.
    ///
    /// # Errors
    /// Returns `CodegenError` for negated shapes, for pure enumerations
    /// (those are emitted as enums by the driver) and for any failure while
    /// walking the shape.
    pub fn assemble(&self, decl: &ShapeDecl) -> Result<Option<ShapeArtifact>, CodegenError> {
        let ctx = WalkContext::new(Some(decl.id.as_str()), self.prefixes, self.enums);

        let fragment = match &decl.shape_expr {
            ShapeExpr::ShapeExternal => {
                tracing::debug!("Skipping external shape {}", decl.id);
                return Ok(None);
            }
            ShapeExpr::ShapeNot(_) => {
                return Err(CodegenError::unsupported(&decl.id, decl.shape_expr.kind()));
            }
            expr if expr.is_enumeration() => {
                return Err(CodegenError::generation(format!(
                    "shape '{}' is an enumeration, not a type",
                    decl.id
                )));
            }
            ShapeExpr::Shape(shape) => self.walker.compose_shape(shape, ctx)?,
            other => self.walker.synthesize(Some(other), ctx)?,
        };

        let exported_name = normalize_iri(&decl.id, true, None, None);
        let declaration = self
            .walker
            .emitter()
            .render_type_alias(&exported_name, &fragment.generated);
        tracing::trace!("Assembled shape {} as {}", decl.id, exported_name);

        Ok(Some(ShapeArtifact {
            id: decl.id.clone(),
            exported_name,
            body: fragment.generated,
            declaration,
            child_shapes: fragment.child_shapes,
            typed: fragment.typed,
            inline_enums: fragment.inline_enums,
            name_context: fragment.name_context,
        }))
    }
}
