//! Schema type definitions.
//!
//! This module contains the data structures representing a ShEx schema:
//! shape declarations, shape expressions, triple expressions and node
//! constraints.

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;

/// `rdf:type`, the type-discriminating predicate.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:langString` datatype.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
/// `rdfs:comment`, used for property comments.
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
/// XML Schema datatype namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Complete ShEx schema definition.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Prefix table used to shorten IRIs.
    pub prefixes: PrefixMap,
    /// Base IRI, if declared.
    pub base: Option<String>,
    /// Shape declarations in source order.
    pub shapes: Vec<ShapeDecl>,
    /// Shape lookup map (built while adding shapes).
    shape_map: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new empty schema with the given prefixes.
    #[must_use]
    pub fn new(prefixes: PrefixMap) -> Self {
        Self {
            prefixes,
            ..Self::default()
        }
    }

    /// Adds a shape declaration to the schema.
    pub fn add_shape(&mut self, shape: ShapeDecl) {
        let index = self.shapes.len();
        self.shape_map.insert(shape.id.clone(), index);
        self.shapes.push(shape);
    }

    /// Looks up a shape declaration by id.
    ///
    /// `shapes` is public, so the lookup map may be stale after a caller
    /// edits it directly; such entries fall back to a linear scan.
    #[must_use]
    pub fn get_shape(&self, id: &str) -> Option<&ShapeDecl> {
        self.shape_map
            .get(id)
            .and_then(|&idx| self.shapes.get(idx))
            .filter(|shape| shape.id == id)
            .or_else(|| self.shapes.iter().find(|shape| shape.id == id))
    }

    /// Returns true if a shape with the given id exists.
    #[must_use]
    pub fn has_shape(&self, id: &str) -> bool {
        self.get_shape(id).is_some()
    }
}

/// Ordered prefix table (`prefix -> namespace IRI`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PrefixMap(IndexMap<String, String>);

impl PrefixMap {
    /// Creates an empty prefix table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.0.insert(prefix.into(), namespace.into());
    }

    /// Returns the prefix bound to exactly `namespace`.
    #[must_use]
    pub fn prefix_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, ns)| ns.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Splits `iri` into `(prefix, local part)` using the longest matching
    /// namespace.
    #[must_use]
    pub fn split<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        self.0
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| (prefix.as_str(), &iri[ns.len()..]))
    }

    /// Returns true if no prefix is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(prefix, namespace)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }
}

impl<P: Into<String>, N: Into<String>> FromIterator<(P, N)> for PrefixMap {
    fn from_iter<T: IntoIterator<Item = (P, N)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(p, ns)| (p.into(), ns.into()))
                .collect(),
        )
    }
}

/// A named shape declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDecl {
    /// Shape identity (IRI).
    pub id: String,
    /// Whether the declaration is abstract.
    pub is_abstract: bool,
    /// Declared shape expression.
    pub shape_expr: ShapeExpr,
}

impl ShapeDecl {
    /// Creates a new shape declaration.
    #[must_use]
    pub fn new(id: impl Into<String>, shape_expr: ShapeExpr) -> Self {
        Self {
            id: id.into(),
            is_abstract: false,
            shape_expr,
        }
    }

    /// Returns the enumerated values if this declaration is a pure
    /// enumeration (a node constraint carrying only a value set).
    #[must_use]
    pub fn enum_values(&self) -> Option<&[ValueSetValue]> {
        match &self.shape_expr {
            ShapeExpr::NodeConstraint(nc) => nc.values.as_deref(),
            _ => None,
        }
    }
}

/// Shape expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeExpr {
    /// Structural shape.
    Shape(Shape),
    /// Leaf node constraint.
    NodeConstraint(NodeConstraint),
    /// Disjunction of shape expressions.
    ShapeOr(Vec<ShapeExpr>),
    /// Conjunction of shape expressions.
    ShapeAnd(Vec<ShapeExpr>),
    /// Negation of a shape expression.
    ShapeNot(Box<ShapeExpr>),
    /// Shape defined outside of this schema.
    ShapeExternal,
    /// Reference to another shape declaration by IRI.
    Ref(String),
}

impl ShapeExpr {
    /// Returns the ShExJ kind name of this expression.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Shape(_) => "Shape",
            Self::NodeConstraint(_) => "NodeConstraint",
            Self::ShapeOr(_) => "ShapeOr",
            Self::ShapeAnd(_) => "ShapeAnd",
            Self::ShapeNot(_) => "ShapeNot",
            Self::ShapeExternal => "ShapeExternal",
            Self::Ref(_) => "ShapeRef",
        }
    }

    /// Returns true if this expression is a node constraint with a value set.
    #[must_use]
    pub fn is_enumeration(&self) -> bool {
        matches!(self, Self::NodeConstraint(nc) if nc.values.is_some())
    }
}

/// Structural shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    /// Optional shape id (nested shapes may have one).
    pub id: Option<String>,
    /// Whether the shape is closed.
    pub closed: bool,
    /// Predicates for which extra values are permitted.
    pub extra: Vec<String>,
    /// Shapes this shape extends.
    pub extends: Vec<String>,
    /// Triple expression (absent for an empty shape).
    pub expression: Option<TripleExpr>,
    /// Annotations.
    pub annotations: Vec<Annotation>,
}

impl Shape {
    /// Creates a shape with the given triple expression.
    #[must_use]
    pub fn new(expression: TripleExpr) -> Self {
        Self {
            expression: Some(expression),
            ..Self::default()
        }
    }
}

/// Triple expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TripleExpr {
    /// Single predicate constraint.
    TripleConstraint(TripleConstraint),
    /// Alternative group: exactly one child holds.
    OneOf(Vec<TripleExpr>),
    /// Sequence group: all children hold.
    EachOf(Vec<TripleExpr>),
    /// Inclusion of another shape's triple expression by IRI.
    Inclusion(String),
}

impl TripleExpr {
    /// Returns the ShExJ kind name of this expression.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TripleConstraint(_) => "TripleConstraint",
            Self::OneOf(_) => "OneOf",
            Self::EachOf(_) => "EachOf",
            Self::Inclusion(_) => "Inclusion",
        }
    }

    /// Returns the constraint if this is a triple constraint.
    #[must_use]
    pub const fn as_triple_constraint(&self) -> Option<&TripleConstraint> {
        match self {
            Self::TripleConstraint(tc) => Some(tc),
            _ => None,
        }
    }
}

/// Constraint on a single predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct TripleConstraint {
    /// Predicate IRI.
    pub predicate: String,
    /// Whether the constraint applies to incoming arcs.
    pub inverse: bool,
    /// Value expression (absent means any value).
    pub value_expr: Option<Box<ShapeExpr>>,
    /// Cardinality.
    pub cardinality: Cardinality,
    /// Annotations.
    pub annotations: Vec<Annotation>,
}

impl TripleConstraint {
    /// Creates a constraint with the default `{1,1}` cardinality.
    #[must_use]
    pub fn new(predicate: impl Into<String>, value_expr: Option<ShapeExpr>) -> Self {
        Self {
            predicate: predicate.into(),
            inverse: false,
            value_expr: value_expr.map(Box::new),
            cardinality: Cardinality::default(),
            annotations: Vec::new(),
        }
    }

    /// Sets the cardinality.
    #[must_use]
    pub fn with_cardinality(mut self, min: u32, max: Option<u32>) -> Self {
        self.cardinality = Cardinality { min, max };
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Returns the enumerated values of the value expression, if any.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[ValueSetValue]> {
        match self.value_expr.as_deref() {
            Some(ShapeExpr::NodeConstraint(nc)) => nc.values.as_deref(),
            _ => None,
        }
    }

    /// Returns the value of the `rdfs:comment` annotation, if present.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.annotations
            .iter()
            .find(|a| a.predicate == RDFS_COMMENT)
            .map(|a| a.object.lexical())
    }
}

/// Cardinality of a triple constraint. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    /// Minimum number of values.
    pub min: u32,
    /// Maximum number of values, `None` when unbounded.
    pub max: Option<u32>,
}

impl Default for Cardinality {
    fn default() -> Self {
        Self {
            min: 1,
            max: Some(1),
        }
    }
}

impl Cardinality {
    /// Returns true if at least one value is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.min > 0
    }

    /// Returns true if the maximum is unbounded.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.max.is_none()
    }
}

/// Node kind of a node constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// IRI node.
    Iri,
    /// Blank node.
    BNode,
    /// IRI or blank node.
    NonLiteral,
    /// Literal node.
    Literal,
}

impl NodeKind {
    /// Parses a node kind from its ShExJ name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "iri" => Some(Self::Iri),
            "bnode" => Some(Self::BNode),
            "nonliteral" => Some(Self::NonLiteral),
            "literal" => Some(Self::Literal),
            _ => None,
        }
    }

    /// Returns true if values of this kind are node identities.
    #[must_use]
    pub const fn is_node(&self) -> bool {
        !matches!(self, Self::Literal)
    }
}

/// Leaf constraint on a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeConstraint {
    /// Node kind.
    pub node_kind: Option<NodeKind>,
    /// Datatype IRI.
    pub datatype: Option<String>,
    /// XSD facets (`pattern`, `minlength`, ...) as their textual values.
    /// Kept for completeness, they do not influence generated types.
    pub facets: Vec<(String, String)>,
    /// Enumerated value set.
    pub values: Option<Vec<ValueSetValue>>,
}

impl NodeConstraint {
    /// Creates a node constraint with a node kind.
    #[must_use]
    pub fn with_node_kind(node_kind: NodeKind) -> Self {
        Self {
            node_kind: Some(node_kind),
            ..Self::default()
        }
    }

    /// Creates a node constraint with a datatype.
    #[must_use]
    pub fn with_datatype(datatype: impl Into<String>) -> Self {
        Self {
            datatype: Some(datatype.into()),
            ..Self::default()
        }
    }

    /// Creates a node constraint with an enumerated value set.
    #[must_use]
    pub fn with_values(values: Vec<ValueSetValue>) -> Self {
        Self {
            values: Some(values),
            ..Self::default()
        }
    }
}

/// Entry of an enumerated value set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum ValueSetValue {
    /// IRI value.
    Iri(String),
    /// Literal value.
    Literal(ObjectLiteral),
}

impl ValueSetValue {
    /// Creates an IRI value.
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// Creates a plain literal value.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(ObjectLiteral::new(value))
    }

    /// Returns the lexical form (IRI or literal value).
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::Literal(lit) => &lit.value,
        }
    }
}

/// Literal object with optional datatype or language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ObjectLiteral {
    /// Lexical value.
    pub value: String,
    /// Datatype IRI.
    #[serde(rename = "type", default)]
    pub datatype: Option<String>,
    /// Language tag.
    #[serde(default)]
    pub language: Option<String>,
}

impl ObjectLiteral {
    /// Creates a plain literal.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }
}

/// Annotation attached to a shape or triple expression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Annotation {
    /// Annotation predicate.
    pub predicate: String,
    /// Annotation object.
    pub object: ValueSetValue,
}

impl Annotation {
    /// Creates an `rdfs:comment` annotation.
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            predicate: RDFS_COMMENT.to_string(),
            object: ValueSetValue::literal(text),
        }
    }
}
