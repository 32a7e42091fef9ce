//! Walk context and generated fragments.

use crate::typescript::enums::EnumCatalog;
use indexmap::{IndexMap, IndexSet};
use shexgen_schema::normalize::union_values;
use shexgen_schema::{PrefixMap, ValueSetValue};

/// Immutable context passed down the expression walk.
///
/// Built once per shape; nested calls derive copies through the `with_*`
/// methods instead of mutating it.
#[derive(Debug, Clone, Copy)]
pub struct WalkContext<'a> {
    /// Identity of the shape being generated.
    pub shape_id: Option<&'a str>,
    /// Active prefix table.
    pub prefixes: &'a PrefixMap,
    /// Predicates routed to the open (extra) surface.
    pub extra: &'a [String],
    /// Inline enums known for this generation and their member names.
    pub enums: &'a EnumCatalog,
    /// Predicate owning the value being synthesized.
    pub predicate: Option<&'a str>,
}

impl<'a> WalkContext<'a> {
    /// Creates a context for a shape.
    #[must_use]
    pub fn new(shape_id: Option<&'a str>, prefixes: &'a PrefixMap, enums: &'a EnumCatalog) -> Self {
        Self {
            shape_id,
            prefixes,
            extra: &[],
            enums,
            predicate: None,
        }
    }

    /// Returns a copy with a different extra predicate set.
    #[must_use]
    pub fn with_extra(self, extra: &'a [String]) -> Self {
        Self { extra, ..self }
    }

    /// Returns a copy owned by `predicate`.
    #[must_use]
    pub fn with_predicate(self, predicate: &'a str) -> Self {
        Self {
            predicate: Some(predicate),
            ..self
        }
    }

    /// Returns a copy with no owning predicate.
    #[must_use]
    pub fn without_predicate(self) -> Self {
        Self {
            predicate: None,
            ..self
        }
    }

    /// Returns true if `predicate` belongs to the extra surface.
    #[must_use]
    pub fn is_extra(&self, predicate: &str) -> bool {
        self.extra.iter().any(|p| p == predicate)
    }

    /// Shape label used in error messages.
    #[must_use]
    pub fn shape_label(&self) -> &'a str {
        self.shape_id.unwrap_or("<anonymous>")
    }
}

/// Inline enum value sets keyed by synthesized enum name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineEnums(IndexMap<String, Vec<ValueSetValue>>);

impl InlineEnums {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds values under `name`, unioning with values already recorded.
    pub fn insert(&mut self, name: impl Into<String>, values: &[ValueSetValue]) {
        let entry = self.0.entry(name.into()).or_default();
        *entry = union_values(entry.as_slice(), values);
    }

    /// Merges every enum of `other` into this set.
    pub fn merge(&mut self, other: &Self) {
        for (name, values) in &other.0 {
            self.insert(name.as_str(), values);
        }
    }

    /// Returns the values recorded under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[ValueSetValue]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Iterates over `(name, values)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValueSetValue])> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Returns the number of enums.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no enum was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of the walk at one node.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    /// Required-surface text.
    pub generated: String,
    /// Open-surface text, joined to the required surface by intersection.
    pub extra: String,
    /// Synthesized value type, set by triple constraints.
    pub type_value: Option<String>,
    /// Whether the fragment constrains `rdf:type` to a non-empty value set.
    pub typed: bool,
    /// Shapes referenced by the fragment.
    pub child_shapes: IndexSet<String>,
    /// Inline enums introduced by the fragment.
    pub inline_enums: InlineEnums,
    /// Short name to curie entries contributed by the fragment.
    pub name_context: IndexMap<String, String>,
}

impl Fragment {
    /// Creates a fragment with only required-surface text.
    #[must_use]
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            generated: text.into(),
            ..Self::default()
        }
    }

    /// Merges the metadata of `other` (everything but the texts).
    pub fn absorb(&mut self, other: Self) {
        self.typed |= other.typed;
        self.child_shapes.extend(other.child_shapes);
        self.inline_enums.merge(&other.inline_enums);
        for (name, curie) in other.name_context {
            self.name_context.entry(name).or_insert(curie);
        }
    }
}
