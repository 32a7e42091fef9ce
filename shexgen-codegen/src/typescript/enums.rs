//! Enum name and member synthesis.
//!
//! Inline value sets are collected per synthesized enum name during a first
//! walk, merged, and only then assigned member names. Property types are
//! rendered against the resulting [`EnumCatalog`], so every `Enum.Member`
//! access names a member of the emitted declaration.

use crate::error::CodegenError;
use crate::typescript::context::InlineEnums;
use indexmap::IndexMap;
use shexgen_schema::naming::normalize_iri;
use shexgen_schema::{PrefixMap, ValueSetValue};

/// One member of an emitted enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member identifier.
    pub name: String,
    /// String value (the lexical form of the value set entry).
    pub value: String,
}

/// Derives the enum name for a value set.
///
/// * shape only: the shape name (standalone enumeration);
/// * shape and a predicate whose local name is `type`: shape name followed
///   by the predicate name;
/// * any other predicate: predicate name followed by `Type`.
///
/// # Errors
/// Returns [`CodegenError::NameSynthesis`] when neither is available.
pub fn enum_name(shape_id: Option<&str>, predicate: Option<&str>) -> Result<String, CodegenError> {
    match (shape_id, predicate) {
        (Some(id), None) => Ok(normalize_iri(id, true, None, None)),
        (Some(id), Some(predicate)) if normalize_iri(predicate, false, None, None) == "type" => {
            Ok(format!(
                "{}{}",
                normalize_iri(id, true, None, None),
                normalize_iri(predicate, true, None, None)
            ))
        }
        (_, Some(predicate)) => Ok(format!("{}Type", normalize_iri(predicate, true, None, None))),
        (None, None) => Err(CodegenError::NameSynthesis {
            message: "value set has neither an owning shape nor a predicate".to_string(),
        }),
    }
}

/// Assigns pairwise distinct member names to a value set.
///
/// Duplicate values are dropped. A value whose name collides with another
/// value's is re-normalized with the collision as hint, which prepends the
/// namespace prefix; anything still colliding gets a numeric suffix.
#[must_use]
pub fn assign_members(values: &[ValueSetValue], prefixes: &PrefixMap) -> Vec<EnumMember> {
    let mut lexicals: Vec<&str> = Vec::with_capacity(values.len());
    for value in values {
        if !lexicals.contains(&value.lexical()) {
            lexicals.push(value.lexical());
        }
    }

    let plain: Vec<String> = lexicals
        .iter()
        .map(|v| normalize_iri(v, true, None, None))
        .collect();

    let mut members: Vec<EnumMember> = Vec::with_capacity(lexicals.len());
    for (idx, lexical) in lexicals.iter().enumerate() {
        let collides = plain
            .iter()
            .enumerate()
            .any(|(other, name)| other != idx && *name == plain[idx]);
        let mut name = if collides {
            normalize_iri(lexical, true, Some(plain[idx].as_str()), Some(prefixes))
        } else {
            plain[idx].clone()
        };

        if members.iter().any(|m| m.name == name) {
            let base = name;
            let mut n = 2;
            name = format!("{base}_{n}");
            while members.iter().any(|m| m.name == name) {
                n += 1;
                name = format!("{base}_{n}");
            }
        }

        members.push(EnumMember {
            name,
            value: (*lexical).to_string(),
        });
    }
    members
}

/// Final member names of every enum introduced by one generation.
#[derive(Debug, Clone, Default)]
pub struct EnumCatalog {
    enums: IndexMap<String, Vec<EnumMember>>,
}

impl EnumCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the catalog from merged inline value sets.
    #[must_use]
    pub fn from_inline(inline: &InlineEnums, prefixes: &PrefixMap) -> Self {
        let enums = inline
            .iter()
            .map(|(name, values)| (name.to_string(), assign_members(values, prefixes)))
            .collect();
        Self { enums }
    }

    /// Returns the member name assigned to `lexical` in enum `name`.
    #[must_use]
    pub fn member(&self, name: &str, lexical: &str) -> Option<&str> {
        self.enums
            .get(name)?
            .iter()
            .find(|m| m.value == lexical)
            .map(|m| m.name.as_str())
    }

    /// Returns the members of enum `name`.
    #[must_use]
    pub fn members(&self, name: &str) -> Option<&[EnumMember]> {
        self.enums.get(name).map(Vec::as_slice)
    }

    /// Returns true if an enum called `name` is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Iterates over `(name, members)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EnumMember])> {
        self.enums.iter().map(|(n, m)| (n.as_str(), m.as_slice()))
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}
