//! Identifier normalization.
//!
//! Maps IRIs (and plain literal values) to legal TypeScript identifiers.
//! Normalization is deterministic; a disambiguation hint lets callers obtain
//! a distinct name for IRIs whose local names collide.

use crate::types::PrefixMap;

/// Splits an IRI into `(namespace, local name)`.
///
/// The local name is the text after the last `#`, or else after the last
/// `/` or `:`. Trailing separators are ignored, so `http://ex.org/Thing/`
/// has local name `Thing`.
#[must_use]
pub fn split_iri(iri: &str) -> (&str, &str) {
    let trimmed = iri.trim_end_matches(['/', '#']);
    let start = match trimmed.rfind('#') {
        Some(idx) => idx + 1,
        None => trimmed.rfind(['/', ':']).map_or(0, |idx| idx + 1),
    };
    (&iri[..start], &trimmed[start..])
}

/// Converts arbitrary text to camelCase, dropping every character that
/// cannot appear in an identifier.
#[must_use]
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for (i, word) in s
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        if i == 0 {
            if word.chars().all(|c| !c.is_lowercase()) {
                result.push_str(&word.to_lowercase());
            } else {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    result.extend(first.to_lowercase());
                    result.push_str(chars.as_str());
                }
            }
        } else {
            result.push_str(&capitalize(word));
        }
    }

    result
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalizes an IRI into an identifier.
///
/// * `capitalize` - upper-case the first character (type and enum names).
/// * `hint` - when the normalized name equals the hint (case-insensitive),
///   the namespace's prefix from `prefixes` (or, failing that, the last word
///   of the namespace) is prepended so the result differs from the hint.
/// * `prefixes` - prefix table used for disambiguation.
#[must_use]
pub fn normalize_iri(
    iri: &str,
    capitalize_first: bool,
    hint: Option<&str>,
    prefixes: Option<&PrefixMap>,
) -> String {
    let (namespace, local) = split_iri(iri);
    let mut name = to_camel_case(local);

    if let Some(hint) = hint.filter(|h| !h.is_empty())
        && name.to_lowercase() == hint.to_lowercase()
    {
        let qualifier = prefixes
            .and_then(|p| p.prefix_for_namespace(namespace))
            .map(to_camel_case)
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| namespace_label(namespace));
        if !qualifier.is_empty() {
            name = format!("{qualifier}{}", capitalize(&name));
        }
    }

    if capitalize_first {
        name = capitalize(&name);
    }

    if name.is_empty() {
        name.push('_');
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    name
}

/// Last identifier-like word of a namespace IRI.
fn namespace_label(namespace: &str) -> String {
    namespace
        .split(|c: char| !c.is_alphanumeric())
        .rfind(|w| !w.is_empty())
        .map(to_camel_case)
        .unwrap_or_default()
}
