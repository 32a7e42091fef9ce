//! Emission strategies.
//!
//! The walker decides *what* is generated; an [`Emitter`] decides how each
//! construct is spelled. Every hook has a TypeScript default, so a strategy
//! only overrides what it changes.

use crate::typescript::enums::EnumMember;
use crate::typescript::shapes::ShapeArtifact;
use indexmap::IndexMap;

/// Rendering hooks used by the walker, the assembler and the driver.
pub trait Emitter {
    /// Lines emitted before every declaration (imports).
    fn prelude(&self) -> Vec<String> {
        Vec::new()
    }

    /// Renders one property of an object type.
    fn render_field(
        &self,
        name: &str,
        required: bool,
        type_text: &str,
        comment: Option<&str>,
    ) -> String {
        let marker = if required { "" } else { "?" };
        match comment {
            Some(comment) => format!(
                "{name}{marker}: {type_text}; // {}",
                comment.replace(['\r', '\n'], " ")
            ),
            None => format!("{name}{marker}: {type_text};"),
        }
    }

    /// Renders a structural object type.
    fn render_object(&self, fields: &[String]) -> String {
        if fields.is_empty() {
            return "{}".to_string();
        }
        let body: Vec<String> = fields.iter().map(|f| indent(f)).collect();
        format!("{{\n{}\n}}", body.join("\n"))
    }

    /// Renders a union. Returns an empty string for no alternatives.
    fn render_choice(&self, alternatives: &[String]) -> String {
        alternatives.join(" | ")
    }

    /// Renders an intersection, parenthesizing union members.
    fn render_intersection(&self, members: &[String]) -> String {
        if let [single] = members {
            return single.clone();
        }
        members
            .iter()
            .map(|m| {
                if has_top_level(m, '|') {
                    format!("({m})")
                } else {
                    m.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" & ")
    }

    /// Renders a reference to another declaration.
    fn render_reference(&self, name: &str) -> String {
        name.to_string()
    }

    /// Renders a list of `item`.
    fn render_list(&self, item: &str) -> String {
        if has_top_level(item, '|') || has_top_level(item, '&') {
            format!("({item})[]")
        } else {
            format!("{item}[]")
        }
    }

    /// Renders an enum member access.
    fn render_enum_access(&self, enum_name: &str, member: &str) -> String {
        format!("{enum_name}.{member}")
    }

    /// Renders an enum declaration.
    fn render_enum(&self, name: &str, members: &[EnumMember]) -> String {
        let body: Vec<String> = members
            .iter()
            .map(|m| format!("  {} = \"{}\"", m.name, escape(&m.value)))
            .collect();
        if body.is_empty() {
            format!("export enum {name} {{}}")
        } else {
            format!("export enum {name} {{\n{}\n}}", body.join(",\n"))
        }
    }

    /// Renders the exported alias of a shape.
    fn render_type_alias(&self, name: &str, body: &str) -> String {
        format!("export type {name} = {body};")
    }

    /// Whether the walker should collect name-context entries.
    fn collects_name_contexts(&self) -> bool {
        false
    }

    /// Renders the name-context table of a shape, if the strategy emits one.
    fn render_name_context(&self, _name: &str, _entries: &IndexMap<String, String>) -> Option<String> {
        None
    }

    /// Renders the runtime export of a shape, if the strategy emits one.
    ///
    /// * `type_enum` - the shape's `rdf:type` enum, when the shape is typed;
    /// * `children` - exported names of the other declared shapes it refers to.
    fn render_shape_export(
        &self,
        _artifact: &ShapeArtifact,
        _type_enum: Option<&str>,
        _children: &[&str],
    ) -> Option<String> {
        None
    }
}

/// Plain type declarations: enums and type aliases only.
///
/// No import is emitted. Property types mention `NamedNode` and `Literal`,
/// which the consuming module supplies (for example from `rdflib`), so the
/// declarations can be appended to a file that already imports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeDeclarations;

impl Emitter for TypeDeclarations {}

/// Self-contained module for `rdflib`-backed shapes.
///
/// Adds the node/literal and `shex-methods` imports, one name-context table
/// per shape, and a `Shape` wrapper export binding the shape's type to its
/// context, its `rdf:type` enum and the contexts of the shapes it refers to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeModule;

impl Emitter for ShapeModule {
    fn prelude(&self) -> Vec<String> {
        vec![
            "import { NamedNode, Literal } from \"rdflib\";".to_string(),
            "import { Shape } from \"shex-methods\";".to_string(),
        ]
    }

    fn collects_name_contexts(&self) -> bool {
        true
    }

    fn render_name_context(&self, name: &str, entries: &IndexMap<String, String>) -> Option<String> {
        let members: Vec<EnumMember> = entries
            .iter()
            .map(|(short, curie)| EnumMember {
                name: short.clone(),
                value: curie.clone(),
            })
            .collect();
        Some(self.render_enum(&context_name(name), &members))
    }

    fn render_shape_export(
        &self,
        artifact: &ShapeArtifact,
        type_enum: Option<&str>,
        children: &[&str],
    ) -> Option<String> {
        let name = &artifact.exported_name;
        let contexts: Vec<String> = children.iter().map(|child| context_name(child)).collect();

        let mut fields = vec![
            format!("id: \"{}\",", escape(&artifact.id)),
            format!("context: {},", context_name(name)),
        ];
        if let Some(type_enum) = type_enum {
            fields.push(format!("type: {type_enum},"));
        }
        fields.push(format!("childContexts: [{}],", contexts.join(", ")));

        let body: Vec<String> = fields.iter().map(|f| indent(f)).collect();
        Some(format!(
            "export const {} = new Shape<{name}>({{\n{}\n}});",
            binding_name(name),
            body.join("\n")
        ))
    }
}

fn context_name(name: &str) -> String {
    format!("{name}Context")
}

/// Value binding of an exported type: the name with a lower-case initial.
fn binding_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Indents every line of `text` by two spaces.
fn indent(text: &str) -> String {
    format!("  {}", text.replace('\n', "\n  "))
}

/// Escapes a value for a double-quoted string literal.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Returns true if `op` occurs outside every bracket pair of `text`.
fn has_top_level(text: &str, op: char) -> bool {
    let mut depth: usize = 0;
    for c in text.chars() {
        match c {
            '{' | '(' | '[' | '<' => depth += 1,
            '}' | ')' | ']' | '>' => depth = depth.saturating_sub(1),
            c if c == op && depth == 0 => return true,
            _ => {}
        }
    }
    false
}
