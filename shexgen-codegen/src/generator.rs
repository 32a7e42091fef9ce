//! Schema-level generation driver.

use crate::error::CodegenError;
use crate::typescript::{
    Emitter, EnumCatalog, EnumMember, InlineEnums, ShapeArtifact, ShapeAssembler, ShapeModule,
    TypeDeclarations, assign_members, enum_name,
};
use indexmap::{IndexMap, IndexSet};
use shexgen_schema::types::RDF_TYPE;
use shexgen_schema::{Schema, ShapeDecl, validate_schema};

/// Output flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Enums and type aliases only. `NamedNode` and `Literal` are left to
    /// the consuming module.
    #[default]
    TypeDeclarations,
    /// Type aliases plus the imports, per-shape name contexts and a `Shape`
    /// wrapper export per shape.
    ShapeModule,
}

/// Generator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Output flavour.
    pub style: OutputStyle,
    /// Check references and cardinalities before generating.
    pub validate: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            style: OutputStyle::default(),
            validate: true,
        }
    }
}

/// Everything one generation produced, before rendering.
struct Generation {
    standalone: Vec<(String, Vec<EnumMember>)>,
    catalog: EnumCatalog,
    artifacts: Vec<ShapeArtifact>,
}

/// Main code generator.
pub struct Generator<'a> {
    schema: &'a Schema,
    config: GeneratorConfig,
    custom: Option<Box<dyn Emitter + 'a>>,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for the given schema.
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            config: GeneratorConfig::default(),
            custom: None,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub fn with_style(mut self, style: OutputStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Uses a custom emission strategy instead of the configured style.
    #[must_use]
    pub fn with_emitter(mut self, emitter: impl Emitter + 'a) -> Self {
        self.custom = Some(Box::new(emitter));
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn emitter(&self) -> &dyn Emitter {
        match (&self.custom, self.config.style) {
            (Some(custom), _) => custom.as_ref(),
            (None, OutputStyle::TypeDeclarations) => &TypeDeclarations,
            (None, OutputStyle::ShapeModule) => &ShapeModule,
        }
    }

    /// Generates the ordered list of declarations.
    ///
    /// Order: strategy prelude, inline enums, standalone enums, then one
    /// declaration per shape, each followed by its name context and its
    /// runtime export when the strategy emits them.
    ///
    /// # Errors
    /// Returns `CodegenError` if validation or any shape fails.
    pub fn generate(&self) -> Result<Vec<String>, CodegenError> {
        let emitter = self.emitter();
        let generation = self.run()?;
        let exported: IndexMap<&str, &str> = generation
            .artifacts
            .iter()
            .map(|a| (a.id.as_str(), a.exported_name.as_str()))
            .collect();

        let mut output = emitter.prelude();
        for (name, members) in generation.catalog.iter() {
            output.push(emitter.render_enum(name, members));
        }
        for (name, members) in &generation.standalone {
            output.push(emitter.render_enum(name, members));
        }
        for artifact in &generation.artifacts {
            output.push(artifact.declaration.clone());
            if let Some(table) =
                emitter.render_name_context(&artifact.exported_name, &artifact.name_context)
            {
                output.push(table);
            }

            let type_enum = if artifact.typed {
                Some(enum_name(Some(artifact.id.as_str()), Some(RDF_TYPE))?)
                    .filter(|name| generation.catalog.contains(name))
            } else {
                None
            };
            let children: Vec<&str> = artifact
                .child_shapes
                .iter()
                .filter(|id| **id != artifact.id)
                .filter_map(|id| exported.get(id.as_str()).copied())
                .collect();
            if let Some(export) =
                emitter.render_shape_export(artifact, type_enum.as_deref(), &children)
            {
                output.push(export);
            }
        }

        Ok(output)
    }

    /// Generates one source text holding every declaration.
    ///
    /// # Errors
    /// Returns `CodegenError` if generation fails.
    pub fn generate_module(&self) -> Result<String, CodegenError> {
        let mut module = self.generate()?.join("\n\n");
        module.push('\n');
        Ok(module)
    }

    /// Assembles every shape without rendering the module.
    ///
    /// # Errors
    /// Returns `CodegenError` if validation or any shape fails.
    pub fn artifacts(&self) -> Result<Vec<ShapeArtifact>, CodegenError> {
        Ok(self.run()?.artifacts)
    }

    fn run(&self) -> Result<Generation, CodegenError> {
        if self.config.validate {
            validate_schema(self.schema)?;
        }

        let prefixes = &self.schema.prefixes;
        let mut standalone = Vec::new();
        let mut enum_ids: IndexSet<&str> = IndexSet::new();
        let mut shapes: Vec<&ShapeDecl> = Vec::new();

        for decl in &self.schema.shapes {
            match decl.enum_values() {
                Some(values) => {
                    let name = enum_name(Some(decl.id.as_str()), None)?;
                    standalone.push((name, assign_members(values, prefixes)));
                    enum_ids.insert(decl.id.as_str());
                }
                None => shapes.push(decl),
            }
        }
        tracing::debug!(
            "Generating {} shapes and {} standalone enums",
            shapes.len(),
            standalone.len()
        );

        // Member names depend on the merged value sets, so shapes are walked
        // once to collect them and again against the final catalog.
        let first = self.assemble_all(&shapes, &EnumCatalog::new())?;
        let mut inline = InlineEnums::new();
        for artifact in &first {
            inline.merge(&artifact.inline_enums);
        }
        let catalog = EnumCatalog::from_inline(&inline, prefixes);

        for (name, _) in &standalone {
            if catalog.contains(name) {
                tracing::warn!("Inline enum {} shadows an enumeration shape", name);
            }
        }

        let mut artifacts = self.assemble_all(&shapes, &catalog)?;
        for artifact in &mut artifacts {
            artifact
                .child_shapes
                .retain(|id| !enum_ids.contains(id.as_str()));
        }

        Ok(Generation {
            standalone,
            catalog,
            artifacts,
        })
    }

    fn assemble_all(
        &self,
        shapes: &[&ShapeDecl],
        catalog: &EnumCatalog,
    ) -> Result<Vec<ShapeArtifact>, CodegenError> {
        let assembler = ShapeAssembler::new(self.emitter(), &self.schema.prefixes, catalog);
        let mut artifacts = Vec::with_capacity(shapes.len());
        for decl in shapes {
            if let Some(artifact) = assembler.assemble(decl)? {
                artifacts.push(artifact);
            }
        }
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shexgen_schema::types::XSD;
    use shexgen_schema::{
        NodeConstraint, NodeKind, PrefixMap, SchemaError, Shape, ShapeExpr, TripleConstraint,
        TripleExpr, ValueSetValue,
    };

    const EX: &str = "http://ex.org/";

    fn iri(local: &str) -> String {
        format!("{EX}{local}")
    }

    fn values(values: &[&str]) -> ShapeExpr {
        ShapeExpr::NodeConstraint(NodeConstraint::with_values(
            values.iter().map(|v| ValueSetValue::literal(*v)).collect(),
        ))
    }

    fn shape(local: &str, expression: TripleExpr) -> ShapeDecl {
        ShapeDecl::new(iri(local), ShapeExpr::Shape(Shape::new(expression)))
    }

    fn constraint(local: &str, value: Option<ShapeExpr>) -> TripleExpr {
        TripleExpr::TripleConstraint(TripleConstraint::new(iri(local), value))
    }

    fn schema(decls: Vec<ShapeDecl>) -> Schema {
        let prefixes: PrefixMap = [("ex", EX)].into_iter().collect();
        let mut schema = Schema::new(prefixes);
        for decl in decls {
            schema.add_shape(decl);
        }
        schema
    }

    fn issue_schema() -> Schema {
        let reporter = constraint(
            "reporter",
            Some(ShapeExpr::NodeConstraint(NodeConstraint::with_node_kind(NodeKind::Iri))),
        );
        let status = TripleExpr::TripleConstraint(
            TripleConstraint::new(iri("status"), Some(values(&["open", "closed"])))
                .with_cardinality(0, Some(1)),
        );
        schema(vec![shape("Issue", TripleExpr::EachOf(vec![reporter, status]))])
    }

    #[test]
    fn test_required_reference_and_optional_enum() {
        let schema = issue_schema();
        let output = Generator::new(&schema).generate().unwrap();

        assert_eq!(
            output,
            vec![
                "export enum StatusType {\n  Open = \"open\",\n  Closed = \"closed\"\n}".to_string(),
                "export type Issue = {\n  reporter: string | NamedNode;\n  status?: StatusType.Open | StatusType.Closed;\n};"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_predicate_values_are_merged() {
        let schema = schema(vec![shape(
            "Issue",
            TripleExpr::EachOf(vec![
                constraint("p", Some(values(&["a", "b"]))),
                constraint("p", Some(values(&["b", "c"]))),
            ]),
        )]);
        let output = Generator::new(&schema).generate().unwrap();

        assert_eq!(output[0], "export enum PType {\n  A = \"a\",\n  B = \"b\",\n  C = \"c\"\n}");
        assert_eq!(output[1].matches("p: ").count(), 1);
        assert!(output[1].contains("p: PType.A | PType.B | PType.C;"));
    }

    #[test]
    fn test_predicate_repeated_in_nested_sequence_is_emitted_once() {
        let schema = schema(vec![shape(
            "S",
            TripleExpr::EachOf(vec![
                constraint("p", Some(values(&["a"]))),
                TripleExpr::EachOf(vec![constraint("p", Some(values(&["b"])))]),
            ]),
        )]);
        let output = Generator::new(&schema).generate().unwrap();

        assert_eq!(
            output,
            vec![
                "export enum PType {\n  A = \"a\",\n  B = \"b\"\n}".to_string(),
                "export type S = {\n  p: PType.A | PType.B;\n};".to_string(),
            ]
        );
    }

    /// Fails if a property name occurs twice in the same object literal.
    fn assert_fields_unique_per_object(text: &str) {
        let mut open: Vec<Vec<String>> = vec![Vec::new()];
        for line in text.lines() {
            let trimmed = line.trim_start();
            let name: String = trimmed
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            let rest = &trimmed[name.len()..];
            if !name.is_empty() && (rest.starts_with(": ") || rest.starts_with("?: ")) {
                let fields = open.last_mut().expect("enclosing object");
                assert!(!fields.contains(&name), "'{name}' repeated in:\n{text}");
                fields.push(name);
            }
            for c in line.chars() {
                match c {
                    '{' => open.push(Vec::new()),
                    '}' => {
                        open.pop();
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_predicates_unique_per_object_across_nestings() {
        let nest = |layers: &[bool], inner: TripleExpr| {
            layers.iter().rev().fold(inner, |acc, &sequence| {
                let children = vec![acc, constraint("r", None)];
                if sequence {
                    TripleExpr::EachOf(children)
                } else {
                    TripleExpr::OneOf(children)
                }
            })
        };

        let mut decls = Vec::new();
        let mut all_sequences = Vec::new();
        for depth in 1..=3_u32 {
            for bits in 0..(1_u32 << depth) {
                let layers: Vec<bool> = (0..depth).map(|i| bits & (1 << i) != 0).collect();
                let name = format!("Shape{depth}x{bits}");
                if layers.iter().all(|l| *l) {
                    all_sequences.push(format!("export type {name} = "));
                }
                decls.push(shape(
                    &name,
                    TripleExpr::EachOf(vec![
                        constraint("p", Some(values(&["a"]))),
                        constraint("r", None),
                        nest(&layers, constraint("p", Some(values(&["b"])))),
                    ]),
                ));
            }
        }
        let schema = schema(decls);
        let output = Generator::new(&schema).generate().unwrap();

        let declarations: Vec<&String> =
            output.iter().filter(|d| d.starts_with("export type")).collect();
        assert_eq!(declarations.len(), 14);
        for declaration in &declarations {
            assert_fields_unique_per_object(declaration);
        }
        for prefix in &all_sequences {
            let declaration = declarations
                .iter()
                .find(|d| d.starts_with(prefix.as_str()))
                .expect("declaration");
            assert_eq!(declaration.matches("p: ").count(), 1);
            assert!(declaration.contains("p: PType.A | PType.B;"));
        }
    }

    #[test]
    fn test_declaration_level_value_set_gets_own_enum() {
        let schema = schema(vec![
            shape("T", constraint("name", None)),
            ShapeDecl::new(
                iri("U"),
                ShapeExpr::ShapeOr(vec![values(&["x", "y"]), ShapeExpr::Ref(iri("T"))]),
            ),
        ]);
        let output = Generator::new(&schema).generate().unwrap();

        assert_eq!(output[0], "export enum UValue {\n  X = \"x\",\n  Y = \"y\"\n}");
        assert_eq!(output[2], "export type U = UValue.X | UValue.Y | T;");
        assert!(!output.iter().any(|d| d.starts_with("export enum U ")));
    }

    /// A choice nested in a sequence ends up in the intersection member, not
    /// among the sequence's own fields. Long-standing behavior, kept as is.
    #[test]
    fn test_nested_choice_folds_into_open_surface() {
        let string = || {
            Some(ShapeExpr::NodeConstraint(NodeConstraint::with_datatype(format!(
                "{XSD}string"
            ))))
        };
        let schema = schema(vec![shape(
            "Contact",
            TripleExpr::EachOf(vec![
                constraint("name", string()),
                TripleExpr::OneOf(vec![constraint("email", string()), constraint("phone", string())]),
            ]),
        )]);
        let output = Generator::new(&schema).generate().unwrap();

        assert_eq!(
            output,
            vec![
                "export type Contact = {\n  name: string | Literal;\n} & ({\n  email: string | Literal;\n} | {\n  phone: string | Literal;\n});"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_inline_enums_with_same_name_are_unioned() {
        let schema = schema(vec![
            shape("Task", constraint("status", Some(values(&["todo", "done"])))),
            shape("Bug", constraint("status", Some(values(&["open", "fixed"])))),
        ]);
        let output = Generator::new(&schema).generate().unwrap();

        let enums: Vec<&String> = output.iter().filter(|d| d.starts_with("export enum")).collect();
        assert_eq!(enums.len(), 1);
        assert_eq!(
            enums[0],
            "export enum StatusType {\n  Todo = \"todo\",\n  Done = \"done\",\n  Open = \"open\",\n  Fixed = \"fixed\"\n}"
        );
        assert!(output.contains(&"export type Bug = {\n  status: StatusType.Open | StatusType.Fixed;\n};".to_string()));
    }

    #[test]
    fn test_member_references_follow_merged_names() {
        let schema = schema(vec![
            shape(
                "A",
                constraint("kind", Some(ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
                    ValueSetValue::iri("http://one.org/Item"),
                ])))),
            ),
            shape(
                "B",
                constraint("kind", Some(ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
                    ValueSetValue::iri("http://two.org/Item"),
                ])))),
            ),
        ]);
        let output = Generator::new(&schema).generate().unwrap();

        assert_eq!(
            output[0],
            "export enum KindType {\n  OrgItem = \"http://one.org/Item\",\n  OrgItem_2 = \"http://two.org/Item\"\n}"
        );
        assert!(output[1].contains("kind: KindType.OrgItem;"));
        assert!(output[2].contains("kind: KindType.OrgItem_2;"));
    }

    #[test]
    fn test_enumeration_shapes_are_pruned_from_children() {
        let schema = schema(vec![
            ShapeDecl::new(iri("Color"), values(&["red", "green"])),
            shape("Car", constraint("color", Some(ShapeExpr::Ref(iri("Color"))))),
        ]);
        let generator = Generator::new(&schema);
        let output = generator.generate().unwrap();

        assert_eq!(output[0], "export enum Color {\n  Red = \"red\",\n  Green = \"green\"\n}");
        assert_eq!(output[1], "export type Car = {\n  color: Color;\n};");

        let artifacts = generator.artifacts().unwrap();
        assert_eq!(artifacts.len(), 1);
        assert!(artifacts[0].child_shapes.is_empty());
    }

    #[test]
    fn test_child_shapes_keep_structural_references() {
        let schema = schema(vec![
            shape("Person", constraint("name", None)),
            shape("Team", constraint("member", Some(ShapeExpr::Ref(iri("Person"))))),
        ]);
        let artifacts = Generator::new(&schema).artifacts().unwrap();
        assert!(artifacts[1].child_shapes.contains(&iri("Person")));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let schema = issue_schema();
        let first = Generator::new(&schema).generate_module().unwrap();
        let second = Generator::new(&schema).generate_module().unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("};\n"));
    }

    #[test]
    fn test_shape_module_style() {
        let schema = issue_schema();
        let output = Generator::new(&schema)
            .with_style(OutputStyle::ShapeModule)
            .generate()
            .unwrap();

        assert_eq!(output[0], "import { NamedNode, Literal } from \"rdflib\";");
        assert_eq!(output[1], "import { Shape } from \"shex-methods\";");
        assert_eq!(
            output[output.len() - 2],
            "export enum IssueContext {\n  reporter = \"ex:reporter\",\n  status = \"ex:status\"\n}"
        );
        assert_eq!(
            output.last().map(String::as_str),
            Some("export const issue = new Shape<Issue>({\n  id: \"http://ex.org/Issue\",\n  context: IssueContext,\n  childContexts: [],\n});")
        );
    }

    #[test]
    fn test_shape_module_exports_typed_shapes_with_children() {
        let mut schema = schema(vec![
            ShapeDecl::new(iri("Ext"), ShapeExpr::ShapeExternal),
            ShapeDecl::new(iri("Color"), values(&["red"])),
            shape("Address", constraint("city", None)),
            shape(
                "Person",
                TripleExpr::EachOf(vec![
                    TripleExpr::TripleConstraint(TripleConstraint::new(
                        RDF_TYPE,
                        Some(ShapeExpr::NodeConstraint(NodeConstraint::with_values(vec![
                            ValueSetValue::iri(iri("Person")),
                        ]))),
                    )),
                    constraint("home", Some(ShapeExpr::Ref(iri("Address")))),
                    constraint("knows", Some(ShapeExpr::Ref(iri("Person")))),
                    constraint("color", Some(ShapeExpr::Ref(iri("Color")))),
                    constraint("link", Some(ShapeExpr::Ref(iri("Ext")))),
                ]),
            ),
        ]);
        schema.prefixes.insert("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        let output = Generator::new(&schema)
            .with_style(OutputStyle::ShapeModule)
            .generate()
            .unwrap();

        assert!(output.contains(&"export enum PersonType {\n  Person = \"http://ex.org/Person\"\n}".to_string()));
        assert_eq!(
            output.last().map(String::as_str),
            Some("export const person = new Shape<Person>({\n  id: \"http://ex.org/Person\",\n  context: PersonContext,\n  type: PersonType,\n  childContexts: [AddressContext],\n});")
        );
        assert!(output.contains(
            &"export const address = new Shape<Address>({\n  id: \"http://ex.org/Address\",\n  context: AddressContext,\n  childContexts: [],\n});"
                .to_string()
        ));
    }

    #[test]
    fn test_type_declarations_emit_no_runtime_exports() {
        let output = Generator::new(&issue_schema()).generate().unwrap();
        assert!(output.iter().all(|d| !d.starts_with("import") && !d.starts_with("export const")));
    }

    #[test]
    fn test_custom_emitter() {
        struct Interfaces;

        impl Emitter for Interfaces {
            fn render_type_alias(&self, name: &str, body: &str) -> String {
                format!("export interface {name} {body}")
            }
        }

        let schema = schema(vec![shape("Person", constraint("name", None))]);
        let output = Generator::new(&schema).with_emitter(Interfaces).generate().unwrap();
        assert_eq!(output, vec!["export interface Person {\n  name: string;\n}".to_string()]);
    }

    #[test]
    fn test_validation_rejects_dangling_reference() {
        let schema = schema(vec![shape(
            "Team",
            constraint("member", Some(ShapeExpr::Ref(iri("Missing")))),
        )]);

        let err = Generator::new(&schema).generate().unwrap_err();
        assert!(matches!(
            err,
            CodegenError::Schema(SchemaError::UnresolvedReference { .. })
        ));

        let unchecked = GeneratorConfig {
            validate: false,
            ..GeneratorConfig::default()
        };
        let output = Generator::new(&schema).with_config(unchecked).generate().unwrap();
        assert_eq!(output, vec!["export type Team = {\n  member: Missing;\n};".to_string()]);
    }

    #[test]
    fn test_external_shapes_emit_nothing() {
        let schema = schema(vec![ShapeDecl::new(iri("Ext"), ShapeExpr::ShapeExternal)]);
        assert!(Generator::new(&schema).generate().unwrap().is_empty());
    }
}
