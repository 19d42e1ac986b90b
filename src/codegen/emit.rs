//! rust source emission
//!
//! renders one self-contained module per operation. output depends only on
//! the bound operation, its names and the config, so reruns are byte-identical.

use crate::codegen::bind::{
    BoundEnum, BoundField, BoundInputObject, BoundOperation, BoundType, Leaf, Shape, ShapeId,
    ShapeKind,
};
use crate::codegen::naming::Names;
use crate::codegen::settings::CodegenConfig;

/// generated source for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub operation: String,
    /// module identifier the unit is declared as
    pub module: String,
    pub file_name: String,
    pub source: String,
}

/// render the module for `bound`
pub fn emit(bound: &BoundOperation, names: &Names, config: &CodegenConfig) -> GeneratedUnit {
    let emitter = Emitter {
        bound,
        names,
        runtime: &config.runtime_crate,
        derives: response_derives(config),
    };

    let mut out = String::new();
    out.push_str(&format!(
        "// @generated by gqlbind from operation `{}`. do not edit.\n\n",
        bound.name
    ));
    out.push_str("#![allow(dead_code, unused_imports, non_camel_case_types, clippy::all)]\n\n");
    out.push_str("use serde::{Deserialize, Serialize};\n\n");

    emitter.render_constant(&mut out);
    emitter.render_marker(&mut out);
    emitter.render_function(&mut out);
    emitter.render_variables(&mut out);
    for (index, shape) in bound.shapes.iter().enumerate() {
        emitter.render_shape(&mut out, ShapeId(index), shape);
    }
    for bound_enum in &bound.enums {
        emitter.render_enum(&mut out, bound_enum);
    }
    for input in &bound.variables.input_objects {
        emitter.render_input(&mut out, input);
    }

    let source = format!("{}\n", out.trim_end());
    GeneratedUnit {
        operation: bound.name.clone(),
        module: names.module.clone(),
        file_name: format!("{}.rs", names.module.trim_start_matches("r#")),
        source,
    }
}

/// `mod.rs` declaring every unit
pub fn render_mod(units: &[GeneratedUnit]) -> String {
    let mut out = String::new();
    out.push_str("// @generated by gqlbind. do not edit.\n\n");
    for unit in units {
        out.push_str(&format!("pub mod {};\n", unit.module));
    }
    out
}

fn response_derives(config: &CodegenConfig) -> String {
    let mut derives: Vec<&str> = config.response_derives.iter().map(String::as_str).collect();
    derives.extend(["Serialize", "Deserialize"]);
    derives.join(", ")
}

struct Emitter<'a> {
    bound: &'a BoundOperation,
    names: &'a Names,
    runtime: &'a str,
    derives: String,
}

impl Emitter<'_> {
    fn render_constant(&self, out: &mut String) {
        out.push_str(&format!(
            "/// verbatim text of `{}`, sent as the request's `query`\n",
            self.bound.name
        ));
        out.push_str(&format!(
            "pub const {}: &str = {};\n\n",
            self.names.constant,
            string_literal(&self.bound.text)
        ));
    }

    fn render_marker(&self, out: &mut String) {
        let names = self.names;
        out.push_str(&format!("/// `{}` {}\n", self.bound.name, self.bound.kind));
        out.push_str(&format!("pub struct {};\n\n", names.marker));
        out.push_str(&format!(
            "impl {}::Operation for {} {{\n",
            self.runtime, names.marker
        ));
        out.push_str(&format!(
            "    const NAME: &'static str = \"{}\";\n",
            self.bound.name
        ));
        out.push_str(&format!(
            "    const QUERY: &'static str = {};\n",
            names.constant
        ));
        out.push_str(&format!("    type Variables = {};\n", names.variables));
        out.push_str(&format!("    type Response = {};\n", names.response));
        out.push_str("}\n\n");
    }

    fn render_function(&self, out: &mut String) {
        let names = self.names;
        let variables = &self.bound.variables.variables;

        out.push_str(&format!(
            "/// send the `{}` {} through `client`\n",
            self.bound.name, self.bound.kind
        ));
        out.push_str("///\n");
        out.push_str("/// returns whatever data arrived alongside the transport's result.\n");
        out.push_str(&format!(
            "pub fn {}<C: {}::Client>(\n",
            names.function, self.runtime
        ));
        out.push_str("    client: C,\n");
        for (variable, param) in variables.iter().zip(&names.params) {
            out.push_str(&format!("    {}: {},\n", param, self.rust_type(&variable.ty)));
        }
        out.push_str(&format!(
            ") -> (Option<{}>, Result<(), C::Error>) {{\n",
            names.response
        ));

        let carrier = if variables.is_empty() {
            format!("None::<{}>", names.variables)
        } else {
            format!("Some({} {{ {} }})", names.variables, names.params.join(", "))
        };
        out.push_str(&format!("    let request = {}::Request {{\n", self.runtime));
        out.push_str(&format!("        operation_name: \"{}\",\n", self.bound.name));
        out.push_str(&format!("        query: {},\n", names.constant));
        out.push_str(&format!("        variables: {carrier},\n"));
        out.push_str("    };\n");
        out.push_str(&format!(
            "    let mut response = {}::Response::<{}>::default();\n",
            self.runtime, names.response
        ));
        out.push_str("    let result = client.make_request(None, &request, &mut response);\n");
        out.push_str("    (response.data, result)\n");
        out.push_str("}\n\n");
    }

    fn render_variables(&self, out: &mut String) {
        let names = self.names;
        let variables = &self.bound.variables.variables;

        out.push_str(&format!("/// variables of `{}`\n", self.bound.name));
        out.push_str("#[derive(Debug, Clone, Serialize)]\n");
        if variables.is_empty() {
            out.push_str(&format!("pub struct {} {{}}\n\n", names.variables));
            return;
        }

        out.push_str(&format!("pub struct {} {{\n", names.variables));
        for (variable, ident) in variables.iter().zip(&names.params) {
            let mut attrs = Vec::new();
            if raw(ident) != variable.name {
                attrs.push(format!("rename = \"{}\"", variable.name));
            }
            if variable.has_default && variable.ty.is_nullable() {
                attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
            }
            push_serde(out, "    ", &attrs);
            out.push_str(&format!("    {}: {},\n", ident, self.rust_type(&variable.ty)));
        }
        out.push_str("}\n\n");

        out.push_str(&format!("impl {} {{\n", names.variables));
        for (index, (variable, ident)) in variables.iter().zip(&names.params).enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let (ret, body) = accessor(&self.rust_type_inner(&variable.ty), &variable.ty, ident);
            out.push_str(&format!("    pub fn {ident}(&self) -> {ret} {{\n"));
            out.push_str(&format!("        {body}\n"));
            out.push_str("    }\n");
        }
        out.push_str("}\n\n");
    }

    fn render_shape(&self, out: &mut String, id: ShapeId, shape: &Shape) {
        match (shape.kind, shape.variant_of) {
            (ShapeKind::Abstract, _) => self.render_abstract(out, id, shape),
            (ShapeKind::Object, Some(parent)) => self.render_variant(out, id, shape, parent),
            (ShapeKind::Object, None) => {
                self.render_struct(out, id, shape, false);
                self.render_accessors(out, id, shape, false);
            }
        }
    }

    fn render_struct(&self, out: &mut String, id: ShapeId, shape: &Shape, variant: bool) {
        let name = self.names.shape(id);
        push_doc(out, "", shape.description.as_deref());
        out.push_str(&format!("#[derive({})]\n", self.derives));
        out.push_str(&format!("pub struct {name} {{\n"));
        for (index, field) in shape.fields.iter().enumerate() {
            if variant && is_tag(field) {
                continue;
            }
            let ident = self.names.field(id, index);
            let mut attrs = Vec::new();
            if raw(ident) != field.output_key {
                attrs.push(format!("rename = \"{}\"", field.output_key));
            }
            if field.conditional {
                attrs.push("default".to_string());
            }
            push_doc(out, "    ", field.description.as_deref());
            push_serde(out, "    ", &attrs);
            out.push_str(&format!("    pub {}: {},\n", ident, self.rust_type(&field.ty)));
        }
        out.push_str("}\n\n");
    }

    fn render_accessors(&self, out: &mut String, id: ShapeId, shape: &Shape, variant: bool) {
        let name = self.names.shape(id);
        out.push_str(&format!("impl {name} {{\n"));
        for (index, field) in shape.fields.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let ident = self.names.field(id, index);
            push_doc(out, "    ", field.description.as_deref());
            let (ret, body) = if variant && is_tag(field) {
                ("&'static str".to_string(), format!("\"{}\"", shape.graphql_type))
            } else {
                accessor(&self.rust_type_inner(&field.ty), &field.ty, ident)
            };
            out.push_str(&format!("    pub fn {ident}(&self) -> {ret} {{\n"));
            out.push_str(&format!("        {body}\n"));
            out.push_str("    }\n");
        }
        out.push_str("}\n\n");
    }

    fn render_abstract(&self, out: &mut String, id: ShapeId, shape: &Shape) {
        let name = self.names.shape(id);
        let fields_trait = self.names.fields_trait(id);

        push_doc(out, "", shape.description.as_deref());
        out.push_str(&format!("#[derive({})]\n", self.derives));
        out.push_str("#[serde(tag = \"__typename\")]\n");
        out.push_str(&format!("pub enum {name} {{\n"));
        for (index, variant) in shape.variants.iter().enumerate() {
            let ident = self.names.variant(id, index);
            if ident != variant.type_name {
                out.push_str(&format!("    #[serde(rename = \"{}\")]\n", variant.type_name));
            }
            out.push_str(&format!("    {}({}),\n", ident, self.names.shape(variant.shape)));
        }
        out.push_str("}\n\n");

        out.push_str(&format!(
            "/// fields shared by every `{}` variant of `{name}`\n",
            shape.graphql_type
        ));
        out.push_str(&format!("pub trait {fields_trait} {{\n"));
        for (index, field) in shape.fields.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            push_doc(out, "    ", field.description.as_deref());
            out.push_str(&format!(
                "    fn {}(&self) -> {};\n",
                self.names.field(id, index),
                self.trait_return(field)
            ));
        }
        out.push_str("}\n\n");

        out.push_str(&format!("impl {fields_trait} for {name} {{\n"));
        for (index, field) in shape.fields.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let ident = self.names.field(id, index);
            out.push_str(&format!(
                "    fn {ident}(&self) -> {} {{\n",
                self.trait_return(field)
            ));
            out.push_str("        match self {\n");
            for (variant_index, _) in shape.variants.iter().enumerate() {
                out.push_str(&format!(
                    "            {name}::{}(value) => value.{ident}(),\n",
                    self.names.variant(id, variant_index)
                ));
            }
            out.push_str("        }\n");
            out.push_str("    }\n");
        }
        out.push_str("}\n\n");
    }

    fn render_variant(&self, out: &mut String, id: ShapeId, shape: &Shape, parent: ShapeId) {
        self.render_struct(out, id, shape, true);
        self.render_accessors(out, id, shape, true);

        let parent_shape = self.bound.shape(parent);
        let name = self.names.shape(id);
        out.push_str(&format!(
            "impl {} for {name} {{\n",
            self.names.fields_trait(parent)
        ));
        for (index, field) in parent_shape.fields.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let ident = self.names.field(parent, index);
            out.push_str(&format!(
                "    fn {ident}(&self) -> {} {{\n",
                self.trait_return(field)
            ));
            out.push_str(&format!("        {name}::{ident}(self)\n"));
            out.push_str("    }\n");
        }
        out.push_str("}\n\n");
    }

    fn trait_return(&self, field: &BoundField) -> String {
        if is_tag(field) {
            "&'static str".to_string()
        } else {
            accessor(&self.rust_type_inner(&field.ty), &field.ty, "").0
        }
    }

    fn render_enum(&self, out: &mut String, bound_enum: &BoundEnum) {
        push_doc(out, "", bound_enum.description.as_deref());
        out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n");
        out.push_str(&format!(
            "pub enum {} {{\n",
            self.names.schema_type(&bound_enum.name)
        ));
        for (index, value) in bound_enum.values.iter().enumerate() {
            let ident = self.names.enum_value(&bound_enum.name, index);
            push_doc(out, "    ", value.description.as_deref());
            if ident != value.name {
                out.push_str(&format!("    #[serde(rename = \"{}\")]\n", value.name));
            }
            out.push_str(&format!("    {ident},\n"));
        }
        out.push_str("}\n\n");
    }

    fn render_input(&self, out: &mut String, input: &BoundInputObject) {
        push_doc(out, "", input.description.as_deref());
        out.push_str("#[derive(Debug, Clone, Serialize)]\n");
        out.push_str(&format!(
            "pub struct {} {{\n",
            self.names.schema_type(&input.name)
        ));
        for (index, field) in input.fields.iter().enumerate() {
            let ident = self.names.input_field(&input.name, index);
            let mut attrs = Vec::new();
            if raw(ident) != field.name {
                attrs.push(format!("rename = \"{}\"", field.name));
            }
            if field.has_default && field.ty.is_nullable() {
                attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
            }
            push_doc(out, "    ", field.description.as_deref());
            push_serde(out, "    ", &attrs);
            out.push_str(&format!(
                "    pub {}: {},\n",
                ident,
                self.input_type(&field.ty, field.boxed)
            ));
        }
        out.push_str("}\n\n");
    }

    fn rust_type(&self, ty: &BoundType) -> String {
        match ty {
            BoundType::Leaf(leaf) => self.leaf_type(leaf),
            BoundType::Shape(id) => self.names.shape(*id).to_string(),
            BoundType::List(inner) => format!("Vec<{}>", self.rust_type(inner)),
            BoundType::Nullable(inner) => format!("Option<{}>", self.rust_type(inner)),
        }
    }

    /// type behind one level of nullability
    fn rust_type_inner(&self, ty: &BoundType) -> String {
        match ty {
            BoundType::Nullable(inner) => self.rust_type(inner),
            other => self.rust_type(other),
        }
    }

    fn input_type(&self, ty: &BoundType, boxed: bool) -> String {
        match ty {
            BoundType::Nullable(inner) => format!("Option<{}>", self.input_type(inner, boxed)),
            BoundType::Leaf(leaf) if boxed => format!("Box<{}>", self.leaf_type(leaf)),
            other => self.rust_type(other),
        }
    }

    fn leaf_type(&self, leaf: &Leaf) -> String {
        match leaf {
            Leaf::String => "String".to_string(),
            Leaf::Int => "i64".to_string(),
            Leaf::Float => "f64".to_string(),
            Leaf::Boolean => "bool".to_string(),
            Leaf::Custom { rust, .. } => rust.clone(),
            Leaf::Enum(name) | Leaf::InputObject(name) => self.names.schema_type(name).to_string(),
        }
    }
}

/// return type and body of an accessor for a field of type `ty`
fn accessor(inner: &str, ty: &BoundType, ident: &str) -> (String, String) {
    if ty.is_nullable() {
        (format!("Option<&{inner}>"), format!("self.{ident}.as_ref()"))
    } else {
        (format!("&{inner}"), format!("&self.{ident}"))
    }
}

/// the `__typename` key consumed by the enum tag
fn is_tag(field: &BoundField) -> bool {
    field.output_key == "__typename" && field.is_typename()
}

fn raw(ident: &str) -> &str {
    ident.trim_start_matches("r#")
}

fn push_serde(out: &mut String, indent: &str, attrs: &[String]) {
    if !attrs.is_empty() {
        out.push_str(&format!("{indent}#[serde({})]\n", attrs.join(", ")));
    }
}

fn push_doc(out: &mut String, indent: &str, text: Option<&str>) {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return;
    };
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            out.push_str(&format!("{indent}///\n"));
        } else {
            out.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}

/// rust literal for `text`. raw strings read `\r\n` back as `\n`, so text
/// holding a carriage return is escaped instead.
fn string_literal(text: &str) -> String {
    if text.contains('\r') {
        format!("{text:?}")
    } else {
        let hashes = "#".repeat(raw_string_hashes(text));
        format!("r{hashes}\"{text}\"{hashes}")
    }
}

/// number of `#` a raw string literal needs to hold `text`
fn raw_string_hashes(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut longest = 0;
    for (idx, byte) in bytes.iter().enumerate() {
        if *byte == b'"' {
            let run = bytes[idx + 1..].iter().take_while(|b| **b == b'#').count();
            longest = longest.max(run + 1);
        }
    }
    longest.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::bind::bind;
    use crate::codegen::document::OperationSet;
    use crate::codegen::naming::assign_names;
    use crate::codegen::schema::Schema;

    const SDL: &str = r#"
        "A User is a user!"
        type User implements Node {
            "id is the user's ID."
            id: ID!
            name: String
            role: Role
            type: String
        }
        type Bot implements Node { id: ID! }
        interface Node { id: ID! }
        "Access level."
        enum Role { ADMIN MEMBER }
        input UserQueryInput { names: [String] parent: UserQueryInput limit: Int = 10 }
        type Query {
            user(query: UserQueryInput): User
            node(id: ID): Node
        }
    "#;

    fn generate(text: &str) -> GeneratedUnit {
        generate_with(text, &CodegenConfig::default())
    }

    fn generate_with(text: &str, config: &CodegenConfig) -> GeneratedUnit {
        let schema = Schema::parse(SDL).unwrap();
        let set = OperationSet::parse(text).unwrap();
        let op = &set.operations()[0];
        let bound = bind(&schema, &set, op, config).unwrap();
        let names = assign_names(&op.name, &bound).unwrap();
        emit(&bound, &names, config)
    }

    const LIST_INPUT: &str =
        "query ListInputQuery($names: [String]) {\n  user(query: {names: $names}) {\n    id\n  }\n}";

    #[test]
    fn test_list_input_query_unit() {
        let unit = generate(LIST_INPUT);
        assert_eq!(unit.operation, "ListInputQuery");
        assert_eq!(unit.file_name, "list_input_query.rs");
        let source = &unit.source;

        assert!(source.starts_with("// @generated by gqlbind"));
        assert!(source.contains(&format!(
            "pub const LIST_INPUT_QUERY_OPERATION: &str = r#\"{LIST_INPUT}\"#;\n"
        )));
        assert!(source.contains("pub struct ListInputQuery;\n"));
        assert!(source.contains("impl gqlbind::Operation for ListInputQuery {\n"));
        assert!(source.contains(
            "pub fn list_input_query<C: gqlbind::Client>(\n    client: C,\n    names: Option<Vec<Option<String>>>,\n) -> (Option<ListInputQueryResponse>, Result<(), C::Error>) {\n"
        ));
        assert!(source.contains("        variables: Some(ListInputQueryVariables { names }),\n"));
        assert!(source.contains(
            "    let result = client.make_request(None, &request, &mut response);\n    (response.data, result)\n"
        ));
        assert!(source.contains(
            "pub struct ListInputQueryVariables {\n    names: Option<Vec<Option<String>>>,\n}\n"
        ));
        assert!(source.contains(
            "pub struct ListInputQueryResponse {\n    pub user: Option<ListInputQueryUser>,\n}\n"
        ));
        assert!(source.contains(
            "/// A User is a user!\n#[derive(Debug, Clone, Serialize, Deserialize)]\npub struct ListInputQueryUser {\n    /// id is the user's ID.\n    pub id: String,\n}\n"
        ));
        assert!(source.contains("    pub fn id(&self) -> &String {\n        &self.id\n    }\n"));
        assert!(source.contains(
            "    pub fn user(&self) -> Option<&ListInputQueryUser> {\n        self.user.as_ref()\n    }\n"
        ));
    }

    #[test]
    fn test_emission_is_deterministic() {
        let text = "query Q($q: UserQueryInput) { node { __typename id ... on User { name role } } user(query: $q) { type } }";
        assert_eq!(generate(text), generate(text));
    }

    #[test]
    fn test_alias_is_serde_key() {
        let unit = generate("query Q { me: user { userName: name } }");
        assert!(unit.source.contains("    pub me: Option<QMe>,\n"));
        assert!(unit.source.contains("    #[serde(rename = \"userName\")]\n    pub user_name: Option<String>,\n"));
        assert!(unit.source.contains("me: user { userName: name }"));
    }

    #[test]
    fn test_abstract_shape() {
        let unit = generate("query Q { node { __typename id ... on User { name } } }");
        let source = &unit.source;
        assert!(source.contains(
            "#[serde(tag = \"__typename\")]\npub enum QNode {\n    User(QNodeUser),\n    Bot(QNodeBot),\n}\n"
        ));
        assert!(source.contains(
            "pub trait QNodeFields {\n    fn typename(&self) -> &'static str;\n\n    fn id(&self) -> &String;\n}\n"
        ));
        assert!(source.contains("            QNode::Bot(value) => value.id(),\n"));
        assert!(source.contains("pub struct QNodeBot {\n    pub id: String,\n}\n"));
        assert!(source.contains("    pub fn typename(&self) -> &'static str {\n        \"User\"\n    }\n"));
        assert!(source.contains("impl QNodeFields for QNodeUser {\n"));
        assert!(source.contains("        QNodeUser::typename(self)\n"));
        assert!(!source.contains("pub typename"));
    }

    #[test]
    fn test_enums_inputs_and_defaults() {
        let unit = generate(
            "query Q($q: UserQueryInput, $limit: Int = 5) { user(query: $q) { role type } }",
        );
        let source = &unit.source;
        assert!(source.contains(
            "/// Access level.\n#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\npub enum Role {\n    #[serde(rename = \"ADMIN\")]\n    Admin,\n"
        ));
        assert!(source.contains("    pub parent: Option<Box<UserQueryInput>>,\n"));
        assert!(source.contains(
            "    #[serde(skip_serializing_if = \"Option::is_none\")]\n    pub limit: Option<i64>,\n"
        ));
        assert!(source.contains(
            "    #[serde(skip_serializing_if = \"Option::is_none\")]\n    limit: Option<i64>,\n"
        ));
        assert!(source.contains("    pub role: Option<Role>,\n    pub r#type: Option<String>,\n"));
        assert!(source.contains("    pub fn r#type(&self) -> Option<&String> {\n"));
    }

    #[test]
    fn test_no_variables() {
        let unit = generate("query Q { user { id } }");
        assert!(unit.source.contains("pub struct QVariables {}\n"));
        assert!(unit.source.contains("        variables: None::<QVariables>,\n"));
        assert!(unit.source.contains("pub fn q<C: gqlbind::Client>(\n    client: C,\n) ->"));
    }

    #[test]
    fn test_conditional_field_defaults() {
        let unit = generate("query Q($on: Boolean!) { user { id @include(if: $on) } }");
        assert!(unit.source.contains("    #[serde(default)]\n    pub id: Option<String>,\n"));
    }

    #[test]
    fn test_config_controls_runtime_and_derives() {
        let config = CodegenConfig::default()
            .with_runtime_crate("crate::runtime")
            .with_response_derives(vec!["Debug".to_string(), "PartialEq".to_string()]);
        let unit = generate_with("query Q { user { id } }", &config);
        assert!(unit.source.contains("pub fn q<C: crate::runtime::Client>("));
        assert!(unit.source.contains("impl crate::runtime::Operation for Q {"));
        assert!(unit.source.contains("#[derive(Debug, PartialEq, Serialize, Deserialize)]\npub struct QUser {"));
    }

    #[test]
    fn test_carriage_returns_survive_in_the_constant() {
        let text = "query Q {\r\n  user {\r\n    id\r\n  }\r\n}";
        let unit = generate(&format!("{text}\r\n"));
        assert!(unit.source.contains(
            "pub const Q_OPERATION: &str = \"query Q {\\r\\n  user {\\r\\n    id\\r\\n  }\\r\\n}\";\n"
        ));
        assert!(!unit.source.contains('\r'));
        assert_eq!(string_literal("a(b: \"c\")\r\n"), "\"a(b: \\\"c\\\")\\r\\n\"");
        assert_eq!(string_literal("a(b: \"c\")\n"), "r#\"a(b: \"c\")\n\"#");
    }

    #[test]
    fn test_prelude_named_schema_types() {
        let sdl = "enum Result { OK FAILED } input Vec { status: Result } \
                   type User { status: Result } type Query { user(filter: Vec): User }";
        let schema = Schema::parse(sdl).unwrap();
        let set =
            OperationSet::parse("query Q($filter: Vec) { user(filter: $filter) { status } }").unwrap();
        let op = &set.operations()[0];
        let config = CodegenConfig::default();
        let bound = bind(&schema, &set, op, &config).unwrap();
        let names = assign_names(&op.name, &bound).unwrap();
        let source = emit(&bound, &names, &config).source;

        assert!(source.contains("pub enum ResultType {\n    #[serde(rename = \"OK\")]\n    Ok,\n"));
        assert!(source.contains("pub struct VecType {\n    pub status: Option<ResultType>,\n}\n"));
        assert!(source.contains("    pub status: Option<ResultType>,\n}\n\nimpl QUser {"));
        assert!(source.contains("    filter: Option<VecType>,\n) -> (Option<QResponse>, Result<(), C::Error>) {\n"));
        assert!(!source.contains("pub enum Result "));
        assert!(!source.contains("pub struct Vec "));
    }

    #[test]
    fn test_raw_string_hashes() {
        assert_eq!(raw_string_hashes("query Q { a }"), 1);
        assert_eq!(raw_string_hashes("query Q { a(b: \"c\") }"), 1);
        assert_eq!(raw_string_hashes("query Q { a(b: \"c\"#) }"), 2);
        assert_eq!(raw_string_hashes("\"##"), 3);
    }

    #[test]
    fn test_render_mod() {
        let unit = generate("query Q { user { id } }");
        assert_eq!(
            render_mod(&[unit]),
            "// @generated by gqlbind. do not edit.\n\npub mod q;\n"
        );
    }
}
