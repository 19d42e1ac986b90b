//! identifier assignment
//!
//! every shape gets `{Operation}{PathSegment...}`, every field a snake_case
//! accessor. nothing is renamed to dodge a clash: two sources producing the
//! same identifier is a [`BindError::NameCollision`].

use crate::codegen::bind::{BoundOperation, ShapeId, ShapeKind};
use crate::codegen::error::BindError;
use std::collections::HashMap;

/// identifiers for one bound operation
#[derive(Debug, Clone, PartialEq)]
pub struct Names {
    /// operation marker type
    pub marker: String,
    /// response root type
    pub response: String,
    /// variables carrier type
    pub variables: String,
    /// top-level function
    pub function: String,
    /// constant holding the operation text
    pub constant: String,
    /// module the unit is declared as; the file stem drops any `r#`
    pub module: String,
    /// function parameter per variable, in declaration order
    pub params: Vec<String>,
    shapes: Vec<String>,
    fields: Vec<Vec<String>>,
    variants: Vec<Vec<String>>,
    types: HashMap<String, String>,
    input_fields: HashMap<String, Vec<String>>,
    enum_values: HashMap<String, Vec<String>>,
}

impl Names {
    /// type name of shape `id`
    pub fn shape(&self, id: ShapeId) -> &str {
        &self.shapes[id.0]
    }

    /// accessor of field `index` of shape `id`
    pub fn field(&self, id: ShapeId, index: usize) -> &str {
        &self.fields[id.0][index]
    }

    /// enum variant of variant `index` of abstract shape `id`
    pub fn variant(&self, id: ShapeId, index: usize) -> &str {
        &self.variants[id.0][index]
    }

    /// capability trait implemented by the variants of abstract shape `id`
    pub fn fields_trait(&self, id: ShapeId) -> String {
        format!("{}Fields", self.shape(id))
    }

    /// rust type declared for the schema enum or input object `name`
    pub fn schema_type<'a>(&'a self, name: &'a str) -> &'a str {
        self.types.get(name).map(String::as_str).unwrap_or(name)
    }

    /// rust field of input object `input`
    pub fn input_field(&self, input: &str, index: usize) -> &str {
        &self.input_fields[input][index]
    }

    /// rust variant of enum value `index` of `name`
    pub fn enum_value(&self, name: &str, index: usize) -> &str {
        &self.enum_values[name][index]
    }
}

/// tracks which source claimed each identifier in one namespace
#[derive(Default)]
struct Namespace {
    claimed: HashMap<String, String>,
}

impl Namespace {
    fn claim(&mut self, name: &str, source: String) -> Result<(), BindError> {
        match self.claimed.get(name) {
            Some(first) => Err(BindError::NameCollision {
                name: name.to_string(),
                first: first.clone(),
                second: source,
            }),
            None => {
                self.claimed.insert(name.to_string(), source);
                Ok(())
            }
        }
    }
}

/// assign identifiers to every shape, field and variable of `bound`
pub fn assign_names(operation_name: &str, bound: &BoundOperation) -> Result<Names, BindError> {
    let prefix = type_ident(operation_name);
    let mut types = Namespace::default();

    let marker = escape_type(prefix.clone());
    types.claim(&marker, "the operation marker".to_string())?;
    let variables = format!("{prefix}Variables");
    types.claim(&variables, "the variables carrier".to_string())?;

    let mut shapes = Vec::with_capacity(bound.shapes.len());
    let mut fields = Vec::with_capacity(bound.shapes.len());
    let mut variants = Vec::with_capacity(bound.shapes.len());
    for (index, shape) in bound.shapes.iter().enumerate() {
        let id = ShapeId(index);
        let name = if id == bound.root {
            format!("{prefix}Response")
        } else {
            let segments: String = shape.path.iter().map(|segment| to_pascal(segment)).collect();
            format!("{prefix}{segments}")
        };
        let source = if id == bound.root {
            "the response root".to_string()
        } else {
            format!("selection `{}`", shape.path.join("."))
        };
        let name = escape_type(name);
        types.claim(&name, source.clone())?;
        if shape.kind == ShapeKind::Abstract {
            types.claim(&format!("{name}Fields"), format!("the fields trait of {source}"))?;
        }

        let mut accessors = Namespace::default();
        let mut shape_fields = Vec::with_capacity(shape.fields.len());
        for field in &shape.fields {
            let ident = to_rust_field(&field.output_key);
            accessors.claim(&ident, format!("field `{}` of {source}", field.output_key))?;
            shape_fields.push(ident);
        }

        let mut members = Namespace::default();
        let mut shape_variants = Vec::with_capacity(shape.variants.len());
        for variant in &shape.variants {
            let ident = escape_member(type_ident(&variant.type_name));
            members.claim(&ident, format!("variant `{}` of {source}", variant.type_name))?;
            shape_variants.push(ident);
        }

        shapes.push(name);
        fields.push(shape_fields);
        variants.push(shape_variants);
    }

    let mut schema_types = HashMap::new();
    let mut input_fields = HashMap::new();
    for input in &bound.variables.input_objects {
        let name = escape_type(input.name.clone());
        types.claim(&name, format!("input object `{}`", input.name))?;
        schema_types.insert(input.name.clone(), name);
        let mut members = Namespace::default();
        let mut idents = Vec::with_capacity(input.fields.len());
        for field in &input.fields {
            let ident = to_rust_field(&field.name);
            members.claim(&ident, format!("field `{}` of input `{}`", field.name, input.name))?;
            idents.push(ident);
        }
        input_fields.insert(input.name.clone(), idents);
    }

    let mut enum_values = HashMap::new();
    for bound_enum in &bound.enums {
        let name = escape_type(bound_enum.name.clone());
        types.claim(&name, format!("enum `{}`", bound_enum.name))?;
        schema_types.insert(bound_enum.name.clone(), name);
        let mut members = Namespace::default();
        let mut idents = Vec::with_capacity(bound_enum.values.len());
        for value in &bound_enum.values {
            let ident = escape_member(type_ident(&value.name));
            members.claim(&ident, format!("value `{}` of enum `{}`", value.name, bound_enum.name))?;
            idents.push(ident);
        }
        enum_values.insert(bound_enum.name.clone(), idents);
    }

    let mut locals = Namespace::default();
    locals.claim("client", "the client parameter".to_string())?;
    let mut params = Vec::with_capacity(bound.variables.variables.len());
    for variable in &bound.variables.variables {
        let ident = to_rust_field(&variable.name);
        locals.claim(&ident, format!("variable `${}`", variable.name))?;
        params.push(ident);
    }

    let function = escape_value(to_snake(operation_name));
    Ok(Names {
        response: shapes[bound.root.0].clone(),
        marker,
        variables,
        constant: format!("{}_OPERATION", function.trim_start_matches("r#").to_uppercase()),
        module: function.clone(),
        function,
        params,
        shapes,
        fields,
        variants,
        types: schema_types,
        input_fields,
        enum_values,
    })
}

/// `list_users` / `LIST_USERS` / `listUsers` -> `ListUsers`
pub fn to_pascal(name: &str) -> String {
    let shouting = !name.chars().any(|ch| ch.is_lowercase());
    let mut out = String::new();
    let mut upper = true;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            upper = true;
            continue;
        }
        if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else if shouting {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `createdAt` -> `created_at`, `userID` -> `user_id`, `HTMLUrl` -> `html_url`
pub fn to_snake(name: &str) -> String {
    let chars: Vec<char> = name.trim_start_matches('_').chars().collect();
    let mut out = String::new();
    for (idx, ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = idx.checked_sub(1).map(|i| chars[i]);
            let next = chars.get(idx + 1);
            let boundary = match prev {
                Some(prev) if prev == '_' => false,
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_uppercase() => next.is_some_and(|next| next.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else if *ch == '-' {
            out.push('_');
        } else {
            out.push(*ch);
        }
    }
    if out.is_empty() {
        out.push_str("field");
    }
    out
}

/// PascalCase identifier that starts with a letter: `_1` -> `V1`
fn type_ident(name: &str) -> String {
    let ident = to_pascal(name);
    match ident.chars().next() {
        Some(first) if !first.is_ascii_digit() => ident,
        _ => format!("V{ident}"),
    }
}

/// snake_case identifier usable as a field, method or parameter
pub fn to_rust_field(name: &str) -> String {
    escape_value(to_snake(name))
}

fn escape_value(ident: String) -> String {
    match ident.as_str() {
        "self" | "super" | "crate" | "Self" => format!("{ident}_"),
        _ if ident.starts_with(|ch: char| ch.is_ascii_digit()) => format!("_{ident}"),
        _ if is_rust_keyword(&ident) => format!("r#{ident}"),
        _ => ident,
    }
}

/// keeps a declared type from shadowing a name generated code refers to
fn escape_type(ident: String) -> String {
    match ident.as_str() {
        "_" | "self" | "Self" | "super" | "crate" => format!("{ident}Type"),
        _ if is_shadowable(&ident) => format!("{ident}Type"),
        _ if is_rust_keyword(&ident) => format!("r#{ident}"),
        _ => ident,
    }
}

/// enum variants live in their enum's namespace; only `Self` is off limits
fn escape_member(ident: String) -> String {
    if ident == "Self" {
        "SelfType".to_string()
    } else {
        ident
    }
}

/// names emitted bare in every generated module
fn is_shadowable(name: &str) -> bool {
    matches!(
        name,
        "Option"
            | "Some"
            | "None"
            | "Result"
            | "Ok"
            | "Err"
            | "Vec"
            | "Box"
            | "String"
            | "str"
            | "bool"
            | "i64"
            | "f64"
            | "C"
            | "serde"
            | "Serialize"
            | "Deserialize"
    )
}

fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "break"
            | "const"
            | "continue"
            | "crate"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "async"
            | "await"
            | "dyn"
            | "abstract"
            | "become"
            | "box"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "try"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::bind::bind;
    use crate::codegen::document::OperationSet;
    use crate::codegen::schema::Schema;
    use crate::codegen::settings::CodegenConfig;

    const SDL: &str = r#"
        type User implements Node { id: ID! name: String type: String self: User userID: ID }
        type Bot implements Node { id: ID! }
        interface Node { id: ID! }
        enum Status { IN_PROGRESS DONE }
        input Filter { type: String status: Status }
        type Query {
            user(filter: Filter): User
            node: Node
            response: User
        }
    "#;

    fn names(text: &str) -> Result<Names, BindError> {
        let schema = Schema::parse(SDL).unwrap();
        let set = OperationSet::parse(text).unwrap();
        let op = &set.operations()[0];
        let bound = bind(&schema, &set, op, &CodegenConfig::default())?;
        assign_names(&op.name, &bound)
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_pascal("listInput"), "ListInput");
        assert_eq!(to_pascal("list_input"), "ListInput");
        assert_eq!(to_pascal("IN_PROGRESS"), "InProgress");
        assert_eq!(to_pascal("User"), "User");
        assert_eq!(to_snake("createdAt"), "created_at");
        assert_eq!(to_snake("userID"), "user_id");
        assert_eq!(to_snake("HTMLUrl"), "html_url");
        assert_eq!(to_snake("ListInputQuery"), "list_input_query");
        assert_eq!(to_snake("__typename"), "typename");
        assert_eq!(to_snake("field_1"), "field_1");
        assert_eq!(to_rust_field("type"), "r#type");
        assert_eq!(to_rust_field("self"), "self_");
        assert_eq!(to_rust_field("Self"), "self_");
        assert_eq!(to_rust_field("_1"), "_1");
        assert_eq!(to_rust_field("__2nd"), "_2nd");
        assert_eq!(type_ident("_1"), "V1");
        assert_eq!(type_ident("_"), "V");
    }

    #[test]
    fn test_declared_types_never_shadow_generated_references() {
        for name in ["Result", "Option", "Vec", "Box", "String", "None", "Serialize", "C", "bool"] {
            assert_eq!(escape_type(name.to_string()), format!("{name}Type"));
        }
        assert_eq!(escape_type("Self".to_string()), "SelfType");
        assert_eq!(escape_type("_".to_string()), "_Type");
        assert_eq!(escape_type("type".to_string()), "r#type");
        assert_eq!(escape_type("Status".to_string()), "Status");
    }

    fn names_in(sdl: &str, text: &str) -> Names {
        let schema = Schema::parse(sdl).unwrap();
        let set = OperationSet::parse(text).unwrap();
        let op = &set.operations()[0];
        let bound = bind(&schema, &set, op, &CodegenConfig::default()).unwrap();
        assign_names(&op.name, &bound).unwrap()
    }

    #[test]
    fn test_prelude_named_schema_types_are_renamed() {
        let names = names_in(
            "enum Result { OK FAILED } input Option { result: Result } \
             type User { status: Result } type Query { user(filter: Option): User }",
            "query Q($filter: Option) { user(filter: $filter) { status } }",
        );
        assert_eq!(names.schema_type("Result"), "ResultType");
        assert_eq!(names.schema_type("Option"), "OptionType");
        assert_eq!(names.enum_value("Result", 0), "Ok");
        assert_eq!(names.input_field("Option", 0), "result");
    }

    #[test]
    fn test_digit_names_become_identifiers() {
        let names = names_in(
            "enum Level { _1 _2 HIGH } type Item { _1: Level } type Query { item: Item }",
            "query _1st { item { _1 } }",
        );
        assert_eq!(names.enum_value("Level", 0), "V1");
        assert_eq!(names.enum_value("Level", 1), "V2");
        assert_eq!(names.enum_value("Level", 2), "High");
        assert_eq!(names.field(ShapeId(1), 0), "_1");
        assert_eq!(names.marker, "V1st");
        assert_eq!(names.response, "V1stResponse");
        assert_eq!(names.function, "_1st");
        assert_eq!(names.constant, "_1ST_OPERATION");
    }

    #[test]
    fn test_list_input_query_names() {
        let names = names_ok("query ListInputQuery($names: String) { user(filter: {type: $names}) { id } }");
        assert_eq!(names.marker, "ListInputQuery");
        assert_eq!(names.response, "ListInputQueryResponse");
        assert_eq!(names.variables, "ListInputQueryVariables");
        assert_eq!(names.function, "list_input_query");
        assert_eq!(names.constant, "LIST_INPUT_QUERY_OPERATION");
        assert_eq!(names.module, "list_input_query");
        assert_eq!(names.shape(ShapeId(1)), "ListInputQueryUser");
        assert_eq!(names.field(ShapeId(1), 0), "id");
        assert_eq!(names.params, vec!["names"]);
    }

    fn names_ok(text: &str) -> Names {
        names(text).unwrap()
    }

    #[test]
    fn test_keywords_and_inputs() {
        let names = names_ok(
            "query Q($type: String, $f: Filter) { user(filter: $f) { type self { id } userID __typename } }",
        );
        assert_eq!(names.params, vec!["r#type", "f"]);
        assert_eq!(names.field(ShapeId(1), 0), "r#type");
        assert_eq!(names.field(ShapeId(1), 1), "self_");
        assert_eq!(names.field(ShapeId(1), 2), "user_id");
        assert_eq!(names.field(ShapeId(1), 3), "typename");
        assert_eq!(names.shape(ShapeId(2)), "QUserSelf");
        assert_eq!(names.input_field("Filter", 0), "r#type");
        assert_eq!(names.enum_value("Status", 0), "InProgress");
    }

    #[test]
    fn test_variant_names() {
        let names = names_ok("query Q { node { __typename ... on User { name } } }");
        assert_eq!(names.shape(ShapeId(1)), "QNode");
        assert_eq!(names.fields_trait(ShapeId(1)), "QNodeFields");
        assert_eq!(names.variant(ShapeId(1), 0), "User");
        assert_eq!(names.shape(ShapeId(2)), "QNodeUser");
        assert_eq!(names.shape(ShapeId(3)), "QNodeBot");
    }

    #[test]
    fn test_two_aliases_do_not_collide() {
        let names = names_ok("query Q { a: user { id } b: user { name } }");
        assert_eq!(names.shape(ShapeId(1)), "QA");
        assert_eq!(names.shape(ShapeId(2)), "QB");
    }

    #[test]
    fn test_shape_collides_with_response_root() {
        let err = names("query Q { response { id } }").unwrap_err();
        assert_eq!(
            err,
            BindError::NameCollision {
                name: "QResponse".to_string(),
                first: "the response root".to_string(),
                second: "selection `response`".to_string(),
            }
        );
    }

    #[test]
    fn test_path_concatenation_collision() {
        let err = names("query Q { user { self { id } } userSelf: user { id } }").unwrap_err();
        assert!(matches!(err, BindError::NameCollision { name, .. } if name == "QUserSelf"));
    }

    #[test]
    fn test_accessor_collision() {
        let err = names("query Q { user { user_id: id userID } }").unwrap_err();
        assert!(matches!(err, BindError::NameCollision { name, .. } if name == "user_id"));
    }

    #[test]
    fn test_client_parameter_collision() {
        let err = names("query Q($client: String) { user(filter: {type: $client}) { id } }").unwrap_err();
        assert!(matches!(err, BindError::NameCollision { name, .. } if name == "client"));
    }
}
