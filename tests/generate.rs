use gqlbind::codegen::{
    self, bind, parse_document, BindError, CodegenConfig, GeneratedUnit, OperationSet, Schema,
};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config() -> CodegenConfig {
    CodegenConfig::default()
        .with_base_dir(fixtures())
        .with_operations(vec!["operations/*.graphql".to_string()])
}

fn load() -> (Schema, OperationSet) {
    let config = config();
    let schema = codegen::load_schema(&config, None).expect("fixture schema");
    let files = config.operation_files().expect("fixture operations");
    let (set, errors) = codegen::load_operations(&files);
    assert!(errors.is_empty(), "{errors:?}");
    (schema, set)
}

fn unit(name: &str) -> GeneratedUnit {
    let (schema, set) = load();
    let operation = set.operation(name).expect("operation");
    codegen::generate_operation(&schema, &set, operation, &config()).expect("generated unit")
}

#[test]
fn batch_reports_cycle_and_keeps_going() {
    let (schema, set) = load();
    let outcomes = codegen::generate_all(&schema, &set, &config());

    let names: Vec<&str> = set.operations().iter().map(|op| op.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["CreateUser", "Looping", "ListInputQuery", "Search", "TwoUsers"]
    );

    for (name, outcome) in names.iter().zip(&outcomes) {
        match outcome {
            Ok(unit) => assert_eq!(&unit.operation, name),
            Err(diagnostic) => {
                assert_eq!(diagnostic.operation, "Looping");
                assert!(matches!(diagnostic.error, BindError::FragmentCycle { .. }));
            }
        }
    }
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_err()).count(), 1);
}

#[test]
fn list_input_query_scenario() {
    let unit = unit("ListInputQuery");
    assert_eq!(unit.file_name, "list_input_query.rs");

    let text = "query ListInputQuery($names: [String]) {\n  user(query: {names: $names}) {\n    id\n  }\n}";
    assert!(unit
        .source
        .contains(&format!("pub const LIST_INPUT_QUERY_OPERATION: &str = r#\"{text}\"#;")));
    assert!(unit
        .source
        .contains("pub struct ListInputQueryResponse {\n    pub user: Option<ListInputQueryUser>,\n}"));
    assert!(unit.source.contains("pub struct ListInputQueryUser {\n    /// Stable identifier.\n    pub id: String,\n}"));
    assert!(unit
        .source
        .contains("pub struct ListInputQueryVariables {\n    names: Option<Vec<Option<String>>>,\n}"));
    assert!(unit.source.contains(
        "pub fn list_input_query<C: gqlbind::Client>(\n    client: C,\n    names: Option<Vec<Option<String>>>,\n) -> (Option<ListInputQueryResponse>, Result<(), C::Error>)"
    ));
}

#[test]
fn generation_is_deterministic() {
    let (schema, set) = load();
    let first = codegen::generate_all(&schema, &set, &config());
    let second = codegen::generate_all(&schema, &set, &config());
    assert_eq!(first, second);
}

#[test]
fn fields_follow_selection_order() {
    let unit = unit("CreateUser");
    assert!(unit
        .source
        .contains("pub struct CreateUserCreateUser {\n    /// Stable identifier.\n    pub id: String,\n    pub role: Role,\n}"));
    assert!(unit.source.contains("    #[serde(rename = \"createUser\")]\n    pub create_user: CreateUserCreateUser,\n"));
    assert!(unit.source.contains("pub struct CreateUserInput {\n    pub name: String,\n    pub email: String,\n    #[serde(skip_serializing_if = \"Option::is_none\")]\n    pub role: Option<Role>,\n}"));
}

#[test]
fn two_aliases_produce_two_types() {
    let unit = unit("TwoUsers");
    assert!(unit.source.contains(
        "pub struct TwoUsersAdmins {\n    /// Stable identifier.\n    pub id: String,\n    pub email: String,\n    pub role: Role,\n}"
    ));
    assert!(unit.source.contains(
        "pub struct TwoUsersGuests {\n    pub name: Option<String>,\n    #[serde(rename = \"createdAt\")]\n    pub created_at: Option<gqlbind::Opaque>,\n}"
    ));
    assert!(unit.source.contains("    pub admins: Vec<TwoUsersAdmins>,\n    pub guests: Vec<TwoUsersGuests>,\n"));
}

#[test]
fn union_has_one_variant_per_member() {
    let unit = unit("Search");
    assert!(unit.source.contains(
        "#[serde(tag = \"__typename\")]\npub enum SearchSearch {\n    User(SearchSearchUser),\n    Bot(SearchSearchBot),\n}"
    ));
    assert!(unit.source.contains("impl SearchSearchFields for SearchSearchUser {"));
    assert!(unit.source.contains("impl SearchSearchFields for SearchSearchBot {"));
    assert!(unit.source.contains("pub struct SearchSearchBot {\n    pub id: String,\n    pub model: String,\n}"));
}

#[test]
fn embedded_text_reparses_to_the_bound_document() {
    let (schema, set) = load();
    for name in ["ListInputQuery", "TwoUsers", "Search", "CreateUser"] {
        let operation = set.operation(name).expect("operation");
        let bound = bind(&schema, &set, operation, &config()).expect("bound");

        let reparsed = parse_document(&bound.text).expect("embedded text parses");
        assert_eq!(reparsed.operations.len(), 1);
        let again = &reparsed.operations[0];
        assert_eq!(again.name, operation.name);
        assert_eq!(again.variables, operation.variables);
        assert_eq!(again.selection_set, operation.selection_set);

        let fragments: Vec<&str> = reparsed.fragments.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fragments, bound.fragments);
        for fragment in &reparsed.fragments {
            let original = set.fragment(&fragment.name).expect("fragment");
            assert_eq!(fragment.selection_set, original.selection_set);
        }
    }
}

#[test]
fn writes_units_and_mod_file() {
    let (schema, set) = load();
    let units: Vec<GeneratedUnit> = codegen::generate_all(&schema, &set, &config())
        .into_iter()
        .filter_map(Result::ok)
        .collect();

    let dir = tempfile::tempdir().expect("tempdir");
    let written = codegen::write_units(dir.path(), &units).expect("write");
    assert_eq!(written.len(), units.len() + 1);

    let module = std::fs::read_to_string(dir.path().join(codegen::MOD_FILE)).expect("mod.rs");
    assert_eq!(
        module,
        "// @generated by gqlbind. do not edit.\n\npub mod create_user;\npub mod list_input_query;\npub mod search;\npub mod two_users;\n"
    );
    let search = std::fs::read_to_string(dir.path().join("search.rs")).expect("search.rs");
    assert!(search.starts_with("// @generated by gqlbind from operation `Search`. do not edit.\n"));
    assert!(codegen::stale_files(dir.path(), &units).is_empty());
}

#[test]
fn crlf_operation_keeps_carriage_returns() {
    let config = CodegenConfig::default()
        .with_base_dir(fixtures())
        .with_operations(vec!["crlf/*.graphql".to_string()]);
    let schema = codegen::load_schema(&config, None).expect("fixture schema");
    let files = config.operation_files().expect("fixture operations");
    let (set, errors) = codegen::load_operations(&files);
    assert!(errors.is_empty(), "{errors:?}");

    let operation = set.operation("CrlfQuery").expect("operation");
    assert_eq!(operation.source, "query CrlfQuery {\r\n  user {\r\n    id\r\n  }\r\n}");

    let unit = codegen::generate_operation(&schema, &set, operation, &config).expect("generated unit");
    assert!(unit.source.contains(
        "pub const CRLF_QUERY_OPERATION: &str = \"query CrlfQuery {\\r\\n  user {\\r\\n    id\\r\\n  }\\r\\n}\";\n"
    ));
    assert_eq!(
        unit.source,
        include_str!("../test-client/src/generated/crlf_query.rs")
    );
}
