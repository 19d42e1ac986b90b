//! operation documents
//!
//! owned ast for queries, mutations and fragments. every definition keeps the
//! exact source text it was parsed from, so the text sent over the wire is
//! byte-for-byte what was authored.

use crate::codegen::error::DocumentError;
use crate::codegen::schema::TypeRef;
use graphql_parser::query as ast;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        };
        f.write_str(name)
    }
}

/// source position (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl From<graphql_parser::Pos> for Pos {
    fn from(pos: graphql_parser::Pos) -> Self {
        Pos {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// literal or variable value in an argument position
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(String),
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<(String, Value)>,
}

impl Directive {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    pub items: Vec<Selection>,
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(FieldSelection),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelection {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

impl FieldSelection {
    /// key the field appears under in the response
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpread {
    pub name: String,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<String>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

/// a named query or mutation
#[derive(Debug, Clone)]
pub struct OperationDoc {
    pub name: String,
    pub kind: OperationKind,
    pub variables: Vec<VariableDef>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    /// verbatim definition text
    pub source: String,
    pub position: Pos,
}

impl OperationDoc {
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        self.variables.iter().find(|var| var.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct FragmentDef {
    pub name: String,
    pub type_condition: String,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    /// verbatim definition text
    pub source: String,
    pub position: Pos,
}

/// definitions of one parsed document, in source order
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub operations: Vec<OperationDoc>,
    pub fragments: Vec<FragmentDef>,
}

/// parse one operation document
pub fn parse_document(text: &str) -> Result<ParsedDocument, DocumentError> {
    let document = ast::parse_query::<String>(text)?;
    let spans = definition_spans(text)?;
    if spans.len() != document.definitions.len() {
        return Err(DocumentError::SpanMismatch {
            spans: spans.len(),
            definitions: document.definitions.len(),
        });
    }

    let mut parsed = ParsedDocument::default();
    for (definition, span) in document.definitions.iter().zip(spans) {
        let source = text[span].to_string();
        match definition {
            ast::Definition::Operation(operation) => {
                parsed.operations.push(convert_operation(operation, source)?);
            }
            ast::Definition::Fragment(fragment) => {
                let ast::TypeCondition::On(type_condition) = &fragment.type_condition;
                parsed.fragments.push(FragmentDef {
                    name: fragment.name.clone(),
                    type_condition: type_condition.clone(),
                    directives: convert_directives(&fragment.directives),
                    selection_set: convert_selection_set(&fragment.selection_set),
                    source,
                    position: fragment.position.into(),
                });
            }
        }
    }
    Ok(parsed)
}

/// every operation and fragment of a generation run
///
/// fragments are global: an operation may spread a fragment defined in any
/// document of the set.
#[derive(Debug, Clone, Default)]
pub struct OperationSet {
    operations: Vec<OperationDoc>,
    fragments: IndexMap<String, FragmentDef>,
}

impl OperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// parse `text` and add its definitions
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let mut set = Self::new();
        set.add(parse_document(text)?)?;
        Ok(set)
    }

    /// add the definitions of a parsed document
    ///
    /// all or nothing: a document with any duplicate name adds nothing.
    pub fn add(&mut self, document: ParsedDocument) -> Result<(), DocumentError> {
        let mut operations = HashSet::new();
        for operation in &document.operations {
            if self.operation(&operation.name).is_some() || !operations.insert(&operation.name) {
                return Err(DocumentError::DuplicateOperation(operation.name.clone()));
            }
        }
        let mut fragments = HashSet::new();
        for fragment in &document.fragments {
            if self.fragments.contains_key(&fragment.name) || !fragments.insert(&fragment.name) {
                return Err(DocumentError::DuplicateFragment(fragment.name.clone()));
            }
        }

        self.operations.extend(document.operations);
        for fragment in document.fragments {
            self.fragments.insert(fragment.name.clone(), fragment);
        }
        Ok(())
    }

    pub fn operations(&self) -> &[OperationDoc] {
        &self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&OperationDoc> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn fragment(&self, name: &str) -> Option<&FragmentDef> {
        self.fragments.get(name)
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDef> {
        self.fragments.values()
    }
}

fn convert_operation(
    operation: &ast::OperationDefinition<'_, String>,
    source: String,
) -> Result<OperationDoc, DocumentError> {
    let (kind, name, variables, directives, selection_set, position) = match operation {
        ast::OperationDefinition::Query(query) => (
            OperationKind::Query,
            &query.name,
            &query.variable_definitions,
            &query.directives,
            &query.selection_set,
            query.position,
        ),
        ast::OperationDefinition::Mutation(mutation) => (
            OperationKind::Mutation,
            &mutation.name,
            &mutation.variable_definitions,
            &mutation.directives,
            &mutation.selection_set,
            mutation.position,
        ),
        ast::OperationDefinition::Subscription(subscription) => (
            OperationKind::Subscription,
            &subscription.name,
            &subscription.variable_definitions,
            &subscription.directives,
            &subscription.selection_set,
            subscription.position,
        ),
        ast::OperationDefinition::SelectionSet(set) => {
            return Err(DocumentError::AnonymousOperation(set.span.0.into()));
        }
    };
    let name = name
        .clone()
        .ok_or_else(|| DocumentError::AnonymousOperation(position.into()))?;

    Ok(OperationDoc {
        name,
        kind,
        variables: variables
            .iter()
            .map(|var| VariableDef {
                name: var.name.clone(),
                ty: TypeRef::from_parsed(&var.var_type),
                default: var.default_value.as_ref().map(convert_value),
            })
            .collect(),
        directives: convert_directives(directives),
        selection_set: convert_selection_set(selection_set),
        source,
        position: position.into(),
    })
}

fn convert_selection_set(set: &ast::SelectionSet<'_, String>) -> SelectionSet {
    SelectionSet {
        items: set.items.iter().map(convert_selection).collect(),
    }
}

fn convert_selection(selection: &ast::Selection<'_, String>) -> Selection {
    match selection {
        ast::Selection::Field(field) => Selection::Field(FieldSelection {
            alias: field.alias.clone(),
            name: field.name.clone(),
            arguments: convert_arguments(&field.arguments),
            directives: convert_directives(&field.directives),
            selection_set: convert_selection_set(&field.selection_set),
        }),
        ast::Selection::FragmentSpread(spread) => Selection::FragmentSpread(FragmentSpread {
            name: spread.fragment_name.clone(),
            directives: convert_directives(&spread.directives),
        }),
        ast::Selection::InlineFragment(fragment) => Selection::InlineFragment(InlineFragment {
            type_condition: fragment
                .type_condition
                .as_ref()
                .map(|ast::TypeCondition::On(name)| name.clone()),
            directives: convert_directives(&fragment.directives),
            selection_set: convert_selection_set(&fragment.selection_set),
        }),
    }
}

fn convert_directives(directives: &[ast::Directive<'_, String>]) -> Vec<Directive> {
    directives
        .iter()
        .map(|directive| Directive {
            name: directive.name.clone(),
            arguments: convert_arguments(&directive.arguments),
        })
        .collect()
}

fn convert_arguments(arguments: &[(String, ast::Value<'_, String>)]) -> Vec<(String, Value)> {
    arguments
        .iter()
        .map(|(name, value)| (name.clone(), convert_value(value)))
        .collect()
}

fn convert_value(value: &ast::Value<'_, String>) -> Value {
    match value {
        ast::Value::Variable(name) => Value::Variable(name.clone()),
        ast::Value::Int(number) => number.as_i64().map(Value::Int).unwrap_or(Value::Null),
        ast::Value::Float(number) => Value::Float(*number),
        ast::Value::String(text) => Value::String(text.clone()),
        ast::Value::Boolean(flag) => Value::Boolean(*flag),
        ast::Value::Null => Value::Null,
        ast::Value::Enum(name) => Value::Enum(name.clone()),
        ast::Value::List(items) => Value::List(items.iter().map(convert_value).collect()),
        ast::Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), convert_value(value)))
                .collect(),
        ),
    }
}

/// byte ranges of every top-level definition in `text`
///
/// a definition starts at its first token and ends at the brace closing its
/// selection set. braces inside parentheses (object values in variable
/// defaults or directive arguments) never end a definition.
fn definition_spans(text: &str) -> Result<Vec<Range<usize>>, DocumentError> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut braces = 0usize;
    let mut parens = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' && bytes[i] != b'\r' {
                    i += 1;
                }
                continue;
            }
            b' ' | b'\t' | b'\n' | b'\r' | b',' => {}
            b'"' => {
                start.get_or_insert(i);
                i = skip_string(bytes, i)?;
                continue;
            }
            byte => {
                start.get_or_insert(i);
                match byte {
                    b'{' => braces += 1,
                    b'}' => {
                        braces = braces.checked_sub(1).ok_or(DocumentError::Unbalanced(i))?;
                        if braces == 0 && parens == 0 {
                            if let Some(begin) = start.take() {
                                spans.push(begin..i + 1);
                            }
                        }
                    }
                    b'(' => parens += 1,
                    b')' => parens = parens.checked_sub(1).ok_or(DocumentError::Unbalanced(i))?,
                    _ => {}
                }
            }
        }
        i += 1;
    }

    match start {
        Some(begin) => Err(DocumentError::Unbalanced(begin)),
        None => Ok(spans),
    }
}

/// index just past the string literal starting at `start`
fn skip_string(bytes: &[u8], start: usize) -> Result<usize, DocumentError> {
    if bytes[start..].starts_with(b"\"\"\"") {
        let mut i = start + 3;
        while i < bytes.len() {
            if bytes[i..].starts_with(b"\\\"\"\"") {
                i += 4;
            } else if bytes[i..].starts_with(b"\"\"\"") {
                return Ok(i + 3);
            } else {
                i += 1;
            }
        }
        return Err(DocumentError::UnterminatedString(start));
    }

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i + 1),
            b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }
    Err(DocumentError::UnterminatedString(start))
}
