//! type binding
//!
//! walks an operation's selections against the schema and produces the shape
//! arena the namer and emitter work from. one shape per selection-set
//! boundary; nothing is shared between operations.

use crate::codegen::document::{
    Directive, FieldSelection, OperationDoc, OperationKind, OperationSet, Selection, SelectionSet,
    Value,
};
use crate::codegen::error::BindError;
use crate::codegen::schema::{EnumValueDef, InputValueDef, Schema, TypeDef, TypeRef};
use crate::codegen::settings::CodegenConfig;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// index of a shape in [`BoundOperation::shapes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// host type of a scalar, enum or input object position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    String,
    Int,
    Float,
    Boolean,
    /// custom scalar bound to a rust type path
    Custom { scalar: String, rust: String },
    Enum(String),
    InputObject(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundType {
    Leaf(Leaf),
    Shape(ShapeId),
    List(Box<BoundType>),
    Nullable(Box<BoundType>),
}

impl BoundType {
    pub fn is_nullable(&self) -> bool {
        matches!(self, BoundType::Nullable(_))
    }

    /// innermost shape, if any
    pub fn shape(&self) -> Option<ShapeId> {
        match self {
            BoundType::Shape(id) => Some(*id),
            BoundType::Leaf(_) => None,
            BoundType::List(inner) | BoundType::Nullable(inner) => inner.shape(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Object,
    /// interface or union, resolved through `variants`
    Abstract,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// output keys from the root; variants append their concrete type name
    pub path: Vec<String>,
    pub graphql_type: String,
    pub description: Option<String>,
    pub kind: ShapeKind,
    /// for abstract shapes: the fields every variant shares verbatim
    pub fields: Vec<BoundField>,
    pub variants: Vec<Variant>,
    /// abstract shape this shape is a variant of
    pub variant_of: Option<ShapeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub type_name: String,
    pub shape: ShapeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    /// alias or field name
    pub output_key: String,
    pub wire_name: String,
    pub ty: BoundType,
    pub source_type: TypeRef,
    pub description: Option<String>,
    /// guarded by `@skip` or `@include`
    pub conditional: bool,
}

impl BoundField {
    pub fn is_typename(&self) -> bool {
        self.wire_name == "__typename"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundVariable {
    pub name: String,
    pub ty: BoundType,
    pub source_type: TypeRef,
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundInputField {
    pub name: String,
    pub ty: BoundType,
    pub source_type: TypeRef,
    pub description: Option<String>,
    pub has_default: bool,
    /// the field recurses into its own input object and needs indirection
    pub boxed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundInputObject {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<BoundInputField>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariablesShape {
    pub variables: Vec<BoundVariable>,
    /// input objects reachable from the variables
    pub input_objects: Vec<BoundInputObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundEnum {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDef>,
}

/// a fully bound operation
#[derive(Debug, Clone, PartialEq)]
pub struct BoundOperation {
    pub name: String,
    pub kind: OperationKind,
    pub root: ShapeId,
    /// shape arena in pre-order: parents before children
    pub shapes: Vec<Shape>,
    pub variables: VariablesShape,
    /// enums used by the response or the variables
    pub enums: Vec<BoundEnum>,
    /// fragments the operation uses, in order of first use
    pub fragments: Vec<String>,
    /// operation text followed by the text of each used fragment
    pub text: String,
}

impl BoundOperation {
    pub fn shape(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.0]
    }
}

/// bind `operation` against `schema`
pub fn bind(
    schema: &Schema,
    set: &OperationSet,
    operation: &OperationDoc,
    config: &CodegenConfig,
) -> Result<BoundOperation, BindError> {
    if operation.kind == OperationKind::Subscription {
        return Err(BindError::Unsupported(operation.kind));
    }
    let root_type = schema
        .root_type(operation.kind)
        .ok_or_else(|| BindError::SchemaMismatch {
            path: operation.name.clone(),
            message: format!("schema has no {} type", operation.kind),
        })?;

    let fragments = used_fragments(set, &operation.selection_set)?;

    let mut binder = Binder {
        schema,
        set,
        operation,
        config,
        shapes: Vec::new(),
        enums: IndexSet::new(),
        inputs: IndexSet::new(),
    };
    let variables = binder.bind_variables()?;
    let root = binder.bind_shape(root_type, Vec::new(), &[&operation.selection_set])?;
    let input_objects = binder.bind_input_objects()?;
    let enums = binder.bound_enums();

    let mut text = operation.source.clone();
    for name in &fragments {
        if let Some(fragment) = set.fragment(name) {
            text.push('\n');
            text.push_str(&fragment.source);
        }
    }

    tracing::debug!(
        operation = %operation.name,
        shapes = binder.shapes.len(),
        variables = variables.len(),
        "bound operation"
    );

    Ok(BoundOperation {
        name: operation.name.clone(),
        kind: operation.kind,
        root,
        shapes: binder.shapes,
        variables: VariablesShape {
            variables,
            input_objects,
        },
        enums,
        fragments,
        text,
    })
}

/// fragments reachable from `selection_set` in order of first use
///
/// fails on unknown fragments and on spread cycles.
fn used_fragments(set: &OperationSet, selection_set: &SelectionSet) -> Result<Vec<String>, BindError> {
    fn visit(
        set: &OperationSet,
        selection_set: &SelectionSet,
        stack: &mut Vec<String>,
        order: &mut IndexSet<String>,
    ) -> Result<(), BindError> {
        for selection in &selection_set.items {
            match selection {
                Selection::Field(field) => visit(set, &field.selection_set, stack, order)?,
                Selection::InlineFragment(inline) => {
                    visit(set, &inline.selection_set, stack, order)?
                }
                Selection::FragmentSpread(spread) => {
                    if let Some(start) = stack.iter().position(|name| name == &spread.name) {
                        let mut cycle = stack[start..].to_vec();
                        cycle.push(spread.name.clone());
                        return Err(BindError::FragmentCycle { cycle });
                    }
                    let fragment = set
                        .fragment(&spread.name)
                        .ok_or_else(|| BindError::UnknownFragment(spread.name.clone()))?;
                    if !order.insert(spread.name.clone()) {
                        continue;
                    }
                    stack.push(spread.name.clone());
                    visit(set, &fragment.selection_set, stack, order)?;
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    let mut order = IndexSet::new();
    visit(set, selection_set, &mut Vec::new(), &mut order)?;
    Ok(order.into_iter().collect())
}

/// one occurrence of a field under an output key
struct Entry<'a> {
    field: &'a FieldSelection,
    conditional: bool,
}

type Entries<'a> = IndexMap<String, Vec<Entry<'a>>>;

struct Binder<'a> {
    schema: &'a Schema,
    set: &'a OperationSet,
    operation: &'a OperationDoc,
    config: &'a CodegenConfig,
    shapes: Vec<Shape>,
    enums: IndexSet<String>,
    inputs: IndexSet<String>,
}

impl<'a> Binder<'a> {
    fn reserve(&mut self, path: Vec<String>, def: &TypeDef, variant_of: Option<ShapeId>) -> ShapeId {
        let id = ShapeId(self.shapes.len());
        self.shapes.push(Shape {
            path,
            graphql_type: def.name().to_string(),
            description: def.description().map(str::to_string),
            kind: if def.is_abstract() {
                ShapeKind::Abstract
            } else {
                ShapeKind::Object
            },
            fields: Vec::new(),
            variants: Vec::new(),
            variant_of,
        });
        id
    }

    fn bind_shape(
        &mut self,
        type_name: &str,
        path: Vec<String>,
        sets: &[&'a SelectionSet],
    ) -> Result<ShapeId, BindError> {
        let schema = self.schema;
        let location = display_path(&self.operation.name, &path);
        let def = schema.get(type_name).ok_or_else(|| BindError::SchemaMismatch {
            path: location.clone(),
            message: format!("unknown type `{type_name}`"),
        })?;
        let id = self.reserve(path.clone(), def, None);

        if !def.is_abstract() {
            let entries = self.collect_all(type_name, sets, &location)?;
            let mut fields = Vec::with_capacity(entries.len());
            for (key, entries) in &entries {
                fields.push(self.bind_field(type_name, &path, key, entries)?);
            }
            self.shapes[id.0].fields = fields;
            return Ok(id);
        }

        let shared = self.collect_all(type_name, sets, &location)?;
        let has_typename = shared.get("__typename").is_some_and(|entries| {
            entries.iter().all(|entry| entry.field.name == "__typename")
                && entries.iter().any(|entry| !entry.conditional)
        });
        if !has_typename {
            return Err(BindError::MissingTypename {
                path: location,
                type_name: type_name.to_string(),
            });
        }

        let possible = schema.possible_types(type_name);
        if possible.is_empty() {
            return Err(BindError::SchemaMismatch {
                path: location,
                message: format!("{} `{type_name}` has no possible types", def.kind()),
            });
        }

        let mut per_type = Vec::with_capacity(possible.len());
        for concrete in possible {
            per_type.push((concrete, self.collect_all(concrete, sets, &location)?));
        }

        // a shared key is only reused when no variant adds selections to it
        let mut shared_fields: IndexMap<&str, BoundField> = IndexMap::new();
        for (key, entries) in &shared {
            let uniform = per_type.iter().all(|(_, variant)| {
                variant.get(key).map(Vec::len) == Some(entries.len())
            });
            if uniform {
                let field = self.bind_field(type_name, &path, key, entries)?;
                shared_fields.insert(key.as_str(), field);
            }
        }

        let mut variants = Vec::with_capacity(per_type.len());
        for (concrete, entries) in &per_type {
            let concrete_def = schema.get(concrete).ok_or_else(|| BindError::SchemaMismatch {
                path: location.clone(),
                message: format!("unknown type `{concrete}`"),
            })?;
            let mut variant_path = path.clone();
            variant_path.push(concrete.to_string());
            let variant_id = self.reserve(variant_path.clone(), concrete_def, Some(id));

            let mut fields = Vec::with_capacity(entries.len());
            for (key, entries) in entries {
                match shared_fields.get(key.as_str()) {
                    Some(field) => fields.push(field.clone()),
                    None => fields.push(self.bind_field(concrete, &variant_path, key, entries)?),
                }
            }
            self.shapes[variant_id.0].fields = fields;
            variants.push(Variant {
                type_name: concrete.to_string(),
                shape: variant_id,
            });
        }

        let shape = &mut self.shapes[id.0];
        shape.fields = shared_fields.into_values().collect();
        shape.variants = variants;
        Ok(id)
    }

    fn collect_all(
        &self,
        scope: &str,
        sets: &[&'a SelectionSet],
        location: &str,
    ) -> Result<Entries<'a>, BindError> {
        let mut entries = Entries::new();
        for &set in sets {
            self.collect(scope, set, false, location, &mut entries)?;
        }
        Ok(entries)
    }

    /// gather the fields of `set` that apply to `scope`, inlining fragments
    fn collect(
        &self,
        scope: &str,
        set: &'a SelectionSet,
        conditional: bool,
        location: &str,
        out: &mut Entries<'a>,
    ) -> Result<(), BindError> {
        for selection in &set.items {
            match selection {
                Selection::Field(field) => {
                    let guarded = self.check_directives(&field.directives, location)?;
                    out.entry(field.output_key().to_string())
                        .or_default()
                        .push(Entry {
                            field,
                            conditional: conditional || guarded,
                        });
                }
                Selection::FragmentSpread(spread) => {
                    let fragment = self
                        .set
                        .fragment(&spread.name)
                        .ok_or_else(|| BindError::UnknownFragment(spread.name.clone()))?;
                    self.check_condition(&fragment.type_condition, location)?;
                    let guarded = self.check_directives(&spread.directives, location)?;
                    if self.applies(&fragment.type_condition, scope) {
                        self.collect(
                            scope,
                            &fragment.selection_set,
                            conditional || guarded,
                            location,
                            out,
                        )?;
                    }
                }
                Selection::InlineFragment(inline) => {
                    let condition = inline.type_condition.as_deref().unwrap_or(scope);
                    self.check_condition(condition, location)?;
                    let guarded = self.check_directives(&inline.directives, location)?;
                    if self.applies(condition, scope) {
                        self.collect(
                            scope,
                            &inline.selection_set,
                            conditional || guarded,
                            location,
                            out,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    /// a fragment on `condition` contributes to a selection scoped to `scope`
    fn applies(&self, condition: &str, scope: &str) -> bool {
        if condition == scope {
            return true;
        }
        matches!(self.schema.get(scope), Some(TypeDef::Object(_)))
            && self.schema.is_possible_type(condition, scope)
    }

    fn check_condition(&self, condition: &str, location: &str) -> Result<(), BindError> {
        match self.schema.get(condition) {
            Some(def) if def.is_composite() => Ok(()),
            Some(def) => Err(BindError::SchemaMismatch {
                path: location.to_string(),
                message: format!(
                    "fragment type condition `{condition}` is a {}, not a composite type",
                    def.kind()
                ),
            }),
            None => Err(BindError::SchemaMismatch {
                path: location.to_string(),
                message: format!("unknown type `{condition}` in type condition"),
            }),
        }
    }

    /// validate `@skip`/`@include`; true if the selection is guarded by one
    fn check_directives(&self, directives: &[Directive], location: &str) -> Result<bool, BindError> {
        let mut guarded = false;
        for directive in directives {
            if directive.name != "skip" && directive.name != "include" {
                continue;
            }
            let value = directive
                .argument("if")
                .ok_or_else(|| BindError::ArgumentMismatch {
                    path: location.to_string(),
                    message: format!("directive `@{}` requires argument `if`", directive.name),
                })?;
            let boolean = TypeRef::non_null(TypeRef::named("Boolean"));
            self.check_value(value, &boolean, false, &format!("{location}@{}", directive.name))?;
            guarded = true;
        }
        Ok(guarded)
    }

    fn bind_field(
        &mut self,
        scope: &str,
        path: &[String],
        key: &str,
        entries: &[Entry<'a>],
    ) -> Result<BoundField, BindError> {
        let schema = self.schema;
        let first = entries[0].field;
        let mut field_path = path.to_vec();
        field_path.push(key.to_string());
        let location = display_path(&self.operation.name, &field_path);

        for entry in &entries[1..] {
            if entry.field.name != first.name {
                return Err(BindError::FieldConflict {
                    path: display_path(&self.operation.name, path),
                    key: key.to_string(),
                    message: format!(
                        "`{}` and `{}` are different fields",
                        first.name, entry.field.name
                    ),
                });
            }
            if !same_arguments(&first.arguments, &entry.field.arguments) {
                return Err(BindError::FieldConflict {
                    path: display_path(&self.operation.name, path),
                    key: key.to_string(),
                    message: format!("`{}` is selected with different arguments", first.name),
                });
            }
        }
        let conditional = entries.iter().all(|entry| entry.conditional);

        if first.name == "__typename" {
            if entries.iter().any(|entry| !entry.field.selection_set.is_empty()) {
                return Err(BindError::SchemaMismatch {
                    path: location,
                    message: "`__typename` cannot have a selection".to_string(),
                });
            }
            if let Some((name, _)) = first.arguments.first() {
                return Err(BindError::SchemaMismatch {
                    path: location,
                    message: format!("unknown argument `{name}` on `__typename`"),
                });
            }
            return Ok(BoundField {
                output_key: key.to_string(),
                wire_name: first.name.clone(),
                ty: conditional_type(BoundType::Leaf(Leaf::String), conditional),
                source_type: TypeRef::non_null(TypeRef::named("String")),
                description: None,
                conditional,
            });
        }

        let def = schema
            .field(scope, &first.name)
            .ok_or_else(|| BindError::SchemaMismatch {
                path: location.clone(),
                message: format!("type `{scope}` has no field `{}`", first.name),
            })?;
        self.check_arguments(
            &format!("{scope}.{}", def.name),
            &def.arguments,
            &first.arguments,
            &location,
        )?;

        let base = def.ty.base_name();
        let base_def = schema.get(base).ok_or_else(|| BindError::SchemaMismatch {
            path: location.clone(),
            message: format!("unknown type `{base}`"),
        })?;

        let inner = if base_def.is_composite() {
            if entries.iter().any(|entry| entry.field.selection_set.is_empty()) {
                return Err(BindError::SchemaMismatch {
                    path: location,
                    message: format!("field of type `{}` must have a selection of subfields", def.ty),
                });
            }
            let sets: Vec<&'a SelectionSet> = entries
                .iter()
                .map(|entry| &entry.field.selection_set)
                .collect();
            BoundType::Shape(self.bind_shape(base, field_path, &sets)?)
        } else {
            if entries.iter().any(|entry| !entry.field.selection_set.is_empty()) {
                return Err(BindError::SchemaMismatch {
                    path: location,
                    message: format!("field of type `{}` cannot have a selection", def.ty),
                });
            }
            BoundType::Leaf(self.leaf(base, &location)?)
        };

        Ok(BoundField {
            output_key: key.to_string(),
            wire_name: first.name.clone(),
            ty: conditional_type(wrap(&def.ty, inner), conditional),
            source_type: def.ty.clone(),
            description: def.description.clone(),
            conditional,
        })
    }

    fn leaf(&mut self, name: &str, location: &str) -> Result<Leaf, BindError> {
        if let Some(rust) = self.config.bindings.get(name) {
            return Ok(Leaf::Custom {
                scalar: name.to_string(),
                rust: rust.clone(),
            });
        }
        match self.schema.get(name) {
            Some(TypeDef::Scalar(_)) => Ok(match name {
                "String" | "ID" => Leaf::String,
                "Int" => Leaf::Int,
                "Float" => Leaf::Float,
                "Boolean" => Leaf::Boolean,
                _ => Leaf::Custom {
                    scalar: name.to_string(),
                    rust: self.config.opaque_scalar(),
                },
            }),
            Some(TypeDef::Enum(_)) => {
                self.enums.insert(name.to_string());
                Ok(Leaf::Enum(name.to_string()))
            }
            Some(TypeDef::InputObject(_)) => {
                self.inputs.insert(name.to_string());
                Ok(Leaf::InputObject(name.to_string()))
            }
            Some(def) => Err(BindError::SchemaMismatch {
                path: location.to_string(),
                message: format!("`{name}` is a {}, expected a leaf or input type", def.kind()),
            }),
            None => Err(BindError::SchemaMismatch {
                path: location.to_string(),
                message: format!("unknown type `{name}`"),
            }),
        }
    }

    fn bind_variables(&mut self) -> Result<Vec<BoundVariable>, BindError> {
        let schema = self.schema;
        let operation = self.operation;
        let mut variables = Vec::with_capacity(operation.variables.len());
        for var in &operation.variables {
            let location = format!("{}.${}", operation.name, var.name);
            let base = var.ty.base_name();
            match schema.get(base) {
                Some(def) if def.is_input() => {}
                Some(def) => {
                    return Err(BindError::SchemaMismatch {
                        path: location,
                        message: format!("variable type `{base}` is a {}, not an input type", def.kind()),
                    })
                }
                None => {
                    return Err(BindError::SchemaMismatch {
                        path: location,
                        message: format!("unknown type `{base}`"),
                    })
                }
            }
            if let Some(default) = &var.default {
                if contains_variable(default) {
                    return Err(BindError::ArgumentMismatch {
                        path: location,
                        message: "default values cannot reference variables".to_string(),
                    });
                }
                self.check_value(default, &var.ty, false, &location)?;
            }
            let leaf = self.leaf(base, &location)?;
            variables.push(BoundVariable {
                name: var.name.clone(),
                ty: wrap(&var.ty, BoundType::Leaf(leaf)),
                source_type: var.ty.clone(),
                has_default: var.default.is_some(),
            });
        }
        Ok(variables)
    }

    fn bind_input_objects(&mut self) -> Result<Vec<BoundInputObject>, BindError> {
        let schema = self.schema;
        let mut objects = Vec::new();
        // binding a field may append further input objects
        let mut next = 0;
        while let Some(name) = self.inputs.get_index(next).cloned() {
            next += 1;
            let Some(TypeDef::InputObject(def)) = schema.get(&name) else {
                continue;
            };
            let mut fields = Vec::with_capacity(def.fields.len());
            for field in def.fields.values() {
                let location = format!("{}.{}", def.name, field.name);
                let leaf = self.leaf(field.ty.base_name(), &location)?;
                fields.push(BoundInputField {
                    name: field.name.clone(),
                    ty: wrap(&field.ty, BoundType::Leaf(leaf)),
                    source_type: field.ty.clone(),
                    description: field.description.clone(),
                    has_default: field.has_default,
                    boxed: self.needs_box(&def.name, &field.ty),
                });
            }
            objects.push(BoundInputObject {
                name: def.name.clone(),
                description: def.description.clone(),
                fields,
            });
        }
        Ok(objects)
    }

    /// a non-list input object field that leads back to `container`
    fn needs_box(&self, container: &str, ty: &TypeRef) -> bool {
        let TypeRef::Named(name) = ty.nullable() else {
            return false;
        };
        self.reaches(name, container, &mut HashSet::new())
    }

    fn reaches<'s>(&'s self, from: &'s str, target: &str, seen: &mut HashSet<&'s str>) -> bool {
        let Some(TypeDef::InputObject(def)) = self.schema.get(from) else {
            return false;
        };
        if from == target {
            return true;
        }
        if !seen.insert(from) {
            return false;
        }
        def.fields.values().any(|field| match field.ty.nullable() {
            TypeRef::Named(next) => self.reaches(next, target, seen),
            _ => false,
        })
    }

    fn bound_enums(&self) -> Vec<BoundEnum> {
        self.enums
            .iter()
            .filter_map(|name| match self.schema.get(name) {
                Some(TypeDef::Enum(def)) => Some(BoundEnum {
                    name: def.name.clone(),
                    description: def.description.clone(),
                    values: def.values.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    fn check_arguments(
        &self,
        owner: &str,
        declared: &[InputValueDef],
        given: &[(String, Value)],
        location: &str,
    ) -> Result<(), BindError> {
        for (name, value) in given {
            let arg = declared
                .iter()
                .find(|arg| &arg.name == name)
                .ok_or_else(|| BindError::SchemaMismatch {
                    path: location.to_string(),
                    message: format!("unknown argument `{name}` on `{owner}`"),
                })?;
            self.check_value(value, &arg.ty, arg.has_default, &format!("{location}({name})"))?;
        }
        for arg in declared {
            let required = arg.ty.is_non_null() && !arg.has_default;
            if required && !given.iter().any(|(name, _)| name == &arg.name) {
                return Err(BindError::ArgumentMismatch {
                    path: location.to_string(),
                    message: format!("missing required argument `{}: {}`", arg.name, arg.ty),
                });
            }
        }
        Ok(())
    }

    /// check `value` against an input position of type `expected`
    fn check_value(
        &self,
        value: &Value,
        expected: &TypeRef,
        has_default: bool,
        location: &str,
    ) -> Result<(), BindError> {
        let mismatch = |message: String| BindError::ArgumentMismatch {
            path: location.to_string(),
            message,
        };

        if let Value::Variable(name) = value {
            let var = self
                .operation
                .variable(name)
                .ok_or_else(|| BindError::UndefinedVariable(name.clone()))?;
            if !variable_fits(&var.ty, expected, has_default || var.default.is_some()) {
                return Err(mismatch(format!(
                    "variable `${name}` of type `{}` cannot be used where `{expected}` is expected",
                    var.ty
                )));
            }
            return Ok(());
        }

        if let Value::Null = value {
            if expected.is_non_null() {
                return Err(mismatch(format!("null is not allowed for `{expected}`")));
            }
            return Ok(());
        }

        match expected.nullable() {
            TypeRef::NonNull(inner) => self.check_value(value, inner, false, location),
            TypeRef::List(item) => match value {
                Value::List(items) => items
                    .iter()
                    .try_for_each(|item_value| self.check_value(item_value, item, false, location)),
                single => self.check_value(single, item, false, location),
            },
            TypeRef::Named(name) => match (value, self.schema.get(name)) {
                (_, Some(TypeDef::Scalar(_))) if !is_builtin_scalar(name) => Ok(()),
                (Value::List(_), _) => Err(mismatch(format!("list value for non-list type `{expected}`"))),
                (_, Some(TypeDef::Scalar(_))) => {
                    if scalar_fits(name, value) {
                        Ok(())
                    } else {
                        Err(mismatch(format!("{} is not a valid `{name}`", describe(value))))
                    }
                }
                (Value::Enum(literal), Some(TypeDef::Enum(def))) => {
                    if def.has_value(literal) {
                        Ok(())
                    } else {
                        Err(mismatch(format!("`{literal}` is not a value of enum `{name}`")))
                    }
                }
                (Value::Object(fields), Some(TypeDef::InputObject(def))) => {
                    for (field_name, field_value) in fields {
                        let field = def.fields.get(field_name).ok_or_else(|| {
                            mismatch(format!("input object `{name}` has no field `{field_name}`"))
                        })?;
                        self.check_value(
                            field_value,
                            &field.ty,
                            field.has_default,
                            &format!("{location}.{field_name}"),
                        )?;
                    }
                    for field in def.fields.values() {
                        let required = field.ty.is_non_null() && !field.has_default;
                        if required && !fields.contains_key(&field.name) {
                            return Err(mismatch(format!(
                                "input object `{name}` requires field `{}`",
                                field.name
                            )));
                        }
                    }
                    Ok(())
                }
                (_, Some(def)) => Err(mismatch(format!(
                    "{} is not a valid value for {} `{name}`",
                    describe(value),
                    def.kind()
                ))),
                (_, None) => Err(mismatch(format!("unknown type `{name}`"))),
            },
        }
    }
}

/// `Query.user.friends` style path used in diagnostics
fn display_path(operation: &str, path: &[String]) -> String {
    std::iter::once(operation)
        .chain(path.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(".")
}

fn wrap(ty: &TypeRef, inner: BoundType) -> BoundType {
    match ty {
        TypeRef::NonNull(ty) => wrap_non_null(ty, inner),
        other => BoundType::Nullable(Box::new(wrap_non_null(other, inner))),
    }
}

fn wrap_non_null(ty: &TypeRef, inner: BoundType) -> BoundType {
    match ty {
        TypeRef::Named(_) => inner,
        TypeRef::List(item) => BoundType::List(Box::new(wrap(item, inner))),
        TypeRef::NonNull(ty) => wrap_non_null(ty, inner),
    }
}

fn conditional_type(ty: BoundType, conditional: bool) -> BoundType {
    if conditional && !ty.is_nullable() {
        BoundType::Nullable(Box::new(ty))
    } else {
        ty
    }
}

fn same_arguments(a: &[(String, Value)], b: &[(String, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<_> = a.iter().collect();
    let mut b: Vec<_> = b.iter().collect();
    a.sort_by(|x, y| x.0.cmp(&y.0));
    b.sort_by(|x, y| x.0.cmp(&y.0));
    a == b
}

fn contains_variable(value: &Value) -> bool {
    match value {
        Value::Variable(_) => true,
        Value::List(items) => items.iter().any(contains_variable),
        Value::Object(fields) => fields.values().any(contains_variable),
        _ => false,
    }
}

fn is_builtin_scalar(name: &str) -> bool {
    crate::codegen::schema::BUILTIN_SCALARS.contains(&name)
}

fn scalar_fits(scalar: &str, value: &Value) -> bool {
    matches!(
        (scalar, value),
        ("Int", Value::Int(_))
            | ("Float", Value::Int(_) | Value::Float(_))
            | ("String", Value::String(_))
            | ("ID", Value::Int(_) | Value::String(_))
            | ("Boolean", Value::Boolean(_))
    )
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Variable(_) => "a variable",
        Value::Int(_) => "an int",
        Value::Float(_) => "a float",
        Value::String(_) => "a string",
        Value::Boolean(_) => "a boolean",
        Value::Null => "null",
        Value::Enum(_) => "an enum value",
        Value::List(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// a variable of type `var` may fill a position of type `expected`
fn variable_fits(var: &TypeRef, expected: &TypeRef, has_default: bool) -> bool {
    if has_default && !var.is_non_null() && expected.is_non_null() {
        return compatible(var, expected.nullable());
    }
    compatible(var, expected)
}

fn compatible(var: &TypeRef, expected: &TypeRef) -> bool {
    // a single value coerces into a one-element list
    if !matches!(var.nullable(), TypeRef::List(_)) {
        if let TypeRef::List(item) = expected.nullable() {
            if expected.is_non_null() && !var.is_non_null() {
                return false;
            }
            return compatible(var, item);
        }
    }
    match (var, expected) {
        (TypeRef::NonNull(var), TypeRef::NonNull(expected)) => compatible(var, expected),
        (_, TypeRef::NonNull(_)) => false,
        (TypeRef::NonNull(var), expected) => compatible(var, expected),
        (TypeRef::List(var), TypeRef::List(expected)) => compatible(var, expected),
        (TypeRef::Named(var), TypeRef::Named(expected)) => var == expected,
        _ => false,
    }
}
