//! schema model
//!
//! owned, read-only view of a graphql schema built from sdl. one instance is
//! shared by every operation of a generation run.

use crate::codegen::document::OperationKind;
use crate::codegen::error::SchemaError;
use graphql_parser::schema as sdl;
use indexmap::IndexMap;
use std::fmt;

/// scalars every schema has, whether or not the sdl declares them
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// a reference to a named type with its list and non-null wrappers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// name of the innermost named type
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// this type with one outer non-null wrapper removed
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    pub(crate) fn from_parsed(ty: &sdl::Type<'_, String>) -> Self {
        match ty {
            sdl::Type::NamedType(name) => TypeRef::Named(name.clone()),
            sdl::Type::ListType(inner) => TypeRef::list(TypeRef::from_parsed(inner)),
            sdl::Type::NonNullType(inner) => TypeRef::non_null(TypeRef::from_parsed(inner)),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// argument or input object field
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub has_default: bool,
}

/// output field of an object or interface
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDef>,
    pub ty: TypeRef,
}

impl FieldDef {
    pub fn argument(&self, name: &str) -> Option<&InputValueDef> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarDef {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDef {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDef>,
}

impl EnumDef {
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.name == value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, InputValueDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDef {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: IndexMap<String, FieldDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionDef {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    InputObject,
    Object,
    Interface,
    Union,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Enum => "enum",
            TypeKind::InputObject => "input object",
            TypeKind::Object => "type",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
        };
        f.write_str(name)
    }
}

/// a named schema type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    Scalar(ScalarDef),
    Enum(EnumDef),
    InputObject(InputObjectDef),
    Object(ObjectDef),
    Interface(InterfaceDef),
    Union(UnionDef),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Scalar(def) => &def.name,
            TypeDef::Enum(def) => &def.name,
            TypeDef::InputObject(def) => &def.name,
            TypeDef::Object(def) => &def.name,
            TypeDef::Interface(def) => &def.name,
            TypeDef::Union(def) => &def.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TypeDef::Scalar(def) => def.description.as_deref(),
            TypeDef::Enum(def) => def.description.as_deref(),
            TypeDef::InputObject(def) => def.description.as_deref(),
            TypeDef::Object(def) => def.description.as_deref(),
            TypeDef::Interface(def) => def.description.as_deref(),
            TypeDef::Union(def) => def.description.as_deref(),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDef::Scalar(_) => TypeKind::Scalar,
            TypeDef::Enum(_) => TypeKind::Enum,
            TypeDef::InputObject(_) => TypeKind::InputObject,
            TypeDef::Object(_) => TypeKind::Object,
            TypeDef::Interface(_) => TypeKind::Interface,
            TypeDef::Union(_) => TypeKind::Union,
        }
    }

    /// object, interface or union
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TypeDef::Object(_) | TypeDef::Interface(_) | TypeDef::Union(_)
        )
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeDef::Interface(_) | TypeDef::Union(_))
    }

    /// usable as a variable or argument type
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            TypeDef::Scalar(_) | TypeDef::Enum(_) | TypeDef::InputObject(_)
        )
    }

    /// output field declared on an object or interface
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        match self {
            TypeDef::Object(def) => def.fields.get(name),
            TypeDef::Interface(def) => def.fields.get(name),
            _ => None,
        }
    }
}

/// the schema model
#[derive(Debug, Clone)]
pub struct Schema {
    types: IndexMap<String, TypeDef>,
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    /// build a schema from one sdl document
    pub fn parse(source: &str) -> Result<Self, SchemaError> {
        Self::parse_many([source])
    }

    /// build a schema from several sdl documents, e.g. one per file
    ///
    /// extensions may appear in any document, before or after the type they
    /// extend.
    pub fn parse_many<'s, I>(sources: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut builder = SchemaBuilder::default();
        for source in sources {
            let document = sdl::parse_schema::<String>(source)?;
            builder.add_document(&document)?;
        }
        builder.finish()
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// every named type in declaration order
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// root type an operation of `kind` selects against
    pub fn root_type(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => Some(&self.query_type),
            OperationKind::Mutation => self.mutation_type(),
            OperationKind::Subscription => self.subscription_type(),
        }
    }

    /// field `field` of type `type_name`
    pub fn field(&self, type_name: &str, field: &str) -> Option<&FieldDef> {
        self.get(type_name).and_then(|def| def.field(field))
    }

    /// concrete object types a value of `name` can be at runtime
    ///
    /// union members keep their declared order; interface implementors keep
    /// schema declaration order.
    pub fn possible_types(&self, name: &str) -> Vec<&str> {
        match self.get(name) {
            Some(TypeDef::Object(def)) => vec![def.name.as_str()],
            Some(TypeDef::Union(def)) => def.members.iter().map(String::as_str).collect(),
            Some(TypeDef::Interface(def)) => self
                .types
                .values()
                .filter_map(|ty| match ty {
                    TypeDef::Object(obj) if obj.interfaces.contains(&def.name) => {
                        Some(obj.name.as_str())
                    }
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// true if a value of `concrete` may appear where `abstract_type` is expected
    pub fn is_possible_type(&self, abstract_type: &str, concrete: &str) -> bool {
        self.possible_types(abstract_type).contains(&concrete)
    }
}

#[derive(Default)]
struct SchemaBuilder {
    types: IndexMap<String, TypeDef>,
    extensions: Vec<Extension>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

enum Extension {
    Object {
        name: String,
        interfaces: Vec<String>,
        fields: Vec<FieldDef>,
    },
    Interface {
        name: String,
        fields: Vec<FieldDef>,
    },
    Union {
        name: String,
        members: Vec<String>,
    },
    Enum {
        name: String,
        values: Vec<EnumValueDef>,
    },
    InputObject {
        name: String,
        fields: Vec<InputValueDef>,
    },
    Scalar {
        name: String,
    },
}

impl SchemaBuilder {
    fn add_document(&mut self, document: &sdl::Document<'_, String>) -> Result<(), SchemaError> {
        for definition in &document.definitions {
            match definition {
                sdl::Definition::SchemaDefinition(schema) => {
                    if let Some(query) = &schema.query {
                        self.query_type = Some(query.clone());
                    }
                    if let Some(mutation) = &schema.mutation {
                        self.mutation_type = Some(mutation.clone());
                    }
                    if let Some(subscription) = &schema.subscription {
                        self.subscription_type = Some(subscription.clone());
                    }
                }
                sdl::Definition::TypeDefinition(ty) => {
                    let def = convert_type(ty)?;
                    let name = def.name().to_string();
                    if self.types.contains_key(&name) {
                        return Err(SchemaError::DuplicateType(name));
                    }
                    self.types.insert(name, def);
                }
                sdl::Definition::TypeExtension(ext) => self.extensions.push(convert_extension(ext)),
                sdl::Definition::DirectiveDefinition(_) => {}
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Schema, SchemaError> {
        for name in BUILTIN_SCALARS {
            if !self.types.contains_key(name) {
                self.types.insert(
                    name.to_string(),
                    TypeDef::Scalar(ScalarDef {
                        name: name.to_string(),
                        description: None,
                    }),
                );
            }
        }

        for extension in std::mem::take(&mut self.extensions) {
            self.apply_extension(extension)?;
        }

        let query_type = self.query_type.take().unwrap_or_else(|| "Query".to_string());
        let mutation_type = self
            .mutation_type
            .take()
            .or_else(|| self.types.contains_key("Mutation").then(|| "Mutation".to_string()));
        let subscription_type = self.subscription_type.take().or_else(|| {
            self.types
                .contains_key("Subscription")
                .then(|| "Subscription".to_string())
        });

        for root in std::iter::once(&query_type)
            .chain(mutation_type.iter())
            .chain(subscription_type.iter())
        {
            match self.types.get(root) {
                Some(TypeDef::Object(_)) => {}
                Some(_) => return Err(SchemaError::InvalidRoot(root.clone())),
                None => {
                    return Err(SchemaError::UnknownType {
                        name: root.clone(),
                        referenced_by: "schema".to_string(),
                    })
                }
            }
        }

        self.check_references()?;

        Ok(Schema {
            types: self.types,
            query_type,
            mutation_type,
            subscription_type,
        })
    }

    fn apply_extension(&mut self, extension: Extension) -> Result<(), SchemaError> {
        let name = match &extension {
            Extension::Object { name, .. }
            | Extension::Interface { name, .. }
            | Extension::Union { name, .. }
            | Extension::Enum { name, .. }
            | Extension::InputObject { name, .. }
            | Extension::Scalar { name } => name.clone(),
        };
        let target = self
            .types
            .get_mut(&name)
            .ok_or_else(|| SchemaError::UnknownExtension(name.clone()))?;

        match (target, extension) {
            (TypeDef::Object(def), Extension::Object { interfaces, fields, .. }) => {
                def.interfaces.extend(interfaces);
                for field in fields {
                    insert_unique(&mut def.fields, &def.name, field.name.clone(), field)?;
                }
            }
            (TypeDef::Interface(def), Extension::Interface { fields, .. }) => {
                for field in fields {
                    insert_unique(&mut def.fields, &def.name, field.name.clone(), field)?;
                }
            }
            (TypeDef::Union(def), Extension::Union { members, .. }) => def.members.extend(members),
            (TypeDef::Enum(def), Extension::Enum { values, .. }) => def.values.extend(values),
            (TypeDef::InputObject(def), Extension::InputObject { fields, .. }) => {
                for field in fields {
                    insert_unique(&mut def.fields, &def.name, field.name.clone(), field)?;
                }
            }
            (TypeDef::Scalar(_), Extension::Scalar { .. }) => {}
            _ => return Err(SchemaError::ExtensionKindMismatch(name)),
        }
        Ok(())
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        let check = |name: &str, referenced_by: String| {
            if self.types.contains_key(name) {
                Ok(())
            } else {
                Err(SchemaError::UnknownType {
                    name: name.to_string(),
                    referenced_by,
                })
            }
        };

        for def in self.types.values() {
            match def {
                TypeDef::Object(obj) => {
                    for interface in &obj.interfaces {
                        check(interface.as_str(), obj.name.clone())?;
                    }
                    check_fields(&obj.name, &obj.fields, &check)?;
                }
                TypeDef::Interface(iface) => check_fields(&iface.name, &iface.fields, &check)?,
                TypeDef::Union(union) => {
                    for member in &union.members {
                        check(member.as_str(), union.name.clone())?;
                    }
                }
                TypeDef::InputObject(input) => {
                    for field in input.fields.values() {
                        check(field.ty.base_name(), format!("{}.{}", input.name, field.name))?;
                    }
                }
                TypeDef::Scalar(_) | TypeDef::Enum(_) => {}
            }
        }
        Ok(())
    }
}

fn check_fields<F>(owner: &str, fields: &IndexMap<String, FieldDef>, check: &F) -> Result<(), SchemaError>
where
    F: Fn(&str, String) -> Result<(), SchemaError>,
{
    for field in fields.values() {
        check(field.ty.base_name(), format!("{owner}.{}", field.name))?;
        for arg in &field.arguments {
            check(arg.ty.base_name(), format!("{owner}.{}({})", field.name, arg.name))?;
        }
    }
    Ok(())
}

fn insert_unique<V>(
    map: &mut IndexMap<String, V>,
    owner: &str,
    key: String,
    value: V,
) -> Result<(), SchemaError> {
    if map.contains_key(&key) {
        return Err(SchemaError::DuplicateMember {
            type_name: owner.to_string(),
            member: key,
        });
    }
    map.insert(key, value);
    Ok(())
}

fn convert_type(ty: &sdl::TypeDefinition<'_, String>) -> Result<TypeDef, SchemaError> {
    let def = match ty {
        sdl::TypeDefinition::Scalar(scalar) => TypeDef::Scalar(ScalarDef {
            name: scalar.name.clone(),
            description: scalar.description.clone(),
        }),
        sdl::TypeDefinition::Object(obj) => TypeDef::Object(ObjectDef {
            name: obj.name.clone(),
            description: obj.description.clone(),
            interfaces: obj.implements_interfaces.clone(),
            fields: convert_fields(&obj.name, &obj.fields)?,
        }),
        sdl::TypeDefinition::Interface(iface) => TypeDef::Interface(InterfaceDef {
            name: iface.name.clone(),
            description: iface.description.clone(),
            fields: convert_fields(&iface.name, &iface.fields)?,
        }),
        sdl::TypeDefinition::Union(union) => TypeDef::Union(UnionDef {
            name: union.name.clone(),
            description: union.description.clone(),
            members: union.types.clone(),
        }),
        sdl::TypeDefinition::Enum(enum_ty) => TypeDef::Enum(EnumDef {
            name: enum_ty.name.clone(),
            description: enum_ty.description.clone(),
            values: enum_ty.values.iter().map(convert_enum_value).collect(),
        }),
        sdl::TypeDefinition::InputObject(input) => {
            let mut fields = IndexMap::new();
            for field in &input.fields {
                insert_unique(&mut fields, &input.name, field.name.clone(), convert_input_value(field))?;
            }
            TypeDef::InputObject(InputObjectDef {
                name: input.name.clone(),
                description: input.description.clone(),
                fields,
            })
        }
    };
    Ok(def)
}

fn convert_extension(ext: &sdl::TypeExtension<'_, String>) -> Extension {
    match ext {
        sdl::TypeExtension::Object(obj) => Extension::Object {
            name: obj.name.clone(),
            interfaces: obj.implements_interfaces.clone(),
            fields: obj.fields.iter().map(convert_field).collect(),
        },
        sdl::TypeExtension::Interface(iface) => Extension::Interface {
            name: iface.name.clone(),
            fields: iface.fields.iter().map(convert_field).collect(),
        },
        sdl::TypeExtension::Union(union) => Extension::Union {
            name: union.name.clone(),
            members: union.types.clone(),
        },
        sdl::TypeExtension::Enum(enum_ty) => Extension::Enum {
            name: enum_ty.name.clone(),
            values: enum_ty.values.iter().map(convert_enum_value).collect(),
        },
        sdl::TypeExtension::InputObject(input) => Extension::InputObject {
            name: input.name.clone(),
            fields: input.fields.iter().map(convert_input_value).collect(),
        },
        sdl::TypeExtension::Scalar(scalar) => Extension::Scalar {
            name: scalar.name.clone(),
        },
    }
}

fn convert_fields(
    owner: &str,
    fields: &[sdl::Field<'_, String>],
) -> Result<IndexMap<String, FieldDef>, SchemaError> {
    let mut out = IndexMap::new();
    for field in fields {
        insert_unique(&mut out, owner, field.name.clone(), convert_field(field))?;
    }
    Ok(out)
}

fn convert_field(field: &sdl::Field<'_, String>) -> FieldDef {
    FieldDef {
        name: field.name.clone(),
        description: field.description.clone(),
        arguments: field.arguments.iter().map(convert_input_value).collect(),
        ty: TypeRef::from_parsed(&field.field_type),
    }
}

fn convert_input_value(value: &sdl::InputValue<'_, String>) -> InputValueDef {
    InputValueDef {
        name: value.name.clone(),
        description: value.description.clone(),
        ty: TypeRef::from_parsed(&value.value_type),
        has_default: value.default_value.is_some(),
    }
}

fn convert_enum_value(value: &sdl::EnumValue<'_, String>) -> EnumValueDef {
    EnumValueDef {
        name: value.name.clone(),
        description: value.description.clone(),
    }
}
