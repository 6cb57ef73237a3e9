//! Schema model: types, fields, arguments, enums and the registry that holds them.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::{ResolveError, SchemaError};
use crate::resolve::{FieldResolver, ResolveContext, ResolveParams};

/// Reference to a type as written in a field or argument signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    /// Name of the innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::NonNull(inner) | Self::List(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{}", name),
            Self::NonNull(inner) => write!(f, "{}!", inner),
            Self::List(inner) => write!(f, "[{}]", inner),
        }
    }
}

/// What a field represents. Validation rules look at this tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Enum,
    Object,
    List,
    /// Paginated edge collection of `target` records.
    Connection { target: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arg_type: TypeRef,
    pub default_value: Option<Value>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, arg_type: TypeRef) -> Self {
        Self { name: name.into(), description: None, arg_type, default_value: None }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A single field of an object type.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub field_type: TypeRef,
    pub kind: FieldKind,
    pub args: Vec<ArgumentDefinition>,
    /// Hint that values are unique within their scope. Not enforced here.
    pub unique: bool,
    pub resolver: Option<FieldResolver>,
}

impl FieldDefinition {
    /// Creates a scalar field of the given type.
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            field_type,
            kind: FieldKind::Scalar,
            args: Vec::new(),
            unique: false,
            resolver: None,
        }
    }

    /// Creates a connection field pointing at `target`, typed `<target>Connection`.
    pub fn connection(name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        Self::new(name, TypeRef::named(format!("{}Connection", target)))
            .kind(FieldKind::Connection { target })
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn argument(mut self, arg: ArgumentDefinition) -> Self {
        self.args.push(arg);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn resolver(mut self, resolver: FieldResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn is_connection(&self) -> bool {
        matches!(self.kind, FieldKind::Connection { .. })
    }

    pub fn argument_definition(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.args.iter().find(|arg| arg.name == name)
    }

    /// Resolves this field on `parent`.
    ///
    /// Unknown arguments are rejected. Declared defaults fill in missing
    /// arguments, but an explicit `null` is kept. Without a resolver the value is
    /// read from `parent[name]`, or `null` when absent.
    pub fn resolve(
        &self,
        parent: &Value,
        args: &Map<String, Value>,
        context: &ResolveContext,
    ) -> Result<Value, ResolveError> {
        if let Some(unknown) = args.keys().find(|name| self.argument_definition(name).is_none()) {
            return Err(ResolveError::InvalidArgument {
                name: unknown.clone(),
                reason: format!("field \"{}\" takes no such argument", self.name),
            });
        }

        let mut effective = args.clone();
        for arg in &self.args {
            if let Some(default) = &arg.default_value {
                effective.entry(arg.name.clone()).or_insert_with(|| default.clone());
            }
        }

        match &self.resolver {
            Some(resolver) => resolver.call(&ResolveParams { parent, args: &effective, context }),
            None => Ok(parent.get(&self.name).cloned().unwrap_or(Value::Null)),
        }
    }
}

/// An object type and its fields.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub fields: BTreeMap<String, FieldDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None, fields: BTreeMap::new() }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field, replacing any earlier field with the same name.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldDefinition>,
    {
        for field in fields {
            self.fields.insert(field.name.clone(), field);
        }
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[instrument(skip(self, parent, args, context), fields(type_name = %self.name), level = "debug")]
    pub fn resolve_field(
        &self,
        field_name: &str,
        parent: &Value,
        args: &Map<String, Value>,
        context: &ResolveContext,
    ) -> Result<Value, ResolveError> {
        let field = self.get_field(field_name).ok_or_else(|| ResolveError::UnknownField {
            type_name: self.name.clone(),
            field_name: field_name.to_string(),
        })?;
        field.resolve(parent, args, context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None, values: Vec::new() }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(mut self, name: impl Into<String>, description: Option<&str>) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            description: description.map(str::to_string),
        });
        self
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.values.iter().any(|v| v.name == name)
    }
}

/// A type definition bundled with the enums it needs to be registered.
#[derive(Debug, Clone)]
pub struct TypeSet {
    pub type_definition: TypeDefinition,
    pub enums: Vec<EnumDefinition>,
}

impl TypeSet {
    pub fn new(type_definition: TypeDefinition) -> Self {
        Self { type_definition, enums: Vec::new() }
    }

    pub fn with_enum(mut self, definition: EnumDefinition) -> Self {
        self.enums.push(definition);
        self
    }

    pub fn name(&self) -> &str {
        &self.type_definition.name
    }
}

/// All registered types and enums, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    types: BTreeMap<String, TypeDefinition>,
    enums: BTreeMap<String, EnumDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema from type sets, failing on the first conflict.
    pub fn from_type_sets<I>(type_sets: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = TypeSet>,
    {
        let mut schema = Self::new();
        schema.register_all(type_sets)?;
        Ok(schema)
    }

    /// Registers one type set. Nothing is inserted if it conflicts with what is
    /// already registered.
    pub fn register(&mut self, type_set: TypeSet) -> Result<(), SchemaError> {
        let name = type_set.type_definition.name.clone();
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateType(name));
        }
        for (i, definition) in type_set.enums.iter().enumerate() {
            let clashes_within_set = type_set.enums[..i]
                .iter()
                .any(|earlier| earlier.name == definition.name && earlier != definition);
            let clashes_with_schema = self
                .enums
                .get(&definition.name)
                .is_some_and(|existing| existing != definition);
            if clashes_within_set || clashes_with_schema {
                return Err(SchemaError::ConflictingEnum(definition.name.clone()));
            }
        }

        for definition in type_set.enums {
            self.enums.entry(definition.name.clone()).or_insert(definition);
        }
        debug!(type_name = %name, "registered type");
        self.types.insert(name, type_set.type_definition);
        Ok(())
    }

    pub fn register_all<I>(&mut self, type_sets: I) -> Result<(), SchemaError>
    where
        I: IntoIterator<Item = TypeSet>,
    {
        for type_set in type_sets {
            self.register(type_set)?;
        }
        Ok(())
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(name)
    }

    pub fn types(&self) -> &BTreeMap<String, TypeDefinition> {
        &self.types
    }

    pub fn enums(&self) -> &BTreeMap<String, EnumDefinition> {
        &self.enums
    }
}
