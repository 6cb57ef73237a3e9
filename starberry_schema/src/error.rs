use std::fmt;

/// Errors raised while building or validating a schema.
///
/// These are configuration errors aimed at whoever writes the schema, not at
/// API callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The referenced type has no field with the given name.
    MissingField { type_name: String, field_name: String },
    /// The field exists but is not a paginated connection.
    NotAConnection { type_name: String, field_name: String },
    /// A type with this name was already registered.
    DuplicateType(String),
    /// Two type sets brought different definitions of the same enum.
    ConflictingEnum(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { type_name, field_name } => {
                write!(f, "Type \"{}\" does not have a field \"{}\".", type_name, field_name)
            }
            Self::NotAConnection { type_name, field_name } => write!(
                f,
                "Field \"{}\" of \"{}\" is not a connection. Expected a connection field.",
                field_name, type_name
            ),
            Self::DuplicateType(name) => write!(f, "Type \"{}\" is already registered.", name),
            Self::ConflictingEnum(name) => {
                write!(f, "Enum \"{}\" is registered with conflicting values.", name)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Raised when a caller reads a field it is not allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionError {
    /// Dotted path of the protected field, e.g. `credentials.github`.
    pub path: String,
}

impl PermissionError {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permission denied: not allowed to read \"{}\".", self.path)
    }
}

impl std::error::Error for PermissionError {}

/// Errors raised while resolving a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    Permission(PermissionError),
    UnknownField { type_name: String, field_name: String },
    InvalidArgument { name: String, reason: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission(err) => write!(f, "{}", err),
            Self::UnknownField { type_name, field_name } => {
                write!(f, "Cannot query field \"{}\" on type \"{}\".", field_name, type_name)
            }
            Self::InvalidArgument { name, reason } => {
                write!(f, "Invalid value for argument \"{}\": {}", name, reason)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Permission(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PermissionError> for ResolveError {
    fn from(err: PermissionError) -> Self {
        Self::Permission(err)
    }
}
