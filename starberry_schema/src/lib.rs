pub mod error;
pub mod predicate;
pub mod resolve;
pub mod rule;
pub mod schema;

pub use error::{PermissionError, ResolveError, SchemaError};
pub use predicate::{ConnectionPredicate, KindPredicate};
pub use resolve::{FieldResolver, ResolveContext, ResolveParams, Viewer};
pub use rule::{Rule, RuleOutcome, RuleParameters, RuleSet};
pub use schema::{
    ArgumentDefinition, EnumDefinition, EnumValue, FieldDefinition, FieldKind, Schema,
    TypeDefinition, TypeRef, TypeSet,
};
