//! Credential types for social login providers and connection-field
//! validation, assembled into a starberry schema.

pub mod logging;

pub use starberry_credentials as credentials;
pub use starberry_lib as util;
pub use starberry_schema as schema;

pub use logging::init_tracing;
pub use starberry_credentials::{CredentialConfig, CredentialRegistry, Provider, UserRecord};
pub use starberry_schema::{Rule, RuleOutcome, RuleSet, Schema, SchemaError, Viewer};

use tracing::info;

/// Registers every credential type set of `registry` into a fresh schema.
pub fn credential_schema(registry: &CredentialRegistry) -> Result<Schema, SchemaError> {
    let schema = Schema::from_type_sets(registry.type_sets())?;
    info!(
        types = schema.types().len(),
        prefix = %registry.settings().type_prefix,
        "credential schema ready"
    );
    Ok(schema)
}
