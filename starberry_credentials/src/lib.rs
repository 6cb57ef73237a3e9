pub mod credential_core;

pub use credential_core::access::{
    resolve_credential_field, resolve_credential_value, CredentialPolicy, OwnerOrAdmin,
};
pub use credential_core::config::{ConfigError, CredentialConfig};
pub use credential_core::fields::{credential_base_fields, provider_fields};
pub use credential_core::picture::{
    facebook_picture_url, google_picture_url, twitter_picture_url, TwitterPictureSize,
    DEFAULT_FACEBOOK_GRAPH_URL,
};
pub use credential_core::registry::CredentialRegistry;
pub use credential_core::types::{
    CredentialCollection, CredentialRecord, Provider, UnknownProvider, UserRecord, NODE_KEY,
};
pub use starberry_schema::{PermissionError, Viewer};
