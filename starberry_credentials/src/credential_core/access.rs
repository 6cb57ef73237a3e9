//! The only way to read a user's provider credentials.

use serde_json::Value;
use starberry_schema::{PermissionError, Viewer};
use tracing::{debug, instrument, warn};

use super::types::{owner_id, CredentialRecord, Provider, UserRecord};

/// Decides whether a viewer may read credentials owned by `owner_id`.
///
/// `owner_id` is `None` when the owning user cannot be determined.
pub trait CredentialPolicy: Send + Sync + 'static {
    fn allows(&self, viewer: &Viewer, owner_id: Option<&str>) -> bool;
}

/// Admins may read everything. Other viewers may read only their own credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrAdmin;

impl CredentialPolicy for OwnerOrAdmin {
    fn allows(&self, viewer: &Viewer, owner_id: Option<&str>) -> bool {
        viewer.is_admin || (owner_id.is_some() && viewer.user_id.as_deref() == owner_id)
    }
}

fn authorize(
    policy: &dyn CredentialPolicy,
    viewer: &Viewer,
    owner_id: Option<&str>,
    provider: Provider,
) -> Result<(), PermissionError> {
    if policy.allows(viewer, owner_id) {
        debug!(provider = %provider, "credential read allowed");
        return Ok(());
    }
    let path = provider.field_path();
    warn!(
        path = %path,
        viewer = ?viewer.user_id,
        owner = ?owner_id,
        "credential read denied"
    );
    Err(PermissionError::new(path))
}

/// Returns `user`'s credential for `provider` if `policy` lets `viewer` read it.
///
/// `Ok(None)` means the read is allowed but the user never authenticated with
/// that provider.
#[instrument(skip(user, viewer, policy), fields(owner = %user.node_id), level = "debug")]
pub fn resolve_credential_field<'u>(
    user: &'u UserRecord,
    viewer: &Viewer,
    provider: Provider,
    policy: &dyn CredentialPolicy,
) -> Result<Option<&'u CredentialRecord>, PermissionError> {
    authorize(policy, viewer, Some(&user.node_id), provider)?;
    Ok(user.credentials.get(provider))
}

/// Value form of [`resolve_credential_field`] used by the collection resolvers.
///
/// `parent` is a credential collection value as built by
/// [`UserRecord::credentials_value`]. A missing record resolves to `null`.
pub fn resolve_credential_value(
    parent: &Value,
    viewer: &Viewer,
    provider: Provider,
    policy: &dyn CredentialPolicy,
) -> Result<Value, PermissionError> {
    let owner = owner_id(parent);
    authorize(policy, viewer, owner.as_deref(), provider)?;
    Ok(parent.get(provider.key()).cloned().unwrap_or(Value::Null))
}
