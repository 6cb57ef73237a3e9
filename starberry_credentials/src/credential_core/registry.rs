use std::sync::Arc;

use starberry_schema::{FieldResolver, PermissionError, TypeDefinition, TypeSet, Viewer};
use tracing::debug;

use super::access::{
    resolve_credential_field, resolve_credential_value, CredentialPolicy, OwnerOrAdmin,
};
use super::config::CredentialConfig;
use super::fields::{collection_field, provider_fields, twitter_picture_size_enum_name};
use super::picture::TwitterPictureSize;
use super::types::{CredentialRecord, Provider, UserRecord};

/// Produces the credential type sets with a configurable prefix and access policy.
#[derive(Clone)]
pub struct CredentialRegistry {
    config: CredentialConfig,
    policy: Arc<dyn CredentialPolicy>,
}

impl CredentialRegistry {
    /// Creates a registry with default settings and the [`OwnerOrAdmin`] policy.
    pub fn new() -> Self {
        CredentialRegistry {
            config: CredentialConfig::default(),
            policy: Arc::new(OwnerOrAdmin),
        }
    }

    pub fn from_config(config: CredentialConfig) -> Self {
        Self::new().config(config)
    }

    /// Replaces all settings.
    pub fn config(mut self, config: CredentialConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the type name prefix.
    pub fn type_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.type_prefix = prefix.into();
        self
    }

    /// Overrides the Graph API base used for Facebook pictures.
    pub fn facebook_graph_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.facebook_graph_url = url.into();
        self
    }

    /// Sets a custom access policy.
    pub fn policy(mut self, policy: Arc<dyn CredentialPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn settings(&self) -> &CredentialConfig {
        &self.config
    }

    pub fn collection_type_name(&self) -> String {
        format!("{}CredentialCollection", self.config.type_prefix)
    }

    pub fn provider_type_name(&self, provider: Provider) -> String {
        provider.type_name(&self.config.type_prefix)
    }

    /// The type set of a single provider's credential type.
    pub fn provider_type(&self, provider: Provider) -> TypeSet {
        let definition = TypeDefinition::new(self.provider_type_name(provider))
            .description(format!(
                "The credentials of a user who authenticated with {}.",
                provider.display_name()
            ))
            .fields(provider_fields(provider, &self.config).into_values());
        match provider {
            Provider::Twitter => TypeSet::new(definition).with_enum(
                TwitterPictureSize::enum_definition(twitter_picture_size_enum_name(
                    &self.config.type_prefix,
                )),
            ),
            _ => TypeSet::new(definition),
        }
    }

    /// The aggregate type with one permission-checked field per provider.
    pub fn collection_type(&self) -> TypeSet {
        let prefix = &self.config.type_prefix;
        let fields = Provider::ALL.into_iter().map(|provider| {
            let policy = self.policy.clone();
            collection_field(provider, prefix).resolver(FieldResolver::new(move |params| {
                Ok(resolve_credential_value(
                    params.parent,
                    &params.context.viewer,
                    provider,
                    policy.as_ref(),
                )?)
            }))
        });
        TypeSet::new(
            TypeDefinition::new(self.collection_type_name())
                .description("The credentials of a user, one entry per identity provider.")
                .fields(fields),
        )
    }

    /// The collection type followed by one type per provider.
    pub fn type_sets(&self) -> Vec<TypeSet> {
        let mut sets = vec![self.collection_type()];
        sets.extend(Provider::ALL.into_iter().map(|provider| self.provider_type(provider)));
        debug!(count = sets.len(), prefix = %self.config.type_prefix, "built credential type sets");
        sets
    }

    /// Reads `user`'s credential for `provider` through this registry's policy.
    pub fn resolve<'u>(
        &self,
        user: &'u UserRecord,
        viewer: &Viewer,
        provider: Provider,
    ) -> Result<Option<&'u CredentialRecord>, PermissionError> {
        resolve_credential_field(user, viewer, provider, self.policy.as_ref())
    }
}

impl Default for CredentialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CredentialRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
