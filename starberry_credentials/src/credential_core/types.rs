//! Providers and the credential records stored for them.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which a credential collection value carries its owning user.
pub const NODE_KEY: &str = "__node";

/// Identity providers a user can authenticate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Auth0,
    Facebook,
    Github,
    Google,
    Twitter,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Auth0,
        Provider::Facebook,
        Provider::Github,
        Provider::Google,
        Provider::Twitter,
    ];

    /// Field name on the credential collection, e.g. `github`.
    pub fn key(&self) -> &'static str {
        match self {
            Provider::Auth0 => "auth0",
            Provider::Facebook => "facebook",
            Provider::Github => "github",
            Provider::Google => "google",
            Provider::Twitter => "twitter",
        }
    }

    /// Human-readable name used in field descriptions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Auth0 => "Auth0",
            Provider::Facebook => "Facebook",
            Provider::Github => "GitHub",
            Provider::Google => "Google",
            Provider::Twitter => "Twitter",
        }
    }

    /// Schema type name of this provider's credential, e.g. `GithubCredential`.
    pub fn type_name(&self, prefix: &str) -> String {
        let stem = match self {
            Provider::Auth0 => "Auth0",
            Provider::Facebook => "Facebook",
            Provider::Github => "Github",
            Provider::Google => "Google",
            Provider::Twitter => "Twitter",
        };
        format!("{}{}Credential", prefix, stem)
    }

    /// Path reported when a read of this provider's credential is denied.
    pub fn field_path(&self) -> String {
        format!("credentials.{}", self.key())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown identity provider \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Profile data stored when a user authenticates with a provider.
///
/// Set once at authentication time. The schema layer only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    access_token: String,
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token_secret: Option<String>,
}

impl CredentialRecord {
    pub fn new(id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            id: id.into(),
            display_name: None,
            email: None,
            picture: None,
            username: None,
            access_token_secret: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_access_token_secret(mut self, secret: impl Into<String>) -> Self {
        self.access_token_secret = Some(secret.into());
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn access_token_secret(&self) -> Option<&str> {
        self.access_token_secret.as_deref()
    }

    /// The record as a resolver parent, keyed like its serialized form.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("accessToken".to_string(), Value::String(self.access_token.clone()));
        object.insert("id".to_string(), Value::String(self.id.clone()));
        let optional = [
            ("displayName", &self.display_name),
            ("email", &self.email),
            ("picture", &self.picture),
            ("username", &self.username),
            ("accessTokenSecret", &self.access_token_secret),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                object.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        Value::Object(object)
    }
}

/// At most one credential record per provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth0: Option<CredentialRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facebook: Option<CredentialRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github: Option<CredentialRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google: Option<CredentialRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    twitter: Option<CredentialRecord>,
}

impl CredentialCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collection with `record` stored for `provider`.
    pub fn with(mut self, provider: Provider, record: CredentialRecord) -> Self {
        *self.slot_mut(provider) = Some(record);
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&CredentialRecord> {
        match provider {
            Provider::Auth0 => self.auth0.as_ref(),
            Provider::Facebook => self.facebook.as_ref(),
            Provider::Github => self.github.as_ref(),
            Provider::Google => self.google.as_ref(),
            Provider::Twitter => self.twitter.as_ref(),
        }
    }

    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        Provider::ALL.into_iter().filter(|p| self.get(*p).is_some())
    }

    fn slot_mut(&mut self, provider: Provider) -> &mut Option<CredentialRecord> {
        match provider {
            Provider::Auth0 => &mut self.auth0,
            Provider::Facebook => &mut self.facebook,
            Provider::Github => &mut self.github,
            Provider::Google => &mut self.google,
            Provider::Twitter => &mut self.twitter,
        }
    }
}

/// A user node together with its provider credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "id")]
    pub node_id: String,
    #[serde(default)]
    pub credentials: CredentialCollection,
}

impl UserRecord {
    pub fn new(node_id: impl Into<String>, credentials: CredentialCollection) -> Self {
        Self { node_id: node_id.into(), credentials }
    }

    /// The credential collection as a resolver parent: provider records plus a
    /// `__node` entry naming the owning user.
    pub fn credentials_value(&self) -> Value {
        let mut object: Map<String, Value> = Provider::ALL
            .into_iter()
            .filter_map(|provider| {
                let record = self.credentials.get(provider)?;
                Some((provider.key().to_string(), record.to_value()))
            })
            .collect();
        let mut node = Map::new();
        node.insert("id".to_string(), Value::String(self.node_id.clone()));
        object.insert(NODE_KEY.to_string(), Value::Object(node));
        Value::Object(object)
    }
}

/// Reads the owning user's node id from a credential collection value.
///
/// The id is opaque: numeric ids are read in their decimal form.
pub fn owner_id(parent: &Value) -> Option<Cow<'_, str>> {
    match parent.get(NODE_KEY)?.get("id")? {
        Value::String(id) => Some(Cow::Borrowed(id.as_str())),
        Value::Number(id) => Some(Cow::Owned(id.to_string())),
        _ => None,
    }
}
