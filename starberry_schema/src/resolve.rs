//! Resolution context and resolver handles.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Identity of the caller issuing a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    /// Admins can read every user's data.
    #[serde(default)]
    pub is_admin: bool,
    /// Node id of the signed-in user, if any.
    #[serde(default, rename = "userID")]
    pub user_id: Option<String>,
}

impl Viewer {
    pub fn admin() -> Self {
        Self { is_admin: true, user_id: None }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self { is_admin: false, user_id: Some(user_id.into()) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Per-request data handed to every resolver.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    pub viewer: Viewer,
}

impl ResolveContext {
    pub fn new(viewer: Viewer) -> Self {
        Self { viewer }
    }
}

/// Arguments of a single resolver invocation.
#[derive(Debug, Clone, Copy)]
pub struct ResolveParams<'a> {
    /// The object the field is read from.
    pub parent: &'a Value,
    /// Field arguments with declared defaults already applied.
    pub args: &'a Map<String, Value>,
    pub context: &'a ResolveContext,
}

impl<'a> ResolveParams<'a> {
    /// Returns the argument value, treating explicit `null` as absent.
    pub fn arg(&self, name: &str) -> Option<&'a Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }
}

type ResolveFn = dyn Fn(&ResolveParams<'_>) -> Result<Value, ResolveError> + Send + Sync;

/// Shared handle to a field resolver function.
#[derive(Clone)]
pub struct FieldResolver(Arc<ResolveFn>);

impl FieldResolver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ResolveParams<'_>) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, params: &ResolveParams<'_>) -> Result<Value, ResolveError> {
        (self.0)(params)
    }
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldResolver(..)")
    }
}
