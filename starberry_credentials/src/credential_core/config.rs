use std::fmt;

use serde::{Deserialize, Serialize};

use super::picture::DEFAULT_FACEBOOK_GRAPH_URL;

/// Settings for the generated credential types. Every key is optional.
///
/// ```json
/// { "typePrefix": "App", "facebookGraphUrl": "https://graph.facebook.com/v2.3" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialConfig {
    /// Prepended to every generated type and enum name.
    pub type_prefix: String,
    /// Graph API base used for Facebook profile pictures.
    pub facebook_graph_url: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            type_prefix: String::new(),
            facebook_graph_url: DEFAULT_FACEBOOK_GRAPH_URL.to_string(),
        }
    }
}

impl CredentialConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "Invalid credential config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
