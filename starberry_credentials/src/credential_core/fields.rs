//! Field definitions of the per-provider credential types.

use std::collections::BTreeMap;

use serde_json::Value;
use starberry_schema::{
    ArgumentDefinition, FieldDefinition, FieldKind, FieldResolver, ResolveError, ResolveParams,
    TypeRef,
};

use super::config::CredentialConfig;
use super::picture::{
    facebook_picture_url, google_picture_url, twitter_picture_url, TwitterPictureSize,
};
use super::types::Provider;

/// Fields every credential type has: `accessToken`, `displayName` and `id`.
pub fn credential_base_fields(provider_display_name: &str) -> BTreeMap<String, FieldDefinition> {
    [
        FieldDefinition::new("accessToken", TypeRef::named("String")).description(format!(
            "The OAuth access token obtained for the {} user during authentication.",
            provider_display_name
        )),
        FieldDefinition::new("displayName", TypeRef::named("String"))
            .description(format!("The {} user's full name.", provider_display_name)),
        FieldDefinition::new("id", TypeRef::named("String"))
            .description(format!("The {} user's ID.", provider_display_name))
            .unique(),
    ]
    .into_iter()
    .map(|field| (field.name.clone(), field))
    .collect()
}

/// Name of the Twitter picture size enum under `prefix`.
pub fn twitter_picture_size_enum_name(prefix: &str) -> String {
    format!("{}TwitterPictureSize", prefix)
}

/// Base fields merged with the extras of `provider`.
pub fn provider_fields(
    provider: Provider,
    config: &CredentialConfig,
) -> BTreeMap<String, FieldDefinition> {
    let name = provider.display_name();
    let mut fields = credential_base_fields(name);
    let extras = match provider {
        Provider::Auth0 => vec![email_field(name), stored_picture_field(name)],
        Provider::Facebook => vec![email_field(name), facebook_picture_field(name, config)],
        Provider::Github => vec![email_field(name), username_field(name)],
        Provider::Google => vec![email_field(name), google_picture_field(name)],
        Provider::Twitter => vec![
            FieldDefinition::new("accessTokenSecret", TypeRef::named("String")).description(
                format!(
                    "The OAuth token secret obtained for the {} user during authentication.",
                    name
                ),
            ),
            username_field(name),
            twitter_picture_field(name, config),
        ],
    };
    for field in extras {
        fields.insert(field.name.clone(), field);
    }
    fields
}

fn email_field(name: &str) -> FieldDefinition {
    FieldDefinition::new("email", TypeRef::named("String"))
        .description(format!("The {} user's email address.", name))
}

fn username_field(name: &str) -> FieldDefinition {
    FieldDefinition::new("username", TypeRef::named("String"))
        .description(format!("The {} user's username.", name))
}

fn stored_picture_field(name: &str) -> FieldDefinition {
    FieldDefinition::new("picture", TypeRef::named("String"))
        .description(format!("The URL of the {} user's profile picture.", name))
}

fn google_picture_field(name: &str) -> FieldDefinition {
    FieldDefinition::new("picture", TypeRef::named("String"))
        .description(format!(
            "The URL of the {} user's profile picture. The optional `size` \
             argument sets the width and height in pixels.",
            name
        ))
        .argument(
            ArgumentDefinition::new("size", TypeRef::named("Int"))
                .description("Width and height of the picture in pixels."),
        )
        .resolver(FieldResolver::new(|params| {
            let size = int_arg(params, "size")?;
            Ok(map_stored_picture(params.parent, |url| google_picture_url(url, size)))
        }))
}

fn twitter_picture_field(name: &str, config: &CredentialConfig) -> FieldDefinition {
    let size_enum = twitter_picture_size_enum_name(&config.type_prefix);
    FieldDefinition::new("picture", TypeRef::named("String"))
        .description(format!(
            "The URL of the {} user's profile picture in the requested `size`.",
            name
        ))
        .argument(
            ArgumentDefinition::new("size", TypeRef::named(size_enum))
                .description("Size of the picture. Defaults to the original upload.")
                .default_value(TwitterPictureSize::default().as_str()),
        )
        .resolver(FieldResolver::new(|params| {
            let size = match params.arg("size") {
                None => TwitterPictureSize::default(),
                Some(Value::String(s)) => s
                    .parse::<TwitterPictureSize>()
                    .map_err(|reason| invalid("size", reason))?,
                Some(other) => {
                    return Err(invalid("size", format!("expected an enum value, got {}", other)));
                }
            };
            Ok(map_stored_picture(params.parent, |url| twitter_picture_url(url, size)))
        }))
}

fn facebook_picture_field(name: &str, config: &CredentialConfig) -> FieldDefinition {
    let graph_url = config.facebook_graph_url.clone();
    FieldDefinition::new("picture", TypeRef::named("String"))
        .description(format!(
            "The URL of the {} user's profile picture. `width` and `height` \
             are passed on to the Graph API.",
            name
        ))
        .argument(
            ArgumentDefinition::new("width", TypeRef::named("Int"))
                .description("Requested width in pixels."),
        )
        .argument(
            ArgumentDefinition::new("height", TypeRef::named("Int"))
                .description("Requested height in pixels."),
        )
        .resolver(FieldResolver::new(move |params| {
            let width = int_arg(params, "width")?;
            let height = int_arg(params, "height")?;
            let id = match params.parent.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => return Ok(Value::Null),
            };
            Ok(Value::String(facebook_picture_url(&graph_url, &id, width, height)))
        }))
}

/// Applies `transform` to the stored `picture` string. Missing or null values
/// resolve to null and non-strings are returned unchanged.
fn map_stored_picture(parent: &Value, transform: impl FnOnce(&str) -> String) -> Value {
    match parent.get("picture") {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(url)) => Value::String(transform(url)),
        Some(other) => other.clone(),
    }
}

/// Reads an `Int` argument. Any integer is accepted and passed through as is.
fn int_arg(params: &ResolveParams<'_>, name: &str) -> Result<Option<i64>, ResolveError> {
    match params.arg(name) {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(name, format!("expected an integer, got {}", value))),
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> ResolveError {
    ResolveError::InvalidArgument { name: name.to_string(), reason: reason.into() }
}

/// Field on the credential collection type pointing at `provider`'s type.
pub(crate) fn collection_field(provider: Provider, prefix: &str) -> FieldDefinition {
    FieldDefinition::new(provider.key(), TypeRef::named(provider.type_name(prefix)))
        .description(format!(
            "The {} credentials of the user. Only the user and admins can read them.",
            provider.display_name()
        ))
        .kind(FieldKind::Object)
}
