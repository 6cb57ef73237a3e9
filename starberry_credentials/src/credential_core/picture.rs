//! Profile picture URL transforms.
//!
//! Each provider has its own convention for asking for a resized avatar. The
//! output has to match those conventions byte for byte:
//!
//! * Google: the `sz` query parameter.
//! * Twitter: the `_normal.` suffix in the image file name.
//! * Facebook: the Graph API `/<id>/picture` endpoint with `width`/`height`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use starberry_lib::{encode_query, encode_url_owned, with_query_param};
use starberry_schema::EnumDefinition;
use tracing::debug;

pub const DEFAULT_FACEBOOK_GRAPH_URL: &str = "https://graph.facebook.com/v2.3";

static TWITTER_NORMAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_normal\.").expect("valid twitter suffix pattern"));

/// Avatar sizes Twitter serves for a profile image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwitterPictureSize {
    /// 48x48
    Normal,
    /// 73x73
    Bigger,
    /// 24x24
    Mini,
    /// The uploaded image
    #[default]
    Original,
}

impl TwitterPictureSize {
    pub const ALL: [TwitterPictureSize; 4] = [
        TwitterPictureSize::Normal,
        TwitterPictureSize::Bigger,
        TwitterPictureSize::Mini,
        TwitterPictureSize::Original,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TwitterPictureSize::Normal => "normal",
            TwitterPictureSize::Bigger => "bigger",
            TwitterPictureSize::Mini => "mini",
            TwitterPictureSize::Original => "original",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            TwitterPictureSize::Normal => "48px by 48px",
            TwitterPictureSize::Bigger => "73px by 73px",
            TwitterPictureSize::Mini => "24px by 24px",
            TwitterPictureSize::Original => "The original size of the uploaded image",
        }
    }

    /// The schema enum listing every size.
    pub fn enum_definition(name: impl Into<String>) -> EnumDefinition {
        Self::ALL.into_iter().fold(
            EnumDefinition::new(name).description("Size of a Twitter profile picture."),
            |definition, size| definition.value(size.as_str(), Some(size.describe())),
        )
    }
}

impl fmt::Display for TwitterPictureSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TwitterPictureSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| format!("expected one of normal, bigger, mini, original; got \"{}\"", s))
    }
}

/// Sets the Google `sz` parameter, or removes it when `size` is `None`.
///
/// A stored value that is not an absolute URL comes back unchanged.
pub fn google_picture_url(stored: &str, size: Option<i64>) -> String {
    let size = size.map(|s| s.to_string());
    match with_query_param(stored, "sz", size.as_deref()) {
        Some(url) => url,
        None => {
            debug!(url = stored, "google picture is not an absolute url, returning as stored");
            stored.to_string()
        }
    }
}

/// Rewrites the `_normal.` token of a Twitter avatar URL for `size`.
///
/// `original` strips the token. URLs without the token come back unchanged.
pub fn twitter_picture_url(stored: &str, size: TwitterPictureSize) -> String {
    let replacement = match size {
        TwitterPictureSize::Original => ".".to_string(),
        other => format!("_{}.", other),
    };
    TWITTER_NORMAL_SUFFIX
        .replace(stored, NoExpand(&replacement))
        .into_owned()
}

/// Builds the Graph API picture URL for a Facebook user id.
pub fn facebook_picture_url(
    graph_url: &str,
    id: &str,
    width: Option<i64>,
    height: Option<i64>,
) -> String {
    let mut url = format!("{}/{}/picture", graph_url.trim_end_matches('/'), encode_url_owned(id));
    let query: Vec<(&str, String)> = [("width", width), ("height", height)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v.to_string())))
        .collect();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&encode_query(query));
    }
    url
}
