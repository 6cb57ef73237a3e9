use percent_encoding::{percent_decode, percent_encode, NON_ALPHANUMERIC, AsciiSet};

/// Custom encode set for application/x-www-form-urlencoded allowing unreserved characters including hyphens
const FORM_URLENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encodes a string for URL safety and returns an owned `String`
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::encode_url_owned;
/// let encoded = encode_url_owned("Hello World!");
/// assert_eq!(encoded, "Hello%20World%21");
/// ```
pub fn encode_url_owned(input: &str) -> String {
    percent_encode(input.as_bytes(), FORM_URLENCODE_SET).to_string()
}

/// Decodes a URL-encoded string and returns an owned `String`.
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::decode_url_owned;
/// assert_eq!(decode_url_owned("a%20b%2Fc"), "a b/c");
/// ```
pub fn decode_url_owned(input: &str) -> String {
    percent_decode(input.as_bytes())
        .decode_utf8_lossy()
        .into_owned()
}

/// The three textual parts of a URL that query rewriting cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Everything before the `?` (scheme, authority and path).
    pub base: &'a str,
    /// Raw query string without the leading `?`.
    pub query: Option<&'a str>,
    /// Raw fragment without the leading `#`.
    pub fragment: Option<&'a str>,
}

/// Splits a URL into base, query and fragment without decoding anything.
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::split_url;
/// let parts = split_url("https://a.example/p?x=1#top");
/// assert_eq!(parts.base, "https://a.example/p");
/// assert_eq!(parts.query, Some("x=1"));
/// assert_eq!(parts.fragment, Some("top"));
/// ```
pub fn split_url(url: &str) -> UrlParts<'_> {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let (base, query) = match rest.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (rest, None),
    };
    UrlParts { base, query, fragment }
}

/// Returns true when `url` starts with a `scheme://` prefix followed by something.
pub fn is_absolute_url(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_alpha
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        && !rest.is_empty()
}

/// Encodes ordered pairs into a query string (without the leading `?`).
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::encode_query;
/// assert_eq!(encode_query([("width", "50"), ("height", "50")]), "width=50&height=50");
/// ```
pub fn encode_query<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", encode_url_owned(k.as_ref()), encode_url_owned(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sets (`Some`) or removes (`None`) a single query parameter on an absolute URL.
///
/// Untouched parameters keep their original raw encoding and order. An existing
/// parameter is replaced in place and any duplicates of it are dropped. A new one
/// is appended. The `?` disappears when the query ends up empty. The fragment is
/// kept.
///
/// Returns `None` if `url` is not absolute.
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::with_query_param;
/// let url = "https://lh3.googleusercontent.com/a/photo?sz=50";
/// assert_eq!(
///     with_query_param(url, "sz", Some("100")).as_deref(),
///     Some("https://lh3.googleusercontent.com/a/photo?sz=100"),
/// );
/// assert_eq!(
///     with_query_param(url, "sz", None).as_deref(),
///     Some("https://lh3.googleusercontent.com/a/photo"),
/// );
/// ```
pub fn with_query_param(url: &str, key: &str, value: Option<&str>) -> Option<String> {
    if !is_absolute_url(url) {
        return None;
    }
    let parts = split_url(url);
    let replacement = value.map(|v| encode_query([(key, v)]));

    let mut segments: Vec<String> = Vec::new();
    let mut replaced = false;
    for segment in parts.query.unwrap_or("").split('&').filter(|s| !s.is_empty()) {
        let raw_key = segment.split_once('=').map_or(segment, |(k, _)| k);
        if decode_form_component(raw_key) != key {
            segments.push(segment.to_string());
            continue;
        }
        if let Some(replacement) = &replacement {
            if !replaced {
                segments.push(replacement.clone());
                replaced = true;
            }
        }
    }
    if let (Some(replacement), false) = (replacement, replaced) {
        segments.push(replacement);
    }

    let mut result = String::with_capacity(url.len() + 16);
    result.push_str(parts.base);
    if !segments.is_empty() {
        result.push('?');
        result.push_str(&segments.join("&"));
    }
    if let Some(fragment) = parts.fragment {
        result.push('#');
        result.push_str(fragment);
    }
    Some(result)
}

fn decode_form_component(input: &str) -> String {
    decode_url_owned(&input.replace('+', " "))
}
