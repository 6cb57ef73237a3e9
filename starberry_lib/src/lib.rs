#[cfg(feature = "url_encoding")]
pub mod url_encoding;

#[cfg(feature = "url_encoding")]
pub use url_encoding::{
    decode_url_owned, encode_query, encode_url_owned, is_absolute_url, split_url,
    with_query_param, UrlParts,
};
