mod digest;
mod encoding;
mod query;
mod utf8;

pub use digest::md5_hex;
pub use encoding::{decode_base64, encode_base64};
pub use query::{QueryParams, URI_COMPONENT, encode_uri_component};
pub use utf8::{decode_utf8_legacy, encode_utf8_legacy};
