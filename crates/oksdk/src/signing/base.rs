use crate::codec::{encode_utf8_legacy, md5_hex};
use crate::params::Params;

/// Keys that never contribute to a request signature. `sig` is the output
/// itself; `access_token` travels outside the signed base even when it is
/// the active credential.
pub const EXCLUDED_KEYS: [&str; 2] = ["sig", "access_token"];

/// Namespace marker for widget link arguments.
pub const WIDGET_ARG_PREFIX: &str = "st.";

/// The only widget arguments covered by `st.signature`.
pub const WIDGET_SIGNED_ARGS: [&str; 4] = ["st.attachment", "st.return", "st.redirect_uri", "st.state"];

/// Sorted `key=value` pairs with no delimiter, excluded keys skipped, the
/// secret appended.
pub fn signature_base(params: &Params, secret: &str) -> String {
    let mut base = String::new();
    for (key, value) in params.iter() {
        if !EXCLUDED_KEYS.contains(&key) {
            base.push_str(key);
            base.push('=');
            base.push_str(&value.to_string());
        }
    }
    base.push_str(secret);
    base
}

/// Like [`signature_base`], but keys are taken with the widget prefix and
/// only the allow-listed ones are kept.
pub fn widget_signature_base(args: &Params, secret: &str) -> String {
    let mut base = String::new();
    for (key, value) in args.iter() {
        let key = format!("{WIDGET_ARG_PREFIX}{key}");
        if WIDGET_SIGNED_ARGS.contains(&key.as_str()) {
            base.push_str(&key);
            base.push('=');
            base.push_str(&value.to_string());
        }
    }
    base.push_str(secret);
    base
}

/// Legacy UTF-8 transform, then MD5 as lowercase hex.
pub fn digest_base(base: &str) -> String {
    md5_hex(&encode_utf8_legacy(base))
}

/// Signature of `params` under `secret`, with no session defaults applied.
pub fn calc_signature(params: &Params, secret: &str) -> String {
    digest_base(&signature_base(params, secret))
}
