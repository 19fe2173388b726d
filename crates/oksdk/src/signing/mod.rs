mod base;
mod session_signer;

pub use base::{
    EXCLUDED_KEYS, WIDGET_ARG_PREFIX, WIDGET_SIGNED_ARGS, calc_signature, digest_base,
    signature_base, widget_signature_base,
};
pub use session_signer::SessionSigner;
