use tracing::debug;

use crate::params::Params;
use crate::session::SessionState;

use super::base::{digest_base, signature_base, widget_signature_base};

/// Fills and signs call parameters for one session.
///
/// Holds nothing but a borrow of the session, so it is cheap to create per
/// call and safe to use from any thread.
#[derive(Debug, Clone, Copy)]
pub struct SessionSigner<'a> {
    session: &'a SessionState,
}

impl<'a> SessionSigner<'a> {
    pub fn new(session: &'a SessionState) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &'a SessionState {
        self.session
    }

    /// Adds `application_key`, the active credential and `format=JSON`.
    pub fn fill_params(&self, mut params: Params) -> Params {
        params.insert("application_key", self.session.app_key.as_str());
        let credential = self.session.credential();
        params.insert(credential.param_name(), credential.value());
        params.insert("format", "JSON");
        params
    }

    /// Signs `params` as they are. A missing or empty `secret` falls back to
    /// the session secret.
    pub fn sign(&self, params: &Params, secret: Option<&str>) -> String {
        let secret = secret
            .filter(|secret| !secret.is_empty())
            .unwrap_or(self.session.session_secret_key.as_str());
        let signature = digest_base(&signature_base(params, secret));
        debug!(params = params.len(), "computed request signature");
        signature
    }

    /// Fills a copy of `params` and signs it.
    pub fn sign_call(&self, params: &Params, secret: Option<&str>) -> String {
        self.sign(&self.fill_params(params.clone()), secret)
    }

    /// `st.signature` for a widget link. `args` are the unprefixed widget
    /// arguments; only the allow-listed ones are signed.
    pub fn sign_widget_link(&self, args: &Params) -> String {
        digest_base(&widget_signature_base(args, &self.session.session_secret_key))
    }
}
