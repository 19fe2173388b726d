use serde::{Deserialize, Serialize};

use crate::params::Params;
use crate::session::{OK_MOB_URL, SessionState};
use crate::signing::SessionSigner;

/// Item offered in the platform's payment dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: i64,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOptions {
    /// Payment host, defaults to the mobile site.
    pub mob_pay_url: Option<String>,
}

/// Link that opens the payment dialog for `product`.
///
/// Unlike REST calls the parameters carry no `format`, and the signature
/// always uses the session secret.
pub fn payment_link(session: &SessionState, product: &Product, options: &PaymentOptions) -> String {
    let credential = session.credential();
    let mut params = Params::new()
        .with("name", product.name.as_str())
        .with("price", product.price)
        .with("code", product.code.as_str())
        .with("application_key", session.app_key.as_str())
        .with(credential.param_name(), credential.value());

    let sig = SessionSigner::new(session).sign(&params, None);
    params.insert("sig", sig);

    let host = options
        .mob_pay_url
        .as_deref()
        .filter(|host| !host.is_empty())
        .unwrap_or(OK_MOB_URL);
    format!("{host}api/show_payment?{}", params.to_query_string())
}
