use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::{decode_base64, decode_utf8_legacy};
use crate::error::SdkError;
use crate::params::Params;
use crate::session::SessionState;
use crate::signing::SessionSigner;

const CALLBACK_PREFIX: &str = "__oksdk__callback_";
const DEFAULT_HEADER_WIDGET: &str = "mobile-header-small";

/// Per-call switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOptions {
    /// The method prohibits a session: drop `session_key` and `access_token`.
    #[serde(default)]
    pub no_session: bool,
    /// The method needs no signature.
    #[serde(default)]
    pub no_sig: bool,
    /// Secret for non-session calls, used instead of the session secret.
    pub app_secret_key: Option<String>,
}

/// A filled and signed REST call, ready to be put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    endpoint: String,
    params: Params,
}

impl RestRequest {
    pub fn build(session: &SessionState, method: &str, params: Params, options: &RestOptions) -> Self {
        let signer = SessionSigner::new(session);

        let mut params = signer.fill_params(params.with("method", method));
        if options.no_session {
            params.remove("session_key");
            params.remove("access_token");
        }
        if !options.no_sig {
            let sig = signer.sign(&params, options.app_secret_key.as_deref());
            params.insert("sig", sig);
        }

        Self {
            endpoint: session.rest_endpoint(),
            params,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Plain GET URL; the server answers with a JSON body.
    pub fn url(&self) -> String {
        format!("{}?{}", self.endpoint, self.params.to_query_string())
    }

    /// Script-injection URL; the server answers with a call to `callback_id`.
    pub fn jsonp_url(&self, callback_id: &str) -> String {
        let query = self.params.to_query_string();
        if query.is_empty() {
            format!("{}?js_callback={callback_id}", self.endpoint)
        } else {
            format!("{}?{query}&js_callback={callback_id}", self.endpoint)
        }
    }
}

/// Moves a request URL to the API server and returns the decoded JSON body.
pub trait RestTransport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, SdkError>> + Send;
}

/// [`RestTransport`] over HTTPS.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl RestTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Value, SdkError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

/// Issues signed calls for one session.
pub struct RestClient<T = HttpTransport> {
    session: SessionState,
    transport: T,
    counter: AtomicU64,
}

impl RestClient<HttpTransport> {
    pub fn over_http(session: SessionState) -> Self {
        Self::new(session, HttpTransport::new())
    }
}

impl<T: RestTransport> RestClient<T> {
    pub fn new(session: SessionState, transport: T) -> Self {
        Self {
            session,
            transport,
            counter: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Unique global callback name for a script-injected call.
    pub fn next_callback_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{CALLBACK_PREFIX}{n}")
    }

    pub fn request(&self, method: &str, params: Params, options: &RestOptions) -> RestRequest {
        RestRequest::build(&self.session, method, params, options)
    }

    /// Performs a call. Platform error bodies come back as [`SdkError::Api`].
    pub async fn call(&self, method: &str, params: Params, options: &RestOptions) -> Result<Value, SdkError> {
        let request = self.request(method, params, options);
        debug!(method, "calling REST method");
        let body = self.transport.get(&request.url()).await?;
        check_api_error(method, body)
    }

    /// HTML for the back button shown to apps opened in a mobile browser.
    ///
    /// `None` when the app runs inside the platform container or under an
    /// OAuth token, where no back button is needed.
    pub async fn widget_back_button(&self, style: Option<&str>) -> Result<Option<String>, SdkError> {
        if self.session.container || self.session.access_token.as_deref().is_some_and(|t| !t.is_empty()) {
            return Ok(None);
        }

        let wid = self
            .session
            .header_widget
            .as_deref()
            .filter(|wid| !wid.is_empty())
            .unwrap_or(DEFAULT_HEADER_WIDGET);
        let mut params = Params::new().with("wid", wid);
        if let Some(style) = style {
            params.insert("style", style);
        }

        let data = self
            .call("widget.getWidgetContent", params, &RestOptions::default())
            .await?;
        let encoded = data.as_str().ok_or_else(|| {
            SdkError::UnexpectedResponse(format!("widget content is not a string: {data}"))
        })?;
        Ok(Some(decode_utf8_legacy(&decode_base64(encoded)?)))
    }
}

fn check_api_error(method: &str, body: Value) -> Result<Value, SdkError> {
    let Some(code) = body.get("error_code").and_then(Value::as_i64) else {
        return Ok(body);
    };
    let message = body
        .get("error_msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    warn!(method, code, %message, "REST call failed");
    Err(SdkError::Api { code, message })
}
