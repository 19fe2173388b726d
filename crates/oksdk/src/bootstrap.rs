use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::{QueryParams, encode_uri_component};
use crate::error::SdkError;
use crate::session::{Layout, OK_API_SERVER, OK_CONNECT_URL, SessionState};

const DEFAULT_OAUTH_SCOPE: &str = "VALUABLE_ACCESS";
const DEFAULT_OAUTH_LAYOUT: &str = "a";

/// OAuth settings used when no launch session is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub scope: Option<String>,
    /// Return URL, defaults to the current location.
    pub url: Option<String>,
    pub state: Option<String>,
    /// Authorization dialog layout, defaults to `a`.
    pub layout: Option<String>,
}

/// Application-supplied initialization arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitArgs {
    pub app_id: u64,
    pub app_key: Option<String>,
    #[serde(default)]
    pub oauth: OAuthConfig,
    pub group_id: Option<String>,
    pub api_server: Option<String>,
    pub widget_server: Option<String>,
    pub layout: Option<Layout>,
}

/// The page location the application was opened at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub href: String,
    /// Query part including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    pub fn parse(href: &str) -> Self {
        let (rest, hash) = match href.find('#') {
            Some(idx) => href.split_at(idx),
            None => (href, ""),
        };
        let search = rest.find('?').map(|idx| &rest[idx..]).unwrap_or_default();
        Self {
            href: href.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }
}

/// What initialization decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// A session is available and calls can be signed.
    Ready(SessionState),
    /// No session and no OAuth answer yet: send the user to this URL.
    Redirect(String),
}

/// Seeds a [`SessionState`] from launch parameters, or decides to go through
/// the OAuth authorize endpoint when the app was not launched by the platform.
pub fn bootstrap(args: &InitArgs, location: &Location) -> Result<Bootstrap, SdkError> {
    let search = QueryParams::parse(&location.search);
    let hash = QueryParams::parse(&location.hash);

    let app_key = search
        .value("application_key")
        .or_else(|| args.app_key.as_deref().filter(|key| !key.is_empty()));
    let Some(app_key) = app_key.filter(|_| args.app_id != 0) else {
        return Err(SdkError::MissingAppIdentity);
    };

    let launched_by_platform = search.value("api_server").is_some();

    let layout = match search.value("layout").or_else(|| hash.value("layout")) {
        Some(code) => Layout::from_code(code),
        None if launched_by_platform => Some(if search.value("apiconnection").is_some() {
            Layout::Web
        } else {
            Layout::Mobile
        }),
        None => args.layout,
    };

    let session = SessionState {
        app_id: args.app_id,
        app_key: app_key.to_string(),
        session_key: search.value("session_key").map(str::to_string),
        access_token: hash.value("access_token").map(str::to_string),
        session_secret_key: search
            .value("session_secret_key")
            .or_else(|| hash.value("session_secret_key"))
            .unwrap_or_default()
            .to_string(),
        api_server: first_non_empty([args.api_server.as_deref(), search.value("api_server")])
            .unwrap_or(OK_API_SERVER)
            .to_string(),
        widget_server: first_non_empty([
            args.widget_server.as_deref(),
            search.value("widget_server"),
        ])
        .unwrap_or(OK_CONNECT_URL)
        .to_string(),
        group_id: first_non_empty([
            search.value("group_id"),
            hash.value("group_id"),
            args.group_id.as_deref(),
        ])
        .map(str::to_string),
        layout,
        container: search.value("container").is_some(),
        header_widget: search.value("header_widget").map(str::to_string),
    };

    if !launched_by_platform {
        if !hash.is_defined("access_token") && !hash.is_defined("error") {
            let url = authorize_url(&session, &args.oauth, &location.href);
            info!(app_id = session.app_id, "no launch session, redirecting to OAuth");
            return Ok(Bootstrap::Redirect(url));
        }
        if let Some(error) = hash.get("error") {
            return Err(SdkError::OAuth(error.to_string()));
        }
    }

    info!(
        app_id = session.app_id,
        credential = session.credential().param_name(),
        "session initialized"
    );
    Ok(Bootstrap::Ready(session))
}

/// Authorize endpoint URL for the token (implicit) flow.
pub fn authorize_url(session: &SessionState, oauth: &OAuthConfig, current_href: &str) -> String {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
    format!(
        "{}oauth/authorize?client_id={}&scope={}&response_type=token&redirect_uri={}&layout={}&state={}",
        session.widget_server,
        session.app_id,
        non_empty(&oauth.scope).unwrap_or_else(|| DEFAULT_OAUTH_SCOPE.to_string()),
        encode_uri_component(&non_empty(&oauth.url).unwrap_or_else(|| current_href.to_string())),
        non_empty(&oauth.layout).unwrap_or_else(|| DEFAULT_OAUTH_LAYOUT.to_string()),
        encode_uri_component(&non_empty(&oauth.state).unwrap_or_default()),
    )
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_splits_search_and_hash() {
        let location = Location::parse("https://app.example/index.html?a=1&b=2#access_token=t");
        assert_eq!(location.search, "?a=1&b=2");
        assert_eq!(location.hash, "#access_token=t");
    }

    #[test]
    fn location_without_query() {
        let location = Location::parse("https://app.example/#x=1");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "#x=1");
    }

    #[test]
    fn question_mark_inside_fragment_is_not_search() {
        let location = Location::parse("https://app.example/#a?b=1");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "#a?b=1");
    }

    #[test]
    fn first_non_empty_skips_blanks() {
        assert_eq!(first_non_empty([None, Some(""), Some("x")]), Some("x"));
        assert_eq!(first_non_empty([None, Some("")]), None);
    }
}
