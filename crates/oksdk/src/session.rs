use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const OK_API_SERVER: &str = "https://api.ok.ru/";
pub const OK_CONNECT_URL: &str = "https://connect.ok.ru/";
pub const OK_MOB_URL: &str = "https://m.ok.ru/";

/// Layout hint passed by the platform at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    #[serde(rename = "w")]
    Web,
    #[serde(rename = "m")]
    Mobile,
    #[serde(rename = "a")]
    Application,
    #[serde(rename = "e")]
    External,
    /// Authorization layout used by the OAuth dialog itself.
    #[serde(rename = "o")]
    OAuth,
}

/// Runtime the application was launched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Web,
    Mobile,
    NativeApp,
    External,
}

impl Layout {
    /// Case-insensitive lookup of a single-letter layout code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "w" => Some(Layout::Web),
            "m" => Some(Layout::Mobile),
            "a" => Some(Layout::Application),
            "e" => Some(Layout::External),
            "o" => Some(Layout::OAuth),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Layout::Web => "w",
            Layout::Mobile => "m",
            Layout::Application => "a",
            Layout::External => "e",
            Layout::OAuth => "o",
        }
    }

    pub fn platform(self) -> Option<Platform> {
        match self {
            Layout::Web => Some(Platform::Web),
            Layout::Mobile => Some(Platform::Mobile),
            Layout::Application => Some(Platform::NativeApp),
            Layout::External => Some(Platform::External),
            Layout::OAuth => None,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::from_code(s).ok_or_else(|| format!("unknown layout '{s}' (expected w, m, a, e or o)"))
    }
}

/// The credential that goes into outgoing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    SessionKey(&'a str),
    AccessToken(&'a str),
}

impl Credential<'_> {
    pub fn param_name(&self) -> &'static str {
        match self {
            Credential::SessionKey(_) => "session_key",
            Credential::AccessToken(_) => "access_token",
        }
    }

    pub fn value(&self) -> &str {
        match *self {
            Credential::SessionKey(value) | Credential::AccessToken(value) => value,
        }
    }
}

/// Application identity and session credentials.
///
/// Built once by bootstrap and read-only afterwards; every signing and
/// link-building function takes it by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub app_id: u64,
    pub app_key: String,
    pub session_key: Option<String>,
    pub access_token: Option<String>,
    pub session_secret_key: String,
    pub api_server: String,
    pub widget_server: String,
    pub group_id: Option<String>,
    pub layout: Option<Layout>,
    pub container: bool,
    pub header_widget: Option<String>,
}

impl SessionState {
    pub fn new(app_id: u64, app_key: impl Into<String>) -> Self {
        Self {
            app_id,
            app_key: app_key.into(),
            session_key: None,
            access_token: None,
            session_secret_key: String::new(),
            api_server: OK_API_SERVER.to_string(),
            widget_server: OK_CONNECT_URL.to_string(),
            group_id: None,
            layout: None,
            container: false,
            header_widget: None,
        }
    }

    pub fn with_session_key(mut self, session_key: impl Into<String>) -> Self {
        self.session_key = Some(session_key.into());
        self
    }

    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn with_session_secret_key(mut self, secret: impl Into<String>) -> Self {
        self.session_secret_key = secret.into();
        self
    }

    pub fn with_api_server(mut self, api_server: impl Into<String>) -> Self {
        self.api_server = api_server.into();
        self
    }

    pub fn with_widget_server(mut self, widget_server: impl Into<String>) -> Self {
        self.widget_server = widget_server.into();
        self
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_container(mut self, container: bool) -> Self {
        self.container = container;
        self
    }

    pub fn with_header_widget(mut self, header_widget: impl Into<String>) -> Self {
        self.header_widget = Some(header_widget.into());
        self
    }

    /// A non-empty session key always wins over the access token.
    pub fn credential(&self) -> Credential<'_> {
        match self.session_key.as_deref().filter(|key| !key.is_empty()) {
            Some(session_key) => Credential::SessionKey(session_key),
            None => Credential::AccessToken(self.access_token.as_deref().unwrap_or_default()),
        }
    }

    /// Base endpoint for REST calls.
    pub fn rest_endpoint(&self) -> String {
        format!("{}fb.do", self.api_server)
    }

    pub fn platform(&self) -> Option<Platform> {
        self.layout.and_then(Layout::platform)
    }
}
