//! Hosted UI components (invite, suggest, post, group permissions).
//!
//! A [`Widget`] carries its own typed options. Where it shows up is a
//! [`WidgetContext`] resolved from the execution environment, and
//! [`dispatch`] turns the pair into a [`WidgetAction`] for the host to carry
//! out: open a link, embed it, or post a message to the platform frame.

mod builder;
mod context;
mod link;
mod popup;
mod ui_layer;

use serde::{Deserialize, Serialize};

use crate::codec::encode_base64;
use crate::params::Params;
use crate::session::SessionState;

pub use builder::WidgetBuilder;
pub use context::{CallContext, ExecutionEnv, WidgetContext};
pub use link::widget_link;
pub use popup::{PopupConfig, PopupWindow, ScreenMetrics};
pub use ui_layer::{UI_MESSAGE_PREFIX, UiLayerCall};

/// Options shared by the invite and suggest widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestOptions {
    pub return_url: Option<String>,
    /// Number of friends to preselect.
    pub autosel: Option<u32>,
    /// Default text of the suggestion field.
    pub comment: Option<String>,
    /// Arguments passed to the app when opened from the suggestion.
    pub custom_args: Option<String>,
    /// Opaque value handed back on the return URL.
    pub state: Option<String>,
    /// Comma-separated friend ids to preselect.
    pub target: Option<String>,
    #[serde(default)]
    pub extra: Params,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediatopicOptions {
    pub return_url: Option<String>,
    /// Mediatopic to post. A JSON string is taken as already serialized.
    #[serde(default)]
    pub attachment: serde_json::Value,
    #[serde(default)]
    pub extra: Params,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupAppPermissionsOptions {
    pub return_url: Option<String>,
    /// Comma-separated permissions requested from the group.
    pub scope: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub extra: Params,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Invite(SuggestOptions),
    Suggest(SuggestOptions),
    MediatopicPost(MediatopicOptions),
    GroupAppPermissions(GroupAppPermissionsOptions),
}

impl Widget {
    /// `st.cmd` value on the widget server.
    pub fn command(&self) -> &'static str {
        match self {
            Widget::Invite(_) => "WidgetInvite",
            Widget::Suggest(_) => "WidgetSuggest",
            Widget::MediatopicPost(_) => "WidgetMediatopicPost",
            Widget::GroupAppPermissions(_) => "WidgetGroupAppPermissions",
        }
    }

    /// Platform UI method that can show this widget without leaving the
    /// app frame.
    pub fn ui_layer_method(&self) -> Option<&'static str> {
        match self {
            Widget::MediatopicPost(_) => Some("postMediatopic"),
            _ => None,
        }
    }

    pub fn return_url(&self) -> Option<&str> {
        match self {
            Widget::Invite(options) | Widget::Suggest(options) => options.return_url.as_deref(),
            Widget::MediatopicPost(options) => options.return_url.as_deref(),
            Widget::GroupAppPermissions(options) => options.return_url.as_deref(),
        }
    }

    /// Sets the return URL unless one is already configured.
    pub fn set_default_return_url(&mut self, url: impl Into<String>) {
        let slot = match self {
            Widget::Invite(options) | Widget::Suggest(options) => &mut options.return_url,
            Widget::MediatopicPost(options) => &mut options.return_url,
            Widget::GroupAppPermissions(options) => &mut options.return_url,
        };
        if slot.as_deref().is_none_or(str::is_empty) {
            *slot = Some(url.into());
        }
    }

    pub fn extra(&self) -> &Params {
        match self {
            Widget::Invite(options) | Widget::Suggest(options) => &options.extra,
            Widget::MediatopicPost(options) => &options.extra,
            Widget::GroupAppPermissions(options) => &options.extra,
        }
    }

    pub fn extra_mut(&mut self) -> &mut Params {
        match self {
            Widget::Invite(options) | Widget::Suggest(options) => &mut options.extra,
            Widget::MediatopicPost(options) => &mut options.extra,
            Widget::GroupAppPermissions(options) => &mut options.extra,
        }
    }

    /// Unprefixed link arguments: typed options first, `extra` on top.
    pub fn link_args(&self) -> Params {
        let mut args = Params::new();
        if let Some(url) = self.return_url().filter(|url| !url.is_empty()) {
            args.insert("return", url);
        }
        match self {
            Widget::Invite(options) | Widget::Suggest(options) => {
                if let Some(autosel) = options.autosel {
                    args.insert("autosel", autosel);
                }
                insert_opt(&mut args, "comment", &options.comment);
                insert_opt(&mut args, "custom_args", &options.custom_args);
                insert_opt(&mut args, "state", &options.state);
                insert_opt(&mut args, "target", &options.target);
            }
            Widget::MediatopicPost(options) => {
                let json = attachment_text(&options.attachment);
                args.insert("attachment", encode_base64(json.as_bytes()));
            }
            Widget::GroupAppPermissions(options) => {
                insert_opt(&mut args, "scope", &options.scope);
                insert_opt(&mut args, "state", &options.state);
            }
        }
        args.merge(self.extra(), true);
        args
    }

    /// Arguments for the in-frame UI method, when the widget has one.
    pub fn ui_layer_call(&self) -> Option<UiLayerCall> {
        let method = self.ui_layer_method()?;
        let args = match self {
            Widget::MediatopicPost(options) => vec![Some(attachment_text(&options.attachment))],
            _ => Vec::new(),
        };
        Some(UiLayerCall::new(method, args))
    }
}

fn insert_opt(args: &mut Params, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        args.insert(key, value.as_str());
    }
}

fn attachment_text(attachment: &serde_json::Value) -> String {
    match attachment {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// What the host has to do to show a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    /// Navigate the current page away before anything else.
    Redirect(String),
    /// Open the link in a popup window, with explicit geometry if configured.
    OpenPopup { url: String, window: Option<PopupWindow> },
    /// Load the link into an iframe layer over the app.
    EmbedFrame { url: String },
    /// Open the link as a regular top-level page.
    Navigate(String),
    /// Post this message to the platform frame hosting the app.
    PostUiMessage(String),
}

/// Maps a widget and the context it should show in to the host action.
///
/// A UI-layer context for a widget without a UI method falls back to a
/// popup.
pub fn dispatch(widget: &Widget, context: WidgetContext, session: &SessionState) -> WidgetAction {
    match context {
        WidgetContext::UiLayer => match widget.ui_layer_call() {
            Some(call) => WidgetAction::PostUiMessage(call.message()),
            None => WidgetAction::OpenPopup {
                url: widget_link(session, widget),
                window: None,
            },
        },
        WidgetContext::Popup => WidgetAction::OpenPopup {
            url: widget_link(session, widget),
            window: None,
        },
        WidgetContext::Iframe => WidgetAction::EmbedFrame {
            url: widget_link(session, widget),
        },
        WidgetContext::External => WidgetAction::Navigate(widget_link(session, widget)),
    }
}
