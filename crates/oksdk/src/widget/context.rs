use serde::{Deserialize, Serialize};

use crate::session::{Layout, Platform, SessionState};

use super::popup::ScreenMetrics;
use super::Widget;

/// Facts about the window the app runs in, supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEnv {
    /// The app window has a parent frame.
    pub in_iframe: bool,
    /// The app window was opened by another window.
    pub has_opener: bool,
    #[serde(default)]
    pub screen: ScreenMetrics,
}

/// Where a widget is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetContext {
    Popup,
    Iframe,
    UiLayer,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub platform: Option<Platform>,
    pub is_ok_app: bool,
    pub is_oauth: bool,
    pub is_iframe: bool,
    pub is_popup: bool,
    /// Neither framed, nor a popup, nor inside the OAuth dialog, or the
    /// platform says external.
    pub is_external: bool,
}

impl CallContext {
    pub fn resolve(session: &SessionState, env: &ExecutionEnv) -> Self {
        let platform = session.platform();
        let is_oauth = session.layout == Some(Layout::OAuth);
        let is_iframe = env.in_iframe;
        let is_popup = env.has_opener;
        Self {
            platform,
            is_ok_app: session.container,
            is_oauth,
            is_iframe,
            is_popup,
            is_external: platform == Some(Platform::External) || !(is_iframe || is_popup || is_oauth),
        }
    }

    /// UI layer when the widget has a UI method and the platform frame can
    /// show it; otherwise an external page or a popup.
    pub fn select(&self, widget: &Widget) -> WidgetContext {
        if widget.ui_layer_method().is_some() && self.allows_ui_layer() {
            WidgetContext::UiLayer
        } else if self.is_external {
            WidgetContext::External
        } else {
            WidgetContext::Popup
        }
    }

    fn allows_ui_layer(&self) -> bool {
        !self.is_external && !matches!(self.platform, Some(Platform::Web | Platform::NativeApp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{MediatopicOptions, SuggestOptions};

    fn framed() -> ExecutionEnv {
        ExecutionEnv {
            in_iframe: true,
            ..Default::default()
        }
    }

    #[test]
    fn top_level_window_is_external() {
        let session = SessionState::new(1, "key");
        let context = CallContext::resolve(&session, &ExecutionEnv::default());
        assert!(context.is_external);
    }

    #[test]
    fn external_layout_is_external_even_when_framed() {
        let session = SessionState::new(1, "key").with_layout(Layout::External);
        assert!(CallContext::resolve(&session, &framed()).is_external);
    }

    #[test]
    fn oauth_layout_is_not_external() {
        let session = SessionState::new(1, "key").with_layout(Layout::OAuth);
        let context = CallContext::resolve(&session, &ExecutionEnv::default());
        assert!(context.is_oauth);
        assert!(!context.is_external);
    }

    #[test]
    fn framed_mobile_post_uses_ui_layer() {
        let session = SessionState::new(1, "key").with_layout(Layout::Mobile);
        let context = CallContext::resolve(&session, &framed());
        let widget = Widget::MediatopicPost(MediatopicOptions::default());
        assert_eq!(context.select(&widget), WidgetContext::UiLayer);
    }

    #[test]
    fn web_platform_never_uses_ui_layer() {
        let session = SessionState::new(1, "key").with_layout(Layout::Web);
        let context = CallContext::resolve(&session, &framed());
        let widget = Widget::MediatopicPost(MediatopicOptions::default());
        assert_eq!(context.select(&widget), WidgetContext::Popup);
    }

    #[test]
    fn external_call_opens_page() {
        let session = SessionState::new(1, "key");
        let context = CallContext::resolve(&session, &ExecutionEnv::default());
        let widget = Widget::Suggest(SuggestOptions::default());
        assert_eq!(context.select(&widget), WidgetContext::External);
    }

    #[test]
    fn framed_suggest_uses_popup() {
        let session = SessionState::new(1, "key").with_container(true);
        let context = CallContext::resolve(&session, &framed());
        assert!(context.is_ok_app);
        let widget = Widget::Suggest(SuggestOptions::default());
        assert_eq!(context.select(&widget), WidgetContext::Popup);
    }
}
