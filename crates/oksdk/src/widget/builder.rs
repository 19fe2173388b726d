use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::params::Params;
use crate::session::SessionState;

use super::context::{CallContext, ExecutionEnv, WidgetContext};
use super::popup::PopupConfig;
use super::{Widget, WidgetAction, dispatch};

type RedirectCondition = Arc<dyn Fn(&SessionState) -> bool + Send + Sync>;

struct Redirect {
    url: String,
    condition: RedirectCondition,
}

/// Configures how a widget is shown and resolves it to a [`WidgetAction`].
pub struct WidgetBuilder {
    widget: Widget,
    redirect: Option<Redirect>,
    popup: Option<PopupConfig>,
    context: Option<WidgetContext>,
}

impl fmt::Debug for WidgetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBuilder")
            .field("widget", &self.widget)
            .field("redirect", &self.redirect.as_ref().map(|r| &r.url))
            .field("popup", &self.popup)
            .field("context", &self.context)
            .finish()
    }
}

impl WidgetBuilder {
    pub fn new(widget: Widget) -> Self {
        Self {
            widget,
            redirect: None,
            popup: None,
            context: None,
        }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    /// Merges `params` into the widget arguments, replacing existing ones.
    pub fn change_params(mut self, params: &Params) -> Self {
        self.widget.extra_mut().merge(params, true);
        self
    }

    /// Merges `params` into the widget arguments, keeping existing ones.
    pub fn add_params(mut self, params: &Params) -> Self {
        let existing = self.widget.link_args();
        let fresh: Params = params
            .iter()
            .filter(|(key, _)| !existing.contains_key(key))
            .map(|(key, value)| (key, value.clone()))
            .collect();
        self.widget.extra_mut().merge(&fresh, false);
        self
    }

    /// Leave the page for `url` instead of showing the widget.
    pub fn perform_redirect(self, url: impl Into<String>) -> Self {
        self.perform_redirect_if(url, |_| true)
    }

    /// Leave the page for `url` when `condition` holds for the session.
    pub fn perform_redirect_if(
        mut self,
        url: impl Into<String>,
        condition: impl Fn(&SessionState) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.redirect = Some(Redirect {
            url: url.into(),
            condition: Arc::new(condition),
        });
        self
    }

    pub fn with_popup(mut self, popup: PopupConfig) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Forces a context instead of resolving it from the environment.
    pub fn with_context(mut self, context: WidgetContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn run(&self, session: &SessionState, env: &ExecutionEnv) -> WidgetAction {
        if let Some(redirect) = &self.redirect {
            if (redirect.condition)(session) {
                return WidgetAction::Redirect(redirect.url.clone());
            }
        }

        let context = self
            .context
            .unwrap_or_else(|| CallContext::resolve(session, env).select(&self.widget));
        debug!(widget = self.widget.command(), ?context, "showing widget");

        let mut action = dispatch(&self.widget, context, session);
        if let (WidgetAction::OpenPopup { window, .. }, Some(popup)) = (&mut action, &self.popup) {
            *window = Some(popup.window(&env.screen, now_millis()));
        }
        action
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
