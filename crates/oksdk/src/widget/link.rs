use crate::codec::encode_uri_component;
use crate::session::SessionState;
use crate::signing::{SessionSigner, WIDGET_ARG_PREFIX};

use super::Widget;

/// Signed link that opens `widget` on the widget server.
///
/// Every argument travels `st.`-prefixed and percent-encoded; only the
/// allow-listed ones feed `st.signature`. Credentials are appended after the
/// signature as-is.
pub fn widget_link(session: &SessionState, widget: &Widget) -> String {
    let args = widget.link_args();

    let mut link = format!(
        "{}dk?st.cmd={}&st.app={}",
        session.widget_server,
        widget.command(),
        session.app_id
    );
    if let Some(group_id) = session.group_id.as_deref().filter(|id| !id.is_empty()) {
        link.push_str(&format!("&st.groupId={group_id}"));
    }
    for (key, value) in args.iter() {
        link.push_str(&format!(
            "&{WIDGET_ARG_PREFIX}{key}={}",
            encode_uri_component(&value.to_string())
        ));
    }

    let signature = SessionSigner::new(session).sign_widget_link(&args);
    link.push_str(&format!("&st.signature={signature}"));

    if let Some(token) = session.access_token.as_deref().filter(|token| !token.is_empty()) {
        link.push_str(&format!("&st.access_token={token}"));
    }
    if let Some(session_key) = session.session_key.as_deref().filter(|key| !key.is_empty()) {
        link.push_str(&format!("&st.session_key={session_key}"));
    }
    link
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use crate::signing::calc_signature;
    use crate::widget::SuggestOptions;

    fn session() -> SessionState {
        SessionState::new(42, "key")
            .with_session_key("sk")
            .with_session_secret_key("ss")
            .with_widget_server("https://connect.example/")
    }

    #[test]
    fn link_shape() {
        let widget = Widget::Suggest(SuggestOptions {
            return_url: Some("https://app/cb".into()),
            comment: Some("hello world".into()),
            ..Default::default()
        });
        let link = widget_link(&session(), &widget);
        assert!(link.starts_with("https://connect.example/dk?st.cmd=WidgetSuggest&st.app=42&st.comment=hello%20world&st.return=https%3A%2F%2Fapp%2Fcb&st.signature="));
        assert!(link.ends_with("&st.session_key=sk"));
        assert!(!link.contains("st.access_token"));
    }

    #[test]
    fn group_id_is_injected() {
        let session = session().with_group_id("555");
        let link = widget_link(&session, &Widget::Invite(SuggestOptions::default()));
        assert!(link.contains("&st.app=42&st.groupId=555&"));
    }

    #[test]
    fn access_token_is_appended_when_known() {
        let session = SessionState::new(42, "key").with_access_token("tok");
        let link = widget_link(&session, &Widget::Invite(SuggestOptions::default()));
        assert!(link.ends_with("&st.access_token=tok"));
    }

    #[test]
    fn empty_access_token_is_not_appended() {
        let session = SessionState::new(42, "key").with_access_token("");
        let link = widget_link(&session, &Widget::Invite(SuggestOptions::default()));
        assert!(!link.contains("st.access_token"));
        assert!(link.contains("&st.signature="));
    }

    #[test]
    fn signature_uses_raw_values() {
        let widget = Widget::Suggest(SuggestOptions {
            return_url: Some("https://app/cb?x=1".into()),
            ..Default::default()
        });
        let link = widget_link(&session(), &widget);
        // Same digest as a plain request signature over the prefixed pair.
        let expected = calc_signature(&Params::new().with("st.return", "https://app/cb?x=1"), "ss");
        assert!(link.contains(&format!("&st.signature={expected}&")));
    }
}
