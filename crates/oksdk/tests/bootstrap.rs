use oksdk::{Bootstrap, InitArgs, Layout, Location, OAuthConfig, SdkError, SessionState, bootstrap};

fn args() -> InitArgs {
    InitArgs {
        app_id: 125,
        app_key: Some("CBAKEY".into()),
        ..Default::default()
    }
}

fn ready(outcome: Result<Bootstrap, SdkError>) -> SessionState {
    match outcome {
        Ok(Bootstrap::Ready(session)) => session,
        other => panic!("expected a ready session, got {other:?}"),
    }
}

#[test]
fn platform_launch_yields_session() {
    let location = Location::parse(
        "https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&apiconnection=125_1&application_key=LAUNCHKEY&session_key=sk&session_secret_key=sss&container=true&group_id=77&header_widget=w1",
    );
    let session = ready(bootstrap(&args(), &location));

    assert_eq!(session.app_key, "LAUNCHKEY");
    assert_eq!(session.session_key.as_deref(), Some("sk"));
    assert_eq!(session.session_secret_key, "sss");
    assert_eq!(session.api_server, "https://api.ok.ru/");
    assert_eq!(session.widget_server, "https://connect.ok.ru/");
    assert_eq!(session.group_id.as_deref(), Some("77"));
    assert_eq!(session.header_widget.as_deref(), Some("w1"));
    assert_eq!(session.layout, Some(Layout::Web));
    assert!(session.container);
}

#[test]
fn platform_launch_without_apiconnection_is_mobile() {
    let location = Location::parse("https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&session_key=sk");
    let session = ready(bootstrap(&args(), &location));
    assert_eq!(session.layout, Some(Layout::Mobile));
    assert!(!session.container);
}

#[test]
fn explicit_layout_wins() {
    let location = Location::parse("https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&layout=a");
    let session = ready(bootstrap(&args(), &location));
    assert_eq!(session.layout, Some(Layout::Application));
}

#[test]
fn args_override_launch_servers() {
    let args = InitArgs {
        api_server: Some("https://api.test/".into()),
        widget_server: Some("https://connect.test/".into()),
        ..args()
    };
    let location = Location::parse("https://app.example/?api_server=https%3A%2F%2Fapi.ok.ru%2F&widget_server=https%3A%2F%2Fw.ok.ru%2F");
    let session = ready(bootstrap(&args, &location));
    assert_eq!(session.api_server, "https://api.test/");
    assert_eq!(session.widget_server, "https://connect.test/");
    assert_eq!(session.rest_endpoint(), "https://api.test/fb.do");
}

#[test]
fn missing_identity_fails() {
    let location = Location::parse("https://app.example/");
    let no_id = InitArgs { app_id: 0, ..args() };
    assert!(matches!(bootstrap(&no_id, &location), Err(SdkError::MissingAppIdentity)));

    let no_key = InitArgs { app_key: None, ..args() };
    assert!(matches!(bootstrap(&no_key, &location), Err(SdkError::MissingAppIdentity)));
}

#[test]
fn launch_key_satisfies_missing_arg_key() {
    let location = Location::parse("https://app.example/?application_key=LAUNCHKEY&api_server=https%3A%2F%2Fapi.ok.ru%2F");
    let args = InitArgs { app_key: None, ..args() };
    assert_eq!(ready(bootstrap(&args, &location)).app_key, "LAUNCHKEY");
}

#[test]
fn no_session_redirects_to_oauth() {
    let location = Location::parse("https://app.example/game?x=1");
    let args = InitArgs {
        oauth: OAuthConfig {
            state: Some("csrf".into()),
            ..Default::default()
        },
        ..args()
    };
    match bootstrap(&args, &location).unwrap() {
        Bootstrap::Redirect(url) => assert_eq!(
            url,
            "https://connect.ok.ru/oauth/authorize?client_id=125&scope=VALUABLE_ACCESS&response_type=token&redirect_uri=https%3A%2F%2Fapp.example%2Fgame%3Fx%3D1&layout=a&state=csrf"
        ),
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn oauth_settings_shape_redirect() {
    let args = InitArgs {
        oauth: OAuthConfig {
            scope: Some("VALUABLE_ACCESS;LONG_ACCESS_TOKEN".into()),
            url: Some("https://app.example/cb".into()),
            layout: Some("w".into()),
            state: None,
        },
        ..args()
    };
    let Bootstrap::Redirect(url) = bootstrap(&args, &Location::parse("https://app.example/")).unwrap() else {
        panic!("expected redirect");
    };
    assert!(url.contains("&scope=VALUABLE_ACCESS;LONG_ACCESS_TOKEN&"));
    assert!(url.contains("&redirect_uri=https%3A%2F%2Fapp.example%2Fcb&layout=w&state="));
}

#[test]
fn oauth_token_in_fragment_yields_session() {
    let location = Location::parse("https://app.example/#access_token=tok&session_secret_key=sss&expires_in=1800");
    let session = ready(bootstrap(&args(), &location));
    assert_eq!(session.access_token.as_deref(), Some("tok"));
    assert_eq!(session.session_key, None);
    assert_eq!(session.session_secret_key, "sss");
    assert_eq!(session.credential().param_name(), "access_token");
}

#[test]
fn oauth_error_in_fragment_fails() {
    let location = Location::parse("https://app.example/#error=access_denied");
    match bootstrap(&args(), &location) {
        Err(SdkError::OAuth(error)) => assert_eq!(error, "access_denied"),
        other => panic!("expected OAuth error, got {other:?}"),
    }
}

#[test]
fn group_id_falls_back_to_args() {
    let args = InitArgs {
        group_id: Some("9".into()),
        ..args()
    };
    let location = Location::parse("https://app.example/#access_token=tok");
    assert_eq!(ready(bootstrap(&args, &location)).group_id.as_deref(), Some("9"));
}
