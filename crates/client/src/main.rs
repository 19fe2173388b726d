use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use oksdk::codec::{encode_utf8_legacy, md5_hex};
use oksdk::session::{OK_API_SERVER, OK_CONNECT_URL};
use oksdk::{
    Bootstrap, InitArgs, Layout, Location, OAuthConfig, Params, PaymentOptions, Product, RestClient,
    RestOptions, SessionSigner, SessionState, Widget, bootstrap, payment_link, widget_link,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Cli {
    #[clap(flatten)]
    session: SessionArgs,
    /// Log level (trace, debug, info, warn, error)
    #[clap(long, global = true, default_value = "warn")]
    log_level: String,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SessionArgs {
    #[clap(long, env = "OK_APP_ID", default_value = "0")]
    app_id: u64,
    #[clap(long, env = "OK_APP_KEY", default_value = "")]
    app_key: String,
    #[clap(long, env = "OK_SESSION_KEY")]
    session_key: Option<String>,
    #[clap(long, env = "OK_ACCESS_TOKEN")]
    access_token: Option<String>,
    #[clap(long, env = "OK_SESSION_SECRET_KEY", default_value = "")]
    session_secret_key: String,
    #[clap(long, env = "OK_API_SERVER", default_value = OK_API_SERVER)]
    api_server: String,
    #[clap(long, env = "OK_WIDGET_SERVER", default_value = OK_CONNECT_URL)]
    widget_server: String,
    #[clap(long, env = "OK_GROUP_ID")]
    group_id: Option<String>,
    #[clap(long, env = "OK_LAYOUT")]
    layout: Option<Layout>,
}

impl SessionArgs {
    fn session(&self) -> Result<SessionState> {
        if self.app_id == 0 || self.app_key.is_empty() {
            bail!("--app-id and --app-key (or OK_APP_ID/OK_APP_KEY) are required");
        }
        Ok(SessionState {
            app_id: self.app_id,
            app_key: self.app_key.clone(),
            session_key: self.session_key.clone(),
            access_token: self.access_token.clone(),
            session_secret_key: self.session_secret_key.clone(),
            api_server: self.api_server.clone(),
            widget_server: self.widget_server.clone(),
            group_id: self.group_id.clone(),
            layout: self.layout,
            container: false,
            header_widget: None,
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the signature of the given parameters
    Sign {
        /// Add application key, credential and format first
        #[clap(long)]
        fill: bool,
        /// Sign with this secret instead of the session secret
        #[clap(long)]
        secret: Option<String>,
        #[clap(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Print the signed fb.do URL of a REST call
    RestUrl {
        method: String,
        /// Print the script-injection form with this callback name
        #[clap(long)]
        jsonp: Option<String>,
        #[clap(flatten)]
        options: CallOptions,
        #[clap(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Perform a REST call and print the JSON answer
    Call {
        method: String,
        #[clap(flatten)]
        options: CallOptions,
        #[clap(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Print a signed widget link, the widget given as JSON
    WidgetLink { widget: String },
    /// Print a payment dialog link
    PaymentLink {
        name: String,
        price: i64,
        code: String,
        #[clap(long)]
        mob_pay_url: Option<String>,
    },
    /// Decide how an app opened at the given URL starts
    Bootstrap {
        url: String,
        #[clap(long)]
        scope: Option<String>,
        #[clap(long)]
        redirect_uri: Option<String>,
        #[clap(long)]
        state: Option<String>,
    },
    /// MD5 of a string, after the legacy UTF-8 transform
    Md5 { text: String },
}

#[derive(Args)]
struct CallOptions {
    #[clap(long)]
    no_session: bool,
    #[clap(long)]
    no_sig: bool,
    /// Secret for this call only, instead of the session secret
    #[clap(long)]
    app_secret_key: Option<String>,
}

impl From<CallOptions> for RestOptions {
    fn from(options: CallOptions) -> Self {
        RestOptions {
            no_session: options.no_session,
            no_sig: options.no_sig,
            app_secret_key: options.app_secret_key,
        }
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{s}`"))
}

fn to_params(pairs: Vec<(String, String)>) -> Params {
    pairs.into_iter().collect()
}

fn rest_url(
    client: &RestClient,
    method: &str,
    jsonp: Option<&str>,
    options: CallOptions,
    params: Vec<(String, String)>,
) -> String {
    let request = client.request(method, to_params(params), &options.into());
    match jsonp {
        Some(callback) => request.jsonp_url(callback),
        None => request.url(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Sign { fill, secret, params } => {
            let session = cli.session.session()?;
            let signer = SessionSigner::new(&session);
            let params = to_params(params);
            let sig = if fill {
                signer.sign_call(&params, secret.as_deref())
            } else {
                signer.sign(&params, secret.as_deref())
            };
            println!("{sig}");
        }
        Command::RestUrl { method, jsonp, options, params } => {
            let client = RestClient::over_http(cli.session.session()?);
            println!("{}", rest_url(&client, &method, jsonp.as_deref(), options, params));
        }
        Command::Call { method, options, params } => {
            let client = RestClient::over_http(cli.session.session()?);
            let result = client
                .call(&method, to_params(params), &options.into())
                .await
                .with_context(|| format!("calling {method}"))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::WidgetLink { widget } => {
            let session = cli.session.session()?;
            let widget: Widget = serde_json::from_str(&widget).context("parsing widget JSON")?;
            println!("{}", widget_link(&session, &widget));
        }
        Command::PaymentLink { name, price, code, mob_pay_url } => {
            let session = cli.session.session()?;
            let product = Product { name, price, code };
            println!("{}", payment_link(&session, &product, &PaymentOptions { mob_pay_url }));
        }
        Command::Bootstrap { url, scope, redirect_uri, state } => {
            let args = InitArgs {
                app_id: cli.session.app_id,
                app_key: Some(cli.session.app_key.clone()).filter(|key| !key.is_empty()),
                oauth: OAuthConfig {
                    scope,
                    url: redirect_uri,
                    state,
                    layout: None,
                },
                group_id: cli.session.group_id.clone(),
                api_server: None,
                widget_server: None,
                layout: cli.session.layout,
            };
            match bootstrap(&args, &Location::parse(&url))? {
                Bootstrap::Ready(session) => {
                    debug!(app_id = session.app_id, "session ready");
                    println!("{session:#?}");
                }
                Bootstrap::Redirect(url) => println!("redirect: {url}"),
            }
        }
        Command::Md5 { text } => println!("{}", md5_hex(&encode_utf8_legacy(&text))),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_pairs_split_on_first_equals() {
        assert_eq!(parse_param("a=b=c"), Ok(("a".to_string(), "b=c".to_string())));
        assert_eq!(parse_param("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_param("novalue").is_err());
    }

    #[test]
    fn cli_parses_sign_command() {
        let cli = Cli::try_parse_from([
            "oksdk-client",
            "--app-id",
            "1",
            "--app-key",
            "KEY",
            "sign",
            "--fill",
            "method=users.getCurrentUser",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Sign { fill: true, .. }));
        assert_eq!(cli.session.session().unwrap().app_key, "KEY");
    }

    fn rest_url_of(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let client = RestClient::over_http(cli.session.session().unwrap());
        match cli.command {
            Command::RestUrl { method, jsonp, options, params } => {
                rest_url(&client, &method, jsonp.as_deref(), options, params)
            }
            _ => panic!("expected rest-url"),
        }
    }

    #[test]
    fn app_secret_env_does_not_change_session_signature() {
        let args = [
            "oksdk-client",
            "--app-id",
            "1",
            "--app-key",
            "KEY",
            "--session-key",
            "sk",
            "--session-secret-key",
            "ss",
            "rest-url",
            "users.getCurrentUser",
        ];
        let session_signed = rest_url_of(&args);

        // SAFETY: no other test reads this variable.
        unsafe { std::env::set_var("OK_APP_SECRET_KEY", "app-secret") };
        let with_env = rest_url_of(&args);
        unsafe { std::env::remove_var("OK_APP_SECRET_KEY") };

        assert_eq!(with_env, session_signed);
        let expected = SessionSigner::new(
            &SessionState::new(1, "KEY")
                .with_session_key("sk")
                .with_session_secret_key("ss"),
        )
        .sign_call(&Params::new().with("method", "users.getCurrentUser"), None);
        assert!(session_signed.ends_with(&format!("&sig={expected}")));
    }

    #[test]
    fn app_secret_applies_only_when_asked_for() {
        let base = [
            "oksdk-client",
            "--app-id",
            "1",
            "--app-key",
            "KEY",
            "--session-key",
            "sk",
            "--session-secret-key",
            "ss",
            "rest-url",
            "users.getCurrentUser",
        ];
        let mut explicit = base.to_vec();
        explicit.extend(["--app-secret-key", "app-secret"]);
        assert_ne!(rest_url_of(&explicit), rest_url_of(&base));
    }

    #[test]
    fn missing_identity_is_reported() {
        let cli = Cli::try_parse_from(["oksdk-client", "--app-id", "0", "md5", "x"]).unwrap();
        assert!(cli.session.session().is_err());
    }
}
