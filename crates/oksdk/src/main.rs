use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use oksdk::session::{OK_API_SERVER, OK_CONNECT_URL};
use oksdk::{AppState, Layout, SessionState, run};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "3000")]
    port: u16,
    #[clap(long, env = "OK_APP_ID")]
    app_id: u64,
    #[clap(long, env = "OK_APP_KEY")]
    app_key: String,
    #[clap(long, env = "OK_SESSION_KEY")]
    session_key: Option<String>,
    #[clap(long, env = "OK_ACCESS_TOKEN")]
    access_token: Option<String>,
    #[clap(long, env = "OK_SESSION_SECRET_KEY", default_value = "")]
    session_secret_key: String,
    /// Secret for non-session calls; only ever used server-side
    #[clap(long, env = "OK_APP_SECRET_KEY")]
    app_secret_key: Option<String>,
    #[clap(long, env = "OK_API_SERVER", default_value = OK_API_SERVER)]
    api_server: String,
    #[clap(long, env = "OK_WIDGET_SERVER", default_value = OK_CONNECT_URL)]
    widget_server: String,
    #[clap(long, env = "OK_GROUP_ID")]
    group_id: Option<String>,
    #[clap(long, env = "OK_LAYOUT")]
    layout: Option<Layout>,
    /// Log level (trace, debug, info, warn, error)
    #[clap(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let session = SessionState {
        app_id: args.app_id,
        app_key: args.app_key,
        session_key: args.session_key,
        access_token: args.access_token,
        session_secret_key: args.session_secret_key,
        api_server: args.api_server,
        widget_server: args.widget_server,
        group_id: args.group_id,
        layout: args.layout,
        container: false,
        header_widget: None,
    };

    let state = AppState {
        session: Arc::new(session),
        app_secret_key: args.app_secret_key.map(Arc::from),
    };

    run(args.host, args.port, state).await
}
