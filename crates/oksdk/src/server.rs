use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SdkError;
use crate::params::Params;
use crate::payment::{PaymentOptions, Product, payment_link};
use crate::session::SessionState;
use crate::signing::SessionSigner;
use crate::widget::{Widget, widget_link};

/// Shared state of the signing service.
///
/// The application secret never leaves the server; clients ask for
/// signatures instead.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionState>,
    pub app_secret_key: Option<Arc<str>>,
}

#[derive(Debug, Deserialize)]
pub struct SignatureRequest {
    #[serde(default)]
    pub params: Params,
    /// Sign with the application secret instead of the session secret.
    #[serde(default)]
    pub app_secret: bool,
    /// Add application key, credential and format before signing.
    #[serde(default = "default_fill")]
    pub fill: bool,
}

fn default_fill() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignatureResponse {
    pub sig: String,
    /// The parameters exactly as signed.
    pub params: Params,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub mob_pay_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(|| async move { (StatusCode::OK, "Ok").into_response() }))
        .route("/signature", post(signature_handler))
        .route("/widget-link", post(widget_link_handler))
        .route("/payment-link", post(payment_link_handler))
        .with_state(state)
}

pub async fn run(host: String, port: u16, state: AppState) -> Result<()> {
    let app_id = state.session.app_id;
    let router = router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    info!(app_id, addr = %listener.local_addr()?, "signing service listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("serving signing requests")?;

    Ok(())
}

async fn signature_handler(
    State(state): State<AppState>,
    Json(request): Json<SignatureRequest>,
) -> Result<Json<SignatureResponse>, SdkError> {
    let signer = SessionSigner::new(&state.session);

    let secret = if request.app_secret {
        let secret = state.app_secret_key.as_deref().ok_or_else(|| {
            SdkError::BadRequest("no application secret is configured".to_string())
        })?;
        Some(secret)
    } else {
        None
    };

    let params = if request.fill {
        signer.fill_params(request.params)
    } else {
        request.params
    };
    let sig = signer.sign(&params, secret);

    Ok(Json(SignatureResponse { sig, params }))
}

async fn widget_link_handler(
    State(state): State<AppState>,
    Json(widget): Json<Widget>,
) -> Json<LinkResponse> {
    Json(LinkResponse {
        url: widget_link(&state.session, &widget),
    })
}

async fn payment_link_handler(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Json<LinkResponse> {
    let options = PaymentOptions {
        mob_pay_url: request.mob_pay_url,
    };
    Json(LinkResponse {
        url: payment_link(&state.session, &request.product, &options),
    })
}
