use axum::http::StatusCode;
use axum_core::response::{IntoResponse as AxumCoreIntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("Required arguments app_id/app_key not passed")]
    MissingAppIdentity,
    #[error("Error with OAUTH authorization: {0}")]
    OAuth(String),
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("Failed to reach the API server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Bad input maps to 400, API and transport failures to 502, the rest to 500.
impl AxumCoreIntoResponse for SdkError {
    fn into_response(self) -> Response {
        match self {
            invalid @ (SdkError::BadRequest(_) | SdkError::MissingAppIdentity) => {
                (StatusCode::BAD_REQUEST, invalid.to_string()).into_response()
            }
            upstream @ (SdkError::Api { .. }
            | SdkError::Transport(_)
            | SdkError::UnexpectedResponse(_)) => {
                (StatusCode::BAD_GATEWAY, upstream.to_string()).into_response()
            }
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_returns_400() {
        let error = SdkError::BadRequest("bad".into());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_identity_returns_400() {
        let response = SdkError::MissingAppIdentity.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_returns_502() {
        let error = SdkError::Api {
            code: 100,
            message: "PARAM : Missing required parameter".into(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn oauth_error_returns_500() {
        let response = SdkError::OAuth("access_denied".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn oauth_message_keeps_platform_wording() {
        let error = SdkError::OAuth("access_denied".into());
        assert_eq!(error.to_string(), "Error with OAUTH authorization: access_denied");
    }
}
