use crate::error::BlinkError;
use crate::transport::http::types::{ActionError, ActionSettings, ApiResponse, ACTION_VERSION};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, HOST,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub const X_ACTION_VERSION: HeaderName = HeaderName::from_static("x-action-version");
pub const X_BLOCKCHAIN_IDS: HeaderName = HeaderName::from_static("x-blockchain-ids");

pub const ACTION_ALLOWED_METHODS: &str = "GET,POST,PUT,OPTIONS";
pub const ACTION_ALLOWED_HEADERS: &str = "Content-Type, Authorization, Content-Encoding, Accept-Encoding, X-Accept-Action-Version, X-Accept-Blockchain-Ids";
pub const ACTION_EXPOSED_HEADERS: &str = "X-Action-Version, X-Blockchain-Ids";

/// Headers every Actions response carries, CORS included. `Content-Type` is
/// left to the body, so the empty `OPTIONS` reply does not claim JSON.
pub fn action_headers(settings: &ActionSettings) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ACTION_ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ACTION_ALLOWED_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(ACTION_EXPOSED_HEADERS),
    );
    headers.insert(X_ACTION_VERSION, HeaderValue::from_static(ACTION_VERSION));
    match HeaderValue::from_str(&settings.blockchain_id) {
        Ok(v) => {
            headers.insert(X_BLOCKCHAIN_IDS, v);
        }
        Err(_) => tracing::warn!(id = %settings.blockchain_id, "blockchain id is not a valid header value"),
    }
    headers
}

/// Origin (`scheme://host`) the client reached us on.
///
/// `PUBLIC_BASE_URL` wins; otherwise `X-Forwarded-Proto` / `Host` are used.
pub fn request_origin(settings: &ActionSettings, headers: &HeaderMap) -> String {
    if let Some(base) = &settings.public_base_url {
        return base.clone();
    }
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    format!("{}://{}", scheme, host)
}

pub fn share_url(origin: &str, pda: &Pubkey, id: &str) -> String {
    format!("{}/api/actions?pda={}&id={}", origin, pda, id)
}

/// Actions error reply: always 400, `{"message": ...}`.
pub fn action_error(settings: &ActionSettings, message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        action_headers(settings),
        Json(ActionError {
            message: message.into(),
        }),
    )
        .into_response()
}

pub fn parse_pubkey(raw: &str) -> Option<Pubkey> {
    Pubkey::from_str(raw.trim()).ok()
}

pub fn status_for(err: &BlinkError) -> StatusCode {
    match err {
        BlinkError::Chain(_) => StatusCode::BAD_GATEWAY,
        BlinkError::UnknownId(_) | BlinkError::NoBlinkList(_) | BlinkError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

pub fn api_ok(data: serde_json::Value) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}
