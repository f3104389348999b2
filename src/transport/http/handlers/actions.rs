//! Solana Actions endpoints.
//!
//! `GET` resolves `?pda=&id=` into the Blink's action buttons, `POST` turns
//! `?to=&amount=` plus the wallet in the body into an unsigned transaction,
//! and `OPTIONS` only answers with the action headers.

use crate::domain::blink::{BlinkLink, DEFAULT_LABEL};
use crate::domain::transfer::encode_transaction;
use crate::error::BlinkError;
use crate::transport::http::handlers::common::{action_error, action_headers, parse_pubkey, request_origin};
use crate::transport::http::types::{
    ActionError, ActionGetResponse, ActionLinks, ActionPostRequest, ActionPostResponse, ActionRule,
    ActionsJson, AppState, TransferKind, DEFAULT_DESCRIPTION, DEFAULT_ICON_PATH, DEFAULT_TITLE,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;

type QueryParams = Query<HashMap<String, String>>;

fn non_empty_or(value: &str, fallback: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value.to_string()
    }
}

async fn get_action(state: AppState, kind: TransferKind, headers: HeaderMap, params: HashMap<String, String>) -> Response {
    let settings = &state.settings;
    let pda = params.get("pda").map(String::as_str).unwrap_or_default();
    let id = params.get("id").map(String::as_str).unwrap_or_default();

    let blink = match state.service.load_blink(pda, id).await {
        Ok(blink) => blink,
        Err(e) => return action_error(settings, e.to_string()),
    };
    let link = match BlinkLink::parse(&blink.link) {
        Ok(link) => link,
        Err(e) => {
            tracing::error!(pda, id, error = %e, "stored blink has an unreadable link");
            return action_error(settings, BlinkError::NotFound.to_string());
        }
    };

    let origin = request_origin(settings, &headers);
    let base_href = format!("{}{}?to={}", origin, kind.path(), blink.to_pubkey);
    let actions = link.actions(&base_href, kind.symbol(settings));
    tracing::debug!(pda, id, actions = actions.len(), "resolved blink");

    let payload = ActionGetResponse {
        kind: "action".to_string(),
        title: non_empty_or(&blink.title, || DEFAULT_TITLE.to_string()),
        icon: non_empty_or(&blink.icon, || format!("{}{}", origin, DEFAULT_ICON_PATH)),
        description: non_empty_or(&blink.description, || DEFAULT_DESCRIPTION.to_string()),
        label: non_empty_or(&blink.label, || DEFAULT_LABEL.to_string()),
        links: ActionLinks { actions },
    };
    (StatusCode::OK, action_headers(settings), Json(payload)).into_response()
}

/// Reads `to` and `amount`, falling back to the configured defaults when absent.
pub fn validated_query_params(
    params: &HashMap<String, String>,
    default_to: Pubkey,
    default_amount: f64,
) -> Result<(Pubkey, f64), BlinkError> {
    let to = match params.get("to").filter(|v| !v.is_empty()) {
        Some(raw) => parse_pubkey(raw).ok_or(BlinkError::InvalidQueryParam("to"))?,
        None => default_to,
    };

    let amount = match params.get("amount").filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| BlinkError::InvalidQueryParam("amount"))?,
        None => default_amount,
    };
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BlinkError::InvalidQueryParam("amount"));
    }
    Ok((to, amount))
}

async fn post_action(
    state: AppState,
    kind: TransferKind,
    params: HashMap<String, String>,
    body: Result<Json<ActionPostRequest>, JsonRejection>,
) -> Response {
    let settings = &state.settings;
    let (to, amount) = match validated_query_params(&params, settings.default_to, settings.default_amount) {
        Ok(v) => v,
        Err(e) => return action_error(settings, e.to_string()),
    };

    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => return action_error(settings, format!("Invalid request body: {}", e.body_text())),
    };
    let Some(account) = parse_pubkey(&body.account) else {
        return action_error(settings, BlinkError::InvalidAccount.to_string());
    };

    let built = match kind {
        TransferKind::Sol => state.service.sol_transfer(&account, &to, amount).await,
        TransferKind::Token => {
            state
                .service
                .token_transfer(&account, &to, &settings.token_mint, amount)
                .await
        }
    };
    let transaction = match built.and_then(|tx| Ok(encode_transaction(&tx)?)) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!(%account, %to, amount, error = %e, "failed to build action transaction");
            return action_error(settings, e.to_string());
        }
    };

    let symbol = kind.symbol(settings);
    tracing::info!(%account, %to, amount, symbol, "built action transaction");
    let payload = ActionPostResponse {
        kind: "transaction".to_string(),
        transaction,
        message: format!("Send {} {} to {}", amount, symbol, to),
    };
    (StatusCode::OK, action_headers(settings), Json(payload)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/actions",
    params(
        ("pda" = String, Query, description = "Blink list account"),
        ("id" = String, Query, description = "Blink id within the list")
    ),
    responses(
        (status = 200, description = "Action metadata", body = ActionGetResponse),
        (status = 400, description = "Blink could not be loaded", body = ActionError)
    )
)]
pub async fn sol_get_handler(State(state): State<AppState>, headers: HeaderMap, Query(params): QueryParams) -> Response {
    get_action(state, TransferKind::Sol, headers, params).await
}

#[utoipa::path(
    post,
    path = "/api/actions",
    params(
        ("to" = Option<String>, Query, description = "Recipient wallet"),
        ("amount" = Option<f64>, Query, description = "Amount of SOL")
    ),
    request_body = ActionPostRequest,
    responses(
        (status = 200, description = "Unsigned transfer transaction", body = ActionPostResponse),
        (status = 400, description = "Invalid request", body = ActionError)
    )
)]
pub async fn sol_post_handler(
    State(state): State<AppState>,
    Query(params): QueryParams,
    body: Result<Json<ActionPostRequest>, JsonRejection>,
) -> Response {
    post_action(state, TransferKind::Sol, params, body).await
}

#[utoipa::path(
    get,
    path = "/api/actions/token",
    params(
        ("pda" = String, Query, description = "Blink list account"),
        ("id" = String, Query, description = "Blink id within the list")
    ),
    responses(
        (status = 200, description = "Action metadata", body = ActionGetResponse),
        (status = 400, description = "Blink could not be loaded", body = ActionError)
    )
)]
pub async fn token_get_handler(State(state): State<AppState>, headers: HeaderMap, Query(params): QueryParams) -> Response {
    get_action(state, TransferKind::Token, headers, params).await
}

#[utoipa::path(
    post,
    path = "/api/actions/token",
    params(
        ("to" = Option<String>, Query, description = "Recipient wallet"),
        ("amount" = Option<f64>, Query, description = "Amount in whole tokens")
    ),
    request_body = ActionPostRequest,
    responses(
        (status = 200, description = "Unsigned token transfer transaction", body = ActionPostResponse),
        (status = 400, description = "Invalid request", body = ActionError)
    )
)]
pub async fn token_post_handler(
    State(state): State<AppState>,
    Query(params): QueryParams,
    body: Result<Json<ActionPostRequest>, JsonRejection>,
) -> Response {
    post_action(state, TransferKind::Token, params, body).await
}

/// `OPTIONS` for both variants; without it wallets fail the CORS check.
pub async fn options_handler(State(state): State<AppState>) -> Response {
    (StatusCode::OK, action_headers(&state.settings)).into_response()
}

#[utoipa::path(
    get,
    path = "/actions.json",
    responses((status = 200, description = "Actions URL mapping", body = ActionsJson))
)]
pub async fn actions_json_handler(State(state): State<AppState>) -> Response {
    let rules = ActionsJson {
        rules: vec![ActionRule {
            path_pattern: "/api/actions/**".to_string(),
            api_path: "/api/actions/**".to_string(),
        }],
    };
    (StatusCode::OK, action_headers(&state.settings), Json(rules)).into_response()
}
