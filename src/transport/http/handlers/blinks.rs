//! Blink management: listing a wallet's Blinks and preparing the
//! create/delete/close transactions for the owner to sign.

use crate::domain::blink::BlinkDraft;
use crate::domain::transfer::encode_transaction;
use crate::error::BlinkError;
use crate::transport::http::handlers::common::{
    api_error, api_ok, parse_pubkey, request_origin, share_url, status_for,
};
use crate::transport::http::types::{
    json_400, ApiResponse, AppState, BlinkView, CloseBlinkRequest, CreateBlinkRequest,
    DeleteBlinkRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

fn owner_or_400(raw: &str) -> Result<Pubkey, Response> {
    parse_pubkey(raw).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid owner address: {}", raw),
        )
    })
}

fn blink_error(err: BlinkError) -> Response {
    api_error(status_for(&err), err.to_string())
}

async fn unsigned_base64(state: &AppState, instruction: Instruction, owner: &Pubkey) -> Result<String, Response> {
    let tx = state
        .service
        .unsigned(&[instruction], owner)
        .await
        .map_err(blink_error)?;
    encode_transaction(&tx).map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/blinks/{owner}",
    params(("owner" = String, Path, description = "Wallet owning the Blink list")),
    responses(
        (status = 200, description = "The owner's Blinks", body = ApiResponse),
        (status = 400, description = "Invalid owner", body = ApiResponse),
        (status = 502, description = "RPC failure", body = ApiResponse)
    )
)]
pub async fn list_blinks_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(owner): Path<String>,
) -> Response {
    let owner = match owner_or_400(&owner) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    let (pda, blinks) = match state.service.list_blinks(&owner).await {
        Ok(v) => v,
        Err(e) => return blink_error(e),
    };

    let origin = request_origin(&state.settings, &headers);
    let views: Vec<BlinkView> = blinks
        .iter()
        .map(|b| BlinkView::from_blink(b, share_url(&origin, &pda, &b.id)))
        .collect();

    api_ok(serde_json::json!({
        "owner": owner.to_string(),
        "pda": pda.to_string(),
        "blinks": views,
    }))
}

#[utoipa::path(
    post,
    path = "/api/blinks",
    request_body = CreateBlinkRequest,
    responses(
        (status = 200, description = "Unsigned create_blink transaction", body = ApiResponse),
        (status = 400, description = "Invalid Blink", body = ApiResponse),
        (status = 502, description = "RPC failure", body = ApiResponse)
    )
)]
pub async fn create_blink_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateBlinkRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return json_400(e, "CreateBlinkRequest").into_response(),
    };
    let owner = match owner_or_400(&request.owner) {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let draft = BlinkDraft {
        title: request.title,
        icon: request.icon,
        description: request.description,
        to_pubkey: request.to_pubkey,
        amounts: request.amounts,
        manual_send: request.manual_send,
    };
    let prepared = match state.service.prepare_create(&owner, draft).await {
        Ok(p) => p,
        Err(e) => return blink_error(e),
    };
    let transaction = match unsigned_base64(&state, prepared.instruction, &owner).await {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let origin = request_origin(&state.settings, &headers);
    let id = prepared.id.to_string();
    let url = share_url(&origin, &prepared.pda, &id);
    api_ok(serde_json::json!({
        "id": id,
        "pda": prepared.pda.to_string(),
        "share_url": url.clone(),
        "blink": BlinkView::from_blink(&prepared.blink, url),
        "transaction": transaction,
    }))
}

#[utoipa::path(
    post,
    path = "/api/blinks/delete",
    request_body = DeleteBlinkRequest,
    responses(
        (status = 200, description = "Unsigned delete_blink transaction", body = ApiResponse),
        (status = 404, description = "Unknown Blink", body = ApiResponse)
    )
)]
pub async fn delete_blink_handler(
    State(state): State<AppState>,
    body: Result<Json<DeleteBlinkRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return json_400(e, "DeleteBlinkRequest").into_response(),
    };
    let owner = match owner_or_400(&request.owner) {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let instruction = match state.service.prepare_delete(&owner, &request.id).await {
        Ok(ix) => ix,
        Err(e) => return blink_error(e),
    };
    match unsigned_base64(&state, instruction, &owner).await {
        Ok(transaction) => api_ok(serde_json::json!({
            "id": request.id,
            "pda": state.service.pda_for(&owner).to_string(),
            "transaction": transaction,
        })),
        Err(resp) => resp,
    }
}

#[utoipa::path(
    post,
    path = "/api/blinks/close",
    request_body = CloseBlinkRequest,
    responses(
        (status = 200, description = "Unsigned close_blink transaction", body = ApiResponse),
        (status = 404, description = "No Blink list for this owner", body = ApiResponse)
    )
)]
pub async fn close_blink_handler(
    State(state): State<AppState>,
    body: Result<Json<CloseBlinkRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return json_400(e, "CloseBlinkRequest").into_response(),
    };
    let owner = match owner_or_400(&request.owner) {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let instruction = match state.service.prepare_close(&owner).await {
        Ok(ix) => ix,
        Err(e) => return blink_error(e),
    };
    match unsigned_base64(&state, instruction, &owner).await {
        Ok(transaction) => api_ok(serde_json::json!({
            "pda": state.service.pda_for(&owner).to_string(),
            "transaction": transaction,
        })),
        Err(resp) => resp,
    }
}
