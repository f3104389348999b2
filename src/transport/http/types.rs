use crate::app::blink_service::BlinkService;
use crate::domain::blink::{Blink, BlinkLink, LinkedAction};
use crate::infra::config;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use utoipa::ToSchema;

/// Amount used when a POST carries no `amount` query parameter.
pub const DEFAULT_SOL_AMOUNT: f64 = 0.1;
pub const DEFAULT_TITLE: &str = "Actions Example - Transfer Native SOL";
pub const DEFAULT_DESCRIPTION: &str = "Transfer SOL to another Solana wallet";
pub const DEFAULT_ICON_PATH: &str = "/solana-token.png";
/// Actions protocol version advertised in `X-Action-Version`.
pub const ACTION_VERSION: &str = "2.1.3";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BlinkService>,
    pub settings: Arc<ActionSettings>,
}

/// Fixed parameters of the Actions routes.
#[derive(Debug, Clone)]
pub struct ActionSettings {
    pub default_to: Pubkey,
    pub default_amount: f64,
    pub token_mint: Pubkey,
    pub token_symbol: String,
    pub public_base_url: Option<String>,
    pub blockchain_id: String,
}

impl ActionSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            default_to: config::default_to_address()?,
            default_amount: DEFAULT_SOL_AMOUNT,
            token_mint: config::token_mint()?,
            token_symbol: config::token_symbol(),
            public_base_url: config::public_base_url(),
            blockchain_id: config::blockchain_id(),
        })
    }
}

/// The two route variants: native SOL, or the configured SPL mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Sol,
    Token,
}

impl TransferKind {
    pub fn path(self) -> &'static str {
        match self {
            TransferKind::Sol => "/api/actions",
            TransferKind::Token => "/api/actions/token",
        }
    }

    pub fn symbol(self, settings: &ActionSettings) -> &str {
        match self {
            TransferKind::Sol => "SOL",
            TransferKind::Token => &settings.token_symbol,
        }
    }
}

/// Body of an Actions GET.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ActionGetResponse {
    /// Always `action`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub label: String,
    pub links: ActionLinks,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ActionLinks {
    #[schema(value_type = Vec<Object>)]
    pub actions: Vec<LinkedAction>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ActionPostRequest {
    /// Base58 address of the wallet that will sign and pay.
    pub account: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ActionPostResponse {
    /// Always `transaction`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Base64 of the bincode-serialized unsigned transaction.
    pub transaction: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ActionError {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ActionsJson {
    pub rules: Vec<ActionRule>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub path_pattern: String,
    pub api_path: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateBlinkRequest {
    /// Wallet that owns the Blink list and signs the transaction.
    pub owner: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    /// Recipient of the transfers the Blink offers.
    pub to_pubkey: String,
    /// Preset amounts (1 to 9, up to 3 decimals).
    pub amounts: Vec<f64>,
    /// Also offer a free-form amount input.
    #[serde(default)]
    pub manual_send: bool,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct DeleteBlinkRequest {
    pub owner: String,
    pub id: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CloseBlinkRequest {
    pub owner: String,
}

/// A stored Blink with its link JSON unpacked.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct BlinkView {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub label: String,
    pub to_pubkey: String,
    pub amounts: Vec<f64>,
    pub manual_send: bool,
    /// Actions URL to share, `<origin>/api/actions?pda=<pda>&id=<id>`.
    pub share_url: String,
}

impl BlinkView {
    pub fn from_blink(blink: &Blink, share_url: String) -> Self {
        // A malformed link shows up as an empty preset list rather than failing the listing.
        let link = BlinkLink::parse(&blink.link).ok();
        Self {
            id: blink.id.clone(),
            title: blink.title.clone(),
            icon: blink.icon.clone(),
            description: blink.description.clone(),
            label: blink.label.clone(),
            to_pubkey: blink.to_pubkey.clone(),
            amounts: link
                .as_ref()
                .map(|l| l.amounts.iter().map(|p| p.value).collect())
                .unwrap_or_default(),
            manual_send: link.map(|l| l.manual_send).unwrap_or(false),
            share_url,
        }
    }
}

pub fn json_400(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}
