use crate::transport::http::handlers::common::ACTION_ALLOWED_HEADERS;
use crate::transport::http::handlers::{actions, blinks, health};
use crate::transport::http::types::{
    ActionError, ActionGetResponse, ActionLinks, ActionPostRequest, ActionPostResponse, ActionRule,
    ActionsJson, ApiResponse, BlinkView, CloseBlinkRequest, CreateBlinkRequest, DeleteBlinkRequest,
};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        actions::actions_json_handler,
        actions::sol_get_handler,
        actions::sol_post_handler,
        actions::token_get_handler,
        actions::token_post_handler,
        blinks::list_blinks_handler,
        blinks::create_blink_handler,
        blinks::delete_blink_handler,
        blinks::close_blink_handler
    ),
    components(schemas(
        ApiResponse,
        ActionGetResponse,
        ActionLinks,
        ActionPostRequest,
        ActionPostResponse,
        ActionError,
        ActionsJson,
        ActionRule,
        BlinkView,
        CreateBlinkRequest,
        DeleteBlinkRequest,
        CloseBlinkRequest
    ))
)]
pub struct ApiDoc;

/// CORS for the management routes. The Actions routes set their own headers
/// and answer `OPTIONS` themselves, so they stay outside this layer.
fn cors_layer() -> CorsLayer {
    let allowed_headers: Vec<HeaderName> = ACTION_ALLOWED_HEADERS
        .split(',')
        .filter_map(|h| HeaderName::from_bytes(h.trim().as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(allowed_headers)
        .expose_headers([
            HeaderName::from_static("x-action-version"),
            HeaderName::from_static("x-blockchain-ids"),
        ])
}

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    let management = Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/blinks", post(blinks::create_blink_handler))
        .route("/api/blinks/delete", post(blinks::delete_blink_handler))
        .route("/api/blinks/close", post(blinks::close_blink_handler))
        .route("/api/blinks/:owner", get(blinks::list_blinks_handler))
        .layer(cors_layer());

    Router::new()
        .route(
            "/actions.json",
            get(actions::actions_json_handler).options(actions::options_handler),
        )
        .route(
            "/api/actions",
            get(actions::sol_get_handler)
                .post(actions::sol_post_handler)
                .options(actions::options_handler),
        )
        .route(
            "/api/actions/token",
            get(actions::token_get_handler)
                .post(actions::token_post_handler)
                .options(actions::options_handler),
        )
        .merge(management)
        .with_state(app_state)
}
