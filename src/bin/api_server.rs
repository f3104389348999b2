// src/bin/api_server.rs

use funblink::infra::config;
use funblink::transport;
use funblink::transport::http::ActionSettings;
use funblink::{BlinkService, RpcChain};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    funblink::init_tracing();

    // --- Chain Client Initialization ---
    let chain = RpcChain::from_env()?;
    let program_id = *chain.program_id();
    tracing::info!(rpc = %config::solana_rpc_url(), %program_id, "connecting to Solana RPC");
    if let Err(e) = funblink::BlinkChain::health(&chain).await {
        tracing::warn!(error = %e, "RPC is not reachable yet; requests will fail until it is");
    }

    // --- Service Initialization ---
    let settings = ActionSettings::from_env()?;
    tracing::info!(
        default_to = %settings.default_to,
        token_mint = %settings.token_mint,
        token_symbol = %settings.token_symbol,
        "actions configured"
    );
    let app_state = transport::http::AppState {
        service: Arc::new(BlinkService::new(Arc::new(chain), program_id)),
        settings: Arc::new(settings),
    };

    // --- API Server Initialization ---
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()));
    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API server listening on http://{}", bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", bind_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
