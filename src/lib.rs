pub mod app;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::blink_service::{BlinkService, PreparedBlink};
pub use domain::blink::{Blink, BlinkDraft, BlinkLink, BlinkList};
pub use error::{BlinkError, BlinkResult};
pub use infra::solana;
pub use infra::solana::{BlinkChain, RpcChain};

/// Installs the `tracing` subscriber used by the binaries (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
