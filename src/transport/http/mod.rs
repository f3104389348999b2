pub mod router;
pub mod types;
pub mod handlers {
    pub mod actions;
    pub mod blinks;
    pub mod common;
    pub mod health;
}

pub use router::{create_router, ApiDoc};
pub use types::{ActionSettings, AppState, TransferKind};
