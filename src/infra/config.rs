//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_PROGRAM_ID: &str = "5Z4UkWTCAQu2sNRKkq4GcredbKuF9jGdSxG5mH7ypY6B";
/// Devnet wallet that receives transfers when a request carries no `to`.
pub const DEFAULT_TO_ADDRESS: &str = "5ufHigmjsV3ucetqXxZgZuYkmHyRiyYPYm5RSM8y2WFQ";
/// Devnet USDC.
pub const DEFAULT_TOKEN_MINT: &str = "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU";
pub const DEFAULT_TOKEN_SYMBOL: &str = "USDC";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";
/// CAIP-2 id of Solana devnet, advertised in `X-Blockchain-Ids`.
pub const DEVNET_BLOCKCHAIN_ID: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn pubkey_var(name: &str, default: &str) -> anyhow::Result<Pubkey> {
    let raw = var_or(name, default);
    Pubkey::from_str(raw.trim()).with_context(|| format!("{} is not a valid pubkey: {}", name, raw))
}

/// Solana RPC URL (defaults to devnet).
pub fn solana_rpc_url() -> String {
    var_or("SOLANA_RPC_URL", DEFAULT_RPC_URL)
}

/// Program id of the deployed `funblink` program.
pub fn program_id() -> anyhow::Result<Pubkey> {
    pubkey_var("FUNBLINK_PROGRAM_ID", DEFAULT_PROGRAM_ID)
}

pub fn default_to_address() -> anyhow::Result<Pubkey> {
    pubkey_var("DEFAULT_TO_ADDRESS", DEFAULT_TO_ADDRESS)
}

/// Mint transferred by the token route variant.
pub fn token_mint() -> anyhow::Result<Pubkey> {
    pubkey_var("TOKEN_MINT", DEFAULT_TOKEN_MINT)
}

pub fn token_symbol() -> String {
    var_or("TOKEN_SYMBOL", DEFAULT_TOKEN_SYMBOL)
}

/// Public origin used to build hrefs and share URLs.
///
/// When unset, the origin is taken from the request's `Host` header.
pub fn public_base_url() -> Option<String> {
    std::env::var("PUBLIC_BASE_URL")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
}

pub fn bind_addr() -> String {
    var_or("BIND_ADDR", DEFAULT_BIND_ADDR)
}

pub fn blockchain_id() -> String {
    var_or("BLOCKCHAIN_ID", DEVNET_BLOCKCHAIN_ID)
}

/// Path of the keypair used by the admin tools, with `~` expanded.
pub fn keypair_path() -> String {
    shellexpand::tilde(&var_or("SOLANA_KEYPAIR_PATH", DEFAULT_KEYPAIR_PATH)).to_string()
}
