//! Error type shared by the domain, service and HTTP layers.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlinkError {
    #[error("Failed to load blink")]
    NotFound,

    #[error("Invalid input query parameter: {0}")]
    InvalidQueryParam(&'static str),

    #[error("Invalid \"account\" provided")]
    InvalidAccount,

    #[error("account may not be rent exempt: {0}")]
    NotRentExempt(Pubkey),

    #[error("Invalid blink: {0}")]
    InvalidDraft(String),

    #[error("Invalid blink link: {0}")]
    InvalidLink(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Blink {0} does not exist")]
    UnknownId(String),

    #[error("Blink list {0} does not exist")]
    NoBlinkList(Pubkey),

    #[error("Blink list is full: {needed} bytes needed, {available} available")]
    ListFull { needed: usize, available: usize },

    #[error("Transaction is too large: {size} bytes, limit {limit}")]
    TransactionTooLarge { size: usize, limit: usize },

    #[error("Blink list account data is invalid: {0}")]
    InvalidAccountData(String),

    #[error(transparent)]
    Chain(#[from] anyhow::Error),
}

pub type BlinkResult<T> = Result<T, BlinkError>;
