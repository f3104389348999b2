//! Shared fixtures: an in-memory chain and a server bound to a random port.

#![allow(dead_code)]

use async_trait::async_trait;
use funblink::transport;
use funblink::transport::http::ActionSettings;
use funblink::{BlinkChain, BlinkList, BlinkService};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const RENT_EXEMPT_MINIMUM: u64 = 890_880;
pub const MINT_DECIMALS: u8 = 6;

#[derive(Default)]
pub struct MockChain {
    pub lists: Mutex<HashMap<Pubkey, BlinkList>>,
    pub existing_accounts: Mutex<HashSet<Pubkey>>,
    pub blockhash: Hash,
    pub offline: bool,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            ..Default::default()
        }
    }

    pub fn with_list(self, pda: Pubkey, list: BlinkList) -> Self {
        self.lists.lock().unwrap().insert(pda, list);
        self
    }

    pub fn with_account(self, pubkey: Pubkey) -> Self {
        self.existing_accounts.lock().unwrap().insert(pubkey);
        self
    }

    fn check_online(&self) -> anyhow::Result<()> {
        if self.offline {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl BlinkChain for MockChain {
    async fn fetch_blink_list(&self, pda: &Pubkey) -> anyhow::Result<Option<BlinkList>> {
        self.check_online()?;
        Ok(self.lists.lock().unwrap().get(pda).cloned())
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        self.check_online()?;
        Ok(RENT_EXEMPT_MINIMUM + 6_960 * data_len as u64)
    }

    async fn latest_blockhash(&self) -> anyhow::Result<Hash> {
        self.check_online()?;
        Ok(self.blockhash)
    }

    async fn account_exists(&self, pubkey: &Pubkey) -> anyhow::Result<bool> {
        self.check_online()?;
        Ok(self.existing_accounts.lock().unwrap().contains(pubkey))
    }

    async fn mint_decimals(&self, _mint: &Pubkey) -> anyhow::Result<u8> {
        self.check_online()?;
        Ok(MINT_DECIMALS)
    }

    async fn health(&self) -> anyhow::Result<()> {
        self.check_online()
    }
}

pub fn settings() -> ActionSettings {
    ActionSettings {
        default_to: Pubkey::new_unique(),
        default_amount: 0.1,
        token_mint: Pubkey::new_unique(),
        token_symbol: "USDC".to_string(),
        public_base_url: None,
        blockchain_id: "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1".to_string(),
    }
}

pub struct TestServer {
    pub base_url: String,
    pub program_id: Pubkey,
    pub settings: ActionSettings,
    pub chain: Arc<MockChain>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server(program_id: Pubkey, chain: MockChain, settings: ActionSettings) -> TestServer {
    let chain = Arc::new(chain);
    let state = transport::http::AppState {
        service: Arc::new(BlinkService::new(chain.clone(), program_id)),
        settings: Arc::new(settings.clone()),
    };
    let router = transport::http::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        program_id,
        settings,
        chain,
        handle,
    }
}

pub fn decode_transaction(encoded: &str) -> solana_sdk::transaction::Transaction {
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
    bincode::deserialize(&bytes).unwrap()
}
