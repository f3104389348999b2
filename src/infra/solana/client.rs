// Responsible for all communication with the Solana blockchain.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::program_pack::Pack;
use solana_program::pubkey::Pubkey;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    signature::Signature,
    signer::{
        keypair::{read_keypair_file, Keypair},
        Signer,
    },
    transaction::Transaction,
};

use crate::domain::blink::BlinkList;
use crate::infra::config;
use crate::infra::solana::program::decode_blink_list;

/// Read access to the chain, as needed by the Actions API.
///
/// The HTTP layer only talks to this trait so it can run against a local
/// stand-in in tests.
#[async_trait]
pub trait BlinkChain: Send + Sync {
    /// Fetches and decodes the BlinkList at `pda`; `None` when the account does not exist.
    async fn fetch_blink_list(&self, pda: &Pubkey) -> anyhow::Result<Option<BlinkList>>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64>;

    /// Latest blockhash at `finalized` commitment.
    async fn latest_blockhash(&self) -> anyhow::Result<Hash>;

    async fn account_exists(&self, pubkey: &Pubkey) -> anyhow::Result<bool>;

    async fn mint_decimals(&self, mint: &Pubkey) -> anyhow::Result<u8>;

    async fn health(&self) -> anyhow::Result<()>;
}

/// `BlinkChain` backed by a JSON-RPC node.
pub struct RpcChain {
    client: RpcClient,
    program_id: Pubkey,
}

impl RpcChain {
    pub fn new(rpc_url: String, program_id: Pubkey) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed()),
            program_id,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(config::solana_rpc_url(), config::program_id()?))
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.client
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }
}

#[async_trait]
impl BlinkChain for RpcChain {
    async fn fetch_blink_list(&self, pda: &Pubkey) -> anyhow::Result<Option<BlinkList>> {
        let response = self
            .client
            .get_account_with_commitment(pda, self.client.commitment())
            .await?;
        let Some(account) = response.value else {
            tracing::debug!(%pda, "blink list account not found");
            return Ok(None);
        };
        if account.owner != self.program_id {
            return Err(anyhow::anyhow!(
                "account {} is owned by {}, not the funblink program",
                pda,
                account.owner
            ));
        }
        Ok(Some(decode_blink_list(&account.data)?))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        Ok(self
            .client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }

    async fn latest_blockhash(&self) -> anyhow::Result<Hash> {
        let (blockhash, _last_valid_height) = self
            .client
            .get_latest_blockhash_with_commitment(CommitmentConfig::finalized())
            .await?;
        Ok(blockhash)
    }

    async fn account_exists(&self, pubkey: &Pubkey) -> anyhow::Result<bool> {
        let response = self
            .client
            .get_account_with_commitment(pubkey, self.client.commitment())
            .await?;
        Ok(response.value.is_some())
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> anyhow::Result<u8> {
        let account = self.client.get_account(mint).await?;
        if account.owner != spl_token::id() {
            return Err(anyhow::anyhow!("{} is not an SPL token mint", mint));
        }
        let mint_state = spl_token::state::Mint::unpack(&account.data)
            .map_err(|e| anyhow::anyhow!("Failed to decode mint {}: {}", mint, e))?;
        Ok(mint_state.decimals)
    }

    async fn health(&self) -> anyhow::Result<()> {
        self.client.get_slot().await?;
        Ok(())
    }
}

/// Reads the keypair the admin tools sign with (`SOLANA_KEYPAIR_PATH`).
pub fn load_payer() -> anyhow::Result<Keypair> {
    let path = config::keypair_path();
    read_keypair_file(&path).map_err(|e| anyhow::anyhow!("Failed to read keypair file {}: {}", path, e))
}

/// Signs `instructions` with `payer` and waits for confirmation.
pub async fn send_and_confirm(
    client: &RpcClient,
    payer: &Keypair,
    instructions: &[Instruction],
) -> anyhow::Result<Signature> {
    let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
    let recent_blockhash = client.get_latest_blockhash().await?;
    transaction.sign(&[payer], recent_blockhash);
    let signature = client.send_and_confirm_transaction(&transaction).await?;

    tracing::info!(%signature, "transaction confirmed");
    Ok(signature)
}
