//! The Blink service.
//!
//! Sits between the transports (HTTP API, admin CLI) and the chain. It is
//! responsible for:
//! 1.  Resolving a `(pda, id)` pair into a stored Blink.
//! 2.  Preparing the program instructions that create, delete and close Blinks.
//! 3.  Building the unsigned SOL / SPL transfers an Action hands to a wallet.

use crate::domain::blink::{next_blink_id, Blink, BlinkDraft, BlinkList};
use crate::domain::transfer::{
    build_sol_transfer, build_token_transfer, ensure_packet_size, sol_to_lamports,
    ui_amount_to_base_units, unsigned_transaction, TokenTransfer,
};
use crate::error::{BlinkError, BlinkResult};
use crate::infra::solana::program::{
    blink_list_pda, close_blink_instruction, create_blink_instruction, delete_blink_instruction,
    ensure_capacity,
};
use crate::infra::solana::BlinkChain;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;
use std::str::FromStr;
use std::sync::Arc;

/// A `create_blink` call ready to be signed by the owner.
#[derive(Debug, Clone)]
pub struct PreparedBlink {
    pub id: u64,
    pub pda: Pubkey,
    pub blink: Blink,
    pub instruction: Instruction,
}

pub struct BlinkService {
    chain: Arc<dyn BlinkChain>,
    program_id: Pubkey,
}

impl BlinkService {
    pub fn new(chain: Arc<dyn BlinkChain>, program_id: Pubkey) -> Self {
        Self { chain, program_id }
    }

    pub fn chain(&self) -> &Arc<dyn BlinkChain> {
        &self.chain
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn pda_for(&self, owner: &Pubkey) -> Pubkey {
        blink_list_pda(owner, &self.program_id).0
    }

    /// Looks up Blink `id` in the list stored at `pda`.
    ///
    /// Every failure (bad address, RPC error, missing account or id) collapses
    /// into `BlinkError::NotFound`; the cause is only logged.
    pub async fn load_blink(&self, pda: &str, id: &str) -> BlinkResult<Blink> {
        let pda = Pubkey::from_str(pda.trim()).map_err(|_| {
            tracing::warn!(pda, "blink lookup with invalid pda");
            BlinkError::NotFound
        })?;

        match self.chain.fetch_blink_list(&pda).await {
            Ok(Some(list)) => list.find(id).cloned().ok_or_else(|| {
                tracing::warn!(%pda, id, "blink not found in list");
                BlinkError::NotFound
            }),
            Ok(None) => {
                tracing::warn!(%pda, "blink list account does not exist");
                Err(BlinkError::NotFound)
            }
            Err(e) => {
                tracing::error!(%pda, error = %e, "failed to fetch blink list");
                Err(BlinkError::NotFound)
            }
        }
    }

    /// Returns the owner's list PDA and its Blinks (empty when the account is missing).
    pub async fn list_blinks(&self, owner: &Pubkey) -> BlinkResult<(Pubkey, Vec<Blink>)> {
        let pda = self.pda_for(owner);
        let list = self.chain.fetch_blink_list(&pda).await?;
        Ok((pda, list.map(|l| l.blinks).unwrap_or_default()))
    }

    async fn fetch_list(&self, owner: &Pubkey) -> BlinkResult<(Pubkey, Option<BlinkList>)> {
        let pda = self.pda_for(owner);
        let list = self.chain.fetch_blink_list(&pda).await?;
        Ok((pda, list))
    }

    /// Validates `draft`, assigns the next id and builds the `create_blink` instruction.
    pub async fn prepare_create(&self, owner: &Pubkey, draft: BlinkDraft) -> BlinkResult<PreparedBlink> {
        draft.validate()?;
        let (pda, list) = self.fetch_list(owner).await?;

        let id = next_blink_id(list.as_ref())?;
        let blink = draft.into_blink(id)?;
        ensure_capacity(list.as_ref(), &blink)?;

        let instruction = create_blink_instruction(&self.program_id, owner, &blink)?;
        ensure_packet_size(&unsigned_transaction(
            std::slice::from_ref(&instruction),
            owner,
            Hash::default(),
        ))?;
        tracing::info!(%owner, %pda, id, "prepared create_blink");
        Ok(PreparedBlink {
            id,
            pda,
            blink,
            instruction,
        })
    }

    pub async fn prepare_delete(&self, owner: &Pubkey, id: &str) -> BlinkResult<Instruction> {
        let (pda, list) = self.fetch_list(owner).await?;
        let list = list.ok_or(BlinkError::NoBlinkList(pda))?;
        if !list.contains(id) {
            return Err(BlinkError::UnknownId(id.to_string()));
        }

        tracing::info!(%owner, %pda, id, "prepared delete_blink");
        Ok(delete_blink_instruction(&self.program_id, owner, id)?)
    }

    pub async fn prepare_close(&self, owner: &Pubkey) -> BlinkResult<Instruction> {
        let (pda, list) = self.fetch_list(owner).await?;
        match list {
            Some(list) if list.is_initialized => {
                tracing::info!(%owner, %pda, "prepared close_blink");
                Ok(close_blink_instruction(&self.program_id, owner))
            }
            _ => Err(BlinkError::NoBlinkList(pda)),
        }
    }

    /// Wraps `instructions` in an unsigned transaction paid by `payer`.
    pub async fn unsigned(&self, instructions: &[Instruction], payer: &Pubkey) -> BlinkResult<Transaction> {
        let blockhash = self.chain.latest_blockhash().await?;
        Ok(unsigned_transaction(instructions, payer, blockhash))
    }

    /// Native SOL transfer of `amount` SOL from `payer` to `to`.
    ///
    /// Refuses amounts below the rent-exempt minimum of a data-less account,
    /// since the recipient might be a fresh wallet.
    pub async fn sol_transfer(&self, payer: &Pubkey, to: &Pubkey, amount: f64) -> BlinkResult<Transaction> {
        let lamports = sol_to_lamports(amount)?;
        let minimum_balance = self.chain.minimum_balance_for_rent_exemption(0).await?;
        if lamports < minimum_balance {
            return Err(BlinkError::NotRentExempt(*to));
        }

        let blockhash = self.chain.latest_blockhash().await?;
        Ok(build_sol_transfer(payer, to, lamports, blockhash))
    }

    /// SPL transfer of `amount` whole tokens of `mint`; creates the recipient's
    /// associated token account when it does not exist yet.
    pub async fn token_transfer(
        &self,
        payer: &Pubkey,
        to: &Pubkey,
        mint: &Pubkey,
        amount: f64,
    ) -> BlinkResult<Transaction> {
        let decimals = self.chain.mint_decimals(mint).await?;
        let base_units = ui_amount_to_base_units(amount, decimals)?;

        let recipient_ata = get_associated_token_address(to, mint);
        let create_recipient_ata = !self.chain.account_exists(&recipient_ata).await?;
        if create_recipient_ata {
            tracing::debug!(%to, %recipient_ata, "recipient token account missing, adding create instruction");
        }

        let transfer = TokenTransfer {
            payer: *payer,
            to: *to,
            mint: *mint,
            amount: base_units,
            decimals,
            create_recipient_ata,
        };
        let blockhash = self.chain.latest_blockhash().await?;
        Ok(build_token_transfer(&transfer, blockhash)?)
    }
}
