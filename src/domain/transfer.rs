//! Builders for the unsigned transactions handed out by the Actions API.
//!
//! Nothing here signs: the fee payer is the wallet that requested the action
//! and the signature slots are left zeroed for it to fill in.

use crate::error::{BlinkError, BlinkResult};
use base64::Engine;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account;

fn scale_ui_amount(amount: f64, decimals: u8) -> BlinkResult<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BlinkError::InvalidAmount(amount.to_string()));
    }
    let scaled = (amount * 10f64.powi(i32::from(decimals))).round();
    if scaled < 1.0 || scaled > u64::MAX as f64 {
        return Err(BlinkError::InvalidAmount(amount.to_string()));
    }
    Ok(scaled as u64)
}

const SOL_DECIMALS: u8 = 9;

pub fn sol_to_lamports(amount: f64) -> BlinkResult<u64> {
    scale_ui_amount(amount, SOL_DECIMALS)
}

/// Converts a UI amount (e.g. `1.5` tokens) to base units for a mint with `decimals`.
pub fn ui_amount_to_base_units(amount: f64, decimals: u8) -> BlinkResult<u64> {
    scale_ui_amount(amount, decimals)
}

pub fn unsigned_transaction(instructions: &[Instruction], payer: &Pubkey, blockhash: Hash) -> Transaction {
    let message = Message::new_with_blockhash(instructions, Some(payer), &blockhash);
    Transaction::new_unsigned(message)
}

pub fn build_sol_transfer(payer: &Pubkey, to: &Pubkey, lamports: u64, blockhash: Hash) -> Transaction {
    let ix = system_instruction::transfer(payer, to, lamports);
    unsigned_transaction(&[ix], payer, blockhash)
}

/// Everything needed to move one SPL token between two wallets.
#[derive(Debug, Clone)]
pub struct TokenTransfer {
    pub payer: Pubkey,
    pub to: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub decimals: u8,
    /// Whether the recipient's associated token account has to be created first.
    pub create_recipient_ata: bool,
}

pub fn token_transfer_instructions(transfer: &TokenTransfer) -> anyhow::Result<Vec<Instruction>> {
    let token_program = spl_token::id();
    let source = get_associated_token_address(&transfer.payer, &transfer.mint);
    let destination = get_associated_token_address(&transfer.to, &transfer.mint);

    let mut instructions = Vec::with_capacity(2);
    if transfer.create_recipient_ata {
        instructions.push(create_associated_token_account(
            &transfer.payer,
            &transfer.to,
            &transfer.mint,
            &token_program,
        ));
    }
    instructions.push(
        spl_token::instruction::transfer_checked(
            &token_program,
            &source,
            &transfer.mint,
            &destination,
            &transfer.payer,
            &[],
            transfer.amount,
            transfer.decimals,
        )
        .map_err(|e| anyhow::anyhow!("failed to build transfer_checked: {}", e))?,
    );
    Ok(instructions)
}

pub fn build_token_transfer(transfer: &TokenTransfer, blockhash: Hash) -> anyhow::Result<Transaction> {
    let instructions = token_transfer_instructions(transfer)?;
    Ok(unsigned_transaction(&instructions, &transfer.payer, blockhash))
}

/// Fails when `tx` would not fit in a single network packet once signed.
pub fn ensure_packet_size(tx: &Transaction) -> BlinkResult<()> {
    let size = bincode::serialized_size(tx).map_err(|e| BlinkError::Chain(e.into()))? as usize;
    if size > PACKET_DATA_SIZE {
        return Err(BlinkError::TransactionTooLarge {
            size,
            limit: PACKET_DATA_SIZE,
        });
    }
    Ok(())
}

/// Wire form of a transaction in an Actions POST response: bincode, then base64.
pub fn encode_transaction(tx: &Transaction) -> anyhow::Result<String> {
    let bytes = bincode::serialize(tx)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::native_token::LAMPORTS_PER_SOL;

    fn decode(encoded: &str) -> Transaction {
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        bincode::deserialize(&bytes).unwrap()
    }

    #[test]
    fn converts_sol_to_lamports() {
        assert_eq!(sol_to_lamports(0.1).unwrap(), 100_000_000);
        assert_eq!(sol_to_lamports(1.0).unwrap(), LAMPORTS_PER_SOL);
        // 0.3 is not representable; rounding keeps it exact in lamports.
        assert_eq!(sol_to_lamports(0.3).unwrap(), 300_000_000);
    }

    #[test]
    fn rejects_unusable_amounts() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-12] {
            assert!(sol_to_lamports(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn token_amount_respects_decimals() {
        assert_eq!(ui_amount_to_base_units(1.5, 6).unwrap(), 1_500_000);
        assert_eq!(ui_amount_to_base_units(2.0, 0).unwrap(), 2);
    }

    #[test]
    fn sol_transfer_is_unsigned_and_paid_by_sender() {
        let payer = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let blockhash = Hash::new_unique();
        let tx = build_sol_transfer(&payer, &to, 5_000_000, blockhash);

        assert_eq!(tx.message.instructions.len(), 1);
        assert_eq!(tx.message.account_keys[0], payer);
        assert_eq!(tx.message.recent_blockhash, blockhash);
        assert!(!tx.is_signed());

        let decoded = decode(&encode_transaction(&tx).unwrap());
        assert_eq!(decoded, tx);
    }

    #[test]
    fn oversized_transactions_are_refused() {
        let payer = Pubkey::new_unique();
        let tx = build_sol_transfer(&payer, &Pubkey::new_unique(), 1, Hash::default());
        assert!(ensure_packet_size(&tx).is_ok());

        let memo = Instruction::new_with_bytes(Pubkey::new_unique(), &[7u8; PACKET_DATA_SIZE], vec![]);
        let tx = unsigned_transaction(&[memo], &payer, Hash::default());
        assert!(matches!(
            ensure_packet_size(&tx),
            Err(BlinkError::TransactionTooLarge { limit: PACKET_DATA_SIZE, .. })
        ));
    }

    #[test]
    fn token_transfer_creates_ata_only_when_asked() {
        let mut transfer = TokenTransfer {
            payer: Pubkey::new_unique(),
            to: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            amount: 1_000_000,
            decimals: 6,
            create_recipient_ata: false,
        };
        let ixs = token_transfer_instructions(&transfer).unwrap();
        assert_eq!(ixs.len(), 1);
        assert_eq!(ixs[0].program_id, spl_token::id());

        transfer.create_recipient_ata = true;
        let ixs = token_transfer_instructions(&transfer).unwrap();
        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::id());
        assert_eq!(ixs[1].program_id, spl_token::id());

        let destination = get_associated_token_address(&transfer.to, &transfer.mint);
        assert!(ixs[1].accounts.iter().any(|meta| meta.pubkey == destination));
    }
}
