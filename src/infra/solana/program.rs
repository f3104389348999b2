// Client-side view of the funblink program: PDA derivation, instruction
// encoding and account decoding. Must stay in sync with
// solana_program/programs/funblink.

use crate::crypto::hashing::{account_discriminator, instruction_discriminator, DISCRIMINATOR_LEN};
use crate::domain::blink::{Blink, BlinkList};
use crate::error::{BlinkError, BlinkResult};
use borsh::BorshDeserialize;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

pub const BLINK_LIST_SEED: &[u8] = b"blink_list";
/// Space allocated for a BlinkList account, discriminator included.
pub const BLINK_LIST_SPACE: usize = 2048;
const BLINK_LIST_ACCOUNT: &str = "BlinkList";

/// Each wallet owns exactly one list, at `["blink_list", owner]`.
pub fn blink_list_pda(owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[BLINK_LIST_SEED, owner.as_ref()], program_id)
}

/// Builds `create_blink(id, title, icon, description, label, to_pubkey, link)`.
///
/// The instruction arguments are laid out exactly like a borsh-encoded `Blink`.
pub fn create_blink_instruction(
    program_id: &Pubkey,
    owner: &Pubkey,
    blink: &Blink,
) -> anyhow::Result<Instruction> {
    let (blink_list, _bump) = blink_list_pda(owner, program_id);
    let mut data = instruction_discriminator("create_blink").to_vec();
    data.extend(borsh::to_vec(blink)?);

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(blink_list, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(solana_program::system_program::ID, false),
        ],
        data,
    })
}

pub fn delete_blink_instruction(
    program_id: &Pubkey,
    owner: &Pubkey,
    id: &str,
) -> anyhow::Result<Instruction> {
    let (blink_list, _bump) = blink_list_pda(owner, program_id);
    let mut data = instruction_discriminator("delete_blink").to_vec();
    data.extend(borsh::to_vec(&id.to_string())?);

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(blink_list, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(solana_program::system_program::ID, false),
        ],
        data,
    })
}

pub fn close_blink_instruction(program_id: &Pubkey, owner: &Pubkey) -> Instruction {
    let (blink_list, _bump) = blink_list_pda(owner, program_id);
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(blink_list, false),
            AccountMeta::new(*owner, true),
        ],
        data: instruction_discriminator("close_blink").to_vec(),
    }
}

/// Serializes a list the way the program stores it (discriminator + borsh, no padding).
pub fn encode_blink_list(list: &BlinkList) -> anyhow::Result<Vec<u8>> {
    let mut data = account_discriminator(BLINK_LIST_ACCOUNT).to_vec();
    data.extend(borsh::to_vec(list)?);
    Ok(data)
}

/// Decodes raw account data. The zero padding after the list is ignored.
pub fn decode_blink_list(data: &[u8]) -> BlinkResult<BlinkList> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(BlinkError::InvalidAccountData("account data too short".to_string()));
    }
    let (discriminator, mut body) = data.split_at(DISCRIMINATOR_LEN);
    if discriminator != account_discriminator(BLINK_LIST_ACCOUNT) {
        return Err(BlinkError::InvalidAccountData(
            "account is not a BlinkList".to_string(),
        ));
    }
    BlinkList::deserialize(&mut body).map_err(|e| BlinkError::InvalidAccountData(e.to_string()))
}

/// Fails when appending `blink` would overflow the fixed-size account.
pub fn ensure_capacity(list: Option<&BlinkList>, blink: &Blink) -> BlinkResult<()> {
    let mut next = list.cloned().unwrap_or_default();
    next.blinks.push(blink.clone());
    next.is_initialized = true;

    let needed = encode_blink_list(&next)?.len();
    if needed > BLINK_LIST_SPACE {
        return Err(BlinkError::ListFull {
            needed,
            available: BLINK_LIST_SPACE,
        });
    }
    Ok(())
}
