// Solana program holding each wallet's list of Blinks.
use anchor_lang::prelude::*;

declare_id!("5Z4UkWTCAQu2sNRKkq4GcredbKuF9jGdSxG5mH7ypY6B");

/// Fixed account size for a wallet's Blink list (including the discriminator).
pub const BLINK_LIST_SPACE: usize = 2048;

#[program]
pub mod funblink {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    pub fn create_blink(
        ctx: Context<CreateBlink>,
        id: String,
        title: String,
        icon: String,
        description: String,
        label: String,
        to_pubkey: String,
        link: String,
    ) -> Result<()> {
        let blink_list = &mut ctx.accounts.blink_list;
        if blink_list.blinks.iter().any(|blink| blink.id == id) {
            return err!(ErrorCode::BlinkExists);
        }
        blink_list.is_initialized = true;

        blink_list.blinks.push(Blink {
            id,
            title,
            icon,
            description,
            label,
            to_pubkey,
            link,
        });
        Ok(())
    }

    pub fn delete_blink(ctx: Context<DeleteBlink>, id: String) -> Result<()> {
        let blink_list = &mut ctx.accounts.blink_list;
        if !blink_list.is_initialized {
            return err!(ErrorCode::BlinkNotExist);
        }

        blink_list.blinks.retain(|blink| blink.id != id);
        Ok(())
    }

    pub fn close_blink(ctx: Context<CloseBlink>) -> Result<()> {
        let blink_list = &mut ctx.accounts.blink_list;
        if !blink_list.is_initialized {
            return err!(ErrorCode::BlinkNotExist);
        }

        // Lamports go back to the signer via the `close` constraint.
        blink_list.is_initialized = false;
        Ok(())
    }
}

#[derive(Accounts)]
pub struct CreateBlink<'info> {
    #[account(
        init_if_needed,
        payer = signer,
        space = BLINK_LIST_SPACE,
        seeds = [b"blink_list", signer.key().as_ref()],
        bump
    )]
    pub blink_list: Account<'info, BlinkList>,
    #[account(mut)]
    pub signer: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct DeleteBlink<'info> {
    #[account(mut, seeds = [b"blink_list", signer.key().as_ref()], bump)]
    pub blink_list: Account<'info, BlinkList>,
    #[account(mut)]
    pub signer: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CloseBlink<'info> {
    #[account(mut, close = signer, seeds = [b"blink_list", signer.key().as_ref()], bump)]
    pub blink_list: Account<'info, BlinkList>,
    #[account(mut)]
    pub signer: Signer<'info>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct Blink {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub label: String,
    pub to_pubkey: String,
    pub link: String,
}

#[account]
pub struct BlinkList {
    pub blinks: Vec<Blink>,
    pub is_initialized: bool,
}

#[error_code]
pub enum ErrorCode {
    #[msg("Blink exists")]
    BlinkExists,
    #[msg("Blink does not exist")]
    BlinkNotExist,
}
