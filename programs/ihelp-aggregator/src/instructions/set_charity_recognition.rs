use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::CharityRecognitionUpdated;
use crate::state::{Aggregator, CharityRecord};

/// Accounts required for set_charity_recognition
///
/// Creates the charity's host registry entry on first use.
#[derive(Accounts)]
pub struct SetCharityRecognition<'info> {
    #[account(
        mut,
        constraint = admin.key() == aggregator.admin @ AggregatorError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump
    )]
    pub aggregator: Account<'info, Aggregator>,

    /// CHECK: the charity's signing key, only stored and used as a seed
    pub charity: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + CharityRecord::INIT_SPACE,
        seeds = [CHARITY_SEED, charity.key().as_ref()],
        bump
    )]
    pub charity_record: Account<'info, CharityRecord>,

    pub system_program: Program<'info, System>,
}

pub fn handler_set_charity_recognition(
    ctx: Context<SetCharityRecognition>,
    is_recognized: bool,
) -> Result<()> {
    let charity = ctx.accounts.charity.key();
    let record = &mut ctx.accounts.charity_record;

    if record.charity == Pubkey::default() {
        record.charity = charity;
        record.registered_at = Clock::get()?.unix_timestamp;
        record.bump = ctx.bumps.charity_record;
        msg!("Charity registered: {}", charity);
    }

    record.is_recognized = is_recognized;

    msg!(
        "Charity {} is now {}",
        charity,
        if is_recognized { "recognized" } else { "not recognized" }
    );

    emit!(CharityRecognitionUpdated {
        charity,
        is_recognized,
    });

    Ok(())
}
