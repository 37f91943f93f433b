use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::InterestClaimed;
use crate::instructions::pay_from_underlying_vault;
use crate::logic;
use crate::state::{Aggregator, CharityPosition, LenderToken};

/// Accounts required for claim_interest
///
/// A charity pulls interest its deposits generated out of the token's vault.
#[derive(Accounts)]
pub struct ClaimInterest<'info> {
    pub charity: Signer<'info>,

    #[account(
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump,
        constraint = !aggregator.is_paused @ AggregatorError::AggregatorPaused
    )]
    pub aggregator: Box<Account<'info, Aggregator>>,

    #[account(
        mut,
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Box<Account<'info, LenderToken>>,

    #[account(
        mut,
        seeds = [
            CHARITY_POSITION_SEED,
            charity.key().as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump = charity_position.bump
    )]
    pub charity_position: Box<Account<'info, CharityPosition>>,

    #[account(
        mut,
        seeds = [UNDERLYING_VAULT_SEED, lender_token.key().as_ref()],
        bump = lender_token.vault_bump
    )]
    pub underlying_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = recipient_account.mint == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint
    )]
    pub recipient_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_claim_interest(ctx: Context<ClaimInterest>, amount: u64) -> Result<()> {
    let accounts = &mut *ctx.accounts;

    logic::claim_interest(
        &mut accounts.lender_token,
        &mut accounts.charity_position,
        amount,
    )?;

    pay_from_underlying_vault(
        &accounts.token_program,
        &accounts.underlying_vault,
        &accounts.recipient_account,
        &accounts.lender_token,
        amount,
    )?;

    let remaining = logic::claimable_interest_of(&accounts.lender_token, &accounts.charity_position)?;

    msg!(
        "Charity {} claimed {} interest on {} ({} left)",
        accounts.charity.key(),
        amount,
        accounts.lender_token.lender_mint,
        remaining
    );

    emit!(InterestClaimed {
        lender_mint: accounts.lender_token.lender_mint,
        charity: accounts.charity.key(),
        recipient: accounts.recipient_account.key(),
        amount,
        remaining,
    });

    Ok(())
}
