// =============================================================================
// Withdraw Instruction
// =============================================================================
// A charity withdraws a contributor's principal to a recipient.
//
// Flow:
// 1. amount is checked against the contributor's and the charity's balance
// 2. Interest and emission views are checkpointed, then debited
// 3. The connector redeems the amount into the token's vault
// 4. The vault pays the recipient
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::connector::CpiConnector;
use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::Withdrawn;
use crate::instructions::pay_from_underlying_vault;
use crate::logic::{self, LedgerAccounts};
use crate::state::{
    Aggregator, CharityPosition, ContributorPosition, ContributorRewards, LenderToken,
};

/// Accounts required for the withdraw instruction
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The charity the contributor deposited through
    pub charity: Signer<'info>,

    /// CHECK: contributor identity, only used as a seed
    pub contributor: UncheckedAccount<'info>,

    #[account(
        mut,
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
        seeds = [
            CONTRIBUTOR_POSITION_SEED,
            contributor.key().as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump = contributor_position.bump
    )]
    pub contributor_position: Box<Account<'info, ContributorPosition>>,

    #[account(
        mut,
        seeds = [CONTRIBUTOR_REWARDS_SEED, contributor.key().as_ref()],
        bump = contributor_rewards.bump
    )]
    pub contributor_rewards: Box<Account<'info, ContributorRewards>>,

    #[account(
        mut,
        seeds = [UNDERLYING_VAULT_SEED, lender_token.key().as_ref()],
        bump = lender_token.vault_bump
    )]
    pub underlying_vault: Box<Account<'info, TokenAccount>>,

    /// Where the withdrawn underlying goes
    #[account(
        mut,
        constraint = recipient_account.mint == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint
    )]
    pub recipient_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: must match lender_token.connector_program
    pub connector_program: UncheckedAccount<'info>,

    /// CHECK: must match lender_token.connector_position
    #[account(mut)]
    pub connector_position: UncheckedAccount<'info>,

    /// CHECK: must match lender_token.connector_reserve
    #[account(mut)]
    pub connector_reserve: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

/// Handler for the withdraw instruction
///
/// # Arguments
/// * `amount` - Underlying to withdraw (in base units)
pub fn handler_withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let connector = CpiConnector::for_lender_token(
        &ctx.accounts.lender_token,
        &ctx.accounts.underlying_vault,
        &ctx.accounts.connector_program,
        &ctx.accounts.connector_position,
        &ctx.accounts.connector_reserve,
        &ctx.accounts.token_program,
    )?;

    // =========================================================================
    // Ledger Update + Redeem
    // =========================================================================

    let accounts = &mut *ctx.accounts;
    logic::withdraw(
        LedgerAccounts {
            aggregator: &mut accounts.aggregator,
            lender_token: &mut accounts.lender_token,
            charity_position: &mut accounts.charity_position,
            contributor_position: &mut accounts.contributor_position,
            contributor_rewards: &mut accounts.contributor_rewards,
        },
        &connector,
        amount,
    )?;

    // =========================================================================
    // Transfer Underlying: Vault -> Recipient
    // =========================================================================

    pay_from_underlying_vault(
        &accounts.token_program,
        &accounts.underlying_vault,
        &accounts.recipient_account,
        &accounts.lender_token,
        amount,
    )?;

    msg!("Withdrawal successful!");
    msg!("Amount withdrawn: {}", amount);
    msg!("Contributor balance: {}", accounts.contributor_position.balance);
    msg!("Charity balance: {}", accounts.charity_position.balance);
    msg!("Token total deposited: {}", accounts.lender_token.total_deposited);

    emit!(Withdrawn {
        lender_mint: accounts.lender_token.lender_mint,
        charity: accounts.charity.key(),
        contributor: accounts.contributor.key(),
        recipient: accounts.recipient_account.key(),
        amount,
        contributor_balance: accounts.contributor_position.balance,
        charity_balance: accounts.charity_position.balance,
        total_deposited: accounts.lender_token.total_deposited,
    });

    Ok(())
}
