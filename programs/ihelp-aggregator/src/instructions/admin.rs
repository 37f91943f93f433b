// =============================================================================
// Admin Instructions
// =============================================================================
// Configuration changes only the aggregator admin can make:
// - fee split (validated: sums to 100%, charity keeps at least the minimum)
// - pause flag
// - admin and distributor handover
// - sweeping interest that arrived while nothing was deposited
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::{FeeSplitUpdated, UnattributedInterestSwept};
use crate::instructions::pay_from_underlying_vault;
use crate::state::{Aggregator, LenderToken};

/// Accounts shared by the plain config updates
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        constraint = admin.key() == aggregator.admin @ AggregatorError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump
    )]
    pub aggregator: Account<'info, Aggregator>,
}

// =============================================================================
// Fee Split
// =============================================================================

pub fn handler_update_fee_split(
    ctx: Context<UpdateConfig>,
    dev_fee_bps: u16,
    stake_fee_bps: u16,
    charity_fee_bps: u16,
) -> Result<()> {
    Aggregator::validate_fee_split(dev_fee_bps, stake_fee_bps, charity_fee_bps)?;

    let aggregator = &mut ctx.accounts.aggregator;
    let (old_dev, old_stake, old_charity) = aggregator.fee_split();

    aggregator.dev_fee_bps = dev_fee_bps;
    aggregator.stake_fee_bps = stake_fee_bps;
    aggregator.charity_fee_bps = charity_fee_bps;

    msg!(
        "Fee split updated: dev {} -> {}, stake {} -> {}, charity {} -> {}",
        old_dev,
        dev_fee_bps,
        old_stake,
        stake_fee_bps,
        old_charity,
        charity_fee_bps
    );

    emit!(FeeSplitUpdated {
        dev_fee_bps,
        stake_fee_bps,
        charity_fee_bps,
    });

    Ok(())
}

// =============================================================================
// Pause
// =============================================================================

pub fn handler_set_paused(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
    let aggregator = &mut ctx.accounts.aggregator;

    if aggregator.is_paused == paused {
        msg!(
            "Aggregator is already {}",
            if paused { "paused" } else { "unpaused" }
        );
        return Ok(());
    }

    aggregator.is_paused = paused;

    msg!(
        "Aggregator {} by admin {}",
        if paused { "PAUSED" } else { "UNPAUSED" },
        ctx.accounts.admin.key()
    );

    Ok(())
}

// =============================================================================
// Authorities
// =============================================================================

pub fn handler_transfer_admin(ctx: Context<UpdateConfig>, new_admin: Pubkey) -> Result<()> {
    let aggregator = &mut ctx.accounts.aggregator;

    require!(new_admin != Pubkey::default(), AggregatorError::InvalidAuthority);
    require!(new_admin != aggregator.admin, AggregatorError::InvalidAuthority);

    let old_admin = aggregator.admin;
    aggregator.admin = new_admin;

    msg!("Admin transferred: {} -> {}", old_admin, new_admin);

    Ok(())
}

pub fn handler_update_distributor(ctx: Context<UpdateConfig>, new_distributor: Pubkey) -> Result<()> {
    let aggregator = &mut ctx.accounts.aggregator;

    require!(
        new_distributor != Pubkey::default(),
        AggregatorError::InvalidAuthority
    );

    let old_distributor = aggregator.distributor;
    aggregator.distributor = new_distributor;

    msg!("Distributor updated: {} -> {}", old_distributor, new_distributor);

    Ok(())
}

// =============================================================================
// Unattributed Interest Sweep
// =============================================================================

/// Accounts required for sweep_unattributed_interest
#[derive(Accounts)]
pub struct SweepUnattributedInterest<'info> {
    #[account(
        constraint = admin.key() == aggregator.admin @ AggregatorError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump
    )]
    pub aggregator: Account<'info, Aggregator>,

    #[account(
        mut,
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Account<'info, LenderToken>,

    #[account(
        mut,
        seeds = [UNDERLYING_VAULT_SEED, lender_token.key().as_ref()],
        bump = lender_token.vault_bump
    )]
    pub underlying_vault: Account<'info, TokenAccount>,

    /// Developer fee sink for this underlying
    #[account(
        mut,
        constraint = dev_fee_account.mint == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint,
        constraint = dev_fee_account.owner == aggregator.dev_fee_owner @ AggregatorError::InvalidTokenAccountOwner
    )]
    pub dev_fee_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_sweep_unattributed_interest(ctx: Context<SweepUnattributedInterest>) -> Result<()> {
    let amount = ctx.accounts.lender_token.take_unattributed()?;

    pay_from_underlying_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.underlying_vault,
        &ctx.accounts.dev_fee_account,
        &ctx.accounts.lender_token,
        amount,
    )?;

    msg!(
        "Swept {} unattributed interest of {} to the dev fee sink",
        amount,
        ctx.accounts.lender_token.lender_mint
    );

    emit!(UnattributedInterestSwept {
        lender_mint: ctx.accounts.lender_token.lender_mint,
        amount,
    });

    Ok(())
}
