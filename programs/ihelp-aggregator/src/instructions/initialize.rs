// =============================================================================
// Initialize Instruction
// =============================================================================
// Creates the global Aggregator account and the iHelp reward vault.
//
// The fee split starts at the default 10% dev / 10% stake / 80% charity and
// can later be changed by the admin through update_fee_split.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::AggregatorInitialized;
use crate::state::Aggregator;

/// Accounts required for the initialize instruction
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Becomes aggregator.admin
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + Aggregator::INIT_SPACE,
        seeds = [AGGREGATOR_SEED],
        bump
    )]
    pub aggregator: Account<'info, Aggregator>,

    /// The iHelp reward token
    pub reward_mint: Account<'info, Mint>,

    /// Holds distributed iHelp until contributors claim it (PDA-owned)
    #[account(
        init,
        payer = admin,
        token::mint = reward_mint,
        token::authority = aggregator,
        seeds = [REWARD_VAULT_SEED, aggregator.key().as_ref()],
        bump
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for initialize
///
/// # Arguments
/// * `distributor` - Allowed to call distribute_ihelp
/// * `fallback_recipient` - Credited with distributions made while nobody holds weight
/// * `dev_fee_owner` - Owner of the developer fee token accounts
/// * `stake_fee_owner` - Owner of the stakeholder fee token accounts
pub fn handler_initialize(
    ctx: Context<Initialize>,
    distributor: Pubkey,
    fallback_recipient: Pubkey,
    dev_fee_owner: Pubkey,
    stake_fee_owner: Pubkey,
) -> Result<()> {
    require!(
        distributor != Pubkey::default()
            && fallback_recipient != Pubkey::default()
            && dev_fee_owner != Pubkey::default()
            && stake_fee_owner != Pubkey::default(),
        AggregatorError::InvalidAuthority
    );

    let clock = Clock::get()?;
    let aggregator = &mut ctx.accounts.aggregator;

    aggregator.admin = ctx.accounts.admin.key();
    aggregator.distributor = distributor;
    aggregator.fallback_recipient = fallback_recipient;
    aggregator.dev_fee_owner = dev_fee_owner;
    aggregator.stake_fee_owner = stake_fee_owner;
    aggregator.reward_mint = ctx.accounts.reward_mint.key();
    aggregator.reward_vault = ctx.accounts.reward_vault.key();

    aggregator.dev_fee_bps = DEFAULT_DEV_FEE_BPS;
    aggregator.stake_fee_bps = DEFAULT_STAKE_FEE_BPS;
    aggregator.charity_fee_bps = DEFAULT_CHARITY_FEE_BPS;

    aggregator.total_weight = 0;
    aggregator.reward_per_weight = 0;
    aggregator.total_reward_distributed = 0;
    aggregator.total_fallback_credited = 0;
    aggregator.total_reward_claimed = 0;
    aggregator.last_distribution_time = 0;

    aggregator.is_paused = false;
    aggregator.bump = ctx.bumps.aggregator;
    aggregator.reward_vault_bump = ctx.bumps.reward_vault;

    msg!("Aggregator initialized");
    msg!("Admin: {}", aggregator.admin);
    msg!("Distributor: {}", aggregator.distributor);
    msg!("Reward mint: {}", aggregator.reward_mint);
    msg!(
        "Fee split: dev {}bps, stake {}bps, charity {}bps",
        aggregator.dev_fee_bps,
        aggregator.stake_fee_bps,
        aggregator.charity_fee_bps
    );

    emit!(AggregatorInitialized {
        admin: aggregator.admin,
        distributor,
        fallback_recipient,
        reward_mint: aggregator.reward_mint,
        dev_fee_bps: aggregator.dev_fee_bps,
        stake_fee_bps: aggregator.stake_fee_bps,
        charity_fee_bps: aggregator.charity_fee_bps,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
