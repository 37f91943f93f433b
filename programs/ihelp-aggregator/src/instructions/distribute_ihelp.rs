// =============================================================================
// Distribute iHelp Instruction
// =============================================================================
// The distributor pushes an iHelp emission into the reward vault and the
// global accumulator:
//
//   reward_per_weight += amount * PRECISION / total_weight
//
// With no weight at all the whole amount is credited to the fallback
// recipient's ContributorRewards instead.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::RewardDistributed;
use crate::logic;
use crate::state::{Aggregator, ContributorRewards, Distribution};

/// Accounts required for distribute_ihelp
#[derive(Accounts)]
pub struct DistributeIhelp<'info> {
    #[account(
        mut,
        constraint = distributor.key() == aggregator.distributor @ AggregatorError::Unauthorized
    )]
    pub distributor: Signer<'info>,

    #[account(
        mut,
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump,
        constraint = !aggregator.is_paused @ AggregatorError::AggregatorPaused
    )]
    pub aggregator: Box<Account<'info, Aggregator>>,

    #[account(
        constraint = reward_mint.key() == aggregator.reward_mint @ AggregatorError::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    /// Distributor's iHelp account (source of the emission)
    #[account(
        mut,
        token::mint = reward_mint,
        constraint = reward_source.owner == distributor.key() @ AggregatorError::InvalidTokenAccountOwner
    )]
    pub reward_source: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED, aggregator.key().as_ref()],
        bump = aggregator.reward_vault_bump
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// Emission checkpoint of the fallback recipient
    #[account(
        init_if_needed,
        payer = distributor,
        space = 8 + ContributorRewards::INIT_SPACE,
        seeds = [CONTRIBUTOR_REWARDS_SEED, aggregator.fallback_recipient.as_ref()],
        bump
    )]
    pub fallback_rewards: Box<Account<'info, ContributorRewards>>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_distribute_ihelp(ctx: Context<DistributeIhelp>, amount: u64) -> Result<()> {
    require!(amount > 0, AggregatorError::ZeroAmount);

    let clock = Clock::get()?;

    // =========================================================================
    // Transfer iHelp: Distributor -> Reward Vault
    // =========================================================================

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.reward_source.to_account_info(),
                to: ctx.accounts.reward_vault.to_account_info(),
                authority: ctx.accounts.distributor.to_account_info(),
            },
        ),
        amount,
    )?;

    // =========================================================================
    // Accumulator Update
    // =========================================================================

    let fallback_recipient = ctx.accounts.aggregator.fallback_recipient;
    let accounts = &mut *ctx.accounts;
    accounts
        .fallback_rewards
        .open(fallback_recipient, ctx.bumps.fallback_rewards);

    let distribution =
        logic::distribute_ihelp(&mut accounts.aggregator, &mut accounts.fallback_rewards, amount)?;

    let aggregator = &mut accounts.aggregator;
    aggregator.last_distribution_time = clock.unix_timestamp;

    let to_fallback = distribution == Distribution::Fallback;
    if to_fallback {
        msg!(
            "No deposited weight - {} iHelp credited to fallback recipient {}",
            amount,
            fallback_recipient
        );
    } else {
        msg!(
            "Distributed {} iHelp over weight {}. reward_per_weight: {}",
            amount,
            aggregator.total_weight,
            aggregator.reward_per_weight
        );
    }

    emit!(RewardDistributed {
        amount,
        total_weight: aggregator.total_weight,
        reward_per_weight: aggregator.reward_per_weight,
        to_fallback,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
