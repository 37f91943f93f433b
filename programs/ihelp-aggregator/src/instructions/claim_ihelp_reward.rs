use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::RewardClaimed;
use crate::logic;
use crate::state::{Aggregator, ContributorRewards};

/// Claim accrued iHelp rewards
///
/// # Flow
/// 1. Settle the contributor's emission checkpoint
/// 2. Debit `amount` (must not exceed what is claimable)
/// 3. Transfer iHelp from the reward vault to the contributor
#[derive(Accounts)]
pub struct ClaimIhelpReward<'info> {
    pub contributor: Signer<'info>,

    #[account(
        mut,
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump,
        constraint = !aggregator.is_paused @ AggregatorError::AggregatorPaused
    )]
    pub aggregator: Box<Account<'info, Aggregator>>,

    #[account(
        mut,
        seeds = [CONTRIBUTOR_REWARDS_SEED, contributor.key().as_ref()],
        bump = contributor_rewards.bump
    )]
    pub contributor_rewards: Box<Account<'info, ContributorRewards>>,

    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED, aggregator.key().as_ref()],
        bump = aggregator.reward_vault_bump
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = recipient_account.mint == aggregator.reward_mint @ AggregatorError::InvalidRewardMint
    )]
    pub recipient_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_claim_ihelp_reward(ctx: Context<ClaimIhelpReward>, amount: u64) -> Result<()> {
    let accounts = &mut *ctx.accounts;

    logic::claim_ihelp_reward(&mut accounts.aggregator, &mut accounts.contributor_rewards, amount)?;

    // Reward vault authority is the aggregator PDA
    let bump = [accounts.aggregator.bump];
    let seeds: &[&[u8]] = &[AGGREGATOR_SEED, &bump];

    token::transfer(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            Transfer {
                from: accounts.reward_vault.to_account_info(),
                to: accounts.recipient_account.to_account_info(),
                authority: accounts.aggregator.to_account_info(),
            },
            &[seeds],
        ),
        amount,
    )?;

    let remaining = logic::claimable_ihelp_reward_of(&accounts.aggregator, &accounts.contributor_rewards)?;

    msg!(
        "Contributor {} claimed {} iHelp ({} left)",
        accounts.contributor.key(),
        amount,
        remaining
    );

    emit!(RewardClaimed {
        contributor: accounts.contributor.key(),
        amount,
        remaining,
    });

    Ok(())
}
